//! ODF constants, MIME types, and part paths.

use phf::{Map, phf_map};

/// ODF specification version written into new parts
pub const OFFICE_VERSION: &str = "1.2";

// ============================================================================
// MIME TYPES
// ============================================================================

/// MIME type for OpenDocument Text (.odt)
pub const ODF_TEXT: &str = "application/vnd.oasis.opendocument.text";

/// MIME type for OpenDocument Text Template (.ott)
pub const ODF_TEXT_TEMPLATE: &str = "application/vnd.oasis.opendocument.text-template";

/// MIME type for OpenDocument Spreadsheet (.ods)
pub const ODF_SPREADSHEET: &str = "application/vnd.oasis.opendocument.spreadsheet";

/// MIME type for OpenDocument Spreadsheet Template (.ots)
pub const ODF_SPREADSHEET_TEMPLATE: &str =
    "application/vnd.oasis.opendocument.spreadsheet-template";

/// MIME type for OpenDocument Presentation (.odp)
pub const ODF_PRESENTATION: &str = "application/vnd.oasis.opendocument.presentation";

/// MIME type for OpenDocument Presentation Template (.otp)
pub const ODF_PRESENTATION_TEMPLATE: &str =
    "application/vnd.oasis.opendocument.presentation-template";

/// MIME type for OpenDocument Drawing (.odg)
pub const ODF_DRAWING: &str = "application/vnd.oasis.opendocument.graphics";

/// MIME type for OpenDocument Drawing Template (.otg)
pub const ODF_DRAWING_TEMPLATE: &str = "application/vnd.oasis.opendocument.graphics-template";

// ============================================================================
// LOOKUP TABLES
// ============================================================================

/// MIME type to file extension mapping (compile-time perfect hash map)
pub static ODF_MIMETYPES: Map<&'static str, &'static str> = phf_map! {
    "application/vnd.oasis.opendocument.text" => "odt",
    "application/vnd.oasis.opendocument.text-template" => "ott",
    "application/vnd.oasis.opendocument.spreadsheet" => "ods",
    "application/vnd.oasis.opendocument.spreadsheet-template" => "ots",
    "application/vnd.oasis.opendocument.presentation" => "odp",
    "application/vnd.oasis.opendocument.presentation-template" => "otp",
    "application/vnd.oasis.opendocument.graphics" => "odg",
    "application/vnd.oasis.opendocument.graphics-template" => "otg",
};

/// Template MIME type to the MIME type of documents made from it
pub static TEMPLATE_MIMETYPES: Map<&'static str, &'static str> = phf_map! {
    "application/vnd.oasis.opendocument.text-template" => ODF_TEXT,
    "application/vnd.oasis.opendocument.spreadsheet-template" => ODF_SPREADSHEET,
    "application/vnd.oasis.opendocument.presentation-template" => ODF_PRESENTATION,
    "application/vnd.oasis.opendocument.graphics-template" => ODF_DRAWING,
};

// ============================================================================
// STANDARD ODF PARTS PATHS
// ============================================================================

/// Path to the mimetype member
pub const ODF_MIMETYPE: &str = "mimetype";

/// Path to content.xml (main document content)
pub const ODF_CONTENT: &str = "content.xml";

/// Path to meta.xml (document metadata)
pub const ODF_META: &str = "meta.xml";

/// Path to settings.xml (application settings)
pub const ODF_SETTINGS: &str = "settings.xml";

/// Path to styles.xml (document styles)
pub const ODF_STYLES: &str = "styles.xml";

/// Path to manifest.xml (package manifest)
pub const ODF_MANIFEST: &str = "META-INF/manifest.xml";

// ============================================================================
// NAMESPACES
// ============================================================================

/// Namespace declarations carried by every part root this crate writes
pub const ODF_NAMESPACES: [(&str, &str); 14] = [
    ("xmlns:office", "urn:oasis:names:tc:opendocument:xmlns:office:1.0"),
    ("xmlns:style", "urn:oasis:names:tc:opendocument:xmlns:style:1.0"),
    ("xmlns:text", "urn:oasis:names:tc:opendocument:xmlns:text:1.0"),
    ("xmlns:table", "urn:oasis:names:tc:opendocument:xmlns:table:1.0"),
    ("xmlns:draw", "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0"),
    ("xmlns:fo", "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0"),
    ("xmlns:xlink", "http://www.w3.org/1999/xlink"),
    ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
    ("xmlns:meta", "urn:oasis:names:tc:opendocument:xmlns:meta:1.0"),
    ("xmlns:number", "urn:oasis:names:tc:opendocument:xmlns:datastyle:1.0"),
    ("xmlns:presentation", "urn:oasis:names:tc:opendocument:xmlns:presentation:1.0"),
    ("xmlns:svg", "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0"),
    ("xmlns:config", "urn:oasis:names:tc:opendocument:xmlns:config:1.0"),
    ("xmlns:chart", "urn:oasis:names:tc:opendocument:xmlns:chart:1.0"),
];

/// Get file extension from MIME type
///
/// # Examples
///
/// ```
/// use loquat::odf::constants::get_extension_from_mime_type;
///
/// let ext = get_extension_from_mime_type("application/vnd.oasis.opendocument.text");
/// assert_eq!(ext, Some("odt"));
/// ```
#[inline]
pub fn get_extension_from_mime_type(mime_type: &str) -> Option<&'static str> {
    ODF_MIMETYPES.get(mime_type).copied()
}

/// Check if a given MIME type is a valid ODF MIME type
#[inline]
pub fn is_odf_mime_type(mime_type: &str) -> bool {
    ODF_MIMETYPES.contains_key(mime_type)
}

/// MIME type of a document instantiated from a package of `mime_type`.
///
/// Templates map to their document type; anything else is unchanged.
#[inline]
pub fn instantiated_mime_type(mime_type: &str) -> &str {
    TEMPLATE_MIMETYPES.get(mime_type).copied().unwrap_or(mime_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_to_extension() {
        assert_eq!(get_extension_from_mime_type(ODF_TEXT), Some("odt"));
        assert_eq!(get_extension_from_mime_type(ODF_SPREADSHEET), Some("ods"));
        assert_eq!(get_extension_from_mime_type(ODF_DRAWING_TEMPLATE), Some("otg"));
        assert_eq!(get_extension_from_mime_type("unknown"), None);
        assert!(is_odf_mime_type(ODF_PRESENTATION));
        assert!(!is_odf_mime_type("text/plain"));
    }

    #[test]
    fn test_instantiated_mime_type() {
        assert_eq!(instantiated_mime_type(ODF_TEXT_TEMPLATE), ODF_TEXT);
        assert_eq!(instantiated_mime_type(ODF_SPREADSHEET_TEMPLATE), ODF_SPREADSHEET);
        assert_eq!(instantiated_mime_type(ODF_PRESENTATION_TEMPLATE), ODF_PRESENTATION);
        assert_eq!(instantiated_mime_type(ODF_TEXT), ODF_TEXT);
        assert_eq!(instantiated_mime_type("text/plain"), "text/plain");
    }
}
