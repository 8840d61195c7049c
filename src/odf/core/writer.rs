//! ODF package writing functionality.
//!
//! This module creates ODF files as ZIP archives with the `mimetype` member
//! stored first and uncompressed, and keeps `META-INF/manifest.xml` in step
//! with the members actually written.

use super::container::DocumentClass;
use crate::common::{Error, Result};
use crate::odf::constants::{ODF_MANIFEST, ODF_MIMETYPE, ODF_NAMESPACES, OFFICE_VERSION};
use crate::odf::datatype::DateTimeOdf;
use crate::odf::elements::{InsertPosition, NodeId, XmlTree};
use std::io::{Cursor, Seek, Write};
use zip::write::{SimpleFileOptions, ZipWriter};

const MANIFEST_NAMESPACE: &str = "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0";

/// Builder for ODF packages (ZIP archives)
///
/// # Examples
///
/// ```no_run
/// # use loquat::odf::core::PackageWriter;
/// # use loquat::Result;
/// # fn example() -> Result<()> {
/// let mut writer = PackageWriter::new("application/vnd.oasis.opendocument.text")?;
/// writer.add_file("content.xml", b"<office:document-content/>")?;
/// let bytes = writer.finish_to_bytes()?;
/// std::fs::write("document.odt", bytes)?;
/// # Ok(())
/// # }
/// ```
pub struct PackageWriter<W: Write + Seek> {
    zip_writer: ZipWriter<W>,
    mimetype: String,
    manifest_entries: Vec<ManifestEntry>,
    base_manifest: Option<Vec<u8>>,
}

/// Entry in the ODF manifest
#[derive(Debug, Clone)]
struct ManifestEntry {
    full_path: String,
    media_type: String,
}

impl PackageWriter<Cursor<Vec<u8>>> {
    /// Create a package writer that writes to memory
    pub fn new(mimetype: &str) -> Result<Self> {
        Self::with_writer(Cursor::new(Vec::new()), mimetype)
    }

    /// Finish writing and return the bytes
    pub fn finish_to_bytes(self) -> Result<Vec<u8>> {
        Ok(self.finish()?.into_inner())
    }
}

impl<W: Write + Seek> PackageWriter<W> {
    /// Create a package writer over `writer`; the mimetype member is
    /// written immediately so that it comes first in the archive.
    pub fn with_writer(writer: W, mimetype: &str) -> Result<Self> {
        let mut zip_writer = ZipWriter::new(writer);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        zip_writer.start_file(ODF_MIMETYPE, options)?;
        zip_writer.write_all(mimetype.as_bytes())?;

        Ok(Self {
            zip_writer,
            mimetype: mimetype.to_string(),
            manifest_entries: Vec::new(),
            base_manifest: None,
        })
    }

    /// Start from an existing manifest; entries for newly added files are
    /// appended to it on [`finish`](Self::finish).
    pub fn set_manifest(&mut self, manifest: &[u8]) {
        self.base_manifest = Some(manifest.to_vec());
    }

    /// Add a file to the package
    ///
    /// `mimetype` and the manifest itself are managed by the writer and
    /// rejected here.
    pub fn add_file(&mut self, path: &str, content: &[u8]) -> Result<()> {
        if path == ODF_MIMETYPE || path == ODF_MANIFEST {
            return Err(Error::InvalidArgument(format!(
                "\"{path}\" is written by the package writer"
            )));
        }

        self.manifest_entries.push(ManifestEntry {
            full_path: path.to_string(),
            media_type: Self::guess_media_type(path).to_string(),
        });

        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip_writer.start_file(path, options)?;
        self.zip_writer.write_all(content)?;

        Ok(())
    }

    /// Generate the manifest.xml content
    fn generate_manifest(&self) -> Result<String> {
        let mut tree = match &self.base_manifest {
            Some(bytes) => XmlTree::parse(bytes)?,
            None => {
                let mut tree = XmlTree::with_root("manifest:manifest");
                let root = tree.root();
                tree.set_attribute(root, "xmlns:manifest", MANIFEST_NAMESPACE)?;
                tree.set_attribute(root, "manifest:version", OFFICE_VERSION)?;
                tree
            },
        };
        let root = tree.root();

        let listed: Vec<(String, NodeId)> = tree
            .child_elements(root)
            .filter_map(|entry| {
                tree.attribute(entry, "manifest:full-path")
                    .map(|path| (path.to_string(), entry))
            })
            .collect();

        // The root entry always describes the current mimetype
        match listed.iter().find(|(path, _)| path == "/") {
            Some((_, entry)) => tree.set_attribute(*entry, "manifest:media-type", &self.mimetype)?,
            None => {
                let entry = Self::file_entry(&mut tree, "/", &self.mimetype)?;
                tree.insert(entry, root, InsertPosition::FirstChild)?;
            },
        }

        for entry in &self.manifest_entries {
            if listed.iter().any(|(path, _)| *path == entry.full_path) {
                continue;
            }
            let node = Self::file_entry(&mut tree, &entry.full_path, &entry.media_type)?;
            tree.insert(node, root, InsertPosition::LastChild)?;
        }

        Ok(tree.serialize(true))
    }

    fn file_entry(
        tree: &mut XmlTree,
        full_path: &str,
        media_type: &str,
    ) -> Result<NodeId> {
        let entry = tree.create_element("manifest:file-entry");
        tree.set_attribute(entry, "manifest:full-path", full_path)?;
        tree.set_attribute(entry, "manifest:media-type", media_type)?;
        Ok(entry)
    }

    /// Guess media type from file path
    fn guess_media_type(path: &str) -> &'static str {
        if path.ends_with(".xml") {
            "text/xml"
        } else if path.ends_with(".png") {
            "image/png"
        } else if path.ends_with(".jpg") || path.ends_with(".jpeg") {
            "image/jpeg"
        } else if path.ends_with(".gif") {
            "image/gif"
        } else if path.ends_with(".svg") {
            "image/svg+xml"
        } else {
            "application/octet-stream"
        }
    }

    /// Write the manifest and finalize the ZIP archive
    pub fn finish(mut self) -> Result<W> {
        let manifest_content = self.generate_manifest()?;
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip_writer.start_file(ODF_MANIFEST, options)?;
        self.zip_writer.write_all(manifest_content.as_bytes())?;

        let writer = self.zip_writer.finish()?;
        Ok(writer)
    }
}

/// Skeleton parts for new documents
pub struct OdfStructure;

impl OdfStructure {
    fn namespaces() -> String {
        ODF_NAMESPACES
            .iter()
            .map(|(prefix, uri)| format!(r#" {prefix}="{uri}""#))
            .collect()
    }

    /// Default content.xml with an empty body of the given class
    pub fn default_content_xml(class: DocumentClass) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content{ns} office:version="{OFFICE_VERSION}">
  <office:scripts/>
  <office:font-face-decls/>
  <office:automatic-styles/>
  <office:body>
    <{body}/>
  </office:body>
</office:document-content>
"#,
            ns = Self::namespaces(),
            body = class.body_tag(),
        )
    }

    /// Default styles.xml skeleton
    pub fn default_styles_xml() -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-styles{ns} office:version="{OFFICE_VERSION}">
  <office:font-face-decls/>
  <office:styles/>
  <office:automatic-styles/>
  <office:master-styles/>
</office:document-styles>
"#,
            ns = Self::namespaces(),
        )
    }

    /// Default meta.xml, with every metadata element the document layer
    /// rewrites except `meta:keyword`
    pub fn default_meta_xml() -> String {
        let now = chrono::Local::now().naive_local();
        let now = DateTimeOdf::encode(&now);
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-meta{ns} office:version="{OFFICE_VERSION}">
  <office:meta>
    <meta:generator>Loquat/{version}</meta:generator>
    <dc:title></dc:title>
    <dc:description></dc:description>
    <dc:subject></dc:subject>
    <dc:language>en-US</dc:language>
    <meta:initial-creator></meta:initial-creator>
    <meta:creation-date>{now}</meta:creation-date>
    <dc:date>{now}</dc:date>
    <meta:editing-cycles>1</meta:editing-cycles>
    <meta:editing-duration>PT00H00M00S</meta:editing-duration>
    <meta:document-statistic meta:table-count="0" meta:image-count="0" meta:object-count="0" meta:page-count="0" meta:paragraph-count="0" meta:word-count="0" meta:character-count="0"/>
  </office:meta>
</office:document-meta>
"#,
            ns = Self::namespaces(),
            version = env!("CARGO_PKG_VERSION"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::constants::ODF_TEXT;
    use std::io::Read;

    fn read_back(bytes: Vec<u8>) -> zip::ZipArchive<Cursor<Vec<u8>>> {
        zip::ZipArchive::new(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_mimetype_first_and_stored() {
        let mut writer = PackageWriter::new(ODF_TEXT).unwrap();
        writer.add_file("content.xml", b"<a/>").unwrap();
        let mut archive = read_back(writer.finish_to_bytes().unwrap());

        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), zip::CompressionMethod::Stored);
        drop(first);

        let mut manifest = String::new();
        archive
            .by_name(ODF_MANIFEST)
            .unwrap()
            .read_to_string(&mut manifest)
            .unwrap();
        assert!(manifest.contains(r#"manifest:full-path="/" manifest:media-type="application/vnd.oasis.opendocument.text""#));
        assert!(manifest.contains(r#"manifest:full-path="content.xml" manifest:media-type="text/xml""#));
    }

    #[test]
    fn test_existing_manifest_is_extended() {
        let base = br#"<manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0"><manifest:file-entry manifest:full-path="/" manifest:media-type="old"/><manifest:file-entry manifest:full-path="content.xml" manifest:media-type="text/xml"/></manifest:manifest>"#;
        let mut writer = PackageWriter::new(ODF_TEXT).unwrap();
        writer.set_manifest(base);
        writer.add_file("content.xml", b"<a/>").unwrap();
        writer.add_file("Pictures/p.png", b"png").unwrap();
        let manifest = writer.generate_manifest().unwrap();

        assert_eq!(manifest.matches("content.xml").count(), 1);
        assert!(manifest.contains(r#"manifest:full-path="Pictures/p.png" manifest:media-type="image/png""#));
        assert!(!manifest.contains("\"old\""));
    }

    #[test]
    fn test_reserved_members() {
        let mut writer = PackageWriter::new(ODF_TEXT).unwrap();
        assert!(writer.add_file("mimetype", b"x").is_err());
        assert!(writer.add_file(ODF_MANIFEST, b"x").is_err());
    }

    #[test]
    fn test_skeletons_parse() {
        for class in [
            DocumentClass::Text,
            DocumentClass::Spreadsheet,
            DocumentClass::Presentation,
            DocumentClass::Drawing,
        ] {
            let content = XmlTree::parse_str(&OdfStructure::default_content_xml(class)).unwrap();
            let body = content.select_first(&format!("//{}", class.body_tag()), None).unwrap();
            assert!(body.is_some());
        }
        let styles = XmlTree::parse_str(&OdfStructure::default_styles_xml()).unwrap();
        assert!(styles.select_first("//office:styles", None).unwrap().is_some());
        let meta = XmlTree::parse_str(&OdfStructure::default_meta_xml()).unwrap();
        let date = meta.select_first("//meta:creation-date", None).unwrap().unwrap();
        assert!(DateTimeOdf::decode(meta.text(date)).is_ok());
    }
}
