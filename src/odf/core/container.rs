//! The package container: every member of an ODF document, in memory.
//!
//! A [`Container`] is loaded eagerly from a ZIP package or a flat XML
//! document and written back in either packaging. It knows nothing about
//! the XML inside the parts; the document layer parses what it needs.

use super::flat;
use super::package::Package;
use super::writer::{OdfStructure, PackageWriter};
use crate::common::{Error, Result};
use crate::odf::constants::{
    ODF_CONTENT, ODF_DRAWING, ODF_MANIFEST, ODF_META, ODF_PRESENTATION, ODF_SPREADSHEET,
    ODF_STYLES, ODF_TEXT, instantiated_mime_type, is_odf_mime_type,
};
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Kind of document created from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocumentClass {
    #[default]
    Text,
    Spreadsheet,
    Presentation,
    Drawing,
}

impl DocumentClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DocumentClass::Text => "text",
            DocumentClass::Spreadsheet => "spreadsheet",
            DocumentClass::Presentation => "presentation",
            DocumentClass::Drawing => "drawing",
        }
    }

    /// MIME type of packages of this class
    pub const fn mime_type(&self) -> &'static str {
        match self {
            DocumentClass::Text => ODF_TEXT,
            DocumentClass::Spreadsheet => ODF_SPREADSHEET,
            DocumentClass::Presentation => ODF_PRESENTATION,
            DocumentClass::Drawing => ODF_DRAWING,
        }
    }

    /// Element under `office:body` holding the document's content
    pub const fn body_tag(&self) -> &'static str {
        match self {
            DocumentClass::Text => "office:text",
            DocumentClass::Spreadsheet => "office:spreadsheet",
            DocumentClass::Presentation => "office:presentation",
            DocumentClass::Drawing => "office:drawing",
        }
    }
}

impl FromStr for DocumentClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(DocumentClass::Text),
            "spreadsheet" => Ok(DocumentClass::Spreadsheet),
            "presentation" => Ok(DocumentClass::Presentation),
            "drawing" => Ok(DocumentClass::Drawing),
            _ => Err(Error::InvalidArgument(format!(
                "\"{s}\" is not a document class"
            ))),
        }
    }
}

impl fmt::Display for DocumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a package is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Packaging {
    /// ZIP archive (`.odt`, `.ods`, …)
    #[default]
    Zip,
    /// Single XML document (`.fodt`, `.fods`, …)
    Flat,
}

impl FromStr for Packaging {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "zip" => Ok(Packaging::Zip),
            "flat" => Ok(Packaging::Flat),
            _ => Err(Error::InvalidArgument(format!(
                "packaging must be \"zip\" or \"flat\", not \"{s}\""
            ))),
        }
    }
}

/// Options for saving a document or container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveOptions {
    pub packaging: Packaging,
    /// Indent element-only content of the XML parts
    pub pretty: bool,
}

impl SaveOptions {
    pub fn flat() -> Self {
        Self {
            packaging: Packaging::Flat,
            ..Self::default()
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// All members of one ODF package.
///
/// Cloning copies every member; the clone is independent of the original.
#[derive(Debug, Clone)]
pub struct Container {
    mimetype: String,
    members: Vec<(String, Vec<u8>)>,
    path: Option<PathBuf>,
}

impl Container {
    /// Open the package stored at `path`, ZIP or flat.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("opening ODF package {}", path.display());
        let bytes = std::fs::read(path)?;
        let mut container = Self::from_bytes(&bytes)?;
        container.path = Some(path.to_path_buf());
        Ok(container)
    }

    /// Load a package from memory, ZIP or flat.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (mimetype, members) = if bytes.starts_with(ZIP_MAGIC) {
            let package = Package::from_reader(Cursor::new(bytes))?;
            let mimetype = package.mimetype().to_string();
            (mimetype, package.into_members()?)
        } else {
            flat::split(bytes)?
        };

        if !is_odf_mime_type(&mimetype) {
            tracing::warn!("unrecognized ODF mimetype \"{}\"", mimetype);
        }
        tracing::debug!("loaded {} package members ({})", members.len(), mimetype);

        Ok(Self {
            mimetype,
            members,
            path: None,
        })
    }

    /// Create an empty document of the given class.
    pub fn new_from_class(class: DocumentClass) -> Self {
        Self {
            mimetype: class.mime_type().to_string(),
            members: vec![
                (
                    ODF_CONTENT.to_string(),
                    OdfStructure::default_content_xml(class).into_bytes(),
                ),
                (
                    ODF_STYLES.to_string(),
                    OdfStructure::default_styles_xml().into_bytes(),
                ),
                (
                    ODF_META.to_string(),
                    OdfStructure::default_meta_xml().into_bytes(),
                ),
            ],
            path: None,
        }
    }

    /// Create a new, unsaved document from the template at `path`.
    ///
    /// Template MIME types are switched to their document counterparts.
    pub fn from_template(path: impl AsRef<Path>) -> Result<Self> {
        let mut container = Self::open(path)?;
        container.mimetype = instantiated_mime_type(&container.mimetype).to_string();
        container.path = None;
        Ok(container)
    }

    pub fn mimetype(&self) -> &str {
        &self.mimetype
    }

    /// Where the package was opened from, if anywhere.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Member names, in package order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(name, _)| name.as_str())
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.members.iter().any(|(n, _)| n == name)
    }

    /// Bytes of the member `name`.
    pub fn get_part(&self, name: &str) -> Result<&[u8]> {
        self.members
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bytes)| bytes.as_slice())
            .ok_or_else(|| Error::ComponentNotFound(format!("part \"{name}\"")))
    }

    /// Replace the member `name`, adding it if missing.
    pub fn set_part(&mut self, name: &str, bytes: Vec<u8>) {
        match self.members.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = bytes,
            None => self.members.push((name.to_string(), bytes)),
        }
    }

    /// Serialize the package.
    ///
    /// Flat packaging can only carry the XML parts; other members (pictures,
    /// thumbnails) are left out.
    pub fn to_bytes(&self, options: &SaveOptions) -> Result<Vec<u8>> {
        match options.packaging {
            Packaging::Zip => {
                let mut writer = PackageWriter::new(&self.mimetype)?;
                for (name, bytes) in &self.members {
                    if name == ODF_MANIFEST {
                        writer.set_manifest(bytes);
                    } else {
                        writer.add_file(name, bytes)?;
                    }
                }
                writer.finish_to_bytes()
            },
            Packaging::Flat => {
                let dropped = self
                    .members
                    .iter()
                    .filter(|(name, _)| !name.ends_with(".xml") && name != ODF_MANIFEST)
                    .count();
                if dropped > 0 {
                    tracing::warn!("flat packaging leaves out {} non-XML members", dropped);
                }
                flat::join(
                    &self.mimetype,
                    |name| self.get_part(name).ok(),
                    options.pretty,
                )
            },
        }
    }

    /// Write the package to `path`, or to the path it was opened from.
    pub fn save(&self, path: Option<&Path>, options: &SaveOptions) -> Result<()> {
        let target = path.or(self.path.as_deref()).ok_or_else(|| {
            Error::InvalidArgument("no path given and the package was not opened from one".to_string())
        })?;
        let bytes = self.to_bytes(options)?;
        std::fs::write(target, bytes)?;
        tracing::debug!(
            "saved ODF package to {} ({:?})",
            target.display(),
            options.packaging
        );
        Ok(())
    }
}
