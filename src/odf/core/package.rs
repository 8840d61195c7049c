//! ODF package (ZIP archive) reading.

use crate::common::{Error, Result};
use crate::odf::constants::ODF_MIMETYPE;
use std::io::{Read, Seek};

/// An ODF package opened for reading
pub struct Package<R> {
    archive: zip::ZipArchive<R>,
    mimetype: String,
}

impl<R: Read + Seek> Package<R> {
    /// Open an ODF package from a reader
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)
            .map_err(|_| Error::InvalidFormat("Invalid ZIP archive".to_string()))?;

        let mimetype = Self::read_mimetype(&mut archive)?;

        Ok(Self { archive, mimetype })
    }

    /// Read MIME type from the mimetype file
    fn read_mimetype(archive: &mut zip::ZipArchive<R>) -> Result<String> {
        let mut mimetype_file = archive.by_name(ODF_MIMETYPE).map_err(|_| {
            Error::InvalidFormat("No mimetype file found in ODF package".to_string())
        })?;

        let mut content = String::new();
        mimetype_file.read_to_string(&mut content)?;
        Ok(content.trim().to_string())
    }

    /// Get the MIME type from the mimetype file
    pub fn mimetype(&self) -> &str {
        &self.mimetype
    }

    /// Read every file member except `mimetype`, in archive order.
    ///
    /// Directory entries carry no data and are skipped.
    pub fn into_members(mut self) -> Result<Vec<(String, Vec<u8>)>> {
        let mut members = Vec::with_capacity(self.archive.len());
        for i in 0..self.archive.len() {
            let mut file = self.archive.by_index(i)?;
            if file.is_dir() || file.name() == ODF_MIMETYPE {
                continue;
            }
            let name = file.name().to_string();
            let mut content = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut content)?;
            members.push((name, content));
        }
        Ok(members)
    }
}
