//! ODF template package access
//!
//! An ODF document is a ZIP package. Only the two content parts are parsed
//! and handed to callers; every other entry is copied through unchanged.

use crate::error::ReportError;
use crate::xml::Document;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use zip::read::ZipArchive;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Package entries holding document markup: body, then styles with headers and footers
pub const CONTENT_PARTS: [&str; 2] = ["content.xml", "styles.xml"];

/// Package entry that must be stored uncompressed
const MIMETYPE: &str = "mimetype";

/// A template package held in memory
#[derive(Debug, Clone)]
pub struct Template {
    data: Vec<u8>,
}

impl Template {
    /// Load a template from disk
    ///
    /// # Parameters
    /// * `path` - Path to an `.odt` (or other ODF) file
    ///
    /// # Returns
    /// * `Ok(Template)` - Template bytes loaded
    /// * `Err(ReportError::TemplateNotFound)` - No file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ReportError::TemplateNotFound(PathBuf::from(path)));
        }
        log::debug!("Reading template {}", path.display());
        Ok(Self::from_bytes(std::fs::read(path)?))
    }

    /// Wrap template bytes already in memory
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    /// Raw package bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Parse each content part and hand it to `visit`
    ///
    /// Parts are visited in package order.
    pub fn read_content<F>(&self, mut visit: F) -> Result<(), ReportError>
    where
        F: FnMut(&str, &Document) -> Result<(), ReportError>,
    {
        let mut archive = self.archive()?;
        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            let name = file.name().to_string();
            if !is_content_part(&name) {
                continue;
            }
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            visit(&name, &parse_part(&name, &contents)?)?;
        }
        Ok(())
    }

    /// Build a new package with each content part patched by `patch`
    ///
    /// Every content part is parsed into a fresh tree, patched and
    /// re-serialized. Other entries are copied byte for byte; stored entries
    /// stay stored and `mimetype` is always stored.
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - The patched package
    /// * `Err(ReportError)` - A content part is missing or invalid, or `patch` failed
    pub fn update_content<F>(&self, mut patch: F) -> Result<Vec<u8>, ReportError>
    where
        F: FnMut(&str, &mut Document) -> Result<(), ReportError>,
    {
        let mut archive = self.archive()?;
        for part in CONTENT_PARTS {
            if !archive.file_names().any(|name| name == part) {
                return Err(ReportError::MissingPart(part.to_string()));
            }
        }

        let mut output = ZipWriter::new(Cursor::new(Vec::new()));
        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            let name = file.name().to_string();

            if file.is_dir() {
                output.add_directory(name, SimpleFileOptions::default())?;
                continue;
            }

            let method = match file.compression() {
                _ if name == MIMETYPE => CompressionMethod::Stored,
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;

            if is_content_part(&name) {
                let mut doc = parse_part(&name, &contents)?;
                patch(&name, &mut doc)?;
                let xml = doc.to_xml().map_err(|source| ReportError::Xml {
                    part: name.clone(),
                    source,
                })?;
                contents = xml.into_bytes();
            }

            output.start_file(name, SimpleFileOptions::default().compression_method(method))?;
            output.write_all(&contents)?;
        }

        Ok(output.finish()?.into_inner())
    }

    fn archive(&self) -> Result<ZipArchive<Cursor<&[u8]>>, ReportError> {
        Ok(ZipArchive::new(Cursor::new(self.data.as_slice()))?)
    }
}

fn is_content_part(name: &str) -> bool {
    CONTENT_PARTS.contains(&name)
}

fn parse_part(name: &str, bytes: &[u8]) -> Result<Document, ReportError> {
    Document::from_bytes(bytes).map_err(|source| ReportError::Xml {
        part: name.to_string(),
        source,
    })
}
