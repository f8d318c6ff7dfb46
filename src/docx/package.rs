use std::io::{Cursor, Read, Write};
use std::path::Path;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::DocxError;

/// Main document part every DOCX package must contain
pub const MAIN_DOCUMENT_PART: &str = "word/document.xml";

/// A single part (zip entry) of a DOCX package
#[derive(Debug, Clone)]
pub struct PartEntry {
    pub name: String,
    pub compression: CompressionMethod,
    pub data: Vec<u8>,
}

/// In-memory DOCX package, kept in the original entry order
#[derive(Debug, Clone)]
pub struct DocxPackage {
    entries: Vec<PartEntry>,
}

impl DocxPackage {
    /// Read a package from disk
    pub fn open(path: &Path) -> Result<Self, DocxError> {
        let bytes = std::fs::read(path).map_err(|e| DocxError::ReadTemplate {
            path: path.to_path_buf(),
            source: e,
        })?;
        let package = Self::from_bytes(&bytes)?;
        debug!("Loaded {} parts from {}", package.entries.len(), path.display());
        Ok(package)
    }

    /// Read a package from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            entries.push(PartEntry {
                name: file.name().to_string(),
                compression: file.compression(),
                data,
            });
        }

        Self::from_entries(entries)
    }

    /// Build a package from parts; the main document part is required
    pub fn from_entries(entries: Vec<PartEntry>) -> Result<Self, DocxError> {
        if !entries.iter().any(|e| e.name == MAIN_DOCUMENT_PART) {
            return Err(DocxError::MissingPart(MAIN_DOCUMENT_PART.to_string()));
        }
        Ok(Self { entries })
    }

    /// Look up a part by name
    pub fn part(&self, name: &str) -> Option<&PartEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn entries(&self) -> &[PartEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [PartEntry] {
        &mut self.entries
    }

    /// Serialize the package back into a zip archive
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for entry in &self.entries {
            let options =
                SimpleFileOptions::default().compression_method(writable(entry.compression));
            writer.start_file(entry.name.as_str(), options)?;
            writer.write_all(&entry.data)?;
        }

        Ok(writer.finish()?.into_inner())
    }
}

/// Compression to write an entry with; methods we cannot write fall back to deflate
fn writable(method: CompressionMethod) -> CompressionMethod {
    match method {
        CompressionMethod::Stored => CompressionMethod::Stored,
        _ => CompressionMethod::Deflated,
    }
}
