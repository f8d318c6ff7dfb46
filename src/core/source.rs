use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

use crate::core::fetch::fetch_text;
use crate::error::CvTailorError;

/// Timeout in seconds for fetching a profile page
pub const PROFILE_FETCH_TIMEOUT: u64 = 25;

/// Where the profile text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSource {
    /// A LinkedIn "Save to PDF" export
    Pdf(PathBuf),
    /// A public page containing the profile text
    Url(String),
    /// A plain text file
    Text(PathBuf),
}

/// Read the profile text from its source
pub async fn read_profile_text(source: &ProfileSource) -> Result<String, CvTailorError> {
    let text = match source {
        ProfileSource::Pdf(path) => read_pdf_text(path)?,
        ProfileSource::Url(url) => fetch_text(url, PROFILE_FETCH_TIMEOUT).await?,
        ProfileSource::Text(path) => {
            std::fs::read_to_string(path).map_err(|e| CvTailorError::FileAccess {
                path: path.clone(),
                source: e,
            })?
        }
    };

    info!("Read {} characters of profile text", text.len());
    Ok(text)
}

/// Extract text from a PDF, preferring `pdftotext -layout` when installed
pub fn read_pdf_text(path: &Path) -> Result<String, CvTailorError> {
    if !path.exists() {
        return Err(CvTailorError::FileAccess {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }

    match which::which("pdftotext") {
        Ok(binary) => {
            debug!("Extracting PDF text with {}", binary.display());
            pdftotext(&binary, path)
        }
        Err(_) => {
            debug!("pdftotext not found on PATH, using built-in extractor");
            pdf_extract::extract_text(path).map_err(|e| CvTailorError::ProfileExtraction {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    }
}

fn pdftotext(binary: &Path, path: &Path) -> Result<String, CvTailorError> {
    let output = Command::new(binary)
        .arg("-layout")
        .arg(path)
        .arg("-")
        .output()
        .map_err(|e| CvTailorError::ProfileExtraction {
            path: path.to_path_buf(),
            message: format!("failed to run pdftotext: {}", e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!("pdftotext exited with {}", output.status);
        return Err(CvTailorError::ProfileExtraction {
            path: path.to_path_buf(),
            message: format!("pdftotext failed: {}", stderr.trim()),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
