//! Output file writing.
//!
//! Every write goes through a temporary file in the destination directory, so
//! a run that fails part-way leaves no output behind.

use chrono::{DateTime, Local};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::CvTailorError;

/// Sortable timestamp embedded in rendered document names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Extension of rendered documents
pub const DOCUMENT_EXTENSION: &str = "docx";

/// Upper bound on same-second suffixes tried before giving up
const MAX_NAME_ATTEMPTS: usize = 100;

/// Write a file atomically, replacing any existing file at `path`
pub fn write_replacing(path: &Path, bytes: &[u8]) -> Result<(), CvTailorError> {
    let tmp = stage(path, bytes)?;
    tmp.persist(path).map_err(|e| CvTailorError::FileWrite {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// File name for a document rendered at `at`
pub fn timestamped_name(prefix: &str, at: &DateTime<Local>) -> String {
    format!("{}_{}.{}", prefix, at.format(TIMESTAMP_FORMAT), DOCUMENT_EXTENSION)
}

/// Write a document under a timestamped name in `dir`, never overwriting
///
/// A same-second collision gets a `-1`, `-2`, ... suffix after the stamp.
pub fn write_timestamped(
    dir: &Path,
    prefix: &str,
    at: &DateTime<Local>,
    bytes: &[u8],
) -> Result<PathBuf, CvTailorError> {
    let stamp = at.format(TIMESTAMP_FORMAT).to_string();
    let mut tmp = stage(&dir.join(timestamped_name(prefix, at)), bytes)?;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let name = if attempt == 0 {
            timestamped_name(prefix, at)
        } else {
            format!("{}_{}-{}.{}", prefix, stamp, attempt, DOCUMENT_EXTENSION)
        };
        let path = dir.join(name);

        match tmp.persist_noclobber(&path) {
            Ok(_) => {
                info!("Wrote {} bytes to {}", bytes.len(), path.display());
                return Ok(path);
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                debug!("{} already exists, trying next name", path.display());
                tmp = e.file;
            }
            Err(e) => {
                return Err(CvTailorError::FileWrite { path, source: e.error });
            }
        }
    }

    Err(CvTailorError::FileWrite {
        path: dir.join(timestamped_name(prefix, at)),
        source: io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} documents already exist for this second", MAX_NAME_ATTEMPTS),
        ),
    })
}

/// Write bytes to a temporary file next to `target`
fn stage(target: &Path, bytes: &[u8]) -> Result<NamedTempFile, CvTailorError> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let to_write_error = |source: io::Error| CvTailorError::FileWrite {
        path: target.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(to_write_error)?;
    tmp.write_all(bytes).map_err(to_write_error)?;
    tmp.as_file().sync_all().map_err(to_write_error)?;
    Ok(tmp)
}
