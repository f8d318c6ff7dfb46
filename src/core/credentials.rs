//! OpenAI API key resolution
//!
//! Sources are checked in priority order:
//! 1. `--api-key` on the command line
//! 2. `--api-key-file` (trimmed file contents)
//! 3. `OPENAI_API_KEY` in the process environment
//! 4. `OPENAI_API_KEY` in a `.env` file in the working directory

use std::path::Path;
use tracing::{debug, warn};

use crate::error::CvTailorError;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Dotenv file looked up in the working directory
pub const DOTENV_FILE: &str = ".env";

/// Resolve the API key from the CLI, the environment value and `.env`
///
/// `env_value` is the `OPENAI_API_KEY` the caller read from its environment;
/// the `.env` file is looked up in `project_root`.
pub fn load_api_key(
    project_root: &Path,
    explicit: Option<&str>,
    key_file: Option<&Path>,
    env_value: Option<String>,
) -> Result<String, CvTailorError> {
    resolve_api_key(explicit, key_file, env_value, &project_root.join(DOTENV_FILE))
}

/// `OPENAI_API_KEY` from the process environment, if set
pub fn env_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV).ok()
}

/// Resolve the API key from explicit sources
///
/// A key file that does not exist is skipped; one that exists but cannot be
/// read is a file-access error. Blank values count as absent.
pub fn resolve_api_key(
    explicit: Option<&str>,
    key_file: Option<&Path>,
    env_value: Option<String>,
    dotenv_path: &Path,
) -> Result<String, CvTailorError> {
    if let Some(key) = explicit.and_then(non_blank) {
        debug!("Using API key from --api-key");
        return Ok(key);
    }

    if let Some(path) = key_file {
        if path.exists() {
            let contents =
                std::fs::read_to_string(path).map_err(|e| CvTailorError::FileAccess {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            if let Some(key) = non_blank(&contents) {
                debug!("Using API key from {}", path.display());
                return Ok(key);
            }
            warn!("API key file {} is empty", path.display());
        } else {
            warn!("API key file {} does not exist, ignoring", path.display());
        }
    }

    if let Some(key) = env_value.as_deref().and_then(non_blank) {
        debug!("Using API key from {}", API_KEY_ENV);
        return Ok(key);
    }

    if let Some(key) = dotenv_api_key(dotenv_path) {
        debug!("Using API key from {}", dotenv_path.display());
        return Ok(key);
    }

    Err(CvTailorError::MissingApiKey)
}

/// Look up the API key in a dotenv file without touching the process environment
fn dotenv_api_key(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }

    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            return None;
        }
    };

    for entry in entries {
        match entry {
            Ok((key, value)) if key == API_KEY_ENV => return non_blank(&value),
            Ok(_) => {}
            Err(e) => warn!("Skipping malformed line in {}: {}", path.display(), e),
        }
    }

    None
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
