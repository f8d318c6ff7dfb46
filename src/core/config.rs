use std::path::Path;
use tracing::info;

use crate::error::CvTailorError;
use crate::models::Config;

/// Load configuration from the working directory with CLI overrides
pub fn load_config(
    project_root: &Path,
    model: Option<String>,
    base_url: Option<String>,
    timeout: Option<u64>,
) -> Result<Config, CvTailorError> {
    let config = Config::load_from_dir(project_root)?;
    let config = config.with_overrides(model, base_url, timeout);

    info!(
        "Configuration loaded: model={}, base_url={}, timeout={}s",
        config.openai.model, config.openai.base_url, config.openai.timeout_seconds
    );

    Ok(config)
}
