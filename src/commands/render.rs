use chrono::Local;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::{load_config, write_timestamped};
use crate::docx::DocxTemplate;
use crate::error::CvTailorError;

/// Render options; unset fields fall back to the [render] config section
#[derive(Debug, Default)]
pub struct RenderOptions {
    /// JSON data file
    pub data: Option<PathBuf>,
    /// DOCX template
    pub template: Option<PathBuf>,
    /// Directory for the rendered document (defaults to the working directory)
    pub output_dir: Option<PathBuf>,
}

/// Render the resume data into the document template
///
/// Writes `{prefix}_{YYYYMMDD-HHMMSS}.docx` and returns its path. Nothing is
/// written when loading or rendering fails.
pub fn run_render(project_root: &Path, options: RenderOptions) -> Result<PathBuf, CvTailorError> {
    let config = load_config(project_root, None, None, None)?;

    let data_path = project_root.join(options.data.unwrap_or(config.render.data_file));
    let template_path = project_root.join(options.template.unwrap_or(config.render.template_file));
    let output_dir = project_root.join(options.output_dir.unwrap_or_default());

    let data = load_data(&data_path)?;
    let template = DocxTemplate::open(&template_path)?;
    info!("Rendering {} with {}", template_path.display(), data_path.display());

    let document = template.render(&data)?;
    let out = write_timestamped(
        &output_dir,
        &config.render.output_prefix,
        &Local::now(),
        &document,
    )?;

    println!("Saved: {}", out.display());
    Ok(out)
}

/// Read and parse the JSON data file
pub fn load_data(path: &Path) -> Result<Value, CvTailorError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CvTailorError::FileAccess {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&contents).map_err(|e| CvTailorError::DataParse {
        path: path.to_path_buf(),
        source: e,
    })
}
