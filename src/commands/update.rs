use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::{
    build_profile_prompt, load_api_key, load_config, parse_model_json, read_profile_text,
    to_compact_json, write_replacing, OpenAiClient, ProfileSource, NORMALIZE_TEMPERATURE,
    SYSTEM_PROMPT_NORMALIZE,
};
use crate::error::CvTailorError;

/// Update options
pub struct UpdateOptions {
    /// Where the profile text comes from
    pub source: ProfileSource,
    /// Where to write the resume JSON
    pub out: PathBuf,
    /// Model override
    pub model: Option<String>,
    /// API key given on the command line
    pub api_key: Option<String>,
    /// File containing the API key
    pub api_key_file: Option<PathBuf>,
    /// `OPENAI_API_KEY` from the caller's environment
    pub env_api_key: Option<String>,
}

impl UpdateOptions {
    pub fn new(source: ProfileSource) -> Self {
        Self {
            source,
            out: PathBuf::from("resume_data.json"),
            model: None,
            api_key: None,
            api_key_file: None,
            env_api_key: None,
        }
    }
}

/// Normalize a profile into resume data for the document template
pub async fn run_update(
    project_root: &Path,
    options: UpdateOptions,
) -> Result<PathBuf, CvTailorError> {
    let config = load_config(project_root, options.model, None, None)?;

    let api_key = load_api_key(
        project_root,
        options.api_key.as_deref(),
        options.api_key_file.as_deref(),
        options.env_api_key,
    )?;

    let source = match options.source {
        ProfileSource::Pdf(path) => ProfileSource::Pdf(project_root.join(path)),
        ProfileSource::Text(path) => ProfileSource::Text(project_root.join(path)),
        url => url,
    };
    let text = read_profile_text(&source).await?;

    let client = OpenAiClient::new(config.openai, api_key)?;
    info!("Normalizing profile with {}", client.model());
    let reply = client
        .complete(SYSTEM_PROMPT_NORMALIZE, &build_profile_prompt(&text), NORMALIZE_TEMPERATURE)
        .await?;

    let data = parse_model_json(&reply)?;
    let out = project_root.join(&options.out);
    write_replacing(&out, to_compact_json(&data)?.as_bytes())?;

    println!("{}", out.display());
    Ok(out)
}
