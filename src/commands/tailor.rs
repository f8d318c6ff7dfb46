use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::{
    build_prompt, fetch_text, load_api_key, load_config, parse_model_json, to_compact_json,
    write_replacing, OpenAiClient, SYSTEM_PROMPT_TAILOR,
};
use crate::error::CvTailorError;

/// Tailor options
pub struct TailorOptions {
    /// URL of the job posting
    pub job_url: String,
    /// Prompt template with placeholders for the job posting and CV
    pub prompt: PathBuf,
    /// Markdown CV
    pub cv: PathBuf,
    /// Where to write the tailored resume JSON
    pub out: PathBuf,
    /// Model override
    pub model: Option<String>,
    /// API base URL override
    pub base_url: Option<String>,
    /// API timeout override
    pub timeout: Option<u64>,
    /// API key given on the command line
    pub api_key: Option<String>,
    /// File containing the API key
    pub api_key_file: Option<PathBuf>,
    /// `OPENAI_API_KEY` from the caller's environment
    pub env_api_key: Option<String>,
}

impl TailorOptions {
    pub fn new(job_url: impl Into<String>) -> Self {
        Self {
            job_url: job_url.into(),
            prompt: PathBuf::from("Prompt_Template.mkd"),
            cv: PathBuf::from("fullcv.mkd"),
            out: PathBuf::from("tailored_resume.json"),
            model: None,
            base_url: None,
            timeout: None,
            api_key: None,
            api_key_file: None,
            env_api_key: None,
        }
    }
}

/// Fetch a job posting, tailor the CV to it and write the resume JSON
///
/// Local inputs and the API key are checked before any network request.
/// Returns the path of the written file.
pub async fn run_tailor(
    project_root: &Path,
    options: TailorOptions,
) -> Result<PathBuf, CvTailorError> {
    let config = load_config(project_root, options.model, options.base_url, options.timeout)?;

    let template = read_input(&project_root.join(&options.prompt))?;
    let cv_md = read_input(&project_root.join(&options.cv))?;

    let api_key = load_api_key(
        project_root,
        options.api_key.as_deref(),
        options.api_key_file.as_deref(),
        options.env_api_key,
    )?;

    let job_spec = fetch_text(&options.job_url, config.fetch.timeout_seconds).await?;
    let prompt = build_prompt(&template, &job_spec, &cv_md);
    info!("Composed prompt of {} characters", prompt.len());

    let temperature = config.openai.temperature;
    let client = OpenAiClient::new(config.openai, api_key)?;
    info!("Requesting tailored resume from {}", client.model());
    let reply = client.complete(SYSTEM_PROMPT_TAILOR, &prompt, temperature).await?;

    let data = parse_model_json(&reply)?;
    let out = project_root.join(&options.out);
    write_replacing(&out, to_compact_json(&data)?.as_bytes())?;

    println!("{}", out.display());
    Ok(out)
}

/// Read a UTF-8 input file
pub fn read_input(path: &Path) -> Result<String, CvTailorError> {
    std::fs::read_to_string(path).map_err(|e| CvTailorError::FileAccess {
        path: path.to_path_buf(),
        source: e,
    })
}
