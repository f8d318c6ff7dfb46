use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional configuration file in the working directory
pub const CONFIG_FILE_NAME: &str = "cvtailor.toml";

/// Configuration loaded from cvtailor.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Chat completion API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name to use
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature for tailoring requests
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Upper bound on completion tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Timeout in seconds for API requests
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_api_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_api_timeout() -> u64 {
    120
}

/// Job posting fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Timeout in seconds for the job posting download
    #[serde(default = "default_fetch_timeout")]
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_fetch_timeout(),
        }
    }
}

fn default_fetch_timeout() -> u64 {
    20
}

/// Document rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// JSON data file bound into the template
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// DOCX template carrying the directives
    #[serde(default = "default_template_file")]
    pub template_file: PathBuf,
    /// Prefix of the timestamped output document
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            template_file: default_template_file(),
            output_prefix: default_output_prefix(),
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from("resume_data.json")
}

fn default_template_file() -> PathBuf {
    PathBuf::from("CV_Template.docx")
}

fn default_output_prefix() -> String {
    "CV_Customized".to_string()
}

impl Config {
    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))
    }

    /// Try to load config from cvtailor.toml in the given directory
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI overrides into the config
    pub fn with_overrides(
        mut self,
        model: Option<String>,
        base_url: Option<String>,
        timeout: Option<u64>,
    ) -> Self {
        if let Some(m) = model {
            self.openai.model = m;
        }
        if let Some(u) = base_url {
            self.openai.base_url = u;
        }
        if let Some(t) = timeout {
            self.openai.timeout_seconds = t;
        }
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, toml::de::Error),
}
