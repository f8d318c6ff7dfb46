use std::path::PathBuf;
use thiserror::Error;

use crate::models::ConfigError;

/// Main error type for cv-tailor
#[derive(Error, Debug)]
pub enum CvTailorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error fetching {0}")]
    Fetch(#[from] FetchError),

    #[error("OpenAI API key not provided. Set OPENAI_API_KEY (or add it to .env), use --api-key, or --api-key-file.")]
    MissingApiKey,

    #[error("OpenAI error: {0}")]
    OpenAi(#[from] OpenAiError),

    #[error("Model did not return valid JSON: {source}")]
    InvalidModelJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse JSON data in {path}: {source}")]
    DataParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not extract profile text from {path}: {message}")]
    ProfileExtraction { path: PathBuf, message: String },

    #[error("Document error: {0}")]
    Docx(#[from] DocxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CvTailorError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CvTailorError::FileAccess { .. }
            | CvTailorError::FileWrite { .. }
            | CvTailorError::ProfileExtraction { .. }
            | CvTailorError::Io(_) => 1,
            CvTailorError::Fetch(_) => 2,
            CvTailorError::MissingApiKey => 3,
            CvTailorError::OpenAi(OpenAiError::Unauthorized { .. }) => 3,
            CvTailorError::OpenAi(_) => 4,
            CvTailorError::InvalidModelJson { .. } | CvTailorError::DataParse { .. } => 5,
            CvTailorError::Config(_) => 6,
            CvTailorError::Docx(_) => 7,
        }
    }

    /// Format the error for display, including the raw model output when relevant
    pub fn display_with_details(&self) -> String {
        match self {
            CvTailorError::InvalidModelJson { raw, .. } => {
                format!("Error: {}\nRaw output:\n{}", self, raw)
            }
            other => format!("Error: {}", other),
        }
    }
}

/// Errors related to downloading the job posting or profile page
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{url}: invalid URL ({message})")]
    InvalidUrl { url: String, message: String },

    #[error("{url}: request timed out after {seconds} seconds")]
    Timeout { url: String, seconds: u64 },

    #[error("{url}: HTTP status {status}")]
    Status { url: String, status: u16 },

    #[error("{url}: {message}")]
    RequestFailed { url: String, message: String },
}

/// Errors related to the chat completion API
#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Authentication rejected (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Empty response from model")]
    EmptyResponse,
}

/// Errors related to reading, rendering and writing DOCX documents
#[derive(Error, Debug)]
pub enum DocxError {
    #[error("Failed to read template {path}: {source}")]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid document archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Document is missing required part {0}")]
    MissingPart(String),

    #[error("Part {part} is not valid UTF-8")]
    Encoding { part: String },

    #[error("Template syntax error in {part}: {message}")]
    TemplateSyntax { part: String, message: String },

    #[error("Template in {part} references undefined field '{name}'")]
    UndefinedReference { part: String, name: String },

    #[error("Failed to render {part}: {message}")]
    Render { part: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CvTailorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_error_taxonomy() {
        let missing = CvTailorError::FileAccess {
            path: PathBuf::from("fullcv.mkd"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(missing.exit_code(), 1);

        let fetch = CvTailorError::Fetch(FetchError::Status {
            url: "https://jobs.example.com/1".to_string(),
            status: 404,
        });
        assert_eq!(fetch.exit_code(), 2);

        assert_eq!(CvTailorError::MissingApiKey.exit_code(), 3);

        let rejected = CvTailorError::OpenAi(OpenAiError::Unauthorized {
            status: 401,
            message: "bad key".to_string(),
        });
        assert_eq!(rejected.exit_code(), 3);

        assert_eq!(CvTailorError::OpenAi(OpenAiError::EmptyResponse).exit_code(), 4);

        let undefined = CvTailorError::Docx(DocxError::UndefinedReference {
            part: "word/document.xml".to_string(),
            name: "summary".to_string(),
        });
        assert_eq!(undefined.exit_code(), 7);
    }

    #[test]
    fn test_display_with_details_includes_raw_output() {
        let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error = CvTailorError::InvalidModelJson {
            raw: "Sure! Here is your CV".to_string(),
            source,
        };

        let display = error.display_with_details();
        assert!(display.starts_with("Error: Model did not return valid JSON"));
        assert!(display.contains("Raw output:\nSure! Here is your CV"));
        assert_eq!(error.exit_code(), 5);
    }

    #[test]
    fn test_missing_api_key_message_lists_sources() {
        let message = CvTailorError::MissingApiKey.to_string();
        assert!(message.contains("OPENAI_API_KEY"));
        assert!(message.contains("--api-key"));
        assert!(message.contains("--api-key-file"));
    }
}
