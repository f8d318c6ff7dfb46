//! cv-tailor - tailor a Markdown CV to a job posting and render it into DOCX
//!
//! Three command-line programs share this library:
//!
//! - `tailor-cv` fetches a job posting, merges it with the CV into a prompt
//!   template and asks a chat completion API for tailored resume JSON.
//! - `render-cv` renders resume JSON into a DOCX template and writes a
//!   timestamped document.
//! - `update-resume` normalizes a profile (PDF, URL or text) into resume JSON.
//!
//! # Architecture
//!
//! - **commands**: the three pipelines
//! - **core**: config loading, API key resolution, HTTP fetch, chat client,
//!   prompts, response parsing, output writing, profile sources
//! - **docx**: DOCX template rendering
//! - **models**: configuration structures
//! - **error**: error types

pub mod commands;
pub mod core;
pub mod docx;
pub mod error;
pub mod logging;
pub mod models;

pub use error::{CvTailorError, Result};
