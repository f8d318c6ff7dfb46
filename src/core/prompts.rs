//! Prompts sent to the chat completion API
//!
//! System prompts set the model's behavior; the user message carries the
//! composed prompt template or profile text.

/// System prompt for tailoring a CV to a job posting
pub const SYSTEM_PROMPT_TAILOR: &str = "You are a careful assistant that outputs STRICT JSON only.";

/// System prompt for normalizing a profile into resume data
pub const SYSTEM_PROMPT_NORMALIZE: &str = "Output STRICT JSON only. No markdown.";

/// Sampling temperature for profile normalization
pub const NORMALIZE_TEMPERATURE: f32 = 0.1;

/// Marker identifying the job posting section of a structured template
pub const JOB_SPEC_MARKER: &str = "===== INPUT A: JOB_SPEC =====";

/// Marker identifying the CV section of a structured template
pub const CV_MARKER: &str = "===== INPUT B: CV_MD =====";

const JOB_SPEC_PLACEHOLDER: &str = "[PASTE FULL JOB SPEC OR RECRUITER EMAIL HERE]";
const CV_PLACEHOLDER: &str = "[PASTE YOUR MARKDOWN CV HERE]";

/// Schema instructions for turning profile text into resume data
pub const PROFILE_SCHEMA_PROMPT: &str = concat!(
    "You are a resume data normalizer. Convert the provided LinkedIn profile text into STRICT JSON matching this schema: ",
    r#"{"summary": string, "skills": [string,...], "work_experience": ["#,
    r#"{"job_title": string, "company": string, "location": string, "start_date": string, "end_date": string, "#,
    r#""company_blurb": string, "responsibilities": [string,...], "achievements": [string,...]}], "#,
    r#""early_career": [{"title": string, "company": string, "dates": string}]}. "#,
    "Rules: UK English; dates: Mon YYYY or Present; 3–6 responsibilities, 2–5 achievements per role; ",
    "no invented facts; no code fences; no trailing commas."
);

/// Substitute the job posting and CV into the prompt template
///
/// Templates carrying both input markers have their placeholders replaced in
/// place. Any other template gets both inputs appended as delimited sections.
pub fn build_prompt(template: &str, job_spec: &str, cv_md: &str) -> String {
    if template.contains(JOB_SPEC_MARKER) && template.contains(CV_MARKER) {
        return template
            .replace(JOB_SPEC_PLACEHOLDER, job_spec)
            .replace(CV_PLACEHOLDER, cv_md);
    }

    format!(
        "{template}\n\n{JOB_SPEC_MARKER}\n{job_spec}\n===== END INPUT A =====\n\n{CV_MARKER}\n{cv_md}\n===== END INPUT B =====\n"
    )
}

/// Compose the normalization prompt for a profile's text
pub fn build_profile_prompt(profile_text: &str) -> String {
    format!("{}\n\nLINKEDIN PROFILE TEXT:\n{}", PROFILE_SCHEMA_PROMPT, profile_text)
}
