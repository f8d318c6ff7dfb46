use handlebars::{Handlebars, RenderError, RenderErrorReason};
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

use super::cleanup::remove_empty_paragraphs;
use super::package::DocxPackage;
use super::preprocess::prepare;
use super::xml::escape;
use crate::error::DocxError;

static TEMPLATED_PART_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^word/(?:document|header\d*|footer\d*|footnotes|endnotes)\.xml$")
        .expect("part pattern is valid")
});

/// Line break inside a run, emitted for newlines in substituted values
const RUN_LINE_BREAK: &str = r#"</w:t><w:br/><w:t xml:space="preserve">"#;

/// A DOCX template whose body, headers, footers and notes carry directives
pub struct DocxTemplate {
    package: DocxPackage,
}

impl DocxTemplate {
    /// Load a template from disk
    pub fn open(path: &Path) -> Result<Self, DocxError> {
        Ok(Self { package: DocxPackage::open(path)? })
    }

    /// Wrap an already loaded package
    pub fn from_package(package: DocxPackage) -> Self {
        Self { package }
    }

    /// Render the template with `data`, returning the finished document bytes
    ///
    /// Directives referencing fields absent from `data` fail the whole render.
    pub fn render(&self, data: &Value) -> Result<Vec<u8>, DocxError> {
        let engine = template_engine();
        let mut rendered = self.package.clone();
        let mut count = 0;

        for part in rendered.entries_mut() {
            if !is_templated_part(&part.name) {
                continue;
            }

            let xml = std::str::from_utf8(&part.data)
                .map_err(|_| DocxError::Encoding { part: part.name.clone() })?;
            let prepared = prepare(&part.name, xml)?;

            let output = engine
                .render_template(&prepared, data)
                .map_err(|e| render_error(&part.name, e))?;

            part.data = remove_empty_paragraphs(&output).into_bytes();
            count += 1;
            debug!("Rendered {}", part.name);
        }

        info!("Rendered {} document parts", count);
        rendered.to_bytes()
    }
}

/// Whether a package part is rendered as a template
pub fn is_templated_part(name: &str) -> bool {
    TEMPLATED_PART_RE.is_match(name)
}

fn template_engine() -> Handlebars<'static> {
    let mut engine = Handlebars::new();
    engine.set_strict_mode(true);
    engine.register_escape_fn(escape_value);
    engine
}

/// Escape a substituted value for run text, turning newlines into line breaks
pub fn escape_value(value: &str) -> String {
    value
        .split('\n')
        .map(|line| escape(line.trim_end_matches('\r')))
        .collect::<Vec<_>>()
        .join(RUN_LINE_BREAK)
}

fn render_error(part: &str, error: RenderError) -> DocxError {
    match error.reason() {
        RenderErrorReason::MissingVariable(name) => DocxError::UndefinedReference {
            part: part.to_string(),
            name: name.clone().unwrap_or_else(|| "<unknown>".to_string()),
        },
        RenderErrorReason::TemplateError(e) => DocxError::TemplateSyntax {
            part: part.to_string(),
            message: e.to_string(),
        },
        _ => DocxError::Render {
            part: part.to_string(),
            message: error.to_string(),
        },
    }
}
