//! Integration tests for rendering resume data into a DOCX template

use chrono::{Local, NaiveDateTime, TimeZone};
use cv_tailor::commands::{run_render, RenderOptions};
use cv_tailor::error::{CvTailorError, DocxError};
use serde_json::json;
use std::fs;

mod common;

use common::{create_render_project, read_document_xml, rendered_documents};

const SUMMARY_BODY: &str = concat!(
    "<w:p><w:r><w:t>{{name}}</w:t></w:r></w:p>",
    "<w:p><w:r><w:t>{{</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>summary}}</w:t></w:r></w:p>",
);

#[test]
fn test_render_writes_timestamped_document() {
    let data = json!({"name": "Jane Doe", "summary": "Rust & distributed systems"});
    let (_temp_dir, project_root) = create_render_project(&data, SUMMARY_BODY);

    let out = run_render(&project_root, RenderOptions::default()).unwrap();

    assert!(fs::metadata(&out).unwrap().len() > 0);
    assert_eq!(out.parent(), Some(project_root.as_path()));

    let name = out.file_name().unwrap().to_str().unwrap();
    let stamp = name
        .strip_prefix("CV_Customized_")
        .and_then(|rest| rest.get(..15))
        .expect("Unexpected document name");
    let naive = NaiveDateTime::parse_from_str(stamp, "%Y%m%d-%H%M%S").unwrap();
    let at = Local.from_local_datetime(&naive).earliest().unwrap();
    let drift = Local::now().signed_duration_since(at).num_seconds().abs();
    assert!(drift < 120, "Timestamp {} is {}s away from now", stamp, drift);

    let xml = read_document_xml(&out);
    assert!(xml.contains("Jane Doe"));
    assert!(xml.contains("Rust &amp; distributed systems"));
    assert!(!xml.contains("{{"));
}

#[test]
fn test_undefined_field_writes_nothing() {
    let data = json!({"name": "Jane Doe"});
    let (_temp_dir, project_root) = create_render_project(&data, SUMMARY_BODY);

    let err = run_render(&project_root, RenderOptions::default()).unwrap_err();

    match &err {
        CvTailorError::Docx(DocxError::UndefinedReference { name, .. }) => {
            assert!(name.contains("summary"))
        }
        other => panic!("Expected UndefinedReference, got {:?}", other),
    }
    assert_eq!(err.exit_code(), 7);
    assert!(rendered_documents(&project_root).is_empty());
}

#[test]
fn test_repeated_runs_never_overwrite() {
    let data = json!({"name": "Jane Doe", "summary": "Same second"});
    let (_temp_dir, project_root) = create_render_project(&data, SUMMARY_BODY);

    let first = run_render(&project_root, RenderOptions::default()).unwrap();
    let second = run_render(&project_root, RenderOptions::default()).unwrap();

    assert_ne!(first, second);
    assert_eq!(rendered_documents(&project_root).len(), 2);
}

#[test]
fn test_loop_repeats_table_rows() {
    let data = json!({
        "name": "Jane Doe",
        "early_career": [
            {"title": "Engineer", "company": "Acme"},
            {"title": "Intern", "company": "Initech"}
        ]
    });
    let body = concat!(
        "<w:p><w:r><w:t>{{name}}</w:t></w:r></w:p>",
        "<w:tbl>",
        "<w:tr><w:tc><w:p><w:r><w:t>{{#each early_career}}</w:t></w:r></w:p></w:tc></w:tr>",
        "<w:tr><w:tc><w:p><w:r><w:t>{{title}}</w:t></w:r></w:p></w:tc>",
        "<w:tc><w:p><w:r><w:t>{{company}}</w:t></w:r></w:p></w:tc></w:tr>",
        "<w:tr><w:tc><w:p><w:r><w:t>{{/each}}</w:t></w:r></w:p></w:tc></w:tr>",
        "</w:tbl>",
    );
    let (_temp_dir, project_root) = create_render_project(&data, body);

    let out = run_render(&project_root, RenderOptions::default()).unwrap();
    let xml = read_document_xml(&out);

    assert_eq!(xml.matches("<w:tr>").count(), 2);
    assert!(xml.contains(">Engineer</w:t>"));
    assert!(xml.contains(">Initech</w:t>"));
    assert!(!xml.contains("each"));
}

#[test]
fn test_empty_optional_section_leaves_no_blank_paragraphs() {
    let data = json!({"name": "Jane Doe", "certifications": []});
    let body = concat!(
        "<w:p><w:r><w:t>{{name}}</w:t></w:r></w:p>",
        "<w:p><w:r><w:t>{{#each certifications}}</w:t></w:r></w:p>",
        "<w:p><w:r><w:t>{{this}}</w:t></w:r></w:p>",
        "<w:p><w:r><w:t>{{/each}}</w:t></w:r></w:p>",
        "<w:p><w:r><w:t></w:t></w:r></w:p>",
    );
    let (_temp_dir, project_root) = create_render_project(&data, body);

    let out = run_render(&project_root, RenderOptions::default()).unwrap();
    let xml = read_document_xml(&out);

    assert_eq!(xml.matches("<w:p>").count(), 1);
    assert!(xml.contains("<w:sectPr/>"));
}

#[test]
fn test_custom_paths_and_output_dir() {
    let data = json!({"name": "Jane Doe", "summary": "Moved"});
    let (_temp_dir, project_root) = create_render_project(&data, SUMMARY_BODY);
    fs::rename(project_root.join("resume_data.json"), project_root.join("tailored_resume.json"))
        .unwrap();
    fs::create_dir(project_root.join("out")).unwrap();

    let options = RenderOptions {
        data: Some("tailored_resume.json".into()),
        template: None,
        output_dir: Some("out".into()),
    };
    let out = run_render(&project_root, options).unwrap();

    assert_eq!(out.parent(), Some(project_root.join("out").as_path()));
    assert!(read_document_xml(&out).contains("Moved"));
}
