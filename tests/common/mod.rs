//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::io::{BufRead, BufReader, Cursor, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// A canned response served for one method and path
#[derive(Clone)]
pub struct StubRoute {
    pub method: &'static str,
    pub path: &'static str,
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl StubRoute {
    pub fn get(path: &'static str, body: impl Into<String>) -> Self {
        Self {
            method: "GET",
            path,
            status: 200,
            content_type: "text/html",
            body: body.into(),
        }
    }

    pub fn post_json(path: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self {
            method: "POST",
            path,
            status,
            content_type: "application/json",
            body: body.into(),
        }
    }
}

/// A request the stub server received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Minimal HTTP/1.1 server standing in for the job site and the completion API
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn start(routes: Vec<StubRoute>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
        let base_url = format!("http://{}", listener.local_addr().expect("No local addr"));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                if let Ok(stream) = stream {
                    serve(stream, &routes, &log);
                }
            }
        });

        Self { base_url, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn serve(mut stream: TcpStream, routes: &[StubRoute], log: &Mutex<Vec<RecordedRequest>>) {
    let Some(request) = read_request(&stream) else {
        return;
    };

    let route = routes
        .iter()
        .find(|r| r.method == request.method && r.path == request.path);
    log.lock().unwrap().push(request);

    let (status, content_type, body) = match route {
        Some(r) => (r.status, r.content_type, r.body.clone()),
        None => (404, "text/plain", "not found".to_string()),
    };

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        if status < 400 { "OK" } else { "Error" },
        content_type,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn read_request(stream: &TcpStream) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?;
    let path = target.split('?').next().unwrap_or(target).to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).ok()?;

    Some(RecordedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// Chat completions response body whose first choice carries `content`
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 100, "completion_tokens": 20}
    })
    .to_string()
}

/// Create a working directory with a prompt template and CV
pub fn create_tailor_project() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let project_root = temp_dir.path().to_path_buf();

    fs::write(
        project_root.join("Prompt_Template.mkd"),
        "Tailor the CV to the job.\n===== INPUT A: JOB_SPEC =====\n[PASTE FULL JOB SPEC OR RECRUITER EMAIL HERE]\n===== INPUT B: CV_MD =====\n[PASTE YOUR MARKDOWN CV HERE]\n",
    )
    .expect("Failed to write prompt template");

    fs::write(project_root.join("fullcv.mkd"), "# Jane Doe\n\n- Rust, 8 years\n")
        .expect("Failed to write CV");

    (temp_dir, project_root)
}

/// Point the completion API at the stub server
pub fn write_config(project_root: &Path, base_url: &str) {
    fs::write(
        project_root.join("cvtailor.toml"),
        format!(
            "[openai]\nbase_url = \"{}/v1\"\ntimeout_seconds = 10\n\n[fetch]\ntimeout_seconds = 5\n",
            base_url
        ),
    )
    .expect("Failed to write config");
}

/// Build a minimal DOCX package around a document body
pub fn build_docx(body: &str) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
        body
    );

    let parts = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#.to_string(),
        ),
        (
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#.to_string(),
        ),
        ("word/document.xml", document),
    ];

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        writer
            .start_file(name, SimpleFileOptions::default())
            .expect("Failed to start zip entry");
        writer.write_all(content.as_bytes()).expect("Failed to write zip entry");
    }
    writer.finish().expect("Failed to finish zip").into_inner()
}

/// Read word/document.xml out of a rendered DOCX file
pub fn read_document_xml(path: &Path) -> String {
    let bytes = fs::read(path).expect("Failed to read document");
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("Not a zip archive");
    let mut file = archive.by_name("word/document.xml").expect("No document part");
    let mut xml = String::new();
    file.read_to_string(&mut xml).expect("Document part is not UTF-8");
    xml
}

/// Create a working directory with resume data and a CV template
pub fn create_render_project(data: &serde_json::Value, body: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let project_root = temp_dir.path().to_path_buf();

    fs::write(project_root.join("resume_data.json"), data.to_string())
        .expect("Failed to write resume data");
    fs::write(project_root.join("CV_Template.docx"), build_docx(body))
        .expect("Failed to write template");

    (temp_dir, project_root)
}

/// Rendered documents in a directory, sorted by name
pub fn rendered_documents(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<_> = fs::read_dir(dir)
        .expect("Failed to list directory")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("CV_Customized_") && n.ends_with(".docx"))
        })
        .collect();
    found.sort();
    found
}
