#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use recruitflow::config::Config;
use recruitflow::{create_app, db, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const BODY_LIMIT: usize = 16 * 1024 * 1024;
const BOUNDARY: &str = "recruitflow-test-boundary";

pub const PASSWORD: &str = "correct horse battery staple";

/// One part of a `multipart/form-data` body.
pub enum FormPart<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// A fully wired application over a throwaway SQLite file and upload directory.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub prefix: String,
    pub upload_dir: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = Config {
            database_url: format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display()),
            resume_upload_dir: dir.path().join("uploads").join("resumes"),
            secret_key: "integration-test-secret".to_string(),
            ..Config::default()
        };
        customize(&mut config);

        let conn = db::connect(&config.database_url).await.expect("connect");
        db::migrate(&conn).await.expect("migrate");

        let prefix = config.api_prefix.clone();
        let upload_dir = config.resume_upload_dir.clone();
        let state = AppState::new(conn, config).expect("state");
        let router = create_app(state.clone());

        Self {
            state,
            router,
            prefix,
            upload_dir,
            _dir: dir,
        }
    }

    pub fn api(&self, path: &str) -> String {
        format!("{}{}", self.prefix, path)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
        };
        (status, json)
    }

    fn builder(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match token {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        let request = Self::builder("GET", &self.api(path), token)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// GET without the API prefix, returning the raw body.
    pub async fn get_raw(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
        (status, body.to_vec())
    }

    pub async fn post_json(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.json_request("POST", path, token, body).await
    }

    pub async fn patch_json(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.json_request("PATCH", path, token, body).await
    }

    async fn json_request(&self, method: &str, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let request = Self::builder(method, &self.api(path), token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_multipart(&self, path: &str, token: Option<&str>, parts: &[FormPart<'_>]) -> (StatusCode, Value) {
        let request = Self::builder("POST", &self.api(path), token)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        self.send(request).await
    }

    pub async fn register(&self, email: &str, role: &str, full_name: &str) -> Value {
        let (status, body) = self
            .post_json(
                "/auth/register",
                None,
                json!({"email": email, "password": PASSWORD, "role": role, "full_name": full_name}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body
    }

    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .post_json("/auth/login", None, json!({"email": email, "password": PASSWORD}))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn candidate(&self, email: &str) -> String {
        self.register(email, "candidate", "Casey Candidate").await;
        self.login(email).await
    }

    pub async fn recruiter(&self, email: &str) -> String {
        self.register(email, "recruiter", "Riley Recruiter").await;
        self.login(email).await
    }

    pub async fn create_job(&self, token: &str, body: Value) -> Value {
        let (status, job) = self.post_json("/recruiter/jobs", Some(token), body).await;
        assert_eq!(status, StatusCode::CREATED, "create job failed: {job}");
        job
    }

    /// An open job with the default pipeline.
    pub async fn open_job(&self, token: &str, title: &str) -> Value {
        self.create_job(token, job_payload(title)).await
    }

    pub async fn apply(&self, token: &str, job_id: i64) -> (StatusCode, Value) {
        let job_id = job_id.to_string();
        self.post_multipart(
            "/candidate/applications",
            Some(token),
            &[FormPart::Text("job_id", &job_id)],
        )
        .await
    }
}

pub fn job_payload(title: &str) -> Value {
    json!({
        "title": title,
        "company": "Acme",
        "location": "Remote",
        "description": "Build things",
    })
}

pub fn id_of(value: &Value) -> i64 {
    value["id"].as_i64().expect("id")
}

pub fn stage_names(job: &Value) -> Vec<String> {
    job["stages"]
        .as_array()
        .expect("stages")
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect()
}

fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            FormPart::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
