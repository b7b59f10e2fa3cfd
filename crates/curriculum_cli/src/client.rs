//! Blocking HTTP client for the curriculum API.
//!
//! # Responsibility
//! - Map each API route to one typed method.
//! - Turn non-2xx responses into [`ClientError::Api`] using the server's
//!   structured error body when present.

use std::time::Duration;

use curriculum_core::{Course, CourseDraft, CourseId, Program, ProgramDraft, ProgramId};
use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("cannot reach server at {base_url}: {source}")]
    Unreachable {
        base_url: String,
        source: reqwest::Error,
    },
    #[error("{message} (HTTP {status}, {code})")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub message: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
struct Message {
    message: String,
}

pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probes `/health`; connection failures become [`ClientError::Unreachable`].
    pub fn health(&self) -> Result<Health, ClientError> {
        let response = self
            .http
            .get(self.url("/health"))
            .send()
            .map_err(|source| ClientError::Unreachable {
                base_url: self.base_url.clone(),
                source,
            })?;
        decode(response)
    }

    pub fn list_courses(&self, skip: u32, limit: Option<u32>) -> Result<Vec<Course>, ClientError> {
        self.fetch(paginate(self.http.get(self.url("/courses")), skip, limit))
    }

    pub fn get_course(&self, id: CourseId) -> Result<Course, ClientError> {
        self.fetch(self.http.get(self.url(&format!("/courses/{id}"))))
    }

    pub fn create_course(&self, draft: &CourseDraft) -> Result<Course, ClientError> {
        self.fetch(self.http.post(self.url("/courses")).json(draft))
    }

    pub fn update_course(&self, id: CourseId, draft: &CourseDraft) -> Result<Course, ClientError> {
        self.fetch(self.http.put(self.url(&format!("/courses/{id}"))).json(draft))
    }

    pub fn delete_course(&self, id: CourseId) -> Result<(), ClientError> {
        self.execute(self.http.delete(self.url(&format!("/courses/{id}"))))
            .map(|_| ())
    }

    pub fn course_programs(&self, id: CourseId) -> Result<Vec<Program>, ClientError> {
        self.fetch(self.http.get(self.url(&format!("/courses/{id}/programs"))))
    }

    pub fn list_programs(
        &self,
        skip: u32,
        limit: Option<u32>,
    ) -> Result<Vec<Program>, ClientError> {
        self.fetch(paginate(self.http.get(self.url("/programs")), skip, limit))
    }

    pub fn get_program(&self, id: ProgramId) -> Result<Program, ClientError> {
        self.fetch(self.http.get(self.url(&format!("/programs/{id}"))))
    }

    pub fn create_program(&self, draft: &ProgramDraft) -> Result<Program, ClientError> {
        self.fetch(self.http.post(self.url("/programs")).json(draft))
    }

    pub fn update_program(
        &self,
        id: ProgramId,
        draft: &ProgramDraft,
    ) -> Result<Program, ClientError> {
        self.fetch(self.http.put(self.url(&format!("/programs/{id}"))).json(draft))
    }

    pub fn delete_program(&self, id: ProgramId) -> Result<(), ClientError> {
        self.execute(self.http.delete(self.url(&format!("/programs/{id}"))))
            .map(|_| ())
    }

    /// Returns the server's confirmation message.
    pub fn add_course(&self, program_id: ProgramId, course_id: CourseId) -> Result<String, ClientError> {
        let path = format!("/programs/{program_id}/courses/{course_id}");
        let body: Message = self.fetch(self.http.post(self.url(&path)))?;
        Ok(body.message)
    }

    /// Returns the server's confirmation message.
    pub fn remove_course(
        &self,
        program_id: ProgramId,
        course_id: CourseId,
    ) -> Result<String, ClientError> {
        let path = format!("/programs/{program_id}/courses/{course_id}");
        let body: Message = self.fetch(self.http.delete(self.url(&path)))?;
        Ok(body.message)
    }

    pub fn available_courses(&self, program_id: ProgramId) -> Result<Vec<Course>, ClientError> {
        self.fetch(
            self.http
                .get(self.url(&format!("/programs/{program_id}/available-courses"))),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        decode(self.execute(request)?)
    }

    fn execute(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send()?;
        debug!(
            "event=api_call module=client status={} url={}",
            response.status().as_u16(),
            response.url()
        );
        ensure_success(response)
    }
}

fn paginate(request: RequestBuilder, skip: u32, limit: Option<u32>) -> RequestBuilder {
    let request = request.query(&[("skip", skip)]);
    match limit {
        Some(limit) => request.query(&[("limit", limit)]),
        None => request,
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(ensure_success(response)?.json()?)
}

fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().unwrap_or_default();
    let (code, message) = parse_error_body(&text);
    Err(ClientError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}

/// Extracts `(code, message)` from a `{"error": {"code", "message"}}` body.
/// Anything else is reported verbatim with code `UNKNOWN`.
pub fn parse_error_body(text: &str) -> (String, String) {
    #[derive(Deserialize)]
    struct Detail {
        code: String,
        message: String,
    }
    #[derive(Deserialize)]
    struct Envelope {
        error: Detail,
    }

    match serde_json::from_str::<Envelope>(text) {
        Ok(envelope) => (envelope.error.code, envelope.error.message),
        Err(_) => {
            let message = text.trim();
            let message = if message.is_empty() {
                "empty response body"
            } else {
                message
            };
            ("UNKNOWN".to_string(), message.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_error_body_is_parsed() {
        let (code, message) = parse_error_body(
            r#"{"success":false,"error":{"code":"CONFLICT","message":"course 1 is already in program 2"}}"#,
        );
        assert_eq!(code, "CONFLICT");
        assert_eq!(message, "course 1 is already in program 2");
    }

    #[test]
    fn plain_text_error_body_is_kept() {
        let (code, message) = parse_error_body("Invalid URL: Cannot parse `abc`\n");
        assert_eq!(code, "UNKNOWN");
        assert_eq!(message, "Invalid URL: Cannot parse `abc`");
    }

    #[test]
    fn empty_error_body_has_placeholder_message() {
        assert_eq!(parse_error_body("  ").1, "empty response body");
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/health"), "http://localhost:8000/health");
    }

    #[test]
    fn not_found_detection() {
        let err = ClientError::Api {
            status: 404,
            code: "NOT_FOUND".into(),
            message: "course 3 not found".into(),
        };
        assert!(err.is_not_found());
    }
}
