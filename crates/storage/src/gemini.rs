//! Gemini
//!
//! Text generation through the `generateContent` endpoint of the Gemini REST API. Only the text
//! of the first candidate is used.

use std::time::Duration;

use club38_domain as domain;
use log::{debug, error};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Clone)]
pub struct Gemini {
    client: Client,
    config: GeminiConfig,
}

impl Gemini {
    pub fn new(config: GeminiConfig) -> Result<Self, domain::GenerateError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| domain::GenerateError::Transport(err.to_string()))?;
        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl domain::TextGenerator for Gemini {
    async fn generate_text(&self, prompt: &str) -> Result<String, domain::GenerateError> {
        let Some(api_key) = &self.config.api_key else {
            return Err(domain::GenerateError::MissingApiKey);
        };

        debug!("sending prompt to {}", self.config.model);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&json!({ "contents": [{ "parts": [{ "text": prompt }] }] }))
            .send()
            .await
            .map_err(|err| domain::GenerateError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| domain::GenerateError::Transport(err.to_string()))?;

        if !status.is_success() {
            error!("Gemini request failed with status {status}");
            return Err(domain::GenerateError::Http {
                status: status.as_u16(),
                message: error_message(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string()),
            });
        }

        candidate_text(&body)
    }
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|response| response.error.message)
}

fn candidate_text(body: &str) -> Result<String, domain::GenerateError> {
    let response = serde_json::from_str::<GeminiResponse>(body)
        .map_err(|err| domain::GenerateError::Envelope(err.to_string()))?;

    if let Some(error) = response.error {
        return Err(domain::GenerateError::Envelope(error.message));
    }

    response
        .candidates
        .into_iter()
        .flatten()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| domain::GenerateError::Envelope("no candidate text".to_string()))
}

#[cfg(test)]
mod tests {
    use club38_domain::TextGenerator;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    use super::*;

    const PATH: &str = "/models/gemini-1.5-flash-latest:generateContent";

    fn gemini(server: &MockServer, api_key: Option<&str>) -> Gemini {
        Gemini::new(GeminiConfig {
            api_key: api_key.map(ToString::to_string),
            base_url: server.uri(),
            timeout: Duration::from_millis(500),
            ..GeminiConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_json(json!({
                "contents": [{ "parts": [{ "text": "bench 40kg 15 reps" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [
                    { "content": { "parts": [{ "text": "[]" }, { "text": "ignored" }], "role": "model" } },
                    { "content": { "parts": [{ "text": "ignored" }] } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(
            gemini(&server, Some("test-key"))
                .generate_text("bench 40kg 15 reps")
                .await
                .unwrap(),
            "[]"
        );
    }

    #[tokio::test]
    async fn test_generate_text_without_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        assert!(matches!(
            gemini(&server, None).generate_text("bench").await,
            Err(domain::GenerateError::MissingApiKey)
        ));
    }

    #[rstest]
    #[case(
        400,
        json!({ "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" } }),
        "API key not valid."
    )]
    #[case(503, json!({}), "Service Unavailable")]
    #[tokio::test]
    async fn test_generate_text_http_error(
        #[case] status: u16,
        #[case] body: serde_json::Value,
        #[case] expected: &str,
    ) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;

        match gemini(&server, Some("test-key")).generate_text("bench").await {
            Err(domain::GenerateError::Http {
                status: actual_status,
                message,
            }) => {
                assert_eq!(actual_status, status);
                assert_eq!(message, expected);
            }
            result => panic!("unexpected result: {result:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_text_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_json(json!({})),
            )
            .mount(&server)
            .await;

        assert!(matches!(
            gemini(&server, Some("test-key")).generate_text("bench").await,
            Err(domain::GenerateError::Transport(_))
        ));
    }

    #[rstest]
    #[case(r#"{"candidates": []}"#)]
    #[case(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#)]
    #[case(r#"{"candidates": [{"content": {"parts": []}}]}"#)]
    #[case(r#"{"error": {"message": "quota exceeded"}}"#)]
    #[case("<html>")]
    fn test_candidate_text_malformed_envelope(#[case] body: &str) {
        assert!(matches!(
            candidate_text(body),
            Err(domain::GenerateError::Envelope(_))
        ));
    }

    #[test]
    fn test_url() {
        let gemini = Gemini::new(GeminiConfig {
            base_url: "http://localhost:8080/v1beta/".to_string(),
            model: "gemini-pro".to_string(),
            ..GeminiConfig::default()
        })
        .unwrap();
        assert_eq!(
            gemini.url(),
            "http://localhost:8080/v1beta/models/gemini-pro:generateContent"
        );
    }
}
