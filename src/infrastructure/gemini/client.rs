use crate::modules::catalog::provider::FetchFailure;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Thin REST client for `models/{model}:generateContent`.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        info!("✅ Gemini client ready (model: {})", model);
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sends a single-turn prompt and returns the first text part of the
    /// answer. The model is asked for `application/json` output.
    pub async fn generate_json(
        &self,
        system_instruction: &str,
        prompt: &str,
    ) -> Result<String, FetchFailure> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: system_instruction,
                }],
            }),
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        debug!("Gemini request: {}", prompt);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable error body".to_string());
            return Err(map_http_error(status, text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| FetchFailure::Malformed(e.to_string()))?;

        extract_text(parsed)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text(response: GenerateContentResponse) -> Result<String, FetchFailure> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| FetchFailure::Malformed("no text in response candidates".to_string()))
}

fn map_http_error(status: StatusCode, body: String) -> FetchFailure {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            match wrapper.error.status {
                Some(s) if !s.is_empty() => format!("{s}: {msg}"),
                _ => msg,
            }
        })
        .unwrap_or(body);

    FetchFailure::Provider {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
pub mod mock {
    use axum::{
        Json, Router,
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[derive(Debug, Clone)]
    pub struct Recorded {
        pub call: String,
        pub api_key: Option<String>,
        pub body: Value,
    }

    #[derive(Clone)]
    struct Reply {
        status: StatusCode,
        body: Value,
        requests: Arc<Mutex<Vec<Recorded>>>,
    }

    /// Local stand-in for the Generative Language API.
    pub struct MockGemini {
        pub base_url: String,
        requests: Arc<Mutex<Vec<Recorded>>>,
    }

    impl MockGemini {
        pub async fn start(status: StatusCode, body: Value) -> Self {
            let requests = Arc::new(Mutex::new(Vec::new()));
            let reply = Reply {
                status,
                body,
                requests: requests.clone(),
            };
            let router = Router::new()
                .route("/v1beta/models/{call}", post(answer))
                .with_state(reply);

            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

            Self {
                base_url: format!("http://{addr}/v1beta/models"),
                requests,
            }
        }

        /// Answers every call with `text` as the first candidate.
        pub async fn with_text(text: &str) -> Self {
            Self::start(
                StatusCode::OK,
                json!({"candidates": [{"content": {"parts": [{"text": text}]}}]}),
            )
            .await
        }

        pub fn requests(&self) -> Vec<Recorded> {
            self.requests.lock().unwrap().clone()
        }
    }

    async fn answer(
        State(reply): State<Reply>,
        Path(call): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        reply.requests.lock().unwrap().push(Recorded {
            call,
            api_key: headers
                .get("x-goog-api-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });
        (reply.status, Json(reply.body))
    }
}
