//! GeminiApiAgent - Direct REST API implementation for Gemini.
//!
//! Sends one inline image plus the critique prompt to `generateContent`
//! and returns the text parts of the first candidate, joined.

use artbuddy_core::model::{CritiqueRequest, ModelError, VisionModel};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Vision model implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiAgent {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiApiAgent {
    /// Creates a new agent with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Points the agent at another endpoint (proxies, local fakes).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, ModelError> {
        // The key travels in a header so it never shows up in error URLs.
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                let err = err.without_url();
                if err.is_timeout() {
                    ModelError::Transport(format!("Gemini API request timed out: {err}"))
                } else {
                    ModelError::Transport(format!("Gemini API request failed: {err}"))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            ModelError::provider(format!("Failed to parse Gemini response: {}", err.without_url()))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl VisionModel for GeminiApiAgent {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: CritiqueRequest) -> Result<String, ModelError> {
        let body = build_request(&request);
        tracing::debug!(
            model = %self.model,
            mime_type = request.image.mime_type(),
            image_bytes = request.image.len(),
            "sending Gemini generateContent request"
        );
        self.send_request(&body).await
    }
}

fn build_request(request: &CritiqueRequest) -> GenerateContentRequest {
    let image = Part::InlineData {
        inline_data: InlineDataPayload {
            mime_type: request.image.mime_type().to_string(),
            data: BASE64_STANDARD.encode(request.image.bytes()),
        },
    };

    let contents = vec![Content {
        role: "user".to_string(),
        parts: vec![
            image,
            Part::Text {
                text: request.prompt.clone(),
            },
        ],
    }];

    let system_instruction = (!request.system_instruction.trim().is_empty()).then(|| Content {
        role: "system".to_string(),
        parts: vec![Part::Text {
            text: request.system_instruction.clone(),
        }],
    });

    GenerateContentRequest {
        contents,
        system_instruction,
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
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

fn extract_text_response(response: GenerateContentResponse) -> Result<String, ModelError> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(ModelError::provider(format!(
            "Gemini blocked the request: {reason}"
        )));
    }

    let text: String = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(ModelError::EmptyResponse)
    } else {
        Ok(text)
    }
}

fn map_http_error(status: StatusCode, body: String) -> ModelError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    ModelError::Http {
        status: status.as_u16(),
        message,
    }
}
