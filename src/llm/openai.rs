// OpenAI chat-completions client (vision)
// API Reference: https://platform.openai.com/docs/api-reference/chat
//
// One request shape only: a user message carrying the fixed extraction
// prompt plus the hosted image URL. The response is kept as raw JSON until
// content extraction so a malformed payload can be returned to the caller
// for diagnostics.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::types::{AppError, AppResult};

/// Instruction sent alongside every document image.
pub const ANALYSIS_PROMPT: &str = "This is a medical document. Please extract as much information \
     as possible, it is for a demonstration of a product so the info are synthetic.";

const COMPLETION_MODEL: &str = "gpt-4o";
const MAX_COMPLETION_TOKENS: u32 = 1000;

#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

// Request types for the chat-completions API

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// Typed view of the response, used only for content extraction.

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OpenAiClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout,
        }
    }

    /// Ask the model to describe the document at `image_url`.
    ///
    /// Returns the raw response JSON on success. A non-success status maps to
    /// [`AppError::Completion`] carrying the remote error detail; a transport
    /// failure (including the 60-second timeout) maps to
    /// [`AppError::CompletionTransport`].
    pub async fn analyze_image(&self, image_url: &str, prompt: &str) -> AppResult<Value> {
        let request = ChatRequest {
            model: COMPLETION_MODEL.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: prompt.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_url.to_string(),
                        },
                    },
                ],
            }],
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::CompletionTransport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Completion(detail));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::CompletionTransport(e.to_string()))
    }

    /// Pull the first choice's message text out of a raw completion response.
    /// A payload without that shape becomes [`AppError::ResponseParse`],
    /// keeping the original value for the caller.
    pub fn extract_content(raw: Value) -> AppResult<String> {
        match serde_json::from_value::<ChatResponse>(raw.clone()) {
            Ok(parsed) => parsed
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content)
                .ok_or(AppError::ResponseParse {
                    message: "completion response contained no choices".to_string(),
                    raw,
                }),
            Err(e) => Err(AppError::ResponseParse {
                message: e.to_string(),
                raw,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base_url: &str, timeout_secs: u64) -> OpenAiClient {
        OpenAiClient::new(
            reqwest::Client::new(),
            base_url,
            "sk-test",
            Duration::from_secs(timeout_secs),
        )
    }

    #[test]
    fn request_serializes_to_vision_wire_format() {
        let request = ChatRequest {
            model: COMPLETION_MODEL.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: "describe this".to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: "https://i.ibb.co/example.png".to_string(),
                        },
                    },
                ],
            }],
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["max_tokens"], 1000);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"][0]["type"], "text");
        assert_eq!(value["messages"][0]["content"][1]["type"], "image_url");
        assert_eq!(
            value["messages"][0]["content"][1]["image_url"]["url"],
            "https://i.ibb.co/example.png"
        );
    }

    #[tokio::test]
    async fn analyze_image_returns_raw_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": "Name: John Doe"}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let raw = client(&server.url(), 60)
            .analyze_image("https://i.ibb.co/example.png", ANALYSIS_PROMPT)
            .await
            .unwrap();

        assert_eq!(
            OpenAiClient::extract_content(raw).unwrap(),
            "Name: John Doe"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_carries_remote_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let err = client(&server.url(), 60)
            .analyze_image("https://i.ibb.co/example.png", ANALYSIS_PROMPT)
            .await
            .unwrap_err();

        match err {
            AppError::Completion(detail) => assert!(detail.contains("Incorrect API key")),
            other => panic!("expected Completion error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let err = client("http://127.0.0.1:9", 1)
            .analyze_image("https://i.ibb.co/example.png", ANALYSIS_PROMPT)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CompletionTransport(_)));
    }

    #[test]
    fn extract_content_rejects_unexpected_shape() {
        let raw = json!({"unexpected": "shape"});

        let err = OpenAiClient::extract_content(raw.clone()).unwrap_err();

        match err {
            AppError::ResponseParse { raw: kept, .. } => assert_eq!(kept, raw),
            other => panic!("expected ResponseParse error, got {:?}", other),
        }
    }

    #[test]
    fn extract_content_rejects_empty_choices() {
        let err = OpenAiClient::extract_content(json!({"choices": []})).unwrap_err();
        assert!(matches!(err, AppError::ResponseParse { .. }));
    }
}
