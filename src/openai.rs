//! Client for OpenAI-compatible chat completion endpoints.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ChatError;
use crate::session::{ChatMessage, ChatRole};

pub const DEFAULT_API_URL: &str = "https://api.openai.com";

// Generation settings are deployment constants, not user-configurable.
pub const MODEL: &str = "gpt-3.5-turbo";
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 150;

#[derive(Serialize)]
struct ApiMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: &'static str,
    messages: Vec<ApiMessage>,
    temperature: f64,
    max_tokens: u32,
}

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

#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAIClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Requests the next completion for the transcript. The newest user turn
    /// must already be the last message.
    ///
    /// Only `choices[0].message.content` of the response is consumed.
    pub async fn complete(&self, transcript: &[ChatMessage]) -> Result<String, ChatError> {
        let request = ChatRequest {
            model: MODEL,
            messages: transcript
                .iter()
                .map(|msg| ApiMessage {
                    role: match msg.role {
                        ChatRole::User => "user",
                        ChatRole::Assistant => "assistant",
                    },
                    content: msg.content.clone(),
                })
                .collect(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        debug!(model = MODEL, turns = transcript.len(), "chat completion request");

        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body["error"]["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| format!("API error: {}", status.as_u16()));
            return Err(ChatError::Api(message));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|_| ChatError::UnexpectedResponse)?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ChatError::UnexpectedResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client(server: &mockito::ServerGuard) -> OpenAIClient {
        OpenAIClient::new(&server.url(), "test-key")
    }

    #[tokio::test]
    async fn complete_returns_first_choice_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"Hi there"}}]}"#)
            .create_async()
            .await;

        let transcript = vec![ChatMessage::user("hi")];
        let reply = client(&server).complete(&transcript).await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply, "Hi there");
    }

    #[tokio::test]
    async fn payload_carries_full_transcript_in_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::Json(json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "user", "content": "one"},
                    {"role": "assistant", "content": "two"},
                    {"role": "user", "content": "three"}
                ],
                "temperature": 0.7,
                "max_tokens": 150
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"four"}}]}"#)
            .create_async()
            .await;

        let transcript = vec![
            ChatMessage::user("one"),
            ChatMessage::assistant("two"),
            ChatMessage::user("three"),
        ];
        let reply = client(&server).complete(&transcript).await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply, "four");
    }

    #[tokio::test]
    async fn error_body_message_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .with_body(r#"{"error":{"message":"rate limited"}}"#)
            .create_async()
            .await;

        let err = client(&server)
            .complete(&[ChatMessage::user("hi")])
            .await
            .unwrap_err();

        match err {
            ChatError::Api(message) => assert_eq!(message, "rate limited"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_error_body_falls_back_to_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(503)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let err = client(&server)
            .complete(&[ChatMessage::user("hi")])
            .await
            .unwrap_err();

        match err {
            ChatError::Api(message) => assert_eq!(message, "API error: 503"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_choices_is_a_protocol_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"object":"chat.completion"}"#)
            .create_async()
            .await;

        let err = client(&server)
            .complete(&[ChatMessage::user("hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::UnexpectedResponse));
    }

    #[tokio::test]
    async fn empty_choices_is_a_protocol_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = client(&server)
            .complete(&[ChatMessage::user("hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::UnexpectedResponse));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        // Nothing listens on this port.
        let client = OpenAIClient::new("http://127.0.0.1:9", "test-key");

        let err = client
            .complete(&[ChatMessage::user("hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Network(_)));
    }
}
