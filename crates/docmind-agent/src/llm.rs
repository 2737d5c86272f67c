//! The LLM transport seam: a single request/response function, specified
//! only by contract (spec.md §6). Nothing in this crate assumes a
//! particular provider; `HttpLlmTransport` is a minimal, documented
//! extension point rather than a finished integration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A chat message role, mirroring the three roles the transport contract
/// allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub content: String,
}

impl LlmMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: LlmRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: LlmRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: LlmRole::Assistant, content: content.into() }
    }
}

/// The transport's own outcome: `success=false` carries a human-readable
/// message, never a typed error, since the whole point of this seam is that
/// the core doesn't know or care what failed on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmChatResult {
    pub success: bool,
    pub content: Option<String>,
    pub error: Option<String>,
}

impl LlmChatResult {
    pub fn ok(content: impl Into<String>) -> Self {
        Self { success: true, content: Some(content.into()), error: None }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self { success: false, content: None, error: Some(message.into()) }
    }
}

/// A single request/response function over chat messages. One completion
/// per call; no streaming.
#[async_trait]
pub trait LlmTransport: Send + Sync {
    async fn chat(&self, messages: &[LlmMessage]) -> LlmChatResult;
}

/// A minimal `reqwest`-backed transport for a generic OpenAI-shaped chat
/// completion endpoint. The wire format (auth header, request/response
/// JSON shape) is deliberately left as an extension point: swap this out
/// for whatever provider the host application integrates.
pub struct HttpLlmTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl HttpLlmTransport {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [LlmMessage],
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl LlmTransport for HttpLlmTransport {
    async fn chat(&self, messages: &[LlmMessage]) -> LlmChatResult {
        let request = ChatRequest { model: &self.model, messages };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(err) => return LlmChatResult::err(err.to_string()),
        };

        if !response.status().is_success() {
            return LlmChatResult::err(format!("llm transport returned status {}", response.status()));
        }

        match response.json::<ChatResponse>().await {
            Ok(parsed) => match parsed.choices.into_iter().next() {
                Some(choice) => LlmChatResult::ok(choice.message.content),
                None => LlmChatResult::err("llm transport returned no choices"),
            },
            Err(err) => LlmChatResult::err(err.to_string()),
        }
    }
}

/// A scripted test double: returns canned responses in order, or an error
/// once the script is exhausted.
pub struct MockLlmTransport {
    responses: std::sync::Mutex<Vec<LlmChatResult>>,
}

impl MockLlmTransport {
    pub fn new(responses: Vec<LlmChatResult>) -> Self {
        Self { responses: std::sync::Mutex::new(responses) }
    }

    pub fn reply(text: impl Into<String>) -> Self {
        Self::new(vec![LlmChatResult::ok(text)])
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(vec![LlmChatResult::err(message)])
    }
}

#[async_trait]
impl LlmTransport for MockLlmTransport {
    async fn chat(&self, _messages: &[LlmMessage]) -> LlmChatResult {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            LlmChatResult::err("mock transport script exhausted")
        } else {
            responses.remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_transport_replays_script_in_order() {
        let transport = MockLlmTransport::new(vec![LlmChatResult::ok("first"), LlmChatResult::ok("second")]);
        let first = transport.chat(&[]).await;
        let second = transport.chat(&[]).await;
        assert_eq!(first.content.as_deref(), Some("first"));
        assert_eq!(second.content.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn mock_transport_errors_once_exhausted() {
        let transport = MockLlmTransport::new(vec![]);
        let result = transport.chat(&[]).await;
        assert!(!result.success);
    }
}
