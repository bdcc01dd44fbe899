use std::time::Duration;

use serde::{Deserialize, Serialize};

use lexrag_core::config::GenerationSettings;
use lexrag_core::traits::Generator;
use lexrag_core::{Result, Service};

use crate::http::JsonEndpoint;

/// Single-turn chat-completions client.
#[derive(Clone)]
pub struct HttpGenerator {
    endpoint: JsonEndpoint,
    model: String,
    temperature: f32,
}

impl HttpGenerator {
    pub fn new(settings: &GenerationSettings, api_key: &str, timeout: Duration) -> Result<Self> {
        let endpoint = JsonEndpoint::new(Service::Generation, &settings.endpoint, api_key, timeout)?;
        Ok(Self { endpoint, model: settings.model.clone(), temperature: settings.temperature })
    }
}

impl Generator for HttpGenerator {
    /// Returns the first choice's content unmodified. A null content is
    /// malformed, not an empty answer.
    fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: self.temperature,
        };
        let parsed: ChatResponse = self.endpoint.post(&request)?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| self.endpoint.malformed(format!("{} response had no choices", self.endpoint.service())))?;
        choice
            .message
            .content
            .ok_or_else(|| self.endpoint.malformed("first choice has no message content"))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}
