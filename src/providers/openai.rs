// src/providers/openai.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::ProviderKind;
use crate::errors::ProviderError;
use crate::providers::LlmProvider;

/// A provider for OpenAI-style `/chat/completions` endpoints (OpenAI, Groq).
pub struct OpenAIProvider {
    client: Client,
    kind: ProviderKind,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

impl OpenAIProvider {
    pub fn new(
        client: Client,
        kind: ProviderKind,
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            client,
            kind,
            api_base: api_base.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
        }
    }
}

/// Pulls the first choice's text out of a completion payload.
fn extract_content(response: ChatResponse) -> Result<String, ProviderError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::UnexpectedResponse("No choices in response".to_string()))?;

    match choice.message.content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ProviderError::EmptyResponse),
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn name(&self) -> String {
        let prefix = match self.kind {
            ProviderKind::Groq => "groq",
            _ => "openai",
        };
        format!("{}:{}", prefix, self.model)
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));

        log::debug!("📡 Calling {} with model: {}", url, self.model);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let start = Instant::now();

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        log::info!("📥 {} response status: {} ({}ms)", self.name(), status, latency_ms);

        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(ProviderError::from_status(status.as_u16(), error_body));
        }

        let chat: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::UnexpectedResponse(e.to_string()))?;

        extract_content(chat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ChatResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn extracts_first_choice() {
        let resp = parse(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Academic"}}],"usage":{"prompt_tokens":10}}"#,
        );
        assert_eq!(extract_content(resp).unwrap(), "Academic");
    }

    #[test]
    fn null_or_blank_content_is_empty() {
        let null = parse(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#);
        assert!(matches!(
            extract_content(null),
            Err(ProviderError::EmptyResponse)
        ));

        let blank = parse(r#"{"choices":[{"message":{"content":"  \n"}}]}"#);
        assert!(matches!(
            extract_content(blank),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn no_choices_is_unexpected() {
        let resp = parse(r#"{"choices":[]}"#);
        assert!(matches!(
            extract_content(resp),
            Err(ProviderError::UnexpectedResponse(_))
        ));
    }
}
