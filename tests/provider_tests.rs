// tests/provider_tests.rs
//
// Providers against a wiremock server: status mapping (200/429/500),
// empty and malformed bodies, connection failures, and how each surfaces
// through invoke_llm.

use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ielts_evaluate::config::ProviderKind;
use ielts_evaluate::errors::ProviderError;
use ielts_evaluate::models::{ErrorCode, Evaluation};
use ielts_evaluate::prompt::PromptTemplate;
use ielts_evaluate::providers::LlmProvider;
use ielts_evaluate::providers::ollama::OllamaProvider;
use ielts_evaluate::providers::openai::OpenAIProvider;
use ielts_evaluate::runner::invoke_llm;

fn groq_provider(api_base: &str) -> OpenAIProvider {
    OpenAIProvider::new(
        Client::new(),
        ProviderKind::Groq,
        api_base,
        "test-key",
        "test-model",
        0.0,
    )
}

fn ollama_provider(api_base: &str) -> OllamaProvider {
    OllamaProvider::new(Client::new(), api_base, "llama3", 0.0)
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

async fn mount_chat(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn error_code(provider: &dyn LlmProvider) -> ErrorCode {
    match invoke_llm(provider, &PromptTemplate::new("Score this."), &json!({})).await {
        Evaluation::Error { code, .. } => code,
        other => panic!("expected error evaluation, got {:?}", other),
    }
}

#[tokio::test]
async fn openai_sends_prompt_and_returns_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "messages": [{"role": "user", "content": "Describe the graph."}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Academic")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = groq_provider(&server.uri());
    let reply = provider.generate("Describe the graph.").await.unwrap();
    assert_eq!(reply, "Academic");
}

#[tokio::test]
async fn openai_429_is_rate_limited() {
    let server = MockServer::start().await;
    mount_chat(
        &server,
        ResponseTemplate::new(429).set_body_string("Rate limit reached for model"),
    )
    .await;

    let provider = groq_provider(&server.uri());
    match provider.generate("hi").await {
        Err(ProviderError::RateLimited { body }) => {
            assert_eq!(body, "Rate limit reached for model")
        }
        other => panic!("expected RateLimited, got {:?}", other),
    }
    assert_eq!(error_code(&provider).await, ErrorCode::LimitExceeded);
}

#[tokio::test]
async fn openai_500_is_http_error() {
    let server = MockServer::start().await;
    mount_chat(&server, ResponseTemplate::new(500).set_body_string("upstream down")).await;

    let provider = groq_provider(&server.uri());
    assert!(matches!(
        provider.generate("hi").await,
        Err(ProviderError::Api { status: 500, .. })
    ));
    assert_eq!(error_code(&provider).await, ErrorCode::HttpError);
}

#[tokio::test]
async fn openai_empty_content_is_no_content() {
    let server = MockServer::start().await;
    mount_chat(&server, ResponseTemplate::new(200).set_body_json(completion(""))).await;

    let provider = groq_provider(&server.uri());
    assert!(matches!(
        provider.generate("hi").await,
        Err(ProviderError::EmptyResponse)
    ));
    assert_eq!(error_code(&provider).await, ErrorCode::NoContent);
}

#[tokio::test]
async fn openai_malformed_body_is_internal_error() {
    let server = MockServer::start().await;
    mount_chat(&server, ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;

    let provider = groq_provider(&server.uri());
    assert!(matches!(
        provider.generate("hi").await,
        Err(ProviderError::UnexpectedResponse(_))
    ));
    assert_eq!(error_code(&provider).await, ErrorCode::InternalError);
}

#[tokio::test]
async fn fenced_json_reply_parses_through_invoke() {
    let server = MockServer::start().await;
    let reply = "```json\n{\"score\": 7, \"word_count\": 250}\n```";
    mount_chat(&server, ResponseTemplate::new(200).set_body_json(completion(reply))).await;

    let provider = groq_provider(&server.uri());
    let result = invoke_llm(&provider, &PromptTemplate::new("Score this."), &json!({})).await;
    assert_eq!(result, Evaluation::Parsed(json!({"score": 7, "word_count": 250})));
}

#[tokio::test]
async fn connection_failure_is_http_error() {
    // Nothing listens on port 1.
    let provider = groq_provider("http://127.0.0.1:1");
    assert!(matches!(
        provider.generate("hi").await,
        Err(ProviderError::Request(_))
    ));
    assert_eq!(error_code(&provider).await, ErrorCode::HttpError);
}

#[tokio::test]
async fn ollama_returns_response_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"model": "llama3", "prompt": "hi", "stream": false})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"model": "llama3", "response": "General Training", "done": true})),
        )
        .mount(&server)
        .await;

    let provider = ollama_provider(&server.uri());
    assert_eq!(provider.generate("hi").await.unwrap(), "General Training");
}

#[tokio::test]
async fn ollama_empty_response_is_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"model": "llama3", "response": "", "done": true})),
        )
        .mount(&server)
        .await;

    let provider = ollama_provider(&server.uri());
    assert!(matches!(
        provider.generate("hi").await,
        Err(ProviderError::EmptyResponse)
    ));
    assert_eq!(error_code(&provider).await, ErrorCode::NoContent);
}

#[tokio::test]
async fn ollama_429_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider = ollama_provider(&server.uri());
    assert!(matches!(
        provider.generate("hi").await,
        Err(ProviderError::RateLimited { .. })
    ));
    assert_eq!(error_code(&provider).await, ErrorCode::LimitExceeded);
}

#[tokio::test]
async fn ollama_malformed_body_is_internal_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = ollama_provider(&server.uri());
    assert_eq!(error_code(&provider).await, ErrorCode::InternalError);
}
