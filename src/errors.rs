// src/errors.rs
use thiserror::Error;

use crate::models::ErrorCode;

/// Errors raised to the caller of the evaluation pipeline.
///
/// Model-side failures never show up here from `evaluate`; they are folded
/// into an `Evaluation::Error` instead. The `Model` variant only appears when
/// the classifier cannot produce a label because the model call itself failed.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Invalid task_type {0}. Must be 1 or 2.")]
    InvalidTaskType(i64),

    #[error("{0} not found in band descriptors")]
    CriteriaNotFound(String),

    #[error("Invalid classification response: {0}")]
    InvalidClassification(String),

    #[error("Model call failed ({code}): {message}")]
    Model { code: ErrorCode, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Errors produced by an `LlmProvider` while talking to a model backend.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Rate limited by model API: {body}")]
    RateLimited { body: String },

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Received empty text response from model")]
    EmptyResponse,

    #[error("Unexpected response structure: {0}")]
    UnexpectedResponse(String),
}

impl ProviderError {
    /// Builds the error for a non-success HTTP status, singling out 429.
    pub fn from_status(status: u16, body: String) -> Self {
        if status == 429 {
            ProviderError::RateLimited { body }
        } else {
            ProviderError::Api { status, body }
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ProviderError::EmptyResponse => ErrorCode::NoContent,
            ProviderError::RateLimited { .. } => ErrorCode::LimitExceeded,
            ProviderError::Api { .. } | ProviderError::Request(_) => ErrorCode::HttpError,
            ProviderError::UnexpectedResponse(_) => ErrorCode::InternalError,
        }
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;
