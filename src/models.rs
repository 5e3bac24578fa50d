// src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{EvalError, Result};

/// Keys the scoring prompt asks the model to return.
pub const EXPECTED_FIELDS: [&str; 5] = [
    "score",
    "reasoning",
    "test_variant",
    "word_count",
    "misspelled_words",
];

/// Incoming evaluation request. `task_type` stays a plain integer on the wire
/// so out-of-range values reach `TaskType::try_from` instead of failing
/// deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub writing_sample: String,
    pub writing_question: String,
    pub task_type: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    Task1,
    Task2,
}

impl TaskType {
    pub fn number(self) -> u8 {
        match self {
            TaskType::Task1 => 1,
            TaskType::Task2 => 2,
        }
    }

    /// Top-level key of this task in the band descriptor document.
    pub fn descriptor_key(self) -> String {
        format!("Writing Task {} Band Descriptors", self.number())
    }
}

impl TryFrom<i64> for TaskType {
    type Error = EvalError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            1 => Ok(TaskType::Task1),
            2 => Ok(TaskType::Task2),
            other => Err(EvalError::InvalidTaskType(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestVariant {
    Academic,
    #[serde(rename = "General Training")]
    GeneralTraining,
}

impl TestVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            TestVariant::Academic => "Academic",
            TestVariant::GeneralTraining => "General Training",
        }
    }
}

impl fmt::Display for TestVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestVariant {
    type Err = EvalError;

    /// Exact match after trimming; no case folding.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Academic" => Ok(TestVariant::Academic),
            "General Training" => Ok(TestVariant::GeneralTraining),
            other => Err(EvalError::InvalidClassification(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NoContent,
    LimitExceeded,
    HttpError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::NoContent => "NO_CONTENT",
            ErrorCode::LimitExceeded => "LIMIT_EXCEEDED",
            ErrorCode::HttpError => "HTTP_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        f.write_str(s)
    }
}

/// Outcome of one model invocation.
///
/// Serializes untagged, so the JSON is either the model's own object, a
/// `{warning, content}` pair or an `{error, code}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Evaluation {
    Error { error: String, code: ErrorCode },
    Warning { warning: String, content: String },
    Parsed(serde_json::Value),
}

impl Evaluation {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Evaluation::Parsed(_))
    }

    /// Typed view of a well-formed scoring reply.
    pub fn as_result(&self) -> Option<EvaluationResult> {
        match self {
            Evaluation::Parsed(value) => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }

    /// Expected keys absent from a parsed object reply. Non-object replies
    /// report every key as missing.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        match self {
            Evaluation::Parsed(serde_json::Value::Object(map)) => EXPECTED_FIELDS
                .iter()
                .copied()
                .filter(|key| !map.contains_key(*key))
                .collect(),
            Evaluation::Parsed(_) => EXPECTED_FIELDS.to_vec(),
            _ => Vec::new(),
        }
    }
}

/// The reply shape the scoring prompt asks for. `score` is absent when the
/// model judged the sample off-topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    pub reasoning: String,
    pub test_variant: TestVariant,
    pub word_count: usize,
    #[serde(default)]
    pub misspelled_words: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

/// Body of `POST /evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EvaluateResponse {
    Evaluated { evaluation: Evaluation },
    Failed { evaluation: ApiError },
}
