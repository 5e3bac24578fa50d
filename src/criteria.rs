// src/criteria.rs
use rust_embed::RustEmbed;
use serde_json::{Map, Value};
use std::path::Path;

use crate::errors::{EvalError, Result};
use crate::models::TaskType;

#[derive(RustEmbed)]
#[folder = "resource/"]
struct Resources;

const DESCRIPTOR_FILE: &str = "band_descriptors.json";

/// Anything that can produce the rubric text for a task type.
pub trait CriteriaSource: Send + Sync {
    /// Returns the formatted band descriptors for task type 1 or 2.
    fn load(&self, task_type: i64) -> Result<String>;
}

/// Band descriptor document: task key → band → category → description.
/// Key order follows the source document.
#[derive(Debug, Clone)]
pub struct BandDescriptors {
    document: Map<String, Value>,
}

impl BandDescriptors {
    /// Descriptors bundled into the binary from `resource/`.
    pub fn embedded() -> Result<Self> {
        let file = Resources::get(DESCRIPTOR_FILE).ok_or_else(|| {
            EvalError::Config(format!("embedded {} is missing", DESCRIPTOR_FILE))
        })?;
        let document: Map<String, Value> = serde_json::from_slice(&file.data)?;
        Ok(Self { document })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let document: Map<String, Value> = serde_json::from_str(raw)?;
        Ok(Self { document })
    }

    /// Uses `path` when given, otherwise the embedded copy.
    pub fn load_or_embedded(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                log::info!("Loading band descriptors from {}", p.display());
                Self::from_path(p)
            }
            None => Self::embedded(),
        }
    }

    /// Flattens the descriptors of one task into prompt text.
    pub fn criteria_string(&self, task_type: TaskType) -> Result<String> {
        let key = task_type.descriptor_key();
        let bands = self
            .document
            .get(&key)
            .ok_or_else(|| EvalError::CriteriaNotFound(key.clone()))?
            .as_object()
            .ok_or_else(|| EvalError::Config(format!("{} is not a mapping of bands", key)))?;

        let mut out = String::new();
        for (band, categories) in bands {
            out.push_str(&format!("Band {}:\n", band));
            let categories = categories.as_object().ok_or_else(|| {
                EvalError::Config(format!("{} band {} is not a mapping", key, band))
            })?;
            for (category, description) in categories {
                let description = match description {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                out.push_str(&format!("  {}: {}\n", category, description));
            }
        }
        Ok(out)
    }
}

impl CriteriaSource for BandDescriptors {
    fn load(&self, task_type: i64) -> Result<String> {
        let task_type = TaskType::try_from(task_type)?;
        self.criteria_string(task_type)
    }
}
