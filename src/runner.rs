// src/runner.rs
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::criteria::CriteriaSource;
use crate::errors::{EvalError, ProviderError, Result};
use crate::models::{ErrorCode, Evaluation, EvaluationRequest, TestVariant};
use crate::prompt::{
    EvaluationPrompt, PromptTemplate, build_prompt_template, classification_template,
    classification_variables,
};
use crate::providers::LlmProvider;
use crate::tools::{strip_code_fences, word_count};

const NOT_JSON_WARNING: &str = "Response was not valid JSON. Returning raw output.";

/// Converts a provider failure into the structured error result.
fn failure_evaluation(err: &ProviderError) -> Evaluation {
    let code = err.code();
    let error = match code {
        ErrorCode::NoContent => "The model returned no valid response.".to_string(),
        ErrorCode::LimitExceeded => {
            "Model usage limit exceeded. Please try again later.".to_string()
        }
        ErrorCode::HttpError => format!("HTTP error while calling the model: {}", err),
        ErrorCode::InternalError => format!("Error during LLM invocation: {}", err),
    };
    Evaluation::Error { error, code }
}

/// Interprets raw model text: fences stripped, JSON if possible, otherwise a
/// warning carrying the cleaned text.
pub fn parse_model_output(raw: &str) -> Evaluation {
    let text = strip_code_fences(raw);
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => Evaluation::Parsed(value),
        Err(_) => Evaluation::Warning {
            warning: NOT_JSON_WARNING.to_string(),
            content: text,
        },
    }
}

/// Renders `template` with `variables`, calls the model once and normalizes
/// the outcome. Never fails: model-side problems come back as
/// `Evaluation::Error` and non-JSON replies as `Evaluation::Warning`.
pub async fn invoke_llm(
    provider: &dyn LlmProvider,
    template: &PromptTemplate,
    variables: &Value,
) -> Evaluation {
    let prompt = template.render(variables);
    let start = Instant::now();

    match provider.generate(&prompt).await {
        Ok(raw) => {
            log::debug!(
                "Model {} replied in {}ms ({} chars)",
                provider.name(),
                start.elapsed().as_millis(),
                raw.len()
            );
            let evaluation = parse_model_output(&raw);
            if let Evaluation::Warning { .. } = evaluation {
                log::debug!("Model reply from {} was not JSON", provider.name());
            }
            evaluation
        }
        Err(e) => {
            log::warn!("⚠️  Model {} failed: {}", provider.name(), e);
            failure_evaluation(&e)
        }
    }
}

/// Asks the model whether `writing_question` is an Academic or a General
/// Training task. The reply must be one of the two labels exactly.
pub async fn classify_writing_task(
    provider: &dyn LlmProvider,
    writing_question: &str,
) -> Result<TestVariant> {
    let result = invoke_llm(
        provider,
        &classification_template(),
        &classification_variables(writing_question),
    )
    .await;

    let label = match result {
        Evaluation::Warning { content, .. } => content,
        Evaluation::Parsed(Value::String(s)) => s,
        Evaluation::Parsed(other) => other.to_string(),
        Evaluation::Error { error, code } => {
            return Err(EvalError::Model {
                code,
                message: error,
            });
        }
    };

    label.parse()
}

/// Builds the scoring prompt and invokes the model.
///
/// The result is what `invoke_llm` returned with one change: a JSON object
/// reply gets its `word_count` overwritten with the count passed in here,
/// whatever the model wrote. Warnings, errors and non-object replies are
/// returned untouched.
pub async fn evaluate(
    provider: &dyn LlmProvider,
    writing_sample: &str,
    writing_question: &str,
    criteria_string: &str,
    test_variant: TestVariant,
    word_count: usize,
) -> Evaluation {
    let prompt = EvaluationPrompt {
        writing_sample,
        writing_question,
        criteria_string,
        test_variant,
        word_count,
    };

    let mut evaluation =
        invoke_llm(provider, &build_prompt_template(), &prompt.variables()).await;

    let missing = evaluation.missing_fields();
    if !missing.is_empty() {
        log::warn!("Model reply is missing expected fields: {:?}", missing);
    }

    if let Evaluation::Parsed(Value::Object(map)) = &mut evaluation {
        if map.get("word_count").and_then(Value::as_u64) != Some(word_count as u64) {
            log::debug!(
                "Replacing model word_count {:?} with {}",
                map.get("word_count"),
                word_count
            );
        }
        map.insert("word_count".to_string(), Value::from(word_count));
    }

    evaluation
}

/// Runs the whole pipeline for one request: criteria, classification, word
/// count, prompt, model call.
#[derive(Clone)]
pub struct Evaluator {
    provider: Arc<dyn LlmProvider>,
    criteria: Arc<dyn CriteriaSource>,
}

impl Evaluator {
    pub fn new(provider: Arc<dyn LlmProvider>, criteria: Arc<dyn CriteriaSource>) -> Self {
        Self { provider, criteria }
    }

    /// Input errors and classifier failures are returned as `Err`; model-side
    /// failures of the scoring call are inside the returned `Evaluation`.
    pub async fn evaluate_request(&self, request: &EvaluationRequest) -> Result<Evaluation> {
        let start = Instant::now();

        let criteria_string = self.criteria.load(request.task_type)?;
        let test_variant =
            classify_writing_task(self.provider.as_ref(), &request.writing_question).await?;
        let count = word_count(&request.writing_sample);

        log::info!(
            "🎯 Scoring task {} sample: {} words, variant {}",
            request.task_type,
            count,
            test_variant
        );

        let evaluation = evaluate(
            self.provider.as_ref(),
            &request.writing_sample,
            &request.writing_question,
            &criteria_string,
            test_variant,
            count,
        )
        .await;

        log::info!(
            "⏱️  Evaluation finished in {}ms (degraded: {})",
            start.elapsed().as_millis(),
            evaluation.is_degraded()
        );

        Ok(evaluation)
    }
}
