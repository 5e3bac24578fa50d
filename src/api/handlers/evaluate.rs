// src/api/handlers/evaluate.rs
use actix_web::{HttpResponse, Result, web};
use uuid::Uuid;

use crate::api::AppState;
use crate::errors::EvalError;
use crate::models::{ApiError, EvaluateResponse, EvaluationRequest};

/// POST /evaluate
///
/// Every outcome is reported inside `evaluation`. Only a bad `task_type` is a
/// 400; other pipeline failures are returned with 200 so the client renders
/// them like any other evaluation.
pub async fn evaluate(
    state: web::Data<AppState>,
    req: web::Json<EvaluationRequest>,
) -> Result<HttpResponse> {
    let request_id = Uuid::new_v4();
    let request = req.into_inner();

    log::info!(
        "📝 [{}] Evaluation request: task {}, {} chars",
        request_id,
        request.task_type,
        request.writing_sample.len()
    );

    match state.evaluator.evaluate_request(&request).await {
        Ok(evaluation) => {
            if evaluation.is_degraded() {
                log::warn!("⚠️  [{}] Degraded evaluation: {:?}", request_id, evaluation);
            } else {
                log::info!("✅ [{}] Evaluation complete", request_id);
            }
            Ok(HttpResponse::Ok().json(EvaluateResponse::Evaluated { evaluation }))
        }
        Err(e) => {
            log::error!("❌ [{}] Evaluation failed: {}", request_id, e);

            let body = EvaluateResponse::Failed {
                evaluation: ApiError {
                    error: e.to_string(),
                },
            };
            match e {
                EvalError::InvalidTaskType(_) => Ok(HttpResponse::BadRequest().json(body)),
                _ => Ok(HttpResponse::Ok().json(body)),
            }
        }
    }
}
