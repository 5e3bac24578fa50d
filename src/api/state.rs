// src/api/state.rs
use crate::runner::Evaluator;

/// Shared by every worker; holds nothing that changes per request.
#[derive(Clone)]
pub struct AppState {
    pub evaluator: Evaluator,
}

impl AppState {
    pub fn new(evaluator: Evaluator) -> Self {
        Self { evaluator }
    }
}
