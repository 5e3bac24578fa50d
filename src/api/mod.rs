// src/api/mod.rs
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::{build_cors, configure_routes};
pub use state::AppState;
