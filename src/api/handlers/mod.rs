// src/api/handlers/mod.rs
mod evaluate;
mod health;

pub use evaluate::evaluate;
pub use health::health_check;
