// src/lib.rs
pub mod api;
pub mod banner;
pub mod config;
pub mod criteria;
pub mod errors;
pub mod models;
pub mod prompt;
pub mod providers;
pub mod runner;
pub mod tools;
