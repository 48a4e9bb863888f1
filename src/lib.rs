pub mod analytics;
pub mod api;
pub mod compute;
pub mod config;
pub mod error;
pub mod prediction;
pub mod service;
