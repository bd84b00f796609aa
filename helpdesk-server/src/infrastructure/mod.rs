pub mod config;
pub mod database;
pub mod middleware;
pub mod pdf;
pub mod render;
mod repository;
mod service_provider;
pub mod telemetry;

pub use service_provider::ServiceProvider;
