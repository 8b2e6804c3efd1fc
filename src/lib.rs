// Docscan - document analyzer API relaying uploads to an image host and a multimodal LLM

pub mod config;
pub mod hosting;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod scratch;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
