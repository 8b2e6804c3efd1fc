// Middleware for CORS and request tracing

pub mod cors;

pub use cors::*;
