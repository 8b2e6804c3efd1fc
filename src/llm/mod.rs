// Completion-service layer

pub mod openai;

pub use openai::*;
