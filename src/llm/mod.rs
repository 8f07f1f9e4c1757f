//! LLM integration module

pub mod client;
pub mod gemini;
pub mod generator;
pub mod prompts;

pub use client::{GenerationBackend, ResponseShape, Segment};
pub use gemini::GeminiClient;
pub use generator::{extract_response_text, generate_cover_letter, request_cover_letter};
pub use prompts::{render_prompt, GenerationRequest};
