//! Seam between the cover letter pipeline and a hosted generation service

use crate::error::GenerationFailure;
use crate::llm::prompts::GenerationRequest;
use serde::{Deserialize, Serialize};

/// One ordered piece of a segmented answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
}

impl Segment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// The shapes a service answer can take.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", content = "body", rename_all = "snake_case")]
pub enum ResponseShape {
    DirectText(String),
    Segmented(Vec<Segment>),
    /// Neither shape matched; the raw body is kept for diagnostics.
    Unrecognized(serde_json::Value),
}

impl ResponseShape {
    /// Pretty JSON of the answer, shown to the user when extraction fails.
    pub fn raw(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

/// A hosted text generation capability.
///
/// Called exactly once per submission. Content-policy refusals come back as
/// [`GenerationFailure::Blocked`], network and service errors as
/// [`GenerationFailure::Transport`].
pub trait GenerationBackend {
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<ResponseShape, GenerationFailure>> + Send;

    /// Model identifier, for display.
    fn model_name(&self) -> &str;
}
