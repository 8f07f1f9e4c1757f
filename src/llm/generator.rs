//! Cover letter generation: one request, one answer, text out

use crate::error::{GenerationFailure, Result};
use crate::input::{ApplicantProfile, JobTarget, Temperature};
use crate::llm::client::{GenerationBackend, ResponseShape};
use crate::llm::prompts::GenerationRequest;
use log::{info, warn};
use std::time::Instant;

/// Pull the letter text out of an answer.
///
/// Direct text wins; otherwise the first segment is used. Anything else,
/// including empty text, is a malformed answer.
pub fn extract_response_text(shape: ResponseShape) -> std::result::Result<String, GenerationFailure> {
    let raw = shape.raw();
    let text = match shape {
        ResponseShape::DirectText(text) => Some(text),
        ResponseShape::Segmented(segments) => segments.into_iter().next().map(|segment| segment.text),
        ResponseShape::Unrecognized(_) => None,
    };

    match text {
        Some(text) if !text.is_empty() => Ok(text),
        _ => {
            warn!("Generation answer carried no text");
            Err(GenerationFailure::MalformedResponse { raw })
        }
    }
}

/// Send an assembled request and extract the answer's text.
pub async fn request_cover_letter<B: GenerationBackend>(
    backend: &B,
    request: &GenerationRequest,
) -> std::result::Result<String, GenerationFailure> {
    let start_time = Instant::now();
    let shape = backend.generate(request).await?;
    let text = extract_response_text(shape)?;
    info!(
        "Cover letter generated by {} in {}ms ({} chars)",
        backend.model_name(),
        start_time.elapsed().as_millis(),
        text.chars().count()
    );
    Ok(text)
}

/// Render the prompt for a validated submission and generate the letter.
pub async fn generate_cover_letter<B: GenerationBackend>(
    backend: &B,
    profile: &ApplicantProfile,
    job: &JobTarget,
    temperature: Temperature,
) -> Result<String> {
    let request = GenerationRequest::assemble(profile, job, temperature)?;
    Ok(request_cover_letter(backend, &request).await?)
}
