//! Submission lifecycle
//!
//! ```text
//! Idle -> Validating -> ValidationFailed
//!                    -> Assembling -> Calling -> Succeeded
//!                                             -> BlockedRequest
//!                                             -> MalformedResponse
//!                                             -> TransportError
//! ```
//!
//! Every terminal state is final for that submission. A new call to
//! [`CoverLetterSession::submit`] starts again from `Idle`.

use crate::error::{GenerationFailure, Result, ValidationError};
use crate::input::{InputCollector, Submission};
use crate::llm::{request_cover_letter, GenerationBackend, GenerationRequest};
use crate::output::report::CoverLetter;
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Validating,
    ValidationFailed(ValidationError),
    Assembling,
    Calling,
    Succeeded(CoverLetter),
    BlockedRequest { reason: String },
    MalformedResponse { raw: String },
    TransportError { message: String },
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            SubmissionState::Idle
                | SubmissionState::Validating
                | SubmissionState::Assembling
                | SubmissionState::Calling
        )
    }

    /// The generation failure behind a failed call, if this is one.
    pub fn failure(&self) -> Option<GenerationFailure> {
        match self {
            SubmissionState::BlockedRequest { reason } => Some(GenerationFailure::Blocked {
                reason: reason.clone(),
            }),
            SubmissionState::MalformedResponse { raw } => {
                Some(GenerationFailure::MalformedResponse { raw: raw.clone() })
            }
            SubmissionState::TransportError { message } => Some(GenerationFailure::Transport {
                message: message.clone(),
            }),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "Idle",
            SubmissionState::Validating => "Validating",
            SubmissionState::ValidationFailed(_) => "ValidationFailed",
            SubmissionState::Assembling => "Assembling",
            SubmissionState::Calling => "Calling",
            SubmissionState::Succeeded(_) => "Succeeded",
            SubmissionState::BlockedRequest { .. } => "BlockedRequest",
            SubmissionState::MalformedResponse { .. } => "MalformedResponse",
            SubmissionState::TransportError { .. } => "TransportError",
        }
    }
}

impl From<GenerationFailure> for SubmissionState {
    fn from(failure: GenerationFailure) -> Self {
        match failure {
            GenerationFailure::Blocked { reason } => SubmissionState::BlockedRequest { reason },
            GenerationFailure::MalformedResponse { raw } => SubmissionState::MalformedResponse { raw },
            GenerationFailure::Transport { message } => SubmissionState::TransportError { message },
        }
    }
}

/// Validate the form and render its request without calling any backend.
pub fn assemble(form: &InputCollector) -> Result<(Submission, GenerationRequest)> {
    let submission = form.submit()?;
    let request = GenerationRequest::assemble(&submission.profile, &submission.job, submission.temperature)?;
    Ok((submission, request))
}

/// Drives one submission at a time against a generation backend.
pub struct CoverLetterSession<B> {
    backend: B,
    state: SubmissionState,
}

impl<B: GenerationBackend> CoverLetterSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: SubmissionState::Idle,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    fn transition(&mut self, next: SubmissionState) {
        debug!("Submission {} -> {}", self.state.name(), next.name());
        self.state = next;
    }

    /// Run one full submission. The form is read fresh every time.
    ///
    /// Only a prompt that cannot be rendered is an `Err`; every outcome of
    /// the form and the call is a terminal state.
    pub async fn submit(&mut self, form: &InputCollector) -> Result<&SubmissionState> {
        self.state = SubmissionState::Idle;
        self.transition(SubmissionState::Validating);

        let submission = match form.submit() {
            Ok(submission) => submission,
            Err(error) => {
                self.transition(SubmissionState::ValidationFailed(error));
                return Ok(&self.state);
            }
        };

        self.transition(SubmissionState::Assembling);
        let request = GenerationRequest::assemble(&submission.profile, &submission.job, submission.temperature)?;

        self.transition(SubmissionState::Calling);
        let next = match request_cover_letter(&self.backend, &request).await {
            Ok(text) => SubmissionState::Succeeded(CoverLetter::new(
                text,
                &submission,
                self.backend.model_name(),
            )),
            Err(failure) => failure.into(),
        };
        self.transition(next);
        Ok(&self.state)
    }
}
