//! Cover letter generator library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod interactive;
pub mod llm;
pub mod output;
pub mod session;

pub use config::Config;
pub use error::{CoverLetterError, GenerationFailure, Result, ValidationError};
pub use session::{CoverLetterSession, SubmissionState};
