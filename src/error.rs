//! Error handling for the cover letter generator

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverLetterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fejl ved læsning af PDF-fil: {0}")]
    DocumentParse(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Generation(#[from] GenerationFailure),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing API credential: set {0} or generation.api_key in the config file")]
    MissingCredential(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Prompt rendering error: {0}")]
    PromptRendering(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, CoverLetterError>;

/// Missing required field, reported in the order the form is checked.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Angiv venligst CV/erfaringstekst (enten via upload eller indsætning).")]
    MissingResumeText,

    #[error("Indsæt venligst jobbeskrivelsen.")]
    MissingJobDescription,

    #[error("Indtast venligst dit navn.")]
    MissingName,

    #[error("Indtast venligst virksomhedens navn.")]
    MissingCompany,

    #[error("Indtast venligst jobtitel/stilling.")]
    MissingRole,
}

/// Terminal failure of a single generation call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationFailure {
    /// The service refused the prompt under its content policy.
    #[error("Kunne ikke generere ansøgning. Prompten blev blokeret af sikkerhedsfiltre. Prøv at omformulere input. Detaljer: {reason}")]
    Blocked { reason: String },

    /// The service answered, but no text could be pulled out of the answer.
    #[error("Kunne ikke udtrække tekst fra API-svaret. Svarstruktur kan have ændret sig.")]
    MalformedResponse { raw: String },

    #[error("Der opstod en fejl under generering af ansøgningen: {message}")]
    Transport { message: String },
}

impl From<reqwest::Error> for GenerationFailure {
    fn from(err: reqwest::Error) -> Self {
        GenerationFailure::Transport {
            message: err.to_string(),
        }
    }
}

impl From<lopdf::Error> for CoverLetterError {
    fn from(err: lopdf::Error) -> Self {
        CoverLetterError::DocumentParse(err.to_string())
    }
}
