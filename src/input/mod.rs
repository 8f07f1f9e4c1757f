//! Input processing module
//! Handles file detection, résumé text extraction, and form collection

pub mod collector;
pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use collector::{
    validate, ApplicantProfile, InputCollector, JobDraft, JobTarget, ProfileDraft, ResumeMode,
    ResumeSource, Submission, Temperature,
};
pub use manager::{InputManager, ResumeFile};
pub use text_extractor::{extract_text, ExtractionOutcome, PageExtractor, PdfPageExtractor};
