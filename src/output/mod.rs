//! Output module: generated letter, download artifact, and formatters

pub mod artifact;
pub mod formatter;
pub mod report;

pub use artifact::{artifact_file_name, CoverLetterArtifact};
pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::CoverLetter;
