//! Generated cover letter and its metadata

use crate::input::Submission;
use crate::output::artifact::CoverLetterArtifact;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLetter {
    pub text: String,
    pub applicant_name: String,
    pub company: String,
    pub role: String,
    pub model: String,
    pub temperature: f32,
    pub generated_at: DateTime<Utc>,
}

impl CoverLetter {
    pub fn new(text: String, submission: &Submission, model: &str) -> Self {
        Self {
            text,
            applicant_name: submission.profile.name.clone(),
            company: submission.job.company.clone(),
            role: submission.job.role.clone(),
            model: model.to_string(),
            temperature: submission.temperature.value(),
            generated_at: Utc::now(),
        }
    }

    pub fn artifact(&self) -> CoverLetterArtifact {
        CoverLetterArtifact::new(&self.text, &self.applicant_name, &self.company)
    }
}
