//! Form state for one cover letter submission
//!
//! The collector holds whatever the user has entered so far. Nothing here is
//! validated until [`InputCollector::submit`] is called, which is the single
//! gate in front of the generation call.

use crate::error::{Result, ValidationError};
use crate::input::text_extractor::{extract_text, ExtractionOutcome, PageExtractor};
use log::debug;
use serde::{Deserialize, Serialize};

/// Stored for a hiring manager left blank.
pub const UNKNOWN_MANAGER: &str = "Ukendt";
/// Stored for a referral source left blank.
pub const UNSPECIFIED_REFERRAL: &str = "Ikke specificeret";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumeMode {
    Upload,
    Paste,
}

/// Where the résumé text came from. Only one variant is ever held.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeSource {
    /// Text extracted from an uploaded document, possibly empty.
    Uploaded(String),
    Pasted(String),
}

impl ResumeSource {
    pub fn mode(&self) -> ResumeMode {
        match self {
            ResumeSource::Uploaded(_) => ResumeMode::Upload,
            ResumeSource::Pasted(_) => ResumeMode::Paste,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            ResumeSource::Uploaded(text) | ResumeSource::Pasted(text) => text,
        }
    }
}

/// Creativity setting, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Temperature(f32);

impl Temperature {
    pub const DEFAULT: f32 = 0.7;

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(Self::DEFAULT);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<f32> for Temperature {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Temperature> for f32 {
    fn from(temperature: Temperature) -> Self {
        temperature.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDraft {
    pub resume_text: String,
    pub name: String,
    pub referral_source: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobDraft {
    pub company: String,
    pub role: String,
    pub manager: String,
    pub job_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub resume_text: String,
    pub name: String,
    pub referral_source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobTarget {
    pub company: String,
    pub role: String,
    pub manager: String,
    pub job_description: String,
}

impl JobTarget {
    /// False when the manager is the "unspecified" sentinel.
    pub fn manager_known(&self) -> bool {
        let manager = self.manager.trim();
        !(manager.is_empty()
            || manager.eq_ignore_ascii_case(UNKNOWN_MANAGER)
            || manager.eq_ignore_ascii_case("Unknown"))
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn or_sentinel(value: &str, sentinel: &str) -> String {
    if is_blank(value) {
        sentinel.to_string()
    } else {
        value.to_string()
    }
}

/// Check required fields in form order and fill optional ones with sentinels.
pub fn validate(
    profile: &ProfileDraft,
    job: &JobDraft,
) -> std::result::Result<(ApplicantProfile, JobTarget), ValidationError> {
    let checks = [
        (&profile.resume_text, ValidationError::MissingResumeText),
        (&job.job_description, ValidationError::MissingJobDescription),
        (&profile.name, ValidationError::MissingName),
        (&job.company, ValidationError::MissingCompany),
        (&job.role, ValidationError::MissingRole),
    ];
    if let Some((_, error)) = checks.into_iter().find(|(value, _)| is_blank(value)) {
        return Err(error);
    }

    let applicant = ApplicantProfile {
        resume_text: profile.resume_text.clone(),
        name: profile.name.clone(),
        referral_source: or_sentinel(&profile.referral_source, UNSPECIFIED_REFERRAL),
    };
    let target = JobTarget {
        company: job.company.clone(),
        role: job.role.clone(),
        manager: or_sentinel(&job.manager, UNKNOWN_MANAGER),
        job_description: job.job_description.clone(),
    };
    Ok((applicant, target))
}

/// A validated submission, rebuilt from the form on every submit.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub profile: ApplicantProfile,
    pub job: JobTarget,
    pub temperature: Temperature,
}

#[derive(Debug, Clone)]
pub struct InputCollector {
    mode: ResumeMode,
    resume: Option<ResumeSource>,
    pub job_description: String,
    pub name: String,
    pub company: String,
    pub manager: String,
    pub role: String,
    pub referral: String,
    pub temperature: Temperature,
}

impl Default for InputCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl InputCollector {
    pub fn new() -> Self {
        Self {
            mode: ResumeMode::Upload,
            resume: None,
            job_description: String::new(),
            name: String::new(),
            company: String::new(),
            manager: String::new(),
            role: String::new(),
            referral: String::new(),
            temperature: Temperature::default(),
        }
    }

    pub fn mode(&self) -> ResumeMode {
        self.mode
    }

    pub fn resume_source(&self) -> Option<&ResumeSource> {
        self.resume.as_ref()
    }

    pub fn resume_text(&self) -> &str {
        self.resume.as_ref().map(ResumeSource::text).unwrap_or("")
    }

    /// Switch résumé mode. Changing mode drops whatever the other mode staged.
    pub fn select_mode(&mut self, mode: ResumeMode) {
        if self.mode != mode {
            debug!("Résumé mode {:?} -> {:?}, discarding staged input", self.mode, mode);
            self.mode = mode;
            self.resume = None;
        }
    }

    /// Stage an uploaded document and extract its text immediately.
    ///
    /// On a parse failure nothing stays staged and the error is returned so
    /// the caller can steer the user to manual entry.
    pub fn stage_upload<E: PageExtractor + ?Sized>(
        &mut self,
        bytes: Vec<u8>,
        extractor: &E,
    ) -> Result<ExtractionOutcome> {
        self.select_mode(ResumeMode::Upload);
        self.resume = None;

        let text = extract_text(extractor, &bytes)?;
        let outcome = ExtractionOutcome::of(&text);
        self.resume = Some(ResumeSource::Uploaded(text));
        Ok(outcome)
    }

    pub fn set_pasted_text(&mut self, text: impl Into<String>) {
        self.select_mode(ResumeMode::Paste);
        self.resume = Some(ResumeSource::Pasted(text.into()));
    }

    pub fn drafts(&self) -> (ProfileDraft, JobDraft) {
        let profile = ProfileDraft {
            resume_text: self.resume_text().to_string(),
            name: self.name.clone(),
            referral_source: self.referral.clone(),
        };
        let job = JobDraft {
            company: self.company.clone(),
            role: self.role.clone(),
            manager: self.manager.clone(),
            job_description: self.job_description.clone(),
        };
        (profile, job)
    }

    pub fn submit(&self) -> std::result::Result<Submission, ValidationError> {
        let (profile, job) = self.drafts();
        let (profile, job) = validate(&profile, &job)?;
        Ok(Submission {
            profile,
            job,
            temperature: self.temperature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoverLetterError;

    struct OnePage(&'static str);

    impl PageExtractor for OnePage {
        fn extract_pages(&self, _bytes: &[u8]) -> Result<Vec<Option<String>>> {
            Ok(vec![Some(self.0.to_string())])
        }
    }

    struct Corrupt;

    impl PageExtractor for Corrupt {
        fn extract_pages(&self, _bytes: &[u8]) -> Result<Vec<Option<String>>> {
            Err(CoverLetterError::DocumentParse("invalid file header".to_string()))
        }
    }

    fn filled_form() -> InputCollector {
        let mut form = InputCollector::new();
        form.set_pasted_text("5 years Go backend experience");
        form.job_description = "Seeking backend engineer".to_string();
        form.name = "Alice".to_string();
        form.company = "Acme".to_string();
        form.role = "Backend Engineer".to_string();
        form
    }

    #[test]
    fn test_switching_mode_discards_upload() {
        let mut form = filled_form();
        form.stage_upload(b"%PDF".to_vec(), &OnePage("Uploaded CV")).unwrap();
        assert_eq!(form.resume_text(), "Uploaded CV\n");

        form.select_mode(ResumeMode::Paste);
        assert!(form.resume_source().is_none());

        form.set_pasted_text("Pasted CV");
        let submission = form.submit().unwrap();
        assert_eq!(submission.profile.resume_text, "Pasted CV");
    }

    #[test]
    fn test_reselecting_same_mode_keeps_text() {
        let mut form = filled_form();
        form.select_mode(ResumeMode::Paste);
        assert_eq!(form.resume_text(), "5 years Go backend experience");
    }

    #[test]
    fn test_failed_upload_leaves_nothing_staged() {
        let mut form = filled_form();
        let err = form.stage_upload(b"garbage".to_vec(), &Corrupt).unwrap_err();
        assert!(matches!(err, CoverLetterError::DocumentParse(_)));
        assert_eq!(form.mode(), ResumeMode::Upload);
        assert_eq!(form.submit().unwrap_err(), ValidationError::MissingResumeText);
    }

    #[test]
    fn test_empty_extraction_is_only_a_warning() {
        let mut form = filled_form();
        let outcome = form.stage_upload(b"%PDF".to_vec(), &OnePage("")).unwrap();
        assert_eq!(outcome, ExtractionOutcome::Empty);
        assert!(matches!(form.resume_source(), Some(ResumeSource::Uploaded(_))));
    }

    #[test]
    fn test_validation_order() {
        let empty = (ProfileDraft::default(), JobDraft::default());
        assert_eq!(validate(&empty.0, &empty.1).unwrap_err(), ValidationError::MissingResumeText);

        let mut form = filled_form();
        form.job_description = " \n".to_string();
        form.name.clear();
        assert_eq!(form.submit().unwrap_err(), ValidationError::MissingJobDescription);

        form.job_description = "Seeking backend engineer".to_string();
        assert_eq!(form.submit().unwrap_err(), ValidationError::MissingName);

        form.name = "Alice".to_string();
        form.company.clear();
        form.role.clear();
        assert_eq!(form.submit().unwrap_err(), ValidationError::MissingCompany);

        form.company = "Acme".to_string();
        assert_eq!(form.submit().unwrap_err(), ValidationError::MissingRole);
    }

    #[test]
    fn test_optional_fields_get_sentinels() {
        let form = filled_form();
        let submission = form.submit().unwrap();
        assert_eq!(submission.job.manager, UNKNOWN_MANAGER);
        assert_eq!(submission.profile.referral_source, UNSPECIFIED_REFERRAL);
        assert!(!submission.job.manager_known());
    }

    #[test]
    fn test_present_values_are_kept_verbatim() {
        let mut form = filled_form();
        form.manager = "  Bob Smith ".to_string();
        let submission = form.submit().unwrap();
        assert_eq!(submission.job.manager, "  Bob Smith ");
        assert!(submission.job.manager_known());
    }

    #[test]
    fn test_temperature_is_clamped() {
        assert_eq!(Temperature::new(1.5).value(), 1.0);
        assert_eq!(Temperature::new(-0.2).value(), 0.0);
        assert_eq!(Temperature::new(f32::NAN).value(), Temperature::DEFAULT);
        assert_eq!(Temperature::default().value(), 0.7);
    }
}
