//! Terminal version of the application form
//!
//! Mirrors the web form: pick upload or paste for the résumé, fill in the
//! job fields, then confirm to submit. Nothing is validated or sent before
//! the confirmation.

use crate::error::{CoverLetterError, GenerationFailure, Result, ValidationError};
use crate::input::{InputCollector, PageExtractor, ResumeMode, Temperature};
use crate::llm::GenerationBackend;
use crate::output::formatter::working_indicator;
use crate::session::{CoverLetterSession, SubmissionState};
use std::io::{BufRead, Write};
use tokio::fs;

/// Ends a multi-line answer.
const END_OF_TEXT: &str = ".";

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn answer(&mut self) -> Result<String> {
        self.read_line()?.ok_or_else(|| {
            CoverLetterError::InvalidInput("Input ended before the form was complete".to_string())
        })
    }

    /// Single-line field; an empty answer keeps the current value.
    fn ask(&mut self, label: &str, current: &str) -> Result<String> {
        if current.is_empty() {
            write!(self.output, "{}: ", label)?;
        } else {
            write!(self.output, "{} [{}]: ", label, current)?;
        }
        self.output.flush()?;

        let answer = self.answer()?;
        if answer.trim().is_empty() {
            Ok(current.to_string())
        } else {
            Ok(answer.trim().to_string())
        }
    }

    /// Multi-line field ending at a lone `.` or end of input. Ending right
    /// away keeps the current value.
    fn ask_multiline(&mut self, label: &str, current: &str) -> Result<String> {
        writeln!(self.output, "{} (afslut med en linje med kun '{}'):", label, END_OF_TEXT)?;
        if !current.is_empty() {
            writeln!(self.output, "  (tryk '{}' for at beholde den nuværende tekst)", END_OF_TEXT)?;
        }
        self.output.flush()?;

        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line.trim() == END_OF_TEXT {
                break;
            }
            lines.push(line);
        }

        if lines.is_empty() {
            Ok(current.to_string())
        } else {
            Ok(lines.join("\n"))
        }
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "J/n" } else { "j/N" };
        write!(self.output, "{} [{}]: ", question, hint)?;
        self.output.flush()?;

        let answer = self.read_line()?.unwrap_or_default().trim().to_lowercase();
        Ok(match answer.as_str() {
            "j" | "ja" | "y" | "yes" => true,
            "n" | "nej" | "no" => false,
            _ => default,
        })
    }

    fn choose_mode(&mut self, current: ResumeMode) -> Result<ResumeMode> {
        let default = match current {
            ResumeMode::Upload => "1",
            ResumeMode::Paste => "2",
        };
        loop {
            writeln!(self.output, "Vil du uploade eller indsætte dit CV/dine nøgleerfaringer?")?;
            writeln!(self.output, "  [1] Upload\n  [2] Indsæt")?;
            let choice = self.ask("Valg", default)?;
            match choice.to_lowercase().as_str() {
                "1" | "upload" | "u" => return Ok(ResumeMode::Upload),
                "2" | "indsæt" | "i" => return Ok(ResumeMode::Paste),
                other => writeln!(self.output, "Ukendt valg: {}", other)?,
            }
        }
    }

    /// Stage the résumé by upload or paste. A failed or empty upload offers
    /// the choice again, and switching to paste discards the upload.
    pub async fn fill_resume<E: PageExtractor + ?Sized>(
        &mut self,
        form: &mut InputCollector,
        extractor: &E,
    ) -> Result<()> {
        loop {
            let mode = self.choose_mode(form.mode())?;
            form.select_mode(mode);

            match mode {
                ResumeMode::Paste => {
                    let text = self.ask_multiline("Indsæt CV-elementer eller relevant erfaring her", form.resume_text())?;
                    form.set_pasted_text(text);
                    return Ok(());
                }
                ResumeMode::Upload => {
                    let path = self.ask("📁 Sti til dit CV i PDF-format", "")?;
                    if path.is_empty() {
                        if form.resume_source().is_some() {
                            return Ok(());
                        }
                        writeln!(self.output, "Ingen fil valgt.")?;
                        continue;
                    }

                    let bytes = match fs::read(&path).await {
                        Ok(bytes) => bytes,
                        Err(e) => {
                            writeln!(self.output, "Kunne ikke læse {}: {}", path, e)?;
                            continue;
                        }
                    };

                    match form.stage_upload(bytes, extractor) {
                        Ok(outcome) => match outcome.warning() {
                            Some(warning) => {
                                writeln!(self.output, "⚠️  {}", warning)?;
                                if !self.confirm("Vil du fortsætte alligevel?", false)? {
                                    continue;
                                }
                                return Ok(());
                            }
                            None => return Ok(()),
                        },
                        Err(e) => {
                            writeln!(self.output, "{}", e)?;
                            writeln!(self.output, "Prøv venligst at indsætte teksten manuelt.")?;
                        }
                    }
                }
            }
        }
    }

    pub fn fill_fields(&mut self, form: &mut InputCollector) -> Result<()> {
        form.job_description = self.ask_multiline("Indsæt jobbeskrivelsen her", &form.job_description)?;
        form.name = self.ask("Dit navn", &form.name)?;
        form.company = self.ask("Virksomhedens navn", &form.company)?;
        form.manager = self.ask("Ansættende leder (valgfrit, lad stå tomt hvis ukendt)", &form.manager)?;
        form.role = self.ask("Jobtitel/Stilling ansøgt", &form.role)?;
        form.referral = self.ask("Hvordan hørte du om denne mulighed?", &form.referral)?;

        let current = format!("{:.1}", form.temperature.value());
        let answer = self.ask("AI Temperatur (0.0 = Meget faktuel, 1.0 = Meget kreativ)", &current)?;
        match answer.replace(',', ".").parse::<f32>() {
            Ok(value) => form.temperature = Temperature::new(value),
            Err(_) => writeln!(self.output, "Ugyldig temperatur, beholder {}", current)?,
        }
        Ok(())
    }
}

/// Fill the form and submit until the user is done.
///
/// A validation failure always goes back to the form. A failed call is shown
/// and the user may correct the form and resubmit with every value kept.
/// Returns the last terminal state, or `None` when the user declines to
/// submit.
pub async fn run_form<R, W, B, E>(
    prompter: &mut Prompter<R, W>,
    form: &mut InputCollector,
    session: &mut CoverLetterSession<B>,
    extractor: &E,
    show_progress: bool,
) -> Result<Option<SubmissionState>>
where
    R: BufRead,
    W: Write,
    B: GenerationBackend,
    E: PageExtractor + ?Sized,
{
    prompter.fill_resume(form, extractor).await?;
    prompter.fill_fields(form)?;

    loop {
        if !prompter.confirm("Generer Ansøgning?", true)? {
            return Ok(None);
        }

        let indicator = working_indicator(session.backend().model_name(), show_progress);
        let state = session.submit(form).await?.clone();
        indicator.finish_and_clear();

        if let SubmissionState::ValidationFailed(error) = state {
            writeln!(prompter.output, "❌ {}", error)?;
            if error == ValidationError::MissingResumeText {
                prompter.fill_resume(form, extractor).await?;
            }
            prompter.fill_fields(form)?;
            continue;
        }

        let Some(failure) = state.failure() else {
            return Ok(Some(state));
        };
        writeln!(prompter.output, "❌ {}", failure)?;
        if let GenerationFailure::MalformedResponse { raw } = &failure {
            writeln!(prompter.output, "Rå API Svar:\n{}", raw)?;
        }
        if !prompter.confirm("Vil du rette og prøve igen?", true)? {
            return Ok(Some(state));
        }
        prompter.fill_fields(form)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ResumeSource;
    use crate::llm::{GenerationRequest, ResponseShape};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Echo {
        calls: AtomicUsize,
    }

    impl GenerationBackend for Echo {
        async fn generate(&self, request: &GenerationRequest) -> std::result::Result<ResponseShape, GenerationFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ResponseShape::DirectText(request.prompt.clone()))
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    /// Fails the first call, echoes the prompt after that.
    struct FailsFirst {
        calls: AtomicUsize,
        failure: GenerationFailure,
    }

    impl FailsFirst {
        fn new(failure: GenerationFailure) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failure,
            }
        }
    }

    impl GenerationBackend for FailsFirst {
        async fn generate(&self, request: &GenerationRequest) -> std::result::Result<ResponseShape, GenerationFailure> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(self.failure.clone());
            }
            Ok(ResponseShape::DirectText(request.prompt.clone()))
        }

        fn model_name(&self) -> &str {
            "fails-first"
        }
    }

    struct NoText;

    impl PageExtractor for NoText {
        fn extract_pages(&self, _bytes: &[u8]) -> Result<Vec<Option<String>>> {
            Ok(vec![None])
        }
    }

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    #[tokio::test]
    async fn test_paste_mode_reads_until_terminator() {
        let mut form = InputCollector::new();
        let mut prompter = prompter("2\nLinje et\nLinje to\n.\n");
        prompter.fill_resume(&mut form, &NoText).await.unwrap();
        assert_eq!(form.resume_text(), "Linje et\nLinje to");
        assert_eq!(form.mode(), ResumeMode::Paste);
    }

    #[tokio::test]
    async fn test_empty_upload_falls_back_to_paste() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("cv.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();

        let script = format!("1\n{}\nn\n2\nManuelt CV\n.\n", pdf.display());
        let mut form = InputCollector::new();
        let mut prompter = prompter(&script);
        prompter.fill_resume(&mut form, &NoText).await.unwrap();

        assert_eq!(form.resume_source(), Some(&ResumeSource::Pasted("Manuelt CV".to_string())));
        let transcript = String::from_utf8(prompter.output).unwrap();
        assert!(transcript.contains("Kunne ikke udtrække tekst fra PDF'en"));
    }

    #[test]
    fn test_fields_keep_current_values_on_empty_answer() {
        let mut form = InputCollector::new();
        form.name = "Alice".to_string();
        let mut prompter = prompter("Backend rolle\n.\n\nAcme\n\nBackend Engineer\nJobindex\n1,5\n");
        prompter.fill_fields(&mut form).unwrap();

        assert_eq!(form.job_description, "Backend rolle");
        assert_eq!(form.name, "Alice");
        assert_eq!(form.company, "Acme");
        assert_eq!(form.manager, "");
        assert_eq!(form.referral, "Jobindex");
        assert_eq!(form.temperature.value(), 1.0);
    }

    #[tokio::test]
    async fn test_closed_input_is_an_error() {
        let mut form = InputCollector::new();
        let mut prompter = prompter("");
        assert!(matches!(
            prompter.fill_resume(&mut form, &NoText).await,
            Err(CoverLetterError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_validation_failure_reprompts_before_calling() {
        // First pass leaves the role blank, second pass fills it in.
        let script = "2\nRust CV\n.\nBackend rolle\n.\nAlice\nAcme\n\n\n\n\n\
                      j\n.\n\n\n\nBackend Engineer\n\n\nj\n";
        let mut prompter = prompter(script);
        let mut form = InputCollector::new();
        let mut session = CoverLetterSession::new(Echo {
            calls: AtomicUsize::new(0),
        });

        let state = run_form(&mut prompter, &mut form, &mut session, &NoText, false)
            .await
            .unwrap();

        match state {
            Some(SubmissionState::Succeeded(letter)) => {
                assert!(letter.text.contains("Stilling: Backend Engineer"));
                assert_eq!(letter.company, "Acme");
            }
            other => panic!("unexpected state: {:?}", other),
        }
        assert_eq!(session.backend().calls.load(Ordering::SeqCst), 1);

        let transcript = String::from_utf8(prompter.output).unwrap();
        assert!(transcript.contains("Indtast venligst jobtitel/stilling."));
    }

    #[tokio::test]
    async fn test_declining_submission_makes_no_call() {
        let script = "2\nRust CV\n.\nBackend rolle\n.\nAlice\nAcme\n\nBackend Engineer\n\n\nn\n";
        let mut prompter = prompter(script);
        let mut form = InputCollector::new();
        let mut session = CoverLetterSession::new(Echo {
            calls: AtomicUsize::new(0),
        });

        let state = run_form(&mut prompter, &mut form, &mut session, &NoText, false)
            .await
            .unwrap();
        assert!(state.is_none());
        assert_eq!(session.backend().calls.load(Ordering::SeqCst), 0);
    }

    const FILLED_FORM: &str = "2\nRust CV\n.\nBackend rolle\n.\nAlice\nAcme\n\nBackend Engineer\n\n\n";

    #[tokio::test]
    async fn test_blocked_request_can_be_corrected_and_resubmitted() {
        // Blocked once, retry with a new role and everything else kept.
        let script = format!("{}j\nj\n.\n\n\n\nPlatform Engineer\n\n\nj\n", FILLED_FORM);
        let mut prompter = prompter(&script);
        let mut form = InputCollector::new();
        let mut session = CoverLetterSession::new(FailsFirst::new(GenerationFailure::Blocked {
            reason: "SAFETY".to_string(),
        }));

        let state = run_form(&mut prompter, &mut form, &mut session, &NoText, false)
            .await
            .unwrap();

        match state {
            Some(SubmissionState::Succeeded(letter)) => {
                assert!(letter.text.contains("Stilling: Platform Engineer"));
                assert!(letter.text.contains("Rust CV"));
                assert_eq!(letter.company, "Acme");
            }
            other => panic!("unexpected state: {:?}", other),
        }
        assert_eq!(session.backend().calls.load(Ordering::SeqCst), 2);

        let transcript = String::from_utf8(prompter.output).unwrap();
        assert!(transcript.contains("SAFETY"));
        assert!(transcript.contains("Vil du rette og prøve igen?"));
    }

    #[tokio::test]
    async fn test_declined_retry_returns_failure_with_raw_answer() {
        let script = format!("{}j\nn\n", FILLED_FORM);
        let mut prompter = prompter(&script);
        let mut form = InputCollector::new();
        let mut session = CoverLetterSession::new(FailsFirst::new(GenerationFailure::MalformedResponse {
            raw: "{\"candidates\": []}".to_string(),
        }));

        let state = run_form(&mut prompter, &mut form, &mut session, &NoText, false)
            .await
            .unwrap();

        assert!(matches!(state, Some(SubmissionState::MalformedResponse { .. })));
        assert_eq!(session.backend().calls.load(Ordering::SeqCst), 1);
        assert_eq!(form.role, "Backend Engineer");

        let transcript = String::from_utf8(prompter.output).unwrap();
        assert!(transcript.contains("Rå API Svar:\n{\"candidates\": []}"));
    }
}
