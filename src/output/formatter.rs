//! Output formatters for generated cover letters

use crate::config::OutputFormat;
use crate::error::{CoverLetterError, Result};
use crate::output::artifact::CoverLetterArtifact;
use crate::output::report::CoverLetter;
use colored::{Color, Colorize};
use indicatif::ProgressBar;
use serde::Serialize;
use std::time::Duration;

/// Trait for formatting a generated letter
pub trait OutputFormatter {
    fn format_letter(&self, letter: &CoverLetter) -> Result<String>;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for scripting
pub struct JsonFormatter {
    pretty: bool,
}

#[derive(Serialize)]
struct JsonLetter<'a> {
    text: &'a str,
    file_name: &'a str,
    content_type: &'a str,
    applicant_name: &'a str,
    company: &'a str,
    role: &'a str,
    model: &'a str,
    temperature: f32,
    generated_at: String,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "█".color(Color::Blue).bold(), title.color(Color::Blue).bold())
        } else {
            format!("\n█ {}\n", title)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_letter(&self, letter: &CoverLetter) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("Genereret Ansøgning:"));
        output.push_str(&self.colorize(
            &format!(
                "{} · {} · {} · temperatur {:.1} · {}\n\n",
                letter.company,
                letter.role,
                letter.model,
                letter.temperature,
                letter.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Color::BrightBlack,
        ));
        output.push_str(letter.text.trim_end());
        output.push('\n');

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_letter(&self, letter: &CoverLetter) -> Result<String> {
        let artifact = letter.artifact();
        let json = JsonLetter {
            text: &letter.text,
            file_name: &artifact.file_name,
            content_type: artifact.content_type,
            applicant_name: &letter.applicant_name,
            company: &letter.company,
            role: &letter.role,
            model: &letter.model,
            temperature: letter.temperature,
            generated_at: letter.generated_at.to_rfc3339(),
        };

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&json)
        } else {
            serde_json::to_string(&json)
        };
        rendered.map_err(|e| CoverLetterError::OutputFormatting(format!("Failed to render JSON: {}", e)))
    }
}

/// Picks the formatter for the configured output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
}

impl ReportGenerator {
    pub fn new(use_colors: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(true),
        }
    }

    pub fn generate_report(&self, letter: &CoverLetter, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_letter(letter),
            OutputFormat::Json => self.json_formatter.format_letter(letter),
        }
    }
}

/// One-line download hint shown after the letter.
pub fn describe_artifact(artifact: &CoverLetterArtifact) -> String {
    format!(
        "Download Ansøgningen (.txt): {} ({}, {} bytes)",
        artifact.file_name,
        artifact.content_type,
        artifact.bytes.len()
    )
}

/// Spinner shown while the generation call is outstanding.
pub fn working_indicator(model: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Genererer ansøgning med {}... Vent venligst.", model));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn parse_output_format(format: &str) -> std::result::Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn letter() -> CoverLetter {
        CoverLetter {
            text: "Kære Bob Smith,\n\nMed venlig hilsen\nAlice\n\n".to_string(),
            applicant_name: "Alice".to_string(),
            company: "Acme Corp".to_string(),
            role: "Backend Engineer".to_string(),
            model: "gemini-2.5-pro".to_string(),
            temperature: 0.7,
            generated_at: Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false).format_letter(&letter()).unwrap();
        assert!(output.contains("█ Genereret Ansøgning:"));
        assert!(output.contains("Acme Corp · Backend Engineer"));
        assert!(output.ends_with("Med venlig hilsen\nAlice\n"));
    }

    #[test]
    fn test_json_includes_artifact_name() {
        let output = ReportGenerator::new(false)
            .generate_report(&letter(), OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["file_name"], "ansoegning_Alice_Acme_Corp.txt");
        assert_eq!(value["content_type"], "text/plain");
        assert_eq!(value["text"], letter().text);
        assert_eq!(value["generated_at"], "2026-10-16T12:00:00+00:00");
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(parse_output_format("console").unwrap(), OutputFormat::Console);
        assert!(parse_output_format("pdf").is_err());
    }
}
