//! CLI interface for the cover letter generator

use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cover-letter")]
#[command(about = "AI-powered cover letter generator")]
#[command(long_about = "Draft a tailored Danish cover letter from your resume and a job description using a hosted LLM")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a cover letter in one go
    Generate(GenerateArgs),

    /// Fill in the form step by step in the terminal
    Interactive {
        /// Directory for the downloaded letter
        #[arg(long)]
        save_dir: Option<PathBuf>,

        /// Do not write the letter to disk
        #[arg(long)]
        no_save: bool,
    },

    /// Show the text extracted from a resume PDF
    Extract {
        /// Path to the PDF
        file: PathBuf,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Args)]
#[command(group(ArgGroup::new("resume_input").args(["resume", "resume_text"])))]
#[command(group(ArgGroup::new("job_input").args(["job", "job_text"])))]
pub struct GenerateArgs {
    /// Resume file: PDF is uploaded and extracted, TXT/MD is used as pasted text
    #[arg(short, long)]
    pub resume: Option<PathBuf>,

    /// Resume or key experience as text
    #[arg(long)]
    pub resume_text: Option<String>,

    /// Job description file (TXT, MD, PDF)
    #[arg(short, long)]
    pub job: Option<PathBuf>,

    /// Job description as text
    #[arg(long)]
    pub job_text: Option<String>,

    /// Your name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Company name
    #[arg(long)]
    pub company: Option<String>,

    /// Job title applied for
    #[arg(long)]
    pub role: Option<String>,

    /// Hiring manager (leave out if unknown)
    #[arg(short, long)]
    pub manager: Option<String>,

    /// Where you heard about the opening
    #[arg(long)]
    pub referral: Option<String>,

    /// Creativity between 0.0 (factual) and 1.0 (creative)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Output format: console, json
    #[arg(short, long)]
    pub output: Option<String>,

    /// Directory for the downloaded letter
    #[arg(long)]
    pub save_dir: Option<PathBuf>,

    /// Do not write the letter to disk
    #[arg(long)]
    pub no_save: bool,

    /// Print the rendered prompt instead of calling the service
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_resume_sources_are_exclusive() {
        let result = Cli::try_parse_from([
            "cover-letter",
            "generate",
            "--resume",
            "cv.pdf",
            "--resume-text",
            "Rust",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_fields_are_left_to_validation() {
        let cli = Cli::try_parse_from(["cover-letter", "generate", "--job-text", "Backend"]).unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert!(args.resume.is_none());
                assert!(args.name.is_none());
                assert_eq!(args.job_text.as_deref(), Some("Backend"));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_extension_check() {
        assert!(validate_file_extension(Path::new("cv.PDF"), &["pdf"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), &["pdf", "txt"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["pdf"]).is_err());
    }
}
