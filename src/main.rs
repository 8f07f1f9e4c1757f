//! Cover letter: AI-powered cover letter generator

use clap::Parser;
use colored::Colorize;
use cover_letter::cli::{self, Cli, Commands, ConfigAction, GenerateArgs};
use cover_letter::config::{Config, OutputFormat};
use cover_letter::error::{CoverLetterError, GenerationFailure, Result};
use cover_letter::input::{
    extract_text, ExtractionOutcome, InputCollector, InputManager, PdfPageExtractor, ResumeFile,
    Temperature,
};
use cover_letter::interactive::{run_form, Prompter};
use cover_letter::llm::GeminiClient;
use cover_letter::output::formatter::{describe_artifact, parse_output_format, working_indicator};
use cover_letter::output::ReportGenerator;
use cover_letter::session::{self, CoverLetterSession, SubmissionState};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("{}", e);
        process::exit(1);
    }
}

/// Where and how a finished letter is delivered.
struct Delivery {
    format: OutputFormat,
    use_colors: bool,
    save_dir: Option<PathBuf>,
}

impl Delivery {
    fn new(config: &Config, format: OutputFormat, save_dir: Option<PathBuf>, no_save: bool) -> Self {
        let save_dir = if no_save || !config.output.save_artifact {
            None
        } else {
            Some(save_dir.unwrap_or_else(|| config.output.directory.clone()))
        };
        Self {
            format,
            use_colors: config.output.color_output,
            save_dir,
        }
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Generate(args) => run_generate(args, &config).await,

        Commands::Interactive { save_dir, no_save } => {
            let api_key = config.api_key()?;
            let delivery = Delivery::new(&config, OutputFormat::Console, save_dir, no_save);

            println!("📝 AI-drevet Ansøgningsgenerator\n");
            println!("Generer en skræddersyet ansøgning. Alt du skal gøre er:");
            println!("1. Upload dit CV eller kopier/indsæt dit CV/dine erfaringer");
            println!("2. Indsæt en relevant jobbeskrivelse");
            println!("3. Indtast andre relevante bruger-/jobdata\n");

            let mut form = InputCollector::new();
            form.temperature = Temperature::new(config.generation.default_temperature);
            let mut session = CoverLetterSession::new(GeminiClient::new(&config.generation, api_key));
            let stdin = std::io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), std::io::stdout());

            match run_form(&mut prompter, &mut form, &mut session, &PdfPageExtractor, true).await? {
                // The form has already shown the failure
                Some(state) => match state.failure() {
                    Some(failure) => Err(failure.into()),
                    None => deliver(&state, &delivery),
                },
                None => {
                    println!("Ingen ansøgning genereret.");
                    Ok(())
                }
            }
        }

        Commands::Extract { file } => {
            cli::validate_file_extension(&file, &["pdf"])
                .map_err(|e| CoverLetterError::InvalidInput(format!("Resume file: {}", e)))?;

            let bytes = tokio::fs::read(&file).await?;
            let text = match extract_text(&PdfPageExtractor, &bytes) {
                Ok(text) => text,
                Err(e) => {
                    println!("{}", "Prøv venligst at indsætte teksten manuelt.".yellow());
                    return Err(e);
                }
            };

            match ExtractionOutcome::of(&text) {
                ExtractionOutcome::Empty => {
                    println!("⚠️  {}", ExtractionOutcome::Empty.warning().unwrap_or_default().yellow());
                }
                ExtractionOutcome::Extracted { characters } => {
                    println!("📄 {} ({} tegn)\n", file.display(), characters);
                    print!("{}", text);
                }
            }
            Ok(())
        }

        Commands::Config { action } => {
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration ({})\n", config_path.display());
                    println!("Model: {}", config.generation.model);
                    println!("Endpoint: {}", config.generation.endpoint);
                    println!("Default temperature: {:.1}", config.generation.default_temperature);
                    println!("API key variable: {}", config.generation.api_key_env);
                    println!(
                        "API key in config file: {}",
                        if config.generation.api_key.is_some() { "yes" } else { "no" }
                    );
                    println!("\nOutput format: {:?}", config.output.format);
                    println!("Output directory: {}", config.output.directory.display());
                    println!("Save letter: {}", config.output.save_artifact);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(config_path)?;
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Path) => {
                    println!("{}", config_path.display());
                }
            }
            Ok(())
        }
    }
}

async fn run_generate(args: GenerateArgs, config: &Config) -> Result<()> {
    // The credential must exist before anything is submitted
    let api_key = if args.dry_run { None } else { Some(config.api_key()?) };

    let format = match args.output.as_deref() {
        Some(format) => parse_output_format(format).map_err(CoverLetterError::InvalidInput)?,
        None => config.output.format,
    };

    let manager = InputManager::new();
    let mut form = InputCollector::new();

    if let Some(path) = &args.resume {
        cli::validate_file_extension(path, &["pdf", "txt", "md"])
            .map_err(|e| CoverLetterError::InvalidInput(format!("Resume file: {}", e)))?;

        match manager.load_resume(path).await? {
            ResumeFile::Document(bytes) => match form.stage_upload(bytes, &PdfPageExtractor) {
                Ok(outcome) => {
                    if let Some(warning) = outcome.warning() {
                        eprintln!("⚠️  {}", warning.yellow());
                    }
                }
                Err(e) => {
                    eprintln!("{}", "Prøv venligst at indsætte teksten manuelt (--resume-text).".yellow());
                    return Err(e);
                }
            },
            ResumeFile::Text(text) => form.set_pasted_text(text),
        }
    } else if let Some(text) = args.resume_text {
        form.set_pasted_text(text);
    }

    if let Some(path) = &args.job {
        form.job_description = manager.load_text(path).await?;
    } else if let Some(text) = args.job_text {
        form.job_description = text;
    }

    form.name = args.name.unwrap_or_default();
    form.company = args.company.unwrap_or_default();
    form.role = args.role.unwrap_or_default();
    form.manager = args.manager.unwrap_or_default();
    form.referral = args.referral.unwrap_or_default();
    form.temperature = Temperature::new(args.temperature.unwrap_or(config.generation.default_temperature));

    let api_key = match api_key {
        Some(api_key) => api_key,
        None => {
            let (_, request) = session::assemble(&form)?;
            info!("Dry run: prompt rendered, no request sent");
            println!("{}", request.prompt);
            return Ok(());
        }
    };

    let delivery = Delivery::new(config, format, args.save_dir, args.no_save);
    let mut session = CoverLetterSession::new(GeminiClient::new(&config.generation, api_key));

    let indicator = working_indicator(&config.generation.model, format == OutputFormat::Console);
    let state = session.submit(&form).await.map(SubmissionState::clone);
    indicator.finish_and_clear();
    let state = state?;

    deliver(&state, &delivery)
}

/// Show a terminal submission state and save the letter on success.
fn deliver(state: &SubmissionState, delivery: &Delivery) -> Result<()> {
    match state {
        SubmissionState::Succeeded(letter) => {
            let report = ReportGenerator::new(delivery.use_colors).generate_report(letter, delivery.format)?;
            println!("{}", report);

            if let Some(dir) = &delivery.save_dir {
                let artifact = letter.artifact();
                let path = artifact.save_in(dir)?;
                if delivery.format == OutputFormat::Console {
                    println!("💾 {}", describe_artifact(&artifact));
                    println!("   {}", path.display());
                }
            }
            Ok(())
        }
        SubmissionState::ValidationFailed(error) => Err((*error).into()),
        SubmissionState::BlockedRequest { reason } => Err(GenerationFailure::Blocked {
            reason: reason.clone(),
        }
        .into()),
        SubmissionState::MalformedResponse { raw } => {
            eprintln!("Rå API Svar:\n{}", raw);
            Err(GenerationFailure::MalformedResponse { raw: raw.clone() }.into())
        }
        SubmissionState::TransportError { message } => Err(GenerationFailure::Transport {
            message: message.clone(),
        }
        .into()),
        SubmissionState::Idle
        | SubmissionState::Validating
        | SubmissionState::Assembling
        | SubmissionState::Calling => Err(CoverLetterError::InvalidInput(
            "Submission ended before reaching a result".to_string(),
        )),
    }
}
