//! ConsentLab Demo CLI
//!
//! Runs the hospital reference scenarios against a simulated backend, or
//! drives the real pipeline against Gemini with a consent form from disk.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- upload-consent
//!   cargo run -p demo -- scan-consent
//!   cargo run -p demo -- consent-chat
//!   cargo run -p demo -- patient-intake
//!   cargo run -p demo -- consent-signing
//!   cargo run -p demo -- analyze --pdf form.pdf
//!   cargo run -p demo -- translate --pdf form.pdf --language Hindi
//!   cargo run -p demo -- ask --image form.jpg --question "When can I go home?"

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use consentlab_config::Settings;
use consentlab_contracts::{backend::InlineImage, document::TextOrigin};
use consentlab_core::{AnalyzedDocument, ConsentPipeline, TextSource};
use consentlab_gemini::GeminiBackend;
use consentlab_ref_hospital::scenarios::{
    self, consent_chat, consent_signing, patient_intake, scan_consent, upload_consent,
};
use consentlab_verify::SchemaVerifier;

type DemoResult = Result<(), Box<dyn std::error::Error>>;

// ── CLI definition ────────────────────────────────────────────────────────────

/// ConsentLab: plain-language consent forms for patients.
///
/// Scenario subcommands run offline against a simulated backend. The
/// `analyze`, `translate` and `ask` subcommands call Gemini and need an API
/// key in the environment variable named by the settings file.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "ConsentLab consent pipeline demo",
    long_about = "Runs ConsentLab hospital scenarios showing extraction, risk analysis,\n\
                  translation, patient Q&A, intake and DigiLocker signing."
)]
struct Cli {
    /// Settings file for the live subcommands. Built-in defaults when omitted.
    #[arg(long, global = true, env = "CONSENTLAB_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all five hospital scenarios in sequence.
    RunAll,
    /// Scenario 1: Upload Consent (PDF text layer, risk analysis).
    UploadConsent,
    /// Scenario 2: Scan Consent (camera capture, invalid risk level).
    ScanConsent,
    /// Scenario 3: Consent Chat (translation, Q&A, outage fallback).
    ConsentChat,
    /// Scenario 4: Patient Intake (report extraction under a staff session).
    PatientIntake,
    /// Scenario 5: Consent Signing (registration, DigiLocker ceremony).
    ConsentSigning,
    /// Extract and analyze a consent form with Gemini.
    Analyze(FormArgs),
    /// Analyze a consent form, then translate its summary.
    Translate {
        #[command(flatten)]
        form: FormArgs,
        /// Target language name or code, e.g. "Hindi" or "ta".
        #[arg(long)]
        language: String,
    },
    /// Ask a question about a consent form.
    Ask {
        #[command(flatten)]
        form: FormArgs,
        #[arg(long)]
        question: String,
        /// Language to answer in. Unknown names fall back to English.
        #[arg(long, default_value = "English")]
        language: String,
    },
}

/// Exactly one consent form source.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct FormArgs {
    /// A PDF with a text layer.
    #[arg(long)]
    pdf: Option<PathBuf>,
    /// A JPEG, PNG or WebP photo of a printed form.
    #[arg(long)]
    image: Option<PathBuf>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result: DemoResult = match cli.command {
        Command::RunAll => scenarios::run_all().await.map_err(Into::into),
        Command::UploadConsent => upload_consent::run_scenario().await.map_err(Into::into),
        Command::ScanConsent => scan_consent::run_scenario().await.map_err(Into::into),
        Command::ConsentChat => consent_chat::run_scenario().await.map_err(Into::into),
        Command::PatientIntake => patient_intake::run_scenario().await.map_err(Into::into),
        Command::ConsentSigning => consent_signing::run_scenario().await.map_err(Into::into),
        Command::Analyze(form) => run_analyze(cli.config.as_deref(), &form).await,
        Command::Translate { form, language } => {
            run_translate(cli.config.as_deref(), &form, &language).await
        }
        Command::Ask { form, question, language } => {
            run_ask(cli.config.as_deref(), &form, &question, &language).await
        }
    };

    match result {
        Ok(()) => {
            println!("Done.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Live pipeline ─────────────────────────────────────────────────────────────

fn live_pipeline(config: Option<&Path>) -> Result<ConsentPipeline, Box<dyn std::error::Error>> {
    let settings = match config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    let backend = GeminiBackend::from_settings(&settings.backend)?;
    info!(model = %settings.backend.model, "using live Gemini backend");

    Ok(ConsentPipeline::new(
        Arc::new(backend),
        Arc::new(SchemaVerifier::new()),
        settings.pipeline_options()?,
    ))
}

fn load_source(form: &FormArgs) -> Result<TextSource, Box<dyn std::error::Error>> {
    match (&form.pdf, &form.image) {
        (Some(path), _) => Ok(TextSource::Pdf(std::fs::read(path)?)),
        (None, Some(path)) => {
            let mime_type = match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase) {
                Some(ext) if ext == "png" => "image/png",
                Some(ext) if ext == "webp" => "image/webp",
                _ => "image/jpeg",
            };
            let image = InlineImage::new(std::fs::read(path)?, mime_type);
            Ok(TextSource::Image { image, origin: TextOrigin::Upload })
        }
        (None, None) => Err("one of --pdf or --image is required".into()),
    }
}

async fn analyze_form(pipeline: &ConsentPipeline, form: &FormArgs) -> Result<AnalyzedDocument, Box<dyn std::error::Error>> {
    let analyzed = pipeline.process(load_source(form)?).await?;
    let assessment = &analyzed.assessment;
    println!("  Risk level:  {}", assessment.risk_level);
    println!("  Summary:     {}", assessment.summary);
    for factor in &assessment.risk_factors {
        println!("    - {}", factor);
    }
    println!();
    Ok(analyzed)
}

async fn run_analyze(config: Option<&Path>, form: &FormArgs) -> DemoResult {
    let pipeline = live_pipeline(config)?;
    analyze_form(&pipeline, form).await?;
    Ok(())
}

async fn run_translate(config: Option<&Path>, form: &FormArgs, language: &str) -> DemoResult {
    let pipeline = live_pipeline(config)?;
    let analyzed = analyze_form(&pipeline, form).await?;
    let translated = pipeline.translator().translate(&analyzed.assessment.summary, language).await?;
    println!("  Summary ({}): {}", language, translated);
    println!();
    Ok(())
}

async fn run_ask(config: Option<&Path>, form: &FormArgs, question: &str, language: &str) -> DemoResult {
    let pipeline = live_pipeline(config)?;
    let document = pipeline.adapter().extract(load_source(form)?).await?;
    let answer = pipeline.qa().ask(question, document.content(), language).await;
    println!("  Patient:   {}", question);
    println!("  Assistant: {}", answer);
    println!();
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("ConsentLab: Consent Forms Patients Can Read");
    println!("Hospital Reference Demo");
    println!("===========================================");
    println!();
    println!("Consent pipeline per document:");
    println!("  [1] Text source adapter: PDF text layer, or image recognition by the backend");
    println!("  [2] Analyzer: plain-language summary, risk level, risk factors");
    println!("  [3] Verifier checks the analysis against JSON Schema + consent rules");
    println!("  [4] Translator renders the summary in the patient's language");
    println!("  [5] Q&A answers patient questions from the form alone");
    println!();
}
