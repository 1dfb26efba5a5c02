//! @ai:module:intent CLI for the code scoring service
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codescore::{
    adapters::AdapterSet,
    api::{self, AppState},
    config::ServiceConfig,
    feedback::FeedbackClient,
    model::{AnalysisRequest, Language, Mode},
    orchestrator::Orchestrator,
    report::{JsonResultSink, MemoryResultSink, ResultSink},
    toolchain::ToolchainValidator,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_CONFIG: &str = "codescore.toml";

#[derive(Parser)]
#[command(name = "codescore")]
#[command(about = "Score LLM-generated code with static, dynamic and formal analyzers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the configured bind address
        #[arg(long)]
        bind: Option<String>,
    },

    /// Analyze one saved model response and print the scored record
    Analyze {
        /// File holding the raw model output
        #[arg(short, long)]
        file: PathBuf,

        /// Declared language (display name, e.g. "Python", "C++")
        #[arg(short, long)]
        language: String,

        /// quick or full (mode_1 / mode_2 accepted)
        #[arg(short, long, default_value = "quick")]
        mode: String,

        /// File holding verification-language code
        #[arg(long)]
        verification_file: Option<PathBuf>,

        /// Model identifier recorded in the result
        #[arg(long, default_value = "cli")]
        model: String,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Use mock analyzers instead of real tools
        #[arg(long)]
        dry_run: bool,
    },

    /// Show which analysis tools are installed
    Toolchain {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("codescore=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, bind } => serve(config, bind).await,
        Commands::Analyze {
            file,
            language,
            mode,
            verification_file,
            model,
            config,
            dry_run,
        } => {
            analyze(AnalyzeArgs {
                file,
                language,
                mode,
                verification_file,
                model,
                config,
                dry_run,
            })
            .await
        }
        Commands::Toolchain { config } => toolchain(config),
        Commands::Init { output } => init_config(output),
    }
}

struct AnalyzeArgs {
    file: PathBuf,
    language: String,
    mode: String,
    verification_file: Option<PathBuf>,
    model: String,
    config: Option<PathBuf>,
    dry_run: bool,
}

/// @ai:intent Start the HTTP service
/// @ai:effects network, fs:write
async fn serve(config_path: Option<PathBuf>, bind: Option<String>) -> Result<()> {
    let config = Arc::new(load_config(config_path)?);

    let status = ToolchainValidator::validate(&config.tools);
    ToolchainValidator::log_warnings(&status);

    let sink: Arc<dyn ResultSink> = Arc::new(JsonResultSink::new(&config.paths.results_file));
    let orchestrator = Orchestrator::new(config.clone(), AdapterSet::from_config(&config), sink);
    let feedback = FeedbackClient::new(&config.feedback)?;

    let state = AppState::new(Arc::new(orchestrator), Arc::new(feedback), status);
    let bind_addr = bind.unwrap_or_else(|| config.server.bind_addr.clone());

    api::serve(state, &bind_addr).await
}

/// @ai:intent Run the pipeline once outside HTTP
/// @ai:effects fs:read, fs:write, io
async fn analyze(args: AnalyzeArgs) -> Result<()> {
    let config = Arc::new(load_config(args.config)?);

    let mode: Mode = serde_json::from_value(serde_json::Value::String(args.mode.clone()))
        .with_context(|| format!("Unknown mode '{}'", args.mode))?;

    let code_text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let verification_text = args
        .verification_file
        .as_deref()
        .map(std::fs::read_to_string)
        .transpose()
        .context("Failed to read verification file")?;

    let (adapters, sink): (AdapterSet, Arc<dyn ResultSink>) = if args.dry_run {
        tracing::info!("Dry run: using mock analyzers");
        (AdapterSet::mock(), Arc::new(MemoryResultSink::new()))
    } else {
        (
            AdapterSet::from_config(&config),
            Arc::new(JsonResultSink::new(&config.paths.results_file)),
        )
    };

    let orchestrator = Orchestrator::new(config, adapters, sink);
    let request = AnalysisRequest {
        mode,
        model: args.model,
        code_text,
        verification_text,
        language: Language::from_display_name(&args.language),
    };

    let report = orchestrator.analyze(request).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// @ai:intent Print tool availability
/// @ai:effects io
fn toolchain(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let status = ToolchainValidator::validate(&config.tools);

    println!("{:<16} {:<10}", "Tool", "Status");
    println!("{}", "-".repeat(28));

    for (tool, available) in &status.tools {
        println!(
            "{:<16} {:<10}",
            tool,
            if *available { "found" } else { "missing" }
        );
    }

    for missing in &status.missing_tools {
        println!("  {}: {}", missing.tool_name, missing.install_hint);
    }

    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = ServiceConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_config(path: Option<PathBuf>) -> Result<ServiceConfig> {
    match path {
        Some(p) => ServiceConfig::load(&p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => ServiceConfig::load_or_default(Path::new(DEFAULT_CONFIG)),
    }
}
