// src/main.rs - Desktop entry point and command line tools

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use product_studio::api::HttpSubmitter;
use product_studio::config::{AppConfig, ConfigManager};
use product_studio::draft_file::DraftFile;
use product_studio::form::{DataUrlReader, FormStore, ProductForm, TracingNotifier};
use product_studio::ui::App;
use product_studio::{logging, platform, Error};

const TAILWIND_HEAD: &str = r#"<script src="https://cdn.tailwindcss.com"></script>"#;

#[derive(Parser)]
#[command(
    name = "product-studio",
    version = product_studio::VERSION,
    about = "Create product listings with variants and images",
    long_about = None
)]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the product editor window
    Run,
    /// Validate configuration
    ValidateConfig {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Fill the form from a draft file and submit it without the UI
    Submit {
        /// JSON draft file
        #[arg(long, value_name = "FILE")]
        draft: PathBuf,

        /// Print the payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Studio(#[from] Error),

    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("Configuration is invalid:\n  {}", .0.join("\n  "))]
    InvalidConfig(Vec<String>),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<(), CliError> {
    if let Some(Commands::ValidateConfig { config }) = &cli.command {
        return validate_config(config.clone().or_else(|| cli.config.clone()));
    }

    let config = load_config(cli.config.as_ref())?;
    let _guard = logging::init(&config.logging, level_override(&cli))?;

    match cli.command {
        Some(Commands::Submit { draft, dry_run }) => submit_draft(config, draft, dry_run),
        Some(Commands::Run) | None => {
            run_application(config);
            Ok(())
        }
        Some(Commands::ValidateConfig { .. }) => Ok(()),
    }
}

fn level_override(cli: &Cli) -> Option<tracing::Level> {
    if cli.debug {
        Some(tracing::Level::DEBUG)
    } else if cli.verbose {
        Some(tracing::Level::INFO)
    } else {
        None
    }
}

fn config_manager(path: Option<&PathBuf>) -> Result<ConfigManager, CliError> {
    match path {
        Some(path) => Ok(ConfigManager::with_config_file(path)?),
        None => Ok(ConfigManager::discover()),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig, CliError> {
    Ok(config_manager(path)?.load_validated()?)
}

fn run_application(config: AppConfig) {
    use dioxus::desktop::{Config, WindowBuilder};
    use dioxus::prelude::LaunchBuilder;

    tracing::info!("Starting Product Studio v{}", product_studio::VERSION);

    let window = Config::new()
        .with_custom_head(TAILWIND_HEAD.to_string())
        .with_window(
            WindowBuilder::new()
                .with_title(config.ui.title.clone())
                .with_resizable(true)
                .with_inner_size(dioxus::desktop::tao::dpi::LogicalSize::new(1100.0, 860.0)),
        );

    LaunchBuilder::desktop()
        .with_cfg(window)
        .with_context(config)
        .launch(App);
}

fn submit_draft(config: AppConfig, draft: PathBuf, dry_run: bool) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    runtime.block_on(fill_and_submit(config, draft, dry_run))
}

async fn fill_and_submit(config: AppConfig, draft: PathBuf, dry_run: bool) -> Result<(), CliError> {
    let submitter = HttpSubmitter::from_config(platform::create_network(), &config.api);
    let form = ProductForm::new(
        FormStore::new(),
        Arc::new(DataUrlReader),
        Arc::new(submitter),
        Arc::new(TracingNotifier),
    )
    .with_upload_config(config.upload.clone())
    .with_strict_numbers(config.form.strict_numbers);

    let file = DraftFile::load(&draft).await?;
    for report in file.apply_to(&form).await? {
        if !report.is_complete() {
            tracing::warn!("{}", report.summary());
        }
    }

    if dry_run {
        let payload = form.preview_payload().to_json()?;
        println!("{}", serde_json::to_string_pretty(&payload).map_err(Error::from)?);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling submission");
            interrupt.cancel();
        }
    });

    let reply = form.submit(cancel).await?;
    println!("{}", serde_json::to_string_pretty(&reply).map_err(Error::from)?);
    Ok(())
}

fn validate_config(config_path: Option<PathBuf>) -> Result<(), CliError> {
    println!("Validating configuration...");

    let config = config_manager(config_path.as_ref())?.load()?;
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(CliError::InvalidConfig(
            errors.iter().map(ToString::to_string).collect(),
        ));
    }

    println!("✅ Configuration is valid");
    println!("   Product service: {}", config.api.products_url());
    println!("   Max image size: {} bytes", config.upload.max_file_size);
    println!("   Version: {}", product_studio::VERSION);

    Ok(())
}
