use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use cinegen::logger::{self, LogLevel, LoggerConfig};
use cinegen::{BatchImageRequestCoordinator, Downloader, StudioConfig};

/// Generate a batch of cinematic advertisement images from one prompt.
#[derive(Debug, Parser)]
#[command(name = "cinegen", version)]
struct Cli {
    /// What the images should show
    prompt: String,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Number of variants in the batch
    #[arg(long)]
    count: Option<u32>,

    /// Download every image after generating the locators
    #[arg(long)]
    download: bool,

    /// Directory for downloaded images
    #[arg(long)]
    out: Option<PathBuf>,

    /// Pause between sequential downloads
    #[arg(long)]
    delay_ms: Option<u64>,

    #[arg(long, env = "CINEGEN_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, default_value = "info")]
    log_level: LogLevel,

    /// Emit logs as JSON lines without colors
    #[arg(long)]
    log_json: bool,

    /// Also append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long)]
    no_color: bool,

    /// Print the variants as JSON instead of one locator per line
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn logger_config(&self) -> LoggerConfig {
        let mut config = if self.log_json {
            LoggerConfig::production()
        } else {
            LoggerConfig::new()
        }
        .with_level(self.log_level);
        if self.no_color {
            config = config.with_colors(false);
        }
        if let Some(path) = &self.log_file {
            config = config.with_file_output(path);
        }
        config
    }

    fn apply(&self, mut config: StudioConfig) -> StudioConfig {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(count) = self.count {
            config.count = count;
        }
        if let Some(dir) = &self.out {
            config.output_dir = dir.clone();
        }
        if let Some(delay) = self.delay_ms {
            config.download.delay = Duration::from_millis(delay);
        }
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_config(cli.logger_config()) {
        eprintln!("{}", e);
    }
    if dotenv_loaded {
        log::debug!("✅ .env file loaded");
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> cinegen::Result<ExitCode> {
    let config = cli.apply(StudioConfig::from_env()?);
    config.validate()?;
    logger::log_config_info(&config);

    let mut coordinator = BatchImageRequestCoordinator::new(&config);
    let variants = match coordinator.generate(&cli.prompt) {
        Ok(variants) => variants,
        Err(cinegen::CinegenError::EmptyPrompt) => return Ok(ExitCode::from(2)),
        Err(e) => return Err(e),
    };

    if cli.json {
        let json = serde_json::to_string_pretty(coordinator.state())
            .map_err(|e| cinegen::CinegenError::SerializationError(e.to_string()))?;
        println!("{}", json);
    } else {
        for locator in coordinator.state().locators() {
            println!("{}", locator);
        }
    }

    if !cli.download {
        return Ok(ExitCode::SUCCESS);
    }

    let downloader = Downloader::new(&config);
    let report = downloader.download_all(&variants).await;
    if report.is_complete() {
        log::info!("💾 Images saved to {}", config.output_dir.display());
        Ok(ExitCode::SUCCESS)
    } else {
        log::warn!("Failed images: {:?}", report.failed);
        Ok(ExitCode::FAILURE)
    }
}
