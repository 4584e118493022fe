//! rubin-mx - mix style analysis service
//!
//! Captures audio from the configured source, measures it, and scores it
//! against style profiles over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use rubin_common::config::{load_toml, locate_config_file, RootFolderInitializer, RootFolderResolver};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rubin_mx::capture::{client_from_config, CpalAudioClient};
use rubin_mx::config::{CaptureSource, MxConfig, MODULE_NAME};
use rubin_mx::styles::StyleStore;
use rubin_mx::{build_router, AppState, CaptureDefaults};

#[derive(Debug, Parser)]
#[command(name = "rubin-mx", version, about = "Mix style analysis service")]
struct Args {
    /// Config file (default: <config_dir>/rubin/rubin-mx.toml)
    #[arg(long, env = "RUBIN_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding user styles
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Listen address
    #[arg(long, env = "RUBIN_HOST")]
    host: Option<String>,

    /// Listen port
    #[arg(long, env = "RUBIN_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides
    #[arg(long)]
    log_level: Option<String>,

    /// Capture source
    #[arg(long, value_enum)]
    capture: Option<CaptureSource>,

    /// WAV file for the wav capture source
    #[arg(long)]
    wav_path: Option<PathBuf>,

    /// Input device for the system capture source
    #[arg(long, env = "RUBIN_DEVICE")]
    device: Option<String>,

    /// Print the available input devices and exit
    #[arg(long)]
    list_devices: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.list_devices {
        for name in CpalAudioClient::list_devices()? {
            println!("{}", name);
        }
        return Ok(());
    }

    // Config is read before tracing exists, so a bad file is reported just after init
    let config_path = locate_config_file(args.config.as_deref(), MODULE_NAME);
    let (mut config, config_error) = match config_path.as_deref().map(load_toml::<MxConfig>) {
        Some(Ok(config)) => (config, None),
        Some(Err(e)) => (MxConfig::default(), Some(e)),
        None => (MxConfig::default(), None),
    };

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level)))
        .init();

    info!("Starting rubin-mx (mix analysis) v{}", env!("CARGO_PKG_VERSION"));
    match (&config_path, config_error) {
        (_, Some(e)) => warn!("{} - using compiled defaults", e),
        (Some(path), None) => info!("Config: {}", path.display()),
        (None, None) => info!("No config file found, using compiled defaults"),
    }

    // CLI overrides TOML
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(source) = args.capture {
        config.capture.source = source;
    }
    if let Some(path) = args.wav_path {
        config.capture.wav_path = Some(path);
    }
    if let Some(device) = args.device {
        config.capture.device = Some(device);
    }

    let root_folder = RootFolderResolver::new(MODULE_NAME)
        .with_cli_arg(args.root_folder)
        .with_toml_value(config.root_folder.clone())
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;
    info!("Root folder: {}", initializer.root().display());

    let styles = StyleStore::new(initializer.styles_path());
    info!("User styles: {}", styles.user_dir().display());

    let capture = client_from_config(&config.capture).context("Failed to set up capture")?;
    let defaults = CaptureDefaults {
        duration: config.capture.default_duration,
        sample_rate: config.capture.default_sample_rate,
    };

    let app = build_router(AppState::new(styles, capture, defaults));

    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
