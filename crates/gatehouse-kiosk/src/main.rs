//! Gatehouse kiosk entry point.
//!
//! Startup order: CLI, configuration, logging, serial link (fatal on
//! failure), face gallery (fatal on failure), then the access loop until
//! an interrupt or a hard link fault. Every fatal path exits non-zero; an
//! operator interrupt exits zero after teardown.
//!
//! # Environment variables
//!
//! - `GATEHOUSE_*`: configuration overrides (see `gatehouse_core::config`)
//! - `RUST_LOG`: log filter (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use gatehouse_controller::{AccessController, AccessPolicy};
use gatehouse_core::KioskConfig;
use gatehouse_link::SerialLink;
use gatehouse_vision::mock::{MockCamera, MockEncoder};
use gatehouse_vision::{FaceVerifier, Gallery, ScanPolicy};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "gatehouse")]
#[command(about = "Single-door access-control kiosk")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serial endpoint override
    #[arg(long)]
    port: Option<String>,

    /// Gallery directory override
    #[arg(long)]
    gallery: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let mut config =
        KioskConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(port) = args.port {
        config.serial_port = port;
    }
    if let Some(gallery) = args.gallery {
        config.gallery_dir = gallery;
    }

    // Console stream plus a rotating file, both behind the same env filter.
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "gatehouse.log");
    let (file_writer, _file_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    info!(version = gatehouse_core::VERSION, "gatehouse starting");

    let link = SerialLink::open(&config.serial_port, config.baud_rate, config.read_timeout())
        .context("failed to open serial link")?;

    // The capture and recognition backends sit behind trait seams; until a
    // backend-* feature ships an implementation, the kiosk runs against the
    // mock collaborators.
    warn!("no recognition backend compiled in; using mock camera and face encoder");
    let mut encoder = MockEncoder::empty();
    let gallery = Gallery::load(&config.gallery_dir, &mut encoder)
        .context("failed to load face gallery")?;
    let (camera, _camera_handle) = MockCamera::new();
    let verifier = FaceVerifier::new(camera, encoder, gallery, ScanPolicy::from_config(&config));

    let policy = AccessPolicy::from_config(&config).context("invalid access policy")?;
    let mut controller = AccessController::new(link, verifier, policy);

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("failed to install interrupt handler")?;

    match controller.run(&shutdown) {
        Ok(()) => {
            info!("shutting down");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "critical error in access loop");
            Err(e.into())
        }
    }
}
