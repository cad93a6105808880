/*
 * Responsibility
 * - process-wide tracing bootstrap, called once from app::run() before the
 *   first request is served; never reconfigured afterwards
 * - console output only in development; rolling file output always, with
 *   rotation/retention from Config
 */
use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LogRotation};

/// The returned guard owns the background log writer; it must live for the
/// whole process or buffered records are dropped on exit.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    let rotation = match config.log_rotation {
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
        LogRotation::Never => Rotation::NEVER,
    };

    let file_appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix("hospital-staff-api")
        .filename_suffix("log")
        .max_log_files(config.log_max_files)
        .build(&config.log_dir)?;

    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    // Prefer RUST_LOG if set; otherwise the configured level.
    // Ex: RUST_LOG=info,hospital_staff_api=debug,tower_http=debug cargo run
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let console = (!config.app_env.is_production()).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .with(console)
        .init();

    tracing::info!(
        level = %config.log_level,
        dir = %config.log_dir,
        "logging initialized"
    );

    Ok(guard)
}
