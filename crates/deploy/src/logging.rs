use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::version::build_info;

const LOG_FILE_PREFIX: &str = "pages-deploy.log";

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: tracing::Level,
    /// Also write daily-rolled log files here
    pub log_dir: Option<PathBuf>,
}

fn env_filter(level: tracing::Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Install the subscriber for one run of the CLI.
///
/// Logs go to stderr; stdout is reserved for the deployment summary.
/// Keep the returned guards alive until exit, dropping them flushes
/// buffered lines.
pub fn init_logging(config: &LogConfig) -> Vec<WorkerGuard> {
    let mut guards = Vec::new();

    let (stderr_writer, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());
    guards.push(stderr_guard);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(stderr_writer)
        .with_filter(env_filter(config.level));

    let file_layer = match config.log_dir.as_deref() {
        Some(dir) if log_dir_ready(dir) => {
            let (file_writer, file_guard) = tracing_appender::non_blocking(
                tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX),
            );
            guards.push(file_guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_filter(env_filter(config.level)),
            )
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    register_panic_logger();
    report_startup(config);

    guards
}

/// Create the log directory; file logging is skipped when this fails.
fn log_dir_ready(dir: &Path) -> bool {
    match std::fs::create_dir_all(dir) {
        Ok(()) => true,
        Err(e) => {
            eprintln!(
                "Warning: not writing log files, cannot create {}: {}",
                dir.display(),
                e
            );
            false
        }
    }
}

/// Route panics through `tracing` so they reach the log file too.
pub fn register_panic_logger() {
    let version = build_info().repo_version;
    std::panic::set_hook(Box::new(move |panic| {
        let location = panic
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "unknown".to_string());
        tracing::error!(version, location = %location, "panic: {}", panic);
    }));
}

fn report_startup(config: &LogConfig) {
    let build = build_info();
    let log_dir = config
        .log_dir
        .as_ref()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|| "none".to_string());

    tracing::debug!(
        version = build.crate_version,
        repo_version = build.repo_version,
        build_profile = build.build_profile,
        target = build.target,
        log_level = %config.level,
        log_dir = %log_dir,
        "pages-deploy starting up"
    );
}
