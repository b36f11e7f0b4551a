//! Log subscriber setup.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn filter(default: &str) -> Result<EnvFilter, Box<dyn std::error::Error>> {
    Ok(EnvFilter::builder()
        .with_default_directive(default.parse()?)
        .from_env_lossy())
}

/// Install the global subscriber.
///
/// Logs go to stderr at INFO unless `RUST_LOG` says otherwise, so stdout
/// stays free for command output. With `log_file`, the same events go to
/// that file instead, at DEBUG and without colours.
pub(crate) fn init(log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter("debug")?)
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter("info")?)
                .with_target(false)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}
