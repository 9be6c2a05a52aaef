//! Logging setup
//!
//! Logging is off unless KEEPLIST_LOG is set; its value is the level
//! (`debug`, `info`, ...). Output goes to `config.log_file` when set,
//! otherwise to stderr.

use std::fs::OpenOptions;
use std::sync::Mutex;

use keeplist_core::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log level
const LOG_ENV: &str = "KEEPLIST_LOG";

/// Initialize logging if KEEPLIST_LOG is set
pub fn init(config: &Config) {
    let Ok(log_level) = std::env::var(LOG_ENV) else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "keeplist_core={},keeplist_cli={}",
        log_level, log_level
    ));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false);

    // Ignore error if already initialized
    let initialized = match &config.log_file {
        Some(path) => {
            let file = match OpenOptions::new().create(true).append(true).open(path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not open log file {:?}: {}", path, e);
                    return;
                }
            };
            builder.with_writer(Mutex::new(file)).try_init().is_ok()
        }
        None => builder.with_writer(std::io::stderr).try_init().is_ok(),
    };

    if initialized {
        info!(level = %log_level, "Logging initialized");
    }
}
