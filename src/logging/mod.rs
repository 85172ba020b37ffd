//! Logging setup for SkinMarket
//! Daily log file under the logs dir, with 7-day retention

use crate::utils::get_logs_dir;
use chrono::Local;
use env_logger::{Builder, Env, Target};
use log::info;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const LOG_RETENTION_DAYS: u64 = 7;
const LOG_FILE_PREFIX: &str = "skinmarket";

fn log_file_path(logs_dir: &Path) -> PathBuf {
    logs_dir.join(format!(
        "{}-{}.log",
        LOG_FILE_PREFIX,
        Local::now().format("%Y-%m-%d")
    ))
}

/// Installs the global logger. `RUST_LOG` overrides the default `info`
/// filter. Falls back to stderr when the log file cannot be opened.
pub fn init_logging() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();

    let logs_dir = get_logs_dir();
    let file = fs::create_dir_all(&logs_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file_path(&logs_dir))
    });
    match file {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            builder.target(Target::Stderr);
            eprintln!("Logging to stderr, log file unavailable: {}", e);
        }
    }

    // A second init (tests, embedding) keeps the first logger.
    let _ = builder.try_init();
}

pub fn cleanup_old_logs() {
    cleanup_logs_in(&get_logs_dir(), SystemTime::now());
}

/// Removes `.log` files in `logs_dir` last modified more than the retention
/// period before `now`. Returns how many were removed.
pub fn cleanup_logs_in(logs_dir: &Path, now: SystemTime) -> usize {
    if !logs_dir.exists() {
        return 0;
    }

    let retention = Duration::from_secs(LOG_RETENTION_DAYS * 24 * 60 * 60);
    let mut removed = 0;

    if let Ok(entries) = fs::read_dir(logs_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "log") {
                let expired = fs::metadata(&path)
                    .and_then(|meta| meta.modified())
                    .ok()
                    .and_then(|modified| now.duration_since(modified).ok())
                    .map_or(false, |age| age > retention);
                if expired && fs::remove_file(&path).is_ok() {
                    info!("Cleaned up old log: {:?}", path.file_name());
                    removed += 1;
                }
            }
        }
    }
    removed
}
