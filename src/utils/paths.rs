use crate::error::StorageError;
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

static APP_DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Overrides the platform data directory, mostly for portable installs.
pub const DATA_DIR_ENV: &str = "SKINMARKET_DATA_DIR";

pub fn get_app_data_dir() -> PathBuf {
    APP_DATA_DIR
        .get_or_init(|| {
            if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
                return PathBuf::from(dir);
            }
            let base_dir = dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."));
            base_dir.join("SkinMarket")
        })
        .clone()
}

pub fn get_data_dir() -> PathBuf {
    get_app_data_dir().join("data")
}

pub fn get_logs_dir() -> PathBuf {
    get_app_data_dir().join("logs")
}

pub fn get_settings_json_path() -> PathBuf {
    get_data_dir().join("settings.json")
}

/// Creates the data and logs directories. Returns the ones that were missing.
pub fn initialize_data_directories() -> Result<Vec<PathBuf>, StorageError> {
    create_missing_dirs(&[get_data_dir(), get_logs_dir()])
}

pub fn create_missing_dirs(directories: &[PathBuf]) -> Result<Vec<PathBuf>, StorageError> {
    let mut created = Vec::new();

    for dir in directories {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| StorageError::Io {
                path: dir.display().to_string(),
                source: e,
            })?;
            info!("Created directory: {:?}", dir);
            created.push(dir.clone());
        }
    }

    Ok(created)
}
