pub mod catalog;
pub mod cli;
pub mod commands;
pub mod error;
pub mod fallback;
pub mod file_manager;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod query;
pub mod utils;

use clap::Parser;
use cli::Cli;
use file_manager::initialize_json_file;
use log::{error, info};
use models::Settings;
use std::process::ExitCode;
use utils::{get_settings_json_path, initialize_data_directories};

pub use commands::{Delivery, InventoryQuery, MarketSession};
pub use error::{FallbackError, GatewayError, StorageError};
pub use fallback::{FallbackController, SourceState};
pub use gateway::{HttpGateway, LogObserver, RequestObserver, SourceGateway};
pub use query::run_query;

fn initialize_app_data() -> Result<(), StorageError> {
    initialize_data_directories()?;
    initialize_json_file(&get_settings_json_path(), &Settings::default())?;
    Ok(())
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Logger first so directory creation is recorded.
    logging::init_logging();
    info!("SkinMarket v{} starting", env!("CARGO_PKG_VERSION"));
    if let Err(e) = initialize_app_data() {
        error!("Failed to initialize app data: {}", e);
        eprintln!("Failed to initialize app data: {}", e);
    }
    logging::cleanup_old_logs();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(cli::execute(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
