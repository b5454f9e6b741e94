use clap::Parser;
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use std::process;

use console_bank::{cli, config, storage};

/// Console Bank - a terminal-based banking system backed by CSV ledgers
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Sets the configuration file
    #[clap(short, long, value_name = "FILE", default_value = "config.toml")]
    config: String,

    /// Override the data directory from the configuration file
    #[clap(long, value_name = "DIR")]
    data_dir: Option<String>,

    /// Turn debugging information on
    #[clap(short, long, action = clap::ArgAction::Count)]
    debug: u8,
}

fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Parse command line arguments
    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.debug {
        0 => log::set_max_level(log::LevelFilter::Info),
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    info!("Starting Console Bank");

    // Initialize config from the provided file
    if let Err(err) = config::load_config(&cli.config) {
        error!("Failed to load configuration: {}", err);
        process::exit(1);
    }

    if let Some(data_dir) = cli.data_dir {
        let mut current = config::get_config();
        current.storage.data_dir = data_dir;
        if let Err(err) = config::update_config(current) {
            error!("Failed to apply data directory override: {}", err);
            process::exit(1);
        }
    }

    // Create the data files if they don't exist yet
    let storage_config = config::get_config().storage;
    if let Err(err) = storage::initialize(&storage_config) {
        error!("Failed to initialize storage: {}", err);
        process::exit(1);
    }

    if let Err(err) = cli::session::run() {
        error!("{:#}", err);
        process::exit(1);
    }

    info!("Shutting down Console Bank");
}
