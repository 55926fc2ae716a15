#[macro_use]
pub mod logging;

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod quotes;
pub mod storage;
pub mod sync;

use clap::Parser;

pub use error::{Error, Result};

pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli::Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: could not start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(cli::run(cli)) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
