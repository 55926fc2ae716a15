use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quotesync")]
#[command(about = "Collect quotes, show them at random, and sync with a remote list", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding the quote database and log file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Remote endpoint to sync with
    #[arg(long, global = true)]
    pub remote_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a random quote
    Show {
        /// Category to draw from instead of the saved filter
        #[arg(long)]
        category: Option<String>,
    },

    /// Add a quote
    Add { text: String, category: String },

    /// List categories, marking the selected one
    Categories,

    /// Save the category filter used by `show`
    Select { category: String },

    /// Sync once with the remote endpoint
    Sync,

    /// Send a quote to the remote endpoint and keep the echoed copy
    Publish { text: String, category: String },

    /// Write all quotes to a JSON file
    Export {
        #[arg(default_value = "quotes.json")]
        path: PathBuf,
    },

    /// Replace all quotes with the contents of a JSON file
    Import { path: PathBuf },

    /// Interactive session with periodic background sync
    Shell,
}
