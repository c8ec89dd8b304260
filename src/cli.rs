use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::commands;
use crate::constants::{DEFAULT_PAGE_SIZE, DEFAULT_PREDICTION_DAYS};
use crate::models::IngestConfig;
use crate::utils::{get_csv_file_name, get_public_url};

#[derive(Parser)]
#[command(name = "stockboard")]
#[command(about = "Stock dashboard data CLI", long_about = None)]
pub struct Cli {
    /// Public data root the CSV and prediction file are fetched from [env: STOCK_PUBLIC_URL]
    #[arg(long, global = true)]
    pub public_url: Option<String>,

    /// CSV file name under the public root [env: STOCK_CSV_FILE]
    #[arg(long, global = true)]
    pub csv_file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the stock CSV and print a summary
    Load {
        /// Read this local file instead of fetching from the public root
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Show the most recent record for one instrument
    Latest {
        name: String,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Show the price prediction for a company
    Predict {
        company: String,
        /// Forecast horizon in days
        #[arg(short, long, default_value_t = DEFAULT_PREDICTION_DAYS)]
        days: usize,
    },
    /// Show the overall market trend from predictions
    Trend,
    /// List companies with prediction data
    Companies,
    /// Query the stock REST backend
    Search {
        #[arg(short, long)]
        name: Option<String>,
        /// Range start, e.g. 2024-01-01 or 2024-01-01T09:30:00
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: usize,
    },
    /// Ask the stock analysis assistant
    Chat { message: String },
    /// Start the server
    Serve {
        #[arg(short, long, env = "PORT", default_value_t = crate::constants::DEFAULT_PORT)]
        port: u16,
    },
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub async fn run() {
    let cli = Cli::parse();
    init_tracing();

    let ingest = IngestConfig::new(
        cli.public_url.unwrap_or_else(get_public_url),
        cli.csv_file.unwrap_or_else(get_csv_file_name),
    );

    match cli.command {
        Commands::Load { file } => {
            commands::load::run(ingest, file).await;
        }
        Commands::Latest { name, file } => {
            commands::latest::run(ingest, name, file).await;
        }
        Commands::Predict { company, days } => {
            commands::predict::run(&ingest.public_url, company, days).await;
        }
        Commands::Trend => {
            commands::trend::run(&ingest.public_url).await;
        }
        Commands::Companies => {
            commands::companies::run(&ingest.public_url).await;
        }
        Commands::Search {
            name,
            start,
            end,
            page,
            size,
        } => {
            commands::search::run(name, start, end, page, size).await;
        }
        Commands::Chat { message } => {
            commands::chat::run(message).await;
        }
        Commands::Serve { port } => {
            commands::serve::run(ingest, port).await;
        }
    }
}
