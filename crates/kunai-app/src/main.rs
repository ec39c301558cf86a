use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kunai_app::import::{encode_events, import_events, read_events};
use kunai_core::config::load_config;
use kunai_db::db::batch::BatchLimits;
use kunai_db::db::map::EventCodec;
use kunai_db::db::store::MemoryStore;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kunai")]
#[command(about = "Encode calendar events into storage rows and write them in budgeted transactions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rows each event encodes to
    Encode {
        /// JSON file holding an array of events
        events: PathBuf,
    },
    /// Write events to an in-memory store and print them as read back
    Import {
        /// JSON file holding an array of events
        events: PathBuf,

        /// Override the transaction byte budget
        #[arg(long)]
        budget: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config()?;

    tracing::debug!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping info");
    }

    let mut codec = EventCodec::new(&config.codec);

    let output = match cli.command {
        Commands::Encode { events } => {
            let events = read_events(&events)?;
            serde_json::to_string_pretty(&encode_events(&mut codec, &events)?)?
        }
        Commands::Import { events, budget } => {
            let events = read_events(&events)?;
            let mut limits = BatchLimits::from(&config.storage);
            if let Some(budget) = budget {
                limits.budget_bytes = budget;
            }

            let mut store = MemoryStore::new();
            let report = import_events(&mut store, &mut codec, limits, &events)?;
            tracing::info!(
                transactions = store.transaction_count(),
                affected_rows = report.affected_rows,
                "Import finished"
            );
            serde_json::to_string_pretty(&report)?
        }
    };

    println!("{output}");

    Ok(())
}
