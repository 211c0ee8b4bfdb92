#![forbid(unsafe_code)]
//! Append payloads to a set of ledgers and inspect or verify the result.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Color as TableColor;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use hashledger::blockchain::{BlockRecord, Ledger};
use hashledger::config::{load_config, load_config_from, Config};
use hashledger::node::NodeSet;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Appends each payload, in order, to every node and prints the chains
    Append {
        /// Payloads to record
        #[arg(required = true)]
        payloads: Vec<String>,
        /// Number of nodes to append to (overrides nodes.count)
        #[arg(long)]
        nodes: Option<usize>,
        /// Nonce carried by every appended block
        #[arg(long, default_value_t = 0)]
        nonce: u64,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Checks a chain exported as a JSON array of block records
    Verify {
        /// JSON file produced by `append --format json`, or a single node's chain
        file: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) if !path.exists() => {
            return Err(format!("Config file not found: {}", path.display()).into())
        }
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    init_tracing(&config.logging.filter);

    match cli.command {
        Commands::Append {
            payloads,
            nodes,
            nonce,
            format,
        } => append(config, &payloads, nodes, nonce, format),
        Commands::Verify { file } => {
            if !verify(&config, &file)? {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

/// `RUST_LOG` wins over the configured filter. Logs go to stderr so JSON output stays clean.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn append(
    mut config: Config,
    payloads: &[String],
    nodes: Option<usize>,
    nonce: u64,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(count) = nodes {
        config.nodes.count = count;
    }
    let set = NodeSet::from_config(&config)?;

    for payload in payloads {
        set.append_all_with_nonce(payload.as_str(), nonce)?;
    }

    match format {
        Format::Json => {
            let mut chains = serde_json::Map::new();
            for node in set.nodes() {
                chains.insert(node.name().to_string(), serde_json::to_value(node.chain())?);
            }
            println!("{}", serde_json::to_string_pretty(&chains)?);
        }
        Format::Table => {
            for node in set.nodes() {
                println!("{}", format!("📦 {}", node.name()).bright_cyan().bold());
                println!("{}", chain_table(&node.chain()));
                println!();
            }
            println!(
                "{}",
                format!("Block added to all {} nodes.", set.len()).bright_green()
            );
        }
    }

    Ok(())
}

fn verify(config: &Config, file: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;

    // Accept a bare chain or the node-name map printed by `append --format json`.
    let mut chains: Vec<(String, Vec<BlockRecord>)> = Vec::new();
    match value {
        serde_json::Value::Object(map) => {
            for (name, chain) in map {
                chains.push((name, serde_json::from_value(chain)?));
            }
        }
        other => chains.push((file.display().to_string(), serde_json::from_value(other)?)),
    }
    if chains.is_empty() {
        return Err(format!("No chains found in {}", file.display()).into());
    }

    let mut all_ok = true;
    for (name, records) in chains {
        let len = records.len();
        let ledger = Ledger::restore(records, config.ledger.clone())?;
        match ledger.audit() {
            Ok(()) => println!(
                "{} {} ({} blocks)",
                "✅".green(),
                name.bright_white(),
                len
            ),
            Err(e) if e.is_integrity_violation() => {
                all_ok = false;
                println!("{} {}: {}", "❌".red(), name.bright_white(), e.to_string().red());
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(all_ok)
}

fn chain_table(records: &[BlockRecord]) -> Table {
    let header = ["Index", "Timestamp", "Payload", "Nonce", "Previous", "Fingerprint"];

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            header
                .iter()
                .map(|h| Cell::new(h).fg(TableColor::Cyan).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );

    for record in records {
        table.add_row(vec![
            Cell::new(format!("#{}", record.index)).fg(TableColor::White),
            Cell::new(format_timestamp(record.timestamp)).fg(TableColor::Grey),
            Cell::new(&record.payload).fg(TableColor::White),
            Cell::new(record.nonce).fg(TableColor::Grey),
            Cell::new(shorten(&record.previous_fingerprint.to_string())).fg(TableColor::Yellow),
            Cell::new(shorten(&record.fingerprint.to_hex())).fg(TableColor::Green),
        ]);
    }
    table
}

fn shorten(hex: &str) -> String {
    if hex.len() > 16 {
        format!("{}...", &hex[..13])
    } else {
        hex.to_string()
    }
}

fn format_timestamp(timestamp: u64) -> String {
    use chrono::DateTime;

    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "Invalid".to_string())
}
