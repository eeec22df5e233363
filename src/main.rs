//! CA Sentry - contract address scanner CLI
//!
//! Scans a chat message (arguments, or stdin when none are given) for
//! Solana contract addresses and prints the ranked candidates.

use ca_sentry::{AddressCandidateScanner, MessageMetadataExtractor, ScannerConfig};

use clap::Parser;
use eyre::Result;
use std::io::Read;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "ca_sentry", version, about = "Find Solana contract addresses in chat text")]
struct Cli {
    /// Maximum number of candidates to print
    #[arg(short, long, default_value_t = ca_sentry::utils::constants::DEFAULT_MAX_RESULTS)]
    max: usize,

    /// Print the full message metadata as JSON
    #[arg(long)]
    json: bool,

    /// JSON scanner config file (defaults plus CA_SENTRY_* overrides otherwise)
    #[arg(short, long)]
    config: Option<String>,

    /// Message text; read from stdin when omitted
    text: Vec<String>,
}

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ScannerConfig::from_json_file(path)?,
        None => ScannerConfig::from_env()?,
    };
    let scanner = AddressCandidateScanner::new(config)?;

    let text = if cli.text.is_empty() {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        cli.text.join(" ")
    };

    if cli.json {
        let extractor = MessageMetadataExtractor::new()?;
        let metadata = extractor.extract(&scanner, &text, cli.max);
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    let candidates = scanner.scan(&text, cli.max);
    if candidates.is_empty() {
        println!("No contract address candidates found");
        return Ok(());
    }

    for (rank, candidate) in candidates.iter().enumerate() {
        let clues = if candidate.context_clues.is_empty() {
            "-".to_string()
        } else {
            candidate.context_clues.join(",")
        };
        println!(
            "{:>2}. {:<44}  score={:.3}  type={:<7}  pattern={:<8}  clues={}",
            rank + 1,
            candidate.address,
            candidate.score,
            candidate.kind.as_str(),
            candidate.breakdown.pattern.as_str(),
            clues
        );
    }

    Ok(())
}
