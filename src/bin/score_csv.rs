//! Scores every lead in a CSV file and writes the result as CSV.
//!
//! Usage: `score_csv <input.csv> [output.csv]`. Without an output path the
//! scored table goes to stdout.

use anyhow::Context;
use dotenvy::dotenv;
use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use lead_scoring_api::loader::{load_leads, write_leads};
use lead_scoring_api::scoring::score_dataframe;

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "score_csv=info,lead_scoring_api=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let input = args
        .next()
        .map(PathBuf::from)
        .or_else(|| env::var("LEADS_CSV_PATH").ok().map(PathBuf::from))
        .context("usage: score_csv <input.csv> [output.csv]")?;
    let output = args.next().map(PathBuf::from);

    let table = load_leads(&input)?;
    let scored = score_dataframe(&table);
    tracing::info!("Scored {} leads from {}", scored.len(), input.display());

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_leads(&scored, BufWriter::new(file))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            write_leads(&scored, io::stdout().lock())?;
        }
    }

    Ok(())
}
