use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use git_log_source::cli::{Args, OutputFormat};
use git_log_source::config::FileConfig;
use git_log_source::{gather, DisplayItem, LogSink};
use std::io::Write;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();
    }

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    match run(args).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Streams all items to stdout. Returns whether git succeeded.
async fn run(args: Args) -> Result<bool> {
    let file_config = FileConfig::load(args.config.as_deref())?;
    let query = args.query_config(file_config);
    log::debug!("Query: {:?}", query);

    let mut stream = gather(query, Arc::new(LogSink))
        .await
        .context("Failed to start git log")?;

    let mut batches = 0usize;
    while let Some(batch) = stream.next().await {
        batches += 1;
        write_batch(&batch, args.format)?;
    }

    let outcome = stream.finish().await?;
    log::debug!("Received {} batches, outcome {:?}", batches, outcome);

    Ok(outcome.success)
}

fn write_batch(batch: &[DisplayItem], format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());

    for item in batch {
        match format {
            OutputFormat::Plain => writeln!(out, "{}", item.display)?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(item)?)?,
        }
    }

    out.flush()?;
    Ok(())
}
