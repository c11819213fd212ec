mod cli;
mod error;

use std::process;

use clap::Parser;
use livecut_engine::{Extraction, ExtractionRequest, ExtractorConfig, WindowSpec};
use tracing::{Level, error};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::{cli::Args, error::Result};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    init_logging(args.verbose, args.quiet);

    let window = WindowSpec::from_tokens(&args.start, &args.end, args.buffer)?;

    let config = ExtractorConfig {
        yt_dlp_path: args.yt_dlp_path,
        ffmpeg_path: args.ffmpeg_path,
        ..ExtractorConfig::default()
    };

    let request = ExtractionRequest {
        stream_url: args.url,
        format_id: args.format_id,
        window,
        output_path: args.output,
    };

    Extraction::with_config(config)?.run(&request).await?;
    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_level(verbose))
        .init();
}
