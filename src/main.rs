//! stempipe Command Line Interface
//!
//! Streams an audio file through the chunked transform pipeline into a WAV
//! file, with optional timed cancellation.

use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use stempipe::transform::Identity;
use stempipe::{CancelToken, PipelineConfig, ProgressLeg, RunStatus};

#[derive(Parser)]
#[command(name = "stempipe")]
#[command(about = "Chunked audio transform pipeline", long_about = None)]
#[command(version)]
struct Cli {
    /// Input audio file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output WAV file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Window size in seconds
    #[arg(short, long, default_value = "10")]
    segment_seconds: f64,

    /// Overlap margin in seconds
    #[arg(short, long, default_value = "0.5")]
    boundary_seconds: f64,

    /// Cancel the run after this many milliseconds
    #[arg(long, value_name = "MS")]
    cancel_after_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    info!("stempipe {}", stempipe::VERSION);

    let config = PipelineConfig {
        segment_seconds: cli.segment_seconds,
        boundary_seconds: cli.boundary_seconds,
    };

    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();

    // The pipeline owns one worker thread; this thread keeps the token and
    // may set it while the worker runs.
    let worker = thread::spawn(move || {
        let mut progress =
            |leg: ProgressLeg, ms: u64| info!("{} pos: {} ms", leg.name(), ms);
        stempipe::run(
            cli.input,
            cli.output,
            &config,
            &mut Identity,
            worker_cancel,
            Some(&mut progress),
        )
    });

    if let Some(ms) = cli.cancel_after_ms {
        thread::sleep(Duration::from_millis(ms));
        cancel.cancel();
    }

    match worker.join() {
        Ok(Ok(RunStatus::Completed(stats))) => {
            info!(
                "done: {} frames decoded, {} frames written",
                stats.frames_decoded, stats.frames_encoded
            );
            ExitCode::SUCCESS
        }
        Ok(Ok(RunStatus::Canceled)) => {
            info!("canceled");
            ExitCode::from(2)
        }
        Ok(Err(e)) => {
            error!("pipeline failed: {e}");
            ExitCode::FAILURE
        }
        Err(_) => {
            error!("worker thread panicked");
            ExitCode::FAILURE
        }
    }
}
