//! Command-line entrypoint for `rangefetch`.
//!
//! Parses arguments, merges them with the user's settings and runs a single
//! download. Ctrl+C cancels the download cooperatively: in-flight requests
//! are abandoned and no output file is written.
use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::MultiProgress;
use rangefetch::config::Settings;
use rangefetch::{Args, ConsoleProgress, DownloadError, DownloadOptions, RangeEnd, download};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(args: &Args) -> Result<Settings> {
    match &args.config {
        Some(path) => Ok(Settings::load_from(Some(path.as_path()), true)?),
        None => Ok(Settings::load().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable settings");
            Settings::default()
        })),
    }
}

fn build_options(args: &Args, settings: &Settings) -> DownloadOptions {
    let defaults = DownloadOptions::default();
    let legacy = args.legacy_range_end || settings.legacy_range_end.unwrap_or(false);

    DownloadOptions {
        parts: args.parts.or(settings.parts).unwrap_or(defaults.parts),
        min_segment_size: args
            .min_segment_size
            .or(settings.min_segment_size)
            .unwrap_or(defaults.min_segment_size),
        range_end: if legacy {
            RangeEnd::Legacy
        } else {
            RangeEnd::Exact
        },
        output_dir: args
            .dir
            .clone()
            .or_else(|| settings.output_dir.clone())
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir),
        output_name: args.output.clone(),
    }
}

async fn run(args: Args) -> Result<PathBuf> {
    let settings = load_settings(&args)?;
    let options = build_options(&args, &settings);

    let client = settings.http_client()?;

    let cancel_token = CancellationToken::new();
    let signal_token = cancel_token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n{}", style("🛑 Received Ctrl+C. Download interrupted.").red());
            signal_token.cancel();
        }
    });

    let progress = ConsoleProgress::new(MultiProgress::new());
    let path = download(&client, &args.url, &options, &progress, &cancel_token).await?;
    Ok(path)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(path) => {
            println!("{}", style(format!("✅ Downloaded {}", path.display())).green());
            ExitCode::SUCCESS
        }
        Err(e) => {
            if matches!(e.downcast_ref::<DownloadError>(), Some(DownloadError::Cancelled)) {
                return ExitCode::from(130);
            }
            eprintln!("{} {:#}", style("❌ Error:").red(), e);
            ExitCode::FAILURE
        }
    }
}
