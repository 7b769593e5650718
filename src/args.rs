use clap::Parser;
use std::path::PathBuf;

/// A concurrent, range-request based file downloader.
///
/// Splits the file into contiguous byte ranges, fetches them in parallel
/// and writes them back together in order.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The URL of the file to download.
    pub url: String,

    /// The name of the output file. Defaults to the last segment of the URL path.
    #[arg(short, long)]
    pub output: Option<String>,

    /// The directory to save the file in. Defaults to the current directory.
    #[arg(short = 'd', long)]
    pub dir: Option<String>,

    /// The number of byte ranges to fetch concurrently.
    #[arg(short = 'p', long)]
    pub parts: Option<usize>,

    /// Smallest range worth its own request, in bytes.
    #[arg(long)]
    pub min_segment_size: Option<u64>,

    /// End the last range at the total size instead of the last byte.
    #[arg(long)]
    pub legacy_range_end: bool,

    /// Read settings from this file instead of the default location.
    #[arg(long)]
    pub config: Option<PathBuf>,
}
