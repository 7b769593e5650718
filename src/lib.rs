//! # rangefetch Download Library
//!
//! `rangefetch` downloads a file by splitting it into contiguous byte
//! ranges, fetching every range concurrently with HTTP `Range` requests
//! and writing them back together in order.
//!
//! - The total size comes from a `HEAD` request's `Content-Length`.
//! - Each range is fetched exactly once; any failure aborts the download.
//! - Output is only written after every range arrived, and only becomes
//!   visible at its final path once it is complete.
//!
//! Servers that ignore `Range` headers are not supported: they answer each
//! range with the whole file.
//!
//! ## Example Usage
//!
//! ```no_run
//! use rangefetch::{DownloadOptions, NoopObserver, download};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), rangefetch::DownloadError> {
//! let client = reqwest::Client::new();
//! let path = download(
//!     &client,
//!     "https://example.com/path/to/file.bin",
//!     &DownloadOptions::default(),
//!     &NoopObserver,
//!     &CancellationToken::new(),
//! )
//! .await?;
//! println!("saved to {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod assembler;
pub mod config;
pub mod downloader;
pub mod error;
pub mod observer;
pub mod state;
pub mod utils;
pub mod worker;

pub use args::Args;
pub use downloader::{DownloadOptions, download};
pub use error::{DownloadError, FetchCause};
pub use observer::{ConsoleProgress, NoopObserver, ObserverFactory, ProgressObserver};
pub use state::{RangeEnd, Resource, Segment};
