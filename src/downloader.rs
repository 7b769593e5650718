// src/downloader.rs
use crate::assembler;
use crate::error::{DownloadError, Result};
use crate::observer::ObserverFactory;
use crate::state::{RangeEnd, Resource, ResultTable, Segment};
use crate::utils;
use crate::worker::fetch_segment;
use futures_util::future::join_all;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// How a single download is split up and where it lands.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Number of segments to fetch concurrently.
    pub parts: usize,
    /// Segments are never planned smaller than this, which may lower `parts`.
    pub min_segment_size: u64,
    pub range_end: RangeEnd,
    /// Directory the output file is written to.
    pub output_dir: PathBuf,
    /// Output file name. Derived from the URL when `None`.
    pub output_name: Option<String>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            parts: 4,
            min_segment_size: 1,
            range_end: RangeEnd::default(),
            output_dir: PathBuf::from("."),
            output_name: None,
        }
    }
}

/// Downloads `url` into a single file and returns its path.
///
/// This consolidates the logic for:
/// 1. Deriving the output filename (before any network traffic).
/// 2. Looking up the total size with a HEAD request.
/// 3. Planning segments and fetching them concurrently.
/// 4. Assembling the segments once every fetch succeeded.
///
/// Nothing is written unless all segments arrive; a failed or cancelled
/// download leaves no output file behind.
pub async fn download(
    client: &Client,
    url: &str,
    options: &DownloadOptions,
    observers: &dyn ObserverFactory,
    cancel: &CancellationToken,
) -> Result<PathBuf> {
    let filename = match &options.output_name {
        Some(name) => name.clone(),
        None => utils::filename_from_url(url)?,
    };
    let destination = options.output_dir.join(&filename);

    let total_size = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(DownloadError::Cancelled),
        size = utils::get_file_size(url, client) => size?,
    };
    let resource = Resource {
        url: url.to_string(),
        total_size,
    };
    info!(url, total_size, "resolved resource size");

    let parts = utils::effective_part_count(total_size, options.parts, options.min_segment_size);
    let segments = utils::plan_segments(total_size, parts, options.range_end);

    let buffers = fetch_all(client, &resource, segments, &filename, observers, cancel).await?;

    // A cancellation that lands after the last fetch still wins
    if cancel.is_cancelled() {
        return Err(DownloadError::Cancelled);
    }

    assembler::assemble(buffers, &destination).await?;
    Ok(destination)
}

/// Fetches every segment concurrently and returns the buffers in index order.
///
/// One task is spawned per segment. The first failure is recorded in the
/// result table and cancels the remaining fetches; all tasks are joined
/// before returning either way.
pub async fn fetch_all(
    client: &Client,
    resource: &Resource,
    segments: Vec<Segment>,
    filename: &str,
    observers: &dyn ObserverFactory,
    cancel: &CancellationToken,
) -> Result<Vec<Vec<u8>>> {
    let table = Arc::new(Mutex::new(ResultTable::new(segments.len())));
    let abort = cancel.child_token();
    let mut tasks = Vec::with_capacity(segments.len());

    for segment in segments {
        let client_ref = client.clone();
        let url = resource.url.clone();
        let table_ref = table.clone();
        let token_ref = abort.clone();
        let observer = observers.observe(filename, &segment);

        let task = tokio::spawn(async move {
            let result = fetch_segment(&client_ref, &url, segment, observer, &token_ref).await;

            let mut locked = table_ref.lock().await;
            match result {
                Ok(bytes) => locked.store(segment.index, bytes),
                Err(e) => {
                    if !e.is_cancelled() {
                        warn!(
                            index = segment.index,
                            error = &e as &dyn std::error::Error,
                            "segment failed, aborting download"
                        );
                    }
                    if locked.fail(e) {
                        token_ref.cancel();
                    }
                }
            }
        });

        tasks.push(task);
    }

    let results = join_all(tasks).await;
    for result in results {
        if let Err(e) = result {
            table.lock().await.fail(DownloadError::TaskPanicked(e.to_string()));
        }
    }

    let table = Arc::try_unwrap(table)
        .map_err(|_| DownloadError::TaskPanicked("result table still shared".into()))?
        .into_inner();
    table.into_buffers()
}
