use crate::error::{DownloadError, FetchCause, Result};
use crate::observer::ProgressObserver;
use crate::state::Segment;
use reqwest::header::RANGE;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Downloads a single segment into memory.
///
/// Sends one ranged GET and buffers the whole body. Any 2xx status is
/// accepted, and the body length is not checked against the requested
/// range. There is no retry: a failure is returned to the caller as-is.
///
/// Every await point races against `cancel`; a cancelled fetch drops its
/// response, closing the connection, and returns `Cancelled`. The observer
/// is finished on success and abandoned otherwise.
pub async fn fetch_segment(
    client: &reqwest::Client,
    url: &str,
    segment: Segment,
    observer: Arc<dyn ProgressObserver>,
    cancel: &CancellationToken,
) -> Result<Vec<u8>> {
    match fetch_into_buffer(client, url, segment, observer.as_ref(), cancel).await {
        Ok(buffer) => {
            observer.finish();
            debug!(index = segment.index, bytes = buffer.len(), "segment complete");
            Ok(buffer)
        }
        Err(DownloadError::Cancelled) => {
            observer.abandon("Cancelled".into());
            Err(DownloadError::Cancelled)
        }
        Err(e) => {
            let reason = match &e {
                DownloadError::SegmentFetchFailed { cause, .. } => cause.to_string(),
                other => other.to_string(),
            };
            observer.abandon(format!("Failed: {reason}"));
            Err(e)
        }
    }
}

async fn fetch_into_buffer(
    client: &reqwest::Client,
    url: &str,
    segment: Segment,
    observer: &dyn ProgressObserver,
    cancel: &CancellationToken,
) -> Result<Vec<u8>> {
    let request = client
        .get(url)
        .header(RANGE, segment.range_header())
        .send();

    let mut response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(DownloadError::Cancelled),
        sent = request => sent.map_err(|e| DownloadError::segment(segment.index, e))?,
    };

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::segment(
            segment.index,
            FetchCause::Status(status),
        ));
    }
    debug!(index = segment.index, %status, range = %segment.range_header(), "segment response");

    let capacity = usize::try_from(segment.size()).unwrap_or(0);
    let mut buffer = Vec::with_capacity(capacity);

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DownloadError::Cancelled),
            next = response.chunk() => next.map_err(|e| DownloadError::segment(segment.index, e))?,
        };
        let Some(bytes) = next else { break };

        observer.inc(bytes.len() as u64);
        buffer.extend_from_slice(&bytes);
    }

    Ok(buffer)
}
