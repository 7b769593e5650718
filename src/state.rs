//! In-memory download state.
//!
//! A download is described by a [`Resource`], split into [`Segment`]s, and
//! its fetched bytes are collected in a [`ResultTable`] shared by every
//! fetch task until assembly.
use crate::error::{DownloadError, Result};

/// The resource being downloaded, as reported by its HEAD response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// The source URL of the file.
    pub url: String,
    /// Length reported by the server's `Content-Length` header.
    pub total_size: u64,
}

/// Represents a specific range of bytes within a file to be downloaded.
///
/// The range is inclusive, meaning `start` and `end` are both part of the
/// segment, matching the `Range: bytes=start-end` header it is sent as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Index of the segment
    pub index: usize,
    /// The starting byte index (0-based).
    pub start: u64,
    /// The ending byte index.
    pub end: u64,
}

impl Segment {
    /// Number of bytes this segment requests.
    pub fn size(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Value for the HTTP `Range` request header.
    pub fn range_header(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}

/// Where the last segment of a plan ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RangeEnd {
    /// The last segment ends at `total_size - 1`, the final valid byte.
    #[default]
    Exact,
    /// The last segment ends at `total_size`, one past the final byte.
    ///
    /// Servers that clamp out-of-range ends return the same bytes as
    /// [`RangeEnd::Exact`]; servers that don't may append an extra byte.
    Legacy,
}

/// Fixed-length table of fetched segment buffers, indexed by segment.
///
/// Shared across fetch tasks behind a single mutex. The first failure
/// recorded wins; later failures (usually cancellations it triggered)
/// are dropped.
#[derive(Debug)]
pub struct ResultTable {
    slots: Vec<Option<Vec<u8>>>,
    failure: Option<DownloadError>,
}

impl ResultTable {
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| None).collect(),
            failure: None,
        }
    }

    /// Stores the bytes of segment `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or the slot is already filled;
    /// both mean a segment was dispatched twice.
    pub fn store(&mut self, index: usize, bytes: Vec<u8>) {
        let slot = &mut self.slots[index];
        assert!(slot.is_none(), "segment {index} stored twice");
        *slot = Some(bytes);
    }

    /// Records a failure. Returns `true` if this was the first one.
    pub fn fail(&mut self, error: DownloadError) -> bool {
        if self.failure.is_some() {
            return false;
        }
        self.failure = Some(error);
        true
    }

    /// Consumes the table, yielding buffers in index order.
    ///
    /// Fails with the recorded failure, or with `Cancelled` if any slot was
    /// never filled.
    pub fn into_buffers(self) -> Result<Vec<Vec<u8>>> {
        if let Some(error) = self.failure {
            return Err(error);
        }
        self.slots
            .into_iter()
            .map(|slot| slot.ok_or(DownloadError::Cancelled))
            .collect()
    }
}
