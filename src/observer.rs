//! Progress reporting hooks.
//!
//! Fetch tasks report through [`ProgressObserver`] so the library stays free
//! of any particular UI. The binary renders one `indicatif` bar per segment;
//! tests and embedders can use [`NoopObserver`].
use crate::state::Segment;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;

pub trait ProgressObserver: Send + Sync {
    /// Called with the size of every body chunk received.
    fn inc(&self, delta: u64);
    fn finish(&self);
    /// Called instead of `finish` when the segment failed or was cancelled.
    fn abandon(&self, msg: String);
}

/// Hands out one observer per segment of a download.
pub trait ObserverFactory: Send + Sync {
    fn observe(&self, filename: &str, segment: &Segment) -> Arc<dyn ProgressObserver>;
}

pub struct ConsoleObserver {
    pub pb: ProgressBar,
}

impl ProgressObserver for ConsoleObserver {
    fn inc(&self, delta: u64) {
        self.pb.inc(delta);
    }

    fn finish(&self) {
        self.pb.finish();
    }

    fn abandon(&self, msg: String) {
        self.pb.abandon_with_message(msg);
    }
}

/// Renders every segment as a bar inside a shared [`MultiProgress`].
#[derive(Clone)]
pub struct ConsoleProgress {
    multi: MultiProgress,
    style: ProgressStyle,
}

impl ConsoleProgress {
    pub fn new(multi: MultiProgress) -> Self {
        let style = ProgressStyle::with_template("{msg} {bar:40.cyan/blue} {bytes}/{total_bytes}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        Self { multi, style }
    }
}

impl ObserverFactory for ConsoleProgress {
    fn observe(&self, filename: &str, segment: &Segment) -> Arc<dyn ProgressObserver> {
        let pb = self.multi.add(ProgressBar::new(segment.size()));
        pb.set_style(self.style.clone());
        pb.set_message(format!("{} [Part {}]", filename, segment.index + 1));
        Arc::new(ConsoleObserver { pb })
    }
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn inc(&self, _delta: u64) {}
    fn finish(&self) {}
    fn abandon(&self, _msg: String) {}
}

impl ObserverFactory for NoopObserver {
    fn observe(&self, _filename: &str, _segment: &Segment) -> Arc<dyn ProgressObserver> {
        Arc::new(NoopObserver)
    }
}
