//! Migration Watcher
//!
//! Purpose:
//!     Turn the unbounded log subscription into a lazy stream of detections.
//!     Messages are pulled one at a time, only when the consumer polls, and
//!     classified strictly in arrival order.
//!
//! Created: 2026-10-17
//!
//! Notes:
//!     - Malformed messages are skipped (warn + counter), never fatal
//!     - A subscription failure is yielded once as Err, then the stream ends
//!     - Cancellation stops pulling; a message already received is always
//!       classified before the next cancellation check
//!     - The subscription stream is owned here and dropped on every exit path

use super::classifier::EventClassifier;
use super::subscription::LogStream;
use super::types::{DetectionEvent, LogMessage, RawLogNotification};
use crate::error::Result;
use futures::{Stream, StreamExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Counters shared between the watcher and whoever wants to report on it.
///
/// `received` counts every item pulled from the subscription except a
/// terminal failure, so `malformed <= received` always holds.
#[derive(Debug, Default)]
pub struct WatchStats {
    received: AtomicU64,
    malformed: AtomicU64,
    detections: AtomicU64,
}

impl WatchStats {
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    pub fn malformed(&self) -> u64 {
        self.malformed.load(Ordering::Relaxed)
    }

    pub fn detections(&self) -> u64 {
        self.detections.load(Ordering::Relaxed)
    }
}

/// Drives one subscription through the classifier
pub struct MigrationWatcher {
    classifier: EventClassifier,
    cancel: CancellationToken,
    stats: Arc<WatchStats>,
}

struct WatchState<'a> {
    subscription: LogStream<'a>,
    classifier: EventClassifier,
    cancel: CancellationToken,
    stats: Arc<WatchStats>,
}

impl MigrationWatcher {
    pub fn new(classifier: EventClassifier, cancel: CancellationToken) -> Self {
        Self {
            classifier,
            cancel,
            stats: Arc::new(WatchStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<WatchStats> {
        Arc::clone(&self.stats)
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Consume `subscription` and yield detections until it ends, fails,
    /// or the cancellation token fires.
    pub fn watch<'a>(
        &self,
        subscription: LogStream<'a>,
    ) -> impl Stream<Item = Result<DetectionEvent>> + Send + 'a {
        let state = WatchState {
            subscription,
            classifier: self.classifier.clone(),
            cancel: self.cancel.clone(),
            stats: Arc::clone(&self.stats),
        };

        futures::stream::unfold(Some(state), |state| async move {
            let mut st = state?;
            loop {
                let next = tokio::select! {
                    biased;
                    _ = st.cancel.cancelled() => {
                        info!(
                            received = st.stats.received(),
                            detections = st.stats.detections(),
                            "watch cancelled, releasing subscription"
                        );
                        return None;
                    }
                    next = st.subscription.next() => next,
                };

                match next {
                    Some(Ok(raw)) => {
                        if let Some(event) = st.process(raw) {
                            return Some((Ok(event), Some(st)));
                        }
                    }
                    Some(Err(e)) if e.is_fatal_to_watch() => {
                        warn!(error = %e, "subscription failed, ending watch");
                        return Some((Err(e), None));
                    }
                    Some(Err(e)) => {
                        st.stats.received.fetch_add(1, Ordering::Relaxed);
                        st.stats.malformed.fetch_add(1, Ordering::Relaxed);
                        warn!(error = %e, "skipping bad notification");
                    }
                    None => {
                        info!(
                            received = st.stats.received(),
                            detections = st.stats.detections(),
                            "subscription ended"
                        );
                        return None;
                    }
                }
            }
        })
    }
}

impl WatchState<'_> {
    fn process(&mut self, raw: RawLogNotification) -> Option<DetectionEvent> {
        self.stats.received.fetch_add(1, Ordering::Relaxed);

        let msg = match LogMessage::try_from(raw) {
            Ok(msg) => msg,
            Err(e) => {
                self.stats.malformed.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "skipping malformed log message");
                return None;
            }
        };

        match self.classifier.classify(&msg) {
            Some(event) => {
                self.stats.detections.fetch_add(1, Ordering::Relaxed);
                info!(
                    signature = %event.signature,
                    keyword = %event.matched_keyword,
                    slot = ?event.slot,
                    "migration detected"
                );
                Some(event)
            }
            None => {
                debug!(signature = %msg.signature, lines = msg.lines.len(), "no match");
                None
            }
        }
    }
}
