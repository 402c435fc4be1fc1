//! Prepared statement cache keyed by query text.
//!
//! Each distinct text owns one slot. The first caller for a text creates the
//! slot and starts preparation on a background task; everyone else, including
//! callers that arrive after preparation finished, waits on the same slot.
//! The outcome, success or failure, stays in the slot until [`StatementCache::clear`].

use std::{
    collections::HashMap,
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

use futures::future::{BoxFuture, FutureExt};
use tokio::{runtime::Handle, sync::watch};

use crate::{CacheOptions, CqlError, PreparedStatement, Result, Session};

type Outcome = Result<PreparedStatement>;
type Slot = watch::Receiver<Option<Outcome>>;

/// Receives the advisory emitted when the cache grows past its threshold.
pub trait CacheObserver: Send + Sync {
    fn threshold_exceeded(&self, cached: usize, threshold: usize);
}

/// Logs the threshold advisory as a `tracing` warning.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl CacheObserver for TracingObserver {
    fn threshold_exceeded(&self, cached: usize, threshold: usize) {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            cached,
            threshold,
            "the prepared statement cache contains {cached} queries; use parameter markers \
             for queries or raise max_prepared_statements_threshold"
        );

        #[cfg(not(feature = "tracing"))]
        let _ = (cached, threshold);
    }
}

pub struct StatementCache {
    slots: Mutex<HashMap<String, Slot>>,
    threshold: AtomicUsize,
    observer: Arc<dyn CacheObserver>,
}

impl fmt::Debug for StatementCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementCache")
            .field("len", &self.len())
            .field("threshold", &self.max_prepared_statements_threshold())
            .finish()
    }
}

impl Default for StatementCache {
    fn default() -> Self {
        Self::new(CacheOptions::default())
    }
}

impl StatementCache {
    pub fn new(options: CacheOptions) -> Self {
        Self::with_observer(options, Arc::new(TracingObserver))
    }

    pub fn with_observer(options: CacheOptions, observer: Arc<dyn CacheObserver>) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            threshold: AtomicUsize::new(options.max_prepared_statements_threshold),
            observer,
        }
    }

    pub fn max_prepared_statements_threshold(&self) -> usize {
        self.threshold.load(Ordering::Relaxed)
    }

    pub fn set_max_prepared_statements_threshold(&self, threshold: usize) {
        self.threshold.store(threshold, Ordering::Relaxed);
    }

    /// Number of distinct query texts in the cache, pending or resolved.
    pub fn len(&self) -> usize {
        self.lock_slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, query: &str) -> bool {
        self.lock_slots().contains_key(query)
    }

    /// Drops every slot, including failed ones.
    ///
    /// Preparations still in flight finish for the callers already waiting
    /// on them; the next caller for that text starts a new preparation.
    pub fn clear(&self) {
        self.lock_slots().clear();
    }

    /// Returns the prepared statement for `query`, preparing it through
    /// `session` only if no slot exists for the text yet.
    ///
    /// Inside a Tokio runtime the preparation runs on a spawned task and
    /// completes even if this future is dropped. Outside one it is driven by
    /// the caller that created the slot; dropping that caller aborts the
    /// preparation and the slot reports [`CqlError::PreparationAborted`]
    /// until [`clear`](Self::clear).
    pub async fn resolve(&self, session: &Arc<dyn Session>, query: &str) -> Outcome {
        let (mut slot, inline) = self.slot(session, query);
        if let Some(preparation) = inline {
            preparation.await;
        }
        let outcome = match slot.wait_for(Option::is_some).await {
            Ok(outcome) => outcome.clone(),
            Err(_) => None,
        };

        let cached = self.len();
        let threshold = self.max_prepared_statements_threshold();
        if cached > threshold {
            self.observer.threshold_exceeded(cached, threshold);
        }

        outcome.unwrap_or_else(|| {
            Err(CqlError::PreparationAborted {
                query: query.to_owned(),
            })
        })
    }

    /// Returns the slot for `query`, creating it if absent. A new slot's
    /// preparation is spawned, or handed back when no runtime is available.
    fn slot(&self, session: &Arc<dyn Session>, query: &str) -> (Slot, Option<BoxFuture<'static, ()>>) {
        let mut slots = self.lock_slots();
        if let Some(slot) = slots.get(query) {
            return (slot.clone(), None);
        }

        let (sender, slot) = watch::channel(None);
        slots.insert(query.to_owned(), slot.clone());
        drop(slots);

        #[cfg(feature = "tracing")]
        tracing::debug!(query, "preparing statement");

        let session = Arc::clone(session);
        let query = query.to_owned();
        let preparation = async move {
            let outcome = session.prepare(&query).await;
            sender.send_replace(Some(outcome));
        }
        .boxed();

        // Runs detached so an abandoned caller does not cancel the preparation.
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(preparation);
                (slot, None)
            }
            Err(_) => (slot, Some(preparation)),
        }
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
