//! Request coalescing: collapse concurrent identical requests into one
//! in-flight unit of work.
//!
//! Design Note: cache stampedes under concurrent identical
//! requests are avoided by tracking in-flight keys and making every caller
//! but the first wait on the first's completion, the same shape as the
//! idempotency-key plugin's `Entry::InFlight { notify: Arc<Notify> }` /
//! `Entry::Completed` store. Unlike that plugin, [`RequestCoalescer`] does
//! not itself hold the result: the first caller (`leader`) produces and
//! persists it (typically into a [`CachePort`](crate::cache::CachePort)),
//! and every waiting caller (`follower`) re-reads it once woken. This keeps
//! the coalescer free of a generic result slot and lets the same instance
//! serve callers returning different types.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry as MapEntry;
use tokio::sync::Notify;

/// Collapses concurrent callers keyed by an arbitrary string into a single
/// in-flight unit of work.
pub struct RequestCoalescer {
    inflight: DashMap<String, Arc<Notify>>,
}

impl Default for RequestCoalescer {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestCoalescer {
    pub fn new() -> Self {
        Self {
            inflight: DashMap::new(),
        }
    }

    /// Runs `leader` if no other caller currently holds `key`; otherwise
    /// waits for that caller to finish and runs `follower` instead.
    ///
    /// `follower` is expected to pick up whatever `leader` produced (a
    /// cache read, typically) and must tolerate still observing a miss if
    /// the leader itself failed.
    pub async fn coalesce<T, E, Lead, LeadFut, Foll, FollFut>(
        &self,
        key: &str,
        leader: Lead,
        follower: Foll,
    ) -> Result<T, E>
    where
        Lead: FnOnce() -> LeadFut,
        LeadFut: Future<Output = Result<T, E>>,
        Foll: FnOnce() -> FollFut,
        FollFut: Future<Output = Result<T, E>>,
    {
        let notify = match self.inflight.entry(key.to_string()) {
            MapEntry::Occupied(occupied) => {
                let notify = occupied.get().clone();
                drop(occupied);
                notify.notified().await;
                return follower().await;
            }
            MapEntry::Vacant(vacant) => {
                let notify = Arc::new(Notify::new());
                vacant.insert(notify.clone());
                notify
            }
        };

        let result = leader().await;
        self.inflight.remove(key);
        notify.notify_waiters();
        result
    }

    /// Number of keys currently in flight. Exposed for tests and metrics.
    pub fn in_flight_count(&self) -> usize {
        self.inflight.len()
    }
}
