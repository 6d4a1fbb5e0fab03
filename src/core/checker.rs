use crate::core::normalize::normalize_url;
use crate::domain::model::{Classification, SiteRecord};
use crate::domain::ports::{Clock, Prober, SiteStore};
use crate::utils::error::{ProbeFailure, Result};
use chrono::{DateTime, TimeDelta, Utc};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Checks one site and writes the outcome back to the store.
pub struct SiteChecker<S: SiteStore, P: Prober, C: Clock = SystemClock> {
    store: Arc<S>,
    prober: P,
    clock: C,
}

impl<S: SiteStore, P: Prober> SiteChecker<S, P, SystemClock> {
    pub fn new(store: Arc<S>, prober: P) -> Self {
        Self::with_clock(store, prober, SystemClock)
    }
}

impl<S: SiteStore, P: Prober, C: Clock> SiteChecker<S, P, C> {
    pub fn with_clock(store: Arc<S>, prober: P, clock: C) -> Self {
        Self {
            store,
            prober,
            clock,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Runs one check for `record` and persists it exactly once.
    ///
    /// Every outcome, including a panicking probe, becomes a status string.
    /// The only error returned is a failed store write.
    pub async fn check(&self, mut record: SiteRecord) -> Result<SiteRecord> {
        let classification = self.classify(&record.url).await;

        record.status = classification.status_text();
        record.last_checked = Some(self.next_stamp(record.last_checked));

        tracing::debug!(
            "Site {} ({}) -> {}",
            record.id.map(|id| id.to_string()).unwrap_or_default(),
            record.url,
            record.status
        );

        self.store.save(record).await
    }

    async fn classify(&self, raw_url: &str) -> Classification {
        let url = match normalize_url(raw_url) {
            Ok(url) => url,
            Err(failure) => return failure.into(),
        };

        match AssertUnwindSafe(self.prober.probe(&url)).catch_unwind().await {
            Ok(classification) => classification,
            Err(_) => {
                tracing::error!("Probe for {} panicked", url);
                ProbeFailure::Internal.into()
            }
        }
    }

    // Stamps never go backwards or repeat for the same record.
    fn next_stamp(&self, previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
        let now = self.clock.now();
        match previous {
            Some(prev) if now <= prev => prev + TimeDelta::microseconds(1),
            _ => now,
        }
    }
}
