use crate::core::checker::{SiteChecker, SystemClock};
use crate::domain::model::STATUS_UP;
use crate::domain::ports::{Clock, Prober, SiteStore, Ticker};
use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::{JoinHandle, JoinSet};

pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SweepState {
    Idle = 0,
    Running = 1,
}

impl SweepState {
    fn from_u8(raw: u8) -> Self {
        if raw == SweepState::Running as u8 {
            SweepState::Running
        } else {
            SweepState::Idle
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub total: usize,
    pub up: usize,
    pub down: usize,
    /// Checks whose result could not be written back.
    pub failed: usize,
}

// Puts the scheduler back to Idle when the sweep ends, even by panic.
struct RunningGuard(Arc<AtomicU8>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(SweepState::Idle as u8, Ordering::Release);
    }
}

/// Runs a full sweep over the store on every tick.
///
/// At most one sweep is in flight. A tick that lands while a sweep is
/// running is dropped. Within a sweep at most `concurrency` checks run at
/// once and a failing check never stops the others.
pub struct SweepScheduler<S: SiteStore, P: Prober, C: Clock = SystemClock> {
    checker: Arc<SiteChecker<S, P, C>>,
    concurrency: usize,
    state: Arc<AtomicU8>,
    skipped_ticks: AtomicU64,
    completed_sweeps: AtomicU64,
}

impl<S, P, C> SweepScheduler<S, P, C>
where
    S: SiteStore + 'static,
    P: Prober + 'static,
    C: Clock + 'static,
{
    pub fn new(checker: SiteChecker<S, P, C>, concurrency: usize) -> Self {
        Self {
            checker: Arc::new(checker),
            concurrency: concurrency.max(1),
            state: Arc::new(AtomicU8::new(SweepState::Idle as u8)),
            skipped_ticks: AtomicU64::new(0),
            completed_sweeps: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> SweepState {
        SweepState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn skipped_ticks(&self) -> u64 {
        self.skipped_ticks.load(Ordering::Relaxed)
    }

    pub fn completed_sweeps(&self) -> u64 {
        self.completed_sweeps.load(Ordering::Relaxed)
    }

    fn begin(&self) -> Option<RunningGuard> {
        match self.state.compare_exchange(
            SweepState::Idle as u8,
            SweepState::Running as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => Some(RunningGuard(Arc::clone(&self.state))),
            Err(_) => {
                self.skipped_ticks.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("⏭️ Previous sweep still running, skipping this tick");
                None
            }
        }
    }

    /// Sweeps once unless a sweep is already running, in which case `None`.
    pub async fn try_sweep(&self) -> Option<SweepSummary> {
        let _guard = self.begin()?;
        Some(self.sweep().await)
    }

    async fn sweep(&self) -> SweepSummary {
        let started = Instant::now();
        let sites = match self.checker.store().list().await {
            Ok(sites) => sites,
            Err(e) => {
                tracing::error!("❌ Could not list sites, sweep aborted: {}", e);
                return SweepSummary::default();
            }
        };

        tracing::info!("🔄 Running scheduled check of {} sites", sites.len());

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut checks = JoinSet::new();
        for site in sites {
            let checker = Arc::clone(&self.checker);
            let semaphore = Arc::clone(&semaphore);
            checks.spawn(async move {
                // The semaphore is never closed.
                let _permit = semaphore.acquire_owned().await.ok();
                checker.check(site).await
            });
        }

        let mut summary = SweepSummary::default();
        while let Some(joined) = checks.join_next().await {
            summary.total += 1;
            match joined {
                Ok(Ok(record)) if record.status == STATUS_UP => summary.up += 1,
                Ok(Ok(_)) => summary.down += 1,
                Ok(Err(e)) => {
                    summary.failed += 1;
                    tracing::warn!("⚠️ Could not record check result: {}", e);
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!("❌ Site check task failed: {}", e);
                }
            }
        }

        self.completed_sweeps.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            "✅ Scheduled check finished in {:?}: {} up, {} down, {} failed of {}",
            started.elapsed(),
            summary.up,
            summary.down,
            summary.failed,
            summary.total
        );

        summary
    }

    /// Sweeps on every tick until the ticker runs out or `shutdown` resolves.
    ///
    /// Sweeps run in their own task so the ticker keeps its cadence no matter
    /// how long a sweep takes. An in-flight sweep is awaited before returning.
    pub async fn run<T, F>(self: Arc<Self>, mut ticker: T, shutdown: F)
    where
        T: Ticker,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut in_flight: Option<JoinHandle<()>> = None;

        loop {
            let tick = tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("🛑 Shutdown requested, stopping scheduler");
                    break;
                }
                tick = ticker.tick() => tick,
            };

            let Some(tick) = tick else {
                tracing::debug!("Ticker exhausted, stopping scheduler");
                break;
            };
            tracing::debug!("Tick {}", tick);

            let Some(guard) = self.begin() else {
                continue;
            };
            let scheduler = Arc::clone(&self);
            in_flight = Some(tokio::spawn(async move {
                let _guard = guard;
                scheduler.sweep().await;
            }));
        }

        if let Some(handle) = in_flight {
            if let Err(e) = handle.await {
                tracing::error!("❌ Sweep task failed: {}", e);
            }
        }
    }
}
