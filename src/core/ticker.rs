use crate::domain::ports::Ticker;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Fixed-rate wall clock ticker. Missed ticks are dropped, never replayed.
pub struct IntervalTicker {
    interval: Interval,
    count: u64,
}

impl IntervalTicker {
    pub fn new(initial_delay: Duration, period: Duration) -> Self {
        let mut interval = time::interval_at(Instant::now() + initial_delay, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval, count: 0 }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> Option<u64> {
        self.interval.tick().await;
        self.count += 1;
        Some(self.count)
    }
}

/// Ticker driven by hand, one tick per `ManualTick::fire`.
pub struct ChannelTicker {
    rx: mpsc::Receiver<()>,
    count: u64,
}

#[derive(Clone)]
pub struct ManualTick {
    tx: mpsc::Sender<()>,
}

impl ManualTick {
    /// Fails if a tick is already waiting or the ticker is gone.
    pub fn fire(&self) -> bool {
        self.tx.try_send(()).is_ok()
    }
}

impl ChannelTicker {
    /// Dropping every `ManualTick` exhausts the ticker.
    pub fn new() -> (Self, ManualTick) {
        // Capacity 1: a tick nobody consumed yet absorbs later ones.
        let (tx, rx) = mpsc::channel(1);
        (Self { rx, count: 0 }, ManualTick { tx })
    }
}

#[async_trait]
impl Ticker for ChannelTicker {
    async fn tick(&mut self) -> Option<u64> {
        self.rx.recv().await?;
        self.count += 1;
        Some(self.count)
    }
}
