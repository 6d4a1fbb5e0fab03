use crate::domain::model::{Classification, SiteId, SiteRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

pub trait SiteStore: Send + Sync {
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<SiteRecord>>> + Send;
    /// Assigns an id when `record.id` is `None`, otherwise updates in place.
    fn save(
        &self,
        record: SiteRecord,
    ) -> impl std::future::Future<Output = Result<SiteRecord>> + Send;
    fn get(&self, id: SiteId) -> impl std::future::Future<Output = Result<Option<SiteRecord>>> + Send;
}

/// One reachability attempt against an already normalized URL.
pub trait Prober: Send + Sync {
    fn probe(&self, url: &str) -> impl std::future::Future<Output = Classification> + Send;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[async_trait]
pub trait Ticker: Send {
    /// Waits for the next tick. `None` means the ticker is exhausted.
    async fn tick(&mut self) -> Option<u64>;
}

pub trait ConfigProvider: Send + Sync {
    fn store_path(&self) -> &str;
    fn interval(&self) -> Duration;
    fn initial_delay(&self) -> Duration;
    fn connect_timeout(&self) -> Duration;
    fn request_timeout(&self) -> Option<Duration>;
    fn concurrency(&self) -> usize;
    fn follow_redirects(&self) -> bool;
    fn user_agent(&self) -> &str;
    fn seed_urls(&self) -> Vec<String>;
}
