use crate::domain::model::{SiteId, SiteRecord};
use crate::domain::ports::SiteStore;
use crate::utils::error::Result;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Sites {
    next_id: u64,
    records: BTreeMap<SiteId, SiteRecord>,
}

/// Process-local store. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemorySiteStore {
    sites: Mutex<Sites>,
    writes: AtomicUsize,
}

impl InMemorySiteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls served so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl SiteStore for InMemorySiteStore {
    async fn list(&self) -> Result<Vec<SiteRecord>> {
        let sites = self.sites.lock().await;
        Ok(sites.records.values().cloned().collect())
    }

    async fn save(&self, mut record: SiteRecord) -> Result<SiteRecord> {
        let mut sites = self.sites.lock().await;
        let id = match record.id {
            Some(id) => {
                sites.next_id = sites.next_id.max(id.value());
                id
            }
            None => {
                sites.next_id += 1;
                SiteId::new(sites.next_id)
            }
        };
        record.id = Some(id);
        sites.records.insert(id, record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }

    async fn get(&self, id: SiteId) -> Result<Option<SiteRecord>> {
        let sites = self.sites.lock().await;
        Ok(sites.records.get(&id).cloned())
    }
}
