use crate::domain::model::{SiteId, SiteRecord};
use crate::domain::ports::SiteStore;
use crate::utils::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreDocument {
    next_id: u64,
    sites: Vec<SiteRecord>,
}

impl StoreDocument {
    fn upsert(&mut self, mut record: SiteRecord) -> SiteRecord {
        let id = match record.id {
            Some(id) => {
                self.next_id = self.next_id.max(id.value());
                id
            }
            None => {
                self.next_id += 1;
                SiteId::new(self.next_id)
            }
        };
        record.id = Some(id);

        match self.sites.iter_mut().find(|site| site.id == Some(id)) {
            Some(existing) => *existing = record.clone(),
            None => self.sites.push(record.clone()),
        }
        record
    }
}

/// Site store persisted as a single JSON document.
///
/// The whole document is rewritten on every save through a temporary file
/// and a rename, so a crash never leaves a half-written store behind.
///
/// Saves are serialized behind one lock and each one rewrites the full
/// file, so a sweep over N sites costs N rewrites one after another. That
/// is fine for a few hundred sites; larger deployments want a real database
/// behind `SiteStore`.
#[derive(Debug)]
pub struct JsonFileSiteStore {
    path: PathBuf,
    document: Mutex<StoreDocument>,
}

impl JsonFileSiteStore {
    /// 開啟既有的檔案；檔案不存在時從空的 store 開始
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let document = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => StoreDocument::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreDocument::default(),
            Err(e) => return Err(MonitorError::IoError(e)),
        };

        let highest = document
            .sites
            .iter()
            .filter_map(|site| site.id.map(|id| id.value()))
            .max()
            .unwrap_or(0);
        if highest > document.next_id {
            return Err(MonitorError::StoreError {
                message: format!(
                    "{} has nextId {} below existing id {}",
                    path.display(),
                    document.next_id,
                    highest
                ),
            });
        }

        tracing::debug!(
            "Opened site store {} with {} sites",
            path.display(),
            document.sites.len()
        );

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, document: &StoreDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_vec_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &data).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

impl SiteStore for JsonFileSiteStore {
    async fn list(&self) -> Result<Vec<SiteRecord>> {
        let document = self.document.lock().await;
        Ok(document.sites.clone())
    }

    async fn save(&self, record: SiteRecord) -> Result<SiteRecord> {
        let mut document = self.document.lock().await;

        // 先寫入副本，成功後才替換記憶體中的狀態
        let mut next = document.clone();
        let saved = next.upsert(record);
        self.persist(&next).await?;
        *document = next;

        Ok(saved)
    }

    async fn get(&self, id: SiteId) -> Result<Option<SiteRecord>> {
        let document = self.document.lock().await;
        Ok(document.sites.iter().find(|site| site.id == Some(id)).cloned())
    }
}
