use crate::domain::model::{SiteId, SiteRecord};
use crate::domain::ports::SiteStore;
use crate::utils::error::{MonitorError, Result};

/// Registers `url` as a new `PENDING` site. The URL is stored as entered.
pub async fn register_site<S: SiteStore>(store: &S, url: &str) -> Result<SiteRecord> {
    let record = store.save(SiteRecord::pending(url)).await?;
    tracing::info!(
        "➕ Registered site {} ({})",
        record.id.map(|id| id.to_string()).unwrap_or_default(),
        record.url
    );
    Ok(record)
}

/// Registers each URL that no existing record already carries verbatim.
pub async fn register_missing<S: SiteStore>(store: &S, urls: &[String]) -> Result<Vec<SiteRecord>> {
    let existing: Vec<String> = store.list().await?.into_iter().map(|site| site.url).collect();

    let mut added = Vec::new();
    for url in urls {
        if existing.contains(url) || added.iter().any(|site: &SiteRecord| &site.url == url) {
            tracing::debug!("Site {} already registered", url);
            continue;
        }
        added.push(register_site(store, url).await?);
    }
    Ok(added)
}

pub async fn all_sites<S: SiteStore>(store: &S) -> Result<Vec<SiteRecord>> {
    store.list().await
}

pub async fn site<S: SiteStore>(store: &S, id: SiteId) -> Result<SiteRecord> {
    store
        .get(id)
        .await?
        .ok_or_else(|| MonitorError::SiteNotFound { id: id.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySiteStore;

    #[tokio::test]
    async fn test_register_site_is_pending() {
        let store = InMemorySiteStore::new();

        let record = tokio_test::assert_ok!(register_site(&store, "example.com").await);

        assert!(record.id.is_some());
        assert_eq!(record.status, "PENDING");
        assert_eq!(record.last_checked, None);
        assert_eq!(site(&store, record.id.unwrap()).await.unwrap(), record);
    }

    #[tokio::test]
    async fn test_register_missing_skips_duplicates() {
        let store = InMemorySiteStore::new();
        register_site(&store, "a.example").await.unwrap();

        let urls = vec![
            "a.example".to_string(),
            "b.example".to_string(),
            "b.example".to_string(),
        ];
        let added = register_missing(&store, &urls).await.unwrap();

        assert_eq!(added.len(), 1);
        assert_eq!(added[0].url, "b.example");
        assert_eq!(all_sites(&store).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_site_is_not_found() {
        let store = InMemorySiteStore::new();
        let result = site(&store, SiteId::new(9)).await;
        assert!(matches!(result, Err(MonitorError::SiteNotFound { .. })));
    }
}
