use httpmock::prelude::*;
use keepitalive::core::probe::TRANSPORT_TAGS;
use keepitalive::core::registry;
use keepitalive::core::ticker::ChannelTicker;
use keepitalive::domain::ports::SiteStore;
use keepitalive::{
    HttpProber, InMemorySiteStore, JsonFileSiteStore, ProbeSettings, SiteChecker, SiteRecord,
    SweepScheduler,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn http_prober() -> HttpProber {
    HttpProber::new(&ProbeSettings::default()).unwrap()
}

fn status_of<'a>(sites: &'a [SiteRecord], url: &str) -> &'a str {
    sites
        .iter()
        .find(|site| site.url == url)
        .map(|site| site.status.as_str())
        .unwrap()
}

#[tokio::test]
async fn test_sweep_classifies_each_site() {
    let server = MockServer::start();
    let healthy = server.mock(|when, then| {
        when.method(GET).path("/healthy");
        then.status(200).body("ok");
    });
    let created = server.mock(|when, then| {
        when.method(GET).path("/created");
        then.status(299);
    });
    let missing = server.mock(|when, then| {
        when.method(GET).path("/missing");
        then.status(404);
    });
    let failing = server.mock(|when, then| {
        when.method(GET).path("/failing");
        then.status(500);
    });

    let store = Arc::new(InMemorySiteStore::new());
    let urls = vec![
        server.url("/healthy"),
        server.url("/created"),
        server.url("/missing"),
        server.url("/failing"),
        "   ".to_string(),
    ];
    for url in &urls {
        registry::register_site(store.as_ref(), url).await.unwrap();
    }
    let writes_before = store.write_count();

    let scheduler = SweepScheduler::new(SiteChecker::new(store.clone(), http_prober()), 3);
    let summary = scheduler.try_sweep().await.unwrap();

    assert_eq!(summary.total, 5);
    assert_eq!(summary.up, 2);
    assert_eq!(summary.down, 3);
    assert_eq!(store.write_count() - writes_before, urls.len());

    let sites = store.list().await.unwrap();
    assert_eq!(status_of(&sites, &urls[0]), "UP");
    assert_eq!(status_of(&sites, &urls[1]), "UP");
    assert_eq!(status_of(&sites, &urls[2]), "DOWN - 404");
    assert_eq!(status_of(&sites, &urls[3]), "DOWN - 500");
    assert_eq!(status_of(&sites, "   "), "DOWN - Empty URL");
    assert!(sites.iter().all(|site| site.last_checked.is_some()));

    healthy.assert_hits(1);
    created.assert_hits(1);
    missing.assert_hits(1);
    failing.assert_hits(1);
}

#[tokio::test]
async fn test_unreachable_host_resolves_within_connect_timeout() {
    let store = Arc::new(InMemorySiteStore::new());
    let record = registry::register_site(store.as_ref(), "http://10.255.255.1/")
        .await
        .unwrap();

    let settings = ProbeSettings {
        connect_timeout: Duration::from_secs(2),
        ..ProbeSettings::default()
    };
    let checker = SiteChecker::new(store.clone(), HttpProber::new(&settings).unwrap());

    let started = Instant::now();
    let checked = checker.check(record).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(8));
    let detail = checked.status.strip_prefix("DOWN - ").unwrap();
    assert!(
        TRANSPORT_TAGS.contains(&detail),
        "unexpected status {}",
        checked.status
    );
}

#[tokio::test]
async fn test_consecutive_sweeps_advance_last_checked() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200);
    });

    let store = Arc::new(InMemorySiteStore::new());
    for url in [server.url("/"), "".to_string(), "http://127.0.0.1:1/".to_string()] {
        registry::register_site(store.as_ref(), &url).await.unwrap();
    }
    let scheduler = SweepScheduler::new(SiteChecker::new(store.clone(), http_prober()), 1);

    scheduler.try_sweep().await.unwrap();
    let first = store.list().await.unwrap();
    scheduler.try_sweep().await.unwrap();
    let second = store.list().await.unwrap();

    for (before, after) in first.iter().zip(second.iter()) {
        assert_eq!(before.id, after.id);
        assert!(after.last_checked.unwrap() > before.last_checked.unwrap());
    }
}

#[tokio::test]
async fn test_scheduler_persists_to_json_store() {
    let server = MockServer::start();
    let up = server.mock(|when, then| {
        when.method(GET).path("/up");
        then.status(200);
    });

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sites.json");
    let store = Arc::new(JsonFileSiteStore::open(&path).await.unwrap());
    let seeds = vec![server.url("/up"), "".to_string()];
    registry::register_missing(store.as_ref(), &seeds).await.unwrap();

    let scheduler = Arc::new(SweepScheduler::new(
        SiteChecker::new(store.clone(), http_prober()),
        4,
    ));
    let (ticker, handle) = ChannelTicker::new();
    let runner = tokio::spawn(scheduler.clone().run(ticker, std::future::pending::<()>()));
    assert!(handle.fire());
    drop(handle);
    runner.await.unwrap();

    up.assert_hits(1);
    assert_eq!(scheduler.completed_sweeps(), 1);

    let reopened = JsonFileSiteStore::open(&path).await.unwrap();
    let sites = reopened.list().await.unwrap();
    assert_eq!(sites.len(), 2);
    assert_eq!(status_of(&sites, &seeds[0]), "UP");
    assert_eq!(status_of(&sites, ""), "DOWN - Empty URL");
}
