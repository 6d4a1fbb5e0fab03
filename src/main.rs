use anyhow::Context;
use clap::Parser;
use keepitalive::core::registry;
use keepitalive::domain::ports::ConfigProvider;
use keepitalive::utils::{logger, validation::Validate};
use keepitalive::{
    CliConfig, HttpProber, IntervalTicker, JsonFileSiteStore, MonitorError, ProbeSettings,
    SiteChecker, SweepScheduler, TomlConfig,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting keepitalive");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let outcome = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let mut config = match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => fail(&e),
            };
            // 命令列的 --add 也一併註冊
            config.sites.extend(
                cli.add
                    .iter()
                    .map(|url| keepitalive::config::toml_config::SiteSeed { url: url.clone() }),
            );
            if let Err(e) = config.validate() {
                fail(&e);
            }
            run(&config, cli.once).await
        }
        None => {
            if let Err(e) = cli.validate() {
                fail(&e);
            }
            run(&cli, cli.once).await
        }
    };

    if let Err(e) = outcome {
        fail(&e);
    }
    Ok(())
}

async fn run<C: ConfigProvider>(config: &C, once: bool) -> Result<(), MonitorError> {
    let store = Arc::new(JsonFileSiteStore::open(config.store_path()).await?);
    registry::register_missing(store.as_ref(), &config.seed_urls()).await?;

    let prober = HttpProber::new(&ProbeSettings::from_config(config))?;
    let checker = SiteChecker::new(Arc::clone(&store), prober);
    let scheduler = Arc::new(SweepScheduler::new(checker, config.concurrency()));

    if once {
        scheduler.try_sweep().await;
        for site in registry::all_sites(store.as_ref()).await? {
            let checked = site
                .last_checked
                .map(|ts| ts.to_rfc3339())
                .unwrap_or_else(|| "never".to_string());
            println!(
                "{}\t{}\t{}\t{}",
                site.id.map(|id| id.to_string()).unwrap_or_default(),
                site.status,
                checked,
                site.url
            );
        }
        return Ok(());
    }

    tracing::info!(
        "⏱️ Checking every {:?} (first check in {:?}), up to {} at a time",
        config.interval(),
        config.initial_delay(),
        config.concurrency()
    );

    let ticker = IntervalTicker::new(config.initial_delay(), config.interval());
    scheduler
        .run(ticker, async {
            if let Err(e) = tokio::signal::ctrl_c()
                .await
                .context("listening for Ctrl-C")
            {
                tracing::error!("{:#}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    tracing::info!("👋 keepitalive stopped");
    Ok(())
}

fn fail(e: &MonitorError) -> ! {
    tracing::error!("❌ {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}
