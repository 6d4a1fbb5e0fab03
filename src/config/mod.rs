pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use crate::core::probe::DEFAULT_USER_AGENT;
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use std::time::Duration;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "keepitalive")]
    #[command(about = "Periodically checks that registered websites are reachable")]
    pub struct CliConfig {
        /// TOML configuration file; when given, it replaces the scheduler/probe/store flags
        #[arg(short, long)]
        pub config: Option<String>,

        #[arg(long, default_value = "./sites.json")]
        pub store: String,

        #[arg(long, default_value = "10")]
        pub interval_secs: u64,

        #[arg(long, default_value = "5")]
        pub initial_delay_secs: u64,

        #[arg(long, default_value = "10")]
        pub connect_timeout_secs: u64,

        #[arg(long)]
        pub request_timeout_secs: Option<u64>,

        #[arg(long, default_value = "8")]
        pub concurrency: usize,

        #[arg(long, help = "Follow HTTP redirects instead of reporting them as DOWN")]
        pub follow_redirects: bool,

        #[arg(long, default_value = DEFAULT_USER_AGENT)]
        pub user_agent: String,

        /// Register a site before starting (repeatable)
        #[arg(long = "add", value_name = "URL")]
        pub add: Vec<String>,

        #[arg(long, help = "Run a single sweep, print the results and exit")]
        pub once: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log as JSON lines")]
        pub json_logs: bool,
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_positive_number("interval_secs", self.interval_secs, 1)?;
            validation::validate_positive_number("concurrency", self.concurrency as u64, 1)?;
            validation::validate_range("connect_timeout_secs", self.connect_timeout_secs, 1, 300)?;
            if let Some(timeout) = self.request_timeout_secs {
                validation::validate_range("request_timeout_secs", timeout, 1, 3600)?;
            }
            validation::validate_non_empty_string("user_agent", &self.user_agent)?;
            validation::validate_path("store", &self.store)?;
            Ok(())
        }
    }

    impl ConfigProvider for CliConfig {
        fn store_path(&self) -> &str {
            &self.store
        }

        fn interval(&self) -> Duration {
            Duration::from_secs(self.interval_secs)
        }

        fn initial_delay(&self) -> Duration {
            Duration::from_secs(self.initial_delay_secs)
        }

        fn connect_timeout(&self) -> Duration {
            Duration::from_secs(self.connect_timeout_secs)
        }

        fn request_timeout(&self) -> Option<Duration> {
            self.request_timeout_secs.map(Duration::from_secs)
        }

        fn concurrency(&self) -> usize {
            self.concurrency
        }

        fn follow_redirects(&self) -> bool {
            self.follow_redirects
        }

        fn user_agent(&self) -> &str {
            &self.user_agent
        }

        fn seed_urls(&self) -> Vec<String> {
            self.add.clone()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults_match_design() {
            let config = CliConfig::parse_from(["keepitalive"]);

            assert_eq!(config.interval(), Duration::from_secs(10));
            assert_eq!(config.initial_delay(), Duration::from_secs(5));
            assert_eq!(config.connect_timeout(), Duration::from_secs(10));
            assert_eq!(config.request_timeout(), None);
            assert_eq!(config.concurrency(), 8);
            assert_eq!(config.store_path(), "./sites.json");
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_repeated_add_flags() {
            let config = CliConfig::parse_from([
                "keepitalive",
                "--add",
                "example.com",
                "--add",
                "http://example.org",
                "--once",
            ]);

            assert_eq!(config.seed_urls(), vec!["example.com", "http://example.org"]);
            assert!(config.once);
        }

        #[test]
        fn test_zero_concurrency_is_rejected() {
            let config = CliConfig::parse_from(["keepitalive", "--concurrency", "0"]);
            assert!(config.validate().is_err());
        }
    }
}
