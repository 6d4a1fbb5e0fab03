use crate::core::probe::DEFAULT_USER_AGENT;
use crate::core::ConfigProvider;
use crate::utils::error::{MonitorError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sites: Vec<SiteSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub interval_secs: u64,
    pub initial_delay_secs: u64,
    pub concurrency: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            initial_delay_secs: 5,
            concurrency: crate::core::scheduler::DEFAULT_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub follow_redirects: bool,
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            follow_redirects: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "./sites.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSeed {
    pub url: String,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${STORE_PATH})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MonitorError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number("scheduler.interval_secs", self.scheduler.interval_secs, 1)?;
        validation::validate_positive_number(
            "scheduler.concurrency",
            self.scheduler.concurrency as u64,
            1,
        )?;
        validation::validate_range(
            "probe.connect_timeout_secs",
            self.probe.connect_timeout_secs,
            1,
            300,
        )?;
        if let Some(timeout) = self.probe.request_timeout_secs {
            validation::validate_range("probe.request_timeout_secs", timeout, 1, 3600)?;
        }
        validation::validate_non_empty_string("probe.user_agent", &self.probe.user_agent)?;
        validation::validate_path("store.path", &self.store.path)?;
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn store_path(&self) -> &str {
        &self.store.path
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.interval_secs)
    }

    fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.scheduler.initial_delay_secs)
    }

    fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.probe.connect_timeout_secs)
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.probe.request_timeout_secs.map(Duration::from_secs)
    }

    fn concurrency(&self) -> usize {
        self.scheduler.concurrency
    }

    fn follow_redirects(&self) -> bool {
        self.probe.follow_redirects
    }

    fn user_agent(&self) -> &str {
        &self.probe.user_agent
    }

    fn seed_urls(&self) -> Vec<String> {
        self.sites.iter().map(|site| site.url.clone()).collect()
    }
}
