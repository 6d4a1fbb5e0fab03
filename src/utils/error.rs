use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Store error: {message}")]
    StoreError { message: String },

    #[error("Site not found: {id}")]
    SiteNotFound { id: String },
}

impl MonitorError {
    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            MonitorError::HttpClientError(_) => "Could not build the HTTP client".to_string(),
            MonitorError::IoError(e) => format!("File system problem: {}", e),
            MonitorError::SerializationError(_) => "The site store file is corrupted".to_string(),
            MonitorError::TomlError(_) => "The configuration file is not valid TOML".to_string(),
            MonitorError::ConfigError { message } => format!("Configuration problem: {}", message),
            MonitorError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            MonitorError::StoreError { message } => format!("Site store problem: {}", message),
            MonitorError::SiteNotFound { id } => format!("No site with id {}", id),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MonitorError::HttpClientError(_) => "Check the TLS backend and proxy environment variables",
            MonitorError::IoError(_) => "Check that the store path exists and is writable",
            MonitorError::SerializationError(_) => {
                "Restore the store file from a backup or delete it to start empty"
            }
            MonitorError::TomlError(_)
            | MonitorError::ConfigError { .. }
            | MonitorError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags and restart"
            }
            MonitorError::StoreError { .. } => "Check the site store and retry",
            MonitorError::SiteNotFound { .. } => "List the registered sites and use an existing id",
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;

/// Why a single check ended up `DOWN`. Always recovered into a status string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    #[error("Empty URL")]
    EmptyUrl,

    #[error("{0}")]
    Transport(&'static str),

    #[error("{0}")]
    MalformedUrl(&'static str),

    #[error("{0}")]
    UnexpectedStatus(u16),

    #[error("InternalError")]
    Internal,
}

impl ProbeFailure {
    /// Machine readable detail appended after `DOWN - `.
    pub fn detail(&self) -> String {
        self.to_string()
    }
}
