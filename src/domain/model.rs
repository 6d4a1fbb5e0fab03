use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_UP: &str = "UP";

/// Opaque identity handed out by the store on first save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(u64);

impl SiteId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRecord {
    pub id: Option<SiteId>,
    pub url: String,
    pub status: String,
    pub last_checked: Option<DateTime<Utc>>,
}

impl SiteRecord {
    /// A freshly registered site that has never been checked.
    pub fn pending(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: url.into(),
            status: STATUS_PENDING.to_string(),
            last_checked: None,
        }
    }
}

/// Coarse outcome of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Up,
    Down { detail: String },
}

impl Classification {
    pub fn down(detail: impl Into<String>) -> Self {
        Classification::Down {
            detail: detail.into(),
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, Classification::Up)
    }

    /// Text persisted in `SiteRecord::status`.
    pub fn status_text(&self) -> String {
        match self {
            Classification::Up => STATUS_UP.to_string(),
            Classification::Down { detail } => format!("DOWN - {}", detail),
        }
    }
}

impl From<crate::utils::error::ProbeFailure> for Classification {
    fn from(failure: crate::utils::error::ProbeFailure) -> Self {
        Classification::down(failure.detail())
    }
}
