pub mod checker;
pub mod normalize;
pub mod probe;
pub mod registry;
pub mod scheduler;
pub mod ticker;

pub use crate::domain::model::{Classification, SiteId, SiteRecord};
pub use crate::domain::ports::{Clock, ConfigProvider, Prober, SiteStore, Ticker};
pub use crate::utils::error::Result;
