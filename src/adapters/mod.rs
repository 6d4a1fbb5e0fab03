// Adapters layer: concrete site stores behind the `SiteStore` port.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileSiteStore;
pub use memory::InMemorySiteStore;
