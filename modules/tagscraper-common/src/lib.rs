pub mod config;
pub mod error;
pub mod merge;
pub mod types;

pub use config::{Config, StoreBackend};
pub use error::{Result, ScrapeError};
pub use merge::merge;
pub use types::*;
