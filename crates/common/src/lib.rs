pub mod config;
pub mod error;
pub mod sources;
pub mod types;

pub use config::{Config, RunConfig, TradingWindow, WindowSizes};
pub use error::{Error, Result};
pub use sources::{MarketDataSource, NotificationSink, StateStore};
pub use types::*;
