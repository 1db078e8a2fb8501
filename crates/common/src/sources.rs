use async_trait::async_trait;

use crate::{Ledger, PriceSnapshot, Result};

/// Abstraction over the market-data provider.
///
/// `YahooClient` in `crates/marketdata` implements this for production;
/// tests substitute canned data. Absence of data surfaces as `None`
/// fields or an `Err` that the runner isolates at the symbol boundary,
/// so one symbol's failure never aborts the run.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Best-effort latest price and previous close for a symbol.
    async fn snapshot(&self, symbol: &str) -> PriceSnapshot;

    /// Daily closing prices, oldest first, excluding any bar from the
    /// session currently in progress. Must span enough trading days to
    /// cover the largest moving-average window, with buffer for holidays.
    async fn daily_closes(&self, symbol: &str) -> Result<Vec<f64>>;
}

/// Delivery channel for formatted signal messages.
///
/// `LinePush` in `crates/line` implements this for production. Delivery
/// failure is logged by the caller and never fails the run.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Push one text message to the delivery target.
    async fn push(&self, to: &str, message: &str) -> Result<()>;
}

/// Durable storage for the dedup ledger.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the ledger. Missing or corrupt storage yields an empty
    /// ledger, never an error.
    async fn load(&self) -> Ledger;

    /// Persist the ledger with atomic replace semantics.
    async fn save(&self, ledger: &Ledger) -> Result<()>;
}
