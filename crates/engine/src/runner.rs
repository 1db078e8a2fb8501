use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use tracing::{error, info, warn};

use common::{MarketDataSource, NotificationSink, RunConfig, SignalEvent, StateStore};
use signal::{admit, detect, format_batch, SmaWindow};

/// A configured notification channel: the sink plus its delivery target.
pub struct Delivery {
    pub sink: Arc<dyn NotificationSink>,
    pub to: String,
}

/// One complete evaluation pass over the watch-list.
///
/// Owns the collaborators behind their trait seams; the binary decides
/// the concrete clients. Processing is sequential and single-threaded:
/// the ledger is only ever touched from this loop, and the sleeps are
/// cooperative rate-limit throttles, not correctness mechanisms.
pub struct Runner {
    cfg: RunConfig,
    source: Arc<dyn MarketDataSource>,
    delivery: Option<Delivery>,
    store: Arc<dyn StateStore>,
}

impl Runner {
    pub fn new(
        cfg: RunConfig,
        source: Arc<dyn MarketDataSource>,
        delivery: Option<Delivery>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            cfg,
            source,
            delivery,
            store,
        }
    }

    /// Run one full pass and return the formatted batch that was sent.
    ///
    /// The ledger is loaded exactly once up front and persisted exactly
    /// once at the end, whether or not any signal fired. Every
    /// per-symbol failure is isolated: the remaining symbols always get
    /// processed.
    pub async fn run_once(&self, now: DateTime<FixedOffset>) -> Vec<String> {
        let mut ledger = self.store.load().await;
        let today = now.format("%Y-%m-%d").to_string();

        let mut admitted: Vec<SignalEvent> = Vec::new();
        for symbol in &self.cfg.symbols {
            let events = self.evaluate_symbol(symbol).await;
            let fresh = admit(&mut ledger, symbol, &today, &events);
            if !fresh.is_empty() {
                info!(symbol = %symbol, count = fresh.len(), "Fresh signals admitted");
            }
            admitted.extend(fresh);
            tokio::time::sleep(Duration::from_millis(self.cfg.symbol_delay_ms)).await;
        }

        let timestamp = now.format("%Y-%m-%d %H:%M:%S %z").to_string();
        let messages = format_batch(&admitted, &timestamp, self.cfg.size_ceiling);

        for message in &messages {
            info!("\n{message}");
            if let Some(delivery) = &self.delivery {
                if let Err(e) = delivery.sink.push(&delivery.to, message).await {
                    // No retry: the events stay marked sent and a failed
                    // delivery is never re-sent the same day.
                    error!(error = %e, "Notification delivery failed");
                }
            }
            tokio::time::sleep(Duration::from_millis(self.cfg.send_delay_ms)).await;
        }

        if let Err(e) = self.store.save(&ledger).await {
            warn!(error = %e, "Failed to persist dedup ledger");
        }

        messages
    }

    /// Fetch, evaluate and detect for one symbol. Data failures degrade
    /// to missing inputs, which silently suppress the affected windows.
    async fn evaluate_symbol(&self, symbol: &str) -> Vec<SignalEvent> {
        let snapshot = self.source.snapshot(symbol).await;
        let closes = match self.source.daily_closes(symbol).await {
            Ok(closes) => closes,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "History fetch failed — skipping evaluation");
                Vec::new()
            }
        };

        let ma20 = SmaWindow::new(self.cfg.windows.ma20).evaluate(&closes, snapshot.latest);
        let ma10 = SmaWindow::new(self.cfg.windows.ma10).evaluate(&closes, snapshot.latest);
        detect(symbol, &snapshot, ma20, ma10)
    }
}
