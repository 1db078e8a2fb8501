use std::sync::Arc;

use chrono::{FixedOffset, Utc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::{Config, RunConfig};
use engine::{Delivery, Runner};
use line_push::LinePush;
use marketdata::YahooClient;
use state::JsonStateStore;

/// Taipei wall clock. UTC+8 year-round; Taiwan has no DST.
const TAIPEI_UTC_OFFSET_SECS: i32 = 8 * 3600;

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    let run_cfg = RunConfig::load(&cfg.run_config_path);
    info!(symbols = run_cfg.symbols.len(), "BreakBot starting");

    // ── Trading-window guard ──────────────────────────────────────────────────
    // A wall-clock precondition, not core logic: the scheduler fires on
    // a cadence, and a run outside the window simply exits.
    let taipei = FixedOffset::east_opt(TAIPEI_UTC_OFFSET_SECS).unwrap();
    let now = Utc::now().with_timezone(&taipei);
    if !run_cfg.session.contains(now.time()) && !cfg.allow_outside_window {
        info!(now = %now.format("%H:%M:%S"), "Outside the trading window — nothing to do");
        return;
    }

    // ── Notification channel ──────────────────────────────────────────────────
    let delivery = match (&cfg.line_channel_token, &cfg.line_to) {
        (Some(token), Some(to)) => Some(Delivery {
            sink: Arc::new(LinePush::new(token.clone())),
            to: to.clone(),
        }),
        _ => {
            warn!("LINE credentials not configured — messages will only be logged");
            None
        }
    };

    // ── Run once; the scheduler provides cadence ──────────────────────────────
    let runner = Runner::new(
        run_cfg,
        Arc::new(YahooClient::new()),
        delivery,
        Arc::new(JsonStateStore::new(&cfg.state_file)),
    );

    let batch = runner.run_once(now).await;
    info!(messages = batch.len(), "Run complete");
}
