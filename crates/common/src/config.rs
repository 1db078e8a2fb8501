use chrono::NaiveTime;
use serde::Deserialize;

/// All configuration loaded from environment variables at startup.
///
/// LINE credentials are deliberately optional: a run without a configured
/// sink still evaluates signals and updates the ledger, it just logs the
/// messages instead of delivering them.
#[derive(Debug, Clone)]
pub struct Config {
    // LINE Messaging API
    pub line_channel_token: Option<String>,
    pub line_to: Option<String>,

    // Dedup ledger file
    pub state_file: String,

    // Run parameter file path
    pub run_config_path: String,

    // Bypass the trading-window guard (for manual runs)
    pub allow_outside_window: bool,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        Config {
            line_channel_token: nonempty_env("LINE_CHANNEL_TOKEN"),
            line_to: nonempty_env("LINE_TO"),
            state_file: optional_env("STATE_FILE")
                .unwrap_or_else(|| "us_stock_signals_state.json".to_string()),
            run_config_path: optional_env("RUN_CONFIG_PATH")
                .unwrap_or_else(|| "config/breakbot.toml".to_string()),
            allow_outside_window: optional_env("ALLOW_OUTSIDE_WINDOW")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn nonempty_env(key: &str) -> Option<String> {
    optional_env(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Run parameters loaded from a TOML file.
///
/// Example `config/breakbot.toml`:
/// ```toml
/// symbols = ["MSFT", "NVDA", "TSM"]
/// size_ceiling = 900
///
/// [windows]
/// ma10 = 10
/// ma20 = 20
///
/// [session]
/// start = "21:30:00"
/// end = "03:00:00"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Watch-list, processed in order.
    pub symbols: Vec<String>,
    /// Character ceiling per outgoing message.
    #[serde(default = "default_size_ceiling")]
    pub size_ceiling: usize,
    /// Moving-average periods behind the MA10/MA20 signal labels.
    #[serde(default)]
    pub windows: WindowSizes,
    /// Wall-clock interval during which a run is permitted.
    #[serde(default)]
    pub session: TradingWindow,
    /// Cooperative throttle between per-symbol data fetches.
    #[serde(default = "default_symbol_delay_ms")]
    pub symbol_delay_ms: u64,
    /// Cooperative throttle between outgoing messages.
    #[serde(default = "default_send_delay_ms")]
    pub send_delay_ms: u64,
}

impl RunConfig {
    /// Load from a TOML file. Exits process on error.
    pub fn load(path: &str) -> Self {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read run config at '{path}': {e}"));
        toml::from_str(&content)
            .unwrap_or_else(|e| panic!("Failed to parse run config at '{path}': {e}"))
    }
}

fn default_size_ceiling() -> usize {
    900
}

fn default_symbol_delay_ms() -> u64 {
    200
}

fn default_send_delay_ms() -> u64 {
    1_000
}

/// Periods for the two signal windows.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WindowSizes {
    #[serde(default = "default_ma10")]
    pub ma10: usize,
    #[serde(default = "default_ma20")]
    pub ma20: usize,
}

impl Default for WindowSizes {
    fn default() -> Self {
        Self { ma10: 10, ma20: 20 }
    }
}

fn default_ma10() -> usize {
    10
}

fn default_ma20() -> usize {
    20
}

/// Trading window on the local wall clock. `end` earlier than `start`
/// means the interval crosses midnight (the default Taipei window for the
/// US session does: 21:30 through 03:00).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TradingWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for TradingWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(21, 30, 0).unwrap(),
            end: NaiveTime::from_hms_opt(3, 0, 0).unwrap(),
        }
    }
}

impl TradingWindow {
    /// Whether `t` falls inside the window, inclusive on both ends.
    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.end < self.start {
            t >= self.start || t <= self.end
        } else {
            t >= self.start && t <= self.end
        }
    }
}
