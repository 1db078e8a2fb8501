use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Best-effort price pair for one symbol, produced fresh on every run.
/// Either field may be missing when the provider has no data; a missing
/// value suppresses signal evaluation instead of failing the run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceSnapshot {
    /// Latest intraday price.
    pub latest: Option<f64>,
    /// Close of the prior session.
    pub previous_close: Option<f64>,
}

/// Moving-average window kind. The notification vocabulary is fixed to
/// these two windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaKind {
    Ma10,
    Ma20,
}

impl std::fmt::Display for MaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaKind::Ma10 => write!(f, "MA10"),
            MaKind::Ma20 => write!(f, "MA20"),
        }
    }
}

/// Which side of the moving average the price crossed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// A detected crossover for one symbol. Carries no price data; rendered
/// messages show only the symbol and the signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub symbol: String,
    pub kind: MaKind,
    pub direction: Direction,
}

impl SignalEvent {
    pub fn new(symbol: impl Into<String>, kind: MaKind, direction: Direction) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
            direction,
        }
    }

    /// The dedup key for this event.
    pub fn key(&self) -> SignalKey {
        SignalKey::from((self.kind, self.direction))
    }
}

/// Dedup key recorded in the ledger. Always derived from the structured
/// event, never recovered from rendered message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignalKey {
    #[serde(rename = "MA10_UP")]
    Ma10Up,
    #[serde(rename = "MA10_DOWN")]
    Ma10Down,
    #[serde(rename = "MA20_UP")]
    Ma20Up,
    #[serde(rename = "MA20_DOWN")]
    Ma20Down,
}

impl From<(MaKind, Direction)> for SignalKey {
    fn from((kind, direction): (MaKind, Direction)) -> Self {
        match (kind, direction) {
            (MaKind::Ma10, Direction::Up) => SignalKey::Ma10Up,
            (MaKind::Ma10, Direction::Down) => SignalKey::Ma10Down,
            (MaKind::Ma20, Direction::Up) => SignalKey::Ma20Up,
            (MaKind::Ma20, Direction::Down) => SignalKey::Ma20Down,
        }
    }
}

/// Per-symbol dedup record. `sent` is meaningful only while `date`
/// matches the current run's date; a node from a prior date is logically
/// empty regardless of its stored content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerNode {
    pub date: String,
    #[serde(default)]
    pub sent: BTreeMap<SignalKey, bool>,
}

/// The whole dedup ledger: one flat symbol → node map. Loaded once at the
/// start of a run, mutated in memory, written back once at the end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(flatten)]
    pub symbols: BTreeMap<String, LedgerNode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_key_derives_from_kind_and_direction() {
        let event = SignalEvent::new("MSFT", MaKind::Ma20, Direction::Up);
        assert_eq!(event.key(), SignalKey::Ma20Up);
        let event = SignalEvent::new("MSFT", MaKind::Ma10, Direction::Down);
        assert_eq!(event.key(), SignalKey::Ma10Down);
    }

    #[test]
    fn ledger_serializes_as_flat_symbol_map() {
        let mut ledger = Ledger::default();
        let mut sent = BTreeMap::new();
        sent.insert(SignalKey::Ma10Up, true);
        ledger.symbols.insert(
            "NVDA".to_string(),
            LedgerNode {
                date: "2026-08-06".to_string(),
                sent,
            },
        );

        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json["NVDA"]["date"], "2026-08-06");
        assert_eq!(json["NVDA"]["sent"]["MA10_UP"], true);
    }

    #[test]
    fn ledger_round_trips_through_json() {
        let mut ledger = Ledger::default();
        ledger.symbols.insert(
            "TSM".to_string(),
            LedgerNode {
                date: "2026-08-06".to_string(),
                sent: BTreeMap::from([(SignalKey::Ma20Down, true)]),
            },
        );

        let json = serde_json::to_string(&ledger).unwrap();
        let back: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }

    #[test]
    fn ledger_node_tolerates_missing_sent_field() {
        let node: LedgerNode = serde_json::from_str(r#"{"date":"2026-08-05"}"#).unwrap();
        assert!(node.sent.is_empty());
    }
}
