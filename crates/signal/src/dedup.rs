use common::{Ledger, LedgerNode, SignalEvent};

/// Admit each (symbol, signal, day) at most once, mutating the ledger.
///
/// A stored node whose date differs from `today` is treated as empty;
/// stale entries are discarded, not merged. A symbol with zero admitted
/// events still gets its node stamped with today's date on the first
/// visit of the day, so later runs see a consistent ledger. A same-day
/// node with no fresh events is left untouched.
pub fn admit(
    ledger: &mut Ledger,
    symbol: &str,
    today: &str,
    events: &[SignalEvent],
) -> Vec<SignalEvent> {
    let node = ledger.symbols.get(symbol);
    let same_day = node.is_some_and(|n| n.date == today);
    let mut sent = if same_day {
        node.map(|n| n.sent.clone()).unwrap_or_default()
    } else {
        Default::default()
    };

    let mut fresh = Vec::new();
    for event in events {
        if sent.insert(event.key(), true).is_none() {
            fresh.push(event.clone());
        }
    }

    if !fresh.is_empty() || !same_day {
        ledger.symbols.insert(
            symbol.to_string(),
            LedgerNode {
                date: today.to_string(),
                sent,
            },
        );
    }

    fresh
}
