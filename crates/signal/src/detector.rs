use common::{Direction, MaKind, PriceSnapshot, SignalEvent};

use crate::evaluator::MaPair;

/// Apply the four cross-day crossover rules for one symbol.
///
/// A window fires only when previous close, yesterday's MA, today's MA
/// and the latest price are all present: the close must sit on one side
/// of yesterday's average and the current price on the other side of
/// today's. Strict inequalities: equality emits nothing, and partial
/// data never produces a signal. MA20 is checked before MA10, which
/// fixes output order only.
pub fn detect(
    symbol: &str,
    snapshot: &PriceSnapshot,
    ma20: MaPair,
    ma10: MaPair,
) -> Vec<SignalEvent> {
    let mut events = Vec::new();
    for (kind, pair) in [(MaKind::Ma20, ma20), (MaKind::Ma10, ma10)] {
        if let Some(direction) = crossover(snapshot, pair) {
            events.push(SignalEvent::new(symbol, kind, direction));
        }
    }
    events
}

fn crossover(snapshot: &PriceSnapshot, ma: MaPair) -> Option<Direction> {
    let prev_close = snapshot.previous_close?;
    let latest = snapshot.latest?;
    let yesterday = ma.yesterday?;
    let today = ma.today?;

    if prev_close < yesterday && latest > today {
        Some(Direction::Up)
    } else if prev_close > yesterday && latest < today {
        Some(Direction::Down)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(previous_close: f64, latest: f64) -> PriceSnapshot {
        PriceSnapshot {
            latest: Some(latest),
            previous_close: Some(previous_close),
        }
    }

    fn pair(yesterday: f64, today: f64) -> MaPair {
        MaPair {
            yesterday: Some(yesterday),
            today: Some(today),
        }
    }

    #[test]
    fn upward_break_emits_up() {
        // close below yesterday's MA, price above today's MA
        let events = detect("AAA", &snapshot(95.0, 105.0), pair(100.0, 100.0), MaPair::default());
        assert_eq!(events, vec![SignalEvent::new("AAA", MaKind::Ma20, Direction::Up)]);
    }

    #[test]
    fn downward_break_emits_down() {
        let events = detect("AAA", &snapshot(105.0, 95.0), pair(100.0, 100.0), MaPair::default());
        assert_eq!(
            events,
            vec![SignalEvent::new("AAA", MaKind::Ma20, Direction::Down)]
        );
    }

    #[test]
    fn ma20_reported_before_ma10() {
        let events = detect(
            "NVDA",
            &snapshot(95.0, 105.0),
            pair(100.0, 100.0),
            pair(100.0, 100.0),
        );
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, MaKind::Ma20);
        assert_eq!(events[1].kind, MaKind::Ma10);
    }

    #[test]
    fn windows_fire_independently() {
        // Only the MA10 window crosses
        let events = detect(
            "TSM",
            &snapshot(95.0, 105.0),
            pair(90.0, 100.0), // close above yesterday's MA20 → no signal
            pair(100.0, 100.0),
        );
        assert_eq!(events, vec![SignalEvent::new("TSM", MaKind::Ma10, Direction::Up)]);
    }

    #[test]
    fn equality_emits_nothing() {
        assert!(detect("AAA", &snapshot(100.0, 105.0), pair(100.0, 100.0), MaPair::default()).is_empty());
        assert!(detect("AAA", &snapshot(95.0, 100.0), pair(100.0, 100.0), MaPair::default()).is_empty());
    }

    #[test]
    fn missing_inputs_suppress_the_window() {
        let full = pair(100.0, 100.0);
        let no_today = MaPair {
            yesterday: Some(100.0),
            today: None,
        };

        let no_prev = PriceSnapshot {
            latest: Some(105.0),
            previous_close: None,
        };
        let no_latest = PriceSnapshot {
            latest: None,
            previous_close: Some(95.0),
        };

        assert!(detect("AAA", &no_prev, full, full).is_empty());
        assert!(detect("AAA", &no_latest, full, full).is_empty());
        assert!(detect("AAA", &snapshot(95.0, 105.0), no_today, no_today).is_empty());
        assert!(detect("AAA", &snapshot(95.0, 105.0), MaPair::default(), MaPair::default()).is_empty());
    }

    #[test]
    fn same_side_move_emits_nothing() {
        // Price stayed above both averages, no crossover
        assert!(detect("AAA", &snapshot(105.0, 110.0), pair(100.0, 100.0), MaPair::default()).is_empty());
        // Price stayed below both averages
        assert!(detect("AAA", &snapshot(95.0, 90.0), pair(100.0, 100.0), MaPair::default()).is_empty());
    }
}
