use common::{Direction, SignalEvent};

/// Batch admitted events into messages of at most `ceiling` characters,
/// each starting with the run-timestamp header. Lines keep their input
/// order across message boundaries. No events, no messages.
pub fn format_batch(events: &[SignalEvent], timestamp: &str, ceiling: usize) -> Vec<String> {
    if events.is_empty() {
        return Vec::new();
    }

    let header = format!("【MA10/MA20 跨日突破訊號】{timestamp}");
    let mut out = Vec::new();
    let mut buf = header.clone();

    for event in events {
        let line = render_line(event);
        if char_len(&buf) + 1 + char_len(&line) > ceiling {
            out.push(std::mem::replace(&mut buf, format!("{header}\n{line}")));
        } else {
            buf.push('\n');
            buf.push_str(&line);
        }
    }
    out.push(buf);
    out
}

/// One event renders as exactly one line. The direction vocabulary is
/// fixed, not configurable.
fn render_line(event: &SignalEvent) -> String {
    match event.direction {
        Direction::Up => format!("{}｜{} 向上突破，買進", event.symbol, event.kind),
        Direction::Down => format!("{}｜{} 向下突破，賣出", event.symbol, event.kind),
    }
}

// The ceiling counts characters, not bytes; the vocabulary is CJK.
fn char_len(s: &str) -> usize {
    s.chars().count()
}
