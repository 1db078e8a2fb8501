/// Simple moving average over a window of daily closes.
///
/// Produces the pair the detector compares against: the average as of
/// yesterday's close, and a same-day estimate formed by combining the
/// most recent `period - 1` closes with the latest intraday price. The
/// substitution of the latest price for the oldest close is the intended
/// approximation of an unclosed trading day's average; do not replace it
/// with a textbook SMA.
#[derive(Debug, Clone, Copy)]
pub struct SmaWindow {
    pub period: usize,
}

/// Evaluator output for one window. Either side is `None` when there is
/// not enough data; insufficient data is a silent no-signal, never an
/// error, because transient provider gaps are expected.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MaPair {
    pub yesterday: Option<f64>,
    pub today: Option<f64>,
}

impl SmaWindow {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "SMA period must be >= 2");
        Self { period }
    }

    /// Compute the pair from daily closes (oldest first, excluding any
    /// same-day bar) and the latest intraday price.
    pub fn evaluate(&self, closes: &[f64], latest: Option<f64>) -> MaPair {
        if closes.len() < self.period {
            return MaPair::default();
        }

        let tail = &closes[closes.len() - self.period..];
        let yesterday = tail.iter().sum::<f64>() / self.period as f64;

        let today = latest.and_then(|px| {
            let n = self.period - 1;
            if closes.len() < n {
                return None;
            }
            let tail = &closes[closes.len() - n..];
            Some((tail.iter().sum::<f64>() + px) / self.period as f64)
        });

        MaPair {
            yesterday: Some(yesterday),
            today,
        }
    }
}
