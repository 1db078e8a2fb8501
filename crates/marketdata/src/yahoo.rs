//! Yahoo Finance market-data client.
//!
//! Uses the unauthenticated v8 chart API. Yahoo has no official API and
//! the response format can change without notice, so parse failures are
//! surfaced as errors and isolated per symbol by the caller.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use common::{Error, MarketDataSource, PriceSnapshot, Result};

const BASE_URL: &str = "https://query2.finance.yahoo.com";

/// Calendar days of daily history to request, buffered well past the
/// largest moving-average window to ride out holidays and data gaps.
const HISTORY_RANGE: &str = "120d";

/// REST client for the Yahoo Finance v8 chart API.
pub struct YahooClient {
    http: Client,
}

impl YahooClient {
    pub fn new() -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(30))
                .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
                .use_rustls_tls()
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    async fn chart(&self, symbol: &str, range: &str, interval: &str) -> Result<ChartData> {
        let url =
            format!("{BASE_URL}/v8/finance/chart/{symbol}?range={range}&interval={interval}");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::MarketData(format!("HTTP {status} for {symbol}")));
        }

        let chart: ChartResponse = resp.json().await.map_err(|e| Error::Http(e.to_string()))?;
        chart_data(symbol, chart)
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataSource for YahooClient {
    /// Best-effort snapshot via an ordered fallback chain. Each strategy
    /// is isolated: a failure logs and falls through to the next, and
    /// exhaustion leaves the field absent rather than erroring.
    async fn snapshot(&self, symbol: &str) -> PriceSnapshot {
        let mut snap = PriceSnapshot::default();

        // Fast path: one cheap daily request carries both fields in its meta
        match self.chart(symbol, "1d", "1d").await {
            Ok(data) => {
                snap.latest = data.meta.regular_market_price;
                snap.previous_close = data
                    .meta
                    .chart_previous_close
                    .or(data.meta.previous_close);
            }
            Err(e) => debug!(symbol = %symbol, error = %e, "Chart meta lookup failed"),
        }

        // Fallback: latest 1-minute close of the recent sessions
        if snap.latest.is_none() {
            match self.chart(symbol, "5d", "1m").await {
                Ok(data) => snap.latest = data.close_values().last().copied(),
                Err(e) => debug!(symbol = %symbol, error = %e, "Intraday fallback failed"),
            }
        }

        // Fallback: recover the previous close from recent daily bars
        if snap.previous_close.is_none() {
            match self.chart(symbol, "5d", "1d").await {
                Ok(data) => snap.previous_close = previous_close_from(&data.close_values()),
                Err(e) => debug!(symbol = %symbol, error = %e, "Daily-close fallback failed"),
            }
        }

        snap
    }

    async fn daily_closes(&self, symbol: &str) -> Result<Vec<f64>> {
        let data = self.chart(symbol, HISTORY_RANGE, "1d").await?;

        // The chart API includes a partial bar for the session in
        // progress; drop it so the averages only see settled closes. US
        // sessions never straddle a UTC date boundary, so the date test
        // is exact.
        let today = Utc::now().date_naive();
        Ok(data
            .dated_closes()
            .into_iter()
            .filter(|(date, _)| *date < today)
            .map(|(_, close)| close)
            .collect())
    }
}

/// Second-to-last daily close, or the last one when only a single bar
/// came back.
fn previous_close_from(closes: &[f64]) -> Option<f64> {
    match closes.len() {
        0 => None,
        1 => Some(closes[0]),
        n => Some(closes[n - 2]),
    }
}

fn chart_data(symbol: &str, resp: ChartResponse) -> Result<ChartData> {
    if let Some(err) = resp.chart.error {
        return Err(Error::MarketData(format!(
            "{symbol}: {}: {}",
            err.code, err.description
        )));
    }

    resp.chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| Error::MarketData(format!("{symbol}: empty chart result")))
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    chart_previous_close: Option<f64>,
    previous_close: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

impl ChartData {
    /// Close values in bar order, null rows dropped.
    fn close_values(&self) -> Vec<f64> {
        self.indicators
            .quote
            .first()
            .map(|q| q.close.iter().flatten().copied().collect())
            .unwrap_or_default()
    }

    /// (date, close) pairs from the parallel timestamp/close arrays.
    fn dated_closes(&self) -> Vec<(NaiveDate, f64)> {
        let Some(timestamps) = &self.timestamp else {
            return Vec::new();
        };
        let Some(quote) = self.indicators.quote.first() else {
            return Vec::new();
        };

        timestamps
            .iter()
            .zip(quote.close.iter())
            .filter_map(|(&ts, close)| {
                let close = (*close)?;
                let date = chrono::DateTime::from_timestamp(ts, 0)?.date_naive();
                Some((date, close))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_meta_and_closes() {
        let resp = parse(
            r#"{"chart":{"result":[{
                "meta":{"regularMarketPrice":105.5,"chartPreviousClose":101.0},
                "timestamp":[1754404200,1754490600],
                "indicators":{"quote":[{"close":[100.0,101.0]}]}
            }],"error":null}}"#,
        );
        let data = chart_data("MSFT", resp).unwrap();
        assert_eq!(data.meta.regular_market_price, Some(105.5));
        assert_eq!(data.meta.chart_previous_close, Some(101.0));
        assert_eq!(data.close_values(), vec![100.0, 101.0]);
    }

    #[test]
    fn null_close_rows_are_dropped() {
        let resp = parse(
            r#"{"chart":{"result":[{
                "timestamp":[1754404200,1754490600,1754577000],
                "indicators":{"quote":[{"close":[100.0,null,102.0]}]}
            }],"error":null}}"#,
        );
        let data = chart_data("MSFT", resp).unwrap();
        assert_eq!(data.close_values(), vec![100.0, 102.0]);
        assert_eq!(data.dated_closes().len(), 2);
    }

    #[test]
    fn dated_closes_convert_epoch_to_dates() {
        // 2025-08-05 13:30:00 UTC
        let resp = parse(
            r#"{"chart":{"result":[{
                "timestamp":[1754400600],
                "indicators":{"quote":[{"close":[99.5]}]}
            }],"error":null}}"#,
        );
        let data = chart_data("MSFT", resp).unwrap();
        let dated = data.dated_closes();
        assert_eq!(
            dated,
            vec![(NaiveDate::from_ymd_opt(2025, 8, 5).unwrap(), 99.5)]
        );
    }

    #[test]
    fn api_error_payload_maps_to_market_data_error() {
        let resp = parse(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        );
        let err = chart_data("BOGUS", resp).unwrap_err();
        assert!(matches!(err, Error::MarketData(_)));
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn empty_result_is_an_error() {
        let resp = parse(r#"{"chart":{"result":[],"error":null}}"#);
        assert!(chart_data("MSFT", resp).is_err());
    }

    #[test]
    fn previous_close_prefers_second_to_last() {
        assert_eq!(previous_close_from(&[]), None);
        assert_eq!(previous_close_from(&[100.0]), Some(100.0));
        assert_eq!(previous_close_from(&[100.0, 101.0, 102.0]), Some(101.0));
    }
}
