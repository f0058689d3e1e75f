//! Live feed state.
//!
//! Holds what the external fetchers have delivered (last good value per
//! ticker, failure flags, aggregate status) alongside the user's manual
//! overrides. Writes replace one key at a time; the latest write for a
//! ticker wins.

use chrono::{DateTime, Utc};
use mnav_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::resolver::{ApiStatus, ErrorFlags, FieldValue, TickerValues};

/// All sources for one value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sources {
    /// Manual override; `None` means none in force.
    pub manual: Option<f64>,
    /// Last successfully fetched value.
    pub api: Option<f64>,
    /// The last fetch attempt failed.
    pub error: bool,
}

impl Sources {
    fn field(&self, status: ApiStatus) -> FieldValue {
        FieldValue::classify(self.manual, self.api, self.error, status)
    }

    fn is_empty(&self) -> bool {
        self.manual.is_none() && self.api.is_none() && !self.error
    }
}

fn check_finite(what: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() => Err(Error::InvalidInput(format!(
            "{what} must be a finite number, got {v}"
        ))),
        _ => Ok(()),
    }
}

// ============================================================================
// Single value (Bitcoin price)
// ============================================================================

/// A single process-wide live value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveQuote {
    sources: Sources,
    status: ApiStatus,
    last_update: Option<DateTime<Utc>>,
}

impl LiveQuote {
    pub fn field(&self) -> FieldValue {
        self.sources.field(self.status)
    }

    pub fn value(&self) -> Option<f64> {
        self.field().value()
    }

    /// Record a successful fetch.
    pub fn record(&mut self, value: f64, at: DateTime<Utc>) {
        self.sources.api = Some(value);
        self.sources.error = false;
        self.status = ApiStatus::Success;
        self.last_update = Some(at);
    }

    pub fn set_manual(&mut self, value: Option<f64>) -> Result<()> {
        check_finite("manual value", value)?;
        self.sources.manual = value;
        Ok(())
    }

    pub fn manual(&self) -> Option<f64> {
        self.sources.manual
    }

    pub fn set_status(&mut self, status: ApiStatus) {
        self.status = status;
    }

    pub fn status(&self) -> ApiStatus {
        self.status
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }
}

// ============================================================================
// Per-ticker values (stock prices, shares outstanding)
// ============================================================================

/// A per-ticker live feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveFeed {
    entries: BTreeMap<String, Sources>,
    status: ApiStatus,
    last_update: Option<DateTime<Utc>>,
}

impl LiveFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolved state for a ticker. Unknown tickers are unset.
    pub fn field(&self, ticker: &str) -> FieldValue {
        self.entries
            .get(ticker)
            .copied()
            .unwrap_or_default()
            .field(self.status)
    }

    pub fn value(&self, ticker: &str) -> Option<f64> {
        self.field(ticker).value()
    }

    pub fn sources(&self, ticker: &str) -> Sources {
        self.entries.get(ticker).copied().unwrap_or_default()
    }

    /// Record a successful fetch and clear any failure flag.
    pub fn record(&mut self, ticker: &str, value: f64, at: DateTime<Utc>) {
        let entry = self.entries.entry(ticker.to_string()).or_default();
        entry.api = Some(value);
        entry.error = false;
        self.last_update = Some(at);
    }

    /// Flag a ticker whose fetch failed. Any cached value is kept.
    pub fn mark_failed(&mut self, ticker: &str) {
        self.entries.entry(ticker.to_string()).or_default().error = true;
    }

    pub fn clear_error(&mut self, ticker: &str) {
        if let Some(entry) = self.entries.get_mut(ticker) {
            entry.error = false;
        }
        self.prune(ticker);
    }

    /// Set or clear (with `None`) a manual override.
    pub fn set_manual(&mut self, ticker: &str, value: Option<f64>) -> Result<()> {
        check_finite(&format!("manual value for {ticker}"), value)?;
        self.entries.entry(ticker.to_string()).or_default().manual = value;
        self.prune(ticker);
        Ok(())
    }

    pub fn has_manual(&self, ticker: &str) -> bool {
        self.sources(ticker).manual.is_some()
    }

    /// Replace every manual override with `values`. Null entries clear.
    pub fn replace_manual(&mut self, values: &TickerValues) -> Result<()> {
        for (ticker, value) in values {
            check_finite(&format!("manual value for {ticker}"), *value)?;
        }
        for entry in self.entries.values_mut() {
            entry.manual = None;
        }
        for (ticker, value) in values {
            self.entries.entry(ticker.clone()).or_default().manual = *value;
        }
        self.entries.retain(|_, sources| !sources.is_empty());
        Ok(())
    }

    /// Manual overrides in force.
    pub fn manual_values(&self) -> TickerValues {
        self.entries
            .iter()
            .filter_map(|(ticker, s)| s.manual.map(|v| (ticker.clone(), Some(v))))
            .collect()
    }

    /// Cached API values.
    pub fn api_values(&self) -> TickerValues {
        self.entries
            .iter()
            .filter_map(|(ticker, s)| s.api.map(|v| (ticker.clone(), Some(v))))
            .collect()
    }

    pub fn error_flags(&self) -> ErrorFlags {
        self.entries
            .iter()
            .filter(|(_, s)| s.error)
            .map(|(ticker, _)| (ticker.clone(), true))
            .collect()
    }

    /// Drop cached API values and failure flags, keeping overrides.
    pub fn clear_api(&mut self) {
        for entry in self.entries.values_mut() {
            entry.api = None;
            entry.error = false;
        }
        self.entries.retain(|_, sources| !sources.is_empty());
        self.last_update = None;
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.status = ApiStatus::Idle;
        self.last_update = None;
    }

    pub fn set_status(&mut self, status: ApiStatus) {
        self.status = status;
    }

    pub fn status(&self) -> ApiStatus {
        self.status
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    fn prune(&mut self, ticker: &str) {
        if self.entries.get(ticker).is_some_and(Sources::is_empty) {
            self.entries.remove(ticker);
        }
    }
}

// ============================================================================
// Events from the fetchers
// ============================================================================

/// Which live feed an event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    Bitcoin,
    StockPrices,
    SharesOutstanding,
}

/// Something the external fetchers observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    BitcoinPrice { price: f64 },
    StockPrice { ticker: String, price: f64 },
    SharesOutstanding { ticker: String, shares: f64 },
    /// Every endpoint failed for this ticker.
    SharesFetchFailed { ticker: String },
    Status { feed: FeedKind, status: ApiStatus },
}
