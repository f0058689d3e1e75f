//! Effective-value resolution.
//!
//! Each market value (stock price, shares outstanding, Bitcoin price) can
//! come from a manual override, from the last successful fetch, or from
//! nowhere. This module decides which one is authoritative and what
//! provenance to report.
//!
//! Precedence, highest first:
//!
//! | Provenance | When                                                   |
//! |------------|--------------------------------------------------------|
//! | `manual`   | a non-null manual override exists                      |
//! | `error`    | the ticker's fetch failed and there is no override     |
//! | `loading`  | a fetch is in flight and nothing is cached yet         |
//! | `api`      | otherwise                                              |
//!
//! Everything here is pure. Unknown tickers resolve to "no data".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-ticker values as they appear on the wire: `ticker → number | null`.
pub type TickerValues = BTreeMap<String, Option<f64>>;

/// Per-ticker fetch failure flags.
pub type ErrorFlags = BTreeMap<String, bool>;

/// Aggregate status of a live feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl std::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Where a displayed value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Manual,
    Api,
    Error,
    Loading,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Api => write!(f, "api"),
            Self::Error => write!(f, "error"),
            Self::Loading => write!(f, "loading"),
        }
    }
}

/// The resolved state of one market value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FieldValue {
    /// Never fetched, nothing entered.
    Unset,
    /// Fetch in flight, nothing cached.
    Loading,
    /// Last fetch failed. A value from an earlier success is kept.
    Error { stale: Option<f64> },
    Value { value: f64, manual: bool },
}

impl FieldValue {
    /// Classify one ticker's sources.
    ///
    /// A `manual` of `None` means no override is in force.
    pub fn classify(manual: Option<f64>, api: Option<f64>, error: bool, status: ApiStatus) -> Self {
        match (manual, api) {
            (Some(value), _) => Self::Value {
                value,
                manual: true,
            },
            (None, stale) if error => Self::Error { stale },
            (None, None) if status == ApiStatus::Loading => Self::Loading,
            (None, Some(value)) => Self::Value {
                value,
                manual: false,
            },
            (None, None) => Self::Unset,
        }
    }

    /// The value to compute with, if any.
    pub fn value(&self) -> Option<f64> {
        match *self {
            Self::Value { value, .. } => Some(value),
            Self::Error { stale } => stale,
            Self::Unset | Self::Loading => None,
        }
    }

    /// Provenance for display. An unset value reports `api`.
    pub fn provenance(&self) -> Provenance {
        match self {
            Self::Value { manual: true, .. } => Provenance::Manual,
            Self::Error { .. } => Provenance::Error,
            Self::Loading => Provenance::Loading,
            Self::Value { manual: false, .. } | Self::Unset => Provenance::Api,
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Value { manual: true, .. })
    }
}

#[inline]
fn lookup(map: &TickerValues, ticker: &str) -> Option<f64> {
    map.get(ticker).copied().flatten()
}

/// Effective value for a ticker: manual override, then API value, then none.
pub fn resolve(ticker: &str, manual: &TickerValues, api: &TickerValues) -> Option<f64> {
    lookup(manual, ticker).or_else(|| lookup(api, ticker))
}

/// Full resolved state for a ticker.
pub fn resolve_field(
    ticker: &str,
    manual: &TickerValues,
    api: &TickerValues,
    errors: &ErrorFlags,
    status: ApiStatus,
) -> FieldValue {
    FieldValue::classify(
        lookup(manual, ticker),
        lookup(api, ticker),
        errors.get(ticker).copied().unwrap_or(false),
        status,
    )
}

/// Provenance of a ticker's effective value.
pub fn resolve_source(
    ticker: &str,
    manual: &TickerValues,
    api: &TickerValues,
    errors: &ErrorFlags,
    status: ApiStatus,
) -> Provenance {
    resolve_field(ticker, manual, api, errors, status).provenance()
}
