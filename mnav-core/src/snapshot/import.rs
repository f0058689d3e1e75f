//! Snapshot import validation.
//!
//! Accepts an untyped JSON value in one of two shapes:
//!
//! - **legacy**: a bare array of company objects
//! - **envelope**: an object with a `companies` array and optional
//!   `manualSharesOutstanding` / `manualStockPrices` maps
//!
//! Validation is all-or-nothing: one bad company rejects the whole batch.

use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

use crate::company::{BalanceSheetField, Company};
use crate::resolver::TickerValues;

pub const MANUAL_SHARES_KEY: &str = "manualSharesOutstanding";
pub const MANUAL_PRICES_KEY: &str = "manualStockPrices";

/// Why an import was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("expected an array of companies or an object with a `companies` array")]
    NotAnArrayOrEnvelope,

    #[error("company #{index} is not an object")]
    NotAnObject { index: usize },

    #[error("company #{index} is missing `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("company #{index} field `{field}` must be {expected}")]
    InvalidType {
        index: usize,
        field: &'static str,
        expected: &'static str,
    },

    #[error("`{map}` must be an object")]
    InvalidOverrideMap { map: &'static str },

    #[error("`{map}` entry for `{ticker}` must be a number or null")]
    InvalidOverrideValue { map: &'static str, ticker: String },
}

/// Which wire shape a snapshot arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Legacy,
    Envelope,
}

/// A validated, normalized import.
///
/// Override maps are `None` when the snapshot did not carry them, which is
/// different from carrying an empty map.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedData {
    pub format: SnapshotFormat,
    pub companies: Vec<Company>,
    pub manual_shares_outstanding: Option<TickerValues>,
    pub manual_stock_prices: Option<TickerValues>,
}

/// The two accepted shapes, borrowed from the parsed document.
enum RawSnapshot<'a> {
    Legacy(&'a [Value]),
    Envelope {
        companies: &'a [Value],
        object: &'a Map<String, Value>,
    },
}

impl<'a> RawSnapshot<'a> {
    fn classify(data: &'a Value) -> Result<Self, ImportError> {
        match data {
            Value::Array(items) => Ok(Self::Legacy(items)),
            Value::Object(object) => match object.get("companies") {
                Some(Value::Array(companies)) => Ok(Self::Envelope { companies, object }),
                _ => Err(ImportError::NotAnArrayOrEnvelope),
            },
            _ => Err(ImportError::NotAnArrayOrEnvelope),
        }
    }
}

/// Validate and normalize a snapshot, reporting why it was rejected.
pub fn parse_import(data: &Value) -> Result<ImportedData, ImportError> {
    match RawSnapshot::classify(data)? {
        RawSnapshot::Legacy(items) => Ok(ImportedData {
            format: SnapshotFormat::Legacy,
            companies: parse_companies(items)?,
            manual_shares_outstanding: None,
            manual_stock_prices: None,
        }),
        RawSnapshot::Envelope { companies, object } => Ok(ImportedData {
            format: SnapshotFormat::Envelope,
            companies: parse_companies(companies)?,
            manual_shares_outstanding: parse_override_map(object, MANUAL_SHARES_KEY)?,
            manual_stock_prices: parse_override_map(object, MANUAL_PRICES_KEY)?,
        }),
    }
}

/// Validate and normalize a snapshot. `None` if it is not importable.
pub fn validate_import(data: &Value) -> Option<ImportedData> {
    match parse_import(data) {
        Ok(imported) => Some(imported),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected snapshot import");
            None
        }
    }
}

fn parse_companies(items: &[Value]) -> Result<Vec<Company>, ImportError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_company(index, item))
        .collect()
}

fn parse_company(index: usize, item: &Value) -> Result<Company, ImportError> {
    let object = item
        .as_object()
        .ok_or(ImportError::NotAnObject { index })?;

    let text = |field: &'static str| -> Result<String, ImportError> {
        match object.get(field) {
            None => Err(ImportError::MissingField { index, field }),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(ImportError::InvalidType {
                index,
                field,
                expected: "a string",
            }),
        }
    };

    let mut company = Company::new(text("id")?, text("name")?, text("ticker")?);

    for field in BalanceSheetField::ALL {
        let name = field.wire_name();
        let value = match object.get(name) {
            None => return Err(ImportError::MissingField { index, field: name }),
            Some(Value::Null) => None,
            Some(Value::Number(n)) => n.as_f64(),
            Some(_) => {
                return Err(ImportError::InvalidType {
                    index,
                    field: name,
                    expected: "a number or null",
                })
            }
        };
        // serde_json numbers are always finite
        *company.field_mut(field) = value;
    }

    Ok(company)
}

fn parse_override_map(
    object: &Map<String, Value>,
    map: &'static str,
) -> Result<Option<TickerValues>, ImportError> {
    let entries = match object.get(map) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(entries)) => entries,
        Some(_) => return Err(ImportError::InvalidOverrideMap { map }),
    };

    entries
        .iter()
        .map(|(ticker, value)| match value {
            Value::Null => Ok((ticker.clone(), None)),
            Value::Number(n) => Ok((ticker.clone(), n.as_f64())),
            _ => Err(ImportError::InvalidOverrideValue {
                map,
                ticker: ticker.clone(),
            }),
        })
        .collect::<Result<TickerValues, _>>()
        .map(Some)
}

/// Tickers from an import that need an immediate shares fetch: those not
/// among the existing companies, or present but with no cached shares value.
///
/// Order follows the import; duplicates are dropped.
pub fn get_new_tickers(
    imported: &[Company],
    existing: &[Company],
    api_shares_outstanding: &TickerValues,
) -> Vec<String> {
    let existing: HashSet<&str> = existing.iter().map(|c| c.ticker.as_str()).collect();
    let mut seen = HashSet::new();

    imported
        .iter()
        .map(|c| c.ticker.as_str())
        .filter(|ticker| {
            let cached = api_shares_outstanding
                .get(*ticker)
                .copied()
                .flatten()
                .is_some();
            !existing.contains(ticker) || !cached
        })
        .filter(|ticker| seen.insert(*ticker))
        .map(str::to_string)
        .collect()
}
