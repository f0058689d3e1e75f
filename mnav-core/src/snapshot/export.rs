//! Snapshot export.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;

use crate::company::Company;
use crate::resolver::TickerValues;

/// Envelope version written by this build.
pub const SNAPSHOT_VERSION: u32 = 2;

/// The versioned export envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub version: u32,
    /// ISO-8601 timestamp with millisecond precision
    pub exported_at: String,
    pub companies: Vec<Company>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_shares_outstanding: Option<TickerValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_stock_prices: Option<TickerValues>,
}

impl ExportEnvelope {
    pub fn new(
        companies: Vec<Company>,
        manual_shares_outstanding: Option<TickerValues>,
        manual_stock_prices: Option<TickerValues>,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            companies,
            manual_shares_outstanding,
            manual_stock_prices,
        }
    }

    /// Pretty-printed JSON, two-space indented.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Legacy export: a bare array of companies.
pub fn export_legacy(companies: &[Company]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(companies)
}

/// Download file name for an export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("mnav-dashboard-{}.json", date.format("%Y-%m-%d"))
}
