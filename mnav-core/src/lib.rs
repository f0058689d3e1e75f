//! mNAV Dashboard Core
//!
//! Valuation engine for Digital Asset Treasury (DAT) companies: public
//! companies that hold Bitcoin on their balance sheet.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐
//! │ Company      │   │ Live feeds   │  BTC price, stock prices,
//! │ records      │   │ + overrides  │  shares outstanding
//! └──────┬───────┘   └──────┬───────┘
//!        │                  ▼
//!        │          ┌──────────────┐
//!        │          │  Resolver    │  manual > error > loading > api
//!        │          └──────┬───────┘
//!        ▼                 ▼
//! ┌─────────────────────────────────┐
//! │        Formula Engine           │  market cap, EV, mNAV, fair prices
//! └────────────────┬────────────────┘
//!                  ▼
//!        CompanyWithCalculations
//! ```
//!
//! Snapshot import/export sits alongside, converting company records and
//! manual overrides to and from JSON.
//!
//! # Key Concepts
//!
//! ## mNAV
//! Enterprise value divided by the market value of Bitcoin held. Below 1.0
//! the market values the company at less than its Bitcoin.
//!
//! ## Provenance
//! Every displayed stock price and share count reports where it came from:
//! a manual override, the live API, a failed fetch (keeping the last good
//! value) or a fetch still in flight.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod company;
pub mod feed;
pub mod input;
pub mod resolver;
pub mod seed;
pub mod snapshot;
pub mod sort;
pub mod state;
pub mod valuation;

pub use company::{BalanceSheetField, Company, CompanyUpdate};
pub use feed::{FeedEvent, FeedKind, LiveFeed, LiveQuote};
pub use resolver::{ApiStatus, FieldValue, Provenance, TickerValues};
pub use seed::initial_companies;
pub use snapshot::{
    get_new_tickers, parse_import, read_snapshot_file, validate_import, write_snapshot_file,
    ExportEnvelope, ImportError, ImportedData, SnapshotFormat,
};
pub use sort::{SortConfig, SortDirection, SortKey};
pub use state::{CompanyWithCalculations, Dashboard};
pub use valuation::{calculate_all, CalculationInputs, CalculationOutputs, MnavBand};
