//! Valuation Formula Engine.
//!
//! Turns a company's balance-sheet fields plus resolved market prices into
//! the dashboard metrics:
//!
//! 1. **Market cap** and **Bitcoin assets** from shares × price and BTC × BTC price
//! 2. **Assets**, **debt** and **enterprise value** from the balance sheet
//! 3. **mNAV** (EV / Bitcoin assets), **market cap / assets**, **fair stock
//!    price**, **fair BTC stock price** and **equilibrium BTC price**
//!
//! Missing data is never an error: it propagates as `None` through every
//! dependent metric.
//!
//! # Usage
//!
//! ```
//! use mnav_core::valuation::{calculate_all, CalculationInputs};
//!
//! let out = calculate_all(&CalculationInputs {
//!     common_shares_outstanding: Some(1_000_000.0),
//!     bitcoin: Some(100.0),
//!     stock_price: Some(50.0),
//!     bitcoin_price: Some(65_000.0),
//!     ..Default::default()
//! });
//!
//! assert_eq!(out.market_cap, Some(50_000_000.0));
//! assert_eq!(out.bitcoin_assets, Some(6_500_000.0));
//! ```

pub mod formulas;
pub mod types;

pub use formulas::{
    assets, bitcoin_assets, calculate_all, debt, enterprise_value, equilibrium_btc_price,
    fair_btc_stock_price, fair_stock_price, market_cap, market_cap_to_assets, mnav,
};
pub use types::{CalculationInputs, CalculationOutputs, MnavBand};
