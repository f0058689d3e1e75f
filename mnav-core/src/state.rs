//! Dashboard state container.
//!
//! [`Dashboard`] owns everything the dashboard knows: the company records,
//! the three live feeds (Bitcoin price, stock prices, shares outstanding)
//! with their manual overrides, and the table sort. It is created once by
//! the application root and handed to whoever needs it; nothing here is
//! global.
//!
//! Calculated rows are never stored. [`Dashboard::companies_with_calculations`]
//! rebuilds them from the current inputs on every call.

use chrono::{DateTime, Utc};
use mnav_common::{Error, MnavBands, Result};
use serde::Serialize;
use std::collections::HashSet;

use crate::company::{Company, CompanyUpdate};
use crate::feed::{FeedEvent, FeedKind, LiveFeed, LiveQuote};
use crate::resolver::Provenance;
use crate::seed::initial_companies;
use crate::snapshot::{get_new_tickers, ExportEnvelope, ImportedData};
use crate::sort::SortConfig;
use crate::valuation::{calculate_all, CalculationOutputs, MnavBand};

/// A company row with its resolved market values and derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyWithCalculations {
    #[serde(flatten)]
    pub company: Company,
    pub stock_price: Option<f64>,
    pub stock_price_source: Provenance,
    /// Effective shares used for market cap
    pub shares_outstanding: Option<f64>,
    pub shares_source: Provenance,
    #[serde(flatten)]
    pub metrics: CalculationOutputs,
    pub mnav_band: Option<MnavBand>,
}

/// The dashboard's single source of truth.
#[derive(Debug, Clone)]
pub struct Dashboard {
    companies: Vec<Company>,
    bitcoin: LiveQuote,
    stock_prices: LiveFeed,
    shares_outstanding: LiveFeed,
    sort: SortConfig,
    bands: MnavBands,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::with_seed(MnavBands::default())
    }
}

impl Dashboard {
    pub fn new(companies: Vec<Company>, bands: MnavBands) -> Self {
        Self {
            companies,
            bitcoin: LiveQuote::default(),
            stock_prices: LiveFeed::new(),
            shares_outstanding: LiveFeed::new(),
            sort: SortConfig::default(),
            bands,
        }
    }

    /// Start from the built-in company list.
    pub fn with_seed(bands: MnavBands) -> Self {
        Self::new(initial_companies(), bands)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn company(&self, id: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }

    pub fn bitcoin(&self) -> &LiveQuote {
        &self.bitcoin
    }

    pub fn bitcoin_price(&self) -> Option<f64> {
        self.bitcoin.value()
    }

    pub fn stock_prices(&self) -> &LiveFeed {
        &self.stock_prices
    }

    pub fn shares_outstanding(&self) -> &LiveFeed {
        &self.shares_outstanding
    }

    pub fn sort_config(&self) -> SortConfig {
        self.sort
    }

    pub fn set_sort_config(&mut self, sort: SortConfig) {
        self.sort = sort;
    }

    pub fn bands(&self) -> &MnavBands {
        &self.bands
    }

    // ========================================================================
    // Company edits
    // ========================================================================

    /// Apply a single-field edit to the company with `id`.
    pub fn update_company(&mut self, id: &str, update: CompanyUpdate) -> Result<()> {
        if let CompanyUpdate::Ticker(ticker) = &update {
            self.check_ticker_free(ticker, Some(id))?;
        }

        let company = self
            .companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(format!("company {id}")))?;

        match update {
            CompanyUpdate::Name(name) => company.name = name,
            CompanyUpdate::Ticker(ticker) => company.ticker = ticker,
            CompanyUpdate::Field(field, value) => company.set(field, value)?,
        }
        Ok(())
    }

    /// Add a blank company under a fresh id and return the id.
    pub fn add_company(&mut self, name: &str, ticker: &str) -> Result<String> {
        self.check_ticker_free(ticker, None)?;

        let id = uuid::Uuid::new_v4().to_string();
        self.companies.push(Company::new(id.clone(), name, ticker));
        tracing::info!(id = %id, ticker = %ticker, "Company added");
        Ok(id)
    }

    fn check_ticker_free(&self, ticker: &str, except_id: Option<&str>) -> Result<()> {
        if ticker.trim().is_empty() {
            return Err(Error::InvalidInput("ticker must not be empty".into()));
        }
        let taken = self
            .companies
            .iter()
            .any(|c| c.ticker == ticker && Some(c.id.as_str()) != except_id);
        if taken {
            return Err(Error::InvalidInput(format!(
                "ticker {ticker} is already in use"
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Live feeds
    // ========================================================================

    /// Fold a fetcher event into the feeds.
    ///
    /// Returns `false` when the event carried a malformed value and was
    /// dropped. A malformed shares value counts as a failed fetch.
    pub fn apply(&mut self, event: FeedEvent, at: DateTime<Utc>) -> bool {
        match event {
            FeedEvent::BitcoinPrice { price } => {
                if !is_valid_market_value(price) {
                    tracing::warn!(price, "Discarding malformed Bitcoin price");
                    return false;
                }
                self.bitcoin.record(price, at);
            }
            FeedEvent::StockPrice { ticker, price } => {
                if !is_valid_market_value(price) {
                    tracing::warn!(ticker = %ticker, price, "Discarding malformed stock price");
                    return false;
                }
                self.stock_prices.record(&ticker, price, at);
            }
            FeedEvent::SharesOutstanding { ticker, shares } => {
                if !is_valid_market_value(shares) {
                    tracing::warn!(ticker = %ticker, shares, "Discarding malformed shares outstanding");
                    self.shares_outstanding.mark_failed(&ticker);
                    return false;
                }
                self.shares_outstanding.record(&ticker, shares, at);
            }
            FeedEvent::SharesFetchFailed { ticker } => {
                tracing::debug!(ticker = %ticker, "Shares outstanding fetch failed");
                self.shares_outstanding.mark_failed(&ticker);
            }
            FeedEvent::Status { feed, status } => match feed {
                FeedKind::Bitcoin => self.bitcoin.set_status(status),
                FeedKind::StockPrices => self.stock_prices.set_status(status),
                FeedKind::SharesOutstanding => self.shares_outstanding.set_status(status),
            },
        }
        true
    }

    pub fn set_manual_bitcoin_price(&mut self, price: Option<f64>) -> Result<()> {
        self.bitcoin.set_manual(price).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected manual Bitcoin price");
        })
    }

    /// Set or clear (with `None`) a manual stock price.
    pub fn set_manual_stock_price(&mut self, ticker: &str, price: Option<f64>) -> Result<()> {
        self.stock_prices.set_manual(ticker, price).inspect_err(|e| {
            tracing::warn!(ticker = %ticker, error = %e, "Rejected manual stock price");
        })
    }

    /// Set or clear (with `None`) a manual shares count.
    pub fn set_manual_shares(&mut self, ticker: &str, shares: Option<f64>) -> Result<()> {
        self.shares_outstanding.set_manual(ticker, shares).inspect_err(|e| {
            tracing::warn!(ticker = %ticker, error = %e, "Rejected manual shares outstanding");
        })
    }

    /// Drop a ticker's shares failure flag before a retry.
    pub fn retry_shares(&mut self, ticker: &str) {
        self.shares_outstanding.clear_error(ticker);
    }

    // ========================================================================
    // Import / export / reset
    // ========================================================================

    /// Replace the company list with an import. Override maps are replaced
    /// only when the import carries them.
    ///
    /// Returns the tickers whose shares outstanding should be fetched now.
    pub fn import(&mut self, data: ImportedData) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        if let Some(dup) = data.companies.iter().find(|c| !seen.insert(c.ticker.as_str())) {
            return Err(Error::InvalidInput(format!(
                "import lists ticker {} more than once",
                dup.ticker
            )));
        }

        let new_tickers = get_new_tickers(
            &data.companies,
            &self.companies,
            &self.shares_outstanding.api_values(),
        );

        let mut shares = self.shares_outstanding.clone();
        let mut prices = self.stock_prices.clone();
        if let Some(values) = &data.manual_shares_outstanding {
            shares.replace_manual(values)?;
        }
        if let Some(values) = &data.manual_stock_prices {
            prices.replace_manual(values)?;
        }

        tracing::info!(
            format = ?data.format,
            companies = data.companies.len(),
            new_tickers = new_tickers.len(),
            "Imported companies"
        );
        self.companies = data.companies;
        self.shares_outstanding = shares;
        self.stock_prices = prices;
        Ok(new_tickers)
    }

    /// Current state as a versioned envelope.
    pub fn export(&self, at: DateTime<Utc>) -> ExportEnvelope {
        tracing::info!(companies = self.companies.len(), "Exporting companies");
        ExportEnvelope::new(
            self.companies.clone(),
            Some(self.shares_outstanding.manual_values()),
            Some(self.stock_prices.manual_values()),
            at,
        )
    }

    /// Back to the seed list. Stock and shares feeds are emptied along with
    /// their overrides; the Bitcoin price is kept.
    pub fn reset_to_defaults(&mut self) {
        self.companies = initial_companies();
        self.stock_prices.clear();
        self.shares_outstanding.clear();
        self.sort = SortConfig::default();
        tracing::info!("Dashboard reset to defaults");
    }

    // ========================================================================
    // Projection
    // ========================================================================

    /// Effective shares: manual override, then fetched value, then the
    /// company's own figure. The record is hand-maintained, so a value taken
    /// from it reports `manual`.
    fn effective_shares(&self, company: &Company) -> (Option<f64>, Provenance) {
        let field = self.shares_outstanding.field(&company.ticker);
        match (field.value(), company.common_shares_outstanding) {
            (None, Some(shares)) => (Some(shares), Provenance::Manual),
            (shares, _) => (shares, field.provenance()),
        }
    }

    /// Every company with resolved inputs and derived metrics, in the
    /// current sort order.
    pub fn companies_with_calculations(&self) -> Vec<CompanyWithCalculations> {
        let bitcoin_price = self.bitcoin_price();

        let mut rows: Vec<_> = self
            .companies
            .iter()
            .map(|company| {
                let price = self.stock_prices.field(&company.ticker);
                let (shares, shares_source) = self.effective_shares(company);
                let inputs = company.calculation_inputs(shares, price.value(), bitcoin_price);
                let metrics = calculate_all(&inputs);

                CompanyWithCalculations {
                    company: company.clone(),
                    stock_price: price.value(),
                    stock_price_source: price.provenance(),
                    shares_outstanding: shares,
                    shares_source,
                    mnav_band: MnavBand::classify(metrics.mnav, &self.bands),
                    metrics,
                }
            })
            .collect();

        self.sort.apply(&mut rows);
        tracing::debug!(rows = rows.len(), "Recomputed company metrics");
        rows
    }
}

fn is_valid_market_value(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
