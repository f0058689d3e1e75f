//! Valuation input and output types.

use mnav_common::config::MnavBands;
use serde::{Deserialize, Serialize};

// ============================================================================
// Inputs
// ============================================================================

/// Everything the formula engine needs for one company.
///
/// `None` always means "unknown", never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInputs {
    pub common_shares_outstanding: Option<f64>,
    /// BTC held
    pub bitcoin: Option<f64>,
    pub cash: Option<f64>,
    pub other_assets: Option<f64>,
    pub long_term_debt: Option<f64>,
    pub other_debt: Option<f64>,
    pub preferred_stock: Option<f64>,
    /// Resolved stock price (USD)
    pub stock_price: Option<f64>,
    /// Resolved Bitcoin price (USD/BTC)
    pub bitcoin_price: Option<f64>,
}

// ============================================================================
// Outputs
// ============================================================================

/// Derived metrics for one company.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationOutputs {
    pub market_cap: Option<f64>,
    pub bitcoin_assets: Option<f64>,
    pub assets: Option<f64>,
    /// Long-term plus other debt; zero when neither is known
    pub debt: f64,
    pub enterprise_value: Option<f64>,
    #[serde(rename = "mNAV")]
    pub mnav: Option<f64>,
    pub market_cap_to_assets: Option<f64>,
    pub fair_stock_price: Option<f64>,
    #[serde(rename = "fairBTCStockPrice")]
    pub fair_btc_stock_price: Option<f64>,
    #[serde(rename = "equilibriumBTCPrice")]
    pub equilibrium_btc_price: Option<f64>,
}

impl CalculationOutputs {
    /// Outputs with every nullable metric absent and zero debt.
    pub const fn empty() -> Self {
        Self {
            market_cap: None,
            bitcoin_assets: None,
            assets: None,
            debt: 0.0,
            enterprise_value: None,
            mnav: None,
            market_cap_to_assets: None,
            fair_stock_price: None,
            fair_btc_stock_price: None,
            equilibrium_btc_price: None,
        }
    }

    /// All metrics in dependency order, debt included as a present value.
    pub fn metric_values(&self) -> [Option<f64>; 10] {
        [
            self.market_cap,
            self.bitcoin_assets,
            self.assets,
            Some(self.debt),
            self.enterprise_value,
            self.mnav,
            self.market_cap_to_assets,
            self.fair_stock_price,
            self.fair_btc_stock_price,
            self.equilibrium_btc_price,
        ]
    }
}

// ============================================================================
// mNAV Band
// ============================================================================

/// Where a company's mNAV sits relative to its Bitcoin holdings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MnavBand {
    /// Enterprise value below Bitcoin assets
    Discount,
    /// Small premium
    Moderate,
    /// Large premium
    Premium,
}

impl MnavBand {
    /// Classify an mNAV against the configured thresholds.
    pub fn classify(mnav: Option<f64>, bands: &MnavBands) -> Option<Self> {
        let mnav = mnav?;
        Some(if mnav < bands.discount_below {
            Self::Discount
        } else if mnav <= bands.premium_above {
            Self::Moderate
        } else {
            Self::Premium
        })
    }
}

impl std::fmt::Display for MnavBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discount => write!(f, "discount"),
            Self::Moderate => write!(f, "moderate"),
            Self::Premium => write!(f, "premium"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        let bands = MnavBands::default();
        assert_eq!(MnavBand::classify(None, &bands), None);
        assert_eq!(MnavBand::classify(Some(0.8), &bands), Some(MnavBand::Discount));
        assert_eq!(MnavBand::classify(Some(1.0), &bands), Some(MnavBand::Moderate));
        assert_eq!(MnavBand::classify(Some(1.5), &bands), Some(MnavBand::Moderate));
        assert_eq!(MnavBand::classify(Some(1.51), &bands), Some(MnavBand::Premium));
    }

    #[test]
    fn test_outputs_wire_names() {
        let json = serde_json::to_value(CalculationOutputs::empty()).unwrap();
        assert!(json.get("mNAV").is_some());
        assert!(json.get("fairBTCStockPrice").is_some());
        assert!(json.get("equilibriumBTCPrice").is_some());
        assert_eq!(json["debt"], serde_json::json!(0.0));
        assert!(json["marketCap"].is_null());
    }
}
