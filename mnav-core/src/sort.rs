//! Column sorting for the calculated company table.

use mnav_common::Error;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::state::CompanyWithCalculations;

/// A sortable column of [`CompanyWithCalculations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Name,
    Ticker,
    StockPrice,
    SharesOutstanding,
    Bitcoin,
    Cash,
    OtherAssets,
    LongTermDebt,
    OtherDebt,
    PreferredStock,
    MarketCap,
    BitcoinAssets,
    Assets,
    Debt,
    EnterpriseValue,
    #[serde(rename = "mNAV")]
    Mnav,
    MarketCapToAssets,
    FairStockPrice,
    #[serde(rename = "fairBTCStockPrice")]
    FairBtcStockPrice,
    #[serde(rename = "equilibriumBTCPrice")]
    EquilibriumBtcPrice,
}

impl SortKey {
    pub const ALL: [Self; 20] = [
        Self::Name,
        Self::Ticker,
        Self::StockPrice,
        Self::SharesOutstanding,
        Self::Bitcoin,
        Self::Cash,
        Self::OtherAssets,
        Self::LongTermDebt,
        Self::OtherDebt,
        Self::PreferredStock,
        Self::MarketCap,
        Self::BitcoinAssets,
        Self::Assets,
        Self::Debt,
        Self::EnterpriseValue,
        Self::Mnav,
        Self::MarketCapToAssets,
        Self::FairStockPrice,
        Self::FairBtcStockPrice,
        Self::EquilibriumBtcPrice,
    ];

    /// Column name as serialized.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Ticker => "ticker",
            Self::StockPrice => "stockPrice",
            Self::SharesOutstanding => "sharesOutstanding",
            Self::Bitcoin => "bitcoin",
            Self::Cash => "cash",
            Self::OtherAssets => "otherAssets",
            Self::LongTermDebt => "longTermDebt",
            Self::OtherDebt => "otherDebt",
            Self::PreferredStock => "preferredStock",
            Self::MarketCap => "marketCap",
            Self::BitcoinAssets => "bitcoinAssets",
            Self::Assets => "assets",
            Self::Debt => "debt",
            Self::EnterpriseValue => "enterpriseValue",
            Self::Mnav => "mNAV",
            Self::MarketCapToAssets => "marketCapToAssets",
            Self::FairStockPrice => "fairStockPrice",
            Self::FairBtcStockPrice => "fairBTCStockPrice",
            Self::EquilibriumBtcPrice => "equilibriumBTCPrice",
        }
    }

    fn value(self, row: &CompanyWithCalculations) -> SortValue<'_> {
        let m = &row.metrics;
        let c = &row.company;
        SortValue::Number(match self {
            Self::Name => return SortValue::Text(&c.name),
            Self::Ticker => return SortValue::Text(&c.ticker),
            Self::StockPrice => row.stock_price,
            Self::SharesOutstanding => row.shares_outstanding,
            Self::Bitcoin => c.bitcoin,
            Self::Cash => c.cash,
            Self::OtherAssets => c.other_assets,
            Self::LongTermDebt => c.long_term_debt,
            Self::OtherDebt => c.other_debt,
            Self::PreferredStock => c.preferred_stock,
            Self::MarketCap => m.market_cap,
            Self::BitcoinAssets => m.bitcoin_assets,
            Self::Assets => m.assets,
            Self::Debt => Some(m.debt),
            Self::EnterpriseValue => m.enterprise_value,
            Self::Mnav => m.mnav,
            Self::MarketCapToAssets => m.market_cap_to_assets,
            Self::FairStockPrice => m.fair_stock_price,
            Self::FairBtcStockPrice => m.fair_btc_stock_price,
            Self::EquilibriumBtcPrice => m.equilibrium_btc_price,
        })
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    /// Accepts the column name in any case, with or without `-`/`_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.wire_name().to_lowercase() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown sort column: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

/// Current table sort. Both fields `None` means unsorted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: Option<SortKey>,
    pub direction: Option<SortDirection>,
}

impl SortConfig {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction: Some(direction),
        }
    }

    pub fn is_active(&self) -> bool {
        self.key.is_some() && self.direction.is_some()
    }

    /// Header click: a new column sorts ascending; the same column cycles
    /// ascending, descending, unsorted.
    pub fn toggle(&mut self, key: SortKey) {
        *self = match (self.key, self.direction) {
            (Some(k), Some(SortDirection::Ascending)) if k == key => {
                Self::new(key, SortDirection::Descending)
            }
            (Some(k), Some(SortDirection::Descending)) if k == key => Self::default(),
            _ => Self::new(key, SortDirection::Ascending),
        };
    }

    /// Sort rows in place. Stable; nulls go last in both directions.
    pub fn apply(&self, rows: &mut [CompanyWithCalculations]) {
        let (Some(key), Some(direction)) = (self.key, self.direction) else {
            return;
        };
        rows.sort_by(|a, b| compare(key.value(a), key.value(b), direction));
    }
}

enum SortValue<'a> {
    Text(&'a str),
    Number(Option<f64>),
}

fn compare(a: SortValue<'_>, b: SortValue<'_>, direction: SortDirection) -> Ordering {
    let ordered = match (a, b) {
        (SortValue::Number(None), SortValue::Number(None)) => return Ordering::Equal,
        (SortValue::Number(None), _) => return Ordering::Greater,
        (_, SortValue::Number(None)) => return Ordering::Less,
        (SortValue::Number(Some(a)), SortValue::Number(Some(b))) => a.total_cmp(&b),
        (SortValue::Text(a), SortValue::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
        // a key always yields the same variant
        (SortValue::Text(_), _) | (_, SortValue::Text(_)) => Ordering::Equal,
    };
    match direction {
        SortDirection::Ascending => ordered,
        SortDirection::Descending => ordered.reverse(),
    }
}
