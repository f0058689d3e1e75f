//! Company record model.
//!
//! A [`Company`] holds the manually maintained balance-sheet fields for one
//! Digital Asset Treasury company. Its `ticker` joins it to the live price
//! and shares feeds.

use mnav_common::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::valuation::CalculationInputs;

/// One tracked company, exactly as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub ticker: String,
    pub common_shares_outstanding: Option<f64>,
    /// BTC held
    pub bitcoin: Option<f64>,
    pub cash: Option<f64>,
    pub other_assets: Option<f64>,
    pub long_term_debt: Option<f64>,
    pub other_debt: Option<f64>,
    pub preferred_stock: Option<f64>,
}

impl Company {
    /// Create a company with every balance-sheet field unknown.
    pub fn new(id: impl Into<String>, name: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ticker: ticker.into(),
            common_shares_outstanding: None,
            bitcoin: None,
            cash: None,
            other_assets: None,
            long_term_debt: None,
            other_debt: None,
            preferred_stock: None,
        }
    }

    /// Read one balance-sheet field.
    pub fn get(&self, field: BalanceSheetField) -> Option<f64> {
        match field {
            BalanceSheetField::CommonSharesOutstanding => self.common_shares_outstanding,
            BalanceSheetField::Bitcoin => self.bitcoin,
            BalanceSheetField::Cash => self.cash,
            BalanceSheetField::OtherAssets => self.other_assets,
            BalanceSheetField::LongTermDebt => self.long_term_debt,
            BalanceSheetField::OtherDebt => self.other_debt,
            BalanceSheetField::PreferredStock => self.preferred_stock,
        }
    }

    pub(crate) fn field_mut(&mut self, field: BalanceSheetField) -> &mut Option<f64> {
        match field {
            BalanceSheetField::CommonSharesOutstanding => &mut self.common_shares_outstanding,
            BalanceSheetField::Bitcoin => &mut self.bitcoin,
            BalanceSheetField::Cash => &mut self.cash,
            BalanceSheetField::OtherAssets => &mut self.other_assets,
            BalanceSheetField::LongTermDebt => &mut self.long_term_debt,
            BalanceSheetField::OtherDebt => &mut self.other_debt,
            BalanceSheetField::PreferredStock => &mut self.preferred_stock,
        }
    }

    /// Write one balance-sheet field. Non-finite values are rejected.
    pub fn set(&mut self, field: BalanceSheetField, value: Option<f64>) -> Result<()> {
        if let Some(v) = value {
            if !v.is_finite() {
                return Err(Error::InvalidInput(format!(
                    "{} must be a finite number, got {v}",
                    field.wire_name()
                )));
            }
        }
        *self.field_mut(field) = value;
        Ok(())
    }

    /// Formula inputs for this company given resolved market values.
    pub fn calculation_inputs(
        &self,
        shares_outstanding: Option<f64>,
        stock_price: Option<f64>,
        bitcoin_price: Option<f64>,
    ) -> CalculationInputs {
        CalculationInputs {
            common_shares_outstanding: shares_outstanding,
            bitcoin: self.bitcoin,
            cash: self.cash,
            other_assets: self.other_assets,
            long_term_debt: self.long_term_debt,
            other_debt: self.other_debt,
            preferred_stock: self.preferred_stock,
            stock_price,
            bitcoin_price,
        }
    }
}

/// The seven nullable balance-sheet fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BalanceSheetField {
    CommonSharesOutstanding,
    Bitcoin,
    Cash,
    OtherAssets,
    LongTermDebt,
    OtherDebt,
    PreferredStock,
}

impl BalanceSheetField {
    pub const ALL: [Self; 7] = [
        Self::CommonSharesOutstanding,
        Self::Bitcoin,
        Self::Cash,
        Self::OtherAssets,
        Self::LongTermDebt,
        Self::OtherDebt,
        Self::PreferredStock,
    ];

    /// Field name in the JSON snapshot format.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::CommonSharesOutstanding => "commonSharesOutstanding",
            Self::Bitcoin => "bitcoin",
            Self::Cash => "cash",
            Self::OtherAssets => "otherAssets",
            Self::LongTermDebt => "longTermDebt",
            Self::OtherDebt => "otherDebt",
            Self::PreferredStock => "preferredStock",
        }
    }
}

impl std::fmt::Display for BalanceSheetField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A single-field edit to a company.
#[derive(Debug, Clone, PartialEq)]
pub enum CompanyUpdate {
    Name(String),
    Ticker(String),
    Field(BalanceSheetField, Option<f64>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_company_is_all_unknown() {
        let company = Company::new("1", "Strategy", "MSTR");
        for field in BalanceSheetField::ALL {
            assert_eq!(company.get(field), None);
        }
    }

    #[test]
    fn test_set_and_get_each_field() {
        let mut company = Company::new("1", "Strategy", "MSTR");
        for (i, field) in BalanceSheetField::ALL.into_iter().enumerate() {
            company.set(field, Some(i as f64 + 1.0)).unwrap();
        }
        for (i, field) in BalanceSheetField::ALL.into_iter().enumerate() {
            assert_eq!(company.get(field), Some(i as f64 + 1.0));
        }

        company.set(BalanceSheetField::Cash, None).unwrap();
        assert_eq!(company.cash, None);
    }

    #[test]
    fn test_set_rejects_non_finite() {
        let mut company = Company::new("1", "Strategy", "MSTR");
        let err = company
            .set(BalanceSheetField::Bitcoin, Some(f64::NAN))
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert!(company
            .set(BalanceSheetField::Cash, Some(f64::INFINITY))
            .is_err());
        assert_eq!(company.bitcoin, None);
    }

    #[test]
    fn test_wire_names_match_serde() {
        let json = serde_json::to_value(Company::new("1", "Strategy", "MSTR")).unwrap();
        for field in BalanceSheetField::ALL {
            assert!(json.get(field.wire_name()).is_some(), "missing {field}");
            assert!(json[field.wire_name()].is_null());
        }
    }

    #[test]
    fn test_calculation_inputs_use_resolved_values() {
        let mut company = Company::new("1", "Strategy", "MSTR");
        company.bitcoin = Some(100.0);
        company.common_shares_outstanding = Some(1.0);

        let inputs = company.calculation_inputs(Some(2_000.0), Some(50.0), Some(65_000.0));
        assert_eq!(inputs.common_shares_outstanding, Some(2_000.0));
        assert_eq!(inputs.bitcoin, Some(100.0));
        assert_eq!(inputs.stock_price, Some(50.0));
        assert_eq!(inputs.bitcoin_price, Some(65_000.0));
    }
}
