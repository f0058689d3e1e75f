//! Valuation formulas.
//!
//! Every function is pure and returns `None` when the inputs are
//! insufficient. Secondary additive operands (cash, other assets, debt,
//! preferred stock) count as zero when absent; required operands propagate
//! `None`. Division by zero yields `None`, and so does any result that is
//! not finite.

use super::types::{CalculationInputs, CalculationOutputs};

#[inline]
fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Market capitalization = shares outstanding × stock price.
pub fn market_cap(shares: Option<f64>, stock_price: Option<f64>) -> Option<f64> {
    finite(shares? * stock_price?)
}

/// Bitcoin assets = BTC holdings × Bitcoin price.
pub fn bitcoin_assets(btc_holdings: Option<f64>, bitcoin_price: Option<f64>) -> Option<f64> {
    finite(btc_holdings? * bitcoin_price?)
}

/// Assets = Bitcoin assets + cash + other assets.
pub fn assets(
    bitcoin_assets: Option<f64>,
    cash: Option<f64>,
    other_assets: Option<f64>,
) -> Option<f64> {
    finite(bitcoin_assets? + cash.unwrap_or(0.0) + other_assets.unwrap_or(0.0))
}

/// Debt = long-term debt + other debt. Never absent: no debt recorded is zero.
pub fn debt(long_term_debt: Option<f64>, other_debt: Option<f64>) -> f64 {
    long_term_debt.unwrap_or(0.0) + other_debt.unwrap_or(0.0)
}

/// Enterprise value = market cap + debt + preferred stock − cash.
pub fn enterprise_value(
    market_cap: Option<f64>,
    debt: Option<f64>,
    preferred_stock: Option<f64>,
    cash: Option<f64>,
) -> Option<f64> {
    finite(
        market_cap? + debt.unwrap_or(0.0) + preferred_stock.unwrap_or(0.0) - cash.unwrap_or(0.0),
    )
}

/// mNAV = enterprise value / Bitcoin assets.
pub fn mnav(enterprise_value: Option<f64>, bitcoin_assets: Option<f64>) -> Option<f64> {
    let btc_assets = bitcoin_assets?;
    if btc_assets == 0.0 {
        return None;
    }
    finite(enterprise_value? / btc_assets)
}

/// Market cap / assets.
pub fn market_cap_to_assets(market_cap: Option<f64>, assets: Option<f64>) -> Option<f64> {
    let assets = assets?;
    if assets == 0.0 {
        return None;
    }
    finite(market_cap? / assets)
}

/// Fair stock price = ((assets − debt − preferred stock) / market cap) × stock price.
pub fn fair_stock_price(
    assets: Option<f64>,
    debt: Option<f64>,
    preferred_stock: Option<f64>,
    market_cap: Option<f64>,
    stock_price: Option<f64>,
) -> Option<f64> {
    let market_cap = market_cap?;
    if market_cap == 0.0 {
        return None;
    }
    let net = assets? - debt.unwrap_or(0.0) - preferred_stock.unwrap_or(0.0);
    finite(net / market_cap * stock_price?)
}

/// Fair BTC stock price = (Bitcoin assets − long-term debt − preferred stock) / market cap.
///
/// Only long-term debt is netted here, unlike [`fair_stock_price`].
pub fn fair_btc_stock_price(
    bitcoin_assets: Option<f64>,
    long_term_debt: Option<f64>,
    preferred_stock: Option<f64>,
    market_cap: Option<f64>,
) -> Option<f64> {
    let market_cap = market_cap?;
    if market_cap == 0.0 {
        return None;
    }
    let net = bitcoin_assets? - long_term_debt.unwrap_or(0.0) - preferred_stock.unwrap_or(0.0);
    finite(net / market_cap)
}

/// Equilibrium BTC price = Bitcoin price × (Bitcoin assets / enterprise value).
///
/// The Bitcoin price at which mNAV would be exactly 1.
pub fn equilibrium_btc_price(
    bitcoin_price: Option<f64>,
    bitcoin_assets: Option<f64>,
    enterprise_value: Option<f64>,
) -> Option<f64> {
    let ev = enterprise_value?;
    if ev == 0.0 {
        return None;
    }
    finite(bitcoin_price? * (bitcoin_assets? / ev))
}

/// Compute every metric in dependency order.
///
/// Missing upstream values propagate as `None` through all dependents.
pub fn calculate_all(inputs: &CalculationInputs) -> CalculationOutputs {
    let market_cap = market_cap(inputs.common_shares_outstanding, inputs.stock_price);
    let bitcoin_assets = bitcoin_assets(inputs.bitcoin, inputs.bitcoin_price);
    let assets = assets(bitcoin_assets, inputs.cash, inputs.other_assets);
    let debt = debt(inputs.long_term_debt, inputs.other_debt);
    let enterprise_value =
        enterprise_value(market_cap, Some(debt), inputs.preferred_stock, inputs.cash);

    CalculationOutputs {
        market_cap,
        bitcoin_assets,
        assets,
        debt,
        enterprise_value,
        mnav: mnav(enterprise_value, bitcoin_assets),
        market_cap_to_assets: market_cap_to_assets(market_cap, assets),
        fair_stock_price: fair_stock_price(
            assets,
            Some(debt),
            inputs.preferred_stock,
            market_cap,
            inputs.stock_price,
        ),
        fair_btc_stock_price: fair_btc_stock_price(
            bitcoin_assets,
            inputs.long_term_debt,
            inputs.preferred_stock,
            market_cap,
        ),
        equilibrium_btc_price: equilibrium_btc_price(
            inputs.bitcoin_price,
            bitcoin_assets,
            enterprise_value,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    fn approx(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a value");
        assert!(
            (actual - expected).abs() < 1e-6 * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }

    #[test_case(Some(1_000.0), Some(50.0), Some(50_000.0) ; "simple product")]
    #[test_case(Some(226_000_000.0), Some(400.0), Some(90_400_000_000.0) ; "large numbers")]
    #[test_case(Some(0.0), Some(50.0), Some(0.0) ; "zero shares")]
    #[test_case(None, Some(50.0), None ; "missing shares")]
    #[test_case(Some(1_000.0), None, None ; "missing price")]
    fn test_market_cap(shares: Option<f64>, price: Option<f64>, expected: Option<f64>) {
        assert_eq!(market_cap(shares, price), expected);
    }

    #[test]
    fn test_bitcoin_assets() {
        assert_eq!(bitcoin_assets(Some(100.0), Some(65_000.0)), Some(6_500_000.0));
        assert_eq!(bitcoin_assets(Some(0.5), Some(65_000.0)), Some(32_500.0));
        assert_eq!(bitcoin_assets(None, Some(65_000.0)), None);
        assert_eq!(bitcoin_assets(Some(100.0), None), None);
    }

    #[test]
    fn test_assets() {
        assert_eq!(
            assets(Some(6_500_000.0), Some(1_000_000.0), Some(500_000.0)),
            Some(8_000_000.0)
        );
        assert_eq!(assets(Some(6_500_000.0), None, None), Some(6_500_000.0));
        assert_eq!(assets(None, Some(1_000_000.0), Some(500_000.0)), None);
    }

    #[test]
    fn test_debt_is_never_absent() {
        assert_eq!(debt(None, None), 0.0);
        assert_eq!(debt(Some(1_000_000.0), None), 1_000_000.0);
        assert_eq!(debt(None, Some(500_000.0)), 500_000.0);
        assert_eq!(debt(Some(2_000_000.0), Some(500_000.0)), 2_500_000.0);
    }

    #[test]
    fn test_enterprise_value() {
        assert_eq!(
            enterprise_value(Some(50_000_000.0), Some(2_500_000.0), Some(100_000.0), Some(1_000_000.0)),
            Some(51_600_000.0)
        );
        assert_eq!(
            enterprise_value(Some(50_000_000.0), None, None, None),
            Some(50_000_000.0)
        );
        assert_eq!(enterprise_value(None, Some(1.0), Some(1.0), Some(1.0)), None);
    }

    #[test]
    fn test_mnav() {
        assert_eq!(mnav(Some(100_000_000.0), Some(50_000_000.0)), Some(2.0));
        assert_eq!(mnav(Some(40_000_000.0), Some(50_000_000.0)), Some(0.8));
        assert_eq!(mnav(None, Some(50_000_000.0)), None);
        assert_eq!(mnav(Some(100_000_000.0), None), None);
        assert_eq!(mnav(Some(100_000_000.0), Some(0.0)), None);
    }

    #[test]
    fn test_market_cap_to_assets() {
        assert_eq!(market_cap_to_assets(Some(100_000_000.0), Some(80_000_000.0)), Some(1.25));
        assert_eq!(market_cap_to_assets(None, Some(80_000_000.0)), None);
        assert_eq!(market_cap_to_assets(Some(100_000_000.0), None), None);
        assert_eq!(market_cap_to_assets(Some(100_000_000.0), Some(0.0)), None);
    }

    #[test]
    fn test_fair_stock_price() {
        // (100M - 20M - 5M) / 50M * 10 = 15
        approx(
            fair_stock_price(
                Some(100_000_000.0),
                Some(20_000_000.0),
                Some(5_000_000.0),
                Some(50_000_000.0),
                Some(10.0),
            ),
            15.0,
        );
        approx(
            fair_stock_price(Some(100_000_000.0), None, None, Some(50_000_000.0), Some(10.0)),
            20.0,
        );
        assert_eq!(
            fair_stock_price(Some(100_000_000.0), None, None, Some(0.0), Some(10.0)),
            None
        );
        assert_eq!(
            fair_stock_price(None, None, None, Some(50_000_000.0), Some(10.0)),
            None
        );
        assert_eq!(
            fair_stock_price(Some(100_000_000.0), None, None, Some(50_000_000.0), None),
            None
        );
    }

    #[test]
    fn test_fair_btc_stock_price_nets_only_long_term_debt() {
        approx(
            fair_btc_stock_price(
                Some(6_500_000.0),
                Some(2_000_000.0),
                Some(100_000.0),
                Some(50_000_000.0),
            ),
            0.088,
        );
        assert_eq!(fair_btc_stock_price(None, None, None, Some(1.0)), None);
        assert_eq!(fair_btc_stock_price(Some(1.0), None, None, Some(0.0)), None);
    }

    #[test]
    fn test_equilibrium_btc_price() {
        approx(
            equilibrium_btc_price(Some(65_000.0), Some(6_500_000.0), Some(13_000_000.0)),
            32_500.0,
        );
        // mNAV of exactly 1 means the equilibrium is today's price
        approx(
            equilibrium_btc_price(Some(65_000.0), Some(6_500_000.0), Some(6_500_000.0)),
            65_000.0,
        );
        assert_eq!(
            equilibrium_btc_price(Some(65_000.0), Some(6_500_000.0), Some(0.0)),
            None
        );
        assert_eq!(equilibrium_btc_price(None, Some(1.0), Some(1.0)), None);
    }

    #[test]
    fn test_calculate_all_reference_company() {
        let inputs = CalculationInputs {
            common_shares_outstanding: Some(1_000_000.0),
            bitcoin: Some(100.0),
            cash: Some(1_000_000.0),
            other_assets: Some(500_000.0),
            long_term_debt: Some(2_000_000.0),
            other_debt: Some(500_000.0),
            preferred_stock: Some(100_000.0),
            stock_price: Some(50.0),
            bitcoin_price: Some(65_000.0),
        };

        let out = calculate_all(&inputs);
        assert_eq!(out.market_cap, Some(50_000_000.0));
        assert_eq!(out.bitcoin_assets, Some(6_500_000.0));
        assert_eq!(out.assets, Some(8_000_000.0));
        assert_eq!(out.debt, 2_500_000.0);
        assert_eq!(out.enterprise_value, Some(51_600_000.0));
        approx(out.mnav, 7.938_461_538);
        approx(out.market_cap_to_assets, 6.25);
        // (8M - 2.5M - 0.1M) / 50M * 50 = 5.4
        approx(out.fair_stock_price, 5.4);
        approx(out.fair_btc_stock_price, 0.088);
        approx(out.equilibrium_btc_price, 65_000.0 * 6_500_000.0 / 51_600_000.0);
    }

    #[test]
    fn test_calculate_all_without_bitcoin() {
        let inputs = CalculationInputs {
            common_shares_outstanding: Some(1_000_000.0),
            bitcoin: Some(0.0),
            stock_price: Some(50.0),
            bitcoin_price: Some(65_000.0),
            ..Default::default()
        };

        let out = calculate_all(&inputs);
        assert_eq!(out.bitcoin_assets, Some(0.0));
        assert_eq!(out.mnav, None);
        assert_eq!(out.assets, Some(0.0));
        assert_eq!(out.market_cap_to_assets, None);
        assert_eq!(out.equilibrium_btc_price, Some(0.0));
    }

    #[test]
    fn test_calculate_all_with_nothing() {
        let out = calculate_all(&CalculationInputs::default());
        assert_eq!(
            out,
            CalculationOutputs {
                debt: 0.0,
                ..CalculationOutputs::empty()
            }
        );
    }

    #[test]
    fn test_overflow_is_absent_not_infinite() {
        assert_eq!(market_cap(Some(f64::MAX), Some(10.0)), None);
    }

    fn maybe_value() -> impl Strategy<Value = Option<f64>> {
        prop::option::of(0.0f64..1e12)
    }

    proptest! {
        #[test]
        fn prop_products_absent_iff_operand_absent(a in maybe_value(), b in maybe_value()) {
            let either_missing = a.is_none() || b.is_none();
            prop_assert_eq!(market_cap(a, b).is_none(), either_missing);
            prop_assert_eq!(bitcoin_assets(a, b).is_none(), either_missing);
            if let (Some(x), Some(y)) = (a, b) {
                prop_assert_eq!(market_cap(a, b), Some(x * y));
            }
        }

        #[test]
        fn prop_mnav_guards_zero(ev in maybe_value()) {
            prop_assert_eq!(mnav(ev, Some(0.0)), None);
            prop_assert_eq!(mnav(None, Some(1.0)), None);
        }

        #[test]
        fn prop_outputs_are_finite(
            shares in maybe_value(),
            btc in maybe_value(),
            cash in maybe_value(),
            price in maybe_value(),
            btc_price in maybe_value(),
        ) {
            let out = calculate_all(&CalculationInputs {
                common_shares_outstanding: shares,
                bitcoin: btc,
                cash,
                stock_price: price,
                bitcoin_price: btc_price,
                ..Default::default()
            });
            for value in out.metric_values().into_iter().flatten() {
                prop_assert!(value.is_finite());
            }
        }
    }
}
