//! Parsing user-typed numbers and formatting values for display.

/// Shown wherever a value is unknown.
pub const NO_VALUE: &str = "—";

/// Parse a numeric cell. Commas and `$` are ignored; blank or unparsable
/// input yields `None`.
pub fn parse_numeric_input(input: &str) -> Option<f64> {
    let cleaned: String = input.chars().filter(|c| *c != ',' && *c != '$').collect();
    parse_finite(cleaned.trim())
}

/// Parse a shares-outstanding entry such as `1.5B`, `250m` or `12,345`.
pub fn parse_shares_input(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == NO_VALUE {
        return None;
    }

    let cleaned = trimmed.replace(',', "").to_uppercase();
    let (number, multiplier) = match cleaned.chars().last() {
        Some('B') => (&cleaned[..cleaned.len() - 1], 1e9),
        Some('M') => (&cleaned[..cleaned.len() - 1], 1e6),
        Some('K') => (&cleaned[..cleaned.len() - 1], 1e3),
        _ => (cleaned.as_str(), 1.0),
    };
    parse_finite(number.trim())
        .map(|n| n * multiplier)
        .filter(|n| n.is_finite())
}

/// Empty input is a valid reset; anything else must be a positive count.
pub fn validate_shares_input(input: &str) -> bool {
    if input.trim().is_empty() {
        return true;
    }
    parse_shares_input(input).is_some_and(|n| n > 0.0)
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `1.50B`, `250.00M`, `50.00K`, or the plain number below one thousand.
pub fn format_shares_outstanding(shares: Option<f64>) -> String {
    let Some(shares) = shares else {
        return NO_VALUE.to_string();
    };
    if shares >= 1e9 {
        format!("{:.2}B", shares / 1e9)
    } else if shares >= 1e6 {
        format!("{:.2}M", shares / 1e6)
    } else if shares >= 1e3 {
        format!("{:.2}K", shares / 1e3)
    } else {
        format!("{shares}")
    }
}

/// Whole dollars with thousands separators, e.g. `$1,234,568`.
pub fn format_usd(value: Option<f64>) -> String {
    value.map_or_else(|| NO_VALUE.to_string(), |v| with_sign(v, |a| group(a, 0)))
}

/// Dollars and cents, e.g. `$400.25`.
pub fn format_usd_price(value: Option<f64>) -> String {
    value.map_or_else(|| NO_VALUE.to_string(), |v| with_sign(v, |a| group(a, 2)))
}

pub fn format_ratio(value: Option<f64>) -> String {
    value.map_or_else(|| NO_VALUE.to_string(), |v| format!("{v:.2}"))
}

pub fn format_btc(value: Option<f64>) -> String {
    value.map_or_else(|| NO_VALUE.to_string(), |v| {
        let s = group(v.abs(), 2);
        if v < 0.0 {
            format!("-{s}")
        } else {
            s
        }
    })
}

fn with_sign(v: f64, body: impl Fn(f64) -> String) -> String {
    if v < 0.0 {
        format!("-${}", body(v.abs()))
    } else {
        format!("${}", body(v))
    }
}

/// Fixed decimals with `,` between thousands groups. `v` is non-negative.
fn group(v: f64, decimals: usize) -> String {
    let fixed = format!("{v:.decimals$}");
    let (int, frac) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("1,234.5", Some(1234.5) ; "commas")]
    #[test_case("$400.25", Some(400.25) ; "dollar sign")]
    #[test_case(" $1,000 ", Some(1000.0) ; "padded")]
    #[test_case("-5", Some(-5.0) ; "negative")]
    #[test_case("", None ; "empty")]
    #[test_case("   ", None ; "blank")]
    #[test_case("abc", None ; "garbage")]
    fn test_parse_numeric_input(input: &str, expected: Option<f64>) {
        assert_eq!(parse_numeric_input(input), expected);
    }

    #[test_case("1.5B", Some(1_500_000_000.0) ; "billions")]
    #[test_case("250m", Some(250_000_000.0) ; "millions lowercase")]
    #[test_case("50K", Some(50_000.0) ; "thousands")]
    #[test_case("12,345", Some(12_345.0) ; "commas")]
    #[test_case("1,500M", Some(1_500_000_000.0) ; "commas with suffix")]
    #[test_case("—", None ; "placeholder")]
    #[test_case("", None ; "empty")]
    #[test_case("B", None ; "bare suffix")]
    #[test_case("lots", None ; "garbage")]
    #[test_case("1e308B", None ; "overflows after suffix")]
    fn test_parse_shares_input(input: &str, expected: Option<f64>) {
        assert_eq!(parse_shares_input(input), expected);
    }

    #[test_case("", true ; "empty resets")]
    #[test_case("  ", true ; "blank resets")]
    #[test_case("1.5B", true ; "positive")]
    #[test_case("0", false ; "zero")]
    #[test_case("-10M", false ; "negative")]
    #[test_case("abc", false ; "garbage")]
    #[test_case("1e308B", false ; "overflow")]
    fn test_validate_shares_input(input: &str, valid: bool) {
        assert_eq!(validate_shares_input(input), valid);
    }

    #[test_case(Some(1_500_000_000.0), "1.50B" ; "billions")]
    #[test_case(Some(250_000_000.0), "250.00M" ; "millions")]
    #[test_case(Some(50_000.0), "50.00K" ; "thousands")]
    #[test_case(Some(999.0), "999" ; "below thousand")]
    #[test_case(Some(12.5), "12.5" ; "fractional")]
    #[test_case(None, "—" ; "unknown")]
    fn test_format_shares_outstanding(shares: Option<f64>, expected: &str) {
        assert_eq!(format_shares_outstanding(shares), expected);
    }

    #[test]
    fn test_currency_formatting() {
        assert_eq!(format_usd(Some(1_234_567.6)), "$1,234,568");
        assert_eq!(format_usd(Some(-1_000.0)), "-$1,000");
        assert_eq!(format_usd(Some(999.0)), "$999");
        assert_eq!(format_usd_price(Some(400.254)), "$400.25");
        assert_eq!(format_usd_price(None), NO_VALUE);
        assert_eq!(format_btc(Some(640_031.0)), "640,031.00");
        assert_eq!(format_ratio(Some(7.938_461)), "7.94");
    }
}
