//! Pure display formatters. No side effects, no locale lookup — the
//! dashboard always renders USD with `en-US`-style grouping.

/// Direction of a price move, used by consumers to pick styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceDirection {
    Up,
    Down,
    Flat,
}

pub fn price_change_direction(change_pct: f64) -> PriceDirection {
    if change_pct > 0.0 {
        PriceDirection::Up
    } else if change_pct < 0.0 {
        PriceDirection::Down
    } else {
        PriceDirection::Flat
    }
}

/// `$67,500.00` for prices at or above a dollar, `$0.000003` (six decimals)
/// for sub-dollar prices where two decimals would collapse to zero.
pub fn format_price(price: f64) -> String {
    if price >= 1.0 {
        format!("${}", group_thousands(&format!("{price:.2}")))
    } else {
        format!("${price:.6}")
    }
}

/// Unit-suffixed market cap / volume: `T` at 1e12, `B` at 1e9, `M` at 1e6,
/// plain grouped digits below that.
pub fn format_market_cap(value: f64) -> String {
    if value >= 1e12 {
        format!("${:.2}T", value / 1e12)
    } else if value >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else {
        format!("${}", group_thousands(&format!("{value:.0}")))
    }
}

/// Signed two-decimal percentage, e.g. `+2.35%` / `-0.80%`.
pub fn format_percent(change_pct: f64) -> String {
    if change_pct >= 0.0 {
        format!("+{change_pct:.2}%")
    } else {
        format!("{change_pct:.2}%")
    }
}

/// Insert `,` separators into the integer part of an already-formatted
/// non-negative decimal string.
fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    let offset = int_part.len() % 3;
    for (i, ch) in int_part.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_above_a_dollar_groups_with_two_decimals() {
        assert_eq!(format_price(67500.0), "$67,500.00");
        assert_eq!(format_price(1.0), "$1.00");
        assert_eq!(format_price(1234567.891), "$1,234,567.89");
    }

    #[test]
    fn sub_dollar_price_uses_six_decimals() {
        assert_eq!(format_price(0.0000034), "$0.000003");
        assert_eq!(format_price(0.5), "$0.500000");
    }

    #[test]
    fn market_cap_unit_thresholds() {
        assert_eq!(format_market_cap(1_500_000_000_000.0), "$1.50T");
        assert_eq!(format_market_cap(2_300_000_000.0), "$2.30B");
        assert_eq!(format_market_cap(4_560_000.0), "$4.56M");
        assert_eq!(format_market_cap(999.0), "$999");
        assert_eq!(format_market_cap(123_456.0), "$123,456");
    }

    #[test]
    fn percent_carries_an_explicit_sign() {
        assert_eq!(format_percent(2.345), "+2.35%");
        assert_eq!(format_percent(-0.8), "-0.80%");
        assert_eq!(format_percent(0.0), "+0.00%");
    }

    #[test]
    fn direction_classification() {
        assert_eq!(price_change_direction(3.2), PriceDirection::Up);
        assert_eq!(price_change_direction(-0.01), PriceDirection::Down);
        assert_eq!(price_change_direction(0.0), PriceDirection::Flat);
    }
}
