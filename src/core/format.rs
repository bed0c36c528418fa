//! Display helpers shared by the shell and exports.

use rust_decimal::Decimal;

/// Placeholder shown where a percentage cannot be computed.
pub const MISSING_PERCENT: &str = "—";

/// `R$ 1,234.56`; negatives keep the sign after the symbol (`R$ -12.00`).
pub fn format_currency(symbol: &str, amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{} {}{}.{}", symbol, sign, group_thousands(whole), fraction)
}

pub fn format_percent(value: Option<Decimal>) -> String {
    match value {
        Some(value) => format!("{:.2}%", value.round_dp(2)),
        None => MISSING_PERCENT.to_string(),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency("R$", dec!(1234567.5)), "R$ 1,234,567.50");
        assert_eq!(format_currency("R$", dec!(999)), "R$ 999.00");
        assert_eq!(format_currency("R$", dec!(-1000)), "R$ -1,000.00");
        assert_eq!(format_currency("$", dec!(-0.001)), "$ 0.00");
    }

    #[test]
    fn missing_percent_uses_dash() {
        assert_eq!(format_percent(None), "—");
        assert_eq!(format_percent(Some(dec!(20))), "20.00%");
        assert_eq!(format_percent(Some(dec!(33.3333))), "33.33%");
    }
}
