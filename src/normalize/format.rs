// src/normalize/format.rs
//! Display formatting for XBRL values.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// A plain currency code such as `USD`.
    Monetary,
    /// `USD/shares` and friends.
    PerShare,
    /// `shares`, `pure`, anything else.
    Other,
}

pub fn unit_kind(unit: &str) -> UnitKind {
    if unit.to_ascii_lowercase().ends_with("/shares") {
        UnitKind::PerShare
    } else if unit.len() == 3 && unit.chars().all(|c| c.is_ascii_uppercase()) {
        UnitKind::Monetary
    } else {
        UnitKind::Other
    }
}

/// `$1,234,567` for USD, `$6.13` for USD/shares, `1,234 EUR`, `0.21` for pure ratios.
/// Negative amounts keep the sign after the symbol: `$-5,000`.
pub fn format_value(val: f64, unit: &str) -> String {
    match unit_kind(unit) {
        UnitKind::Monetary => {
            let grouped = group_thousands(val.round() as i64);
            if unit == "USD" {
                format!("${}", grouped)
            } else {
                format!("{} {}", grouped, unit)
            }
        }
        UnitKind::PerShare => {
            if unit.starts_with("USD") {
                format!("${:.2}", val)
            } else {
                format!("{:.2} {}", val, unit)
            }
        }
        UnitKind::Other if unit == "pure" => format!("{:.2}", val),
        UnitKind::Other => {
            let number = if val.fract() == 0.0 {
                group_thousands(val as i64)
            } else {
                format!("{:.2}", val)
            };
            format!("{} {}", number, unit)
        }
    }
}

pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Inverse of the monetary formatting: `$123,456` -> `123456`.
/// Fractions round to the nearest integer. Returns `None` for anything that
/// is not a dollar amount.
pub fn parse_currency(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, rest) = if let Some(rest) = s.strip_prefix("-$") {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix("$-") {
        (true, rest)
    } else {
        (false, s.strip_prefix('$')?)
    };

    let cleaned: String = rest.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let value = cleaned.parse::<f64>().ok()?.round() as i64;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(120), "120");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(391_035_000_000), "391,035,000,000");
        assert_eq!(group_thousands(-5_000), "-5,000");
    }

    #[test]
    fn test_unit_kinds() {
        assert_eq!(unit_kind("USD"), UnitKind::Monetary);
        assert_eq!(unit_kind("EUR"), UnitKind::Monetary);
        assert_eq!(unit_kind("USD/shares"), UnitKind::PerShare);
        assert_eq!(unit_kind("shares"), UnitKind::Other);
        assert_eq!(unit_kind("pure"), UnitKind::Other);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(120.0, "USD"), "$120");
        assert_eq!(format_value(93_736_000_000.0, "USD"), "$93,736,000,000");
        assert_eq!(format_value(-5_000.4, "USD"), "$-5,000");
        assert_eq!(format_value(6.1299, "USD/shares"), "$6.13");
        assert_eq!(format_value(2.5, "EUR/shares"), "2.50 EUR/shares");
        assert_eq!(format_value(1_234.0, "EUR"), "1,234 EUR");
        assert_eq!(format_value(15_115_823_000.0, "shares"), "15,115,823,000 shares");
        assert_eq!(format_value(0.2134, "pure"), "0.21");
        assert_eq!(format_value(1.0, "pure"), "1.00");
    }

    #[test]
    fn test_parse_currency_recovers_formatted_integer() {
        assert_eq!(parse_currency("$123,456"), Some(123_456));
        assert_eq!(parse_currency(&format_value(391_035_000_000.0, "USD")), Some(391_035_000_000));
        assert_eq!(parse_currency("$-5,000"), Some(-5_000));
        assert_eq!(parse_currency("-$5,000"), Some(-5_000));
        assert_eq!(parse_currency("$6.13"), Some(6));
        assert_eq!(parse_currency("123"), None);
        assert_eq!(parse_currency("$"), None);
        assert_eq!(parse_currency("$12a"), None);
    }
}
