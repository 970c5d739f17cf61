//! Number formatting for reports (en-US, USD).

/// Insert thousands separators into a whole number.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// `$125,000`. Rounded to whole dollars.
pub fn currency(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(rounded.abs() as u64))
}

/// `15,000`.
pub fn number(value: u64) -> String {
    group_thousands(value)
}

/// `3.2%`.
pub fn percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

/// `$245k`, as on chart axes and mobile cards.
pub fn compact_currency(value: f64) -> String {
    format!("${:.0}k", value / 1000.0)
}

/// `2.8k`.
pub fn compact_count(value: u64) -> String {
    format!("{:.1}k", value as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(currency(125000.0), "$125,000");
        assert_eq!(currency(1500000.0), "$1,500,000");
        assert_eq!(currency(89.4), "$89");
        assert_eq!(currency(0.0), "$0");
        assert_eq!(currency(-1234.0), "-$1,234");
    }

    #[test]
    fn test_number() {
        assert_eq!(number(999), "999");
        assert_eq!(number(15000), "15,000");
        assert_eq!(number(1234567), "1,234,567");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(3.2), "3.2%");
        assert_eq!(percentage(36.7), "36.7%");
    }

    #[test]
    fn test_compact() {
        assert_eq!(compact_currency(245000.0), "$245k");
        assert_eq!(compact_count(2840), "2.8k");
    }
}
