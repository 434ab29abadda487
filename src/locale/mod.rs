//! Decimal-comma number parsing and formatting
//!
//! Brazilian convention: `.` groups thousands and `,` separates decimals,
//! so `1.234,56` is one thousand two hundred thirty-four and 56 cents.

pub mod serde_number;

/// Parse a decimal-comma number such as `"1.234,56"` or `"-0,5"`
///
/// Thousands separators are dropped and the decimal comma becomes a point before
/// parsing. Returns `None` for blank, non-numeric or non-finite input; never panics.
pub fn parse_locale_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized: String = trimmed
        .chars()
        .filter(|&c| c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    // Rust accepts "inf" and "NaN" spellings, which are not amounts
    if !normalized.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format `value` with `decimals` fixed fraction digits in decimal-comma style
///
/// `format_locale_number(1234567.891, 2)` gives `"1.234.567,89"`. Non-finite values
/// are rendered as zero.
pub fn format_locale_number(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.*}", decimals, value);

    let (negative, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, fixed.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    // "-0,00" is not a meaningful amount
    let is_zero = unsigned.bytes().all(|b| b == b'0' || b == b'.');

    let mut out = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
    if negative && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    if let Some(fraction) = fraction {
        out.push(',');
        out.push_str(fraction);
    }
    out
}

/// Format with the default 2 decimals
pub fn format_amount(value: f64) -> String {
    format_locale_number(value, 2)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}
