//! Serde adapter for optional amounts that arrive either as JSON numbers or as
//! decimal-comma strings straight from the invoice text.
//!
//! ```ignore
//! #[serde(default, deserialize_with = "crate::locale::serde_number::optional")]
//! pub full_tariff: Option<f64>,
//! ```

use serde::{Deserialize, Deserializer};

use super::parse_locale_number;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Deserialize `Option<f64>` from a number, a decimal-comma string, or null.
///
/// Unparsable strings become `None` rather than an error so that one bad field
/// does not reject the whole reading.
pub fn optional<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrText::Number(v)) if v.is_finite() => Some(v),
        Some(NumberOrText::Number(_)) => None,
        Some(NumberOrText::Text(text)) => parse_locale_number(&text),
        None => None,
    })
}

/// Deserialize `Option<f64>` from the raw text of a field, always through
/// [`parse_locale_number`].
///
/// For self-describing-by-guess formats like CSV, where an unquoted `2.300`
/// would otherwise be inferred as the float 2.3 instead of two thousand three hundred.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_locale_number))
}
