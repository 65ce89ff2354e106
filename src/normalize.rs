//! Field normalization.
//!
//! Every field of a raw record passes through [`normalize`] before anything
//! else looks at it: absent and blank values become `None`, text is trimmed
//! and numbers are rendered in a canonical form.

use crate::record::RawValue;
use unicode_normalization::UnicodeNormalization;

/// Normalizes a raw scalar into a trimmed, non-empty string or `None`.
///
/// # Example
///
/// ```
/// use countryclean::{normalize, RawValue};
///
/// assert_eq!(normalize(Some(&RawValue::from("  Brazil "))), Some("Brazil".to_string()));
/// assert_eq!(normalize(Some(&RawValue::from("   "))), None);
/// assert_eq!(normalize(Some(&RawValue::Number(3.0))), Some("3".to_string()));
/// assert_eq!(normalize(None), None);
/// ```
pub fn normalize(value: Option<&RawValue>) -> Option<String> {
    match value? {
        RawValue::Null => None,
        RawValue::Text(s) => normalize_str(s),
        RawValue::Number(n) => Some(format_number(*n)),
        RawValue::Bool(b) => Some(b.to_string()),
    }
}

/// Trims a string, mapping blank input to `None`.
pub fn normalize_str(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Formats a number the way survey exports stringify it.
///
/// Shortest round-trip digits; integral values have no fractional part.
/// Magnitudes of 1e21 and above or below 1e-6 switch to exponent form
/// with an explicit sign (`1e+21`, `1.5e-7`).
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    // covers -0.0
    if n == 0.0 {
        return "0".to_string();
    }

    let abs = n.abs();
    if !(1e-6..1e21).contains(&abs) {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }

    format!("{}", n)
}

/// Produces the lookup form of a free-text country name.
///
/// - Lowercase
/// - Unicode NFKD decomposition with combining diacritics (U+0300..U+036F) dropped
/// - Typographic apostrophe mapped to ASCII `'`
///
/// "Côte d’Ivoire" becomes "cote d'ivoire".
pub fn simplify_name(name: &str) -> String {
    name.to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_diacritic(*c))
        .map(|c| if c == '\u{2019}' { '\'' } else { c })
        .collect()
}

/// Check if character is in the Combining Diacritical Marks block
fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}
