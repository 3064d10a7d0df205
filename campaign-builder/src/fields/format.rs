//! Value formatting shared by the field types

use campaign_builder_config::{CurrencyConfig, CurrencyPosition};
use once_cell::sync::Lazy;
use regex::Regex;

static CAMEL_BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid camel regex"));

static NON_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid id regex"));

/// Format an amount with the configured symbol, separators and precision.
///
/// ```
/// use campaign_builder::fields::format::format_money;
/// use campaign_builder_config::CurrencyConfig;
///
/// let usd = CurrencyConfig::default();
/// assert_eq!(format_money(1234.5, &usd), "$1,234.50");
/// assert_eq!(format_money(5.0, &usd), "$5");
/// ```
pub fn format_money(amount: f64, currency: &CurrencyConfig) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let fixed = format!("{:.*}", currency.decimals as usize, amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut number = group_thousands(whole, &currency.thousands_separator);
    let zero_fraction = fraction.bytes().all(|b| b == b'0');
    if !fraction.is_empty() && !(currency.trim_zero_decimals && zero_fraction) {
        number.push_str(&currency.decimal_separator);
        number.push_str(fraction);
    }

    let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
    let sign = if amount < 0.0 && !is_zero { "-" } else { "" };
    let symbol = &currency.symbol;

    match currency.position {
        CurrencyPosition::Before => format!("{sign}{symbol}{number}"),
        CurrencyPosition::BeforeSpace => format!("{sign}{symbol} {number}"),
        CurrencyPosition::After => format!("{sign}{number}{symbol}"),
        CurrencyPosition::AfterSpace => format!("{sign}{number} {symbol}"),
    }
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

/// Whole percent shown when rounding is on: floored, but a positive value
/// below 1 shows as 1 so that some progress never reads as none.
pub fn rounded_percent(raw: f64) -> u64 {
    let raw = if raw.is_finite() { raw.max(0.0) } else { 0.0 };
    if raw > 0.0 && raw < 1.0 {
        1
    } else {
        raw.floor() as u64
    }
}

/// Percentage text, e.g. `"42%"` or `"42.57%"`. Unrounded values keep at
/// most two decimals with trailing zeros trimmed.
pub fn format_percent(raw: f64, round: bool) -> String {
    if round {
        return format!("{}%", rounded_percent(raw));
    }
    let raw = if raw.is_finite() { raw.max(0.0) } else { 0.0 };
    let fixed = format!("{raw:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}%")
}

/// Truncate to at most `limit` characters, adding an ellipsis when cut.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(limit).collect();
    let kept = cut.trim_end().len();
    cut.truncate(kept);
    cut.push('…');
    cut
}

/// Canonical kebab-case type id.
///
/// `ProgressBar`, `progress_bar`, `Progress Bar` and `progress-bar-field`
/// all map to `progress-bar`.
pub fn normalize_type_id(raw: &str) -> String {
    let spaced = CAMEL_BOUNDARY_RE.replace_all(raw.trim(), "$1-$2");
    let lower = spaced.to_lowercase();
    let kebab = NON_ID_RE.replace_all(&lower, "-");
    let id = kebab.trim_matches('-');
    let id = id.strip_prefix("field-").unwrap_or(id);
    let id = id.strip_suffix("-field").unwrap_or(id);
    id.to_string()
}

/// A number as it appears in form values: `5`, `7.5`
pub fn plain_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Parse a user-entered amount such as `"1,250.50"` or `" 20 "`.
pub fn parse_amount(input: &str, currency: &CurrencyConfig) -> Option<f64> {
    let mut cleaned = input.trim().replace(currency.symbol.as_str(), "");
    if !currency.thousands_separator.is_empty() {
        cleaned = cleaned.replace(currency.thousands_separator.as_str(), "");
    }
    if currency.decimal_separator != "." && !currency.decimal_separator.is_empty() {
        cleaned = cleaned.replace(currency.decimal_separator.as_str(), ".");
    }
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
