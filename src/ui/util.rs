use anyhow::{bail, Result};
use chrono::{Months, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO && !abs.round_dp(2).is_zero() {
        format!("-{with_commas}.{dec_part}")
    } else {
        format!("{with_commas}.{dec_part}")
    }
}

/// `format_amount` prefixed with the currency label, e.g. `"PKR 1,250.00"`.
pub(crate) fn format_money(val: Decimal, currency: &str) -> String {
    format!("{currency} {}", format_amount(val))
}

/// Quantities keep their own precision; trailing zeros are dropped.
pub(crate) fn format_quantity(val: Decimal) -> String {
    val.normalize().to_string()
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Split `key=value` arguments into pairs. A value runs until the next `key=`, so
/// `category=Red bricks qty=10` yields `("category", "Red bricks")` and `("qty", "10")`.
pub(crate) fn parse_fields(input: &str) -> Result<Vec<(String, String)>> {
    let key = Regex::new(r"(?:^|\s)([A-Za-z_]+)=")?;
    let input = input.trim();
    let matches: Vec<_> = key.captures_iter(input).collect();

    let Some(first) = matches.first() else {
        if input.is_empty() {
            return Ok(Vec::new());
        }
        bail!("Expected key=value, got '{input}'");
    };
    if let Some(whole) = first.get(0) {
        let leading = input[..whole.start()].trim();
        if !leading.is_empty() {
            bail!("Expected key=value, got '{leading}'");
        }
    }

    let mut fields = Vec::with_capacity(matches.len());
    for (i, caps) in matches.iter().enumerate() {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = matches
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(input.len(), |m| m.start());
        let value = input[whole.end()..end].trim();
        fields.push((name.as_str().to_string(), value.to_string()));
    }
    Ok(fields)
}

/// Accept `YYYY-MM`, `YYYY-M`, `MM` or `M` and return a canonical `YYYY-MM`.
/// Short forms take the year from `default_year`.
pub(crate) fn normalize_month(arg: &str, default_year: i32) -> Option<String> {
    let arg = arg.trim();
    let (year, month) = match arg.split_once('-') {
        Some((y, m)) => (y.parse::<i32>().ok()?, m.parse::<u32>().ok()?),
        None if arg.len() <= 2 => (default_year, arg.parse::<u32>().ok()?),
        None => return None,
    };
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.format("%Y-%m").to_string())
}

/// Step a `YYYY-MM` month forward or back.
pub(crate) fn shift_month(month: &str, delta: i32) -> Option<String> {
    let first = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").ok()?;
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        first.checked_add_months(months)
    } else {
        first.checked_sub_months(months)
    }?;
    Some(shifted.format("%Y-%m").to_string())
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page.saturating_sub(1));
        }
    }
}

/// Move a list cursor up by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}

/// Pull `index` back inside a list that may have shrunk.
pub(crate) fn clamp_cursor(index: &mut usize, scroll: &mut usize, len: usize) {
    if *index >= len {
        *index = len.saturating_sub(1);
    }
    if *scroll > *index {
        *scroll = *index;
    }
}
