#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("Cement", 10), "Cement");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("Steel", 5), "Steel");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("Reinforcement bars", 6), "Reinf…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("Bricks", 0), "");
}

#[test]
fn test_truncate_unicode() {
    assert_eq!(truncate("سیمنٹ بوری", 4), "سیم…");
}

#[test]
fn test_truncate_one_char() {
    assert_eq!(truncate("Sand", 1), "…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.56)), "1,234.56");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0)), "0.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-200)), "-200.00");
}

#[test]
fn test_format_amount_large() {
    assert_eq!(format_amount(dec!(1234567.89)), "1,234,567.89");
}

#[test]
fn test_format_amount_rounds_to_two_decimals() {
    assert_eq!(format_amount(dec!(1.5)), "1.50");
}

#[test]
fn test_format_amount_tiny_negative_is_not_signed() {
    assert_eq!(format_amount(dec!(-0.001)), "0.00");
}

#[test]
fn test_format_money() {
    assert_eq!(format_money(dec!(-100), "PKR"), "PKR -100.00");
    assert_eq!(format_money(dec!(25000), "USD"), "USD 25,000.00");
}

#[test]
fn test_format_quantity_drops_trailing_zeros() {
    assert_eq!(format_quantity(dec!(10.500)), "10.5");
    assert_eq!(format_quantity(dec!(5000)), "5000");
}

// ── parse_fields ──────────────────────────────────────────────

#[test]
fn test_parse_fields_simple() {
    let fields = parse_fields("date=2024-01-10 qty=10 price=50").unwrap();
    assert_eq!(
        fields,
        vec![
            ("date".to_string(), "2024-01-10".to_string()),
            ("qty".to_string(), "10".to_string()),
            ("price".to_string(), "50".to_string()),
        ]
    );
}

#[test]
fn test_parse_fields_values_with_spaces() {
    let fields = parse_fields("category=Red bricks unit=pcs note=paid in full early").unwrap();
    assert_eq!(fields[0], ("category".into(), "Red bricks".into()));
    assert_eq!(fields[1], ("unit".into(), "pcs".into()));
    assert_eq!(fields[2], ("note".into(), "paid in full early".into()));
}

#[test]
fn test_parse_fields_empty_value() {
    let fields = parse_fields("notes= paid=0").unwrap();
    assert_eq!(fields[0], ("notes".into(), String::new()));
    assert_eq!(fields[1], ("paid".into(), "0".into()));
}

#[test]
fn test_parse_fields_equals_inside_value() {
    let fields = parse_fields("desc=ratio=1:2").unwrap();
    assert_eq!(fields, vec![("desc".into(), "ratio=1:2".into())]);
}

#[test]
fn test_parse_fields_blank_input() {
    assert!(parse_fields("   ").unwrap().is_empty());
}

#[test]
fn test_parse_fields_rejects_leading_text() {
    let err = parse_fields("cement qty=10").unwrap_err();
    assert!(err.to_string().contains("cement"));
    assert!(parse_fields("cement").is_err());
}

// ── months ────────────────────────────────────────────────────

#[test]
fn test_normalize_month_forms() {
    assert_eq!(normalize_month("2024-03", 2030).as_deref(), Some("2024-03"));
    assert_eq!(normalize_month("2024-3", 2030).as_deref(), Some("2024-03"));
    assert_eq!(normalize_month("7", 2025).as_deref(), Some("2025-07"));
    assert_eq!(normalize_month("12", 2025).as_deref(), Some("2025-12"));
}

#[test]
fn test_normalize_month_rejects_garbage() {
    assert!(normalize_month("2024-13", 2025).is_none());
    assert!(normalize_month("march", 2025).is_none());
    assert!(normalize_month("0", 2025).is_none());
    assert!(normalize_month("", 2025).is_none());
}

#[test]
fn test_shift_month_across_years() {
    assert_eq!(shift_month("2024-12", 1).as_deref(), Some("2025-01"));
    assert_eq!(shift_month("2024-01", -1).as_deref(), Some("2023-12"));
    assert_eq!(shift_month("2024-05", 0).as_deref(), Some("2024-05"));
    assert!(shift_month("nope", 1).is_none());
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (3, 1));
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (4, 2);
    scroll_down(&mut index, &mut scroll, 5, 3);
    assert_eq!((index, scroll), (4, 2));
}

#[test]
fn test_scroll_up_pulls_window() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));
}

#[test]
fn test_scroll_to_bottom() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_clamp_cursor_after_shrink() {
    let (mut index, mut scroll) = (7, 5);
    clamp_cursor(&mut index, &mut scroll, 3);
    assert_eq!((index, scroll), (2, 2));

    let (mut index, mut scroll) = (4, 1);
    clamp_cursor(&mut index, &mut scroll, 0);
    assert_eq!((index, scroll), (0, 0));
}
