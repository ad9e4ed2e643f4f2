//! Presentation helpers shared by every frontend.

use chrono::{Datelike, NaiveDate};

use crate::cycle_math::days_between;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64, currency: &str) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// en-US style: `$1,234.56`, `Jan 5, 2024`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnUsFormatter;

impl CurrencyFormatter for EnUsFormatter {
    fn format_amount(&self, amount: f64, currency: &str) -> String {
        format_currency(amount, currency)
    }
}

impl DateFormatter for EnUsFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        format!("{} {}, {}", month_label(date.month()), date.day(), date.year())
    }
}

const ICON_PALETTE: [&str; 15] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
    "#BB8FCE", "#85C1E9", "#F8C471", "#82E0AA", "#F1948A", "#85C1E9", "#D7BDE2",
];

pub fn symbol_for(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "CAD" => Some("CA$"),
        "AUD" => Some("A$"),
        _ => None,
    }
}

/// Two decimals with thousands grouping; unknown codes are written as a prefix.
pub fn format_currency(amount: f64, code: &str) -> String {
    let code = code.trim().to_ascii_uppercase();
    let body = format_number(amount.abs());
    let sign = if amount < 0.0 && body != "0.00" { "-" } else { "" };
    match symbol_for(&code) {
        Some(symbol) => format!("{sign}{symbol}{body}"),
        None => format!("{sign}{code} {body}"),
    }
}

fn format_number(value: f64) -> String {
    let rendered = format!("{:.2}", value);
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((&rendered, "00"));
    format!("{}.{}", group_digits(int_part), frac_part)
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, ',');
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Two-letter badge: first two letters of a single word, otherwise the
/// initials of the first two words.
pub fn icon_initials(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    match words.as_slice() {
        [] => String::new(),
        [single] => single.chars().take(2).collect::<String>().to_uppercase(),
        [first, second, ..] => first
            .chars()
            .take(1)
            .chain(second.chars().take(1))
            .collect::<String>()
            .to_uppercase(),
    }
}

/// Deterministic palette color for a subscription name.
pub fn icon_color(name: &str) -> &'static str {
    let hash = name.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    });
    ICON_PALETTE[(hash.unsigned_abs() as usize) % ICON_PALETTE.len()]
}

/// Relative label for a payment date: "Today", "Tomorrow", "N days", or "Mon D".
pub fn due_label(date: NaiveDate, today: NaiveDate) -> String {
    match days_between(today, date) {
        0 => "Today".into(),
        1 => "Tomorrow".into(),
        days @ 2..=7 => format!("{days} days"),
        _ => format!("{} {}", month_label(date.month()), date.day()),
    }
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}
