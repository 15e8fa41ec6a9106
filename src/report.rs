//! Plain-text vest report
//!
//! ```text
//! === 株のVest詳細 ===
//! 日付: 16-Jan-2024
//! 数量: 200.000株
//! 価格: $200.25
//! 為替レート: ¥150.00
//! 日本円換算: ¥6,007,500.00
//! 計算式: USD: 200.25 * Quantity: 200.0, Total USD: 40050.0 * JPY Rate/USD: 150.0
//! ----------------------------------------
//!
//! 総額: ¥6,007,500.00(実数: 6007500.0)
//! ```

use crate::valuation::{Valuation, ValuedLot};
use std::fmt::Write as _;
use std::io::{self, Write};

pub const HEADER: &str = "=== 株のVest詳細 ===";

/// Width of the dashed line closing each lot block
pub const SEPARATOR_WIDTH: usize = 40;

/// Render the full report
pub fn render(valuation: &Valuation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", HEADER);

    for lot in &valuation.lots {
        let _ = writeln!(out, "日付: {}", lot.date);
        let _ = writeln!(out, "数量: {:.3}株", lot.quantity);
        let _ = writeln!(out, "価格: ${:.2}", lot.price_usd);
        let _ = writeln!(out, "為替レート: ¥{:.2}", lot.rate);
        let _ = writeln!(out, "日本円換算: ¥{}", format_thousands(lot.value_jpy, 2));
        let _ = writeln!(out, "計算式: {}", calculation(lot));
        let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", total_line(valuation.total_jpy));
    out
}

/// Write the report to `writer`
pub fn write_report<W: Write>(writer: &mut W, valuation: &Valuation) -> io::Result<()> {
    writer.write_all(render(valuation).as_bytes())?;
    writer.flush()
}

/// Print the report to stdout
pub fn print(valuation: &Valuation) -> io::Result<()> {
    let stdout = io::stdout();
    write_report(&mut stdout.lock(), valuation)
}

/// Literal formula behind a lot's yen value
pub fn calculation(lot: &ValuedLot) -> String {
    format!(
        "USD: {} * Quantity: {}, Total USD: {} * JPY Rate/USD: {}",
        natural(lot.price_usd),
        natural(lot.quantity),
        natural(lot.value_usd),
        natural(lot.rate)
    )
}

pub fn total_line(total_jpy: f64) -> String {
    format!(
        "総額: ¥{}(実数: {})",
        format_thousands(total_jpy, 2),
        natural(total_jpy)
    )
}

/// Shortest round-trip representation, always with a fractional part
/// (`100.0`, `150.5`)
pub fn natural(value: f64) -> String {
    format!("{:?}", value)
}

/// Fixed decimals with comma-grouped thousands (`6,007,500.00`)
pub fn format_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return format!("{:.*}", decimals, value);
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    if value.is_sign_negative() {
        out.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}
