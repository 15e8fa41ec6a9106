//! Parser for the bank's published USD/JPY rate table
//!
//! The page holds one table per year. The first row is a header (a date
//! label followed by twelve month labels), every following row starts with
//! a `<th>` day number and carries one `<td>` per month:
//!
//! ```text
//! <tr><th>日付</th><th>1月</th><th>2月</th> ... <th>12月</th></tr>
//! <tr><th>4</th><td>141.82</td><td>&nbsp;</td> ... </tr>
//! ```
//!
//! Month labels are not read; cell position `i` is month `i + 1`.

use super::base::RateTable;
use crate::error::{Result, VestError};
use chrono::{Datelike, Local};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Extract the table year from a rate source location such as
/// `https://www.77bank.co.jp/kawase/usd2024.html`.
///
/// Falls back to the current calendar year when the location has no
/// `usdYYYY` marker.
pub fn year_from_url(url: &str) -> i32 {
    Regex::new(r"usd(\d{4})")
        .ok()
        .and_then(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .and_then(|year| year.as_str().parse().ok())
        .unwrap_or_else(|| Local::now().year())
}

/// Parse the first `<table>` of `html` into a rate table for `year`.
///
/// Rows without a numeric day header and cells that are blank or not a
/// number are skipped. A document without any table is an error.
pub fn parse_rate_table(html: &str, year: i32) -> Result<RateTable> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let th_sel = selector("th")?;
    let td_sel = selector("td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| VestError::ParseError("table not found".to_string()))?;

    let mut rates = RateTable::new();

    for row in table.select(&row_sel).skip(1) {
        let Some(day) = row.select(&th_sel).next().and_then(|th| parse_day(&cell_text(th)))
        else {
            continue;
        };

        for (month_idx, cell) in row.select(&td_sel).enumerate() {
            // trim() also strips NBSP, so "&nbsp;" cells end up empty here
            let text = cell_text(cell);
            if text.is_empty() {
                continue;
            }

            let Ok(rate) = text.parse::<f64>() else {
                continue;
            };

            rates.insert(format!("{}{:02}{:02}", year, month_idx + 1, day), rate);
        }
    }

    log::debug!("Parsed {} rates for {}", rates.len(), year);
    Ok(rates)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| VestError::ParseError(format!("Invalid selector {}: {}", css, e)))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn parse_day(text: &str) -> Option<u32> {
    if text.is_empty() || text.len() > 2 || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
