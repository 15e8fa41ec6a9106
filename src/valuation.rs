//! Lot valuation
//!
//! Turns a broker CSV export into yen-valued lots. One malformed row never
//! aborts the report: it is dropped and recorded in [`Valuation::skipped`].

use crate::dates;
use crate::error::{Result, VestError};
use crate::fx::RateLookup;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fmt;

/// Column holding the vest date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateColumn {
    /// `Date`
    Date,
    /// `Vest Date`
    VestDate,
}

impl DateColumn {
    pub fn header(&self) -> &'static str {
        match self {
            DateColumn::Date => "Date",
            DateColumn::VestDate => "Vest Date",
        }
    }

    /// Resolve the date column from a header row, preferring `Date`.
    ///
    /// Returns the column and its index.
    pub fn resolve(headers: &StringRecord) -> Result<(Self, usize)> {
        [DateColumn::Date, DateColumn::VestDate]
            .into_iter()
            .find_map(|column| column_index(headers, column.header()).map(|idx| (column, idx)))
            .ok_or(VestError::MissingDateColumn)
    }
}

/// One vested lot as read from the CSV
#[derive(Debug, Clone, PartialEq)]
pub struct Lot {
    /// Date as written in the file
    pub date: String,
    pub quantity: f64,
    pub price_usd: f64,
}

impl Lot {
    pub fn value_usd(&self) -> f64 {
        self.price_usd * self.quantity
    }
}

/// A lot with its exchange rate and yen value
#[derive(Debug, Clone, PartialEq)]
pub struct ValuedLot {
    /// Canonical `dd-Mon-yyyy` date
    pub date: String,
    pub quantity: f64,
    pub price_usd: f64,
    /// JPY per USD on the vest date
    pub rate: f64,
    pub value_usd: f64,
    pub value_jpy: f64,
}

impl ValuedLot {
    fn new(lot: Lot, date: String, rate: f64) -> Self {
        let value_usd = lot.value_usd();
        Self {
            date,
            quantity: lot.quantity,
            price_usd: lot.price_usd,
            rate,
            value_usd,
            value_jpy: value_usd * rate,
        }
    }
}

/// Why a CSV record was left out of the report
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The record could not be decoded as CSV
    MalformedRecord(String),
    InvalidDate(String),
    InvalidQuantity(String),
    InvalidPrice(String),
    /// No rate is published for the `YYYYMMDD` key
    MissingRate(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkipReason::MalformedRecord(e) => write!(f, "malformed record: {}", e),
            SkipReason::InvalidDate(s) => write!(f, "invalid date '{}'", s),
            SkipReason::InvalidQuantity(s) => write!(f, "invalid quantity '{}'", s),
            SkipReason::InvalidPrice(s) => write!(f, "invalid price '{}'", s),
            SkipReason::MissingRate(key) => write!(f, "no exchange rate for {}", key),
        }
    }
}

/// A dropped record
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based data record number (the header is not counted)
    pub record: usize,
    pub reason: SkipReason,
}

/// Result of valuing a CSV export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Valuation {
    /// Valued lots in file order
    pub lots: Vec<ValuedLot>,
    /// Sum of `value_jpy` over `lots`, accumulated in order
    pub total_jpy: f64,
    pub skipped: Vec<SkippedRow>,
}

impl Valuation {
    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    fn push(&mut self, lot: ValuedLot) {
        self.total_jpy += lot.value_jpy;
        self.lots.push(lot);
    }

    fn skip(&mut self, record: usize, reason: SkipReason) {
        log::debug!("Skipping record {}: {}", record, reason);
        self.skipped.push(SkippedRow { record, reason });
    }
}

/// Column positions resolved once from the header row
struct Columns {
    date: usize,
    quantity: Option<usize>,
    price: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let (date_column, date) = DateColumn::resolve(headers)?;
        log::debug!("Using '{}' as the date column", date_column.header());

        Ok(Self {
            date,
            quantity: column_index(headers, "Quantity"),
            price: column_index(headers, "Price"),
        })
    }
}

/// Values CSV lots against a rate lookup
pub struct LotValuator<'a, R: RateLookup + ?Sized> {
    rates: &'a R,
}

impl<'a, R: RateLookup + ?Sized> LotValuator<'a, R> {
    pub fn new(rates: &'a R) -> Self {
        Self { rates }
    }

    /// Value every record of `csv_text`.
    ///
    /// Records with a bad date, quantity or price, or without a published
    /// rate, are skipped. Missing date columns and rate lookup errors abort.
    pub fn value_all(&self, csv_text: &str) -> Result<Valuation> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(csv_text.as_bytes());

        let mut valuation = Valuation::default();

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Ok(valuation);
        }
        let columns = Columns::resolve(&headers)?;

        for (idx, result) in reader.records().enumerate() {
            let record_no = idx + 1;
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    valuation.skip(record_no, SkipReason::MalformedRecord(e.to_string()));
                    continue;
                }
            };

            let raw_date = record.get(columns.date).unwrap_or_default();
            let Some(normalized) = dates::normalize(raw_date) else {
                valuation.skip(record_no, SkipReason::InvalidDate(raw_date.to_string()));
                continue;
            };

            let lot = match parse_lot(&record, &columns) {
                Ok(lot) => lot,
                Err(reason) => {
                    valuation.skip(record_no, reason);
                    continue;
                }
            };

            let Some(key) = dates::rate_key(&normalized) else {
                valuation.skip(record_no, SkipReason::InvalidDate(normalized));
                continue;
            };

            match self.rates.get_rate(&key)? {
                Some(rate) => valuation.push(ValuedLot::new(lot, normalized, rate)),
                None => valuation.skip(record_no, SkipReason::MissingRate(key)),
            }
        }

        Ok(valuation)
    }
}

/// Value every record of `csv_text` against `rates`
pub fn value_all<R: RateLookup + ?Sized>(csv_text: &str, rates: &R) -> Result<Valuation> {
    LotValuator::new(rates).value_all(csv_text)
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|header| header == name)
}

fn parse_lot(record: &StringRecord, columns: &Columns) -> std::result::Result<Lot, SkipReason> {
    let date = record.get(columns.date).unwrap_or_default().to_string();

    let raw_quantity = columns
        .quantity
        .and_then(|idx| record.get(idx))
        .unwrap_or_default();
    let quantity = raw_quantity
        .parse::<f64>()
        .map_err(|_| SkipReason::InvalidQuantity(raw_quantity.to_string()))?;

    let raw_price = columns
        .price
        .and_then(|idx| record.get(idx))
        .unwrap_or_default();
    let price_usd = parse_price(raw_price)
        .ok_or_else(|| SkipReason::InvalidPrice(raw_price.to_string()))?;

    Ok(Lot {
        date,
        quantity,
        price_usd,
    })
}

/// Parse a USD price such as `$200.25`
fn parse_price(raw: &str) -> Option<f64> {
    let digits = raw.strip_prefix('$').unwrap_or(raw).trim();
    digits.parse().ok()
}
