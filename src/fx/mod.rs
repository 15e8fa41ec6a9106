//! USD/JPY exchange rate system
//!
//! # Components
//!
//! - **base**: RateTable and the RateLookup trait
//! - **table**: Parser for the bank's HTML rate table
//! - **source**: HTTP and file sources for the rate document
//! - **cache**: Fetch-once rate cache used for a whole run
//!
//! # Example
//!
//! ```rust
//! use vest_valuator::fx::{parse_rate_table, RateLookup};
//!
//! let html = "<table>\
//!     <tr><th>日付</th><th>1月</th></tr>\
//!     <tr><th>16</th><td>147.55</td></tr>\
//! </table>";
//!
//! let rates = parse_rate_table(html, 2024).unwrap();
//! assert_eq!(rates.get_rate("20240116").unwrap(), Some(147.55));
//! ```

pub mod base;
pub mod cache;
pub mod source;
pub mod table;

pub use base::{RateLookup, RateTable};
pub use cache::RateCache;
pub use source::{FileRateSource, HttpRateSource, RateSource, DEFAULT_RATE_URL};
pub use table::{parse_rate_table, year_from_url};
