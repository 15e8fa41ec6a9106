//! # vest-valuator
//!
//! Values vested stock-grant lots in Japanese yen.
//!
//! Lots come from a broker CSV export; each vest date is priced with the
//! USD/JPY rate published for that day in a bank's HTML rate table.
//!
//! ## Example
//!
//! ```rust
//! use vest_valuator::prelude::*;
//!
//! let mut rates = RateTable::new();
//! rates.insert("20240116", 150.0);
//!
//! let csv = "Date,Quantity,Price\n16-Jan-2024,200,$200.25\n";
//! let valuation = LotValuator::new(&rates).value_all(csv).unwrap();
//!
//! assert_eq!(valuation.lots.len(), 1);
//! assert!(report::render(&valuation).contains("総額: ¥6,007,500.00"));
//! ```

pub mod config;
pub mod dates;
pub mod error;
pub mod fx;
pub mod report;
pub mod valuation;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::config::Config;
    pub use crate::error::{Result, VestError};
    pub use crate::fx::{RateCache, RateLookup, RateSource, RateTable};
    pub use crate::report;
    pub use crate::valuation::{LotValuator, Valuation, ValuedLot};
}
