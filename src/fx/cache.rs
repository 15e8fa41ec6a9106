//! Process-wide rate cache
//!
//! The rate document is fetched at most once per run. A failed fetch is
//! logged and leaves the table empty, so the next lookup tries again.

use super::base::{RateLookup, RateTable};
use super::source::RateSource;
use super::table::{parse_rate_table, year_from_url};
use crate::error::Result;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct CacheState {
    /// Raw fetched document; empty until a fetch succeeds
    document: String,
    table: RateTable,
}

/// Lazily loaded USD/JPY rate table
///
/// # Example
/// ```no_run
/// use vest_valuator::fx::{HttpRateSource, RateCache, RateLookup, DEFAULT_RATE_URL};
/// use std::time::Duration;
///
/// let source = HttpRateSource::new(DEFAULT_RATE_URL, Duration::from_secs(30)).unwrap();
/// let cache = RateCache::new(source);
///
/// if let Some(rate) = cache.get_rate("20240116").unwrap() {
///     println!("16-Jan-2024: {}", rate);
/// }
/// ```
pub struct RateCache {
    source: Box<dyn RateSource>,
    state: Mutex<CacheState>,
}

impl RateCache {
    pub fn new(source: impl RateSource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    pub fn from_boxed(source: Box<dyn RateSource>) -> Self {
        Self {
            source,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Location the rates are loaded from
    pub fn source_location(&self) -> &str {
        self.source.location()
    }

    /// Whether a document has been fetched and parsed
    pub fn is_loaded(&self) -> bool {
        !self.lock().document.is_empty()
    }

    /// Fetch and parse the rate document unless it is already cached.
    ///
    /// Returns `Ok(false)` when the fetch failed; the failure is logged and
    /// nothing is cached. A document without a rate table is an error.
    pub fn ensure_loaded(&self) -> Result<bool> {
        let mut state = self.lock();
        if !state.document.is_empty() {
            return Ok(true);
        }

        let document = match self.source.fetch() {
            Ok(document) => document,
            Err(e) => {
                log::error!(
                    "Failed to fetch exchange rates from {}: {}",
                    self.source.location(),
                    e
                );
                return Ok(false);
            }
        };

        if document.is_empty() {
            log::warn!("Rate document from {} is empty", self.source.location());
            return Ok(false);
        }

        let year = year_from_url(self.source.location());
        let parsed = parse_rate_table(&document, year)?;
        log::info!("Loaded {} exchange rates for {}", parsed.len(), year);

        state.table.merge(parsed);
        state.document = document;
        Ok(true)
    }

    /// Snapshot of all loaded rates, loading them first if needed
    pub fn rates(&self) -> Result<RateTable> {
        self.ensure_loaded()?;
        Ok(self.lock().table.clone())
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RateLookup for RateCache {
    fn get_rate(&self, date_key: &str) -> Result<Option<f64>> {
        self.ensure_loaded()?;
        Ok(self.lock().table.get(date_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VestError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const HTML: &str = r#"<table>
        <tr><th>日付</th><th>1月</th><th>2月</th></tr>
        <tr><th>16</th><td>147.55</td><td>149.90</td></tr>
    </table>"#;

    struct CountingSource {
        response: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl RateSource for CountingSource {
        fn location(&self) -> &str {
            "https://example.com/kawase/usd2024.html"
        }

        fn fetch(&self) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .map(str::to_string)
                .ok_or_else(|| VestError::FetchError("connection refused".to_string()))
        }
    }

    fn cache_with(response: Option<&'static str>) -> (RateCache, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = RateCache::new(CountingSource {
            response,
            calls: Arc::clone(&calls),
        });
        (cache, calls)
    }

    #[test]
    fn test_lookup_loads_once() {
        let (cache, calls) = cache_with(Some(HTML));
        assert!(!cache.is_loaded());

        assert_eq!(cache.get_rate("20240116").unwrap(), Some(147.55));
        assert_eq!(cache.get_rate("20240216").unwrap(), Some(149.90));
        assert_eq!(cache.get_rate("20240117").unwrap(), None);

        assert!(cache.is_loaded());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_fetch_is_retried() {
        let (cache, calls) = cache_with(None);

        assert_eq!(cache.get_rate("20240116").unwrap(), None);
        assert_eq!(cache.get_rate("20240116").unwrap(), None);

        assert!(!cache.is_loaded());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_document_is_not_cached() {
        let (cache, calls) = cache_with(Some(""));

        assert!(!cache.ensure_loaded().unwrap());
        assert!(!cache.ensure_loaded().unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_missing_table_is_fatal() {
        let (cache, _) = cache_with(Some("<html><body>no rates today</body></html>"));

        let err = cache.get_rate("20240116").unwrap_err();
        assert!(matches!(err, VestError::ParseError(_)));
    }

    #[test]
    fn test_rates_snapshot() {
        let (cache, calls) = cache_with(Some(HTML));

        let rates = cache.rates().unwrap();
        assert_eq!(rates.len(), 2);
        assert!(cache.has_rate("20240116"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
