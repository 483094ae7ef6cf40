use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::errors::Result;
use crate::nav::NavEntry;

/// Lookup interface to the scheme/NAV master data store. The engine
/// queries it, never populates it.
pub trait NavStoreTrait: Send + Sync {
    /// Exact-date lookup. `Ok(None)` means the store has no entry for
    /// that date; errors are reserved for store failures.
    fn lookup(&self, scheme_id: u64, date: NaiveDate) -> Result<Option<NavEntry>>;

    /// Range lookup across schemes in one round trip. The cost should be
    /// proportional to the store's batching capability, not to the
    /// number of (scheme, date) pairs requested.
    fn lookup_range(
        &self,
        scheme_ids: &HashSet<u64>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NavEntry>>;
}

pub trait NavResolverTrait: Send + Sync {
    /// Resolves the latest published NAV, applying the publication
    /// cutoff and weekend adjustment to the current wall-clock date.
    fn resolve_latest(&self, scheme_id: u64) -> Result<NavEntry>;

    /// Resolves the NAV as of a given date with calendar-aware fallback
    /// and bounded backward retry.
    fn resolve_on(&self, scheme_id: u64, date: NaiveDate) -> Result<NavEntry>;

    /// Bulk form: all entries for the given schemes across the date
    /// range, keyed scheme id -> date -> entry.
    fn resolve_batch(
        &self,
        scheme_ids: &HashSet<u64>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<HashMap<u64, BTreeMap<NaiveDate, NavEntry>>>;
}
