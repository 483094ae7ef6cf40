use chrono::{Duration, Local, NaiveDate};
use log::debug;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::constants::MAX_NAV_RETRIES;
use crate::errors::Result;
use crate::nav::{NavEntry, NavError, NavResolverTrait, NavStoreTrait};
use crate::utils::date_utils::{effective_lookup_date, previous_business_day};

/// Backward retry schedule for NAV lookups. Offsets are calendar days
/// stepped back per retry; the last offset repeats if there are more
/// retries than offsets. Every probe date is rolled off weekends.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub offsets: Vec<i64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: MAX_NAV_RETRIES,
            offsets: vec![1, 2, 3, 3],
        }
    }
}

impl RetryPolicy {
    fn offset_for(&self, retry: u32) -> i64 {
        self.offsets
            .get(retry as usize)
            .or(self.offsets.last())
            .copied()
            .unwrap_or(1)
    }
}

/// Maps (scheme id, date) to a published NAV, stepping back through the
/// calendar when the exact date has no entry. The retry loop is
/// synchronous and bounded; the cap is the only guarantee against
/// unbounded blocking on the backing store.
pub struct NavResolver {
    store: Arc<dyn NavStoreTrait>,
    retry_policy: RetryPolicy,
}

impl NavResolver {
    pub fn new(store: Arc<dyn NavStoreTrait>) -> Self {
        Self::with_retry_policy(store, RetryPolicy::default())
    }

    pub fn with_retry_policy(store: Arc<dyn NavStoreTrait>, retry_policy: RetryPolicy) -> Self {
        NavResolver {
            store,
            retry_policy,
        }
    }

    /// `requested` is the date the caller asked for; it is what a
    /// `NavError::NotFound` reports regardless of how far back the
    /// probes walked.
    fn lookup_with_retry(
        &self,
        scheme_id: u64,
        start: NaiveDate,
        requested: NaiveDate,
    ) -> Result<NavEntry> {
        let mut date = start;
        let mut retry = 0u32;
        loop {
            if let Some(entry) = self.store.lookup(scheme_id, date)? {
                return Ok(entry);
            }
            if retry >= self.retry_policy.max_retries {
                return Err(NavError::NotFound { date: requested }.into());
            }
            let offset = self.retry_policy.offset_for(retry);
            retry += 1;
            date = previous_business_day(date - Duration::days(offset));
            debug!(
                "Retrying NAV lookup for scheme {} on {} (retry {})",
                scheme_id, date, retry
            );
        }
    }
}

impl NavResolverTrait for NavResolver {
    fn resolve_latest(&self, scheme_id: u64) -> Result<NavEntry> {
        let date = effective_lookup_date(Local::now().naive_local());
        self.lookup_with_retry(scheme_id, date, date)
    }

    fn resolve_on(&self, scheme_id: u64, date: NaiveDate) -> Result<NavEntry> {
        let adjusted = previous_business_day(date);
        self.lookup_with_retry(scheme_id, adjusted, date)
    }

    fn resolve_batch(
        &self,
        scheme_ids: &HashSet<u64>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<HashMap<u64, BTreeMap<NaiveDate, NavEntry>>> {
        debug!(
            "Fetching NAVs for {} schemes from {} to {}",
            scheme_ids.len(),
            from,
            to
        );
        let entries = self.store.lookup_range(scheme_ids, from, to)?;
        let mut by_scheme: HashMap<u64, BTreeMap<NaiveDate, NavEntry>> = HashMap::new();
        for entry in entries {
            by_scheme
                .entry(entry.scheme_id)
                .or_default()
                .insert(entry.date, entry);
        }
        Ok(by_scheme)
    }
}
