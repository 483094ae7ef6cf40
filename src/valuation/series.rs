use chrono::{Duration, NaiveDate};
use log::warn;
use rust_decimal::RoundingStrategy;
use std::collections::BTreeMap;

use crate::constants::{SERIES_NAV_LOOKBACK_DAYS, VALUE_PRECISION};
use crate::ledger::ProcessedTransaction;
use crate::nav::NavEntry;
use crate::valuation::SchemeValue;

/// Most recent published NAV at or before `date`, looking back at most
/// `SERIES_NAV_LOOKBACK_DAYS` calendar days. Long NAV gaps (suspended
/// schemes, data holes) are treated as missing rather than stale-priced.
fn nav_for_date(
    navs_by_date: &BTreeMap<NaiveDate, NavEntry>,
    date: NaiveDate,
) -> Option<&NavEntry> {
    let floor = date - Duration::days(SERIES_NAV_LOOKBACK_DAYS as i64);
    navs_by_date.range(floor..=date).next_back().map(|(_, e)| e)
}

/// Expands per-transaction ledger projections into a daily value series
/// over `[from, to]`. The last projection at or before each day is
/// carried forward and marked to that day's NAV; days before the first
/// transaction, or with no NAV within the lookback window, are skipped.
pub fn scheme_value_series(
    processed: &[ProcessedTransaction],
    navs_by_date: &BTreeMap<NaiveDate, NavEntry>,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<SchemeValue> {
    let mut series = Vec::new();
    let mut current: Option<&ProcessedTransaction> = None;
    let mut next_idx = 0;

    let mut date = from;
    while date <= to {
        while next_idx < processed.len() && processed[next_idx].date <= date {
            current = Some(&processed[next_idx]);
            next_idx += 1;
        }

        if let Some(projection) = current {
            match nav_for_date(navs_by_date, date) {
                Some(entry) => {
                    let value = (projection.balance * entry.value).round_dp_with_strategy(
                        VALUE_PRECISION,
                        RoundingStrategy::MidpointAwayFromZero,
                    );
                    series.push(SchemeValue {
                        date,
                        invested: projection.invested,
                        value,
                        nav: entry.value,
                        balance: projection.balance,
                        average_nav: projection.average,
                    });
                }
                None => {
                    warn!("No NAV within lookback for {date}, skipping day");
                }
            }
        }

        date += Duration::days(1);
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn projection(date: NaiveDate, balance: Decimal) -> ProcessedTransaction {
        ProcessedTransaction {
            date,
            invested: balance * dec!(10),
            average: dec!(10),
            balance,
        }
    }

    fn navs(entries: &[(NaiveDate, Decimal)]) -> BTreeMap<NaiveDate, NavEntry> {
        entries
            .iter()
            .map(|(date, value)| {
                (
                    *date,
                    NavEntry {
                        scheme_id: 1,
                        date: *date,
                        value: *value,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn carries_last_projection_forward() {
        let processed = vec![projection(d(2023, 1, 2), dec!(100))];
        let navs = navs(&[
            (d(2023, 1, 2), dec!(10)),
            (d(2023, 1, 3), dec!(11)),
            (d(2023, 1, 4), dec!(12)),
        ]);
        let series = scheme_value_series(&processed, &navs, d(2023, 1, 2), d(2023, 1, 4));

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].value, dec!(1000));
        assert_eq!(series[2].value, dec!(1200));
        assert!(series.iter().all(|point| point.balance == dec!(100)));
    }

    #[test]
    fn days_before_first_transaction_are_skipped() {
        let processed = vec![projection(d(2023, 1, 4), dec!(50))];
        let navs = navs(&[(d(2023, 1, 2), dec!(10)), (d(2023, 1, 4), dec!(10))]);
        let series = scheme_value_series(&processed, &navs, d(2023, 1, 2), d(2023, 1, 4));

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, d(2023, 1, 4));
    }

    #[test]
    fn weekend_gap_reuses_fridays_nav() {
        let processed = vec![projection(d(2023, 1, 6), dec!(10))];
        // Friday 2023-01-06 publishes; Sat/Sun do not.
        let navs = navs(&[(d(2023, 1, 6), dec!(20))]);
        let series = scheme_value_series(&processed, &navs, d(2023, 1, 6), d(2023, 1, 8));

        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|point| point.nav == dec!(20)));
    }

    #[test]
    fn nav_gap_beyond_lookback_skips_days() {
        let processed = vec![projection(d(2023, 1, 2), dec!(10))];
        let navs = navs(&[(d(2023, 1, 2), dec!(10))]);
        // 2023-01-13 is 11 days past the last NAV, outside the lookback.
        let series = scheme_value_series(&processed, &navs, d(2023, 1, 12), d(2023, 1, 13));

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, d(2023, 1, 12));
    }
}
