use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// Rolls weekend dates back to the preceding Friday. Fund houses publish
/// no NAV on Saturdays and Sundays.
pub fn previous_business_day(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date - Duration::days(2),
        _ => date,
    }
}

/// Effective lookup date for "today". NAVs are refreshed only after
/// 23:30 local time, so before that the latest usable NAV is yesterday's.
pub fn effective_lookup_date(now: NaiveDateTime) -> NaiveDate {
    let cutoff = NaiveTime::from_hms_opt(23, 30, 0).unwrap();
    let mut date = now.date();
    if now.time() < cutoff {
        date -= Duration::days(1);
    }
    previous_business_day(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weekday_is_unchanged() {
        assert_eq!(previous_business_day(d(2023, 3, 1)), d(2023, 3, 1));
    }

    #[test]
    fn saturday_rolls_back_to_friday() {
        assert_eq!(previous_business_day(d(2023, 3, 4)), d(2023, 3, 3));
    }

    #[test]
    fn sunday_rolls_back_to_friday() {
        assert_eq!(previous_business_day(d(2023, 3, 5)), d(2023, 3, 3));
    }

    #[test]
    fn before_cutoff_uses_yesterday() {
        let now = d(2023, 3, 2).and_hms_opt(10, 0, 0).unwrap();
        assert_eq!(effective_lookup_date(now), d(2023, 3, 1));
    }

    #[test]
    fn after_cutoff_uses_same_day() {
        let now = d(2023, 3, 2).and_hms_opt(23, 45, 0).unwrap();
        assert_eq!(effective_lookup_date(now), d(2023, 3, 2));
    }

    #[test]
    fn monday_before_cutoff_lands_on_friday() {
        // Yesterday is Sunday, which rolls back to Friday.
        let now = d(2023, 3, 6).and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(effective_lookup_date(now), d(2023, 3, 3));
    }
}
