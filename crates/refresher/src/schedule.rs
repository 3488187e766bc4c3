use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc, Weekday};

/// Runs start at 14:00 UTC (7AM MST).
pub const RUN_HOUR_UTC: u32 = 14;

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// First Monday-to-Friday 14:00 UTC strictly after `now`.
pub fn next_run_after(now: DateTime<Utc>) -> DateTime<Utc> {
    let mut day = now.date_naive();
    loop {
        if is_weekday(day) {
            if let Some(start) = day.and_hms_opt(RUN_HOUR_UTC, 0, 0) {
                let start = Utc.from_utc_datetime(&start);
                if start > now {
                    return start;
                }
            }
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => return now,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_same_day_before_run() {
        // 2024-01-08 is a Monday
        assert_eq!(next_run_after(at(2024, 1, 8, 10, 0)), at(2024, 1, 8, 14, 0));
    }

    #[test]
    fn test_at_run_time_moves_to_next_day() {
        assert_eq!(next_run_after(at(2024, 1, 8, 14, 0)), at(2024, 1, 9, 14, 0));
        assert_eq!(next_run_after(at(2024, 1, 10, 23, 59)), at(2024, 1, 11, 14, 0));
    }

    #[test]
    fn test_weekend_skipped() {
        assert_eq!(next_run_after(at(2024, 1, 12, 15, 0)), at(2024, 1, 15, 14, 0));
        assert_eq!(next_run_after(at(2024, 1, 13, 9, 0)), at(2024, 1, 15, 14, 0));
        assert_eq!(next_run_after(at(2024, 1, 14, 20, 0)), at(2024, 1, 15, 14, 0));
    }

    #[test]
    fn test_friday_morning() {
        assert_eq!(next_run_after(at(2024, 1, 12, 13, 59)), at(2024, 1, 12, 14, 0));
    }
}
