// Visibility is refreshed weekly on Mondays, so history is sampled on Mondays only

use chrono::{Datelike, Days, NaiveDate};

/// The Monday on or before `today`
pub fn most_recent_monday(today: NaiveDate) -> NaiveDate {
    let since_monday = today.weekday().num_days_from_monday() as u64;
    today - Days::new(since_monday)
}

/// `weeks_back + 1` Mondays, newest first, starting at the most recent one.
/// Stops early at the start of the representable calendar.
pub fn mondays_back(today: NaiveDate, weeks_back: usize) -> Vec<NaiveDate> {
    let first = most_recent_monday(today);
    (0..=weeks_back as u64)
        .map_while(|week| {
            week.checked_mul(7)
                .and_then(|days| first.checked_sub_days(Days::new(days)))
        })
        .collect()
}

/// Date portion of an ISO-8601 timestamp (`2024-01-08T00:00:00+01:00` -> `2024-01-08`)
pub fn short_date(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_most_recent_monday_midweek() {
        assert_eq!(most_recent_monday(date("2024-01-10")), date("2024-01-08"));
    }

    #[test]
    fn test_most_recent_monday_on_monday() {
        assert_eq!(most_recent_monday(date("2024-01-08")), date("2024-01-08"));
    }

    #[test]
    fn test_most_recent_monday_on_sunday() {
        assert_eq!(most_recent_monday(date("2024-01-14")), date("2024-01-08"));
    }

    #[test]
    fn test_most_recent_monday_across_year_boundary() {
        assert_eq!(most_recent_monday(date("2024-01-03")), date("2024-01-01"));
        assert_eq!(most_recent_monday(date("2023-01-01")), date("2022-12-26"));
    }

    #[test]
    fn test_mondays_back_zero_weeks() {
        assert_eq!(mondays_back(date("2024-01-10"), 0), vec![date("2024-01-08")]);
    }

    #[test]
    fn test_mondays_back_every_weekday() {
        // Every day of one week yields the same schedule
        let start = date("2024-03-04");
        let expected = mondays_back(start, 4);
        for offset in 0..7 {
            let today = start + Days::new(offset);
            assert_eq!(mondays_back(today, 4), expected, "today = {}", today);
        }
    }

    #[test]
    fn test_mondays_back_shape() {
        for weeks_back in [0usize, 1, 5, 10, 52] {
            let dates = mondays_back(date("2024-06-13"), weeks_back);
            assert_eq!(dates.len(), weeks_back + 1);
            assert!(dates.iter().all(|d| d.weekday() == Weekday::Mon));
            for pair in dates.windows(2) {
                assert_eq!(pair[0] - pair[1], chrono::Duration::days(7));
            }
        }
    }

    #[test]
    fn test_mondays_back_stops_at_calendar_start() {
        let dates = mondays_back(date("2024-01-10"), 20_000_000);

        assert!(dates.len() < 20_000_001);
        assert_eq!(dates[0], date("2024-01-08"));
        let oldest = dates[dates.len() - 1];
        assert!(oldest.checked_sub_days(Days::new(7)).is_none());
    }

    #[test]
    fn test_short_date() {
        assert_eq!(short_date("2024-01-08T00:00:00+01:00"), "2024-01-08");
        assert_eq!(short_date("2024-01-08"), "2024-01-08");
        assert_eq!(short_date(""), "");
    }
}
