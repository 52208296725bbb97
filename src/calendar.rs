//! Month calendar math for laying postings out by closing date.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::api::JobPostSummary;

/// Days of padding searched on each side of a month so the leading and
/// trailing cells of the grid are populated too.
pub const SEARCH_PADDING_DAYS: i64 = 7;

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let into_next_month = first_day_of_month(date) + Duration::days(31);
    first_day_of_month(into_next_month) - Duration::days(1)
}

/// First instant and last millisecond of the month containing `date`.
pub fn month_range(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = first_day_of_month(date).and_time(NaiveTime::MIN);
    let end = (last_day_of_month(date) + Duration::days(1)).and_time(NaiveTime::MIN)
        - Duration::milliseconds(1);
    (start, end)
}

/// `YYYY-MM-DD`, the format the search endpoint expects.
pub fn format_date_for_api(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Every cell of a Sunday-first month grid: trailing days of the previous
/// month, the month itself, then leading days of the next month.
pub fn calendar_days(date: NaiveDate) -> Vec<NaiveDate> {
    let first = first_day_of_month(date);
    let last = last_day_of_month(date);
    let leading = i64::from(first.weekday().num_days_from_sunday());
    let trailing = 6 - i64::from(last.weekday().num_days_from_sunday());
    let start = first - Duration::days(leading);
    let end = last + Duration::days(trailing);
    start.iter_days().take_while(|day| *day <= end).collect()
}

/// Date bounds to search for the month grid around `date`.
pub fn search_window(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    (
        first_day_of_month(date) - Duration::days(SEARCH_PADDING_DAYS),
        last_day_of_month(date) + Duration::days(SEARCH_PADDING_DAYS),
    )
}

/// Bucket postings by the day they close.
pub fn group_by_closing_day(posts: &[JobPostSummary]) -> BTreeMap<NaiveDate, Vec<&JobPostSummary>> {
    let mut days: BTreeMap<NaiveDate, Vec<&JobPostSummary>> = BTreeMap::new();
    for post in posts {
        days.entry(post.closing_date_time.date()).or_default().push(post);
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::JobStatus;
    use chrono::Weekday;
    use pretty_assertions::assert_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_bounds() {
        assert_eq!(first_day_of_month(day(2025, 2, 17)), day(2025, 2, 1));
        assert_eq!(last_day_of_month(day(2024, 2, 10)), day(2024, 2, 29));
        assert_eq!(last_day_of_month(day(2025, 12, 31)), day(2025, 12, 31));
        let (start, end) = month_range(day(2025, 9, 15));
        assert_eq!(start.to_string(), "2025-09-01 00:00:00");
        assert_eq!(end.to_string(), "2025-09-30 23:59:59.999");
    }

    #[test]
    fn grid_is_whole_weeks_starting_sunday() {
        for month in 1..=12 {
            let days = calendar_days(day(2025, month, 1));
            assert_eq!(days.len() % 7, 0, "month {month}");
            assert_eq!(days[0].weekday(), Weekday::Sun);
            assert_eq!(days[days.len() - 1].weekday(), Weekday::Sat);
            assert!(days.contains(&day(2025, month, 1)));
        }
    }

    #[test]
    fn september_2025_grid() {
        // 2025-09-01 is a Monday; 2025-09-30 is a Tuesday.
        let days = calendar_days(day(2025, 9, 10));
        assert_eq!(days.first(), Some(&day(2025, 8, 31)));
        assert_eq!(days.last(), Some(&day(2025, 10, 4)));
        assert_eq!(days.len(), 35);
    }

    #[test]
    fn search_window_pads_a_week() {
        assert_eq!(
            search_window(day(2025, 9, 10)),
            (day(2025, 8, 25), day(2025, 10, 7))
        );
        assert_eq!(format_date_for_api(day(2025, 1, 5)), "2025-01-05");
    }

    #[test]
    fn grouping_by_closing_day() {
        let post = |id: i64, d: u32| JobPostSummary {
            id,
            company_name: "Acme".to_string(),
            title: "Role".to_string(),
            status: JobStatus::Saved,
            closing_date_time: day(2025, 9, d).and_hms_opt(18, 0, 0).unwrap(),
            created_at: day(2025, 9, 1).and_hms_opt(9, 0, 0).unwrap(),
            updated_at: day(2025, 9, 1).and_hms_opt(9, 0, 0).unwrap(),
        };
        let posts = vec![post(1, 12), post(2, 3), post(3, 12)];
        let grouped = group_by_closing_day(&posts);
        let ids: Vec<(NaiveDate, Vec<i64>)> = grouped
            .iter()
            .map(|(d, posts)| (*d, posts.iter().map(|p| p.id).collect()))
            .collect();
        assert_eq!(ids, vec![(day(2025, 9, 3), vec![2]), (day(2025, 9, 12), vec![1, 3])]);
    }
}
