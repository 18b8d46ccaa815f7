//! Date-range arithmetic for stays and leave

use chrono::NaiveDate;

/// Nights in a half-open stay `[check_in, check_out)`
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days().max(0)
}

/// Half-open ranges `[a_in, a_out)` and `[b_in, b_out)` intersect
pub fn stays_overlap(
    a_in: NaiveDate,
    a_out: NaiveDate,
    b_in: NaiveDate,
    b_out: NaiveDate,
) -> bool {
    a_in < b_out && b_in < a_out
}

/// Days shared by two inclusive ranges `[a_start, a_end]` and `[b_start, b_end]`
pub fn overlap_days(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> i64 {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    if end < start {
        0
    } else {
        (end - start).num_days() + 1
    }
}

/// Nights of stay `[check_in, check_out)` falling on dates in `[from, to]`
pub fn nights_within(
    check_in: NaiveDate,
    check_out: NaiveDate,
    from: NaiveDate,
    to: NaiveDate,
) -> i64 {
    match check_out.pred_opt() {
        Some(last_night) if last_night >= check_in => {
            overlap_days(check_in, last_night, from, to)
        }
        _ => 0,
    }
}

/// Every date in `[from, to]`
pub fn each_day(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |d| *d <= to)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
    }

    #[test]
    fn test_back_to_back_stays_do_not_overlap() {
        assert!(!stays_overlap(d(1), d(3), d(3), d(5)));
        assert!(stays_overlap(d(1), d(4), d(3), d(5)));
        assert!(stays_overlap(d(2), d(3), d(1), d(10)));
    }

    #[test]
    fn test_nights_within_excludes_departure_day() {
        assert_eq!(nights(d(1), d(4)), 3);
        assert_eq!(nights_within(d(1), d(4), d(3), d(10)), 1);
        assert_eq!(nights_within(d(1), d(4), d(4), d(10)), 0);
        assert_eq!(nights_within(d(1), d(4), d(1), d(1)), 1);
    }

    #[test]
    fn test_each_day_is_inclusive() {
        assert_eq!(each_day(d(1), d(3)).count(), 3);
        assert_eq!(each_day(d(3), d(1)).count(), 0);
    }
}
