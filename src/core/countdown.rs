use chrono::{Datelike, Days, NaiveDateTime, TimeDelta, Weekday};

/// Time from `now` until the next `weekday` at `hour`:00. Returns zero when
/// `now` is exactly the start time.
pub fn until_next(now: NaiveDateTime, weekday: Weekday, hour: u32) -> TimeDelta {
    let days_ahead = (7 + weekday.num_days_from_monday() - now.weekday().num_days_from_monday()) % 7;

    let start = now
        .date()
        .checked_add_days(Days::new(days_ahead.into()))
        .and_then(|date| date.and_hms_opt(hour.min(23), 0, 0));

    match start {
        Some(start) if start >= now => start - now,
        Some(start) => start + TimeDelta::days(7) - now,
        None => TimeDelta::zero(),
    }
}

pub fn format_countdown(remaining: TimeDelta) -> String {
    let total_minutes = remaining.num_minutes().max(0);
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;
    format!(
        "{} Days, {} Hours, {} Minutes Until Movie Time",
        days, hours, minutes
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_later_same_week() {
        // 2026-10-14 is a Wednesday.
        let now = at(2026, 10, 14, 18, 30);

        let remaining = until_next(now, Weekday::Fri, 19);

        assert_eq!(remaining, TimeDelta::days(2) + TimeDelta::minutes(30));
        assert_eq!(
            format_countdown(remaining),
            "2 Days, 0 Hours, 30 Minutes Until Movie Time"
        );
    }

    #[test]
    fn test_same_day_before_start() {
        let now = at(2026, 10, 16, 17, 15);

        assert_eq!(
            format_countdown(until_next(now, Weekday::Fri, 19)),
            "0 Days, 1 Hours, 45 Minutes Until Movie Time"
        );
    }

    #[test]
    fn test_same_day_after_start_wraps_a_week() {
        let now = at(2026, 10, 16, 20, 0);

        assert_eq!(
            until_next(now, Weekday::Fri, 19),
            TimeDelta::days(7) - TimeDelta::hours(1)
        );
    }

    #[test]
    fn test_exactly_at_start() {
        let now = at(2026, 10, 16, 19, 0);

        assert_eq!(until_next(now, Weekday::Fri, 19), TimeDelta::zero());
    }
}
