// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::{Date, Month};

pub fn shift_date_by_days(date: Date, days: i64) -> Option<Date> {
    date.checked_add(time::Duration::days(days))
}

pub fn shift_date_by_years(date: Date, years: i32) -> Option<Date> {
    shift_date_by_months(date, years.saturating_mul(12))
}

/// Moves by calendar months, clamping the day to the target month's length
/// (Jan 31 + 1 month is Feb 28/29).
pub fn shift_date_by_months(date: Date, months: i32) -> Option<Date> {
    let base_month = i32::from(date.month() as u8);
    let total_month = base_month - 1 + months;
    let year = date.year() + total_month.div_euclid(12);
    let month_number = (total_month.rem_euclid(12) + 1) as u8;
    let month = Month::try_from(month_number).ok()?;
    let max_day = last_day_of_month(year, month)?;
    Date::from_calendar_date(year, month, date.day().min(max_day)).ok()
}

pub fn last_day_of_month(year: i32, month: Month) -> Option<u8> {
    let (next_year, next_month) = if month == Month::December {
        (year + 1, Month::January)
    } else {
        (year, Month::try_from((month as u8) + 1).ok()?)
    };

    let first_next_month = Date::from_calendar_date(next_year, next_month, 1).ok()?;
    let last = first_next_month - time::Duration::days(1);
    Some(last.day())
}

#[cfg(test)]
mod tests {
    use super::{last_day_of_month, shift_date_by_days, shift_date_by_months, shift_date_by_years};
    use time::{Date, Month};

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).expect("valid date")
    }

    #[test]
    fn month_shift_clamps_to_shorter_month() {
        assert_eq!(
            shift_date_by_months(date(2026, Month::January, 31), 1),
            Some(date(2026, Month::February, 28))
        );
        assert_eq!(
            shift_date_by_months(date(2028, Month::January, 31), 1),
            Some(date(2028, Month::February, 29))
        );
    }

    #[test]
    fn month_shift_crosses_year_boundaries_both_ways() {
        assert_eq!(
            shift_date_by_months(date(2026, Month::December, 15), 1),
            Some(date(2027, Month::January, 15))
        );
        assert_eq!(
            shift_date_by_months(date(2026, Month::January, 15), -1),
            Some(date(2025, Month::December, 15))
        );
    }

    #[test]
    fn year_shift_handles_leap_day() {
        assert_eq!(
            shift_date_by_years(date(2028, Month::February, 29), 1),
            Some(date(2029, Month::February, 28))
        );
    }

    #[test]
    fn day_shift_walks_across_months() {
        assert_eq!(
            shift_date_by_days(date(2026, Month::March, 30), 3),
            Some(date(2026, Month::April, 2))
        );
    }

    #[test]
    fn last_day_of_december() {
        assert_eq!(last_day_of_month(2026, Month::December), Some(31));
    }
}
