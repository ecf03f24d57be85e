// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use time::{Date, OffsetDateTime};
use tracing::debug;

use crate::dates::shift_date_by_months;
use crate::{CarId, RecordStore, VehicleRecord, format_date};

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Which dates count as "upcoming". The two policies disagree near the
/// edges and are kept separate on purpose: `Days` is inclusive on both ends
/// and counts whole calendar days from today. `NextMonth` compares instants:
/// a date's midnight must fall strictly after `now` and strictly before `now`
/// moved one calendar month forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationWindow {
    Days(u32),
    NextMonth,
}

impl Default for NotificationWindow {
    fn default() -> Self {
        Self::Days(DEFAULT_WINDOW_DAYS)
    }
}

impl NotificationWindow {
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim().to_ascii_lowercase();
        if value == "month" {
            return Some(Self::NextMonth);
        }
        value
            .strip_suffix('d')
            .and_then(|days| days.parse::<u32>().ok())
            .map(Self::Days)
    }

    pub fn contains(self, date: Date, now: OffsetDateTime) -> bool {
        match self {
            Self::Days(days) => {
                let diff = (date - now.date()).whole_days();
                (0..=i64::from(days)).contains(&diff)
            }
            Self::NextMonth => {
                let Some(limit_day) = shift_date_by_months(now.date(), 1) else {
                    return false;
                };
                let limit = limit_day.with_time(now.time()).assume_offset(now.offset());
                let starts = date.midnight().assume_offset(now.offset());
                now < starts && starts < limit
            }
        }
    }
}

impl fmt::Display for NotificationWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(days) => write!(f, "{days}d"),
            Self::NextMonth => f.write_str("month"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub car_id: CarId,
    pub message: String,
}

impl Notification {
    fn for_record(record: &VehicleRecord, date: Date) -> Self {
        Self {
            car_id: record.car_id,
            message: format!("Car {} date is near ({})", record.car_id, format_date(date)),
        }
    }
}

/// Records whose date falls inside `window`, in store order.
pub fn scan_notifications(
    records: &[VehicleRecord],
    now: OffsetDateTime,
    window: NotificationWindow,
) -> Vec<Notification> {
    records
        .iter()
        .filter_map(|record| {
            let date = record.date?;
            window
                .contains(date, now)
                .then(|| Notification::for_record(record, date))
        })
        .collect()
}

/// Latest scan result. Each refresh replaces the whole list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationBoard {
    items: Vec<Notification>,
    scanned_revision: Option<u64>,
}

impl NotificationBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rescans unconditionally. Returns whether the list changed.
    pub fn refresh(
        &mut self,
        store: &RecordStore,
        now: OffsetDateTime,
        window: NotificationWindow,
    ) -> bool {
        let next = scan_notifications(store.list(), now, window);
        self.scanned_revision = Some(store.revision());
        if next == self.items {
            return false;
        }
        debug!(count = next.len(), %window, "notifications changed");
        self.items = next;
        true
    }

    /// Rescans only when the store changed since the last scan.
    pub fn refresh_if_stale(
        &mut self,
        store: &RecordStore,
        now: OffsetDateTime,
        window: NotificationWindow,
    ) -> bool {
        if self.scanned_revision == Some(store.revision()) {
            return false;
        }
        self.refresh(store, now, window)
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Notification> {
        self.items.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationBoard, NotificationWindow, scan_notifications};
    use crate::{CarId, RecordPatch, RecordStore, VehicleRecord, VehicleRole};
    use time::{Date, Month, OffsetDateTime, Time};

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).expect("valid date")
    }

    fn noon(day: Date) -> OffsetDateTime {
        day.with_time(Time::from_hms(12, 0, 0).expect("valid time"))
            .assume_utc()
    }

    fn record(id: i64, name: &str, day: Option<Date>) -> VehicleRecord {
        VehicleRecord {
            car_id: CarId::new(id),
            car_name: name.to_owned(),
            year: 2021,
            role: VehicleRole::Vm,
            date: day,
        }
    }

    #[test]
    fn window_parse_accepts_days_and_month() {
        assert_eq!(
            NotificationWindow::parse("7d"),
            Some(NotificationWindow::Days(7))
        );
        assert_eq!(
            NotificationWindow::parse(" Month "),
            Some(NotificationWindow::NextMonth)
        );
        assert_eq!(NotificationWindow::parse("7"), None);
        assert_eq!(NotificationWindow::parse("-1d"), None);
        assert_eq!(NotificationWindow::default().to_string(), "7d");
    }

    #[test]
    fn day_window_is_inclusive_on_both_ends() {
        let today = date(2026, Month::October, 16);
        let now = noon(today);
        let window = NotificationWindow::Days(7);
        assert!(window.contains(today, now));
        assert!(window.contains(date(2026, Month::October, 23), now));
        assert!(!window.contains(date(2026, Month::October, 24), now));
        assert!(!window.contains(date(2026, Month::October, 15), now));
    }

    #[test]
    fn month_window_excludes_today_and_clamps_the_limit() {
        let today = date(2026, Month::January, 31);
        let now = noon(today);
        let window = NotificationWindow::NextMonth;
        assert!(!window.contains(today, now));
        assert!(window.contains(date(2026, Month::February, 1), now));
        assert!(window.contains(date(2026, Month::February, 28), now));
        assert!(!window.contains(date(2026, Month::March, 1), now));
    }

    #[test]
    fn month_window_includes_the_boundary_day_after_midnight() {
        let records = vec![record(1, "Civic", Some(date(2026, Month::February, 15)))];
        let hits = scan_notifications(
            &records,
            noon(date(2026, Month::January, 15)),
            NotificationWindow::NextMonth,
        );
        assert_eq!(hits.len(), 1);

        let at_midnight = date(2026, Month::January, 15).midnight().assume_utc();
        let window = NotificationWindow::NextMonth;
        assert!(!window.contains(date(2026, Month::February, 15), at_midnight));
        assert!(window.contains(date(2026, Month::February, 14), at_midnight));
    }

    #[test]
    fn scan_includes_upcoming_record_then_drops_it_once_past() {
        let t = date(2026, Month::March, 1);
        let records = vec![record(1, "Civic", Some(date(2026, Month::March, 4)))];

        let upcoming = scan_notifications(&records, noon(t), NotificationWindow::Days(7));
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].car_id, CarId::new(1));
        assert_eq!(upcoming[0].message, "Car 1 date is near (2026-03-04)");

        let later = scan_notifications(
            &records,
            noon(date(2026, Month::March, 11)),
            NotificationWindow::Days(7),
        );
        assert!(later.is_empty());
    }

    #[test]
    fn scan_preserves_store_order_and_skips_undated_records() {
        let today = date(2026, Month::June, 10);
        let records = vec![
            record(9, "Prius", Some(date(2026, Month::June, 12))),
            record(2, "Fit", None),
            record(4, "Civic", Some(date(2026, Month::June, 11))),
        ];
        let ids: Vec<CarId> = scan_notifications(&records, noon(today), NotificationWindow::Days(7))
            .into_iter()
            .map(|n| n.car_id)
            .collect();
        assert_eq!(ids, vec![CarId::new(9), CarId::new(4)]);
    }

    #[test]
    fn board_refresh_is_idempotent_and_replaces_wholesale() {
        let today = date(2026, Month::June, 10);
        let mut store = RecordStore::from_records(vec![
            record(1, "Civic", Some(date(2026, Month::June, 12))),
            record(2, "Accord", Some(date(2026, Month::June, 13))),
        ])
        .expect("seed");
        let mut board = NotificationBoard::new();

        assert!(board.refresh(&store, noon(today), NotificationWindow::Days(7)));
        let first = board.items().to_vec();
        assert!(!board.refresh(&store, noon(today), NotificationWindow::Days(7)));
        assert_eq!(board.items(), first.as_slice());

        store
            .update(
                CarId::new(1),
                RecordPatch {
                    date: Some(None),
                    ..RecordPatch::default()
                },
            )
            .expect("clear date");
        assert!(board.refresh_if_stale(&store, noon(today), NotificationWindow::Days(7)));
        assert_eq!(board.len(), 1);
        assert_eq!(board.get(0).map(|n| n.car_id), Some(CarId::new(2)));
    }

    #[test]
    fn refresh_if_stale_skips_unchanged_store() {
        let today = date(2026, Month::June, 10);
        let store = RecordStore::from_records(vec![record(
            1,
            "Civic",
            Some(date(2026, Month::June, 12)),
        )])
        .expect("seed");
        let mut board = NotificationBoard::new();
        assert!(board.refresh_if_stale(&store, noon(today), NotificationWindow::Days(7)));
        assert!(!board.refresh_if_stale(&store, noon(today), NotificationWindow::Days(7)));
    }
}
