// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use fleetbook_app::{CarId, Notification, NotificationWindow, RecordStore};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::info;

/// In-memory session backing the UI. Each car is announced once while it
/// stays inside the notification window; leaving the window re-arms it.
pub struct SessionRuntime {
    store: RecordStore,
    window: NotificationWindow,
    poll_interval: Duration,
    announced: BTreeSet<CarId>,
}

impl SessionRuntime {
    pub fn new(store: RecordStore, window: NotificationWindow, poll_interval: Duration) -> Self {
        Self {
            store,
            window,
            poll_interval,
            announced: BTreeSet::new(),
        }
    }

    #[cfg(test)]
    fn announced(&self) -> &BTreeSet<CarId> {
        &self.announced
    }
}

impl fleetbook_tui::AppRuntime for SessionRuntime {
    fn store(&self) -> &RecordStore {
        &self.store
    }

    fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }

    fn notification_window(&self) -> NotificationWindow {
        self.window
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn publish_notifications(&mut self, notifications: &[Notification]) -> Result<()> {
        let current: BTreeSet<CarId> = notifications.iter().map(|item| item.car_id).collect();
        self.announced.retain(|car_id| current.contains(car_id));

        for item in notifications {
            if self.announced.insert(item.car_id) {
                info!(car_id = %item.car_id, message = %item.message, "upcoming deadline");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SessionRuntime;
    use anyhow::Result;
    use fleetbook_app::{CarId, Notification, NotificationWindow, RecordStore};
    use fleetbook_testkit::record;
    use fleetbook_tui::AppRuntime;
    use std::time::Duration;

    fn notice(id: i64) -> Notification {
        Notification {
            car_id: CarId::new(id),
            message: format!("Car {id} date is near (2026-03-04)"),
        }
    }

    #[test]
    fn announces_each_car_once_and_rearms_after_leaving() -> Result<()> {
        let mut runtime = SessionRuntime::new(
            RecordStore::new(),
            NotificationWindow::default(),
            Duration::from_secs(30),
        );

        runtime.publish_notifications(&[notice(1), notice(2)])?;
        runtime.publish_notifications(&[notice(1), notice(2)])?;
        assert_eq!(runtime.announced().len(), 2);

        runtime.publish_notifications(&[notice(2)])?;
        assert!(!runtime.announced().contains(&CarId::new(1)));
        runtime.publish_notifications(&[notice(1), notice(2)])?;
        assert!(runtime.announced().contains(&CarId::new(1)));
        Ok(())
    }

    #[test]
    fn exposes_configured_settings_and_store() -> Result<()> {
        let store = RecordStore::from_records(vec![record(1, "Civic", None)])?;
        let mut runtime = SessionRuntime::new(
            store,
            NotificationWindow::NextMonth,
            Duration::from_millis(250),
        );
        assert_eq!(runtime.notification_window(), NotificationWindow::NextMonth);
        assert_eq!(runtime.poll_interval(), Duration::from_millis(250));
        runtime.store_mut().remove(CarId::new(1))?;
        assert!(runtime.store().is_empty());
        Ok(())
    }
}
