// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

use crate::InternalEvent;

/// Background thread that posts [`InternalEvent::NotificationTick`] every
/// `interval`. Dropping the ticker stops the thread and waits for it.
#[derive(Debug)]
pub struct NotificationTicker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl NotificationTicker {
    pub fn start(interval: Duration, tx: Sender<InternalEvent>) -> Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("fleetbook-notify".to_owned())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            if tx.send(InternalEvent::NotificationTick).is_err() {
                                break;
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
            .context("spawn notification ticker")?;

        debug!(interval_ms = interval.as_millis() as u64, "notification ticker started");
        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }
}

impl Drop for NotificationTicker {
    fn drop(&mut self) {
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            debug!("notification ticker stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NotificationTicker;
    use crate::InternalEvent;
    use std::sync::mpsc::{self, TryRecvError};
    use std::time::Duration;

    #[test]
    fn ticks_until_dropped() -> anyhow::Result<()> {
        let (tx, rx) = mpsc::channel();
        let ticker = NotificationTicker::start(Duration::from_millis(5), tx)?;

        let first = rx.recv_timeout(Duration::from_secs(2))?;
        assert_eq!(first, InternalEvent::NotificationTick);

        drop(ticker);
        while rx.try_recv().is_ok() {}
        assert_eq!(rx.try_recv(), Err(TryRecvError::Disconnected));
        Ok(())
    }

    #[test]
    fn drop_before_first_tick_returns_promptly() -> anyhow::Result<()> {
        let (tx, rx) = mpsc::channel();
        let ticker = NotificationTicker::start(Duration::from_secs(3600), tx)?;
        drop(ticker);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Disconnected));
        Ok(())
    }
}
