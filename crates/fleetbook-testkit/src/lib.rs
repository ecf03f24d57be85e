// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use fleetbook_app::{CarId, RecordStore, VehicleRecord, VehicleRole};
use std::path::PathBuf;
use time::{Date, Duration, Month, OffsetDateTime, Time};

const CAR_MAKES: [&str; 10] = [
    "Honda",
    "Toyota",
    "Nissan",
    "Mazda",
    "Subaru",
    "Suzuki",
    "Daihatsu",
    "Mitsubishi",
    "Lexus",
    "Isuzu",
];

const CAR_MODELS: [&str; 16] = [
    "Civic", "Accord", "Fit", "Corolla", "Prius", "Camry", "Leaf", "Note", "Demio", "CX-5",
    "Impreza", "Forester", "Swift", "Jimny", "Tanto", "Outlander",
];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Deterministic vehicle fixtures. The same seed always yields the same
/// records.
#[derive(Debug, Clone)]
pub struct VehicleFaker {
    rng: DeterministicRng,
    next_id: i64,
}

impl VehicleFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 1,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn car_name(&mut self) -> String {
        let make = self.pick(&CAR_MAKES);
        let model = self.pick(&CAR_MODELS);
        format!("{make} {model}")
    }

    /// A record with the next sequential id and a date within 60 days of
    /// [`fixture_now`], or no date at all.
    pub fn record(&mut self) -> VehicleRecord {
        let car_id = CarId::new(self.next_id);
        self.next_id += 1;
        let date = if self.rng.int_n(4) == 0 {
            None
        } else {
            let offset = self.int_range_i64(-10, 60);
            Some(fixture_now().date() + Duration::days(offset))
        };
        VehicleRecord {
            car_id,
            car_name: self.car_name(),
            year: self.int_range_i32(1995, REFERENCE_YEAR),
            role: if self.rng.bool() {
                VehicleRole::Vm
            } else {
                VehicleRole::User
            },
            date,
        }
    }

    pub fn records(&mut self, count: usize) -> Vec<VehicleRecord> {
        (0..count).map(|_| self.record()).collect()
    }

    pub fn store(&mut self, count: usize) -> Result<RecordStore> {
        RecordStore::from_records(self.records(count)).context("seed faker store")
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = i64::from(max) - i64::from(min) + 1;
        let offset = (self.rng.next_u64() % (span as u64)) as i64;
        (i64::from(min) + offset) as i32
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

pub fn record(id: i64, name: &str, date: Option<Date>) -> VehicleRecord {
    VehicleRecord {
        car_id: CarId::new(id),
        car_name: name.to_owned(),
        year: 2020,
        role: VehicleRole::User,
        date,
    }
}

/// Noon UTC on 2026-03-01.
pub fn fixture_now() -> OffsetDateTime {
    fixture_date(REFERENCE_YEAR, Month::March, 1)
        .with_time(Time::from_hms(12, 0, 0).expect("valid noon"))
        .assume_utc()
}

pub fn fixture_date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("valid calendar date")
}

pub fn days_from_now(days: i64) -> Date {
    fixture_now().date() + Duration::days(days)
}

pub fn temp_file(name: &str, content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join(name);
    std::fs::write(&path, content).with_context(|| format!("write {}", path.display()))?;
    Ok((dir, path))
}
