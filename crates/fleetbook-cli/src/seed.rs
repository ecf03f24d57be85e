// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use fleetbook_app::{RecordStore, VehicleRecord};
use std::fs;
use std::path::Path;
use tracing::info;

const BUNDLED_SEED: &str = include_str!("../data/vehicles.json");

pub fn parse_seed(raw: &str) -> Result<Vec<VehicleRecord>> {
    serde_json::from_str(raw).context("decode vehicle JSON array")
}

/// Builds the store from `path`, or from the bundled sample when `None`.
pub fn load_seed(path: Option<&Path>) -> Result<RecordStore> {
    let (raw, source) = match path {
        Some(path) => (
            fs::read_to_string(path)
                .with_context(|| format!("read seed file {}", path.display()))?,
            path.display().to_string(),
        ),
        None => (BUNDLED_SEED.to_owned(), "bundled dataset".to_owned()),
    };

    let records = parse_seed(&raw).with_context(|| format!("parse seed data from {source}"))?;
    let store = RecordStore::from_records(records)
        .with_context(|| format!("load seed data from {source}"))?;
    info!(count = store.len(), %source, "seed data loaded");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::{load_seed, parse_seed};
    use crate::logging::{Verbosity, file_subscriber};
    use anyhow::Result;
    use fleetbook_app::{CarId, VehicleRole};
    use fleetbook_testkit::{fixture_date, temp_file};
    use time::Month;

    #[test]
    fn bundled_dataset_loads() -> Result<()> {
        let store = load_seed(None)?;
        assert!(store.len() >= 20);
        assert!(store.list().iter().all(|record| record.year_in_hint_range()));
        Ok(())
    }

    #[test]
    fn parse_seed_reads_wire_field_names() -> Result<()> {
        let records = parse_seed(
            r#"[{"carID": 7, "carName": "Civic", "year": 2019, "role": "VM", "date": "2026-03-04"},
                {"carID": 8, "carName": "Fit", "year": 2021, "role": "User", "date": null}]"#,
        )?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].car_id, CarId::new(7));
        assert_eq!(records[0].role, VehicleRole::Vm);
        assert_eq!(records[0].date, Some(fixture_date(2026, Month::March, 4)));
        assert_eq!(records[1].date, None);
        Ok(())
    }

    #[test]
    fn duplicate_ids_fail_with_source_in_message() -> Result<()> {
        let (_dir, path) = temp_file(
            "dup.json",
            r#"[{"carID": 1, "carName": "A", "year": 2020, "role": "User"},
                {"carID": 1, "carName": "B", "year": 2020, "role": "User"}]"#,
        )?;
        let error = load_seed(Some(&path)).expect_err("duplicate id should fail");
        let message = format!("{error:#}");
        assert!(message.contains("dup.json"));
        assert!(message.contains("car 1 already exists"));
        Ok(())
    }

    #[test]
    fn malformed_seed_file_is_reported() -> Result<()> {
        let (_dir, path) = temp_file("bad.json", "{not json")?;
        let error = load_seed(Some(&path)).expect_err("bad json should fail");
        assert!(format!("{error:#}").contains("parse seed data"));
        Ok(())
    }

    #[test]
    fn seed_loading_is_recorded_once_logging_is_installed() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let log_path = temp.path().join("fleetbook.log");
        let subscriber = file_subscriber(&log_path, "debug", Verbosity::Normal)?;

        let store = tracing::subscriber::with_default(subscriber, || load_seed(None))?;
        let logged = std::fs::read_to_string(&log_path)?;
        assert!(logged.contains("seed data loaded"));
        assert!(logged.contains(&format!("count={}", store.len())));
        Ok(())
    }

    #[test]
    fn missing_seed_file_is_reported() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let error = load_seed(Some(&temp.path().join("absent.json"))).expect_err("no file");
        assert!(error.to_string().contains("read seed file"));
        Ok(())
    }
}
