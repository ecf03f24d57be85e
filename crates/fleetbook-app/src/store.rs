// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;
use tracing::{debug, info};

use crate::{AppError, CarId, VehicleRecord, VehicleRole};

/// Field replacements applied by [`RecordStore::update`]. `None` keeps the
/// current value; `date: Some(None)` clears the date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub car_id: Option<CarId>,
    pub car_name: Option<String>,
    pub year: Option<i32>,
    pub role: Option<VehicleRole>,
    pub date: Option<Option<Date>>,
}

impl RecordPatch {
    pub fn replace_all(record: &VehicleRecord) -> Self {
        Self {
            car_id: Some(record.car_id),
            car_name: Some(record.car_name.clone()),
            year: Some(record.year),
            role: Some(record.role),
            date: Some(record.date),
        }
    }

    fn apply_to(&self, record: &mut VehicleRecord) {
        if let Some(car_id) = self.car_id {
            record.car_id = car_id;
        }
        if let Some(car_name) = &self.car_name {
            record.car_name = car_name.clone();
        }
        if let Some(year) = self.year {
            record.year = year;
        }
        if let Some(role) = self.role {
            record.role = role;
        }
        if let Some(date) = self.date {
            record.date = date;
        }
    }
}

/// Ordered, in-memory vehicle records with unique ids.
///
/// Every mutation checks its preconditions before writing, so a failed call
/// leaves the store exactly as it was. `update` and `remove` are strict: an
/// unknown id is [`AppError::NotFound`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<VehicleRecord>,
    revision: u64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<VehicleRecord>) -> Result<Self, AppError> {
        let mut store = Self::new();
        for record in records {
            if store.contains(record.car_id) {
                return Err(AppError::DuplicateKey(record.car_id));
            }
            store.records.push(record);
        }
        debug!(count = store.records.len(), "record store seeded");
        Ok(store)
    }

    pub fn add(&mut self, record: VehicleRecord) -> Result<(), AppError> {
        if self.contains(record.car_id) {
            return Err(AppError::DuplicateKey(record.car_id));
        }
        info!(car_id = %record.car_id, car_name = %record.car_name, "record added");
        self.records.push(record);
        self.bump();
        Ok(())
    }

    pub fn update(
        &mut self,
        car_id: CarId,
        patch: RecordPatch,
    ) -> Result<&VehicleRecord, AppError> {
        let index = self.position(car_id).ok_or(AppError::NotFound(car_id))?;
        if let Some(next_id) = patch.car_id
            && next_id != car_id
            && self.contains(next_id)
        {
            return Err(AppError::DuplicateKey(next_id));
        }

        patch.apply_to(&mut self.records[index]);
        self.bump();
        let record = &self.records[index];
        info!(car_id = %car_id, new_car_id = %record.car_id, "record updated");
        Ok(record)
    }

    pub fn remove(&mut self, car_id: CarId) -> Result<VehicleRecord, AppError> {
        let index = self.position(car_id).ok_or(AppError::NotFound(car_id))?;
        let removed = self.records.remove(index);
        self.bump();
        info!(car_id = %car_id, "record removed");
        Ok(removed)
    }

    pub fn find(&self, car_id: CarId) -> Option<&VehicleRecord> {
        self.records.iter().find(|record| record.car_id == car_id)
    }

    pub fn contains(&self, car_id: CarId) -> bool {
        self.position(car_id).is_some()
    }

    pub fn list(&self) -> &[VehicleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn next_car_id(&self) -> CarId {
        let max = self
            .records
            .iter()
            .map(|record| record.car_id.get())
            .max()
            .unwrap_or(0);
        CarId::new(max.saturating_add(1))
    }

    /// Bumped on every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn position(&self, car_id: CarId) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.car_id == car_id)
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
