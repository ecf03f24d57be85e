// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;
use tracing::info;

use crate::dates::{shift_date_by_days, shift_date_by_months, shift_date_by_years};
use crate::{
    AppError, CarId, FormMode, RecordPatch, RecordStore, VehicleRecord, VehicleRole,
    YEAR_HINT_MAX, YEAR_HINT_MIN, format_date, parse_date,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    CarId,
    CarName,
    Year,
    Role,
    Date,
}

impl FormField {
    pub const ALL: [Self; 5] = [
        Self::CarId,
        Self::CarName,
        Self::Year,
        Self::Role,
        Self::Date,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::CarId => "car id",
            Self::CarName => "car name",
            Self::Year => "year",
            Self::Role => "role",
            Self::Date => "date",
        }
    }
}

/// Date picker attached to the form's date field. Moving the cursor never
/// touches the draft; only `pick` and `clear` do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePicker {
    original: Option<Date>,
    cursor: Date,
}

impl DatePicker {
    pub fn open(original: Option<Date>, today: Date) -> Self {
        Self {
            original,
            cursor: original.unwrap_or(today),
        }
    }

    pub fn original(&self) -> Option<Date> {
        self.original
    }

    pub fn cursor(&self) -> Date {
        self.cursor
    }

    pub fn shift_days(&mut self, days: i64) {
        if let Some(next) = shift_date_by_days(self.cursor, days) {
            self.cursor = next;
        }
    }

    pub fn shift_months(&mut self, months: i32) {
        if let Some(next) = shift_date_by_months(self.cursor, months) {
            self.cursor = next;
        }
    }

    pub fn shift_years(&mut self, years: i32) {
        if let Some(next) = shift_date_by_years(self.cursor, years) {
            self.cursor = next;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailForm {
    mode: FormMode,
    draft: VehicleRecord,
    date_picker: Option<DatePicker>,
}

impl DetailForm {
    pub fn create(suggested_id: CarId, current_year: i32) -> Self {
        Self {
            mode: FormMode::Create,
            draft: VehicleRecord {
                car_id: suggested_id,
                car_name: String::new(),
                year: current_year,
                role: VehicleRole::User,
                date: None,
            },
            date_picker: None,
        }
    }

    pub fn edit(record: &VehicleRecord) -> Self {
        Self {
            mode: FormMode::Edit(record.car_id),
            draft: record.clone(),
            date_picker: None,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &VehicleRecord {
        &self.draft
    }

    pub fn field_text(&self, field: FormField) -> String {
        match field {
            FormField::CarId => self.draft.car_id.to_string(),
            FormField::CarName => self.draft.car_name.clone(),
            FormField::Year => self.draft.year.to_string(),
            FormField::Role => self.draft.role.as_str().to_owned(),
            FormField::Date => self.draft.date.map(format_date).unwrap_or_default(),
        }
    }

    /// Parses `raw` into `field`. On error the draft is unchanged.
    pub fn patch_field(&mut self, field: FormField, raw: &str) -> Result<(), AppError> {
        match field {
            FormField::CarId => {
                self.draft.car_id =
                    CarId::parse(raw).ok_or_else(|| AppError::invalid_field("car id", raw))?;
            }
            FormField::CarName => {
                self.draft.car_name = raw.trim().to_owned();
            }
            FormField::Year => {
                self.draft.year = raw
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| AppError::invalid_field("year", raw))?;
            }
            FormField::Role => {
                self.draft.role =
                    VehicleRole::parse(raw).ok_or_else(|| AppError::invalid_field("role", raw))?;
            }
            FormField::Date => {
                self.draft.date = if raw.trim().is_empty() {
                    None
                } else {
                    Some(parse_date(raw).ok_or_else(|| AppError::invalid_field("date", raw))?)
                };
            }
        }
        Ok(())
    }

    pub fn set_role(&mut self, role: VehicleRole) {
        self.draft.role = role;
    }

    pub fn date_picker(&self) -> Option<&DatePicker> {
        self.date_picker.as_ref()
    }

    pub fn date_picker_mut(&mut self) -> Option<&mut DatePicker> {
        self.date_picker.as_mut()
    }

    pub fn open_date_picker(&mut self, today: Date) -> &mut DatePicker {
        self.date_picker
            .insert(DatePicker::open(self.draft.date, today))
    }

    /// Writes the picker cursor into the draft and closes the picker.
    pub fn pick_date(&mut self) -> Option<Date> {
        let picker = self.date_picker.take()?;
        self.draft.date = Some(picker.cursor);
        self.draft.date
    }

    pub fn clear_date(&mut self) {
        self.date_picker = None;
        self.draft.date = None;
    }

    pub fn cancel_date_picker(&mut self) {
        self.date_picker = None;
    }

    /// Findings that do not block submission.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.draft.car_name.trim().is_empty() {
            warnings.push("car name is empty".to_owned());
        }
        if !self.draft.year_in_hint_range() {
            warnings.push(format!(
                "year {} is outside {YEAR_HINT_MIN}-{YEAR_HINT_MAX}",
                self.draft.year
            ));
        }
        warnings
    }

    /// Writes the draft back through the store. The store is untouched on
    /// error.
    pub fn submit(&self, store: &mut RecordStore) -> Result<CarId, AppError> {
        match self.mode {
            FormMode::Create => {
                store.add(self.draft.clone())?;
            }
            FormMode::Edit(original) => {
                store.update(original, RecordPatch::replace_all(&self.draft))?;
            }
        }
        info!(car_id = %self.draft.car_id, mode = ?self.mode, "form submitted");
        Ok(self.draft.car_id)
    }
}
