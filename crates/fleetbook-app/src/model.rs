// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;
use time::macros::format_description;

use crate::ids::CarId;

pub const YEAR_HINT_MIN: i32 = 1900;
pub const YEAR_HINT_MAX: i32 = 2100;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleRole {
    #[serde(rename = "VM")]
    Vm,
    #[serde(rename = "User")]
    User,
}

impl VehicleRole {
    pub const ALL: [Self; 2] = [Self::Vm, Self::User];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vm => "VM",
            Self::User => "User",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "vm" => Some(Self::Vm),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    #[serde(rename = "carID")]
    pub car_id: CarId,
    #[serde(rename = "carName")]
    pub car_name: String,
    pub year: i32,
    pub role: VehicleRole,
    #[serde(with = "iso_date::option", default)]
    pub date: Option<Date>,
}

impl VehicleRecord {
    pub fn year_in_hint_range(&self) -> bool {
        (YEAR_HINT_MIN..=YEAR_HINT_MAX).contains(&self.year)
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    Japanese,
}

impl Language {
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Japanese => "jp",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Self::English),
            "jp" | "ja" | "japanese" => Some(Self::Japanese),
            _ => None,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::English => Self::Japanese,
            Self::Japanese => Self::English,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormMode {
    Create,
    Edit(CarId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Login,
    Vehicles,
    Form(FormMode),
}
