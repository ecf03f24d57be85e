// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

use crate::ids::CarId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("car {0} not found")]
    NotFound(CarId),

    #[error("car {0} already exists -- choose a different car id")]
    DuplicateKey(CarId),

    #[error("no row selected -- select a row and retry")]
    InvalidSelection,

    #[error("invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

impl AppError {
    pub fn invalid_field(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            value: value.into(),
        }
    }
}
