// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(i64);

impl CarId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse::<i64>().ok().map(Self)
    }
}

impl From<i64> for CarId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::CarId;

    #[test]
    fn parse_trims_and_rejects_non_numeric() {
        assert_eq!(CarId::parse(" 42 "), Some(CarId::new(42)));
        assert_eq!(CarId::parse("car-1"), None);
        assert_eq!(CarId::parse(""), None);
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&CarId::new(7)).expect("serialize id");
        assert_eq!(json, "7");
    }
}
