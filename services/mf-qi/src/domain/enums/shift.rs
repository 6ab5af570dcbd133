//! 班次枚举

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zen_errors::AppError;

/// 班次，同一天内 A 早于 B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Shift {
    A,
    B,
}

impl Shift {
    pub const ALL: [Shift; 2] = [Shift::A, Shift::B];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::A => "A",
            Shift::B => "B",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shift {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" | "a" => Ok(Shift::A),
            "B" | "b" => Ok(Shift::B),
            _ => Err(AppError::validation(format!("Unknown shift: {}", s))),
        }
    }
}
