//! 记录业务键

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::enums::{PartName, Shift};

/// (日期, 零件, 班次) 唯一标识一条检验记录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordKey {
    pub date: NaiveDate,
    pub part_name: PartName,
    pub shift: Shift,
}

impl RecordKey {
    pub fn new(date: NaiveDate, part_name: PartName, shift: Shift) -> Self {
        Self {
            date,
            part_name,
            shift,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / shift {}", self.date, self.part_name, self.shift)
    }
}
