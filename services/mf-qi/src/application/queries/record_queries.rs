//! 检验记录查询

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::enums::{PartName, Shift};
use crate::domain::services::{CumulativeSeed, SectionView};
use crate::domain::value_objects::{InspectionData, InspectionRecordId, RecordKey};

/// 加载录入表单查询
#[derive(Debug, Clone)]
pub struct LoadEntryQuery {
    pub date: NaiveDate,
    pub part_name: PartName,
    pub shift: Shift,
}

impl LoadEntryQuery {
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.date, self.part_name, self.shift)
    }
}

/// 表单模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryMode {
    Create,
    Edit,
}

/// 录入表单
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryForm {
    pub mode: EntryMode,
    pub record_id: Option<InspectionRecordId>,
    pub data: InspectionData,
    pub seed: CumulativeSeed,
    pub layout: Vec<SectionView>,
}

/// 结转种子查询
#[derive(Debug, Clone)]
pub struct CarryForwardQuery {
    pub date: NaiveDate,
    pub part_name: PartName,
    pub shift: Shift,
}
