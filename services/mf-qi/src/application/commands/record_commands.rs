//! 检验记录命令

use chrono::NaiveDate;

use crate::domain::entities::InspectionRecord;
use crate::domain::enums::{PartName, Shift};
use crate::domain::value_objects::{InspectionData, InspectionRecordId, RecordKey};

/// 保存录入命令：按 (日期, 零件, 班次) 新建或覆盖
#[derive(Debug, Clone)]
pub struct SaveEntryCommand {
    pub date: NaiveDate,
    pub part_name: PartName,
    pub shift: Shift,
    pub data: InspectionData,
}

impl SaveEntryCommand {
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.date, self.part_name, self.shift)
    }
}

/// 保存结果
#[derive(Debug, Clone)]
pub struct SaveEntryOutcome {
    pub record: InspectionRecord,
    /// 新建为 true，覆盖为 false
    pub created: bool,
}

/// 删除记录命令
#[derive(Debug, Clone)]
pub struct DeleteRecordCommand {
    pub id: InspectionRecordId,
}

/// 清空结果
#[derive(Debug, Clone)]
pub struct ClearRecordsOutcome {
    pub deleted: u64,
    pub message: String,
}
