//! 检验记录聚合根

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use zen_common::{AuditInfo, UserId};
use zen_domain_core::{AggregateRoot, Entity, Keyed};

use crate::domain::enums::{PartName, Shift};
use crate::domain::value_objects::{InspectionData, InspectionRecordId, RecordKey};

/// 检验记录
///
/// 某零件在某日某班次的全部计数。业务上以 (date, part_name, shift) 唯一，
/// 已存在时整体覆盖（后写覆盖先写）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionRecord {
    id: InspectionRecordId,
    pub date: NaiveDate,
    pub part_name: PartName,
    pub shift: Shift,
    #[serde(flatten)]
    pub data: InspectionData,
    #[serde(default)]
    audit_info: AuditInfo,
}

impl InspectionRecord {
    /// 新建记录
    pub fn new(key: RecordKey, data: InspectionData, created_by: Option<UserId>) -> Self {
        Self {
            id: InspectionRecordId::new(),
            date: key.date,
            part_name: key.part_name,
            shift: key.shift,
            data,
            audit_info: AuditInfo::new(created_by),
        }
    }

    /// 从存储重建
    pub fn restore(
        id: InspectionRecordId,
        key: RecordKey,
        data: InspectionData,
        audit_info: AuditInfo,
    ) -> Self {
        Self {
            id,
            date: key.date,
            part_name: key.part_name,
            shift: key.shift,
            data,
            audit_info,
        }
    }

    /// 时间顺序键：先比日期，同日 A 早于 B
    pub fn chronological_key(&self) -> (NaiveDate, Shift) {
        (self.date, self.shift)
    }

    /// 整体替换检验数据
    pub fn replace_data(&mut self, data: InspectionData, updated_by: Option<UserId>) {
        self.data = data;
        self.touch(updated_by);
    }
}

impl Entity for InspectionRecord {
    type Id = InspectionRecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Keyed for InspectionRecord {
    type Key = RecordKey;

    fn key(&self) -> RecordKey {
        RecordKey::new(self.date, self.part_name, self.shift)
    }
}

impl AggregateRoot for InspectionRecord {
    fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    fn audit_info_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit_info
    }
}

/// 快照顺序：日期倒序，同日 B 在 A 之前
pub fn sort_newest_first(records: &mut [InspectionRecord]) {
    records.sort_by(|a, b| b.chronological_key().cmp(&a.chronological_key()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day: u32, shift: Shift) -> InspectionRecord {
        let date = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        InspectionRecord::new(
            RecordKey::new(date, PartName::InputShaft, shift),
            InspectionData::default(),
            None,
        )
    }

    #[test]
    fn test_sort_newest_first() {
        let mut records = vec![record(1, Shift::B), record(2, Shift::A), record(2, Shift::B), record(1, Shift::A)];
        sort_newest_first(&mut records);

        let keys: Vec<_> = records.iter().map(|r| (r.date.format("%d").to_string(), r.shift)).collect();
        assert_eq!(
            keys,
            vec![
                ("02".to_string(), Shift::B),
                ("02".to_string(), Shift::A),
                ("01".to_string(), Shift::B),
                ("01".to_string(), Shift::A),
            ]
        );
    }

    #[test]
    fn test_json_shape_is_flat() {
        let value = serde_json::to_value(record(3, Shift::A)).unwrap();
        assert_eq!(value["date"], "2024-06-03");
        assert_eq!(value["partName"], "Input shaft");
        assert_eq!(value["shift"], "A");
        assert_eq!(value["finalInspection"]["visual"]["visualDone"], 0);
        assert!(value["rejections"].as_array().unwrap().is_empty());
    }
}
