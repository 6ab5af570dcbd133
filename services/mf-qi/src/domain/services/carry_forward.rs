//! 累计值结转
//!
//! 某零件在 (date, shift) 的累计 RFD / 发运，取该零件时间上严格早于它的
//! 最后一条记录的累计值；同日只有更早的班次才算"之前"

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::entities::InspectionRecord;
use crate::domain::enums::{PartName, Shift};
use crate::domain::value_objects::{DispatchSection, RunningCount};

/// 结转种子
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CumulativeSeed {
    pub rfd: u64,
    pub dispatch: u64,
}

/// 目标 (date, shift) 之前最后一条记录的累计值，没有则为 (0, 0)
pub fn cumulative_before(
    records: &[InspectionRecord],
    part: PartName,
    date: NaiveDate,
    shift: Shift,
) -> CumulativeSeed {
    let mut part_records: Vec<&InspectionRecord> =
        records.iter().filter(|r| r.part_name == part).collect();
    part_records.sort_by_key(|r| r.chronological_key());

    part_records
        .iter()
        .rev()
        .find(|r| r.date < date || (r.date == date && r.shift < shift))
        .map(|r| CumulativeSeed {
            rfd: r.data.dispatch.rfd.cumulative,
            dispatch: r.data.dispatch.dispatch.cumulative,
        })
        .unwrap_or_default()
}

/// 新累计值 = 种子 + 当日值
pub fn apply_carry_forward(seed: CumulativeSeed, rfd_today: u64, dispatch_today: u64) -> DispatchSection {
    DispatchSection {
        rfd: RunningCount {
            cumulative: seed.rfd.saturating_add(rfd_today),
            today: rfd_today,
        },
        dispatch: RunningCount {
            cumulative: seed.dispatch.saturating_add(dispatch_today),
            today: dispatch_today,
        },
    }
}

/// 日期不晚于 `date` 的最新记录，同日 B 优先于 A
pub fn latest_on_or_before(
    records: &[InspectionRecord],
    part: PartName,
    date: NaiveDate,
) -> Option<&InspectionRecord> {
    records
        .iter()
        .filter(|r| r.part_name == part && r.date <= date)
        .max_by_key(|r| r.chronological_key())
}

/// 该零件时间上最新的记录
pub fn latest_for_part(records: &[InspectionRecord], part: PartName) -> Option<&InspectionRecord> {
    records
        .iter()
        .filter(|r| r.part_name == part)
        .max_by_key(|r| r.chronological_key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{InspectionData, RecordKey};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn record(part: PartName, day: u32, shift: Shift, rfd: u64, dispatch: u64) -> InspectionRecord {
        let mut data = InspectionData::default();
        data.dispatch.rfd.cumulative = rfd;
        data.dispatch.dispatch.cumulative = dispatch;
        InspectionRecord::new(RecordKey::new(d(day), part, shift), data, None)
    }

    #[test]
    fn test_no_prior_record_is_zero() {
        let records = vec![record(PartName::InputShaft, 10, Shift::A, 50, 20)];
        let seed = cumulative_before(&records, PartName::InputShaft, d(10), Shift::A);
        assert_eq!(seed, CumulativeSeed::default());

        let seed = cumulative_before(&records, PartName::LayShaftAssy, d(20), Shift::B);
        assert_eq!(seed, CumulativeSeed::default());
    }

    #[test]
    fn test_same_day_shift_tie_break() {
        let records = vec![
            record(PartName::InputShaft, 10, Shift::A, 50, 20),
            record(PartName::InputShaft, 10, Shift::B, 80, 30),
        ];
        let b_seed = cumulative_before(&records, PartName::InputShaft, d(10), Shift::B);
        assert_eq!(b_seed, CumulativeSeed { rfd: 50, dispatch: 20 });

        let a_seed = cumulative_before(&records, PartName::InputShaft, d(10), Shift::A);
        assert_eq!(a_seed, CumulativeSeed::default());
    }

    #[test]
    fn test_earlier_date_b_shift_feeds_next_day_a() {
        let records = vec![
            record(PartName::InputShaft, 9, Shift::A, 10, 5),
            record(PartName::InputShaft, 9, Shift::B, 25, 12),
            record(PartName::MainReductionGear, 9, Shift::B, 999, 999),
        ];
        let seed = cumulative_before(&records, PartName::InputShaft, d(10), Shift::A);
        assert_eq!(seed, CumulativeSeed { rfd: 25, dispatch: 12 });
    }

    #[test]
    fn test_apply_carry_forward() {
        let dispatch = apply_carry_forward(CumulativeSeed { rfd: 25, dispatch: 12 }, 7, 3);
        assert_eq!(dispatch.rfd, RunningCount { cumulative: 32, today: 7 });
        assert_eq!(dispatch.dispatch, RunningCount { cumulative: 15, today: 3 });
    }

    #[test]
    fn test_latest_on_or_before_prefers_b() {
        let records = vec![
            record(PartName::InputShaft, 8, Shift::B, 1, 0),
            record(PartName::InputShaft, 9, Shift::B, 3, 0),
            record(PartName::InputShaft, 9, Shift::A, 2, 0),
            record(PartName::InputShaft, 11, Shift::A, 4, 0),
        ];
        let latest = latest_on_or_before(&records, PartName::InputShaft, d(10)).unwrap();
        assert_eq!(latest.data.dispatch.rfd.cumulative, 3);
        assert!(latest_on_or_before(&records, PartName::InputShaft, d(7)).is_none());
        assert_eq!(
            latest_for_part(&records, PartName::InputShaft).map(|r| r.date),
            Some(d(11))
        );
    }
}
