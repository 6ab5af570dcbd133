//! 日历日期工具
//!
//! 所有业务日期均为日粒度（无时区），使用 `NaiveDate`

use chrono::{Datelike, Days, NaiveDate};

/// 当月第一天
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// 当月最后一天
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .unwrap_or(date)
}

/// 当月剩余天数（含当天），最少为 1
pub fn remaining_days_in_month(date: NaiveDate) -> u32 {
    let days = (last_day_of_month(date) - date).num_days() + 1;
    days.max(1) as u32
}

/// 前一天
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.pred_opt().unwrap_or(date)
}

/// 包含 `date` 在内往前共 `days` 天的起始日
pub fn trailing_window_start(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(d(2024, 2, 10)), d(2024, 2, 29));
        assert_eq!(last_day_of_month(d(2023, 2, 10)), d(2023, 2, 28));
        assert_eq!(last_day_of_month(d(2024, 12, 5)), d(2024, 12, 31));
    }

    #[test]
    fn test_remaining_days_inclusive() {
        assert_eq!(remaining_days_in_month(d(2024, 6, 25)), 6);
        assert_eq!(remaining_days_in_month(d(2024, 6, 30)), 1);
        assert_eq!(remaining_days_in_month(d(2024, 6, 1)), 30);
    }

    #[test]
    fn test_trailing_window_start() {
        assert_eq!(trailing_window_start(d(2024, 3, 7), 7), d(2024, 3, 1));
        assert_eq!(trailing_window_start(d(2024, 3, 3), 7), d(2024, 2, 26));
        assert_eq!(first_day_of_month(d(2024, 3, 17)), d(2024, 3, 1));
        assert_eq!(previous_day(d(2024, 3, 1)), d(2024, 2, 29));
    }
}
