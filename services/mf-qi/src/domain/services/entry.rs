//! 录入表单的合并、派生字段与校验

use zen_errors::ValidationErrors;

use crate::domain::enums::UserRole;
use crate::domain::value_objects::{InspectionData, MAX_COUNT, RejectionEntry};

use super::access_policy::{FieldAccess, FormSection, all_fields, field_access, section_access};
use super::carry_forward::{CumulativeSeed, apply_carry_forward};

const VISUAL_SUM_MESSAGE: &str = "Sum of OK and Not OK cannot exceed Visual Done.";
const TPI_SUM_MESSAGE: &str = "Sum of TPI OK and Not OK cannot exceed TPI Done.";
const TOO_LARGE_MESSAGE: &str = "Value is too large.";

/// 将提交内容合并到基础数据上
///
/// 只有该角色可编辑的字段取提交值，其余字段（只读、隐藏、派生）保留
/// 原记录的值，新建时为默认值
pub fn merge_submission(
    role: UserRole,
    existing: Option<&InspectionData>,
    submitted: &InspectionData,
) -> InspectionData {
    let mut merged = existing.cloned().unwrap_or_default();

    for field in all_fields() {
        if field_access(role, field) == FieldAccess::Editable {
            field.write(&mut merged, field.read(submitted));
        }
    }

    if section_access(role, FormSection::FinalRejections).is_editable() {
        merged.rejections = submitted.rejections.clone();
    }
    if section_access(role, FormSection::TpiRejections).is_editable() {
        merged.tpi_rejections = submitted.tpi_rejections.clone();
    }

    merged
}

/// 重算派生字段
///
/// 非管理员的累计值一律由结转种子 + 当日值得出
pub fn apply_derived_fields(role: UserRole, data: &mut InspectionData, seed: CumulativeSeed) {
    let multigauge = &mut data.final_inspection.multigauge;
    multigauge.total = multigauge.ok.saturating_add(multigauge.not_ok);

    if role == UserRole::FinalInspector {
        let visual = &mut data.final_inspection.visual;
        visual.visual_done = visual.ok.saturating_add(visual.not_ok);
    }
    if role == UserRole::TpiInspector {
        let tpi = &mut data.tpi_inspection;
        tpi.done = tpi.ok.saturating_add(tpi.not_ok);
    }

    if !role.is_admin() {
        data.dispatch = apply_carry_forward(seed, data.dispatch.rfd.today, data.dispatch.dispatch.today);
    }
}

fn validate_rejections(errors: &mut ValidationErrors, prefix: &str, rejections: &[RejectionEntry]) {
    for (i, rejection) in rejections.iter().enumerate() {
        if rejection.defect_type.trim().is_empty() {
            errors.add(format!("{}.{}.defectType", prefix, i), "Defect type is required.");
        }
        if rejection.quantity < 1 {
            errors.add(format!("{}.{}.quantity", prefix, i), "Quantity must be at least 1.");
        } else if rejection.quantity > MAX_COUNT {
            errors.add(format!("{}.{}.quantity", prefix, i), TOO_LARGE_MESSAGE);
        }
    }
}

/// 校验录入数据，一次收集全部字段问题
pub fn validate_entry(data: &InspectionData) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for field in all_fields() {
        if field.read(data) > MAX_COUNT {
            errors.add(field.path(), TOO_LARGE_MESSAGE);
        }
    }

    // 超过上限的值已报告，和的比较按饱和计算
    let visual = &data.final_inspection.visual;
    if visual.ok.saturating_add(visual.not_ok) > visual.visual_done {
        errors.add("finalInspection.visual.ok", VISUAL_SUM_MESSAGE);
        errors.add("finalInspection.visual.notOk", VISUAL_SUM_MESSAGE);
    }

    let tpi = &data.tpi_inspection;
    if tpi.ok.saturating_add(tpi.not_ok) > tpi.done {
        errors.add("tpiInspection.ok", TPI_SUM_MESSAGE);
        errors.add("tpiInspection.notOk", TPI_SUM_MESSAGE);
    }

    validate_rejections(&mut errors, "rejections", &data.rejections);
    validate_rejections(&mut errors, "tpiRejections", &data.tpi_rejections);

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted() -> InspectionData {
        let mut data = InspectionData::default();
        data.material_inspection.washing_pending = 4;
        data.final_inspection.multigauge.ok = 10;
        data.final_inspection.multigauge.not_ok = 2;
        data.final_inspection.multigauge.total = 999;
        data.final_inspection.visual.visual_done = 50;
        data.final_inspection.visual.ok = 40;
        data.final_inspection.visual.not_ok = 3;
        data.tpi_inspection.done = 20;
        data.tpi_inspection.ok = 15;
        data.tpi_inspection.not_ok = 1;
        data.dispatch.rfd.today = 7;
        data.dispatch.rfd.cumulative = 1_000;
        data.dispatch.dispatch.today = 5;
        data.rejections = vec![RejectionEntry::new("Root burr", 3)];
        data.tpi_rejections = vec![RejectionEntry::new("Teeth dent", 1)];
        data
    }

    #[test]
    fn test_tpi_inspector_keeps_final_inspection_of_existing() {
        let mut existing = InspectionData::default();
        existing.final_inspection.visual.ok = 11;
        existing.rejections = vec![RejectionEntry::new("Spline dent", 2)];

        let merged = merge_submission(UserRole::TpiInspector, Some(&existing), &submitted());

        assert_eq!(merged.final_inspection.visual.ok, 11);
        assert_eq!(merged.material_inspection.washing_pending, 0);
        assert_eq!(merged.rejections, existing.rejections);
        assert_eq!(merged.tpi_inspection.ok, 15);
        assert_eq!(merged.tpi_rejections.len(), 1);
        assert_eq!(merged.dispatch.rfd.today, 7);
        // 发运当日值对 TPI 检验员禁用
        assert_eq!(merged.dispatch.dispatch.today, 0);
    }

    #[test]
    fn test_final_inspector_derives_visual_done() {
        let mut data = merge_submission(UserRole::FinalInspector, None, &submitted());
        apply_derived_fields(UserRole::FinalInspector, &mut data, CumulativeSeed { rfd: 100, dispatch: 40 });

        assert_eq!(data.final_inspection.visual.visual_done, 43);
        assert_eq!(data.final_inspection.multigauge.total, 12);
        assert_eq!(data.tpi_inspection.ok, 0);
        assert_eq!(data.dispatch.rfd.cumulative, 107);
        assert_eq!(data.dispatch.dispatch.cumulative, 45);
    }

    #[test]
    fn test_admin_keeps_explicit_cumulative() {
        let mut data = merge_submission(UserRole::Admin, None, &submitted());
        apply_derived_fields(UserRole::Admin, &mut data, CumulativeSeed { rfd: 100, dispatch: 40 });

        assert_eq!(data.dispatch.rfd.cumulative, 1_000);
        assert_eq!(data.final_inspection.visual.visual_done, 50);
        assert_eq!(data.tpi_inspection.done, 20);
    }

    #[test]
    fn test_validation_reports_both_paths() {
        let mut data = InspectionData::default();
        data.final_inspection.visual.visual_done = 5;
        data.final_inspection.visual.ok = 5;
        data.final_inspection.visual.not_ok = 1;
        data.tpi_inspection.ok = 1;
        data.rejections = vec![RejectionEntry::new(" ", 0)];

        let errors = validate_entry(&data).unwrap_err();
        assert!(errors.has_issue_for("finalInspection.visual.ok"));
        assert!(errors.has_issue_for("finalInspection.visual.notOk"));
        assert!(errors.has_issue_for("tpiInspection.ok"));
        assert!(errors.has_issue_for("tpiInspection.notOk"));
        assert!(errors.has_issue_for("rejections.0.defectType"));
        assert!(errors.has_issue_for("rejections.0.quantity"));
        assert_eq!(errors.issues.len(), 6);
    }

    #[test]
    fn test_oversized_counts_are_reported_not_wrapped() {
        let mut data = InspectionData::default();
        data.final_inspection.visual.ok = u64::MAX;
        data.final_inspection.visual.not_ok = 1;
        data.final_inspection.multigauge.ok = u64::MAX;
        data.final_inspection.multigauge.not_ok = u64::MAX;
        data.rejections = vec![RejectionEntry::new("Root burr", MAX_COUNT + 1)];

        apply_derived_fields(UserRole::Admin, &mut data, CumulativeSeed::default());
        assert_eq!(data.final_inspection.multigauge.total, u64::MAX);
        assert_eq!(data.process_step_not_ok(), u64::MAX);

        let errors = validate_entry(&data).unwrap_err();
        assert!(errors.has_issue_for("finalInspection.visual.ok"));
        assert!(errors.has_issue_for("finalInspection.visual.notOk"));
        assert!(errors.has_issue_for("finalInspection.multigauge.ok"));
        assert!(errors.has_issue_for("finalInspection.multigauge.total"));
        assert!(errors.has_issue_for("rejections.0.quantity"));
    }

    #[test]
    fn test_final_inspector_derived_done_saturates() {
        let mut data = InspectionData::default();
        data.final_inspection.visual.ok = u64::MAX;
        data.final_inspection.visual.not_ok = 5;

        apply_derived_fields(UserRole::FinalInspector, &mut data, CumulativeSeed::default());
        assert_eq!(data.final_inspection.visual.visual_done, u64::MAX);
        assert!(validate_entry(&data).unwrap_err().has_issue_for("finalInspection.visual.visualDone"));
    }

    #[test]
    fn test_count_at_limit_is_accepted() {
        let mut data = InspectionData::default();
        data.final_inspection.visual.visual_done = MAX_COUNT;
        data.final_inspection.visual.ok = MAX_COUNT;
        data.rejections = vec![RejectionEntry::new("Root burr", MAX_COUNT)];
        assert!(validate_entry(&data).is_ok());
    }

    #[test]
    fn test_valid_entry_passes() {
        let mut data = submitted();
        apply_derived_fields(UserRole::FinalInspector, &mut data, CumulativeSeed::default());
        assert!(validate_entry(&data).is_ok());
    }
}
