//! 数据库行到领域对象的转换

use zen_common::{AuditInfo, UserId};
use zen_errors::{AppError, AppResult};

use crate::domain::entities::{InspectionRecord, UserProfile};
use crate::domain::enums::{PartName, Shift, UserRole, UserStatus};
use crate::domain::value_objects::{InspectionData, InspectionRecordId, RecordKey};

use super::rows::{InspectionRecordRow, UserProfileRow};

/// 将 InspectionRecordRow 转换为 InspectionRecord
pub fn record_from_row(row: InspectionRecordRow) -> AppResult<InspectionRecord> {
    let part_name: PartName = row.part_name.parse()?;
    let shift: Shift = row.shift.parse()?;

    let data = InspectionData {
        material_inspection: row.material_inspection.0,
        final_inspection: row.final_inspection.0,
        tpi_inspection: row.tpi_inspection.0,
        dispatch: row.dispatch.0,
        rejections: row.rejections.0,
        tpi_rejections: row.tpi_rejections.0,
    };

    let audit_info = AuditInfo {
        created_at: row.created_at,
        created_by: row.created_by.map(UserId::new),
        updated_at: row.updated_at,
        updated_by: row.updated_by.map(UserId::new),
    };

    Ok(InspectionRecord::restore(
        InspectionRecordId::from_uuid(row.id),
        RecordKey::new(row.record_date, part_name, shift),
        data,
        audit_info,
    ))
}

/// 将 UserProfileRow 转换为 UserProfile
pub fn profile_from_row(row: UserProfileRow) -> AppResult<UserProfile> {
    let role = UserRole::from_code(&row.role)
        .ok_or_else(|| AppError::database(format!("未知角色 {} (uid {})", row.role, row.uid)))?;
    let status = UserStatus::from_code(&row.status)
        .ok_or_else(|| AppError::database(format!("未知状态 {} (uid {})", row.status, row.uid)))?;

    Ok(UserProfile {
        uid: UserId::new(row.uid),
        email: row.email,
        name: row.name,
        mobile: row.mobile,
        role,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
