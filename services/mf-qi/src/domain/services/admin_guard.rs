//! 唯一激活管理员保护
//!
//! 系统中只剩一个激活管理员时，不能把他降级、停用或打回待审批

use zen_errors::{AppError, AppResult};

use crate::domain::entities::UserProfile;
use crate::domain::enums::{UserRole, UserStatus};

/// 对用户档案的变更
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileChange {
    Role(UserRole),
    Status(UserStatus),
}

impl ProfileChange {
    /// 变更后目标是否仍为激活管理员
    fn keeps_active_admin(&self, target: &UserProfile) -> bool {
        match self {
            ProfileChange::Role(role) => role.is_admin() && target.status.is_active(),
            ProfileChange::Status(status) => target.role.is_admin() && status.is_active(),
        }
    }

    fn rejection_message(&self) -> &'static str {
        match self {
            ProfileChange::Role(_) => "Cannot change the role of the sole active admin.",
            ProfileChange::Status(_) => "Cannot suspend or set to pending for the sole active admin.",
        }
    }
}

/// 校验变更不会移除最后一个激活管理员
pub fn ensure_admin_remains(target: &UserProfile, change: ProfileChange, profiles: &[UserProfile]) -> AppResult<()> {
    if !target.is_active_admin() || change.keeps_active_admin(target) {
        return Ok(());
    }

    let other_active_admins = profiles
        .iter()
        .filter(|p| p.uid != target.uid && p.is_active_admin())
        .count();

    if other_active_admins == 0 {
        return Err(AppError::failed_precondition(change.rejection_message()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use zen_common::UserId;

    use super::*;

    fn profile(uid: &str, role: UserRole, status: UserStatus) -> UserProfile {
        let mut p = UserProfile::register(UserId::from(uid), None, uid, "000", Some(role));
        p.change_status(status);
        p
    }

    #[test]
    fn test_sole_admin_cannot_be_demoted() {
        let admin = profile("a", UserRole::Admin, UserStatus::Active);
        let viewer = profile("v", UserRole::DataViewer, UserStatus::Active);
        let profiles = vec![admin.clone(), viewer];

        let err = ensure_admin_remains(&admin, ProfileChange::Role(UserRole::DataViewer), &profiles).unwrap_err();
        assert!(matches!(err, AppError::FailedPrecondition(ref m) if m == "Cannot change the role of the sole active admin."));

        let err = ensure_admin_remains(&admin, ProfileChange::Status(UserStatus::Suspended), &profiles).unwrap_err();
        assert!(matches!(err, AppError::FailedPrecondition(_)));
    }

    #[test]
    fn test_second_active_admin_allows_change() {
        let admin = profile("a", UserRole::Admin, UserStatus::Active);
        let other = profile("b", UserRole::Admin, UserStatus::Active);
        let profiles = vec![admin.clone(), other];

        assert!(ensure_admin_remains(&admin, ProfileChange::Role(UserRole::TpiInspector), &profiles).is_ok());
    }

    #[test]
    fn test_pending_admin_does_not_count() {
        let admin = profile("a", UserRole::Admin, UserStatus::Active);
        let pending = profile("b", UserRole::Admin, UserStatus::PendingApproval);
        let profiles = vec![admin.clone(), pending];

        assert!(ensure_admin_remains(&admin, ProfileChange::Status(UserStatus::PendingApproval), &profiles).is_err());
        assert!(ensure_admin_remains(&admin, ProfileChange::Role(UserRole::Admin), &profiles).is_ok());
    }
}
