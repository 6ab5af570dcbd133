//! 用户档案

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zen_common::UserId;

use crate::domain::enums::{UserRole, UserStatus};

/// 用户档案
///
/// 身份认证在外部完成，这里只保存角色与审批状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: UserId,
    pub email: Option<String>,
    pub name: String,
    pub mobile: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// 注册新用户：状态总是待审批，未指定角色时为只读查看者
    pub fn register(
        uid: UserId,
        email: Option<String>,
        name: impl Into<String>,
        mobile: impl Into<String>,
        requested_role: Option<UserRole>,
    ) -> Self {
        let now = Utc::now();
        Self {
            uid,
            email,
            name: name.into(),
            mobile: mobile.into(),
            role: requested_role.unwrap_or_default(),
            status: UserStatus::PendingApproval,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active_admin(&self) -> bool {
        self.role.is_admin() && self.status.is_active()
    }

    pub fn change_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    pub fn change_status(&mut self, status: UserStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}
