//! 会话上下文
//!
//! 每个应用操作显式接收会话，而不是读取全局的"当前用户"

use serde::Serialize;
use zen_common::UserId;
use zen_errors::{AppError, AppResult};

use crate::domain::enums::{UserRole, UserStatus};

use super::UserProfile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub uid: UserId,
    pub role: UserRole,
    pub status: UserStatus,
}

impl Session {
    pub fn new(uid: UserId, role: UserRole, status: UserStatus) -> Self {
        Self { uid, role, status }
    }

    pub fn from_profile(profile: &UserProfile) -> Self {
        Self::new(profile.uid.clone(), profile.role, profile.status)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// 任何操作的前提：账户已激活
    pub fn require_active(&self) -> AppResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Account {} is not active ({})",
                self.uid,
                self.status.code()
            )))
        }
    }

    /// 写入检验记录：激活且非只读角色
    pub fn require_writer(&self) -> AppResult<()> {
        self.require_active()?;
        if self.role.can_write_records() {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Data viewers cannot save or update records.",
            ))
        }
    }

    /// 管理操作：激活的管理员
    pub fn require_admin(&self) -> AppResult<()> {
        self.require_active()?;
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "You are not authorized to perform this action.",
            ))
        }
    }
}
