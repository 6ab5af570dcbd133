//! 管理命令

use zen_common::UserId;
use zen_errors::{AppError, AppResult};

use crate::domain::enums::{PartName, UserRole, UserStatus};
use crate::domain::value_objects::MAX_COUNT;

/// 设置月度目标命令
#[derive(Debug, Clone)]
pub struct SetMonthlyTargetCommand {
    pub part_name: PartName,
    pub target: u64,
}

impl SetMonthlyTargetCommand {
    pub fn validate(&self) -> AppResult<()> {
        if self.target > MAX_COUNT {
            return Err(AppError::validation(format!(
                "Monthly target cannot exceed {}.",
                MAX_COUNT
            )));
        }
        Ok(())
    }
}

/// 新增缺陷类型命令
#[derive(Debug, Clone)]
pub struct AddDefectTypeCommand {
    pub name: String,
}

impl AddDefectTypeCommand {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Defect type name cannot be empty."));
        }
        Ok(())
    }
}

/// 修改用户角色命令
#[derive(Debug, Clone)]
pub struct UpdateUserRoleCommand {
    pub uid: UserId,
    pub role: UserRole,
}

/// 修改用户状态命令
#[derive(Debug, Clone)]
pub struct UpdateUserStatusCommand {
    pub uid: UserId,
    pub status: UserStatus,
}

/// 注册用户档案命令
#[derive(Debug, Clone)]
pub struct RegisterProfileCommand {
    pub uid: UserId,
    pub email: Option<String>,
    pub name: String,
    pub mobile: String,
    pub requested_role: Option<UserRole>,
}

impl RegisterProfileCommand {
    pub fn validate(&self) -> AppResult<()> {
        if self.uid.as_str().trim().is_empty() {
            return Err(AppError::validation("User id cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Name cannot be empty"));
        }
        if self.mobile.trim().is_empty() {
            return Err(AppError::validation("Mobile number cannot be empty"));
        }
        Ok(())
    }
}
