//! 用户角色枚举

use serde::{Deserialize, Serialize};

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// 管理员
    Admin,
    /// 第三方检验员
    TpiInspector,
    /// 终检员
    FinalInspector,
    /// 只读查看者
    #[default]
    DataViewer,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Admin,
        UserRole::TpiInspector,
        UserRole::FinalInspector,
        UserRole::DataViewer,
    ];

    /// 展示名称
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::TpiInspector => "TPI Inspector",
            UserRole::FinalInspector => "Final Inspector",
            UserRole::DataViewer => "Data Viewer",
        }
    }

    /// 存储编码
    pub fn code(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::TpiInspector => "TPI_INSPECTOR",
            UserRole::FinalInspector => "FINAL_INSPECTOR",
            UserRole::DataViewer => "DATA_VIEWER",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.code() == code)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// 是否可以写入检验记录
    pub fn can_write_records(&self) -> bool {
        !matches!(self, UserRole::DataViewer)
    }
}
