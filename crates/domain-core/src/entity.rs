//! 实体基础 trait

use std::fmt::Display;

use zen_common::{AuditInfo, UserId};

/// 实体 trait
pub trait Entity {
    type Id;

    fn id(&self) -> &Self::Id;
}

/// 带业务键的实体
///
/// 同一业务键至多存在一个实体，写入时按业务键新建或覆盖
pub trait Keyed: Entity {
    type Key: PartialEq + Display;

    fn key(&self) -> Self::Key;

    fn has_key(&self, key: &Self::Key) -> bool {
        self.key() == *key
    }
}

/// 聚合根 trait
pub trait AggregateRoot: Entity {
    fn audit_info(&self) -> &AuditInfo;
    fn audit_info_mut(&mut self) -> &mut AuditInfo;

    /// 记录一次修改
    fn touch(&mut self, updated_by: Option<UserId>) {
        self.audit_info_mut().update(updated_by);
    }
}
