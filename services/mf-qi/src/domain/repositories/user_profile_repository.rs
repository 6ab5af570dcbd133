//! 用户档案 Repository trait

use async_trait::async_trait;
use zen_common::UserId;
use zen_errors::AppResult;

use crate::domain::entities::UserProfile;
use crate::domain::enums::{UserRole, UserStatus};

#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    async fn find_by_uid(&self, uid: &UserId) -> AppResult<Option<UserProfile>>;

    async fn list(&self) -> AppResult<Vec<UserProfile>>;

    /// 保存新档案
    async fn save(&self, profile: &UserProfile) -> AppResult<()>;

    async fn update_role(&self, uid: &UserId, role: UserRole) -> AppResult<UserProfile>;

    async fn update_status(&self, uid: &UserId, status: UserStatus) -> AppResult<UserProfile>;
}
