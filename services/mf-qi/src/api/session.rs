//! 会话提取器
//!
//! 身份由上游网关认证后通过 `x-user-id` 请求头传入

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use zen_common::UserId;
use zen_errors::AppError;

use crate::domain::entities::Session;

use super::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// 请求头中的用户 ID（档案可能尚不存在）
pub struct UserIdHeader(pub UserId);

impl<S> FromRequestParts<S> for UserIdHeader
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|uid| !uid.is_empty())
            .map(|uid| UserIdHeader(UserId::from(uid)))
            .ok_or_else(|| AppError::unauthenticated(format!("Missing {} header", USER_ID_HEADER)))
    }
}

/// 已解析的当前会话
pub struct CurrentSession(pub Session);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let UserIdHeader(uid) = UserIdHeader::from_request_parts(parts, state).await?;
        let session = state.handler.resolve_session(&uid).await?;
        Ok(CurrentSession(session))
    }
}
