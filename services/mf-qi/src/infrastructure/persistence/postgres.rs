//! PostgreSQL repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::info;
use zen_common::UserId;
use zen_domain_core::{AggregateRoot, Entity, Keyed};
use zen_errors::{AppError, AppResult};

use crate::domain::entities::{DefectVocabulary, InspectionRecord, MonthlyTargets, UserProfile};
use crate::domain::enums::{PartName, UserRole, UserStatus};
use crate::domain::repositories::{
    AppSettingsRepository, InspectionRecordRepository, UserProfileRepository,
};
use crate::domain::value_objects::{InspectionRecordId, RecordKey};

use super::converters::{profile_from_row, record_from_row};
use super::rows::{InspectionRecordRow, UserProfileRow};

const MONTHLY_TARGETS_KEY: &str = "monthlyTargets";
const DEFECT_TYPES_KEY: &str = "defectTypesList";
/// 单批删除上限
const CLEAR_BATCH_SIZE: i64 = 499;

const RECORD_COLUMNS: &str = r#"
    id, record_date, part_name, shift,
    material_inspection, final_inspection, tpi_inspection, dispatch,
    rejections, tpi_rejections,
    created_at, created_by, updated_at, updated_by
"#;

/// 建表（幂等）
pub async fn ensure_schema(pool: &PgPool) -> AppResult<()> {
    sqlx::raw_sql(include_str!("../../../migrations/0001_init.sql"))
        .execute(pool)
        .await
        .map_err(|e| AppError::database(format!("初始化表结构失败: {}", e)))?;
    info!("Database schema ensured");
    Ok(())
}

// ============================================================================
// InspectionRecordRepository 实现
// ============================================================================

pub struct PostgresInspectionRecordRepository {
    pool: PgPool,
}

impl PostgresInspectionRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InspectionRecordRepository for PostgresInspectionRecordRepository {
    async fn list(&self) -> AppResult<Vec<InspectionRecord>> {
        let rows = sqlx::query_as::<_, InspectionRecordRow>(&format!(
            "SELECT {} FROM inspection_records ORDER BY record_date DESC, shift DESC",
            RECORD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("查询检验记录失败: {}", e)))?;

        rows.into_iter().map(record_from_row).collect()
    }

    async fn find_by_id(&self, id: &InspectionRecordId) -> AppResult<Option<InspectionRecord>> {
        let row = sqlx::query_as::<_, InspectionRecordRow>(&format!(
            "SELECT {} FROM inspection_records WHERE id = $1",
            RECORD_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("查询检验记录失败: {}", e)))?;

        row.map(record_from_row).transpose()
    }

    async fn find_by_key(&self, key: &RecordKey) -> AppResult<Option<InspectionRecord>> {
        let row = sqlx::query_as::<_, InspectionRecordRow>(&format!(
            "SELECT {} FROM inspection_records WHERE record_date = $1 AND part_name = $2 AND shift = $3",
            RECORD_COLUMNS
        ))
        .bind(key.date)
        .bind(key.part_name.as_str())
        .bind(key.shift.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("查询检验记录失败: {}", e)))?;

        row.map(record_from_row).transpose()
    }

    async fn save(&self, record: &InspectionRecord) -> AppResult<()> {
        let audit = record.audit_info();
        let data = &record.data;

        sqlx::query(
            r#"
            INSERT INTO inspection_records (
                id, record_date, part_name, shift,
                material_inspection, final_inspection, tpi_inspection, dispatch,
                rejections, tpi_rejections,
                created_at, created_by, updated_at, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(record.id().0)
        .bind(record.date)
        .bind(record.part_name.as_str())
        .bind(record.shift.as_str())
        .bind(Json(&data.material_inspection))
        .bind(Json(&data.final_inspection))
        .bind(Json(&data.tpi_inspection))
        .bind(Json(&data.dispatch))
        .bind(Json(&data.rejections))
        .bind(Json(&data.tpi_rejections))
        .bind(audit.created_at)
        .bind(audit.created_by.as_ref().map(|u| u.as_str()))
        .bind(audit.updated_at)
        .bind(audit.updated_by.as_ref().map(|u| u.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::conflict(format!("Record for {} already exists", record.key()))
            }
            _ => AppError::database(format!("保存检验记录失败: {}", e)),
        })?;

        Ok(())
    }

    async fn update(&self, record: &InspectionRecord) -> AppResult<()> {
        let audit = record.audit_info();
        let data = &record.data;

        let result = sqlx::query(
            r#"
            UPDATE inspection_records SET
                material_inspection = $2, final_inspection = $3, tpi_inspection = $4,
                dispatch = $5, rejections = $6, tpi_rejections = $7,
                updated_at = $8, updated_by = $9
            WHERE id = $1
            "#,
        )
        .bind(record.id().0)
        .bind(Json(&data.material_inspection))
        .bind(Json(&data.final_inspection))
        .bind(Json(&data.tpi_inspection))
        .bind(Json(&data.dispatch))
        .bind(Json(&data.rejections))
        .bind(Json(&data.tpi_rejections))
        .bind(audit.updated_at)
        .bind(audit.updated_by.as_ref().map(|u| u.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("更新检验记录失败: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Inspection record {} not found", record.id())));
        }
        Ok(())
    }

    async fn delete(&self, id: &InspectionRecordId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM inspection_records WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("删除检验记录失败: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Inspection record {} not found", id)));
        }
        Ok(())
    }

    async fn clear_all(&self) -> AppResult<u64> {
        let mut deleted = 0u64;
        loop {
            let result = sqlx::query(
                "DELETE FROM inspection_records WHERE id IN (SELECT id FROM inspection_records LIMIT $1)",
            )
            .bind(CLEAR_BATCH_SIZE)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("清空检验记录失败: {}", e)))?;

            if result.rows_affected() == 0 {
                break;
            }
            deleted += result.rows_affected();
        }
        Ok(deleted)
    }
}

// ============================================================================
// AppSettingsRepository 实现
// ============================================================================

pub struct PostgresAppSettingsRepository {
    pool: PgPool,
}

impl PostgresAppSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppSettingsRepository for PostgresAppSettingsRepository {
    async fn get_monthly_targets(&self) -> AppResult<MonthlyTargets> {
        let value = sqlx::query_scalar::<_, Json<MonthlyTargets>>("SELECT value FROM app_settings WHERE key = $1")
            .bind(MONTHLY_TARGETS_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("查询月度目标失败: {}", e)))?;

        Ok(value.map(|v| v.0).unwrap_or_default())
    }

    async fn set_monthly_target(&self, part: PartName, target: u64) -> AppResult<MonthlyTargets> {
        let target = i64::try_from(target)
            .map_err(|_| AppError::validation(format!("Target {} is too large", target)))?;

        // 按键合并，不覆盖其他零件的目标
        let value = sqlx::query_scalar::<_, Json<MonthlyTargets>>(
            r#"
            INSERT INTO app_settings (key, value, updated_at)
            VALUES ($1, jsonb_build_object($2::text, $3::bigint), NOW())
            ON CONFLICT (key) DO UPDATE
                SET value = app_settings.value || EXCLUDED.value, updated_at = NOW()
            RETURNING value
            "#,
        )
        .bind(MONTHLY_TARGETS_KEY)
        .bind(part.as_str())
        .bind(target)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("保存月度目标失败: {}", e)))?;

        Ok(value.0)
    }

    async fn get_defect_vocabulary(&self) -> AppResult<DefectVocabulary> {
        let value = sqlx::query_scalar::<_, Json<DefectVocabulary>>("SELECT value FROM app_settings WHERE key = $1")
            .bind(DEFECT_TYPES_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("查询缺陷类型失败: {}", e)))?;

        Ok(value.map(|v| v.0).unwrap_or_default())
    }

    async fn add_defect_type(&self, name: &str) -> AppResult<String> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("开启事务失败: {}", e)))?;

        let current = sqlx::query_scalar::<_, Json<DefectVocabulary>>(
            "SELECT value FROM app_settings WHERE key = $1 FOR UPDATE",
        )
        .bind(DEFECT_TYPES_KEY)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("查询缺陷类型失败: {}", e)))?;

        let mut vocabulary = current.map(|v| v.0).unwrap_or_default();
        let added = vocabulary.add(name)?;

        sqlx::query(
            r#"
            INSERT INTO app_settings (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(DEFECT_TYPES_KEY)
        .bind(Json(&vocabulary))
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("保存缺陷类型失败: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("提交事务失败: {}", e)))?;

        Ok(added)
    }
}

// ============================================================================
// UserProfileRepository 实现
// ============================================================================

pub struct PostgresUserProfileRepository {
    pool: PgPool,
}

impl PostgresUserProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserProfileRepository for PostgresUserProfileRepository {
    async fn find_by_uid(&self, uid: &UserId) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserProfileRow>(
            r#"
            SELECT uid, email, name, mobile, role, status, created_at, updated_at
            FROM user_profiles
            WHERE uid = $1
            "#,
        )
        .bind(uid.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("查询用户档案失败: {}", e)))?;

        row.map(profile_from_row).transpose()
    }

    async fn list(&self) -> AppResult<Vec<UserProfile>> {
        let rows = sqlx::query_as::<_, UserProfileRow>(
            r#"
            SELECT uid, email, name, mobile, role, status, created_at, updated_at
            FROM user_profiles
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("查询用户档案失败: {}", e)))?;

        rows.into_iter().map(profile_from_row).collect()
    }

    async fn save(&self, profile: &UserProfile) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (uid, email, name, mobile, role, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(profile.uid.as_str())
        .bind(profile.email.as_deref())
        .bind(&profile.name)
        .bind(&profile.mobile)
        .bind(profile.role.code())
        .bind(profile.status.code())
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::conflict(format!("Profile for {} already exists", profile.uid))
            }
            _ => AppError::database(format!("保存用户档案失败: {}", e)),
        })?;

        Ok(())
    }

    async fn update_role(&self, uid: &UserId, role: UserRole) -> AppResult<UserProfile> {
        let row = sqlx::query_as::<_, UserProfileRow>(
            r#"
            UPDATE user_profiles SET role = $2, updated_at = NOW()
            WHERE uid = $1
            RETURNING uid, email, name, mobile, role, status, created_at, updated_at
            "#,
        )
        .bind(uid.as_str())
        .bind(role.code())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("更新用户角色失败: {}", e)))?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", uid)))?;

        profile_from_row(row)
    }

    async fn update_status(&self, uid: &UserId, status: UserStatus) -> AppResult<UserProfile> {
        let row = sqlx::query_as::<_, UserProfileRow>(
            r#"
            UPDATE user_profiles SET status = $2, updated_at = NOW()
            WHERE uid = $1
            RETURNING uid, email, name, mobile, role, status, created_at, updated_at
            "#,
        )
        .bind(uid.as_str())
        .bind(status.code())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("更新用户状态失败: {}", e)))?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", uid)))?;

        profile_from_row(row)
    }
}
