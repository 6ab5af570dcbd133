//! 数据库行映射结构

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::value_objects::{
    DispatchSection, FinalInspection, MaterialInspection, RejectionEntry, TpiInspection,
};

/// 检验记录数据库行，各计数分区存为 JSONB
#[derive(Debug, FromRow)]
pub struct InspectionRecordRow {
    pub id: Uuid,
    pub record_date: NaiveDate,
    pub part_name: String,
    pub shift: String,
    pub material_inspection: Json<MaterialInspection>,
    pub final_inspection: Json<FinalInspection>,
    pub tpi_inspection: Json<TpiInspection>,
    pub dispatch: Json<DispatchSection>,
    pub rejections: Json<Vec<RejectionEntry>>,
    pub tpi_rejections: Json<Vec<RejectionEntry>>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
}

/// 用户档案数据库行
#[derive(Debug, FromRow)]
pub struct UserProfileRow {
    pub uid: String,
    pub email: Option<String>,
    pub name: String,
    pub mobile: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
