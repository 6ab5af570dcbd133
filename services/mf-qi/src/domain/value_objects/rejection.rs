//! 不良登记

use serde::{Deserialize, Serialize};

/// 一条不良登记：缺陷类型按名称引用词表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionEntry {
    pub defect_type: String,
    pub quantity: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl RejectionEntry {
    pub fn new(defect_type: impl Into<String>, quantity: u64) -> Self {
        Self {
            defect_type: defect_type.into(),
            quantity,
            remarks: None,
        }
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}
