//! 缺陷类型词表

use serde::{Deserialize, Serialize};
use zen_errors::{AppError, AppResult};

/// 初始缺陷类型
pub const INITIAL_DEFECT_TYPES: [&str; 9] = [
    "Teeth dent",
    "Chamfer dent",
    "Rusty/pit mark",
    "Profile unclean",
    "Spline dent",
    "ID spline unclean",
    "Profile scratch mark",
    "Root burr",
    "Teeth hunting",
];

/// 只增不删的有序缺陷词表
///
/// 不良登记按名称引用，词表变更不回溯历史记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectVocabulary {
    defects: Vec<String>,
}

impl DefectVocabulary {
    pub fn initial() -> Self {
        Self {
            defects: INITIAL_DEFECT_TYPES.iter().map(|d| d.to_string()).collect(),
        }
    }

    pub fn from_list(defects: Vec<String>) -> Self {
        Self { defects }
    }

    pub fn defects(&self) -> &[String] {
        &self.defects
    }

    /// 不区分大小写的包含判断
    pub fn contains_ignore_case(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        self.defects.iter().any(|d| d.to_lowercase() == needle)
    }

    /// 追加缺陷类型，返回规范化后的名称
    pub fn add(&mut self, name: &str) -> AppResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("Defect type name cannot be empty."));
        }
        if self.contains_ignore_case(trimmed) {
            return Err(AppError::conflict(format!(
                "Defect type \"{}\" already exists.",
                trimmed
            )));
        }
        self.defects.push(trimmed.to_string());
        Ok(trimmed.to_string())
    }
}

impl Default for DefectVocabulary {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_and_appends() {
        let mut vocabulary = DefectVocabulary::initial();
        let added = vocabulary.add("  Crack  ").unwrap();
        assert_eq!(added, "Crack");
        assert_eq!(vocabulary.defects().last().map(String::as_str), Some("Crack"));
        assert_eq!(vocabulary.defects().len(), 10);
    }

    #[test]
    fn test_case_insensitive_duplicate_is_conflict() {
        let mut vocabulary = DefectVocabulary::initial();
        let err = vocabulary.add("teeth DENT").unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(vocabulary.defects().len(), 9);
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut vocabulary = DefectVocabulary::initial();
        assert!(matches!(vocabulary.add("   "), Err(AppError::Validation(_))));
    }
}
