//! 零件枚举

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zen_errors::AppError;

/// 受检零件
///
/// 声明顺序即报表、图表中的固定展示顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PartName {
    #[serde(rename = "Lay shaft assy")]
    LayShaftAssy,
    #[serde(rename = "Main reduction gear")]
    MainReductionGear,
    #[serde(rename = "Input shaft")]
    InputShaft,
}

impl PartName {
    pub const ALL: [PartName; 3] = [
        PartName::LayShaftAssy,
        PartName::MainReductionGear,
        PartName::InputShaft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartName::LayShaftAssy => "Lay shaft assy",
            PartName::MainReductionGear => "Main reduction gear",
            PartName::InputShaft => "Input shaft",
        }
    }

    /// URL 路径片段
    pub fn slug(&self) -> &'static str {
        match self {
            PartName::LayShaftAssy => "lay-shaft-assy",
            PartName::MainReductionGear => "main-reduction-gear",
            PartName::InputShaft => "input-shaft",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|part| part.slug() == slug)
    }
}

impl fmt::Display for PartName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|part| part.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown part name: {}", s)))
    }
}
