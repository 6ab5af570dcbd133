//! 月度目标

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::enums::PartName;
use crate::domain::value_objects::saturating_sum;

/// 各零件月度合格数目标，未设置的零件视为 0
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlyTargets(BTreeMap<PartName, u64>);

impl MonthlyTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, part: PartName) -> u64 {
        self.0.get(&part).copied().unwrap_or(0)
    }

    pub fn set(&mut self, part: PartName, target: u64) {
        self.0.insert(part, target);
    }

    pub fn with(mut self, part: PartName, target: u64) -> Self {
        self.set(part, target);
        self
    }

    /// 给定零件集合的目标合计
    pub fn sum_for(&self, parts: &[PartName]) -> u64 {
        saturating_sum(parts.iter().map(|part| self.get(*part)))
    }
}
