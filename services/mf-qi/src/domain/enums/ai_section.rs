//! AI 状态建议可选的检验分区

use serde::{Deserialize, Serialize};

/// 检验分区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiSection {
    #[serde(rename = "Material Inspection")]
    MaterialInspection,
    #[serde(rename = "Final Inspection")]
    FinalInspection,
    #[serde(rename = "TPI Inspection")]
    TpiInspection,
    #[serde(rename = "Dispatch")]
    Dispatch,
}

/// 检验子分区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiSubsection {
    #[serde(rename = "Washing pending")]
    WashingPending,
    #[serde(rename = "Multigauge pending")]
    MultigaugePending,
    #[serde(rename = "Multigauge inspection")]
    MultigaugeInspection,
    #[serde(rename = "Visual inspection")]
    VisualInspection,
    #[serde(rename = "TPI Pending")]
    TpiPending,
    #[serde(rename = "TPI Done")]
    TpiDone,
    #[serde(rename = "TPI OK")]
    TpiOk,
    #[serde(rename = "TPI Not OK")]
    TpiNotOk,
    #[serde(rename = "RFD")]
    Rfd,
    #[serde(rename = "Dispatch")]
    Dispatch,
}

impl AiSection {
    pub const ALL: [AiSection; 4] = [
        AiSection::MaterialInspection,
        AiSection::FinalInspection,
        AiSection::TpiInspection,
        AiSection::Dispatch,
    ];

    pub fn subsections(&self) -> &'static [AiSubsection] {
        match self {
            AiSection::MaterialInspection => {
                &[AiSubsection::WashingPending, AiSubsection::MultigaugePending]
            }
            AiSection::FinalInspection => &[
                AiSubsection::MultigaugeInspection,
                AiSubsection::VisualInspection,
            ],
            AiSection::TpiInspection => &[
                AiSubsection::TpiPending,
                AiSubsection::TpiDone,
                AiSubsection::TpiOk,
                AiSubsection::TpiNotOk,
            ],
            AiSection::Dispatch => &[AiSubsection::Rfd, AiSubsection::Dispatch],
        }
    }

    pub fn contains(&self, subsection: AiSubsection) -> bool {
        self.subsections().contains(&subsection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subsection_belongs_to_exactly_one_section() {
        let all_subsections: Vec<AiSubsection> = AiSection::ALL
            .iter()
            .flat_map(|section| section.subsections().iter().copied())
            .collect();
        assert_eq!(all_subsections.len(), 10);

        for subsection in all_subsections {
            let owners = AiSection::ALL
                .iter()
                .filter(|section| section.contains(subsection))
                .count();
            assert_eq!(owners, 1, "{:?}", subsection);
        }
    }

    #[test]
    fn test_dispatch_names_do_not_collide() {
        let section: AiSection = serde_json::from_str("\"Dispatch\"").unwrap();
        let subsection: AiSubsection = serde_json::from_str("\"Dispatch\"").unwrap();
        assert!(section.contains(subsection));
        assert!(!AiSection::TpiInspection.contains(AiSubsection::Rfd));
    }
}
