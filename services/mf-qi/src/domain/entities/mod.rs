//! 领域实体

mod defect_vocabulary;
mod inspection_record;
mod monthly_targets;
mod session;
mod user_profile;

pub use defect_vocabulary::{DefectVocabulary, INITIAL_DEFECT_TYPES};
pub use inspection_record::{InspectionRecord, sort_newest_first};
pub use monthly_targets::MonthlyTargets;
pub use session::Session;
pub use user_profile::UserProfile;
