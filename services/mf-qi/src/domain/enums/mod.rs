//! 领域枚举

mod ai_section;
mod part_name;
mod shift;
mod user_role;
mod user_status;

pub use ai_section::{AiSection, AiSubsection};
pub use part_name::PartName;
pub use shift::Shift;
pub use user_role::UserRole;
pub use user_status::UserStatus;
