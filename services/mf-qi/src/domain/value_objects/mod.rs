//! 值对象

mod counters;
mod ids;
mod record_key;
mod rejection;

pub use counters::*;
pub use ids::InspectionRecordId;
pub use record_key::RecordKey;
pub use rejection::RejectionEntry;
