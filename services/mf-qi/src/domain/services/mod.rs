//! 领域服务

pub mod access_policy;
pub mod admin_guard;
pub mod carry_forward;
pub mod entry;
pub mod metrics;
pub mod pareto;
pub mod reports;

pub use access_policy::{FieldAccess, FormField, FormSection, SectionAccess, SectionView, form_layout};
pub use admin_guard::{ProfileChange, ensure_admin_remains};
pub use carry_forward::{CumulativeSeed, cumulative_before};
pub use entry::{apply_derived_fields, merge_submission, validate_entry};
pub use metrics::{AskingRate, DashboardMetrics, PartFilter, compute_dashboard};
pub use pareto::{ParetoEntry, ParetoWindow, defect_pareto, tpi_part_pareto};
pub use reports::{
    PartDailyReport, PendingSummary, ProgressReport, ReportShift, TpiRangeReport, build_progress_report,
    part_daily_report, pending_summaries, tpi_range_report,
};
