//! InspectZen Metrics
//!
//! 业务指标记录

use std::time::Instant;

use metrics::{counter, gauge, histogram};

// ============================================================================
// 检验记录
// ============================================================================

/// 记录一次录入保存
pub fn record_entry_saved(part: &str, shift: &str, created: bool) {
    let labels = [
        ("part", part.to_string()),
        ("shift", shift.to_string()),
        ("mode", if created { "create" } else { "update" }.to_string()),
    ];
    counter!("qi_entries_saved_total", &labels).increment(1);
}

/// 记录录入校验失败
pub fn record_entry_rejected(issue_count: usize) {
    counter!("qi_entries_rejected_total").increment(1);
    histogram!("qi_entry_validation_issues").record(issue_count as f64);
}

/// 记录删除
pub fn record_records_deleted(count: u64) {
    counter!("qi_records_deleted_total").increment(count);
}

/// 快照中的记录数
pub fn record_snapshot_size(len: usize) {
    gauge!("qi_snapshot_records").set(len as f64);
}

// ============================================================================
// AI
// ============================================================================

/// 记录一次 AI 调用
pub fn record_ai_call(flow: &str, success: bool, started: Instant) {
    let labels = [("flow", flow.to_string()), ("success", success.to_string())];
    counter!("qi_ai_calls_total", &labels).increment(1);
    histogram!("qi_ai_call_duration_seconds", &labels).record(started.elapsed().as_secs_f64());
}
