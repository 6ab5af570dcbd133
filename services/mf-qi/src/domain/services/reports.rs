//! 报表
//!
//! WhatsApp 进度报告、当日待检汇总、TPI 区间报表、零件日报

use std::fmt::Write;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::ai::PartProgress;
use crate::domain::entities::{InspectionRecord, MonthlyTargets};
use crate::domain::enums::{PartName, Shift};
use crate::domain::value_objects::{InspectionData, RejectionEntry, saturating_sum};

use super::carry_forward::latest_on_or_before;
use super::metrics::{AskingRate, PartFilter, part_asking_rate};
use super::pareto::{ParetoEntry, ParetoWindow, tpi_part_pareto};

const WHATSAPP_SEND_URL: &str = "whatsapp://send?text=";
const IMAGE_FOOTER: &str = "Please see attached image for a visual summary of progress against targets.";

/// 报告班次范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReportShift {
    #[default]
    DayTotal,
    A,
    B,
}

impl ReportShift {
    pub fn shift(&self) -> Option<Shift> {
        match self {
            ReportShift::DayTotal => None,
            ReportShift::A => Some(Shift::A),
            ReportShift::B => Some(Shift::B),
        }
    }

    fn summary_label(&self) -> String {
        match self.shift() {
            None => "Daily Summary".to_string(),
            Some(shift) => format!("Shift {} Summary", shift),
        }
    }
}

/// 按缺陷类型归并后的数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectCount {
    pub defect_type: String,
    pub quantity: u64,
}

/// 按首次出现顺序归并缺陷数量
pub fn group_by_defect<'a>(rejections: impl IntoIterator<Item = &'a RejectionEntry>) -> Vec<DefectCount> {
    let mut grouped: Vec<DefectCount> = Vec::new();
    for rejection in rejections {
        match grouped.iter_mut().find(|g| g.defect_type == rejection.defect_type) {
            Some(group) => group.quantity = group.quantity.saturating_add(rejection.quantity),
            None => grouped.push(DefectCount {
                defect_type: rejection.defect_type.clone(),
                quantity: rejection.quantity,
            }),
        }
    }
    grouped
}

/// 班次或全天汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSummary {
    pub multigauge_total: u64,
    pub multigauge_ok: u64,
    pub multigauge_not_ok: u64,
    pub visual_done: u64,
    pub visual_ok: u64,
    pub visual_not_ok: u64,
    pub final_rejections: Vec<DefectCount>,
    pub tpi_done: u64,
    pub tpi_ok: u64,
    pub tpi_not_ok: u64,
    pub tpi_rejections: Vec<DefectCount>,
    pub rfd_today: u64,
    pub dispatch_today: u64,
}

impl ShiftSummary {
    fn from_records(records: &[&InspectionRecord]) -> Self {
        let total = |count: fn(&InspectionData) -> u64| saturating_sum(records.iter().map(|r| count(&r.data)));
        ShiftSummary {
            multigauge_total: total(|d| d.final_inspection.multigauge.total),
            multigauge_ok: total(|d| d.final_inspection.multigauge.ok),
            multigauge_not_ok: total(|d| d.final_inspection.multigauge.not_ok),
            visual_done: total(|d| d.final_inspection.visual.visual_done),
            visual_ok: total(|d| d.final_inspection.visual.ok),
            visual_not_ok: total(|d| d.final_inspection.visual.not_ok),
            tpi_done: total(|d| d.tpi_inspection.done),
            tpi_ok: total(|d| d.tpi_inspection.ok),
            tpi_not_ok: total(|d| d.tpi_inspection.not_ok),
            rfd_today: total(|d| d.dispatch.rfd.today),
            dispatch_today: total(|d| d.dispatch.dispatch.today),
            final_rejections: group_by_defect(records.iter().flat_map(|r| &r.data.rejections)),
            tpi_rejections: group_by_defect(records.iter().flat_map(|r| &r.data.tpi_rejections)),
        }
    }
}

/// 待检数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingQuantities {
    pub washing_pending: u64,
    pub multigauge_pending: u64,
    pub visual_pending: u64,
    pub tpi_pending: u64,
}

impl PendingQuantities {
    fn from_record(record: Option<&InspectionRecord>) -> Self {
        record
            .map(|r| PendingQuantities {
                washing_pending: r.data.material_inspection.washing_pending,
                multigauge_pending: r.data.material_inspection.multigauge_pending,
                visual_pending: r.data.final_inspection.visual.pending,
                tpi_pending: r.data.tpi_inspection.pending,
            })
            .unwrap_or_default()
    }
}

/// 单零件进度
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartProgressSection {
    pub part_name: PartName,
    pub target: u64,
    pub cumulative_rfd: u64,
    pub cumulative_dispatch: u64,
    pub asking_rate: AskingRate,
    pub summary: ShiftSummary,
    pub pending: PendingQuantities,
    pub progress: PartProgress,
}

/// WhatsApp 进度报告
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub title: String,
    pub report_date: NaiveDate,
    pub shift: ReportShift,
    pub parts: Vec<PartProgressSection>,
    pub text: String,
    pub share_url: String,
}

impl ProgressReport {
    /// 生成图片所需的各零件进度
    pub fn parts_progress(&self) -> Vec<PartProgress> {
        self.parts.iter().map(|p| p.progress.clone()).collect()
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// 长日期格式，如 "June 1st, 2024"
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{} {}{}, {}",
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

/// WhatsApp 分享链接
pub fn whatsapp_share_url(text: &str) -> String {
    format!("{}{}", WHATSAPP_SEND_URL, urlencoding::encode(text))
}

fn build_part_section(
    records: &[InspectionRecord],
    targets: &MonthlyTargets,
    part: PartName,
    report_date: NaiveDate,
    shift: ReportShift,
) -> PartProgressSection {
    let latest = latest_on_or_before(records, part, report_date);

    let day_records: Vec<&InspectionRecord> = records
        .iter()
        .filter(|r| r.part_name == part && r.date == report_date)
        .filter(|r| shift.shift().is_none_or(|s| r.shift == s))
        .collect();

    let (inspected, ok) = records
        .iter()
        .filter(|r| r.part_name == part && r.date <= report_date)
        .fold((0u64, 0u64), |(inspected, ok), r| {
            (
                inspected.saturating_add(r.data.final_inspection.visual.visual_done),
                ok.saturating_add(r.data.final_inspection.visual.ok),
            )
        });

    let target = targets.get(part);
    PartProgressSection {
        part_name: part,
        target,
        cumulative_rfd: latest.map(|r| r.data.dispatch.rfd.cumulative).unwrap_or(0),
        cumulative_dispatch: latest.map(|r| r.data.dispatch.dispatch.cumulative).unwrap_or(0),
        asking_rate: part_asking_rate(records, part, report_date, targets),
        summary: ShiftSummary::from_records(&day_records),
        pending: PendingQuantities::from_record(latest),
        progress: PartProgress {
            name: part,
            target,
            inspected,
            ok,
        },
    }
}

fn write_defects(text: &mut String, heading: &str, defects: &[DefectCount]) {
    if defects.is_empty() {
        return;
    }
    let _ = writeln!(text, "    {}:", heading);
    for defect in defects {
        let _ = writeln!(text, "      - {}: {}", defect.defect_type, defect.quantity);
    }
}

/// 渲染报告文本
pub fn render_report_text(title: &str, report_date: NaiveDate, shift: ReportShift, parts: &[PartProgressSection]) -> String {
    let long_date = format_long_date(report_date);
    let short_date = report_date.format("%d/%m").to_string();
    let mut text = String::new();

    let _ = writeln!(text, "{} - {}", title, long_date);
    let _ = writeln!(text, "====================================\n");

    for part in parts {
        let s = &part.summary;
        let _ = writeln!(text, "{}", part.part_name.as_str().to_uppercase());
        let _ = writeln!(text, "--------------------");
        let _ = writeln!(text, "Target (Month OK Parts): {}", part.target);
        let _ = writeln!(text, "Cumulative RFD (as of {}): {}", short_date, part.cumulative_rfd);
        let _ = writeln!(text, "Cumulative Dispatch (as of {}): {}", short_date, part.cumulative_dispatch);

        let rate = &part.asking_rate;
        if rate.target_met {
            text.push_str("Daily Asking Rate (RFD): Target Met!");
            if rate.needed < 0 {
                let _ = write!(text, " (Surplus {})", -rate.needed);
            }
            text.push_str("\n\n");
        } else {
            let _ = writeln!(
                text,
                "Daily Asking Rate (RFD): {} units/day (Need {} more in {} days)\n",
                rate.rate, rate.needed, rate.remaining_days
            );
        }

        let _ = writeln!(text, "{} (for {}):", shift.summary_label(), long_date);
        let _ = writeln!(text, "  Multigauge Insp:");
        let _ = writeln!(text, "    Total Inspected: {}", s.multigauge_total);
        let _ = writeln!(text, "    OK: {}", s.multigauge_ok);
        let _ = writeln!(text, "    Not OK: {}", s.multigauge_not_ok);
        let _ = writeln!(text, "  Visual Insp:");
        let _ = writeln!(text, "    Visual Done: {}", s.visual_done);
        let _ = writeln!(text, "    OK: {}", s.visual_ok);
        let _ = writeln!(text, "    Not OK: {}", s.visual_not_ok);
        write_defects(&mut text, "Rejections (Final Visual Insp.)", &s.final_rejections);
        let _ = writeln!(text, "  TPI Insp:");
        let _ = writeln!(text, "    Done: {}", s.tpi_done);
        let _ = writeln!(text, "    OK: {}", s.tpi_ok);
        let _ = writeln!(text, "    Not OK: {}", s.tpi_not_ok);
        write_defects(&mut text, "Rejections (TPI)", &s.tpi_rejections);
        let _ = writeln!(text, "  Dispatch (Today):");
        let _ = writeln!(text, "    RFD: {}", s.rfd_today);
        let _ = writeln!(text, "    Dispatched: {}\n", s.dispatch_today);

        let p = &part.pending;
        let _ = writeln!(text, "Inspection Pending (as of end of {}):", long_date);
        let _ = writeln!(text, "  Washing Pending: {}", p.washing_pending);
        let _ = writeln!(text, "  Multigauge Pending (Mat.Insp): {}", p.multigauge_pending);
        let _ = writeln!(text, "  Visual Pending (Final Insp.): {}", p.visual_pending);
        let _ = writeln!(text, "  TPI Pending: {}\n\n", p.tpi_pending);
    }

    text.push_str(IMAGE_FOOTER);
    text
}

/// 生成 WhatsApp 进度报告
pub fn build_progress_report(
    records: &[InspectionRecord],
    targets: &MonthlyTargets,
    report_date: NaiveDate,
    shift: ReportShift,
    title: &str,
) -> ProgressReport {
    let parts: Vec<PartProgressSection> = PartName::ALL
        .iter()
        .map(|part| build_part_section(records, targets, *part, report_date, shift))
        .collect();

    let text = render_report_text(title, report_date, shift, &parts);
    ProgressReport {
        title: title.to_string(),
        report_date,
        shift,
        share_url: whatsapp_share_url(&text),
        parts,
        text,
    }
}

/// 某日各零件最新班次的待检数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSummary {
    pub part_name: PartName,
    /// 当天无记录时为空
    pub shift: Option<Shift>,
    pub pending: PendingQuantities,
}

pub fn pending_summaries(records: &[InspectionRecord], date: NaiveDate) -> Vec<PendingSummary> {
    PartName::ALL
        .iter()
        .map(|part| {
            let latest = records
                .iter()
                .filter(|r| r.part_name == *part && r.date == date)
                .max_by_key(|r| r.shift);
            PendingSummary {
                part_name: *part,
                shift: latest.map(|r| r.shift),
                pending: PendingQuantities::from_record(latest),
            }
        })
        .collect()
}

/// TPI 区间报表
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TpiRangeReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub part_filter: PartFilter,
    pub total_done: u64,
    pub total_ok: u64,
    pub total_rejections: u64,
    pub pareto: Vec<ParetoEntry>,
}

pub fn tpi_range_report(
    records: &[InspectionRecord],
    filter: PartFilter,
    from: NaiveDate,
    to: NaiveDate,
) -> TpiRangeReport {
    let window = ParetoWindow::Range { from, to };
    let in_range: Vec<&InspectionRecord> = records
        .iter()
        .filter(|r| filter.matches(r.part_name) && window.contains(r.date, to))
        .collect();

    TpiRangeReport {
        from,
        to,
        part_filter: filter,
        total_done: saturating_sum(in_range.iter().map(|r| r.data.tpi_inspection.done)),
        total_ok: saturating_sum(in_range.iter().map(|r| r.data.tpi_inspection.ok)),
        total_rejections: saturating_sum(in_range.iter().map(|r| r.data.tpi_rejection_quantity())),
        pareto: tpi_part_pareto(records, filter, window, to),
    }
}

/// 零件日报
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartDailyReport {
    pub part_name: PartName,
    pub date: NaiveDate,
    pub record: Option<InspectionRecord>,
    /// 综合检具 + 外观不良
    pub process_step_not_ok: u64,
    /// TPI 返工数量
    pub tpi_rework: u64,
    /// 外观不良 PPM
    pub visual_rejection_ppm: u64,
    /// 截至当天的工序不良累计（不含 TPI）
    pub cumulative_process_step_rejection: u64,
}

/// 外观不良 PPM，已检为 0 时为 0
pub fn visual_rejection_ppm(not_ok: u64, visual_done: u64) -> u64 {
    if visual_done == 0 {
        return 0;
    }
    (not_ok as f64 / visual_done as f64 * 1_000_000.0).round() as u64
}

/// 未指定班次时先取 A 班，没有再取 B 班
pub fn part_daily_report(
    records: &[InspectionRecord],
    part: PartName,
    date: NaiveDate,
    shift: Option<Shift>,
) -> PartDailyReport {
    let shifts: &[Shift] = match shift {
        Some(Shift::A) => &[Shift::A],
        Some(Shift::B) => &[Shift::B],
        None => &Shift::ALL,
    };
    let record = shifts.iter().find_map(|s| {
        records
            .iter()
            .find(|r| r.part_name == part && r.date == date && r.shift == *s)
    });

    let cumulative_process_step_rejection = saturating_sum(
        records
            .iter()
            .filter(|r| r.part_name == part && r.date <= date)
            .map(|r| r.data.process_step_not_ok()),
    );

    PartDailyReport {
        part_name: part,
        date,
        process_step_not_ok: record.map(|r| r.data.process_step_not_ok()).unwrap_or(0),
        tpi_rework: record.map(|r| r.data.tpi_inspection.not_ok).unwrap_or(0),
        visual_rejection_ppm: record
            .map(|r| {
                let visual = &r.data.final_inspection.visual;
                visual_rejection_ppm(visual.not_ok, visual.visual_done)
            })
            .unwrap_or(0),
        cumulative_process_step_rejection,
        record: record.cloned(),
    }
}
