//! 表单访问策略
//!
//! 声明式表单结构 + 纯函数：(角色, 分区) -> 可见/只读，(角色, 字段) -> 访问级别。
//! 录入合并与前端禁用状态都只读取这里

use serde::Serialize;

use crate::domain::enums::UserRole;
use crate::domain::value_objects::InspectionData;

/// 表单分区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormSection {
    MaterialInspection,
    FinalInspection,
    TpiInspection,
    Dispatch,
    FinalRejections,
    TpiRejections,
}

/// 计数字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    WashingPending,
    MultigaugePending,
    MultigaugeTotal,
    MultigaugeOk,
    MultigaugeNotOk,
    VisualPending,
    VisualDone,
    VisualOk,
    VisualNotOk,
    TpiPending,
    TpiDone,
    TpiOk,
    TpiNotOk,
    RfdCumulative,
    RfdToday,
    DispatchCumulative,
    DispatchToday,
}

impl FormField {
    /// 字段路径（与 JSON 字段名一致）
    pub fn path(&self) -> &'static str {
        match self {
            FormField::WashingPending => "materialInspection.washingPending",
            FormField::MultigaugePending => "materialInspection.multigaugePending",
            FormField::MultigaugeTotal => "finalInspection.multigauge.total",
            FormField::MultigaugeOk => "finalInspection.multigauge.ok",
            FormField::MultigaugeNotOk => "finalInspection.multigauge.notOk",
            FormField::VisualPending => "finalInspection.visual.pending",
            FormField::VisualDone => "finalInspection.visual.visualDone",
            FormField::VisualOk => "finalInspection.visual.ok",
            FormField::VisualNotOk => "finalInspection.visual.notOk",
            FormField::TpiPending => "tpiInspection.pending",
            FormField::TpiDone => "tpiInspection.done",
            FormField::TpiOk => "tpiInspection.ok",
            FormField::TpiNotOk => "tpiInspection.notOk",
            FormField::RfdCumulative => "dispatch.rfd.cumulative",
            FormField::RfdToday => "dispatch.rfd.today",
            FormField::DispatchCumulative => "dispatch.dispatch.cumulative",
            FormField::DispatchToday => "dispatch.dispatch.today",
        }
    }

    pub fn read(&self, data: &InspectionData) -> u64 {
        let fi = &data.final_inspection;
        match self {
            FormField::WashingPending => data.material_inspection.washing_pending,
            FormField::MultigaugePending => data.material_inspection.multigauge_pending,
            FormField::MultigaugeTotal => fi.multigauge.total,
            FormField::MultigaugeOk => fi.multigauge.ok,
            FormField::MultigaugeNotOk => fi.multigauge.not_ok,
            FormField::VisualPending => fi.visual.pending,
            FormField::VisualDone => fi.visual.visual_done,
            FormField::VisualOk => fi.visual.ok,
            FormField::VisualNotOk => fi.visual.not_ok,
            FormField::TpiPending => data.tpi_inspection.pending,
            FormField::TpiDone => data.tpi_inspection.done,
            FormField::TpiOk => data.tpi_inspection.ok,
            FormField::TpiNotOk => data.tpi_inspection.not_ok,
            FormField::RfdCumulative => data.dispatch.rfd.cumulative,
            FormField::RfdToday => data.dispatch.rfd.today,
            FormField::DispatchCumulative => data.dispatch.dispatch.cumulative,
            FormField::DispatchToday => data.dispatch.dispatch.today,
        }
    }

    pub fn write(&self, data: &mut InspectionData, value: u64) {
        let fi = &mut data.final_inspection;
        let slot = match self {
            FormField::WashingPending => &mut data.material_inspection.washing_pending,
            FormField::MultigaugePending => &mut data.material_inspection.multigauge_pending,
            FormField::MultigaugeTotal => &mut fi.multigauge.total,
            FormField::MultigaugeOk => &mut fi.multigauge.ok,
            FormField::MultigaugeNotOk => &mut fi.multigauge.not_ok,
            FormField::VisualPending => &mut fi.visual.pending,
            FormField::VisualDone => &mut fi.visual.visual_done,
            FormField::VisualOk => &mut fi.visual.ok,
            FormField::VisualNotOk => &mut fi.visual.not_ok,
            FormField::TpiPending => &mut data.tpi_inspection.pending,
            FormField::TpiDone => &mut data.tpi_inspection.done,
            FormField::TpiOk => &mut data.tpi_inspection.ok,
            FormField::TpiNotOk => &mut data.tpi_inspection.not_ok,
            FormField::RfdCumulative => &mut data.dispatch.rfd.cumulative,
            FormField::RfdToday => &mut data.dispatch.rfd.today,
            FormField::DispatchCumulative => &mut data.dispatch.dispatch.cumulative,
            FormField::DispatchToday => &mut data.dispatch.dispatch.today,
        };
        *slot = value;
    }
}

/// 字段级规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// 普通输入
    Input,
    /// 总是自动计算
    AlwaysDerived,
    /// 对这些角色自动计算
    DerivedFor(&'static [UserRole]),
    /// 对这些角色禁用
    DisabledFor(&'static [UserRole]),
    /// 仅管理员可直接填写，其余角色由结转计算
    AdminOnly,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub field: FormField,
    pub label: &'static str,
    pub rule: FieldRule,
}

#[derive(Debug, Clone, Copy)]
pub struct SectionDescriptor {
    pub section: FormSection,
    pub title: &'static str,
    pub hidden_for: &'static [UserRole],
    pub read_only_for: &'static [UserRole],
    pub fields: &'static [FieldDescriptor],
}

const fn field(field: FormField, label: &'static str, rule: FieldRule) -> FieldDescriptor {
    FieldDescriptor { field, label, rule }
}

const TPI_ONLY: &[UserRole] = &[UserRole::TpiInspector];
const FINAL_ONLY: &[UserRole] = &[UserRole::FinalInspector];
const VIEWER_ONLY: &[UserRole] = &[UserRole::DataViewer];

/// 表单结构（所有零件共用）
pub static FORM_SCHEMA: [SectionDescriptor; 6] = [
    SectionDescriptor {
        section: FormSection::MaterialInspection,
        title: "Material Inspection",
        hidden_for: TPI_ONLY,
        read_only_for: VIEWER_ONLY,
        fields: &[
            field(FormField::WashingPending, "Washing Pending", FieldRule::Input),
            field(FormField::MultigaugePending, "Multigauge Pending", FieldRule::Input),
        ],
    },
    SectionDescriptor {
        section: FormSection::FinalInspection,
        title: "Final Inspection",
        hidden_for: TPI_ONLY,
        read_only_for: VIEWER_ONLY,
        fields: &[
            field(FormField::MultigaugeTotal, "Total Inspected", FieldRule::AlwaysDerived),
            field(FormField::MultigaugeOk, "OK", FieldRule::Input),
            field(FormField::MultigaugeNotOk, "Not OK", FieldRule::Input),
            field(FormField::VisualPending, "Pending for Inspection", FieldRule::Input),
            field(FormField::VisualDone, "Visual Done", FieldRule::DerivedFor(FINAL_ONLY)),
            field(FormField::VisualOk, "OK", FieldRule::Input),
            field(FormField::VisualNotOk, "Not OK", FieldRule::Input),
        ],
    },
    SectionDescriptor {
        section: FormSection::TpiInspection,
        title: "TPI Inspection",
        hidden_for: FINAL_ONLY,
        read_only_for: VIEWER_ONLY,
        fields: &[
            field(FormField::TpiPending, "Pending", FieldRule::Input),
            field(FormField::TpiDone, "Done", FieldRule::DerivedFor(TPI_ONLY)),
            field(FormField::TpiOk, "OK", FieldRule::Input),
            field(FormField::TpiNotOk, "Not OK", FieldRule::Input),
        ],
    },
    SectionDescriptor {
        section: FormSection::Dispatch,
        title: "Dispatch",
        hidden_for: &[],
        read_only_for: VIEWER_ONLY,
        fields: &[
            field(FormField::RfdCumulative, "Cumulative RFD", FieldRule::AdminOnly),
            field(FormField::RfdToday, "Today's RFD", FieldRule::Input),
            field(FormField::DispatchCumulative, "Cumulative Dispatch", FieldRule::AdminOnly),
            field(FormField::DispatchToday, "Today's Actual Dispatch", FieldRule::DisabledFor(TPI_ONLY)),
        ],
    },
    SectionDescriptor {
        section: FormSection::FinalRejections,
        title: "Final Inspection Rejections",
        hidden_for: TPI_ONLY,
        read_only_for: VIEWER_ONLY,
        fields: &[],
    },
    SectionDescriptor {
        section: FormSection::TpiRejections,
        title: "TPI Rejections",
        hidden_for: FINAL_ONLY,
        read_only_for: VIEWER_ONLY,
        fields: &[],
    },
];

/// 分区访问结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionAccess {
    pub hidden: bool,
    pub read_only: bool,
}

impl SectionAccess {
    pub fn is_editable(&self) -> bool {
        !self.hidden && !self.read_only
    }
}

/// 字段访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldAccess {
    Editable,
    ReadOnly,
    /// 由其它字段计算得出
    Derived,
}

fn section_index(section: FormSection) -> usize {
    match section {
        FormSection::MaterialInspection => 0,
        FormSection::FinalInspection => 1,
        FormSection::TpiInspection => 2,
        FormSection::Dispatch => 3,
        FormSection::FinalRejections => 4,
        FormSection::TpiRejections => 5,
    }
}

/// 字段在 `FORM_SCHEMA` 中的位置（分区下标，分区内下标）
fn field_position(field: FormField) -> (usize, usize) {
    match field {
        FormField::WashingPending => (0, 0),
        FormField::MultigaugePending => (0, 1),
        FormField::MultigaugeTotal => (1, 0),
        FormField::MultigaugeOk => (1, 1),
        FormField::MultigaugeNotOk => (1, 2),
        FormField::VisualPending => (1, 3),
        FormField::VisualDone => (1, 4),
        FormField::VisualOk => (1, 5),
        FormField::VisualNotOk => (1, 6),
        FormField::TpiPending => (2, 0),
        FormField::TpiDone => (2, 1),
        FormField::TpiOk => (2, 2),
        FormField::TpiNotOk => (2, 3),
        FormField::RfdCumulative => (3, 0),
        FormField::RfdToday => (3, 1),
        FormField::DispatchCumulative => (3, 2),
        FormField::DispatchToday => (3, 3),
    }
}

pub fn section_descriptor(section: FormSection) -> &'static SectionDescriptor {
    &FORM_SCHEMA[section_index(section)]
}

fn field_descriptor(field: FormField) -> (&'static SectionDescriptor, &'static FieldDescriptor) {
    let (section, index) = field_position(field);
    let descriptor = &FORM_SCHEMA[section];
    (descriptor, &descriptor.fields[index])
}

pub fn section_access(role: UserRole, section: FormSection) -> SectionAccess {
    let descriptor = section_descriptor(section);
    SectionAccess {
        hidden: descriptor.hidden_for.contains(&role),
        read_only: role == UserRole::DataViewer || descriptor.read_only_for.contains(&role),
    }
}

pub fn field_access(role: UserRole, field: FormField) -> FieldAccess {
    if role == UserRole::DataViewer {
        return FieldAccess::ReadOnly;
    }

    let (section, descriptor) = field_descriptor(field);
    match descriptor.rule {
        FieldRule::AdminOnly if role.is_admin() => return FieldAccess::Editable,
        FieldRule::AdminOnly => return FieldAccess::Derived,
        FieldRule::DerivedFor(roles) if roles.contains(&role) => return FieldAccess::Derived,
        _ => {}
    }

    let access = section_access(role, section.section);
    if access.hidden || access.read_only {
        return FieldAccess::ReadOnly;
    }

    match descriptor.rule {
        FieldRule::DisabledFor(roles) if roles.contains(&role) => FieldAccess::ReadOnly,
        FieldRule::AlwaysDerived => FieldAccess::Derived,
        _ => FieldAccess::Editable,
    }
}

/// 某角色看到的字段
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub path: &'static str,
    pub label: &'static str,
    pub access: FieldAccess,
}

/// 某角色看到的分区
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub section: FormSection,
    pub title: &'static str,
    pub hidden: bool,
    pub read_only: bool,
    pub fields: Vec<FieldView>,
}

/// 按角色展开整张表单
pub fn form_layout(role: UserRole) -> Vec<SectionView> {
    FORM_SCHEMA
        .iter()
        .map(|descriptor| {
            let access = section_access(role, descriptor.section);
            SectionView {
                section: descriptor.section,
                title: descriptor.title,
                hidden: access.hidden,
                read_only: access.read_only,
                fields: descriptor
                    .fields
                    .iter()
                    .map(|f| FieldView {
                        path: f.field.path(),
                        label: f.label,
                        access: field_access(role, f.field),
                    })
                    .collect(),
            }
        })
        .collect()
}

/// 所有计数字段
pub fn all_fields() -> impl Iterator<Item = FormField> {
    FORM_SCHEMA.iter().flat_map(|s| s.fields.iter().map(|f| f.field))
}
