//! JSON preview adapter.

use chrono::{DateTime, Utc};
use onyx_ext_core::{
    format_creation_hours, format_hours, minutes_to_hours, rate_minutes_to_hours, FolderRollup,
    HoursReport, HoursTotals, QualityTier, TierTotals,
};
use onyx_ext_render::ReportMeta;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewTotals {
    pub project_count: u64,
    pub module_count: u64,
    pub lesson_count: u64,
    pub learning_hours: f64,
    pub completion_hours: f64,
    pub creation_hours: f64,
    pub learning_display: String,
    pub completion_display: String,
    pub creation_display: String,
}

impl From<&HoursTotals> for PreviewTotals {
    fn from(t: &HoursTotals) -> Self {
        Self {
            project_count: t.project_count,
            module_count: t.module_count,
            lesson_count: t.lesson_count,
            learning_hours: minutes_to_hours(t.learning_minutes),
            completion_hours: minutes_to_hours(t.completion_minutes),
            creation_hours: rate_minutes_to_hours(t.creation_rate_minutes),
            learning_display: format_hours(t.learning_minutes),
            completion_display: format_hours(t.completion_minutes),
            creation_display: format_creation_hours(t.creation_rate_minutes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewTier {
    pub tier: QualityTier,
    pub label: &'static str,
    pub rate_percent: u64,
    pub lesson_count: u64,
    pub completion_hours: f64,
    pub creation_hours: f64,
    pub completion_display: String,
    pub creation_display: String,
}

impl From<&TierTotals> for PreviewTier {
    fn from(row: &TierTotals) -> Self {
        Self {
            tier: row.tier,
            label: row.tier.label(),
            rate_percent: row.tier.rate_percent(),
            lesson_count: row.lesson_count,
            completion_hours: minutes_to_hours(row.completion_minutes),
            creation_hours: rate_minutes_to_hours(row.creation_rate_minutes),
            completion_display: format_hours(row.completion_minutes),
            creation_display: format_creation_hours(row.creation_rate_minutes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewFolder {
    pub id: i64,
    pub name: String,
    pub totals: PreviewTotals,
    pub project_ids: Vec<i64>,
    pub children: Vec<PreviewFolder>,
}

impl From<&FolderRollup> for PreviewFolder {
    fn from(folder: &FolderRollup) -> Self {
        Self {
            id: folder.folder_id,
            name: folder.name.clone(),
            totals: PreviewTotals::from(&folder.totals),
            project_ids: folder.project_ids.clone(),
            children: folder.children.iter().map(Self::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewProject {
    pub id: i64,
    pub name: String,
    pub folder_id: Option<i64>,
    pub default_tier: QualityTier,
    pub totals: PreviewTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoursPreview {
    pub title: String,
    pub folder_id: Option<i64>,
    pub scope_label: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub summary: PreviewTotals,
    pub tiers: Vec<PreviewTier>,
    pub folders: Vec<PreviewFolder>,
    pub projects: Vec<PreviewProject>,
    pub unfiled_project_ids: Vec<i64>,
}

#[must_use]
pub fn to_preview(report: &HoursReport, meta: &ReportMeta, folder_id: Option<i64>) -> HoursPreview {
    HoursPreview {
        title: meta.title.clone(),
        folder_id,
        scope_label: meta.scope_label.clone(),
        generated_at: meta.generated_at,
        summary: PreviewTotals::from(&report.summary),
        tiers: report.tiers.rows().iter().map(PreviewTier::from).collect(),
        folders: report.folders.iter().map(PreviewFolder::from).collect(),
        projects: report
            .projects
            .iter()
            .map(|p| PreviewProject {
                id: p.project_id,
                name: p.name.clone(),
                folder_id: p.folder_id,
                default_tier: p.default_tier,
                totals: PreviewTotals::from(&p.totals),
            })
            .collect(),
        unfiled_project_ids: report.unfiled_project_ids.clone(),
    }
}
