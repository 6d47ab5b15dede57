//! Hours and quality-tier rollup.
//!
//! [`build_hours_report`] is the single aggregation used by both the JSON
//! preview and the PDF export. All durations are kept as integer minutes and
//! creation effort as integer rate-minutes (`minutes × rate_percent`), so the
//! same input always produces bit-identical output.

mod folder_tree;
#[cfg(test)]
mod rollup_tests;

use std::collections::HashMap;

use serde::Serialize;

use crate::project::{Folder, Project};
use crate::quality_tier::{resolve_effective_tier, QualityTier, TierChain};

pub use folder_tree::{effective_folder_tiers, subtree_folder_ids};

/// Summed counts and durations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HoursTotals {
    pub project_count: u64,
    pub module_count: u64,
    pub lesson_count: u64,
    pub learning_minutes: u64,
    pub completion_minutes: u64,
    pub creation_rate_minutes: u64,
}

impl HoursTotals {
    pub fn add(&mut self, other: &Self) {
        self.project_count += other.project_count;
        self.module_count += other.module_count;
        self.lesson_count += other.lesson_count;
        self.learning_minutes += other.learning_minutes;
        self.completion_minutes += other.completion_minutes;
        self.creation_rate_minutes += other.creation_rate_minutes;
    }
}

/// Totals for one quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierTotals {
    pub tier: QualityTier,
    pub lesson_count: u64,
    pub completion_minutes: u64,
    pub creation_rate_minutes: u64,
}

/// Four rows, one per tier, always in [`QualityTier::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TierBreakdown(pub [TierTotals; 4]);

impl Default for TierBreakdown {
    fn default() -> Self {
        Self(QualityTier::ALL.map(|tier| TierTotals {
            tier,
            lesson_count: 0,
            completion_minutes: 0,
            creation_rate_minutes: 0,
        }))
    }
}

impl TierBreakdown {
    fn record(&mut self, tier: QualityTier, completion_minutes: u64, lessons: u64) {
        if let Some(row) = self.0.get_mut(tier.index()) {
            row.lesson_count += lessons;
            row.completion_minutes += completion_minutes;
            row.creation_rate_minutes += completion_minutes * tier.rate_percent();
        }
    }

    pub fn add(&mut self, other: &Self) {
        for (row, other_row) in self.0.iter_mut().zip(other.0.iter()) {
            row.lesson_count += other_row.lesson_count;
            row.completion_minutes += other_row.completion_minutes;
            row.creation_rate_minutes += other_row.creation_rate_minutes;
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[TierTotals; 4] {
        &self.0
    }

    #[must_use]
    pub fn get(&self, tier: QualityTier) -> &TierTotals {
        &self.0[tier.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRollup {
    pub project_id: i64,
    pub name: String,
    pub folder_id: Option<i64>,
    /// Tier applied to lessons that carry no tier of their own.
    pub default_tier: QualityTier,
    pub totals: HoursTotals,
    pub tiers: TierBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderRollup {
    pub folder_id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub totals: HoursTotals,
    pub tiers: TierBreakdown,
    /// Projects placed directly in this folder.
    pub project_ids: Vec<i64>,
    pub children: Vec<FolderRollup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoursReport {
    pub summary: HoursTotals,
    pub tiers: TierBreakdown,
    pub projects: Vec<ProjectRollup>,
    pub folders: Vec<FolderRollup>,
    /// Projects that are not inside any (known) folder.
    pub unfiled_project_ids: Vec<i64>,
}

impl HoursReport {
    #[must_use]
    pub fn project(&self, id: i64) -> Option<&ProjectRollup> {
        self.projects.iter().find(|p| p.project_id == id)
    }
}

/// Which part of the folder tree a report covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportScope {
    #[default]
    All,
    Folder(i64),
}

/// Roll up one project given the effective tier of its folder.
#[must_use]
pub fn rollup_project(project: &Project, folder_tier: Option<&str>) -> ProjectRollup {
    let tree = project.content_tree();
    let mut totals = HoursTotals { project_count: 1, ..HoursTotals::default() };
    let mut tiers = TierBreakdown::default();
    let project_tier = project.quality_tier.as_deref();

    let default_tier = resolve_effective_tier(TierChain {
        project: project_tier,
        folder: folder_tier,
        ..TierChain::default()
    });

    if tree.is_empty() {
        let minutes = project.completion_time.and_then(|m| u64::try_from(m).ok()).unwrap_or(0);
        totals.learning_minutes = minutes;
        totals.completion_minutes = minutes;
        totals.creation_rate_minutes = minutes * default_tier.rate_percent();
        tiers.record(default_tier, minutes, 0);
    } else {
        for section in &tree.sections {
            if !section.lessons.is_empty() {
                totals.module_count += 1;
            }
            for lesson in &section.lessons {
                let tier = resolve_effective_tier(TierChain {
                    lesson: lesson.quality_tier.as_deref(),
                    section: section.quality_tier.as_deref(),
                    project: project_tier,
                    folder: folder_tier,
                });
                let completion = u64::from(lesson.effective_completion_minutes());
                totals.lesson_count += 1;
                totals.learning_minutes += u64::from(lesson.learning_minutes());
                totals.completion_minutes += completion;
                totals.creation_rate_minutes += completion * tier.rate_percent();
                tiers.record(tier, completion, 1);
            }
        }
    }

    ProjectRollup {
        project_id: project.id,
        name: project.display_name().to_owned(),
        folder_id: project.folder_id,
        default_tier,
        totals,
        tiers,
    }
}

/// Aggregate projects into summary, per-tier and per-folder totals.
///
/// `folders` should be the owner's complete folder list even for a scoped
/// report, so that tier inheritance from ancestors outside the scope works.
#[must_use]
pub fn build_hours_report(projects: &[Project], folders: &[Folder], scope: ReportScope) -> HoursReport {
    let folder_tiers = effective_folder_tiers(folders);
    let in_scope = match scope {
        ReportScope::All => None,
        ReportScope::Folder(root) => Some(subtree_folder_ids(folders, root)),
    };
    let known_folder = |id: Option<i64>| id.filter(|f| folder_tiers.contains_key(f));

    let rollups: Vec<ProjectRollup> = projects
        .iter()
        .filter(|p| match &in_scope {
            None => true,
            Some(ids) => known_folder(p.folder_id).is_some_and(|f| ids.contains(&f)),
        })
        .map(|p| {
            let folder_tier = known_folder(p.folder_id)
                .and_then(|f| folder_tiers.get(&f))
                .and_then(|t| t.as_deref());
            rollup_project(p, folder_tier)
        })
        .collect();

    let mut summary = HoursTotals::default();
    let mut tiers = TierBreakdown::default();
    for rollup in &rollups {
        summary.add(&rollup.totals);
        tiers.add(&rollup.tiers);
    }

    let mut by_folder: HashMap<i64, Vec<&ProjectRollup>> = HashMap::new();
    let mut unfiled_project_ids = Vec::new();
    for rollup in &rollups {
        match known_folder(rollup.folder_id) {
            Some(folder_id) => by_folder.entry(folder_id).or_default().push(rollup),
            None => unfiled_project_ids.push(rollup.project_id),
        }
    }

    let scoped_folders: Vec<&Folder> = folders
        .iter()
        .filter(|f| in_scope.as_ref().is_none_or(|ids| ids.contains(&f.id)))
        .collect();
    let folders = folder_tree::build_folder_rollups(&scoped_folders, &by_folder);

    HoursReport { summary, tiers, projects: rollups, folders, unfiled_project_ids }
}
