//! Folder hierarchy helpers for the rollup.

use std::collections::{HashMap, HashSet};

use super::{FolderRollup, HoursTotals, ProjectRollup, TierBreakdown};
use crate::project::Folder;

/// Effective default tier per folder: its own tier, else the nearest
/// ancestor's. Cycles in `parent_id` stop the walk.
#[must_use]
pub fn effective_folder_tiers(folders: &[Folder]) -> HashMap<i64, Option<String>> {
    let by_id: HashMap<i64, &Folder> = folders.iter().map(|f| (f.id, f)).collect();
    folders
        .iter()
        .map(|folder| {
            let mut seen = HashSet::new();
            let mut current = Some(folder);
            let mut tier = None;
            while let Some(f) = current {
                if !seen.insert(f.id) {
                    break;
                }
                if let Some(t) = f.quality_tier.as_deref().filter(|t| !t.trim().is_empty()) {
                    tier = Some(t.to_owned());
                    break;
                }
                current = f.parent_id.and_then(|p| by_id.get(&p).copied());
            }
            (folder.id, tier)
        })
        .collect()
}

/// `root` plus every folder below it.
#[must_use]
pub fn subtree_folder_ids(folders: &[Folder], root: i64) -> HashSet<i64> {
    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    for folder in folders {
        if let Some(parent) = folder.parent_id {
            children.entry(parent).or_default().push(folder.id);
        }
    }
    let mut ids = HashSet::new();
    if !folders.iter().any(|f| f.id == root) {
        return ids;
    }
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if ids.insert(id) {
            stack.extend(children.get(&id).into_iter().flatten().copied());
        }
    }
    ids
}

/// Build the rollup forest. Folders whose parent is missing are roots; folders
/// trapped in a parent cycle become roots in input order so that each folder
/// appears exactly once.
pub(super) fn build_folder_rollups(
    folders: &[&Folder],
    projects: &HashMap<i64, Vec<&ProjectRollup>>,
) -> Vec<FolderRollup> {
    let ids: HashSet<i64> = folders.iter().map(|f| f.id).collect();
    let mut children: HashMap<i64, Vec<&Folder>> = HashMap::new();
    let mut roots = Vec::new();
    for folder in folders {
        match folder.parent_id.filter(|p| ids.contains(p) && *p != folder.id) {
            Some(parent) => children.entry(parent).or_default().push(*folder),
            None => roots.push(*folder),
        }
    }
    for siblings in children.values_mut() {
        siblings.sort_by_key(|f| (f.order, f.id));
    }
    roots.sort_by_key(|f| (f.order, f.id));

    let mut visited = HashSet::new();
    let mut forest: Vec<FolderRollup> = roots
        .into_iter()
        .filter_map(|root| rollup_folder(root, &children, projects, &mut visited))
        .collect();

    for folder in folders {
        if !visited.contains(&folder.id) {
            tracing::warn!(folder_id = folder.id, "folder parent cycle detected, treating as root");
            forest.extend(rollup_folder(folder, &children, projects, &mut visited));
        }
    }
    forest
}

fn rollup_folder(
    folder: &Folder,
    children: &HashMap<i64, Vec<&Folder>>,
    projects: &HashMap<i64, Vec<&ProjectRollup>>,
    visited: &mut HashSet<i64>,
) -> Option<FolderRollup> {
    if !visited.insert(folder.id) {
        return None;
    }

    let mut totals = HoursTotals::default();
    let mut tiers = TierBreakdown::default();
    let mut project_ids = Vec::new();
    for project in projects.get(&folder.id).into_iter().flatten() {
        totals.add(&project.totals);
        tiers.add(&project.tiers);
        project_ids.push(project.project_id);
    }

    let mut child_rollups = Vec::new();
    for child in children.get(&folder.id).into_iter().flatten() {
        if let Some(rollup) = rollup_folder(child, children, projects, visited) {
            totals.add(&rollup.totals);
            tiers.add(&rollup.tiers);
            child_rollups.push(rollup);
        }
    }

    Some(FolderRollup {
        folder_id: folder.id,
        name: folder.name.clone(),
        parent_id: folder.parent_id,
        totals,
        tiers,
        project_ids,
        children: child_rollups,
    })
}
