//! Tests for the hours rollup.

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    use crate::project::{Folder, Project};
    use crate::quality_tier::QualityTier;
    use crate::rollup::{build_hours_report, rollup_project, ReportScope};

    fn project(id: i64, folder_id: Option<i64>, tier: Option<&str>, content: Value) -> Project {
        Project {
            id,
            onyx_user_id: "user-1".to_owned(),
            project_name: format!("Project {id}"),
            product_type: "training_plan".to_owned(),
            microproduct_name: None,
            microproduct_content: content,
            quality_tier: tier.map(str::to_owned),
            folder_id,
            completion_time: None,
            order: 0,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn folder(id: i64, parent_id: Option<i64>, tier: Option<&str>) -> Folder {
        Folder {
            id,
            onyx_user_id: "user-1".to_owned(),
            name: format!("Folder {id}"),
            parent_id,
            quality_tier: tier.map(str::to_owned),
            order: 0,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn lessons(durations: &[(u32, Option<&str>)]) -> Value {
        let lessons: Vec<Value> = durations
            .iter()
            .map(|(minutes, tier)| json!({"title": "L", "completionTime": format!("{minutes}m"), "quality_tier": tier}))
            .collect();
        json!({"sections": [{"title": "Module", "lessons": lessons}]})
    }

    #[test]
    fn test_worked_example_matches_expected_hours() {
        let p = project(
            1,
            None,
            None,
            lessons(&[(60, Some("basic")), (120, Some("interactive")), (90, Some("advanced"))]),
        );
        let report = build_hours_report(&[p], &[], ReportScope::All);

        assert_eq!(report.summary.lesson_count, 3);
        assert_eq!(report.summary.module_count, 1);
        assert_eq!(report.summary.learning_minutes, 270);
        assert_eq!(report.summary.creation_rate_minutes, 60_000);
        assert_eq!(report.tiers.get(QualityTier::Basic).creation_rate_minutes, 9_000);
        assert_eq!(report.tiers.get(QualityTier::Interactive).creation_rate_minutes, 24_000);
        assert_eq!(report.tiers.get(QualityTier::Advanced).creation_rate_minutes, 27_000);
        assert_eq!(report.tiers.get(QualityTier::Immersive).completion_minutes, 0);
    }

    #[test]
    fn test_tier_rows_are_in_canonical_order_and_sum_to_summary() {
        let p = project(1, None, Some("professional"), lessons(&[(30, None), (15, Some("starter"))]));
        let report = build_hours_report(&[p], &[], ReportScope::All);
        let tiers: Vec<QualityTier> = report.tiers.rows().iter().map(|r| r.tier).collect();
        assert_eq!(tiers, QualityTier::ALL.to_vec());

        let completion: u64 = report.tiers.rows().iter().map(|r| r.completion_minutes).sum();
        let creation: u64 = report.tiers.rows().iter().map(|r| r.creation_rate_minutes).sum();
        assert_eq!(completion, report.summary.completion_minutes);
        assert_eq!(creation, report.summary.creation_rate_minutes);
        assert_eq!(report.tiers.get(QualityTier::Immersive).completion_minutes, 30);
        assert_eq!(report.tiers.get(QualityTier::Basic).completion_minutes, 15);
    }

    #[test]
    fn test_section_tier_overrides_project_and_folder() {
        let content = json!({"sections": [
            {"quality_tier": "advanced", "lessons": [{"completionTime": "10m"}]},
            {"lessons": [{"completionTime": "10m"}]}
        ]});
        let p = project(1, Some(5), Some("basic"), content);
        let report = build_hours_report(&[p], &[folder(5, None, Some("immersive"))], ReportScope::All);
        assert_eq!(report.tiers.get(QualityTier::Advanced).completion_minutes, 10);
        assert_eq!(report.tiers.get(QualityTier::Basic).completion_minutes, 10);
        assert_eq!(report.summary.module_count, 2);
    }

    #[test]
    fn test_folder_tier_is_inherited_from_ancestors() {
        let folders = [folder(1, None, Some("advanced")), folder(2, Some(1), None)];
        let p = project(9, Some(2), None, lessons(&[(60, None)]));
        let report = build_hours_report(&[p], &folders, ReportScope::All);
        assert_eq!(report.tiers.get(QualityTier::Advanced).lesson_count, 1);
        assert_eq!(report.projects[0].default_tier, QualityTier::Advanced);
    }

    #[test]
    fn test_learning_total_is_independent_of_folder_grouping() {
        let content = || lessons(&[(45, None), (30, Some("basic"))]);
        let flat = vec![project(1, None, None, content()), project(2, None, None, content())];
        let grouped = vec![project(1, Some(10), None, content()), project(2, Some(11), None, content())];
        let folders = [folder(10, None, None), folder(11, Some(10), None)];

        let a = build_hours_report(&flat, &[], ReportScope::All);
        let b = build_hours_report(&grouped, &folders, ReportScope::All);
        assert_eq!(a.summary.learning_minutes, b.summary.learning_minutes);
        assert_eq!(a.summary.learning_minutes, 150);
    }

    #[test]
    fn test_folder_totals_sum_leaf_projects_exactly_once() {
        let folders = [folder(1, None, None), folder(2, Some(1), None), folder(3, Some(2), None)];
        let projects = [
            project(10, Some(1), None, lessons(&[(60, None)])),
            project(11, Some(2), None, lessons(&[(30, None)])),
            project(12, Some(3), None, lessons(&[(15, None)])),
            project(13, None, None, lessons(&[(5, None)])),
        ];
        let report = build_hours_report(&projects, &folders, ReportScope::All);

        assert_eq!(report.folders.len(), 1);
        let root = &report.folders[0];
        assert_eq!(root.totals.completion_minutes, 105);
        assert_eq!(root.totals.project_count, 3);
        assert_eq!(root.project_ids, vec![10]);
        assert_eq!(root.children[0].totals.completion_minutes, 45);
        assert_eq!(root.children[0].children[0].totals.completion_minutes, 15);
        assert_eq!(report.unfiled_project_ids, vec![13]);
        assert_eq!(report.summary.completion_minutes, 110);
    }

    #[test]
    fn test_scoped_report_covers_only_subtree() {
        let folders = [folder(1, None, Some("immersive")), folder(2, Some(1), None), folder(3, None, None)];
        let projects = [
            project(10, Some(1), None, lessons(&[(60, None)])),
            project(11, Some(2), None, lessons(&[(30, None)])),
            project(12, Some(3), None, lessons(&[(15, None)])),
            project(13, None, None, lessons(&[(5, None)])),
        ];
        let report = build_hours_report(&projects, &folders, ReportScope::Folder(2));
        assert_eq!(report.summary.completion_minutes, 30);
        assert_eq!(report.folders.len(), 1);
        assert_eq!(report.folders[0].folder_id, 2);
        assert!(report.unfiled_project_ids.is_empty());
        // tier still inherited from folder 1, outside the scope
        assert_eq!(report.tiers.get(QualityTier::Immersive).completion_minutes, 30);
    }

    #[test]
    fn test_unknown_folder_and_cycles_do_not_lose_projects() {
        let folders = [folder(1, Some(2), None), folder(2, Some(1), None)];
        let projects = [
            project(10, Some(1), None, lessons(&[(10, None)])),
            project(11, Some(99), None, lessons(&[(20, None)])),
        ];
        let report = build_hours_report(&projects, &folders, ReportScope::All);
        assert_eq!(report.folders.len(), 1);
        assert_eq!(report.folders[0].children.len(), 1);
        assert_eq!(report.folders[0].totals.completion_minutes, 10);
        assert_eq!(report.unfiled_project_ids, vec![11]);
        assert_eq!(report.summary.completion_minutes, 30);
    }

    #[test]
    fn test_standalone_project_uses_completion_time_column() {
        let mut p = project(1, None, Some("advanced"), json!({"slides": []}));
        p.completion_time = Some(40);
        let rollup = rollup_project(&p, None);
        assert_eq!(rollup.totals.lesson_count, 0);
        assert_eq!(rollup.totals.completion_minutes, 40);
        assert_eq!(rollup.totals.creation_rate_minutes, 40 * 300);
        assert_eq!(rollup.tiers.get(QualityTier::Advanced).completion_minutes, 40);
    }

    #[test]
    fn test_hours_field_drives_learning_but_completion_drives_creation() {
        let content = json!({"sections": [{"lessons": [{"hours": 2, "completionTime": "30m", "quality_tier": "basic"}]}]});
        let rollup = rollup_project(&project(1, None, None, content), None);
        assert_eq!(rollup.totals.learning_minutes, 120);
        assert_eq!(rollup.totals.completion_minutes, 30);
        assert_eq!(rollup.totals.creation_rate_minutes, 30 * 150);
    }

    #[test]
    fn test_computing_twice_is_identical() {
        let folders = [folder(1, None, Some("basic"))];
        let projects = [
            project(1, Some(1), None, lessons(&[(17, None), (23, Some("medium"))])),
            project(2, None, Some("gold"), lessons(&[(41, None)])),
        ];
        let first = build_hours_report(&projects, &folders, ReportScope::All);
        let second = build_hours_report(&projects, &folders, ReportScope::All);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
