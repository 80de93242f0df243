use beacon_analysis_quality::churn_metrics;
use beacon_dataset::CommitDataset;
use beacon_git::{RawChangeStatus, RawFileChange, RawGitCommit};
use beacon_settings::QualityConfig;
use beacon_types::Window;
use proptest::prelude::*;

fn commit(idx: usize, ts: i64, path: &str, added: usize, deleted: usize) -> RawGitCommit {
    RawGitCommit {
        hash: format!("c{idx}"),
        parents: vec![],
        author_name: "alice".to_string(),
        author_email: "alice@example.com".to_string(),
        timestamp: ts,
        message: String::new(),
        files: vec![RawFileChange {
            path: path.to_string(),
            old_path: None,
            status: RawChangeStatus::Modified,
            lines_added: added,
            lines_deleted: deleted,
        }],
    }
}

proptest! {
    #[test]
    fn global_churn_ratio_is_within_unit_interval(
        changes in prop::collection::vec((0usize..500, 0usize..500), 0..40),
    ) {
        let raw: Vec<RawGitCommit> = changes
            .iter()
            .enumerate()
            .map(|(idx, &(added, deleted))| commit(idx, idx as i64, "f.rs", added, deleted))
            .collect();
        let window = Window { since: 0, until: 1000 };
        let dataset = CommitDataset::build(window, raw);
        let churn = churn_metrics(&dataset, &QualityConfig::default());
        prop_assert!(churn.churn_ratio >= 0.0 && churn.churn_ratio <= 1.0);
    }

    #[test]
    fn per_file_churn_ratio_is_within_unit_interval(
        changes in prop::collection::vec((0usize..500, 0usize..500, 0u8..5), 0..40),
    ) {
        let raw: Vec<RawGitCommit> = changes
            .iter()
            .enumerate()
            .map(|(idx, &(added, deleted, file_idx))| {
                commit(idx, idx as i64, &format!("f{file_idx}.rs"), added, deleted)
            })
            .collect();
        let window = Window { since: 0, until: 1000 };
        let dataset = CommitDataset::build(window, raw);
        let churn = churn_metrics(&dataset, &QualityConfig::default());
        for file in &churn.per_file {
            prop_assert!(file.churn_ratio >= 0.0 && file.churn_ratio <= 1.0);
        }
    }
}
