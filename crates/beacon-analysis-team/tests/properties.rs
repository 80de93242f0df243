use beacon_analysis_team::ownership_map;
use beacon_dataset::CommitDataset;
use beacon_git::{RawChangeStatus, RawFileChange, RawGitCommit};
use beacon_settings::TeamConfig;
use beacon_types::Window;
use proptest::prelude::*;

const SECONDS_PER_DAY: i64 = 86_400;

fn commit(idx: usize, day: i64, author_idx: u8, file_idx: u8, added: usize, deleted: usize) -> RawGitCommit {
    RawGitCommit {
        hash: format!("c{idx}"),
        parents: vec![],
        author_name: format!("author{author_idx}"),
        author_email: format!("author{author_idx}@example.com"),
        timestamp: day * SECONDS_PER_DAY,
        message: String::new(),
        files: vec![RawFileChange {
            path: format!("f{file_idx}.rs"),
            old_path: None,
            status: RawChangeStatus::Modified,
            lines_added: added,
            lines_deleted: deleted,
        }],
    }
}

proptest! {
    #[test]
    fn ownership_shares_are_probabilities_that_sum_to_one(
        rows in prop::collection::vec(
            (0i64..90, 0u8..4, 0u8..3, 1usize..200, 0usize..200),
            1..60,
        ),
    ) {
        let raw: Vec<RawGitCommit> = rows
            .iter()
            .enumerate()
            .map(|(idx, &(day, author, file, added, deleted))| {
                commit(idx, day, author, file, added, deleted)
            })
            .collect();
        let window = Window { since: 0, until: 100 * SECONDS_PER_DAY };
        let dataset = CommitDataset::build(window, raw);
        let ownership = ownership_map(&dataset, &TeamConfig::default());
        for shares in ownership.by_file.values() {
            let sum: f64 = shares.iter().map(|s| s.share).sum();
            prop_assert!((sum - 1.0).abs() < 1e-6);
            for s in shares {
                prop_assert!(s.share >= 0.0 && s.share <= 1.0 + 1e-9);
            }
        }
    }
}
