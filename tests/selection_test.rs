//! Selection pipeline tests against real git checkouts

mod common;

use chrono::{DateTime, Utc};
use codeprint::config::ProjectConfig;
use codeprint::models::{Report, UserWorkspace};
use codeprint::selection::{RepositorySelector, SelectionMode};
use common::{commit, init_repo, lines, DAY};
use tempfile::tempdir;

const NOW: i64 = 1_780_000_000;

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(NOW, 0).unwrap()
}

/// Four shared repositories of decreasing activity plus two sole-owner ones.
fn workspace() -> (tempfile::TempDir, UserWorkspace, Report) {
    let base = tempdir().unwrap();
    let ws = UserWorkspace::new(base.path(), "octo");

    for (name, commits) in [("alpha", 12), ("beta", 8), ("gamma", 4), ("delta", 2)] {
        let repo = init_repo(&ws.checkout_path(name));
        for i in 0..commits {
            commit(&repo, &[("src/lib.rs", lines(i + 1).as_str())], "octo", NOW - DAY + i as i64 * 60);
        }
        commit(&repo, &[("docs/notes.md", "shared\n")], "hubot", NOW - DAY / 2);
    }
    let solo = init_repo(&ws.checkout_path("solo"));
    commit(&solo, &[("main.go", "package main\n")], "octo", NOW - 800 * DAY);

    let report: Report = serde_json::from_str(
        r#"{
            "contributors": [
                {"repo": "alpha", "contributors": ["octo", "hubot"]},
                {"repo": "beta", "contributors": ["octo", "hubot"]},
                {"repo": "gamma", "contributors": ["octo", "hubot"]},
                {"repo": "delta", "contributors": ["octo", "hubot"]},
                {"repo": "solo", "contributors": ["octo"]},
                {"repo": "archived", "contributors": ["octo"]}
            ],
            "commits": {
                "alpha": [{"commit": {"author": {"date": "2026-05-28T09:00:00Z"}}}]
            }
        }"#,
    )
    .unwrap();

    (base, ws, report)
}

#[test]
fn test_union_of_top_scored_and_sole_owner() {
    let (_base, ws, report) = workspace();
    let mut config = ProjectConfig::default();
    config.selection.max_repos = 2;

    let result = RepositorySelector::new(ws, config).select_repositories_at(
        &report,
        SelectionMode::Scored,
        now(),
    );

    assert_eq!(result.repositories, vec!["alpha", "beta", "archived", "solo"]);
    for name in &result.repositories {
        assert!(result.metadata.contains_key(name), "missing metadata for {name}");
    }

    let alpha = &result.metadata["alpha"];
    assert_eq!(alpha.stats.as_ref().map(|s| s.commit_count), Some(14));
    let paths: Vec<&str> = alpha.contribution_files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["src/lib.rs"]);

    assert!(result.metadata["archived"].stats.is_none());
    assert!(result.metadata["solo"].analysis_score.is_none());
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].name, "archived");
}

#[test]
fn test_selection_size_bound() {
    let (_base, ws, report) = workspace();
    for max_repos in 0..6 {
        let mut config = ProjectConfig::default();
        config.selection.max_repos = max_repos;
        let result = RepositorySelector::new(ws.clone(), config).select_repositories_at(
            &report,
            SelectionMode::Scored,
            now(),
        );
        let sole_owner = report.single_contributor_repos("octo");
        assert!(result.len() <= max_repos + sole_owner.len());
        for name in &sole_owner {
            assert!(result.contains(name));
        }
    }
}

#[test]
fn test_scored_order_and_tie_break() {
    let (_base, ws, report) = workspace();
    let result = RepositorySelector::new(ws, ProjectConfig::default()).select_repositories_at(
        &report,
        SelectionMode::Scored,
        now(),
    );

    let scored: Vec<f64> = result
        .repositories
        .iter()
        .filter_map(|name| result.metadata[name].analysis_score)
        .collect();
    assert_eq!(scored.len(), 5);
    assert!(scored.windows(2).all(|w| w[0] >= w[1]));

    // Equal scores keep candidate (name) order.
    assert_eq!(
        result.repositories,
        vec!["alpha", "beta", "delta", "gamma", "solo", "archived"]
    );
}
