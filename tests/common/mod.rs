//! Fixture helpers shared by the integration tests

#![allow(dead_code)]

use git2::{Repository, Signature, Time};
use std::fs;
use std::path::Path;

pub const DAY: i64 = 86_400;

/// Create a repository at `path` (parents included).
pub fn init_repo(path: &Path) -> Repository {
    fs::create_dir_all(path).unwrap();
    Repository::init(path).unwrap()
}

/// Write `files`, stage them and commit as `author` at `secs`.
pub fn commit(repo: &Repository, files: &[(&str, &str)], author: &str, secs: i64) {
    let root = repo.workdir().unwrap().to_path_buf();
    let mut index = repo.index().unwrap();
    for (rel, content) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        index.add_path(Path::new(rel)).unwrap();
    }
    index.write().unwrap();

    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::new(author, &format!("{author}@example.com"), &Time::new(secs, 0)).unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<_> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, "change", &tree, &parents)
        .unwrap();
}

pub fn lines(n: usize) -> String {
    (0..n).map(|i| format!("line {i}\n")).collect()
}
