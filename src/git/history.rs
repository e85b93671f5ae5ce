//! Git history extraction using libgit2
//!
//! Reads commit timestamps for a whole repository, the chronological
//! history of a single file, and per-file diffs and content at a commit.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use git2::{Commit, Diff, DiffFormat, DiffOptions, Oid, Repository, Sort};
use std::path::Path;
use tracing::debug;

use super::{open_repository, GitError, GitResult};

/// A commit that touched a given file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCommit {
    /// Full commit hash
    pub sha: String,
    /// Author date, in the author's own offset
    pub date: DateTime<FixedOffset>,
}

/// Git history analyzer using libgit2.
pub struct GitHistory {
    repo: Repository,
}

impl GitHistory {
    /// Open the checkout at `path`.
    pub fn open(path: &Path) -> GitResult<Self> {
        let repo = open_repository(path)?;
        debug!("Opened git repository at {:?}", repo.path());
        Ok(Self { repo })
    }

    /// Author timestamps (seconds since epoch) of every commit reachable
    /// from HEAD, regardless of who wrote them.
    ///
    /// An empty repository has no HEAD and fails here.
    pub fn commit_timestamps(&self) -> GitResult<Vec<i64>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;

        let mut timestamps = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            timestamps.push(commit.author().when().seconds());
        }
        Ok(timestamps)
    }

    /// Commits that changed `file_path`, oldest first.
    ///
    /// Merge commits are left out; the branch commits that carried the
    /// change are listed instead.
    pub fn file_history(&self, file_path: &str) -> GitResult<Vec<FileCommit>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME | Sort::REVERSE)?;
        revwalk.push_head()?;

        let mut history = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            if commit.parent_count() > 1 {
                continue;
            }

            let diff = self.file_diff_for_commit(&commit, file_path)?;
            if diff.deltas().len() == 0 {
                continue;
            }

            history.push(FileCommit {
                sha: commit.id().to_string(),
                date: author_date(&commit),
            });
        }

        Ok(history)
    }

    /// Unified patch of `file_path` in commit `sha` against its first parent.
    ///
    /// The root commit is diffed against the empty tree. The text has the
    /// same shape `git show --format= <sha> -- <file>` prints.
    pub fn file_diff(&self, sha: &str, file_path: &str) -> GitResult<String> {
        let commit = self.repo.find_commit(Oid::from_str(sha)?)?;
        let diff = self.file_diff_for_commit(&commit, file_path)?;

        let mut patch = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            let content = String::from_utf8_lossy(line.content());
            match line.origin() {
                '+' | '-' | ' ' => {
                    patch.push(line.origin());
                    patch.push_str(&content);
                }
                _ => patch.push_str(&content),
            }
            true
        })?;

        Ok(patch)
    }

    /// Content of `file_path` as of commit `sha`.
    pub fn file_content_at(&self, sha: &str, file_path: &str) -> GitResult<String> {
        let commit = self.repo.find_commit(Oid::from_str(sha)?)?;
        let tree = commit.tree()?;
        let entry = tree
            .get_path(Path::new(file_path))
            .map_err(|_| GitError::MissingPath {
                path: file_path.to_string(),
                sha: sha.to_string(),
            })?;
        let blob = self.repo.find_blob(entry.id())?;

        String::from_utf8(blob.content().to_vec()).map_err(|_| GitError::InvalidUtf8 {
            path: file_path.to_string(),
            sha: sha.to_string(),
        })
    }

    fn file_diff_for_commit(&self, commit: &Commit, file_path: &str) -> GitResult<Diff<'_>> {
        let parent = commit.parent(0).ok();
        let tree = commit.tree()?;
        let parent_tree = parent.as_ref().map(|p| p.tree()).transpose()?;

        let mut diff_opts = DiffOptions::new();
        diff_opts.pathspec(file_path).disable_pathspec_match(true);

        Ok(self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut diff_opts))?)
    }
}

/// Author date of a commit in the author's own UTC offset.
fn author_date(commit: &Commit) -> DateTime<FixedOffset> {
    let when = commit.author().when();
    FixedOffset::east_opt(when.offset_minutes() * 60)
        .and_then(|offset| offset.timestamp_opt(when.seconds(), 0).single())
        .unwrap_or_else(|| {
            Utc.timestamp_opt(when.seconds(), 0)
                .single()
                .unwrap_or_default()
                .fixed_offset()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::test_support::{commit_files, init_repo};
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_commit_timestamps_cover_all_authors() -> Result<()> {
        let dir = tempdir()?;
        let repo = init_repo(dir.path())?;
        commit_files(&repo, &[("a.txt", "1")], "alice", 1_000, "one")?;
        commit_files(&repo, &[("b.txt", "2")], "bob", 2_000, "two")?;

        let history = GitHistory::open(dir.path())?;
        let mut ts = history.commit_timestamps()?;
        ts.sort();
        assert_eq!(ts, vec![1_000, 2_000]);
        Ok(())
    }

    #[test]
    fn test_empty_repository_has_no_head() -> Result<()> {
        let dir = tempdir()?;
        init_repo(dir.path())?;
        let history = GitHistory::open(dir.path())?;
        assert!(history.commit_timestamps().is_err());
        Ok(())
    }

    #[test]
    fn test_file_history_is_oldest_first_and_path_limited() -> Result<()> {
        let dir = tempdir()?;
        let repo = init_repo(dir.path())?;
        let first = commit_files(&repo, &[("src/a.py", "v1\n")], "alice", 1_000, "a1")?;
        commit_files(&repo, &[("b.py", "other\n")], "alice", 2_000, "b")?;
        let third = commit_files(&repo, &[("src/a.py", "v2\n")], "alice", 3_000, "a2")?;

        let history = GitHistory::open(dir.path())?;
        let commits = history.file_history("src/a.py")?;
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].sha, first.to_string());
        assert_eq!(commits[1].sha, third.to_string());
        assert!(commits[0].date < commits[1].date);
        Ok(())
    }

    #[test]
    fn test_file_diff_has_patch_shape() -> Result<()> {
        let dir = tempdir()?;
        let repo = init_repo(dir.path())?;
        commit_files(&repo, &[("a.py", "one\ntwo\n")], "alice", 1_000, "init")?;
        let second = commit_files(&repo, &[("a.py", "one\nthree\n")], "alice", 2_000, "edit")?;

        let history = GitHistory::open(dir.path())?;
        let patch = history.file_diff(&second.to_string(), "a.py")?;
        assert!(patch.starts_with("diff --git a/a.py b/a.py"));
        assert!(patch.contains("--- a/a.py"));
        assert!(patch.contains("+++ b/a.py"));
        assert!(patch.contains("@@ "));
        assert!(patch.contains("-two\n"));
        assert!(patch.contains("+three\n"));
        assert!(patch.contains(" one\n"));
        Ok(())
    }

    #[test]
    fn test_root_commit_diff_is_new_file() -> Result<()> {
        let dir = tempdir()?;
        let repo = init_repo(dir.path())?;
        let root = commit_files(&repo, &[("a.py", "hello\n")], "alice", 1_000, "init")?;

        let history = GitHistory::open(dir.path())?;
        let patch = history.file_diff(&root.to_string(), "a.py")?;
        assert!(patch.contains("new file mode"));
        assert!(patch.contains("--- /dev/null"));
        assert!(patch.contains("+hello\n"));
        Ok(())
    }

    #[test]
    fn test_file_content_at_revision() -> Result<()> {
        let dir = tempdir()?;
        let repo = init_repo(dir.path())?;
        let first = commit_files(&repo, &[("a.py", "v1\n")], "alice", 1_000, "one")?;
        commit_files(&repo, &[("a.py", "v2\n")], "alice", 2_000, "two")?;

        let history = GitHistory::open(dir.path())?;
        assert_eq!(history.file_content_at(&first.to_string(), "a.py")?, "v1\n");

        let missing = history.file_content_at(&first.to_string(), "nope.py");
        assert!(matches!(missing, Err(GitError::MissingPath { .. })));
        Ok(())
    }
}
