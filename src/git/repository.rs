//! Git repository operations

use std::path::Path;

use anyhow::{Context, Result};
use git2::Repository;
use tracing::debug;

use super::SHORT_HASH_LEN;

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open the repository containing the current directory
    pub fn open() -> Result<Self> {
        let repo = Repository::discover(".").context("Not in a git repository")?;

        Ok(Self { repo })
    }

    /// Open repository at specified path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open git repository")?;

        Ok(Self { repo })
    }

    /// Full message of the commit `rev` resolves to, like
    /// `git show --no-patch --format=%B <rev>`.
    pub fn commit_message(&self, rev: &str) -> Result<String> {
        let commit = self
            .repo
            .revparse_single(rev)
            .with_context(|| format!("Failed to resolve revision: {rev}"))?
            .peel_to_commit()
            .with_context(|| format!("Revision does not point to a commit: {rev}"))?;

        let id = commit.id().to_string();
        debug!(rev, commit = &id[..SHORT_HASH_LEN], "Read commit message");

        let message = commit
            .message()
            .with_context(|| format!("Commit message of {rev} is not valid UTF-8"))?;
        Ok(message.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo_with_commits(messages: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let signature = git2::Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();

        let mut parent: Option<git2::Oid> = None;
        for message in messages {
            let parents: Vec<git2::Commit<'_>> =
                parent.iter().map(|id| repo.find_commit(*id).unwrap()).collect();
            let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();
            parent = Some(
                repo.commit(
                    Some("HEAD"),
                    &signature,
                    &signature,
                    message,
                    &tree,
                    &parent_refs,
                )
                .unwrap(),
            );
        }
        dir
    }

    #[test]
    fn reads_head_and_ancestors() {
        let dir = repo_with_commits(&["chore: init\n", "feat(api): add refunds\n\nBody text.\n"]);
        let repo = GitRepository::open_at(dir.path()).unwrap();

        assert_eq!(
            repo.commit_message("HEAD").unwrap(),
            "feat(api): add refunds\n\nBody text.\n"
        );
        assert_eq!(repo.commit_message("HEAD~1").unwrap(), "chore: init\n");
    }

    #[test]
    fn unknown_revision_is_an_error() {
        let dir = repo_with_commits(&["chore: init\n"]);
        let repo = GitRepository::open_at(dir.path()).unwrap();

        let err = repo.commit_message("does-not-exist").unwrap_err();
        assert_eq!(err.to_string(), "Failed to resolve revision: does-not-exist");
    }

    #[test]
    fn open_at_non_repository_fails() {
        let dir = TempDir::new().unwrap();
        assert!(GitRepository::open_at(dir.path()).is_err());
    }
}
