use std::{io, path::PathBuf};
use thiserror::Error;
use tokio::process::Command;
use tracing::info;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run git {step}: {source}")]
    Spawn { step: &'static str, source: io::Error },

    #[error("git {step} exited with {status}: {stderr}")]
    Failed { step: &'static str, status: String, stderr: String }
}

/// Working copy the logs are committed to, driven through the `git` binary.
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf
}

impl GitRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        GitRepo {
            path: path.into()
        }
    }

    /// `add -A`, `commit -m`, then `push` when asked. Stops at the first failing step.
    pub async fn commit_and_push(&self, message: &str, push: bool) -> Result<(), GitError> {
        self.run("add", &["add", "-A"]).await?;
        self.run("commit", &["commit", "-m", message]).await?;
        if push {
            self.run("push", &["push"]).await?;
        }
        Ok(())
    }

    async fn run(&self, step: &'static str, args: &[&str]) -> Result<(), GitError> {
        info!("git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.path)
            .output()
            .await
            .map_err(|source| GitError::Spawn { step, source })?;
        if !output.status.success() {
            return Err(GitError::Failed {
                step,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string()
            });
        }
        Ok(())
    }
}

pub fn commit_message(day: &str) -> String {
    format!("Add prompt and answer for {}", day)
}

#[cfg(test)]
mod tests {
    use std::process::Command as StdCommand;

    use super::*;

    fn git_available() -> bool {
        StdCommand::new("git").arg("--version").output().map(|o| o.status.success()).unwrap_or(false)
    }

    #[tokio::test]
    async fn test_spawn_failure_stops_at_add() {
        let dir = tempfile::tempdir().unwrap();
        let repo = GitRepo::new(dir.path().join("missing"));
        let result = repo.commit_and_push(&commit_message("2025-02-11"), true).await;
        assert!(matches!(result, Err(GitError::Spawn { step: "add", .. })));
    }

    #[tokio::test]
    async fn test_failed_commit_skips_push() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        StdCommand::new("git").args(["init", "-q"]).current_dir(dir.path()).output().unwrap();
        // nothing staged, so commit exits non-zero before push is tried.
        let result = GitRepo::new(dir.path()).commit_and_push("empty", true).await;
        assert!(matches!(result, Err(GitError::Failed { step: "commit", .. })));
    }
}
