use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn git(args: &[&str], repo_path: &Path) {
    Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .unwrap();
}

pub struct TestRepo {
    temp_dir: TempDir,
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepo {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let repo_path = temp_dir.path();

        git(&["init"], repo_path);
        git(&["config", "user.name", "Test User"], repo_path);
        git(&["config", "user.email", "test@example.com"], repo_path);
        git(&["config", "commit.gpgsign", "false"], repo_path);

        fs::write(repo_path.join("test.txt"), "Initial content").unwrap();
        git(&["add", "."], repo_path);
        git(&["commit", "-m", "Initial commit"], repo_path);

        Self { temp_dir }
    }

    pub fn new_with_commits(count: usize) -> Self {
        let repo = Self::new();

        for i in 1..count {
            repo.commit_file("test.txt", &format!("Content version {}", i), &format!("Commit {}", i));
        }

        repo
    }

    /// Initial commit, one commit on a side branch, one on the main line,
    /// then a merge commit joining them.
    pub fn new_with_merge() -> Self {
        let repo = Self::new();
        let repo_path = repo.path();

        git(&["checkout", "-b", "feature"], repo_path);
        repo.commit_file("feature.txt", "feature", "Add feature");
        git(&["checkout", "-"], repo_path);
        repo.commit_file("main.txt", "main", "Work on main");
        git(&["merge", "--no-ff", "feature", "-m", "Merge feature"], repo_path);

        repo
    }

    pub fn commit_file(&self, name: &str, content: &str, message: &str) {
        fs::write(self.path().join(name), content).unwrap();
        git(&["add", "."], self.path());
        git(&["commit", "-m", message], self.path());
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}

/// A stand-in for git: prints canned stdout and stderr, then exits with a
/// fixed code, ignoring its arguments.
#[cfg(unix)]
pub struct FakeGit {
    temp_dir: TempDir,
}

#[cfg(unix)]
impl FakeGit {
    pub fn new(stdout: &str, stderr: &str, exit_code: i32) -> Self {
        Self::with_script(
            stdout,
            stderr,
            &format!(
                "cat \"$DIR/stdout.txt\"\ncat \"$DIR/stderr.txt\" >&2\nexit {}",
                exit_code
            ),
        )
    }

    /// Runs `body` as a shell script. `$DIR` holds `stdout.txt` and
    /// `stderr.txt` with the given contents.
    pub fn with_script(stdout: &str, stderr: &str, body: &str) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("stdout.txt"), stdout).unwrap();
        fs::write(dir.join("stderr.txt"), stderr).unwrap();

        let script = format!("#!/bin/sh\nDIR='{}'\n{}\n", dir.display(), body);
        let program = dir.join("fake-git");
        fs::write(&program, script).unwrap();
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();

        Self { temp_dir }
    }

    pub fn program(&self) -> PathBuf {
        self.temp_dir.path().join("fake-git")
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }
}
