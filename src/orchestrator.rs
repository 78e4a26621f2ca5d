use crate::attribution::scan_repository;
use crate::config::AnalyzeConfig;
use crate::error::{LangstatError, Result};
use crate::git::open_source;
use crate::model::{LanguageStats, RepoOutcome, RepoReport, RepoScan, RepositoryDescriptor};
use crate::remote::RepositoryHost;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

const CLONE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Produces a local working copy of a remote repository.
pub trait Cloner {
    fn clone_into(&self, url: &str, dest: &Path, timeout: Duration) -> Result<()>;
}

/// `git clone --quiet`, killed once `timeout` elapses.
pub struct GitCloner;

impl Cloner for GitCloner {
    fn clone_into(&self, url: &str, dest: &Path, timeout: Duration) -> Result<()> {
        let mut child = Command::new("git")
            .args(["clone", "--quiet"])
            .arg(url)
            .arg(dest)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                if status.success() {
                    return Ok(());
                }
                let mut stderr = String::new();
                if let Some(mut pipe) = child.stderr.take() {
                    let _ = pipe.read_to_string(&mut stderr);
                }
                return Err(LangstatError::Clone(format!(
                    "git clone exited with {status}: {}",
                    stderr.trim()
                )));
            }

            if started.elapsed() >= timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(LangstatError::Clone(format!(
                    "timed out after {}",
                    humantime::format_duration(timeout)
                )));
            }

            thread::sleep(CLONE_POLL_INTERVAL);
        }
    }
}

/// A local copy owned for the length of one repository's analysis. The
/// directory is removed when the guard drops, whatever happened in between.
pub struct LocalCopy {
    path: PathBuf,
}

impl LocalCopy {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LocalCopy {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed local copy"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove local copy"),
        }
    }
}

/// Embed the token as the user part of an `https` clone URL. Other URLs
/// (ssh, local paths) are returned untouched.
pub fn authenticated_url(clone_url: &str, token: &str) -> Result<String> {
    match Url::parse(clone_url) {
        Ok(mut url) if url.scheme() == "https" => {
            url.set_username(token)
                .map_err(|_| LangstatError::Clone(format!("Cannot add credentials to {clone_url}")))?;
            Ok(url.to_string())
        }
        _ => Ok(clone_url.to_string()),
    }
}

#[derive(Debug, Default)]
pub struct MultiRepoRun {
    pub stats: LanguageStats,
    pub reports: Vec<RepoReport>,
}

/// Analyze every repository the host lists, one after another.
///
/// Forks owned by the authenticated user are skipped so upstream history is
/// not counted twice. A repository that fails to clone or scan contributes
/// nothing; the run continues with the next one.
pub fn analyze_all(
    host: &dyn RepositoryHost,
    cloner: &dyn Cloner,
    config: &AnalyzeConfig,
    token: &str,
) -> Result<MultiRepoRun> {
    let login = host.authenticated_login()?;
    info!("Fetching repositories for {login}...");
    let repositories = host.owned_repositories()?;

    let workspace = tempfile::Builder::new().prefix("langstat-").tempdir()?;
    debug!(path = %workspace.path().display(), "using clone workspace");

    let mut run = MultiRepoRun::default();
    let count = repositories.len();

    for (index, repo) in repositories.iter().enumerate() {
        let position = index + 1;
        info!("[{position}/{count}] {}", repo.full_name);

        let outcome = if repo.fork && repo.owner == login {
            info!("Skipping fork: {}", repo.full_name);
            RepoOutcome::SkippedFork
        } else {
            match analyze_one(repo, workspace.path(), cloner, config, token) {
                Ok(scan) => {
                    let lines = scan.stats.total();
                    run.stats.merge(scan.stats);
                    RepoOutcome::Analyzed {
                        commits: scan.commits,
                        skipped_commits: scan.skipped_commits,
                        lines,
                    }
                }
                Err(e) => {
                    let reason = redact(&e.to_string(), token);
                    warn!("Failed to analyze {}: {reason}", repo.full_name);
                    RepoOutcome::Failed { reason }
                }
            }
        };

        run.reports.push(RepoReport {
            full_name: repo.full_name.clone(),
            outcome,
        });

        if should_pause(position, count, config.pause_every) {
            info!("Pausing to respect rate limits...");
            thread::sleep(config.pause);
        }
    }

    Ok(run)
}

fn analyze_one(
    repo: &RepositoryDescriptor,
    workspace: &Path,
    cloner: &dyn Cloner,
    config: &AnalyzeConfig,
    token: &str,
) -> Result<RepoScan> {
    let copy = LocalCopy::new(workspace.join(&repo.name));
    let url = authenticated_url(&repo.clone_url, token)?;
    cloner.clone_into(&url, copy.path(), config.clone_timeout)?;

    let source = open_source(config.backend, copy.path())?;
    scan_repository(source.as_ref(), config.show_progress)
}

/// Pause after every `every`-th repository, but not after the last one.
fn should_pause(position: usize, count: usize, every: usize) -> bool {
    every > 0 && position % every == 0 && position < count
}

fn redact(message: &str, token: &str) -> String {
    if token.is_empty() {
        message.to_string()
    } else {
        message.replace(token, "***")
    }
}
