use crate::cli::AnalyzeArgs;
use crate::error::{LangstatError, Result};
use crate::git::Backend;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_STATS_PATH: &str = ".github/language_stats.json";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_CLONE_TIMEOUT: Duration = Duration::from_secs(300);
pub const PAUSE_EVERY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    SingleRepository { path: PathBuf },
    AllRepositories { token: String },
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::SingleRepository { .. } => "single-repository",
            Mode::AllRepositories { .. } => "all-repositories",
        }
    }
}

/// Settings for one `analyze` run, resolved once from flags and environment.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub mode: Mode,
    pub backend: Backend,
    pub output: PathBuf,
    pub api_url: String,
    pub clone_timeout: Duration,
    pub pause_every: usize,
    pub pause: Duration,
    pub show_progress: bool,
}

impl AnalyzeConfig {
    pub fn from_args(args: &AnalyzeArgs) -> Result<Self> {
        let mode = if args.all_repos {
            let token = args
                .token
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| {
                    LangstatError::Config(
                        "GITHUB_TOKEN environment variable not set (required when ANALYZE_ALL_REPOS is true)"
                            .to_string(),
                    )
                })?;
            Mode::AllRepositories {
                token: token.to_string(),
            }
        } else {
            let path = match &args.repo {
                Some(p) => p.clone(),
                None => std::env::current_dir()?,
            };
            Mode::SingleRepository { path }
        };

        Ok(Self {
            mode,
            backend: args.backend,
            output: args.output.clone(),
            api_url: args.api_url.clone(),
            clone_timeout: args.clone_timeout,
            pause_every: PAUSE_EVERY,
            pause: args.pause,
            show_progress: !args.json,
        })
    }
}

/// `ANALYZE_ALL_REPOS` semantics: only a case-insensitive `true` enables it.
pub fn parse_toggle(value: &str) -> std::result::Result<bool, String> {
    Ok(value.trim().eq_ignore_ascii_case("true"))
}
