use crate::config::{parse_toggle, DEFAULT_API_URL, DEFAULT_STATS_PATH};
use crate::git::Backend;
use crate::report::DEFAULT_TOP_N;
use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "langstat")]
#[command(about = "Per-language line statistics from git history, rendered into a README")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count lines added per language across commit history
    Analyze(AnalyzeArgs),
    /// Render language bars into a README between marker lines
    Render(RenderArgs),
}

#[derive(Args, Clone, Debug)]
pub struct AnalyzeArgs {
    #[arg(
        long,
        env = "ANALYZE_ALL_REPOS",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = parse_toggle,
        help = "Analyze every repository owned by the token's user (\"true\") or only --repo"
    )]
    pub all_repos: bool,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, help = "GitHub token")]
    pub token: Option<String>,

    #[arg(long, help = "Repository to analyze in single-repository mode (default: current dir)")]
    pub repo: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Backend::Git, help = "How commit history is read")]
    pub backend: Backend,

    #[arg(long, default_value = DEFAULT_STATS_PATH, help = "Where the statistics JSON is written")]
    pub output: PathBuf,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL, help = "GitHub API base URL")]
    pub api_url: String,

    #[arg(long, value_parser = humantime::parse_duration, default_value = "5m", help = "Give up on a clone after this long")]
    pub clone_timeout: Duration,

    #[arg(long, value_parser = humantime::parse_duration, default_value = "2s", help = "Pause taken every 10 repositories")]
    pub pause: Duration,

    #[arg(long, help = "Print the run summary as JSON")]
    pub json: bool,
}

#[derive(Args, Clone, Debug)]
pub struct RenderArgs {
    #[arg(long, default_value = DEFAULT_STATS_PATH, help = "Statistics JSON written by analyze")]
    pub stats: PathBuf,

    #[arg(long, default_value = "README.md", help = "Document to update")]
    pub readme: PathBuf,

    #[arg(long, default_value_t = DEFAULT_TOP_N, help = "Number of languages to show")]
    pub top: usize,

    #[arg(long, help = "Print the updated document instead of writing it")]
    pub dry_run: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Analyze(args) => crate::analyze::exec(&args),
            Commands::Render(args) => crate::render::exec(&args),
        }
    }
}
