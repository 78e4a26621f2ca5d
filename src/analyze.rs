use crate::attribution::scan_repository;
use crate::cli::AnalyzeArgs;
use crate::config::{AnalyzeConfig, Mode};
use crate::error::Result;
use crate::git::open_source;
use crate::model::{AnalysisOutput, LanguageEntry, LanguageStats, RepoReport, RepoScan, SCHEMA_VERSION};
use crate::orchestrator::{analyze_all, GitCloner};
use crate::remote::GitHubClient;
use crate::report::percentages;
use crate::store;
use crate::util::group_thousands;
use anyhow::Context;
use chrono::Utc;
use console::style;
use std::path::Path;
use tracing::{info, warn};

pub fn exec(args: &AnalyzeArgs) -> anyhow::Result<()> {
    let config = AnalyzeConfig::from_args(args)?;

    let (stats, repositories) = match &config.mode {
        Mode::SingleRepository { path } => {
            info!("Mode: analyzing {} only", path.display());
            let stats = match scan_single(path, &config) {
                Ok(scan) => {
                    info!(
                        "Analyzed {} commits ({} skipped)",
                        scan.commits, scan.skipped_commits
                    );
                    scan.stats
                }
                Err(e) => {
                    warn!("Failed to analyze {}: {e}", path.display());
                    LanguageStats::new()
                }
            };
            (stats, Vec::new())
        }
        Mode::AllRepositories { token } => {
            info!("Mode: analyzing all repositories (public and private)");
            let host = GitHubClient::new(&config.api_url, token)
                .context("Failed to create GitHub client")?;
            match analyze_all(&host, &GitCloner, &config, token) {
                Ok(run) => (run.stats, run.reports),
                Err(e) => {
                    warn!("Failed to list repositories: {e}");
                    (LanguageStats::new(), Vec::new())
                }
            }
        }
    };

    if stats.is_empty() {
        info!("No language statistics found.");
    }

    store::save(&config.output, &stats)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    info!("Statistics saved to {}", config.output.display());

    if args.json {
        output_json(&stats, &config, repositories)?;
    } else {
        output_table(&stats, &repositories);
    }

    Ok(())
}

fn scan_single(path: &Path, config: &AnalyzeConfig) -> Result<RepoScan> {
    let source = open_source(config.backend, path)?;
    scan_repository(source.as_ref(), config.show_progress)
}

fn output_json(
    stats: &LanguageStats,
    config: &AnalyzeConfig,
    repositories: Vec<RepoReport>,
) -> anyhow::Result<()> {
    let shares = percentages(stats);
    let languages = stats
        .sorted()
        .into_iter()
        .zip(shares)
        .map(|((language, lines), (_, percent))| LanguageEntry {
            language: language.to_string(),
            lines,
            percent,
        })
        .collect();

    let output = AnalysisOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        mode: config.mode.name().to_string(),
        output_path: config.output.to_string_lossy().to_string(),
        total_lines: stats.total(),
        languages,
        repositories,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_table(stats: &LanguageStats, repositories: &[RepoReport]) {
    if !repositories.is_empty() {
        println!("Repositories processed: {}", style(repositories.len()).cyan());
    }

    println!("{}", style("Language Statistics (Lines Added)").bold());
    println!("{}", "=".repeat(50));
    if stats.is_empty() {
        println!("No language statistics found.");
    }
    for (language, lines) in stats.sorted() {
        println!("{:<20} {:>10} lines", language, group_thousands(lines));
    }
    println!("{}", "=".repeat(50));
}
