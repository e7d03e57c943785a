//! stepdocs - generate linked step documentation pages from a git
//! history.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use stepdocs::core::{self, CommitLogParser, DiffParser, RepoRoot};
use stepdocs::metrics;
use stepdocs::pages::{step_info, Manifest, PageGenerator, RenderMode, StepEntry};

/// Generate linked step documentation pages from a git history.
#[derive(Parser, Debug)]
#[command(name = "stepdocs", version, about)]
struct Cli {
    /// Repository to document
    #[arg(value_name = "REPO", default_value = ".")]
    repo: PathBuf,

    /// Output directory for generated pages
    #[arg(short = 'o', long = "output", value_name = "DIR", default_value = "wiki")]
    output: PathBuf,

    /// Repository web URL for commit/file links (default: origin remote)
    #[arg(long = "origin", value_name = "URL")]
    origin: Option<String>,

    /// Page flavor
    #[arg(short = 'm', long = "mode", value_enum, default_value = "wiki")]
    mode: RenderMode,
}

fn main() -> ExitCode {
    init_logging();
    metrics::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

/// Route log records to stderr, filtered by `STEPDOCS_LOG`.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var("STEPDOCS_LOG")
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let repo = match RepoRoot::discover(&cli.repo) {
        Ok(repo) => repo,
        Err(core::RepoError::NotARepo) => {
            anyhow::bail!("{} is not inside a git repository", cli.repo.display());
        }
        Err(e) => return Err(e.into()),
    };

    let origin = cli.origin.clone().or_else(|| core::remote_origin_url(&repo));
    let generator = PageGenerator::new(origin, cli.mode);

    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;

    let log_text = {
        let _timer = metrics::Timer::start("git log");
        core::log_all(&repo).context("failed to read the commit log")?
    };
    let commits: Vec<_> = CommitLogParser::new(log_text).collect();
    info!(total = commits.len(), "parsed commit log");

    let mut manifest = Manifest::open(&cli.output)?;
    let mut written = 0usize;

    for commit in &commits {
        if !generator.is_step(&commit.message) {
            continue;
        }
        let step = match step_info(&commit.message) {
            Some(step) => step,
            None => continue,
        };

        let _timer = metrics::Timer::start("generate page");
        let show = core::show_commit(&repo, &commit.hash)
            .with_context(|| format!("failed to show commit {}", commit.hash))?;

        let mut parser = DiffParser::new_show(show);
        let mut diffs = Vec::new();
        let mut skip = false;
        loop {
            match parser.next_file() {
                Ok(Some(diff)) => diffs.push(diff),
                Ok(None) => break,
                Err(e) => {
                    warn!(commit = %commit.hash, error = %e, "skipping commit");
                    skip = true;
                    break;
                }
            }
        }
        if skip {
            continue;
        }

        let markdown = generator.render_page(commit, &diffs);
        let out = cli.output.join(&step.file);
        std::fs::write(&out, markdown)
            .with_context(|| format!("failed to write {}", out.display()))?;

        manifest.record(StepEntry {
            file: step.file.clone(),
            name: step.name,
            commit: commit.hash.clone(),
        });
        info!(page = %step.file, "wrote step page");
        written += 1;
    }

    manifest.save().context("failed to save the step manifest")?;

    {
        let _timer = metrics::Timer::start("navigation");
        stepdocs::pages::write_navigation(&cli.output, &manifest)
            .context("failed to write navigation")?;
    }

    println!(
        "{} step page(s) written to {}",
        written,
        cli.output.display()
    );
    Ok(())
}
