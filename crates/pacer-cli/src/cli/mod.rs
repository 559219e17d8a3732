//! CLI for the pacer fetch scheduler.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use pacer_core::config::{self, PacerConfig};
use pacer_core::run_db::RunDb;
use std::path::PathBuf;

use commands::{run_completions, run_scheduler, run_sources, run_stats, run_status};

/// Top-level CLI for the pacer fetch scheduler.
#[derive(Debug, Parser)]
#[command(name = "pacer")]
#[command(about = "pacer: cooldown-aware fetch scheduler with retries and run records", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/pacer/config.toml, created if missing).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run the scheduler loop until Ctrl-C.
    Run {
        /// Stop after N jobs have run.
        #[arg(long, value_name = "N")]
        max_jobs: Option<u64>,
    },

    /// Show recent run records.
    Status {
        /// Number of runs to show.
        #[arg(long, default_value = "20", value_name = "N")]
        limit: u32,
    },

    /// Show per-source success/failure counts.
    Stats,

    /// List configured groups, sources and their jobs.
    Sources,

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    fn load_config(&self) -> Result<PacerConfig> {
        let cfg = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        Ok(cfg)
    }

    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        if let CliCommand::Completions { shell } = cli.command {
            run_completions(shell);
            return Ok(());
        }

        let cfg = cli.load_config()?;
        match cli.command {
            CliCommand::Sources => run_sources(&cfg)?,
            CliCommand::Run { max_jobs } => {
                let db = open_db(&cfg).await?;
                run_scheduler(db, &cfg, max_jobs).await?;
            }
            CliCommand::Status { limit } => run_status(&open_db(&cfg).await?, limit).await?,
            CliCommand::Stats => run_stats(&open_db(&cfg).await?).await?,
            CliCommand::Completions { .. } => {}
        }

        Ok(())
    }
}

async fn open_db(cfg: &PacerConfig) -> Result<RunDb> {
    match &cfg.database_path {
        Some(path) => RunDb::open_at(path).await,
        None => RunDb::open_default().await,
    }
}
