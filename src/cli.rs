use crate::config::Settings;
use crate::metrics::Zone;
use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "devrhythm")]
#[command(about = "Developer activity analytics for local git repositories and GitHub accounts")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to the state database")]
    pub db: Option<PathBuf>,

    #[arg(long, global = true, help = "Time zone for day/hour bucketing: local, utc, or +HH:MM")]
    pub tz: Option<String>,

    #[arg(long, global = true, help = "Start from this commit or date (RFC3339, YYYY-MM-DD, or natural language)")]
    pub since: Option<String>,

    #[arg(long, global = true, help = "End at this commit or date (RFC3339, YYYY-MM-DD, or natural language)")]
    pub until: Option<String>,

    #[arg(long, global = true, help = "Include merge commits", default_value_t = false)]
    pub include_merges: bool,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "More logging (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Only log errors")]
    pub quiet: bool,
}

impl CommonArgs {
    pub fn settings(&self) -> Result<Settings> {
        Settings::load(self.config.as_deref()).context("Failed to load configuration")
    }

    /// `--tz` wins over `time.zone`.
    pub fn zone(&self, settings: &Settings) -> Result<Zone> {
        match &self.tz {
            Some(tz) => tz.parse().map_err(|e: String| anyhow::anyhow!(e)),
            None => Ok(settings.zone()?),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a local repository
    Local {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, value_name = "FILE", help = "Write a Markdown report to FILE ('-' for stdout)")]
        markdown: Option<PathBuf>,
    },
    /// Analyze the repositories reachable with a GitHub token
    Remote {
        #[arg(long, help = "GitHub username shown in the report")]
        user: String,

        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, help = "GitHub access token")]
        token: Option<String>,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, value_name = "FILE", help = "Write a Markdown report to FILE ('-' for stdout)")]
        markdown: Option<PathBuf>,
    },
    /// Export parsed commit records
    Export {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON", conflicts_with = "json")]
        ndjson: bool,
    },
    /// List recently analyzed repositories
    Recent {
        #[arg(long, default_value_t = crate::store::RECENT_LIMIT, help = "Number of entries to show")]
        limit: usize,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::logging::init(self.common.verbose, self.common.quiet);

        match self.command {
            Commands::Local { json, markdown } => crate::commands::local::exec(&self.common, json, markdown),
            Commands::Remote {
                user,
                token,
                json,
                markdown,
            } => crate::commands::remote::exec(&self.common, &user, token, json, markdown),
            Commands::Export { json, ndjson } => crate::commands::export::exec(&self.common, json, ndjson),
            Commands::Recent { limit, json } => crate::commands::recent::exec(&self.common, limit, json),
        }
    }
}
