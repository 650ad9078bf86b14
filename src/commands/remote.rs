use super::{remember, show_progress, MarkdownTarget};
use crate::cli::CommonArgs;
use crate::model::Mode;
use crate::remote::{analyze_account, GitHubClient};
use crate::report::{self, MarkdownOptions};
use anyhow::{bail, Context};
use indicatif::ProgressBar;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

pub fn exec(
    common: &CommonArgs,
    user: &str,
    token: Option<String>,
    json: bool,
    markdown: Option<PathBuf>,
) -> anyhow::Result<()> {
    let markdown = MarkdownTarget::from_arg(markdown, json)?;
    let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
        bail!("A GitHub token is required: pass --token or set GITHUB_TOKEN");
    };

    let settings = common.settings()?;
    let zone = common.zone(&settings)?;
    let client = GitHubClient::new(token, settings.remote.clone())
        .context("Failed to build GitHub client")?;

    let machine_output = json || matches!(markdown, Some(MarkdownTarget::Stdout));
    let spinner = show_progress(common, machine_output).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_message(format!("Fetching GitHub activity for {user}..."));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let result = analyze_account(&client, user, &settings, zone);
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let report = result.context("Failed to analyze GitHub account")?;

    if let Some(target) = &markdown {
        let options = MarkdownOptions {
            session_gap_minutes: settings.metrics.session_gap_minutes,
        };
        target.emit(&report::render_remote(&report, &options))?;
    }

    if json {
        report::write_json(&mut io::stdout().lock(), &report)?;
    } else if markdown.is_none() {
        report::print_remote_summary(&report);
    }

    remember(common, None, Mode::GitHub);
    Ok(())
}
