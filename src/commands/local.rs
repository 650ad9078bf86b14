use super::{remember, show_progress, MarkdownTarget};
use crate::analyze::{analyze_local, LocalRequest};
use crate::cli::CommonArgs;
use crate::git::GitRepo;
use crate::model::{Mode, RangeEcho};
use crate::report::{self, MarkdownOptions};
use anyhow::Context;
use std::io;
use std::path::PathBuf;

pub fn exec(common: &CommonArgs, json: bool, markdown: Option<PathBuf>) -> anyhow::Result<()> {
    let markdown = MarkdownTarget::from_arg(markdown, json)?;
    let settings = common.settings()?;
    let zone = common.zone(&settings)?;

    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;
    let range = repo
        .resolve_range(common.since.as_deref(), common.until.as_deref())
        .context("Failed to resolve date range")?;

    let machine_output = json || matches!(markdown, Some(MarkdownTarget::Stdout));
    let report = analyze_local(
        &repo,
        LocalRequest {
            range: &range,
            echo: RangeEcho {
                date_from: common.since.clone(),
                date_to: common.until.clone(),
            },
            include_merges: common.include_merges,
            progress: show_progress(common, machine_output),
        },
        &settings.metrics_config(),
        zone,
    )
    .context("Failed to analyze repository")?;

    if let Some(target) = &markdown {
        let options = MarkdownOptions {
            session_gap_minutes: settings.metrics.session_gap_minutes,
        };
        target.emit(&report::render_local(&report, &options))?;
    }

    if json {
        report::write_json(&mut io::stdout().lock(), &report)?;
    } else if markdown.is_none() {
        report::print_local_summary(&report);
    }

    remember(common, Some(&report.repo_path), Mode::Local);
    Ok(())
}
