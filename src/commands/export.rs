use super::show_progress;
use crate::cli::CommonArgs;
use crate::git::GitRepo;
use crate::model::{ExportOutput, SCHEMA_VERSION};
use crate::report;
use anyhow::Context;
use chrono::Utc;
use std::io;

pub fn exec(common: &CommonArgs, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;
    let range = repo
        .resolve_range(common.since.as_deref(), common.until.as_deref())
        .context("Failed to resolve date range")?;

    let parsed = repo
        .collect_commits(&range, common.include_merges, show_progress(common, json || ndjson))
        .context("Failed to read commit history")?;

    let mut entries = parsed.commits;
    entries.sort_by_key(|c| c.timestamp);

    if json {
        let output = ExportOutput {
            version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            repository_path: repo.path().to_string_lossy().to_string(),
            since: common.since.clone(),
            until: common.until.clone(),
            entries,
        };
        report::write_json(&mut io::stdout().lock(), &output)?;
    } else if ndjson {
        report::write_ndjson(&mut io::stdout().lock(), &entries)?;
    } else {
        report::print_export_summary(&entries);
    }

    Ok(())
}
