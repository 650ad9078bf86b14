//! Local pipeline: `git log` text to a [`LocalReport`].

use crate::git::{GitRepo, ParsedLog};
use crate::error::Result;
use crate::metrics::{compute_analytics, MetricsConfig, Zone};
use crate::model::{DateRange, LocalReport, Mode, RangeEcho, COMMITS_PREVIEW_LEN, SCHEMA_VERSION};
use chrono::Utc;

pub struct LocalRequest<'a> {
    pub range: &'a DateRange,
    /// The bounds exactly as the user typed them.
    pub echo: RangeEcho,
    pub include_merges: bool,
    pub progress: bool,
}

pub fn analyze_local(
    repo: &GitRepo,
    request: LocalRequest<'_>,
    config: &MetricsConfig,
    zone: Zone,
) -> Result<LocalReport> {
    let parsed = repo.collect_commits(request.range, request.include_merges, request.progress)?;
    Ok(build_local_report(
        repo.path().to_string_lossy().to_string(),
        request.echo,
        parsed,
        config,
        zone,
    ))
}

/// The preview keeps the first commits in log order, newest first.
pub fn build_local_report(
    repo_path: String,
    range: RangeEcho,
    parsed: ParsedLog,
    config: &MetricsConfig,
    zone: Zone,
) -> LocalReport {
    let analytics = compute_analytics(&parsed.commits, config, zone);
    let commits_preview = parsed
        .commits
        .iter()
        .take(COMMITS_PREVIEW_LEN)
        .cloned()
        .collect();

    LocalReport {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        ok: true,
        mode: Mode::Local,
        repo_path,
        range,
        commits_count: parsed.commits.len(),
        analytics,
        commits_preview,
        diagnostics: parsed.diagnostics,
    }
}
