use crate::model::{Analytics, LocalReport, RemoteReport};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Session gap quoted in the Notes section.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownOptions {
    pub session_gap_minutes: u64,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            session_gap_minutes: (crate::metrics::SESSION_GAP_MS / 60_000) as u64,
        }
    }
}

pub fn render_local(report: &LocalReport, options: &MarkdownOptions) -> String {
    let scope = format!(
        "**Repository:** {}  \n**Date range:** {} → {}",
        report.repo_path,
        report.range.date_from.as_deref().unwrap_or("All time"),
        report.range.date_to.as_deref().unwrap_or("Now"),
    );

    let mut md = header("DevRhythm Local Repo Report", &report.generated_at, &scope);
    summary(&mut md, &report.analytics);

    section(&mut md, "Repository Insights");
    md.push_str("### Top modified files\n\n");
    md.push_str("| File | Commits | Insertions | Deletions |\n");
    md.push_str("|---|---:|---:|---:|\n");
    for f in &report.analytics.top_files {
        let _ = writeln!(md, "| {} | {} | {} | {} |", escape_cell(&f.path), f.commits, f.ins, f.del);
    }
    md.push('\n');

    if report.diagnostics.dropped_lines > 0 {
        let _ = writeln!(
            md,
            "_{} numstat line(s) could not be parsed and were skipped._\n",
            report.diagnostics.dropped_lines
        );
    }

    notes(&mut md, options);
    md
}

pub fn render_remote(report: &RemoteReport, options: &MarkdownOptions) -> String {
    let scope = format!(
        "**GitHub Username:** {}  \n**Repos scanned:** {} / {}",
        report.username, report.scanned_repos, report.total_repos_found,
    );

    let mut md = header("DevRhythm GitHub Report", &report.generated_at, &scope);
    summary(&mut md, &report.analytics);

    section(&mut md, "GitHub Insights");
    let _ = writeln!(
        md,
        "**Open-source engagement score (heuristic):** **{}/100**\n",
        report.engagement_score
    );

    md.push_str("### Top repositories (by commits collected)\n\n");
    md.push_str("| Repo | Commits |\n");
    md.push_str("|---|---:|\n");
    for r in &report.top_repos {
        let _ = writeln!(md, "| {} | {} |", escape_cell(&r.repo), r.commits);
    }
    md.push('\n');

    md.push_str("### Technology profile (by bytes of code)\n\n");
    md.push_str("| Language | Bytes |\n");
    md.push_str("|---|---:|\n");
    for t in &report.tech_profile {
        let _ = writeln!(md, "| {} | {} |", escape_cell(&t.language), t.bytes);
    }
    md.push('\n');

    notes(&mut md, options);
    md
}

/// `Www @ HH:00`
pub fn productive_label(weekday: u8, hour: u8) -> String {
    let day = WEEKDAYS.get(weekday as usize).copied().unwrap_or(WEEKDAYS[0]);
    format!("{day} @ {hour:02}:00")
}

fn header(title: &str, generated_at: &DateTime<Utc>, scope: &str) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# {title}\n");
    let _ = writeln!(
        md,
        "Generated: {}\n",
        generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    let _ = writeln!(md, "{scope}\n");
    md
}

fn section(md: &mut String, title: &str) {
    let _ = writeln!(md, "---\n\n## {title}\n");
}

fn summary(md: &mut String, a: &Analytics) {
    section(md, "Summary");
    let t = &a.totals;
    let _ = writeln!(md, "- Total commits: **{}**", t.commits);
    let _ = writeln!(md, "- Active days: **{}**", t.active_days);
    let _ = writeln!(md, "- Insertions / Deletions: **{} / {}**", t.insertions, t.deletions);
    let _ = writeln!(md, "- Longest streak: **{} days**", a.streak.longest);
    let _ = writeln!(
        md,
        "- Current streak (from last active day): **{} days**",
        a.streak.current
    );
    let _ = writeln!(
        md,
        "- Weekend activity: **{}** commits ({}%)",
        a.weekend_ratio.weekend, a.weekend_ratio.weekend_pct
    );
    let _ = writeln!(
        md,
        "- Focus sessions: **{}**, avg duration **{} min**",
        a.focus_sessions.total, a.focus_sessions.avg_minutes
    );
    let _ = writeln!(
        md,
        "- Most productive time: **{}**\n",
        productive_label(a.most_productive.weekday, a.most_productive.hour)
    );
}

fn notes(md: &mut String, options: &MarkdownOptions) {
    section(md, "Notes");
    md.push_str("- Local mode uses git numstat for insertions/deletions.\n");
    md.push_str(
        "- GitHub mode uses the commits listing (no per-file stats), so file-level stats are not included.\n",
    );
    let _ = writeln!(
        md,
        "- Focus sessions use a {}-minute gap rule.",
        options.session_gap_minutes
    );
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
