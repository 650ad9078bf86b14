use super::markdown::productive_label;
use crate::model::{Analytics, Commit, LocalReport, RemoteReport};
use anyhow::Result;
use console::style;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Write;

pub fn write_json<T: Serialize, W: Write>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// One commit per line.
pub fn write_ndjson<W: Write>(out: &mut W, commits: &[Commit]) -> Result<()> {
    for commit in commits {
        serde_json::to_writer(&mut *out, commit)?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn print_local_summary(report: &LocalReport) {
    println!("{}", style("Local Repository Rhythm").bold());
    println!("{}", "─".repeat(50));
    println!("Repository: {}", style(&report.repo_path).dim());
    if report.range.date_from.is_some() || report.range.date_to.is_some() {
        println!(
            "Date range: {} to {}",
            report.range.date_from.as_deref().unwrap_or("all time"),
            report.range.date_to.as_deref().unwrap_or("now"),
        );
    }
    print_analytics(&report.analytics);

    if !report.analytics.top_files.is_empty() {
        println!("\n{}", style("Top files").bold());
        for f in &report.analytics.top_files {
            println!(
                "  {:>4} commits  {} {}  {}",
                f.commits,
                style(format!("+{}", f.ins)).green(),
                style(format!("-{}", f.del)).red(),
                f.path
            );
        }
    }

    if report.diagnostics.dropped_lines > 0 {
        println!(
            "\n{}",
            style(format!("{} numstat line(s) skipped", report.diagnostics.dropped_lines)).yellow()
        );
    }
    println!("\nUse --json or --markdown for the full report.");
}

pub fn print_remote_summary(report: &RemoteReport) {
    println!("{}", style("GitHub Account Rhythm").bold());
    println!("{}", "─".repeat(50));
    println!(
        "User: {}  (scanned {} of {} repos)",
        style(&report.username).cyan(),
        report.scanned_repos,
        report.total_repos_found
    );
    print_analytics(&report.analytics);
    println!(
        "Engagement score: {}",
        style(format!("{}/100", report.engagement_score)).yellow()
    );

    if !report.top_repos.is_empty() {
        println!("\n{}", style("Top repositories").bold());
        for r in &report.top_repos {
            println!("  {:>5}  {}", r.commits, r.repo);
        }
    }
    if !report.tech_profile.is_empty() {
        println!("\n{}", style("Technology profile").bold());
        for t in &report.tech_profile {
            println!("  {:>10} bytes  {}", t.bytes, t.language);
        }
    }
}

pub fn print_export_summary(commits: &[Commit]) {
    println!("{}", style("Export Summary").bold());
    println!("{}", "─".repeat(50));

    let total_files: usize = commits.iter().map(|c| c.files.len()).sum();
    let total_added: u64 = commits.iter().map(|c| c.insertions).sum();
    let total_deleted: u64 = commits.iter().map(|c| c.deletions).sum();
    let unique_authors: HashSet<_> = commits.iter().map(|c| &c.author).collect();

    println!("Total commits: {}", style(commits.len()).cyan());
    println!("Total files changed: {}", style(total_files).cyan());
    println!("Total lines added: {}", style(total_added).green());
    println!("Total lines deleted: {}", style(total_deleted).red());
    println!("Unique authors: {}", style(unique_authors.len()).yellow());

    let first = commits.iter().map(|c| c.timestamp).min();
    let last = commits.iter().map(|c| c.timestamp).max();
    if let (Some(first), Some(last)) = (first, last) {
        println!(
            "Date range: {} to {}",
            style(format_day(first)).dim(),
            style(format_day(last)).dim()
        );
    }

    println!("\nUse --json or --ndjson flags to export the raw data.");
}

fn print_analytics(a: &Analytics) {
    let t = &a.totals;
    println!("Commits: {}", style(t.commits).cyan());
    println!("Active days: {}", style(t.active_days).cyan());
    println!(
        "Lines: {} {}",
        style(format!("+{}", t.insertions)).green(),
        style(format!("-{}", t.deletions)).red()
    );
    println!(
        "Streak: longest {} days, current {} days",
        a.streak.longest, a.streak.current
    );
    println!(
        "Weekend: {} commits ({}%)",
        a.weekend_ratio.weekend, a.weekend_ratio.weekend_pct
    );
    println!(
        "Focus sessions: {} (avg {} min)",
        a.focus_sessions.total, a.focus_sessions.avg_minutes
    );
    println!(
        "Most productive: {}",
        productive_label(a.most_productive.weekday, a.most_productive.hour)
    );
    println!("Impact score: {}", style(a.impact_score).yellow());
}

fn format_day(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
