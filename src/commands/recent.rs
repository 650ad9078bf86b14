use crate::cli::CommonArgs;
use crate::report;
use crate::store::Store;
use anyhow::Context;
use console::style;
use serde::Serialize;
use std::io;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecentOutput {
    last_mode: &'static str,
    repos: Vec<RecentEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecentEntry {
    repo_path: String,
    last_opened_at: String,
}

pub fn exec(common: &CommonArgs, limit: usize, json: bool) -> anyhow::Result<()> {
    let store = Store::open(common.db.as_deref()).context("Failed to open state database")?;
    let repos = store.recent_repos(limit)?;
    let last_mode = store.last_mode()?;

    if json {
        let output = RecentOutput {
            last_mode: last_mode.as_str(),
            repos: repos
                .into_iter()
                .map(|r| RecentEntry {
                    repo_path: r.repo_path,
                    last_opened_at: r.last_opened_at.to_rfc3339(),
                })
                .collect(),
        };
        report::write_json(&mut io::stdout().lock(), &output)?;
        return Ok(());
    }

    println!("Last mode: {}", style(last_mode.as_str()).cyan());
    if repos.is_empty() {
        println!("No repositories analyzed yet");
        return Ok(());
    }
    println!("{}", style("Recent repositories").bold());
    for r in &repos {
        println!(
            "  {}  {}",
            style(r.last_opened_at.format("%Y-%m-%d %H:%M")).dim(),
            r.repo_path
        );
    }
    Ok(())
}
