pub mod export;
pub mod local;
pub mod recent;
pub mod remote;

use crate::cli::CommonArgs;
use crate::model::Mode;
use crate::store::Store;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Where a `--markdown` report goes.
pub(crate) enum MarkdownTarget {
    Stdout,
    File(PathBuf),
}

impl MarkdownTarget {
    pub(crate) fn from_arg(arg: Option<PathBuf>, json: bool) -> Result<Option<Self>> {
        let Some(path) = arg else {
            return Ok(None);
        };
        if path.as_os_str() == "-" {
            if json {
                bail!("--markdown - and --json both write to stdout; pick one");
            }
            return Ok(Some(MarkdownTarget::Stdout));
        }
        Ok(Some(MarkdownTarget::File(path)))
    }

    pub(crate) fn emit(&self, markdown: &str) -> Result<()> {
        match self {
            MarkdownTarget::Stdout => print!("{markdown}"),
            MarkdownTarget::File(path) => write_report(path, markdown)?,
        }
        Ok(())
    }
}

fn write_report(path: &Path, markdown: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, markdown).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("wrote markdown report to {}", path.display());
    Ok(())
}

/// Bookkeeping after a successful analysis. Failures here never fail the run.
pub(crate) fn remember(common: &CommonArgs, repo_path: Option<&str>, mode: Mode) {
    let result = Store::open(common.db.as_deref()).and_then(|store| {
        if let Some(path) = repo_path {
            store.touch_repo(path)?;
        }
        store.set_last_mode(mode)
    });
    if let Err(e) = result {
        log::warn!("Could not update recent state: {e}");
    }
}

/// Spinners only when stderr is a terminal and stdout carries no data.
pub(crate) fn show_progress(common: &CommonArgs, machine_output: bool) -> bool {
    !machine_output && !common.quiet && console::Term::stderr().is_term()
}
