use super::parser::{parse_log, ParsedLog, COMMIT_MARKER, STATS_MARKER};
use crate::error::{PulseError, Result};
use crate::model::DateRange;
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use gix::{discover, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, SystemTime};

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn resolve_range(&self, since: Option<&str>, until: Option<&str>) -> Result<DateRange> {
        let mut range = DateRange::new();

        let since_dt = since.map(|s| self.parse_commit_or_date(s)).transpose()?;
        let until_dt = until.map(|u| self.parse_commit_or_date(u)).transpose()?;

        if let (Some(s), Some(u)) = (since_dt, until_dt) {
            if s > u {
                return Err(PulseError::InvalidDate(format!(
                    "Invalid range: since ({s}) is after until ({u})"
                )));
            }
        }

        if let Some(s) = since_dt {
            range = range.with_since(s);
        }
        if let Some(u) = until_dt {
            range = range.with_until(u);
        }

        Ok(range)
    }

    fn parse_commit_or_date(&self, input: &str) -> Result<DateTime<Utc>> {
        if let Some(dt) = parse_date(input)? {
            return Ok(dt);
        }

        // Fallback to Git ref
        let id = self
            .repo
            .rev_parse_single(input)
            .map_err(|e| PulseError::Parse(format!("Invalid commit or date '{input}': {e}")))?;

        let commit = id
            .object()?
            .try_into_commit()
            .map_err(|_| PulseError::Parse(format!("Not a commit: {input}")))?;

        let secs = commit.time()?.seconds;
        DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| PulseError::InvalidDate(format!("Invalid timestamp: {secs}")))
    }

    /// Runs `git log` over every branch and buffers its whole output.
    pub fn read_log(&self, range: &DateRange, include_merges: bool, progress: bool) -> Result<String> {
        let args = log_args(range, include_merges);
        log::debug!("running git {} in {}", args.join(" "), self.path.display());

        let pb = if progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message("Reading git history...");
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        let result = Command::new("git")
            .args(&args)
            .current_dir(&self.path)
            .output();

        if let Some(pb) = &pb {
            pb.finish_and_clear();
        }

        let output = result.map_err(|e| PulseError::GitRepo(format!("Failed to spawn git: {e}")))?;
        if !output.status.success() {
            return Err(PulseError::git_exit(
                output.status.code(),
                &String::from_utf8_lossy(&output.stderr),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    pub fn collect_commits(&self, range: &DateRange, include_merges: bool, progress: bool) -> Result<ParsedLog> {
        let text = self.read_log(range, include_merges, progress)?;
        let parsed = parse_log(&text);
        log::info!(
            "parsed {} commit(s) from {}",
            parsed.commits.len(),
            self.path.display()
        );
        Ok(parsed)
    }
}

pub fn log_args(range: &DateRange, include_merges: bool) -> Vec<String> {
    let mut args = vec!["log".to_string(), "--all".to_string()];
    if !include_merges {
        args.push("--no-merges".to_string());
    }
    args.push("--date=unix".to_string());
    args.push(format!(
        "--pretty=format:{COMMIT_MARKER}%n%H%n%an%n%ae%n%ad%n%s%n{STATS_MARKER}"
    ));
    args.push("--numstat".to_string());
    if let Some(since) = range.since {
        args.push(format!("--since={}", since.to_rfc3339_opts(SecondsFormat::Secs, true)));
    }
    if let Some(until) = range.until {
        args.push(format!("--until={}", until.to_rfc3339_opts(SecondsFormat::Secs, true)));
    }
    args
}

/// Parses the date forms accepted on the command line. `Ok(None)` means the
/// input is not a date and may still name a revision.
pub fn parse_date(input: &str) -> Result<Option<DateTime<Utc>>> {
    // RFC3339
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    // YYYY-MM-DD
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(Some(Utc.from_utc_datetime(&datetime)));
        }
    }

    // Relative duration (e.g. "2 weeks ago")
    if let Some(duration) = parse_natural_duration(input) {
        let target = SystemTime::now()
            .checked_sub(duration)
            .ok_or_else(|| PulseError::InvalidDate(format!("Duration overflow for '{input}'")))?;
        return Ok(Some(DateTime::<Utc>::from(target)));
    }

    Ok(None)
}

fn parse_natural_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();
    let units = [(" days ago", 1u64), (" weeks ago", 7), (" months ago", 30)];

    for (suffix, days) in units {
        if let Some(n) = input.strip_suffix(suffix) {
            if let Ok(n) = n.trim().parse::<u64>() {
                return Some(Duration::from_secs(n * days * 86400));
            }
        }
    }

    None
}
