use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Number of commits echoed back in a local report.
pub const COMMITS_PREVIEW_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub ins: u64,
    pub del: u64,
}

/// One commit as seen by the metrics engine.
///
/// Produced once by the log parser or the remote normalizer and never
/// changed afterwards. When `files` is non-empty, `insertions` and
/// `deletions` are exactly the sums of the per-file counts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub hash: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub message: String,
    pub insertions: u64,
    pub deletions: u64,
    pub files: Vec<FileChange>,
}

impl Commit {
    pub fn add_file(&mut self, path: String, ins: u64, del: u64) {
        self.insertions += ins;
        self.deletions += del;
        self.files.push(FileChange { path, ins, del });
    }

    pub fn churn(&self) -> u64 {
        self.insertions + self.deletions
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub commits: u32,
    pub insertions: u64,
    pub deletions: u64,
    pub changed_files: u64,
    pub active_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCount {
    pub day: String,
    pub commits: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayCount {
    pub weekday: u8,
    pub commits: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourCount {
    pub hour: u8,
    pub commits: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatCell {
    pub weekday: u8,
    pub hour: u8,
    pub commits: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub longest: u32,
    pub current: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekendRatio {
    pub weekday: u32,
    pub weekend: u32,
    pub weekend_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySessions {
    pub day: String,
    pub sessions: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSessions {
    pub total: u32,
    pub avg_minutes: f64,
    pub sessions_by_day: Vec<DaySessions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileActivity {
    pub path: String,
    pub commits: u32,
    pub ins: u64,
    pub del: u64,
}

impl FileActivity {
    pub fn new(path: String) -> Self {
        Self {
            path,
            commits: 0,
            ins: 0,
            del: 0,
        }
    }

    pub fn add_change(&mut self, change: &FileChange) {
        self.commits += 1;
        self.ins += change.ins;
        self.del += change.del;
    }

    pub fn churn(&self) -> u64 {
        self.ins + self.del
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductiveSlot {
    pub weekday: u8,
    pub hour: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCount {
    pub language: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayChurn {
    pub day: String,
    pub churn: u64,
}

/// Snapshot derived from a commit set. Rebuilt from scratch on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub totals: Totals,
    pub commits_by_day: Vec<DayCount>,
    pub commits_by_weekday: Vec<WeekdayCount>,
    pub commits_by_hour: Vec<HourCount>,
    pub heatmap: Vec<HeatCell>,
    pub streak: Streak,
    pub weekend_ratio: WeekendRatio,
    pub focus_sessions: FocusSessions,
    pub top_files: Vec<FileActivity>,
    pub most_productive: ProductiveSlot,
    pub languages: Vec<LanguageCount>,
    pub churn_by_day: Vec<DayChurn>,
    pub impact_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Local,
    #[serde(rename = "github")]
    GitHub,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Local => "local",
            Mode::GitHub => "github",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Mode::Local),
            "github" => Ok(Mode::GitHub),
            _ => Err(format!("Invalid mode: {s}. Valid options: local, github")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeEcho {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// Lines the log parser could not use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseDiagnostics {
    /// Stat lines rejected for a non-numeric count or an empty path.
    pub dropped_lines: u64,
    /// Non-blank lines seen before the first commit marker.
    pub orphan_lines: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalReport {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub ok: bool,
    pub mode: Mode,
    pub repo_path: String,
    pub range: RangeEcho,
    pub commits_count: usize,
    pub analytics: Analytics,
    pub commits_preview: Vec<Commit>,
    pub diagnostics: ParseDiagnostics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoCommits {
    pub repo: String,
    pub commits: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageBytes {
    pub language: String,
    pub bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteReport {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub ok: bool,
    pub mode: Mode,
    pub username: String,
    pub scanned_repos: usize,
    pub total_repos_found: usize,
    pub commits_collected: usize,
    pub analytics: Analytics,
    pub top_repos: Vec<RepoCommits>,
    pub tech_profile: Vec<LanguageBytes>,
    pub engagement_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub since: Option<String>,
    pub until: Option<String>,
    pub entries: Vec<Commit>,
}

#[derive(Debug, Clone)]
pub struct DateRange {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new() -> Self {
        Self { since: None, until: None }
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_file_keeps_totals_in_sync() {
        let mut commit = Commit::default();
        commit.add_file("a.rs".to_string(), 4, 1);
        commit.add_file("b.rs".to_string(), 0, 7);
        assert_eq!(commit.insertions, 4);
        assert_eq!(commit.deletions, 8);
        assert_eq!(commit.churn(), 12);
        assert_eq!(commit.files.len(), 2);
    }

    #[test]
    fn analytics_keys_are_camel_case() {
        let totals = Totals {
            commits: 1,
            insertions: 2,
            deletions: 3,
            changed_files: 4,
            active_days: 5,
        };
        let v = serde_json::to_value(&totals).unwrap();
        assert_eq!(v["changedFiles"], 4);
        assert_eq!(v["activeDays"], 5);

        let ratio = WeekendRatio {
            weekday: 1,
            weekend: 1,
            weekend_pct: 50.0,
        };
        let v = serde_json::to_value(&ratio).unwrap();
        assert_eq!(v["weekendPct"], 50.0);
    }

    #[test]
    fn commit_without_email_omits_the_key() {
        let commit = Commit {
            hash: "abc".to_string(),
            ..Default::default()
        };
        let v = serde_json::to_value(&commit).unwrap();
        assert!(v.get("email").is_none());
        assert_eq!(v["hash"], "abc");
    }

    #[test]
    fn mode_serializes_like_the_wire_format() {
        assert_eq!(serde_json::to_value(Mode::Local).unwrap(), "local");
        assert_eq!(serde_json::to_value(Mode::GitHub).unwrap(), "github");
        assert_eq!("GitHub".parse::<Mode>().unwrap(), Mode::GitHub);
        assert!("svn".parse::<Mode>().is_err());
    }

}
