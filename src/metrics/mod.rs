//! Commit set to [`Analytics`].
//!
//! Everything here is a pure function of its input: no I/O, no shared
//! state. Commits are ordered by timestamp on a private copy of the slice.

pub mod buckets;
pub mod files;
pub mod score;
pub mod sessions;
pub mod streak;
pub mod zone;

pub use zone::Zone;

use crate::model::{
    Analytics, Commit, DayChurn, DayCount, HeatCell, HourCount, Totals, WeekdayCount,
};
use buckets::Buckets;
use chrono::NaiveDate;
use zone::day_key;

/// 45 minutes.
pub const SESSION_GAP_MS: i64 = 45 * 60 * 1000;
pub const TOP_FILES_LIMIT: usize = 10;
pub const LANGUAGES_LIMIT: usize = 8;
pub const IMPACT_COMMIT_WEIGHT: u64 = 5;
pub const IMPACT_FILE_WEIGHT: u64 = 2;
pub const IMPACT_DAY_WEIGHT: u64 = 10;
pub const IMPACT_SCALE: f64 = 25.0;
pub const IMPACT_CEILING: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct ImpactWeights {
    pub commit_weight: u64,
    pub file_weight: u64,
    pub day_weight: u64,
    pub scale: f64,
    pub ceiling: u32,
}

impl Default for ImpactWeights {
    fn default() -> Self {
        Self {
            commit_weight: IMPACT_COMMIT_WEIGHT,
            file_weight: IMPACT_FILE_WEIGHT,
            day_weight: IMPACT_DAY_WEIGHT,
            scale: IMPACT_SCALE,
            ceiling: IMPACT_CEILING,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    pub session_gap_ms: i64,
    pub top_files_limit: usize,
    pub languages_limit: usize,
    pub impact: ImpactWeights,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            session_gap_ms: SESSION_GAP_MS,
            top_files_limit: TOP_FILES_LIMIT,
            languages_limit: LANGUAGES_LIMIT,
            impact: ImpactWeights::default(),
        }
    }
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn compute_analytics(commits: &[Commit], config: &MetricsConfig, zone: Zone) -> Analytics {
    let mut sorted: Vec<&Commit> = commits.iter().collect();
    sorted.sort_by_key(|c| c.timestamp);

    let buckets = Buckets::collect(&sorted, zone);
    let active: Vec<NaiveDate> = buckets.by_day.keys().copied().collect();

    let timestamps: Vec<i64> = sorted.iter().map(|c| c.timestamp).collect();
    let activity = files::file_activity(&sorted);

    let commits_by_day = buckets
        .by_day
        .iter()
        .map(|(day, tally)| DayCount {
            day: day_key(*day),
            commits: tally.commits,
        })
        .collect();

    let commits_by_weekday = buckets
        .by_weekday
        .iter()
        .enumerate()
        .map(|(weekday, &commits)| WeekdayCount {
            weekday: weekday as u8,
            commits,
        })
        .collect();

    let commits_by_hour = buckets
        .by_hour
        .iter()
        .enumerate()
        .map(|(hour, &commits)| HourCount {
            hour: hour as u8,
            commits,
        })
        .collect();

    let heatmap = buckets
        .heat
        .iter()
        .enumerate()
        .flat_map(|(weekday, hours)| {
            hours.iter().enumerate().map(move |(hour, &commits)| HeatCell {
                weekday: weekday as u8,
                hour: hour as u8,
                commits,
            })
        })
        .collect();

    let churn_by_day = buckets
        .by_day
        .iter()
        .map(|(day, tally)| DayChurn {
            day: day_key(*day),
            churn: tally.churn,
        })
        .collect();

    let impact_score = score::impact_score(
        u64::from(buckets.commits),
        buckets.changed_files,
        u64::from(buckets.active_days()),
        &config.impact,
    );

    Analytics {
        totals: Totals {
            commits: buckets.commits,
            insertions: buckets.insertions,
            deletions: buckets.deletions,
            changed_files: buckets.changed_files,
            active_days: buckets.active_days(),
        },
        commits_by_day,
        commits_by_weekday,
        commits_by_hour,
        heatmap,
        streak: streak::compute_streak(&active),
        weekend_ratio: score::weekend_ratio(&buckets.by_weekday, buckets.commits),
        focus_sessions: sessions::focus_sessions(&timestamps, config.session_gap_ms, zone),
        top_files: files::top_files(&activity, config.top_files_limit),
        most_productive: score::most_productive(&buckets.heat),
        languages: files::languages(&activity, config.languages_limit),
        churn_by_day,
        impact_score,
    }
}
