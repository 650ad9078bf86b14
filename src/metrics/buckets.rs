use super::zone::{LocalFields, Zone};
use crate::model::Commit;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayTally {
    pub commits: u32,
    pub churn: u64,
}

/// Counters filled in one pass over the time-ordered commits.
#[derive(Debug, Clone, Default)]
pub struct Buckets {
    pub commits: u32,
    pub insertions: u64,
    pub deletions: u64,
    /// Sum of per-commit distinct path counts.
    pub changed_files: u64,
    pub by_day: BTreeMap<NaiveDate, DayTally>,
    pub by_weekday: [u32; 7],
    pub by_hour: [u32; 24],
    pub heat: [[u32; 24]; 7],
}

impl Buckets {
    pub fn collect(sorted: &[&Commit], zone: Zone) -> Self {
        let mut buckets = Buckets::default();
        for commit in sorted {
            buckets.add(commit, zone.fields(commit.timestamp));
        }
        buckets
    }

    fn add(&mut self, commit: &Commit, at: LocalFields) {
        let weekday = at.weekday as usize;
        let hour = at.hour as usize;

        self.commits += 1;
        self.by_weekday[weekday] += 1;
        self.by_hour[hour] += 1;
        self.heat[weekday][hour] += 1;

        let day = self.by_day.entry(at.day).or_default();
        day.commits += 1;
        day.churn += commit.churn();

        self.insertions += commit.insertions;
        self.deletions += commit.deletions;

        let unique: HashSet<&str> = commit.files.iter().map(|f| f.path.as_str()).collect();
        self.changed_files += unique.len() as u64;
    }

    pub fn active_days(&self) -> u32 {
        self.by_day.len() as u32
    }
}
