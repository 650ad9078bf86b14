use super::round1;
use super::zone::{day_key, Zone};
use crate::model::{DaySessions, FocusSessions};
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub start: i64,
    pub end: i64,
}

impl Session {
    fn at(ts: i64) -> Self {
        Self { start: ts, end: ts }
    }

    pub fn duration_ms(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }
}

/// Single-linkage clustering of ascending timestamps: a commit joins the
/// running session when it lands at most `gap_ms` after the previous one.
pub fn cluster(timestamps: &[i64], gap_ms: i64) -> Vec<Session> {
    let mut sessions = Vec::new();
    let Some((&first, rest)) = timestamps.split_first() else {
        return sessions;
    };

    let mut current = Session::at(first);
    for &ts in rest {
        if ts.saturating_sub(current.end) <= gap_ms {
            current.end = ts;
        } else {
            sessions.push(current);
            current = Session::at(ts);
        }
    }
    sessions.push(current);
    sessions
}

fn whole_minutes(ms: i64) -> i64 {
    (ms as f64 / 60_000.0).round() as i64
}

pub fn focus_sessions(timestamps: &[i64], gap_ms: i64, zone: Zone) -> FocusSessions {
    let sessions = cluster(timestamps, gap_ms);
    if sessions.is_empty() {
        return FocusSessions::default();
    }

    let total_minutes = sessions
        .iter()
        .map(|s| whole_minutes(s.duration_ms()))
        .fold(0i64, i64::saturating_add);
    let avg_minutes = round1(total_minutes as f64 / sessions.len() as f64);

    let mut by_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for s in &sessions {
        *by_day.entry(zone.day(s.start)).or_insert(0) += 1;
    }

    FocusSessions {
        total: sessions.len() as u32,
        avg_minutes,
        sessions_by_day: by_day
            .into_iter()
            .map(|(day, sessions)| DaySessions {
                day: day_key(day),
                sessions,
            })
            .collect(),
    }
}
