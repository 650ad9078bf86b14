use super::client::RemoteSource;
use super::normalize::normalize_commit;
use crate::config::Settings;
use crate::error::Result;
use crate::metrics::{compute_analytics, Zone};
use crate::model::{Commit, LanguageBytes, Mode, RemoteReport, RepoCommits, SCHEMA_VERSION};
use chrono::Utc;
use std::collections::HashMap;

pub const TOP_REPOS_LIMIT: usize = 10;
pub const TECH_PROFILE_LIMIT: usize = 10;

/// Collects every reachable commit of an account and derives the report.
///
/// Only the repository listing is fatal. A repository whose commits or
/// languages cannot be fetched is logged and skipped.
pub fn analyze_account<S: RemoteSource>(
    source: &S,
    username: &str,
    settings: &Settings,
    zone: Zone,
) -> Result<RemoteReport> {
    let mut repos = source.list_repos()?;
    let total_repos_found = repos.len();

    repos.sort_by_key(|r| r.fork);
    repos.truncate(settings.remote.max_repos);
    log::info!("scanning {} of {} repositories", repos.len(), total_repos_found);

    let mut all_commits: Vec<Commit> = Vec::new();
    let mut repo_counts: Vec<RepoCommits> = Vec::new();
    let mut languages = LanguageTotals::default();

    for repo in &repos {
        let owner = repo.owner.login.as_str();

        match source.repo_commits(owner, &repo.name) {
            Ok(raw) => {
                let normalized: Vec<Commit> = raw.iter().filter_map(normalize_commit).collect();
                log::debug!("{}: {} commit(s)", repo.full_name, normalized.len());
                repo_counts.push(RepoCommits {
                    repo: repo.full_name.clone(),
                    commits: normalized.len() as u32,
                });
                all_commits.extend(normalized);
            }
            Err(e) => log::warn!("Failed to analyze repo {}: {e}", repo.full_name),
        }

        match source.repo_languages(owner, &repo.name) {
            Ok(langs) => {
                for (language, bytes) in langs {
                    languages.add(language, bytes);
                }
            }
            Err(e) => log::warn!("Failed to read languages for {}: {e}", repo.full_name),
        }
    }

    let analytics = compute_analytics(&all_commits, &settings.metrics_config(), zone);

    repo_counts.sort_by(|a, b| b.commits.cmp(&a.commits));
    repo_counts.truncate(TOP_REPOS_LIMIT);

    let engagement_score = engagement_score(
        analytics.totals.active_days,
        repo_counts.len(),
        analytics.totals.commits,
    );

    Ok(RemoteReport {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        ok: true,
        mode: Mode::GitHub,
        username: username.to_string(),
        scanned_repos: repos.len(),
        total_repos_found,
        commits_collected: all_commits.len(),
        analytics,
        top_repos: repo_counts,
        tech_profile: languages.ranked(TECH_PROFILE_LIMIT),
        engagement_score,
    })
}

/// Heuristic 0..=100 score, one decimal.
pub fn engagement_score(active_days: u32, top_repos: usize, commits: u32) -> f64 {
    let raw = f64::from(active_days) * 0.8 + top_repos as f64 * 5.0 + f64::from(commits) / 100.0;
    ((raw * 10.0).round() / 10.0).min(100.0)
}

/// Byte totals per language, in order of first appearance.
#[derive(Default)]
struct LanguageTotals {
    index: HashMap<String, usize>,
    totals: Vec<LanguageBytes>,
}

impl LanguageTotals {
    fn add(&mut self, language: String, bytes: u64) {
        match self.index.get(&language) {
            Some(&slot) => self.totals[slot].bytes += bytes,
            None => {
                self.index.insert(language.clone(), self.totals.len());
                self.totals.push(LanguageBytes { language, bytes });
            }
        }
    }

    fn ranked(mut self, limit: usize) -> Vec<LanguageBytes> {
        self.totals.sort_by(|a, b| b.bytes.cmp(&a.bytes));
        self.totals.truncate(limit);
        self.totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PulseError;
    use crate::remote::normalize::{ApiCommit, ApiRepo};
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    struct FakeSource {
        repos: Vec<ApiRepo>,
        commits: HashMap<String, Result<Vec<ApiCommit>>>,
        languages: HashMap<String, BTreeMap<String, u64>>,
        calls: RefCell<Vec<String>>,
    }

    fn repo(name: &str, fork: bool) -> ApiRepo {
        serde_json::from_value(json!({
            "name": name,
            "owner": {"login": "octo"},
            "full_name": format!("octo/{name}"),
            "fork": fork
        }))
        .unwrap()
    }

    fn commits(n: usize, day_offset: i64) -> Vec<ApiCommit> {
        (0..n)
            .map(|i| {
                let ts = 1_704_067_200 + day_offset * 86_400 + i as i64 * 7_200;
                let date = chrono::DateTime::from_timestamp(ts, 0).unwrap().to_rfc3339();
                serde_json::from_value(json!({
                    "sha": format!("{day_offset}-{i}"),
                    "commit": {"author": {"name": "Octo", "date": date}, "message": "work"}
                }))
                .unwrap()
            })
            .collect()
    }

    impl RemoteSource for FakeSource {
        fn list_repos(&self) -> Result<Vec<ApiRepo>> {
            Ok(self.repos.clone())
        }

        fn repo_commits(&self, _owner: &str, repo: &str) -> Result<Vec<ApiCommit>> {
            self.calls.borrow_mut().push(repo.to_string());
            match self.commits.get(repo) {
                Some(Ok(c)) => Ok(c.clone()),
                Some(Err(_)) => Err(PulseError::Api {
                    status: 500,
                    url: repo.to_string(),
                }),
                None => Ok(Vec::new()),
            }
        }

        fn repo_languages(&self, _owner: &str, repo: &str) -> Result<BTreeMap<String, u64>> {
            self.languages
                .get(repo)
                .cloned()
                .ok_or_else(|| PulseError::Api {
                    status: 404,
                    url: repo.to_string(),
                })
        }
    }

    fn fake() -> FakeSource {
        let mut commit_map = HashMap::new();
        commit_map.insert("forked".to_string(), Ok(commits(1, 0)));
        commit_map.insert("main".to_string(), Ok(commits(3, 0)));
        commit_map.insert("side".to_string(), Ok(commits(2, 1)));
        commit_map.insert(
            "broken".to_string(),
            Err(PulseError::Api {
                status: 500,
                url: "broken".to_string(),
            }),
        );

        let mut languages = HashMap::new();
        languages.insert(
            "main".to_string(),
            BTreeMap::from([("Rust".to_string(), 1000), ("Shell".to_string(), 10)]),
        );
        languages.insert("side".to_string(), BTreeMap::from([("Shell".to_string(), 2000)]));

        FakeSource {
            repos: vec![
                repo("forked", true),
                repo("main", false),
                repo("broken", false),
                repo("side", false),
            ],
            commits: commit_map,
            languages,
            calls: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn failures_are_isolated() {
        let source = fake();
        let report = analyze_account(&source, "octo", &Settings::default(), Zone::utc()).unwrap();
        assert_eq!(report.total_repos_found, 4);
        assert_eq!(report.scanned_repos, 4);
        assert_eq!(report.commits_collected, 6);
        assert_eq!(report.analytics.totals.commits, 6);
        assert_eq!(report.analytics.totals.insertions, 0);
        assert!(report.analytics.top_files.is_empty());
        assert!(report.top_repos.iter().all(|r| r.repo != "octo/broken"));
        assert_eq!(report.mode, Mode::GitHub);
    }

    #[test]
    fn owned_repos_are_scanned_before_forks() {
        let source = fake();
        analyze_account(&source, "octo", &Settings::default(), Zone::utc()).unwrap();
        let calls = source.calls.borrow();
        assert_eq!(calls.as_slice(), ["main", "broken", "side", "forked"]);
    }

    #[test]
    fn repo_cap_drops_forks_first() {
        let source = fake();
        let mut settings = Settings::default();
        settings.remote.max_repos = 2;
        let report = analyze_account(&source, "octo", &settings, Zone::utc()).unwrap();
        assert_eq!(report.scanned_repos, 2);
        assert_eq!(report.total_repos_found, 4);
        assert_eq!(source.calls.borrow().as_slice(), ["main", "broken"]);
    }

    #[test]
    fn top_repos_and_tech_profile_are_ranked() {
        let report = analyze_account(&fake(), "octo", &Settings::default(), Zone::utc()).unwrap();
        let repos: Vec<(&str, u32)> = report.top_repos.iter().map(|r| (r.repo.as_str(), r.commits)).collect();
        assert_eq!(repos, vec![("octo/main", 3), ("octo/side", 2), ("octo/forked", 1)]);

        let langs: Vec<(&str, u64)> = report
            .tech_profile
            .iter()
            .map(|l| (l.language.as_str(), l.bytes))
            .collect();
        assert_eq!(langs, vec![("Shell", 2010), ("Rust", 1000)]);
    }

    #[test]
    fn engagement_score_formula() {
        // 2 days * 0.8 + 3 repos * 5 + 6 / 100 = 16.66 -> 16.7
        assert_eq!(engagement_score(2, 3, 6), 16.7);
        assert_eq!(engagement_score(500, 10, 0), 100.0);
        assert_eq!(engagement_score(0, 0, 0), 0.0);
    }
}
