use crate::model::Commit;
use chrono::DateTime;
use serde::Deserialize;

pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Commit summary as listed by `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCommit {
    pub sha: Option<String>,
    pub commit: Option<ApiCommitDetail>,
    /// The GitHub account linked to the commit, when GitHub could match one.
    pub author: Option<ApiUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCommitDetail {
    pub author: Option<ApiSignature>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSignature {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiUser {
    pub login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiOwner {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiRepo {
    pub name: String,
    pub owner: ApiOwner,
    pub full_name: String,
    #[serde(default)]
    pub fork: bool,
}

/// Maps a listed commit onto [`Commit`]. The listing carries no per-file
/// stats, so the change counters stay at zero.
pub fn normalize_commit(raw: &ApiCommit) -> Option<Commit> {
    let sha = raw.sha.as_deref().filter(|s| !s.is_empty())?;
    let detail = raw.commit.as_ref()?;
    let signature = detail.author.as_ref()?;
    let date = signature.date.as_deref()?;
    let timestamp = DateTime::parse_from_rfc3339(date).ok()?.timestamp_millis();

    let author = signature
        .name
        .clone()
        .or_else(|| raw.author.as_ref().and_then(|u| u.login.clone()))
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    let message = detail
        .message
        .as_deref()
        .and_then(|m| m.lines().next())
        .unwrap_or("")
        .to_string();

    Some(Commit {
        hash: sha.to_string(),
        author,
        email: signature.email.clone(),
        timestamp,
        message,
        insertions: 0,
        deletions: 0,
        files: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ApiCommit {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn normalizes_a_full_summary() {
        let raw = parse(json!({
            "sha": "abc123",
            "commit": {
                "author": {"name": "Ada", "email": "ada@example.com", "date": "2024-01-01T10:00:00Z"},
                "message": "Add parser\n\nLong body"
            },
            "author": {"login": "ada-l"}
        }));
        let c = normalize_commit(&raw).unwrap();
        assert_eq!(c.hash, "abc123");
        assert_eq!(c.author, "Ada");
        assert_eq!(c.email.as_deref(), Some("ada@example.com"));
        assert_eq!(c.timestamp, 1_704_103_200_000);
        assert_eq!(c.message, "Add parser");
        assert_eq!((c.insertions, c.deletions), (0, 0));
        assert!(c.files.is_empty());
    }

    #[test]
    fn author_falls_back_to_login_then_unknown() {
        let raw = parse(json!({
            "sha": "a",
            "commit": {"author": {"date": "2024-01-01T10:00:00Z"}},
            "author": {"login": "octocat"}
        }));
        assert_eq!(normalize_commit(&raw).unwrap().author, "octocat");

        let raw = parse(json!({
            "sha": "a",
            "commit": {"author": {"date": "2024-01-01T10:00:00Z"}},
            "author": null
        }));
        let c = normalize_commit(&raw).unwrap();
        assert_eq!(c.author, UNKNOWN_AUTHOR);
        assert_eq!(c.email, None);
        assert_eq!(c.message, "");
    }

    #[test]
    fn missing_sha_or_date_is_filtered() {
        let no_sha = parse(json!({"commit": {"author": {"date": "2024-01-01T10:00:00Z"}}}));
        assert!(normalize_commit(&no_sha).is_none());

        let no_date = parse(json!({"sha": "a", "commit": {"author": {"name": "x"}}}));
        assert!(normalize_commit(&no_date).is_none());

        let bad_date = parse(json!({"sha": "a", "commit": {"author": {"date": "yesterday"}}}));
        assert!(normalize_commit(&bad_date).is_none());
    }

    #[test]
    fn offsets_in_dates_are_respected() {
        let raw = parse(json!({
            "sha": "a",
            "commit": {"author": {"date": "2024-01-01T12:00:00+02:00"}}
        }));
        assert_eq!(normalize_commit(&raw).unwrap().timestamp, 1_704_103_200_000);
    }

    #[test]
    fn repo_summary_deserializes() {
        let repo: ApiRepo = serde_json::from_value(json!({
            "name": "hello", "owner": {"login": "octocat"}, "full_name": "octocat/hello", "fork": true,
            "private": false
        }))
        .unwrap();
        assert_eq!(repo.owner.login, "octocat");
        assert!(repo.fork);
    }
}
