use crate::model::{Commit, FileActivity, LanguageCount};
use std::collections::HashMap;

const EXTENSION_LANGUAGES: &[(&str, &str)] = &[
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
    ("js", "JavaScript"),
    ("jsx", "JavaScript"),
    ("json", "JSON"),
    ("css", "CSS"),
    ("html", "HTML"),
    ("md", "Markdown"),
    ("yml", "YAML"),
    ("yaml", "YAML"),
    ("py", "Python"),
    ("go", "Go"),
    ("rs", "Rust"),
    ("java", "Java"),
    ("c", "C"),
    ("cpp", "C++"),
    ("h", "C/C++"),
    ("cs", "C#"),
    ("php", "PHP"),
    ("rb", "Ruby"),
    ("sh", "Shell"),
    ("bat", "Batch"),
    ("ps1", "PowerShell"),
];

const MAX_EXTENSION_LEN: usize = 10;

/// Per-path activity, in order of first appearance.
pub fn file_activity(sorted: &[&Commit]) -> Vec<FileActivity> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut files: Vec<FileActivity> = Vec::new();

    for commit in sorted {
        for change in &commit.files {
            let slot = *index.entry(change.path.as_str()).or_insert_with(|| {
                files.push(FileActivity::new(change.path.clone()));
                files.len() - 1
            });
            files[slot].add_change(change);
        }
    }
    files
}

/// Most touched files: commit count, then churn. Earlier files win full ties.
pub fn top_files(activity: &[FileActivity], limit: usize) -> Vec<FileActivity> {
    let mut ranked = activity.to_vec();
    ranked.sort_by(|a, b| b.commits.cmp(&a.commits).then(b.churn().cmp(&a.churn())));
    ranked.truncate(limit);
    ranked
}

/// Extension of the last `.` segment, if it looks like one.
pub fn extension(path: &str) -> Option<String> {
    let ext = path.rsplit('.').next()?.to_lowercase();
    let valid = !ext.is_empty()
        && ext.len() < MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    valid.then_some(ext)
}

pub fn language_for(ext: &str) -> String {
    EXTENSION_LANGUAGES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| ext.to_uppercase())
}

/// Distinct files per language, highest first; ties keep first appearance.
pub fn languages(activity: &[FileActivity], limit: usize) -> Vec<LanguageCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<LanguageCount> = Vec::new();

    for file in activity {
        let Some(ext) = extension(&file.path) else {
            continue;
        };
        let language = language_for(&ext);
        match index.get(&language) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(language.clone(), counts.len());
                counts.push(LanguageCount { language, count: 1 });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}
