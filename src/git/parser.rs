//! Rebuilds commits from `git log --numstat` text.
//!
//! The log is requested with a pretty format that frames every commit:
//!
//! ```text
//! --COMMIT--
//! <hash>
//! <author name>
//! <author email>
//! <unix seconds>
//! <subject>
//! --STATS--
//! <ins>\t<del>\t<path>
//! ```
//!
//! Malformed pieces never fail the parse. Bad header fields keep their
//! defaults and bad stat lines are dropped and counted.

use crate::model::{Commit, ParseDiagnostics};
use std::io::BufRead;

pub const COMMIT_MARKER: &str = "--COMMIT--";
pub const STATS_MARKER: &str = "--STATS--";

/// hash, author, email, timestamp, subject
pub const HEADER_LINES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Idle,
    CommitHeader,
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    CommitMarker,
    StatsMarker,
    Blank,
    Text,
}

impl LineEvent {
    pub fn classify(line: &str) -> Self {
        if line.starts_with(COMMIT_MARKER) {
            LineEvent::CommitMarker
        } else if line.starts_with(STATS_MARKER) {
            LineEvent::StatsMarker
        } else if line.is_empty() {
            LineEvent::Blank
        } else {
            LineEvent::Text
        }
    }
}

impl ParserState {
    /// Transition table. A stats marker only switches state while reading a
    /// header; inside a stats block it is just another (unusable) line.
    pub fn next(self, event: LineEvent) -> ParserState {
        use LineEvent::*;
        use ParserState::*;
        match (self, event) {
            (_, CommitMarker) => CommitHeader,
            (CommitHeader, StatsMarker) => Stats,
            (Idle, _) => Idle,
            (CommitHeader, Blank | Text) => CommitHeader,
            (Stats, StatsMarker | Blank | Text) => Stats,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLog {
    pub commits: Vec<Commit>,
    pub diagnostics: ParseDiagnostics,
}

#[derive(Debug)]
pub struct LogParser {
    state: ParserState,
    current: Option<Commit>,
    header_index: usize,
    commits: Vec<Commit>,
    diagnostics: ParseDiagnostics,
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LogParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Idle,
            current: None,
            header_index: 0,
            commits: Vec::new(),
            diagnostics: ParseDiagnostics::default(),
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn feed_line(&mut self, raw: &str) {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        let event = LineEvent::classify(line);
        let previous = self.state;
        self.state = previous.next(event);

        match (previous, event) {
            (_, LineEvent::CommitMarker) => {
                self.finalize();
                self.current = Some(Commit {
                    email: Some(String::new()),
                    ..Default::default()
                });
                self.header_index = 0;
            }
            (ParserState::Idle, LineEvent::Text | LineEvent::StatsMarker) => {
                self.diagnostics.orphan_lines += 1;
            }
            (ParserState::CommitHeader, LineEvent::Blank | LineEvent::Text) => {
                self.header_line(line);
            }
            (ParserState::Stats, LineEvent::StatsMarker | LineEvent::Text) => {
                self.stat_line(line);
            }
            _ => {}
        }
    }

    pub fn finish(mut self) -> ParsedLog {
        self.finalize();
        if self.diagnostics.dropped_lines > 0 || self.diagnostics.orphan_lines > 0 {
            log::debug!(
                "log parser skipped {} malformed stat line(s) and {} stray line(s)",
                self.diagnostics.dropped_lines,
                self.diagnostics.orphan_lines
            );
        }
        ParsedLog {
            commits: self.commits,
            diagnostics: self.diagnostics,
        }
    }

    fn finalize(&mut self) {
        if let Some(commit) = self.current.take() {
            self.commits.push(commit);
        }
    }

    fn header_line(&mut self, line: &str) {
        let Some(commit) = self.current.as_mut() else {
            return;
        };
        match self.header_index {
            0 => commit.hash = line.to_string(),
            1 => commit.author = line.to_string(),
            2 => commit.email = Some(line.to_string()),
            3 => commit.timestamp = parse_timestamp_ms(line),
            4 => commit.message = line.to_string(),
            _ => {}
        }
        self.header_index += 1;
    }

    fn stat_line(&mut self, line: &str) {
        let Some(commit) = self.current.as_mut() else {
            return;
        };
        match parse_stat_line(line) {
            Some((ins, del, path)) => commit.add_file(path, ins, del),
            None => self.diagnostics.dropped_lines += 1,
        }
    }
}

/// Splits `<ins>\t<del>\t<path>`. Binary files report `-` and an empty
/// count field reads as 0. Paths may themselves contain tabs.
fn parse_stat_line(line: &str) -> Option<(u64, u64, String)> {
    let mut parts = line.splitn(3, '\t');
    let ins = parse_count(parts.next()?)?;
    let del = parse_count(parts.next()?)?;
    let path = parts.next()?;
    if path.is_empty() {
        return None;
    }
    Some((ins, del, path.to_string()))
}

fn parse_count(field: &str) -> Option<u64> {
    let field = field.trim();
    if field.is_empty() || field == "-" {
        return Some(0);
    }
    field.parse::<u64>().ok()
}

fn parse_timestamp_ms(field: &str) -> i64 {
    let field = field.trim();
    if field.is_empty() {
        return 0;
    }
    if let Ok(secs) = field.parse::<i64>() {
        return secs.saturating_mul(1000);
    }
    match field.parse::<f64>() {
        Ok(secs) if secs.is_finite() => (secs * 1000.0) as i64,
        _ => 0,
    }
}

pub fn parse_log(text: &str) -> ParsedLog {
    let mut parser = LogParser::new();
    for line in text.split('\n') {
        parser.feed_line(line);
    }
    parser.finish()
}

pub fn parse_reader<R: BufRead>(reader: R) -> std::io::Result<ParsedLog> {
    let mut parser = LogParser::new();
    for line in reader.lines() {
        parser.feed_line(&line?);
    }
    Ok(parser.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "--COMMIT--\n\
        a1b2c3\n\
        Ada Lovelace\n\
        ada@example.com\n\
        1700000000\n\
        Add engine\n\
        --STATS--\n\
        10\t2\tsrc/engine.rs\n\
        3\t0\tREADME.md\n\
        \n\
        --COMMIT--\n\
        d4e5f6\n\
        Grace Hopper\n\
        grace@example.com\n\
        1700003600\n\
        Fix typo\n\
        --STATS--\n\
        1\t1\tREADME.md\n";

    #[test]
    fn transition_table() {
        use LineEvent::*;
        use ParserState::*;
        let cases = [
            (Idle, CommitMarker, CommitHeader),
            (Idle, StatsMarker, Idle),
            (Idle, Blank, Idle),
            (Idle, Text, Idle),
            (CommitHeader, CommitMarker, CommitHeader),
            (CommitHeader, StatsMarker, Stats),
            (CommitHeader, Blank, CommitHeader),
            (CommitHeader, Text, CommitHeader),
            (Stats, CommitMarker, CommitHeader),
            (Stats, StatsMarker, Stats),
            (Stats, Blank, Stats),
            (Stats, Text, Stats),
        ];
        for (from, event, to) in cases {
            assert_eq!(from.next(event), to, "{from:?} + {event:?}");
        }
    }

    #[test]
    fn classify_lines() {
        assert_eq!(LineEvent::classify("--COMMIT--"), LineEvent::CommitMarker);
        assert_eq!(LineEvent::classify("--STATS--"), LineEvent::StatsMarker);
        assert_eq!(LineEvent::classify(""), LineEvent::Blank);
        assert_eq!(LineEvent::classify("1\t2\ta.rs"), LineEvent::Text);
    }

    #[test]
    fn parses_two_commits() {
        let parsed = parse_log(SAMPLE);
        assert_eq!(parsed.commits.len(), 2);

        let first = &parsed.commits[0];
        assert_eq!(first.hash, "a1b2c3");
        assert_eq!(first.author, "Ada Lovelace");
        assert_eq!(first.email.as_deref(), Some("ada@example.com"));
        assert_eq!(first.timestamp, 1_700_000_000_000);
        assert_eq!(first.message, "Add engine");
        assert_eq!(first.insertions, 13);
        assert_eq!(first.deletions, 2);
        assert_eq!(first.files.len(), 2);

        let second = &parsed.commits[1];
        assert_eq!(second.hash, "d4e5f6");
        assert_eq!(second.files[0].path, "README.md");
        assert_eq!(parsed.diagnostics, ParseDiagnostics::default());
    }

    #[test]
    fn parsing_is_idempotent() {
        assert_eq!(parse_log(SAMPLE), parse_log(SAMPLE));
    }

    #[test]
    fn totals_match_file_sums() {
        for commit in parse_log(SAMPLE).commits {
            let ins: u64 = commit.files.iter().map(|f| f.ins).sum();
            let del: u64 = commit.files.iter().map(|f| f.del).sum();
            assert_eq!(commit.insertions, ins);
            assert_eq!(commit.deletions, del);
        }
    }

    #[test]
    fn binary_files_count_as_zero() {
        let text = "--COMMIT--\nh\na\ne\n1\nm\n--STATS--\n-\t-\tlogo.png\n4\t1\tsrc/x.rs\n";
        let commit = &parse_log(text).commits[0];
        assert_eq!(commit.files[0].path, "logo.png");
        assert_eq!(commit.files[0].ins, 0);
        assert_eq!(commit.files[0].del, 0);
        assert_eq!(commit.insertions, 4);
        assert_eq!(commit.deletions, 1);
    }

    #[test]
    fn empty_count_fields_read_as_zero() {
        let text = "--COMMIT--\nh\na\ne\n1\nm\n--STATS--\n\t\tempty.txt\n2\t\thalf.rs\n";
        let parsed = parse_log(text);
        let commit = &parsed.commits[0];
        assert_eq!(commit.files.len(), 2);
        assert_eq!((commit.files[0].ins, commit.files[0].del), (0, 0));
        assert_eq!((commit.files[1].ins, commit.files[1].del), (2, 0));
        assert_eq!(parsed.diagnostics.dropped_lines, 0);
    }

    #[test]
    fn paths_keep_embedded_tabs() {
        let text = "--COMMIT--\nh\na\ne\n1\nm\n--STATS--\n1\t0\tweird\tname.txt\n";
        let commit = &parse_log(text).commits[0];
        assert_eq!(commit.files[0].path, "weird\tname.txt");
    }

    #[test]
    fn malformed_stat_lines_are_dropped_and_counted() {
        let text = "--COMMIT--\nh\na\ne\n1\nm\n--STATS--\nx\t1\ta.rs\n1\t2\n3\t4\t\n5\t6\tok.rs\n";
        let parsed = parse_log(text);
        let commit = &parsed.commits[0];
        assert_eq!(commit.files.len(), 1);
        assert_eq!(commit.files[0].path, "ok.rs");
        assert_eq!(commit.insertions, 5);
        assert_eq!(parsed.diagnostics.dropped_lines, 3);
    }

    #[test]
    fn early_stats_marker_keeps_partial_header() {
        let text = "--COMMIT--\nabc\nAda\n--STATS--\n2\t2\tf.go\n";
        let commit = &parse_log(text).commits[0];
        assert_eq!(commit.hash, "abc");
        assert_eq!(commit.author, "Ada");
        assert_eq!(commit.email.as_deref(), Some(""));
        assert_eq!(commit.timestamp, 0);
        assert_eq!(commit.message, "");
        assert_eq!(commit.insertions, 2);
    }

    #[test]
    fn commit_without_stats_block_is_kept() {
        let text = "--COMMIT--\nh1\na\ne\n10\nfirst\n--COMMIT--\nh2\na\ne\n20\nsecond\n--STATS--\n";
        let parsed = parse_log(text);
        assert_eq!(parsed.commits.len(), 2);
        assert!(parsed.commits[0].files.is_empty());
        assert_eq!(parsed.commits[0].timestamp, 10_000);
        assert_eq!(parsed.commits[1].message, "second");
    }

    #[test]
    fn bad_timestamp_defaults_to_zero() {
        assert_eq!(parse_timestamp_ms("not-a-number"), 0);
        assert_eq!(parse_timestamp_ms(""), 0);
        assert_eq!(parse_timestamp_ms(" 42 "), 42_000);
        assert_eq!(parse_timestamp_ms("1.5"), 1_500);
        assert_eq!(parse_timestamp_ms("inf"), 0);
    }

    #[test]
    fn lines_before_first_commit_are_orphans() {
        let text = "warning: something\n\n--STATS--\n--COMMIT--\nh\na\ne\n1\nm\n";
        let parsed = parse_log(text);
        assert_eq!(parsed.commits.len(), 1);
        assert_eq!(parsed.diagnostics.orphan_lines, 2);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let text = SAMPLE.replace('\n', "\r\n");
        assert_eq!(parse_log(&text), parse_log(SAMPLE));
    }

    #[test]
    fn reader_and_str_agree() {
        let from_reader = parse_reader(std::io::Cursor::new(SAMPLE)).unwrap();
        assert_eq!(from_reader, parse_log(SAMPLE));
    }

    #[test]
    fn extra_header_lines_are_ignored() {
        let text = "--COMMIT--\nh\na\ne\n1\nsubject\nstray\n--STATS--\n1\t1\tx.c\n";
        let commit = &parse_log(text).commits[0];
        assert_eq!(commit.message, "subject");
        assert_eq!(commit.files.len(), 1);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let parsed = parse_log("");
        assert!(parsed.commits.is_empty());
        assert_eq!(parsed.diagnostics, ParseDiagnostics::default());
    }
}
