//! Log of recent commits that added or deleted bunch files.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use bunch_git::{ChangeKind, RepositoryService};

use crate::chain::read_extensions;
use crate::replay::path_extension;
use crate::{Error, Result};

/// Commits inspected when neither a start date nor a count is given.
pub const DEFAULT_LOG_COUNT: usize = 5;

/// Which commits [`log`] inspects.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Skip commits made before this time
    pub after: Option<DateTime<FixedOffset>>,
    pub max_count: Option<usize>,
}

impl LogOptions {
    /// Options for `--since`/`--last`: without either, the last
    /// [`DEFAULT_LOG_COUNT`] commits.
    pub fn new(after: Option<DateTime<FixedOffset>>, last: Option<usize>) -> Self {
        let max_count = match (after, last) {
            (_, Some(last)) => Some(last),
            (None, None) => Some(DEFAULT_LOG_COUNT),
            (Some(_), None) => None,
        };
        Self { after, max_count }
    }

    /// [`LogOptions::new`] from a raw `--since` value, read relative to now.
    pub fn from_args(since: Option<&str>, last: Option<usize>) -> Result<Self> {
        let after = since.map(|text| parse_since(text, Utc::now())).transpose()?;
        Ok(Self::new(after, last))
    }
}

/// A commit that added or deleted bunch files.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub hash: String,
    pub author: String,
    pub when: DateTime<FixedOffset>,
    pub title: String,
    pub added: usize,
    pub deleted: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LogReport {
    /// Number of commits inspected
    pub processed: usize,
    /// Newest first; commits without bunch additions or deletions are left out
    pub entries: Vec<LogEntry>,
}

/// Count bunch files added and deleted by recent commits.
pub fn log(repo: &dyn RepositoryService, options: &LogOptions) -> Result<LogReport> {
    let extensions = read_extensions(repo.workdir())?;
    let is_bunch_path =
        |path: &str| path_extension(path).is_some_and(|ext| extensions.iter().any(|e| e == ext));

    let commits = repo.history(options.after, options.max_count)?;
    let mut report = LogReport {
        processed: commits.len(),
        entries: Vec::new(),
    };

    for commit in &commits {
        let count = |kind: ChangeKind| {
            commit
                .file_actions
                .iter()
                .filter(|a| a.kind == kind && is_bunch_path(&a.path))
                .count()
        };
        let added = count(ChangeKind::Add);
        let deleted = count(ChangeKind::Remove);
        if added == 0 && deleted == 0 {
            continue;
        }
        report.entries.push(LogEntry {
            hash: commit.hash.clone(),
            author: commit.author.name.clone(),
            when: commit.author.when,
            title: commit.title.clone(),
            added,
            deleted,
        });
    }

    tracing::debug!(
        processed = report.processed,
        entries = report.entries.len(),
        "Collected bunch log"
    );
    Ok(report)
}

/// Parse a `--since` value relative to `now`.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS +ZZZZ`, `YYYY-MM-DD` (midnight
/// UTC), `now`, `yesterday`, and relative forms such as `3 days ago` or
/// `1.day.2.weeks.ago`.
pub fn parse_since(input: &str, now: DateTime<Utc>) -> Result<DateTime<FixedOffset>> {
    let invalid = || Error::InvalidDate {
        input: input.to_string(),
    };
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    if let Ok(when) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(when);
    }
    if let Ok(when) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S %z") {
        return Ok(when);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
        return Ok(midnight.and_utc().fixed_offset());
    }

    let text = trimmed.to_lowercase();
    let offset = match text.as_str() {
        "now" => Duration::zero(),
        "yesterday" => Duration::days(1),
        _ => relative_offset(&text).ok_or_else(invalid)?,
    };
    Ok((now - offset).fixed_offset())
}

/// Sum of `<count> <unit>` pairs before a trailing `ago`.
fn relative_offset(text: &str) -> Option<Duration> {
    let tokens: Vec<&str> = text
        .split(|c: char| c == '.' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();
    let (last, pairs) = tokens.split_last()?;
    if *last != "ago" || pairs.is_empty() || pairs.len() % 2 != 0 {
        return None;
    }

    let mut total = Duration::zero();
    for pair in pairs.chunks(2) {
        let count: i64 = pair[0].parse().ok()?;
        let unit = match pair[1].trim_end_matches('s') {
            "second" => Duration::seconds(1),
            "minute" => Duration::minutes(1),
            "hour" => Duration::hours(1),
            "day" => Duration::days(1),
            "week" => Duration::weeks(1),
            "month" => Duration::days(30),
            "year" => Duration::days(365),
            _ => return None,
        };
        total = total + unit * i32::try_from(count).ok()?;
    }
    Some(total)
}
