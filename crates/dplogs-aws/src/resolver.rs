use std::collections::BTreeSet;

use chrono::NaiveDate;
use futures::TryStreamExt;
use tracing::debug;

use crate::error::{Error, Result};
use crate::location::parent_dir;
use crate::store::{LogStore, RemoteFileEntry};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` target date.
pub fn parse_target_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| Error::DateParse {
        value: value.to_string(),
        source,
    })
}

/// Picks the entry a log directory is chosen by.
///
/// With a date, the first entry last modified on that (UTC) day. Without one,
/// the newest entry; on equal timestamps the earlier entry is kept.
pub fn select_entry<'a, I>(entries: I, date: Option<NaiveDate>) -> Option<&'a RemoteFileEntry>
where
    I: IntoIterator<Item = &'a RemoteFileEntry>,
{
    let mut entries = entries.into_iter();
    if let Some(date) = date {
        return entries.find(|e| e.last_modified.date_naive() == date);
    }

    let mut newest: Option<&RemoteFileEntry> = None;
    for entry in entries {
        match newest {
            Some(best) if entry.last_modified <= best.last_modified => {}
            _ => newest = Some(entry),
        }
    }
    newest
}

/// Finds the log directory under `prefix` holding the newest file, or the
/// first file modified on `date`.
///
/// Candidate directories are visited in key order.
pub async fn find_log_dir<S>(store: &S, prefix: &str, date: Option<NaiveDate>) -> Result<String>
where
    S: LogStore + ?Sized,
{
    let keys: Vec<String> = store.walk(prefix).try_collect().await?;
    let dirs: BTreeSet<&str> = keys.iter().map(|k| parent_dir(k)).collect();
    debug!(prefix, files = keys.len(), dirs = dirs.len(), "walked pipeline prefix");

    let mut entries = Vec::new();
    for dir in dirs {
        let listed = store.list_detailed(dir).await?;
        if date.is_some() {
            if let Some(found) = select_entry(&listed, date) {
                return Ok(parent_dir(&found.key).to_string());
            }
            continue;
        }
        entries.extend(listed);
    }

    select_entry(&entries, date)
        .map(|found| parent_dir(&found.key).to_string())
        .ok_or_else(|| Error::NoLogsFound {
            prefix: prefix.to_string(),
            date,
        })
}
