use crate::models::{BookmarkNode, ExportRow};
use chrono::{Local, TimeZone};

/// Separator between folder titles in a row's FolderPath
const PATH_SEPARATOR: &str = " / ";

/// Format a Unix-millisecond timestamp as `YYYY-MM-DD HH:MM` in local time.
/// Absent or unrepresentable timestamps render as the empty string.
pub fn format_timestamp(ms: Option<i64>) -> String {
    format_timestamp_in(ms, &Local)
}

fn format_timestamp_in<Tz: TimeZone>(ms: Option<i64>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(ms) = ms else {
        return String::new();
    };
    match tz.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => String::new(),
    }
}

/// Build one export row for a link, placed at the given ancestor folder path
pub fn to_row(link: &BookmarkNode, ancestor_path: &[&str]) -> ExportRow {
    ExportRow {
        title: link.title.clone(),
        url: link.url.clone().unwrap_or_default(),
        date_added: format_timestamp(link.date_added),
        folder_path: ancestor_path.join(PATH_SEPARATOR),
    }
}

/// Collect one row per link under `folder`, depth-first in stored order.
///
/// The folder's own title (even when empty) is part of every descendant
/// row's FolderPath. Folders containing no links contribute no rows.
pub fn flatten(folder: &BookmarkNode, ancestors: &[&str]) -> Vec<ExportRow> {
    let mut path = Vec::with_capacity(ancestors.len() + 1);
    path.extend_from_slice(ancestors);
    path.push(folder.title.as_str());

    let mut rows = Vec::new();
    for child in &folder.children {
        if child.is_folder() {
            rows.extend(flatten(child, &path));
        } else {
            rows.push(to_row(child, &path));
        }
    }
    rows
}
