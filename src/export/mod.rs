pub mod csv;
pub mod sheet;

use crate::error::{MarksheetError, Result};
use crate::flatten::flatten;
use crate::source::BookmarkSource;
use chrono::Local;
use sheet::SpreadsheetEncoder;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn from_string(format: &str) -> Option<Self> {
        match format.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "xlsx" => Some(ExportFormat::Xlsx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// An encoded export, ready to be written somewhere
pub struct ExportPayload {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub row_count: usize,
}

/// Default download name: sortable local timestamp, filesystem-safe
pub fn stamped_filename(format: ExportFormat) -> String {
    format!(
        "bookmarks-{}.{}",
        Local::now().format("%Y-%m-%d-%H-%M-%S"),
        format.extension()
    )
}

/// Resolve the selected folder, flatten it, and encode it.
///
/// Fails fast on the user-precondition paths: nothing selected, or the
/// selection (including an id the source no longer knows) yields zero links.
/// Neither failure has side effects.
pub fn build_export(
    source: &dyn BookmarkSource,
    selected: Option<&str>,
    format: ExportFormat,
    encoder: Option<&dyn SpreadsheetEncoder>,
) -> Result<ExportPayload> {
    let folder_id = selected.ok_or(MarksheetError::NoSelection)?;

    let rows = match source.subtree(folder_id) {
        Some(folder) => flatten(folder, &[]),
        None => Vec::new(),
    };
    if rows.is_empty() {
        return Err(MarksheetError::NoLinks);
    }

    let bytes = match format {
        ExportFormat::Csv => csv::to_csv(&rows).into_bytes(),
        ExportFormat::Xlsx => encoder
            .ok_or(MarksheetError::SpreadsheetUnavailable)?
            .encode(&rows)?,
    };

    Ok(ExportPayload {
        filename: stamped_filename(format),
        bytes,
        row_count: rows.len(),
    })
}

/// Write the payload to `dest`, or under its stamped name in the current
/// directory when no destination was given. One attempt, no retry.
pub fn write_payload(payload: &ExportPayload, dest: Option<&Path>) -> Result<PathBuf> {
    let path = match dest {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&payload.filename),
    };
    fs::write(&path, &payload.bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookmarkNode;
    use crate::source::ChromeBookmarks;

    fn sample_source() -> ChromeBookmarks {
        ChromeBookmarks::from_roots(vec![BookmarkNode::folder(
            "root",
            "Root",
            vec![BookmarkNode::folder(
                "a",
                "FolderA",
                vec![
                    BookmarkNode::link("l1", "Doc", "https://x/d", None),
                    BookmarkNode::folder(
                        "b",
                        "FolderB",
                        vec![BookmarkNode::link("l2", "Img", "https://x/i", None)],
                    ),
                ],
            )],
        )])
    }

    #[test]
    fn test_no_selection_fails_fast() {
        let source = sample_source();
        let result = build_export(&source, None, ExportFormat::Csv, None);
        assert!(matches!(result, Err(MarksheetError::NoSelection)));
    }

    #[test]
    fn test_unknown_folder_reports_no_links() {
        let source = sample_source();
        let result = build_export(&source, Some("gone"), ExportFormat::Csv, None);
        assert!(matches!(result, Err(MarksheetError::NoLinks)));
    }

    #[test]
    fn test_folder_without_links_reports_no_links() {
        let source = ChromeBookmarks::from_roots(vec![BookmarkNode::folder(
            "r",
            "Root",
            vec![BookmarkNode::folder("e", "Empty", vec![])],
        )]);
        let result = build_export(&source, Some("r"), ExportFormat::Csv, None);
        assert!(matches!(result, Err(MarksheetError::NoLinks)));
    }

    #[test]
    fn test_csv_export_of_selected_subtree() {
        let source = sample_source();
        let payload =
            build_export(&source, Some("a"), ExportFormat::Csv, None).unwrap();

        assert_eq!(payload.row_count, 2);
        let text = String::from_utf8(payload.bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Title,URL,DateAdded,FolderPath");
        assert_eq!(lines[1], "Doc,https://x/d,,FolderA");
        assert_eq!(lines[2], "Img,https://x/i,,FolderA / FolderB");
    }

    #[test]
    fn test_xlsx_without_encoder_is_refused() {
        let source = sample_source();
        let result = build_export(&source, Some("a"), ExportFormat::Xlsx, None);
        assert!(matches!(result, Err(MarksheetError::SpreadsheetUnavailable)));
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_xlsx_export_with_default_encoder() {
        let source = sample_source();
        let encoder = sheet::default_encoder().unwrap();
        let payload =
            build_export(&source, Some("a"), ExportFormat::Xlsx, Some(encoder.as_ref()))
                .unwrap();

        assert_eq!(payload.row_count, 2);
        assert_eq!(&payload.bytes[..2], b"PK");
        assert!(payload.filename.ends_with(".xlsx"));
    }

    #[test]
    fn test_stamped_filename_shape() {
        let name = stamped_filename(ExportFormat::Csv);
        assert!(name.starts_with("bookmarks-"));
        assert!(name.ends_with(".csv"));
        // bookmarks-YYYY-MM-DD-HH-MM-SS.csv
        assert_eq!(name.len(), "bookmarks-".len() + 19 + ".csv".len());
    }

    #[test]
    fn test_write_payload_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.csv");
        let payload = ExportPayload {
            filename: "bookmarks-x.csv".to_string(),
            bytes: b"Title,URL,DateAdded,FolderPath".to_vec(),
            row_count: 0,
        };

        let written = write_payload(&payload, Some(&dest)).unwrap();
        assert_eq!(written, dest);
        assert_eq!(fs::read(&dest).unwrap(), payload.bytes);
    }

    #[test]
    fn test_format_from_string() {
        assert_eq!(ExportFormat::from_string("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_string("XLSX"), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::from_string("ods"), None);
    }
}
