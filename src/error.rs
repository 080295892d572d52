/// Custom error type for marksheet
///
/// Using `thiserror` for automatic `Error` trait implementation and `From`
/// conversions. The user-precondition variants double as the exact message
/// shown to the user when an export is refused.
#[derive(Debug, thiserror::Error)]
pub enum MarksheetError {
    /// I/O errors (bookmark file, state file, export file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bookmark source errors (missing profile, malformed Bookmarks file)
    #[error("Bookmark source error: {0}")]
    Source(String),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Export attempted with no folder selected
    #[error("No folder is selected. Pick one in the tree (`browse`) or pass --folder <ID>.")]
    NoSelection,

    /// Selected folder contains no links anywhere beneath it
    #[error("No links found under the selected folder.")]
    NoLinks,

    /// Built without the `xlsx` feature
    #[error("Spreadsheet export is not available in this build. Use CSV export, or rebuild with the `xlsx` feature.")]
    SpreadsheetUnavailable,

    /// Workbook assembly/serialization errors from the spreadsheet backend
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Generic error for cases that don't fit other categories
    #[error("{0}")]
    Other(String),
}

/// Result type alias using MarksheetError
pub type Result<T> = std::result::Result<T, MarksheetError>;

impl From<String> for MarksheetError {
    fn from(s: String) -> Self {
        MarksheetError::Other(s)
    }
}

impl From<&str> for MarksheetError {
    fn from(s: &str) -> Self {
        MarksheetError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for MarksheetError {
    fn from(err: serde_json::Error) -> Self {
        MarksheetError::Json(err.to_string())
    }
}

impl From<simd_json::Error> for MarksheetError {
    fn from(err: simd_json::Error) -> Self {
        MarksheetError::Json(err.to_string())
    }
}
