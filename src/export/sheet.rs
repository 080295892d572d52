use crate::error::Result;
use crate::models::ExportRow;

/// Name of the single worksheet in a spreadsheet export
pub const SHEET_NAME: &str = "Bookmarks";

/// Converts export rows into a binary workbook.
///
/// The backend is optional: `default_encoder` returns `None` when the crate
/// is built without the `xlsx` feature, and the orchestrator falls back to a
/// user-visible message pointing at CSV export.
pub trait SpreadsheetEncoder {
    fn encode(&self, rows: &[ExportRow]) -> Result<Vec<u8>>;
}

#[cfg(feature = "xlsx")]
pub struct XlsxEncoder;

#[cfg(feature = "xlsx")]
impl SpreadsheetEncoder for XlsxEncoder {
    fn encode(&self, rows: &[ExportRow]) -> Result<Vec<u8>> {
        use crate::error::MarksheetError;
        use crate::models::COLUMNS;
        use rust_xlsxwriter::{Workbook, XlsxError};

        let err = |e: XlsxError| MarksheetError::Spreadsheet(e.to_string());

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME).map_err(err)?;

        for (col, name) in COLUMNS.iter().enumerate() {
            sheet.write_string(0, col as u16, *name).map_err(err)?;
        }

        for (i, row) in rows.iter().enumerate() {
            let r = (i + 1) as u32;
            sheet.write_string(r, 0, row.title.as_str()).map_err(err)?;
            sheet.write_string(r, 1, row.url.as_str()).map_err(err)?;
            sheet.write_string(r, 2, row.date_added.as_str()).map_err(err)?;
            sheet.write_string(r, 3, row.folder_path.as_str()).map_err(err)?;
        }

        workbook.save_to_buffer().map_err(err)
    }
}

#[cfg(feature = "xlsx")]
pub fn default_encoder() -> Option<Box<dyn SpreadsheetEncoder>> {
    Some(Box::new(XlsxEncoder))
}

#[cfg(not(feature = "xlsx"))]
pub fn default_encoder() -> Option<Box<dyn SpreadsheetEncoder>> {
    None
}

#[cfg(all(test, feature = "xlsx"))]
mod tests {
    use super::*;

    #[test]
    fn test_xlsx_encoder_produces_a_workbook() {
        let rows = vec![ExportRow {
            title: "Doc".to_string(),
            url: "https://x/d".to_string(),
            date_added: "2023-11-14 22:13".to_string(),
            folder_path: "FolderA".to_string(),
        }];

        let bytes = XlsxEncoder.encode(&rows).unwrap();
        // An xlsx file is a zip archive
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_default_encoder_is_present() {
        assert!(default_encoder().is_some());
    }
}
