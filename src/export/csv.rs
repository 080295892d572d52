use crate::models::{ExportRow, COLUMNS};

/// Escape a field for CSV format
///
/// A field is quoted only when it contains a comma, quote, or line break;
/// internal quotes are doubled.
fn escape_field(field: &str) -> String {
    let needs_quotes = field.contains(',')
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r');

    if needs_quotes {
        let escaped = field.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        field.to_string()
    }
}

/// Serialize rows as CSV text: fixed header, `\n`-joined lines, no trailing
/// newline.
pub fn to_csv(rows: &[ExportRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(COLUMNS.join(","));

    for row in rows {
        let fields = [
            row.title.as_str(),
            row.url.as_str(),
            row.date_added.as_str(),
            row.folder_path.as_str(),
        ];
        lines.push(fields.map(escape_field).join(","));
    }

    lines.join("\n")
}
