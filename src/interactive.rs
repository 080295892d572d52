use crate::error::{MarksheetError, Result};
use crate::export::{self, sheet, ExportFormat};
use crate::source::BookmarkSource;
use crate::state::SessionState;
use crate::tree::{all_folder_ids, render, visible_rows};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;

pub fn run(source: &dyn BookmarkSource, state: &mut SessionState, no_color: bool) -> Result<()> {
    let mut rl =
        DefaultEditor::new().map_err(|e| MarksheetError::Other(e.to_string()))?;

    println!("marksheet interactive mode - type '?' for help");
    print_tree(source, state, no_color);

    loop {
        let readline = rl.readline("marksheet> ");
        match readline {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(&line)
                    .map_err(|e| MarksheetError::Other(e.to_string()))?;

                match line.as_str() {
                    "q" | "quit" | "exit" => break,
                    "?" | "help" => print_help(),
                    _ => match handle_command(source, state, &mut rl, &line) {
                        Ok(true) => print_tree(source, state, no_color),
                        Ok(false) => {}
                        Err(e) => eprintln!("Error: {}", e),
                    },
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

/// Returns whether the tree should be reprinted
fn handle_command(
    source: &dyn BookmarkSource,
    state: &mut SessionState,
    rl: &mut DefaultEditor,
    line: &str,
) -> Result<bool> {
    let mut parts = line.split_whitespace();
    let cmd = parts.next().unwrap_or_default();
    let arg = parts.next();

    match cmd {
        "p" => Ok(true),
        "e" => {
            state.expand_all(all_folder_ids(source.tree()));
            Ok(true)
        }
        "c" => {
            state.collapse_all();
            Ok(true)
        }
        "csv" => {
            export_to_file(source, state, rl, ExportFormat::Csv)?;
            Ok(false)
        }
        "xlsx" => {
            export_to_file(source, state, rl, ExportFormat::Xlsx)?;
            Ok(false)
        }
        "t" => toggle_row(source, state, parse_row(arg)?),
        "s" => select_row(source, state, parse_row(arg)?),
        "i" => show_id(source, state, parse_row(arg)?),
        _ => {
            // Bare number is shorthand for toggling that row
            if let Ok(n) = cmd.parse::<usize>() {
                toggle_row(source, state, n)
            } else {
                Err(format!("Unknown command '{}'. Type '?' for help.", cmd).into())
            }
        }
    }
}

fn parse_row(arg: Option<&str>) -> Result<usize> {
    let arg = arg.ok_or_else(|| MarksheetError::Other("Expected a row number.".to_string()))?;
    arg.parse::<usize>()
        .map_err(|_| MarksheetError::Other(format!("'{}' is not a row number.", arg)))
}

/// Resolve a 1-based visible row to a folder, returning its id and whether
/// it has children
fn folder_at(
    source: &dyn BookmarkSource,
    state: &SessionState,
    n: usize,
    verb: &str,
) -> Result<(String, bool)> {
    let rows = visible_rows(source.tree(), &state.expanded);
    let row = n
        .checked_sub(1)
        .and_then(|i| rows.get(i))
        .ok_or_else(|| MarksheetError::Other(format!("No row {} in the tree.", n)))?;
    if !row.is_folder() {
        return Err(MarksheetError::Other(format!(
            "Row {} is a link; only folders can be {}.",
            n, verb
        )));
    }
    Ok((row.node.id.clone(), row.has_children))
}

fn toggle_row(source: &dyn BookmarkSource, state: &mut SessionState, n: usize) -> Result<bool> {
    let (id, has_children) = folder_at(source, state, n, "toggled")?;
    if !has_children {
        println!("That folder has nothing to show.");
        return Ok(false);
    }
    state.toggle_folder(&id);
    Ok(true)
}

fn select_row(source: &dyn BookmarkSource, state: &mut SessionState, n: usize) -> Result<bool> {
    let (id, _) = folder_at(source, state, n, "selected")?;
    state.select_folder(&id);
    Ok(true)
}

fn show_id(source: &dyn BookmarkSource, state: &SessionState, n: usize) -> Result<bool> {
    let (id, _) = folder_at(source, state, n, "inspected")?;
    println!("Folder id: {}  (usable as: marksheet export csv --folder {})", id, id);
    Ok(false)
}

fn export_to_file(
    source: &dyn BookmarkSource,
    state: &SessionState,
    rl: &mut DefaultEditor,
    format: ExportFormat,
) -> Result<()> {
    let encoder = sheet::default_encoder();
    let payload =
        export::build_export(source, state.selected.as_deref(), format, encoder.as_deref())?;

    let prompt = format!("Save as [{}]: ", payload.filename);
    let answer = rl
        .readline(&prompt)
        .map_err(|e| MarksheetError::Other(e.to_string()))?;
    let answer = answer.trim();
    let dest = if answer.is_empty() {
        None
    } else {
        Some(Path::new(answer))
    };

    let path = export::write_payload(&payload, dest)?;
    println!(
        "✓ Exported {} bookmark(s) to {}",
        payload.row_count,
        path.display()
    );
    Ok(())
}

fn print_tree(source: &dyn BookmarkSource, state: &SessionState, no_color: bool) {
    let rows = visible_rows(source.tree(), &state.expanded);
    print!("{}", render(&rows, state.selected.as_deref(), no_color));
}

fn print_help() {
    println!(
        "
TREE:
    p                      Reprint the tree
    t <row>  (or <row>)    Expand/collapse the folder on that row
    e                      Expand all folders
    c                      Collapse all folders

SELECT & EXPORT:
    s <row>                Select the folder on that row as the export root
    i <row>                Show a folder's id for one-shot exports
    csv                    Export the selected folder's links to CSV
    xlsx                   Export the selected folder's links to XLSX

HELP & EXIT:
    ?  or help             Show this help
    q  or quit or exit     Exit
    ^D or ^C               Exit
"
    );
}
