use crate::models::BookmarkNode;
use owo_colors::OwoColorize;
use std::collections::HashSet;

/// One visible line of the folder tree
pub struct TreeRow<'a> {
    pub node: &'a BookmarkNode,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
}

impl TreeRow<'_> {
    pub fn is_folder(&self) -> bool {
        self.node.is_folder()
    }
}

/// Compute the rows currently visible given the expand state.
///
/// A collapsed folder hides its entire subtree. Ids in `expanded` that no
/// longer exist in the tree are ignored. The view is rebuilt from scratch on
/// every call; there is no diffing.
pub fn visible_rows<'a>(
    roots: &'a [BookmarkNode],
    expanded: &HashSet<String>,
) -> Vec<TreeRow<'a>> {
    let mut rows = Vec::new();
    for node in roots {
        push_rows(node, 0, expanded, &mut rows);
    }
    rows
}

fn push_rows<'a>(
    node: &'a BookmarkNode,
    depth: usize,
    expanded: &HashSet<String>,
    out: &mut Vec<TreeRow<'a>>,
) {
    let open = node.is_folder() && expanded.contains(&node.id);
    out.push(TreeRow {
        node,
        depth,
        has_children: !node.children.is_empty(),
        expanded: open,
    });
    if open {
        for child in &node.children {
            push_rows(child, depth + 1, expanded, out);
        }
    }
}

/// Every folder id in the tree, childless folders included
pub fn all_folder_ids(roots: &[BookmarkNode]) -> HashSet<String> {
    let mut ids = HashSet::new();
    for node in roots {
        collect_folder_ids(node, &mut ids);
    }
    ids
}

fn collect_folder_ids(node: &BookmarkNode, out: &mut HashSet<String>) {
    if node.is_folder() {
        out.insert(node.id.clone());
        for child in &node.children {
            collect_folder_ids(child, out);
        }
    }
}

/// Render visible rows as numbered text lines.
///
/// Folders show a twisty (suppressed when childless) and a single-choice
/// selection marker; links are plain labels and cannot be selected.
pub fn render(rows: &[TreeRow<'_>], selected: Option<&str>, no_color: bool) -> String {
    let mut out = String::new();

    for (i, row) in rows.iter().enumerate() {
        let number = format!("{:>3}", i + 1);
        let indent = "  ".repeat(row.depth);

        let line = if row.is_folder() {
            let twisty = if !row.has_children {
                ' '
            } else if row.expanded {
                '▾'
            } else {
                '▸'
            };
            let is_selected = selected == Some(row.node.id.as_str());
            let marker = if is_selected { "(*)" } else { "( )" };
            let title: &str = if row.node.title.is_empty() {
                "(unnamed folder)"
            } else {
                row.node.title.as_str()
            };

            if no_color {
                format!("{} {}{} {} {}\n", number, indent, twisty, marker, title)
            } else if is_selected {
                format!(
                    "{} {}{} {} {}\n",
                    number.bright_blue(),
                    indent,
                    twisty,
                    marker.green(),
                    title.bold().green()
                )
            } else {
                format!(
                    "{} {}{} {} {}\n",
                    number.bright_blue(),
                    indent,
                    twisty,
                    marker,
                    title.bold()
                )
            }
        } else {
            let title: &str = if row.node.title.is_empty() {
                row.node.url.as_deref().unwrap_or_default()
            } else {
                row.node.title.as_str()
            };

            if no_color {
                format!("{} {}  · {}\n", number, indent, title)
            } else {
                format!("{} {}  · {}\n", number.bright_blue(), indent, title.dimmed())
            }
        };

        out.push_str(&line);
    }

    out
}
