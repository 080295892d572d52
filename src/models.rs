use serde::{Deserialize, Serialize};

/// Fixed export column order, shared by the CSV and spreadsheet encoders
pub const COLUMNS: [&str; 4] = ["Title", "URL", "DateAdded", "FolderPath"];

/// A node of the browser bookmark tree.
///
/// A node is either a folder (`url` is `None`, may have children) or a link
/// (`url` is `Some`, never has children). `date_added` is Unix milliseconds;
/// Chromium's WebKit-epoch timestamps are converted when the file is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkNode {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub date_added: Option<i64>,
    #[serde(default)]
    pub children: Vec<BookmarkNode>,
}

impl BookmarkNode {
    /// Create a folder node
    pub fn folder(id: &str, title: &str, children: Vec<BookmarkNode>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: None,
            date_added: None,
            children,
        }
    }

    /// Create a link node
    pub fn link(id: &str, title: &str, url: &str, date_added: Option<i64>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: Some(url.to_string()),
            date_added,
            children: Vec::new(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }
}

/// One flattened export record, all fields already formatted for output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub title: String,
    pub url: String,
    pub date_added: String,
    pub folder_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_and_link_kinds() {
        let folder = BookmarkNode::folder("1", "Dev", vec![]);
        let link = BookmarkNode::link("2", "Rust", "https://www.rust-lang.org/", Some(0));

        assert!(folder.is_folder());
        assert!(!link.is_folder());
        assert!(link.children.is_empty());
    }

    #[test]
    fn test_node_serialization() {
        let node = BookmarkNode::folder(
            "1",
            "Dev",
            vec![BookmarkNode::link("2", "Rust", "https://www.rust-lang.org/", None)],
        );

        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"id\":\"1\""));
        assert!(json.contains("\"title\":\"Dev\""));

        let deserialized: BookmarkNode = serde_json::from_str(&json).unwrap();
        assert_eq!(node, deserialized);
    }

    #[test]
    fn test_node_deserialization_defaults() {
        let node: BookmarkNode =
            serde_json::from_str(r#"{"id":"9","title":"Empty"}"#).unwrap();
        assert!(node.is_folder());
        assert!(node.children.is_empty());
        assert_eq!(node.date_added, None);
    }
}
