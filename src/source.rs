use crate::error::Result;
use crate::models::BookmarkNode;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only view of a bookmark tree.
///
/// `subtree` returns `None` for an unknown id; callers treat that as an
/// empty export rather than an error.
pub trait BookmarkSource {
    fn tree(&self) -> &[BookmarkNode];
    fn subtree(&self, id: &str) -> Option<&BookmarkNode>;
}

/// Chromium bookmark structure (JSON)
#[derive(Debug, Deserialize)]
struct ChromeNode {
    id: Option<String>,
    #[serde(rename = "type")]
    node_type: String,
    name: Option<String>,
    url: Option<String>,
    date_added: Option<String>,
    children: Option<Vec<ChromeNode>>,
}

#[derive(Debug, Deserialize)]
struct ChromeBookmarkFile {
    roots: ChromeRoots,
}

#[derive(Debug, Deserialize)]
struct ChromeRoots {
    bookmark_bar: ChromeNode,
    other: ChromeNode,
    synced: Option<ChromeNode>,
}

/// Chromium stores timestamps as microseconds since 1601-01-01 UTC
const WEBKIT_EPOCH_OFFSET_MS: i64 = 11_644_473_600_000;

fn webkit_to_unix_ms(raw: &str) -> Option<i64> {
    let micros: i64 = raw.parse().ok()?;
    if micros <= 0 {
        return None;
    }
    Some(micros / 1000 - WEBKIT_EPOCH_OFFSET_MS)
}

fn convert_node(node: &ChromeNode) -> Option<BookmarkNode> {
    let id = match &node.id {
        Some(id) => id.clone(),
        None => {
            log::warn!("Skipping bookmark node without an id");
            return None;
        }
    };
    let title = node.name.clone().unwrap_or_default();

    match node.node_type.as_str() {
        "url" => Some(BookmarkNode::link(
            &id,
            &title,
            node.url.as_deref().unwrap_or_default(),
            node.date_added.as_deref().and_then(webkit_to_unix_ms),
        )),
        "folder" => Some(BookmarkNode::folder(
            &id,
            &title,
            node.children
                .as_deref()
                .unwrap_or_default()
                .iter()
                .filter_map(convert_node)
                .collect(),
        )),
        other => {
            log::warn!("Skipping bookmark node of unknown type '{}'", other);
            None
        }
    }
}

/// An in-memory bookmark tree loaded from a Chromium `Bookmarks` file
pub struct ChromeBookmarks {
    roots: Vec<BookmarkNode>,
}

impl ChromeBookmarks {
    /// Load and parse a Chromium-format `Bookmarks` JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let mut json_content = fs::read(path)?;
        let file: ChromeBookmarkFile = simd_json::serde::from_slice(&mut json_content)?;

        let mut roots = Vec::new();
        roots.extend(convert_node(&file.roots.bookmark_bar));
        roots.extend(convert_node(&file.roots.other));
        if let Some(ref synced) = file.roots.synced {
            roots.extend(convert_node(synced));
        }

        Ok(Self { roots })
    }

    /// Build a source from an already-constructed tree
    pub fn from_roots(roots: Vec<BookmarkNode>) -> Self {
        Self { roots }
    }
}

impl BookmarkSource for ChromeBookmarks {
    fn tree(&self) -> &[BookmarkNode] {
        &self.roots
    }

    fn subtree(&self, id: &str) -> Option<&BookmarkNode> {
        self.roots.iter().find_map(|root| find_node(root, id))
    }
}

fn find_node<'a>(node: &'a BookmarkNode, id: &str) -> Option<&'a BookmarkNode> {
    if node.id == id {
        return Some(node);
    }
    node.children.iter().find_map(|child| find_node(child, id))
}

/// Detected browser family (Chromium bookmark format only)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserKind {
    Chrome,
    Chromium,
    Edge,
}

impl BrowserKind {
    /// Get a user-friendly display name for the browser
    pub fn display_name(&self) -> &str {
        match self {
            BrowserKind::Chrome => "Chrome",
            BrowserKind::Chromium => "Chromium",
            BrowserKind::Edge => "Edge",
        }
    }
}

/// Browser profile location
#[derive(Debug, Clone)]
pub struct BrowserProfile {
    pub browser: BrowserKind,
    pub profile_name: String,
    pub path: PathBuf,
}

impl BrowserProfile {
    pub fn display_string(&self) -> String {
        format!("{} ({})", self.browser.display_name(), self.profile_name)
    }
}

/// Detect installed Chromium-family browsers and their profile locations
pub fn detect_profiles() -> Vec<BrowserProfile> {
    let mut profiles = Vec::new();

    let home = match std::env::var("HOME") {
        Ok(h) => h,
        Err(_) => return profiles,
    };

    for (browser, base) in browser_bases(&home) {
        profiles.extend(profiles_under(browser, &base));
    }

    profiles
}

fn browser_bases(home: &str) -> Vec<(BrowserKind, PathBuf)> {
    #[cfg(target_os = "macos")]
    let bases = vec![
        (
            BrowserKind::Chrome,
            format!("{}/Library/Application Support/Google/Chrome", home),
        ),
        (
            BrowserKind::Edge,
            format!("{}/Library/Application Support/Microsoft Edge", home),
        ),
    ];

    #[cfg(target_os = "linux")]
    let bases = vec![
        (BrowserKind::Chrome, format!("{}/.config/google-chrome", home)),
        (BrowserKind::Chromium, format!("{}/.config/chromium", home)),
        (BrowserKind::Edge, format!("{}/.config/microsoft-edge", home)),
    ];

    #[cfg(target_os = "windows")]
    let bases = vec![
        (
            BrowserKind::Chrome,
            format!("{}\\AppData\\Local\\Google\\Chrome\\User Data", home),
        ),
        (
            BrowserKind::Edge,
            format!("{}\\AppData\\Local\\Microsoft\\Edge\\User Data", home),
        ),
    ];

    bases.into_iter().map(|(b, p)| (b, PathBuf::from(p))).collect()
}

fn profiles_under(browser: BrowserKind, base_path: &Path) -> Vec<BrowserProfile> {
    let mut profiles = Vec::new();
    if !base_path.exists() {
        return profiles;
    }

    // Common profile directories to check
    let profile_names = ["Default", "Profile 1", "Profile 2", "Profile 3", "Profile 4"];

    for profile_name in profile_names {
        let bookmarks_path = base_path.join(profile_name).join("Bookmarks");
        if bookmarks_path.exists() {
            profiles.push(BrowserProfile {
                browser: browser.clone(),
                profile_name: profile_name.to_string(),
                path: bookmarks_path,
            });
        }
    }

    profiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "checksum": "e68417696614de65818e666d48227636",
        "roots": {
            "bookmark_bar": {
                "children": [
                    {
                        "date_added": "13345678900000000",
                        "id": "11",
                        "name": "Google",
                        "type": "url",
                        "url": "https://www.google.com/"
                    },
                    {
                        "children": [
                            {
                                "date_added": "0",
                                "id": "13",
                                "name": "Rust",
                                "type": "url",
                                "url": "https://www.rust-lang.org/"
                            }
                        ],
                        "date_added": "13345678900000000",
                        "id": "12",
                        "name": "Dev",
                        "type": "folder"
                    }
                ],
                "date_added": "13345678900000000",
                "id": "1",
                "name": "Bookmarks bar",
                "type": "folder"
            },
            "other": {
                "children": [],
                "date_added": "13345678900000000",
                "id": "2",
                "name": "Other bookmarks",
                "type": "folder"
            },
            "synced": {
                "children": [],
                "date_added": "13345678900000000",
                "id": "3",
                "name": "Mobile bookmarks",
                "type": "folder"
            }
        },
        "version": 1
    }"#;

    fn sample_source() -> ChromeBookmarks {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        ChromeBookmarks::load(file.path()).unwrap()
    }

    #[test]
    fn test_load_chromium_file() {
        let source = sample_source();
        let roots = source.tree();

        assert_eq!(roots.len(), 3);
        assert_eq!(roots[0].title, "Bookmarks bar");
        assert_eq!(roots[0].children.len(), 2);
        assert!(roots[0].children[0].url.is_some());
        assert_eq!(roots[1].title, "Other bookmarks");
        assert_eq!(roots[2].title, "Mobile bookmarks");
    }

    #[test]
    fn test_subtree_lookup() {
        let source = sample_source();

        let dev = source.subtree("12").unwrap();
        assert_eq!(dev.title, "Dev");
        assert_eq!(dev.children.len(), 1);

        let nested_link = source.subtree("13").unwrap();
        assert_eq!(nested_link.url.as_deref(), Some("https://www.rust-lang.org/"));

        assert!(source.subtree("999").is_none());
    }

    #[test]
    fn test_date_added_conversion() {
        let source = sample_source();

        let google = &source.tree()[0].children[0];
        // 13345678900000000 µs from 1601 => 1701205300000 ms from 1970
        assert_eq!(google.date_added, Some(1_701_205_300_000));

        // "0" means never set
        let rust = &source.subtree("12").unwrap().children[0];
        assert_eq!(rust.date_added, None);
    }

    #[rstest]
    #[case("13345678900000000", Some(1_701_205_300_000))]
    #[case("0", None)]
    #[case("-5", None)]
    #[case("not-a-number", None)]
    #[case("", None)]
    fn test_webkit_to_unix_ms(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(webkit_to_unix_ms(raw), expected);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{\"roots\": 42}}").unwrap();
        assert!(ChromeBookmarks::load(file.path()).is_err());
    }
}
