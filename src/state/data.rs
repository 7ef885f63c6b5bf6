//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the GitHub client, the persisted library and the UI layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Represents a single file of the repository tree
///
/// Only `path` is interpreted. Every other field returned by the
/// tree API (`mode`, `type`, `sha`, `size`, `url`) is carried along
/// untouched so it can be persisted and searched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FileEntry {
    /// Path relative to the repository root (e.g., "Buttons/UI-Panel-Button-Up.PNG")
    pub path: String,
    /// Passthrough fields from the upstream listing
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileEntry {
    /// Create an entry with no passthrough fields
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            extra: Map::new(),
        }
    }

    /// Path in the game client's notation, e.g. `Interface\Buttons\Foo.png`
    pub fn display_path(&self) -> String {
        format!("Interface\\{}", self.path.replace('/', "\\"))
    }

    /// Last path segment
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Natural dimensions of a loaded reference image
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero (no conversion into coordinates possible)
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_path() {
        let entry = FileEntry::new("Buttons/UI-Panel-Button-Up.png");
        assert_eq!(entry.display_path(), "Interface\\Buttons\\UI-Panel-Button-Up.png");
        assert_eq!(entry.file_name(), "UI-Panel-Button-Up.png");
    }

    #[test]
    fn test_passthrough_fields() {
        let json = r#"{"path":"a/b.png","mode":"100644","type":"blob","size":1234}"#;
        let entry: FileEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.path, "a/b.png");
        assert_eq!(entry.extra.get("type"), Some(&Value::from("blob")));
        assert_eq!(entry.extra.get("size"), Some(&Value::from(1234)));

        let back: Value = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["mode"], "100644");
        assert_eq!(back["path"], "a/b.png");
    }

    #[test]
    fn test_degenerate_size() {
        assert!(ImageSize::new(0, 10).is_degenerate());
        assert!(ImageSize::new(10, 0).is_degenerate());
        assert!(!ImageSize::new(1, 1).is_degenerate());
    }
}
