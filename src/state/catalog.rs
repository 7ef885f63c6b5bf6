use serde_json::Value;

use super::data::FileEntry;
use super::pagination::PaginationState;

/// Extension (lowercase) of the files the catalog keeps
const IMAGE_EXTENSION: &str = ".png";

/// Repository housekeeping file that is never listed
const IGNORED_PATH: &str = ".gitignore";

/// The FileCatalog holds the repository listing shown to the user.
///
/// It keeps three layers of data:
/// - `files`: every eligible texture from the last refresh
/// - `filtered`: the subset matching the search query
/// - `pagination`: page bookkeeping over `filtered`
#[derive(Debug, Clone, Default)]
pub struct FileCatalog {
    files: Vec<FileEntry>,
    filtered: Option<Vec<FileEntry>>,
    query: String,
    pagination: PaginationState,
}

impl FileCatalog {
    /// Create an empty catalog paginating `per_page` entries at a time
    pub fn new(per_page: usize) -> Self {
        let mut catalog = Self::default();
        catalog.set_per_page(per_page);
        catalog
    }

    /// Replace the listing wholesale.
    ///
    /// Keeps entries whose path ends in `.png` (any case), skips
    /// `.gitignore`, then re-applies the search filter.
    pub fn set_files<I>(&mut self, raw_entries: I)
    where
        I: IntoIterator<Item = FileEntry>,
    {
        self.files = raw_entries.into_iter().filter(is_image_entry).collect();
        self.filter_files();
    }

    /// Change the search query and re-filter
    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.filter_files();
    }

    /// Change the page size. Resets to the first page.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.pagination.per_page = per_page;
        let count = self.filtered_count();
        self.pagination.recompute(count);
    }

    /// Every eligible entry, ignoring the search query
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.as_ref().map_or(0, Vec::len)
    }

    /// Entries of the current page
    pub fn get_files(&self) -> &[FileEntry] {
        let Some(filtered) = &self.filtered else {
            return &[];
        };

        let (start, end) = self.pagination.slice_bounds(filtered.len());
        log::debug!("Page {} covers entries {}..{}", self.pagination.current_page, start, end);
        &filtered[start..end]
    }

    /// Move to another page (see [`PaginationState::goto`])
    pub fn goto_page(&mut self, target: i64, relative: bool) {
        self.pagination.goto(target, relative);
    }

    fn filter_files(&mut self) {
        let needle = self.query.trim().to_lowercase();
        let filtered: Vec<FileEntry> = self
            .files
            .iter()
            .filter(|entry| matches_query(entry, &needle))
            .cloned()
            .collect();

        self.pagination.recompute(filtered.len());
        self.filtered = Some(filtered);
    }
}

/// The eligibility predicate applied on every refresh
pub fn is_image_entry(entry: &FileEntry) -> bool {
    if entry.path == IGNORED_PATH {
        return false;
    }
    entry.path.to_lowercase().ends_with(IMAGE_EXTENSION)
}

/// Case-insensitive substring search over the path and passthrough values.
/// `needle` must already be lowercase; an empty needle matches everything.
fn matches_query(entry: &FileEntry, needle: &str) -> bool {
    if needle.is_empty() || entry.path.to_lowercase().contains(needle) {
        return true;
    }

    entry.extra.values().any(|value| match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        _ => false,
    })
}
