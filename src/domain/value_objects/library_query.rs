//! Library sort keys, list queries and pagination arithmetic

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Server-side ordering of a library listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibrarySort {
    #[default]
    CreatedDesc,
    CreatedAsc,
    NameAsc,
    NameDesc,
}

impl LibrarySort {
    pub const ALL: [LibrarySort; 4] = [
        LibrarySort::CreatedDesc,
        LibrarySort::CreatedAsc,
        LibrarySort::NameAsc,
        LibrarySort::NameDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedDesc => "created_desc",
            Self::CreatedAsc => "created_asc",
            Self::NameAsc => "name_asc",
            Self::NameDesc => "name_desc",
        }
    }
}

impl fmt::Display for LibrarySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LibrarySort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LibrarySort::ALL
            .iter()
            .copied()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| format!("Unknown sort: {}", s))
    }
}

/// Parameters of one list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: u32,
    pub page: u32,
    pub search: String,
    pub sort: LibrarySort,
}

impl ListQuery {
    pub fn new(limit: u32, page: u32) -> Self {
        Self {
            limit,
            page: page.max(1),
            search: String::new(),
            sort: LibrarySort::default(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_sort(mut self, sort: LibrarySort) -> Self {
        self.sort = sort;
        self
    }

    /// Query pairs as sent on the wire; `search` is omitted when empty
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("page", self.page.to_string()),
            ("sort", self.sort.as_str().to_string()),
        ];
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        pairs
    }
}

/// Number of pages for `total` rows, never less than one
pub fn page_count(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

/// Clamp a requested page into `[1, page_count]`
pub fn clamp_page(requested: i64, total: u64, page_size: u32) -> u32 {
    let last = i64::from(page_count(total, page_size));
    // Bounded by `last`, which came from a u32.
    requested.clamp(1, last) as u32
}
