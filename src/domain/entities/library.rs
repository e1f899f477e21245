//! Library rows and listing pages as returned by the Forge API

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of a library listing
///
/// Kind-specific summary columns (`cls`, `rarity`, `school`, ...) are kept in
/// `summary` so all libraries share one row type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryRow<I> {
    pub id: I,
    pub name: String,
    pub created_at: String,
    #[serde(flatten)]
    pub summary: BTreeMap<String, serde_json::Value>,
}

impl<I> LibraryRow<I> {
    /// Creation time, accepting both RFC 3339 and SQLite's `YYYY-MM-DD HH:MM:SS`
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&self.created_at) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn summary_str(&self, key: &str) -> Option<&str> {
        self.summary.get(key).and_then(|v| v.as_str())
    }
}

/// One page of a listing plus the unpaginated total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<I> {
    pub items: Vec<LibraryRow<I>>,
    pub total: u64,
}

impl<I> ListResponse<I> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Acknowledgement of a save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecord<I> {
    pub id: I,
    pub name: String,
    pub created_at: String,
}
