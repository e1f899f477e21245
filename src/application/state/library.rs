//! One page of a paginated, searchable library listing

use crate::domain::entities::{LibraryRow, ListResponse};
use crate::domain::value_objects::{clamp_page, page_count, LibrarySort, ListQuery};

/// Token identifying one list request; only the latest one is applied
pub type RequestToken = u64;

/// Page, search and sort of a library as they appear in the URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryParams {
    pub page: u32,
    pub search: String,
    pub sort: LibrarySort,
}

impl Default for LibraryParams {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
            sort: LibrarySort::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LibraryState<I> {
    rows: Option<Vec<LibraryRow<I>>>,
    total: u64,
    page: u32,
    page_size: u32,
    search: String,
    sort: LibrarySort,
    active: bool,
    latest: RequestToken,
    in_flight: Option<RequestToken>,
}

impl<I: Clone> LibraryState<I> {
    pub fn new(page_size: u32) -> Self {
        Self {
            rows: None,
            total: 0,
            page: 1,
            page_size: page_size.max(1),
            search: String::new(),
            sort: LibrarySort::default(),
            active: false,
            latest: 0,
            in_flight: None,
        }
    }

    /// `false` until the first list response has been applied
    pub fn is_loaded(&self) -> bool {
        self.rows.is_some()
    }

    pub fn rows(&self) -> &[LibraryRow<I>] {
        self.rows.as_deref().unwrap_or(&[])
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn page_count(&self) -> u32 {
        page_count(self.total, self.page_size)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> LibrarySort {
        self.sort
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn params(&self) -> LibraryParams {
        LibraryParams {
            page: self.page,
            search: self.search.clone(),
            sort: self.sort,
        }
    }

    /// Adopt parameters parsed from the URL. Pages are not clamped because the
    /// total is not known yet.
    pub fn restore(&mut self, params: &LibraryParams) {
        self.page = params.page.max(1);
        self.search = params.search.clone();
        self.sort = params.sort;
    }

    pub fn query(&self) -> ListQuery {
        ListQuery::new(self.page_size, self.page)
            .with_search(self.search.clone())
            .with_sort(self.sort)
    }

    /// Start a list request, superseding any request still in flight
    pub fn begin_request(&mut self) -> (RequestToken, ListQuery) {
        self.latest += 1;
        self.in_flight = Some(self.latest);
        (self.latest, self.query())
    }

    /// Apply a list response. Returns `false` and changes nothing when a newer
    /// request was started after `token`. A page beyond the new total is
    /// clamped to the last page; the rows then belong to the old page and
    /// must be fetched again.
    pub fn apply(&mut self, token: RequestToken, response: ListResponse<I>) -> bool {
        if token != self.latest {
            return false;
        }
        self.rows = Some(response.items);
        self.total = response.total;
        self.in_flight = None;
        self.page = self.page.min(self.page_count());
        true
    }

    /// Close out a failed request; rows from the last success are kept
    pub fn fail(&mut self, token: RequestToken) {
        if token == self.latest {
            self.in_flight = None;
        }
    }

    /// Jump to a page, clamped to the known page range
    pub fn set_page(&mut self, requested: i64) -> bool {
        let page = clamp_page(requested, self.total, self.page_size);
        let changed = page != self.page;
        self.page = page;
        changed
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(i64::from(self.page) + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.set_page(i64::from(self.page) - 1)
    }

    /// Change the search text; a change returns to page 1
    pub fn set_search(&mut self, search: impl Into<String>) -> bool {
        let search = search.into();
        if search == self.search {
            return false;
        }
        self.search = search;
        self.page = 1;
        true
    }

    /// Change the sort key; a change returns to page 1
    pub fn set_sort(&mut self, sort: LibrarySort) -> bool {
        if sort == self.sort {
            return false;
        }
        self.sort = sort;
        self.page = 1;
        true
    }
}
