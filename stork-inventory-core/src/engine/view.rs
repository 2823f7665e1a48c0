//! Sort / filter / page state of one panel, with reducer-style transitions.

use super::paginate::clamp_page;
use super::sort::{SortKey, SortSpec, SortState};

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Pure UI state; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState<F> {
    sort: SortState<F>,
    hidden_mode: bool,
    page: usize,
    page_size: usize,
    query: String,
}

impl<F: Copy + PartialEq> Default for ViewState<F> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<F: Copy + PartialEq> ViewState<F> {
    pub fn new(page_size: usize) -> Self {
        Self {
            sort: SortState::default(),
            hidden_mode: false,
            page: 1,
            page_size: page_size.max(1),
            query: String::new(),
        }
    }

    pub fn sort_spec(&self) -> Option<SortSpec<F>> {
        self.sort.spec()
    }

    pub fn sort_state(&self) -> &SortState<F> {
        &self.sort
    }

    pub fn hidden_mode(&self) -> bool {
        self.hidden_mode
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn request_sort(&mut self, key: SortKey<F>) {
        self.sort.request(key);
    }

    /// Swap between active and hidden records. Resets to page 1.
    pub fn set_hidden_mode(&mut self, hidden: bool) {
        if self.hidden_mode != hidden {
            self.hidden_mode = hidden;
            self.page = 1;
        }
    }

    /// Resets to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Returns whether the query changed; a change resets to page 1.
    pub fn set_query(&mut self, query: &str) -> bool {
        if self.query == query {
            return false;
        }
        query.clone_into(&mut self.query);
        self.page = 1;
        true
    }

    /// Move to `page`. Outside `[1, total_pages]` this is a no-op returning
    /// `false`.
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) -> bool {
        if page >= 1 && page <= total_pages {
            self.page = page;
            true
        } else {
            false
        }
    }

    /// Pull the page back into range after the list shrank.
    pub fn clamp_to(&mut self, total_pages: usize) {
        self.page = clamp_page(self.page, total_pages);
    }
}
