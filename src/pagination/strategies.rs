//! Pagination strategy implementations

use super::types::{NextPage, PageTokenState, Paginator};

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page number pagination, 1-based
///
/// The page parameter is omitted on the very first request: page 1 is
/// implicit. The token advances by one after every page that extracted at
/// least one record and the walk stops at the first empty page.
#[derive(Debug, Clone)]
pub struct PageNumberPaginator {
    /// Query parameter name for the page number
    pub page_param: String,
    /// First page number
    pub start_page: u32,
    /// Optional page size parameter name
    pub page_size_param: Option<String>,
    /// Page size value
    pub page_size: Option<u32>,
}

impl PageNumberPaginator {
    /// Create a new page number paginator starting at page 1
    pub fn new(page_param: impl Into<String>) -> Self {
        Self {
            page_param: page_param.into(),
            start_page: 1,
            page_size_param: None,
            page_size: None,
        }
    }

    /// Set the page size parameter sent with every request
    #[must_use]
    pub fn with_page_size(mut self, param: impl Into<String>, size: u32) -> Self {
        self.page_size_param = Some(param.into());
        self.page_size = Some(size);
        self
    }
}

impl Paginator for PageNumberPaginator {
    fn start_state(&self) -> PageTokenState {
        PageTokenState::new(self.start_page)
    }

    fn page_params(&self, state: &PageTokenState) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let (Some(param), Some(size)) = (&self.page_size_param, self.page_size) {
            params.push((param.clone(), size.to_string()));
        }
        // The start token is implicit; only later pages carry the param.
        if state.token != self.start_page {
            params.push((self.page_param.clone(), state.token.to_string()));
        }
        params
    }

    fn advance(&self, records_extracted: usize, state: &mut PageTokenState) -> NextPage {
        state.record_page(records_extracted);

        if records_extracted == 0 {
            state.mark_done();
            return NextPage::Done;
        }

        state.advance();
        NextPage::Continue
    }
}

// ============================================================================
// Single Page
// ============================================================================

/// No pagination: exactly one request per fetch sequence
#[derive(Debug, Clone, Default)]
pub struct SinglePagePaginator;

impl Paginator for SinglePagePaginator {
    fn start_state(&self) -> PageTokenState {
        PageTokenState::new(1)
    }

    fn page_params(&self, _state: &PageTokenState) -> Vec<(String, String)> {
        Vec::new()
    }

    fn advance(&self, records_extracted: usize, state: &mut PageTokenState) -> NextPage {
        state.record_page(records_extracted);
        state.mark_done();
        NextPage::Done
    }
}
