//! Pagination types and traits

/// Result of the next page computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// More pages may be available
    Continue,
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Tracks the page token during one resource-partition fetch sequence
///
/// The token is an opaque cursor realized as a monotonically increasing
/// integer. Each fetch sequence owns its own state exclusively.
#[derive(Debug, Clone)]
pub struct PageTokenState {
    /// Current page token
    pub token: u32,
    /// Pages fetched so far
    pub pages_fetched: u64,
    /// Records extracted so far
    pub total_extracted: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PageTokenState {
    /// Create state positioned at the given start token
    pub fn new(start: u32) -> Self {
        Self {
            token: start,
            pages_fetched: 0,
            total_extracted: 0,
            done: false,
        }
    }

    /// Record one fetched page and its extracted record count
    pub fn record_page(&mut self, records_extracted: usize) {
        self.pages_fetched += 1;
        self.total_extracted += records_extracted as u64;
    }

    /// Advance the token by one
    pub fn advance(&mut self) {
        self.token += 1;
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Initial token for a fresh fetch sequence
    fn start_state(&self) -> PageTokenState;

    /// Query parameters for the request at the current token
    fn page_params(&self, state: &PageTokenState) -> Vec<(String, String)>;

    /// Process the extracted record count of one page and decide whether to
    /// continue, mutating the token state accordingly
    fn advance(&self, records_extracted: usize, state: &mut PageTokenState) -> NextPage;
}
