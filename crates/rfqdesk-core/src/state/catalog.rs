//! Catalog state: the accumulated RFQ list, filters, and pagination cursor.

use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::models::{Rfq, RfqFilters};

/// Page size requested by default.
/// Matches the server's default list window.
const DEFAULT_PAGE_LIMIT: u32 = 12;

/// Owns the RFQ list a catalog screen renders.
///
/// Pages accumulate here: `refresh` replaces the list with page one and
/// `load_more` appends the next page. The client itself never follows
/// pagination, so this is the only place list growth happens.
pub struct CatalogState {
    client: ApiClient,
    rfqs: Vec<Rfq>,
    page: u32,
    has_next_page: bool,
    query: String,
    categories: Vec<String>,
    countries: Vec<String>,
    incoterms: Vec<String>,
    limit: u32,
    is_loading: bool,
    is_loading_more: bool,
}

impl CatalogState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            rfqs: Vec::new(),
            page: 1,
            has_next_page: false,
            query: String::new(),
            categories: Vec::new(),
            countries: Vec::new(),
            incoterms: Vec::new(),
            limit: DEFAULT_PAGE_LIMIT,
            is_loading: false,
            is_loading_more: false,
        }
    }

    /// Fetch page one and replace the accumulated list.
    ///
    /// A refresh that is already running wins: further calls return
    /// immediately so rapid pull-to-refresh cannot stack requests.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        if self.is_loading {
            debug!("refresh already in flight; ignoring");
            return Ok(());
        }
        self.is_loading = true;
        let result = self.client.list_rfqs(&self.filters(1)).await;
        self.is_loading = false;

        let page = result?;
        self.rfqs = page.data;
        self.page = 1;
        self.has_next_page = page.pagination.has_next_page;
        Ok(())
    }

    /// Fetch the next page and append it. Entries whose id is already in
    /// the list are dropped; upstream inserts can shift the page window and
    /// re-serve a row.
    pub async fn load_more(&mut self) -> Result<(), ApiError> {
        if self.is_loading_more || !self.has_next_page {
            return Ok(());
        }
        self.is_loading_more = true;
        let next = self.page + 1;
        let result = self.client.list_rfqs(&self.filters(next)).await;
        self.is_loading_more = false;

        let page = result?;
        for rfq in page.data {
            if !self.rfqs.iter().any(|r| r.id == rfq.id) {
                self.rfqs.push(rfq);
            }
        }
        self.page = next;
        self.has_next_page = page.pagination.has_next_page;
        Ok(())
    }

    fn filters(&self, page: u32) -> RfqFilters {
        RfqFilters {
            query: if self.query.is_empty() {
                None
            } else {
                Some(self.query.clone())
            },
            categories: self.categories.clone(),
            countries: self.countries.clone(),
            incoterms: self.incoterms.clone(),
            page: Some(page),
            limit: Some(self.limit),
        }
    }

    // ===== Filters =====
    // Setters reset the cursor but keep the displayed list; it is replaced
    // when the next refresh lands.

    pub fn set_query(&mut self, query: String) {
        self.query = query;
        self.reset_cursor();
    }

    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.categories = categories;
        self.reset_cursor();
    }

    pub fn set_countries(&mut self, countries: Vec<String>) {
        self.countries = countries;
        self.reset_cursor();
    }

    pub fn set_incoterms(&mut self, incoterms: Vec<String>) {
        self.incoterms = incoterms;
        self.reset_cursor();
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit;
        self.reset_cursor();
    }

    pub fn clear_filters(&mut self) {
        self.query.clear();
        self.categories.clear();
        self.countries.clear();
        self.incoterms.clear();
        self.reset_cursor();
    }

    fn reset_cursor(&mut self) {
        self.page = 1;
        self.has_next_page = false;
    }

    // ===== Accessors =====

    pub fn rfqs(&self) -> &[Rfq] {
        &self.rfqs
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }
}
