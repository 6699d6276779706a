//! Proverb shelf: category grid, category drill-down and free-text search.

use crate::client::ApiResult;
use crate::fetch::{ApiCall, FetchRequest, Origin};
use crate::model::{Category, CategoryDetail, SearchResult};
use tracing::{debug, warn};

/// Exactly one of the shelf's three views is active.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ShelfMode {
    #[default]
    Categories,
    Category(CategoryDetail),
    Search {
        query: String,
        results: Vec<SearchResult>,
    },
}

#[derive(Debug)]
pub struct ProverbShelf {
    origin: Origin,
    categories: Vec<Category>,
    categories_loading: bool,
    mode: ShelfMode,
    draft: String,
    /// Category and search fetches still in flight.
    loading: usize,
}

impl ProverbShelf {
    pub fn open(origin: Origin) -> (Self, FetchRequest) {
        let shelf = Self {
            origin,
            categories: Vec::new(),
            categories_loading: true,
            mode: ShelfMode::Categories,
            draft: String::new(),
            loading: 0,
        };
        (shelf, FetchRequest::new(origin, ApiCall::ListCategories))
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn mode(&self) -> &ShelfMode {
        &self.mode
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn categories_loading(&self) -> bool {
        self.categories_loading
    }

    /// A category or search fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading > 0
    }

    pub fn is_pending(&self) -> bool {
        self.is_loading() || self.categories_loading
    }

    pub fn edit_query(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn select_category(&mut self, category_id: impl Into<String>) -> FetchRequest {
        self.loading += 1;
        FetchRequest::new(
            self.origin,
            ApiCall::CategoryProverbs {
                category_id: category_id.into(),
            },
        )
    }

    /// Searches for the current draft. Blank drafts do nothing.
    pub fn submit_search(&mut self) -> Option<FetchRequest> {
        let query = self.draft.trim();
        if query.is_empty() {
            debug!("ignoring blank proverb search");
            return None;
        }
        let call = ApiCall::SearchProverbs {
            query: query.to_string(),
        };
        self.loading += 1;
        Some(FetchRequest::new(self.origin, call))
    }

    pub fn back(&mut self) {
        match self.mode {
            ShelfMode::Categories => {}
            ShelfMode::Category(_) => self.mode = ShelfMode::Categories,
            ShelfMode::Search { .. } => {
                self.mode = ShelfMode::Categories;
                self.draft.clear();
            }
        }
    }

    pub fn apply_categories(&mut self, result: ApiResult<Vec<Category>>) {
        self.categories_loading = false;
        match result {
            Ok(categories) => self.categories = categories,
            Err(err) => warn!(error = %err, "failed to load proverb categories"),
        }
    }

    pub fn apply_category(&mut self, result: ApiResult<CategoryDetail>) {
        self.loading = self.loading.saturating_sub(1);
        match result {
            Ok(detail) => self.mode = ShelfMode::Category(detail),
            Err(err) => warn!(error = %err, "failed to load category proverbs"),
        }
    }

    pub fn apply_search(&mut self, query: String, result: ApiResult<Vec<SearchResult>>) {
        self.loading = self.loading.saturating_sub(1);
        match result {
            Ok(results) => self.mode = ShelfMode::Search { query, results },
            Err(err) => warn!(%query, error = %err, "proverb search failed"),
        }
    }
}
