//! Fetch effects exchanged between panels and the HTTP driver.
//!
//! Panels never touch the network. A state transition returns
//! [`FetchRequest`]s; whoever drives the controller executes them and hands
//! back a [`FetchResponse`] tagged with the same [`Origin`].

use crate::client::ApiResult;
use crate::model::{
    Category, CategoryDetail, DailyProverb, DeityEntry, Folktale, Language, SearchResult,
};
use crate::translation::ContentField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Constellation,
    Detail,
    DailyHighlight,
    ProverbShelf,
    StoryBrowser,
}

/// Identifies the panel instance that issued a request. Re-opening a panel
/// yields a new instance, so replies addressed to the old one are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Origin {
    pub panel: PanelKind,
    pub instance: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListDeities,
    Translate {
        field: ContentField,
        text: String,
        target: Language,
    },
    DailyProverb,
    ListCategories,
    CategoryProverbs {
        category_id: String,
    },
    SearchProverbs {
        query: String,
    },
    ListFolktales,
}

#[derive(Debug)]
pub enum ApiReply {
    Deities(ApiResult<Vec<DeityEntry>>),
    Translation {
        field: ContentField,
        result: ApiResult<String>,
    },
    DailyProverb(ApiResult<DailyProverb>),
    Categories(ApiResult<Vec<Category>>),
    CategoryProverbs(ApiResult<CategoryDetail>),
    SearchResults {
        query: String,
        result: ApiResult<Vec<SearchResult>>,
    },
    Folktales(ApiResult<Vec<Folktale>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub origin: Origin,
    pub call: ApiCall,
}

impl FetchRequest {
    pub fn new(origin: Origin, call: ApiCall) -> Self {
        Self { origin, call }
    }
}

#[derive(Debug)]
pub struct FetchResponse {
    pub origin: Origin,
    pub reply: ApiReply,
}

impl FetchResponse {
    pub fn new(origin: Origin, reply: ApiReply) -> Self {
        Self { origin, reply }
    }
}
