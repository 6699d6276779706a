//! View-state and data-fetch orchestration for The Living Ìtàn, a viewer for
//! the Yorùbá Òrìṣà pantheon, proverbs (òwe) and folktales (àlọ́).
//!
//! Panels are plain state machines that emit [`fetch::FetchRequest`]s; the
//! [`client::ApiClient`] executes them and the [`controller::RootController`]
//! routes the replies back. The `web` feature renders a controller per
//! browser session over HTTP.

pub mod client;
pub mod controller;
pub mod daily;
pub mod detail;
pub mod fetch;
pub mod library;
pub mod model;
pub mod session;
pub mod shelf;
pub mod translation;

#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
mod stub;

pub use client::{ApiClient, ApiError, ApiResult, ClientConfig};
pub use controller::{EntryMarker, Event, RootController};
pub use model::{
    Category, CategoryDetail, DailyProverb, DeityEntry, Diaspora, Folktale, Language, Position,
    Proverb, ProverbText, SearchResult,
};

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

/// Percent-encodes a single path segment or query value.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}
