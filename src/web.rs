use crate::client::{ApiClient, ApiError};
use crate::controller::{Event, RootController};
use crate::daily::HighlightState;
use crate::detail::StoryView;
use crate::encode_component;
use crate::fetch::FetchRequest;
use crate::model::{
    Category, CategoryDetail, DeityEntry, Folktale, Language, Proverb, ProverbText, SearchResult,
    tradition_label,
};
use crate::session::{DEFAULT_MAX_SESSIONS, SessionHandle, SessionStore, SharedController};
use crate::shelf::ShelfMode;
use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use cookie::{Cookie, SameSite};
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, info, warn};

type SharedState = Arc<AppState>;
const SESSION_COOKIE: &str = "itan_session";
const DEFAULT_SETTLE_MS: u64 = 1500;

/// Sacred color names that are not valid CSS on their own.
static SWATCH_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("gold", "#d4af37"),
        ("maroon", "#800000"),
        ("brown", "#8b5a2b"),
        (
            "nine colors",
            "conic-gradient(red, orange, yellow, green, teal, blue, indigo, purple, maroon)",
        ),
    ])
});

pub struct AppState {
    client: ApiClient,
    sessions: SessionStore,
    settle: Duration,
}

impl AppState {
    pub fn new(client: ApiClient, config: &WebConfig) -> Self {
        Self {
            client,
            sessions: SessionStore::new(config.max_sessions),
            settle: config.settle,
        }
    }

    /// Resolves the request's session, mounting the controller on first use.
    async fn open_session(&self, headers: &HeaderMap) -> SessionHandle {
        let cookie = session_cookie(headers);
        let session = self.sessions.resolve(cookie.as_deref());
        if session.fresh {
            debug!(session = %session.id, "starting session");
            self.dispatch(&session.controller, vec![Event::Mount]).await;
        }
        session
    }

    async fn dispatch(&self, controller: &SharedController, events: Vec<Event>) {
        let requests: Vec<FetchRequest> = {
            let mut controller = controller.lock();
            events
                .into_iter()
                .flat_map(|event| controller.handle(event))
                .collect()
        };
        self.run(controller, requests).await;
    }

    /// Spawns one task per request and waits up to the settle window. Tasks
    /// still running afterwards apply their reply whenever they finish.
    async fn run(&self, controller: &SharedController, requests: Vec<FetchRequest>) {
        if requests.is_empty() {
            return;
        }
        let handles: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let client = self.client.clone();
                let controller = controller.clone();
                tokio::spawn(async move {
                    let response = client.execute(request).await;
                    controller.lock().apply(response);
                })
            })
            .collect();
        let settled = async {
            for handle in handles {
                if let Err(err) = handle.await {
                    warn!(error = %err, "fetch task aborted");
                }
            }
        };
        if tokio::time::timeout(self.settle, settled).await.is_err() {
            debug!(settle_ms = self.settle.as_millis() as u64, "fetches still in flight");
        }
    }
}

#[derive(Clone)]
pub struct WebConfig {
    pub addr: SocketAddr,
    /// How long an event handler waits for its fetches before rendering.
    pub settle: Duration,
    pub max_sessions: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            settle: Duration::from_millis(DEFAULT_SETTLE_MS),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

#[derive(Debug)]
pub enum WebError {
    Io(std::io::Error),
    Client(ApiError),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::Io(err) => write!(f, "io error: {err}"),
            WebError::Client(err) => write!(f, "client error: {err}"),
        }
    }
}

impl std::error::Error for WebError {}

impl From<std::io::Error> for WebError {
    fn from(value: std::io::Error) -> Self {
        WebError::Io(value)
    }
}

impl From<ApiError> for WebError {
    fn from(value: ApiError) -> Self {
        WebError::Client(value)
    }
}

pub async fn serve(config: WebConfig, client: ApiClient) -> Result<(), WebError> {
    info!(
        %config.addr,
        backend = client.api_root(),
        settle_ms = config.settle.as_millis() as u64,
        max_sessions = config.max_sessions,
        "Binding HTTP listener"
    );
    let state = Arc::new(AppState::new(client, &config));
    let router = build_router(state);
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server exited");
    Ok(())
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/events/select/:id", get(select_entry))
        .route("/events/close", get(close_detail))
        .route("/events/language/:language", get(set_language))
        .route("/events/shelf/open", get(open_shelf))
        .route("/events/shelf/close", get(close_shelf))
        .route("/events/shelf/category/:id", get(select_category))
        .route("/events/shelf/search", get(search_shelf))
        .route("/events/shelf/back", get(shelf_back))
        .route("/events/tales/open", get(open_library))
        .route("/events/tales/close", get(close_library))
        .route("/events/tales/select/:id", get(select_tale))
        .route("/events/tales/back", get(library_back))
        .route("/healthz", get(health))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CompressionLayer::new())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| Cookie::split_parse(raw))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

fn with_session_cookie(mut response: Response, session: &SessionHandle) -> Response {
    if !session.fresh {
        return response;
    }
    let cookie = Cookie::build((SESSION_COOKIE, session.id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    match HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(err) => warn!(error = %err, "session cookie is not a valid header"),
    }
    response
}

async fn page(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let session = state.open_session(&headers).await;
    let html = {
        let controller = session.controller.lock();
        render_page(&controller)
    };
    with_session_cookie(Html(html).into_response(), &session)
}

async fn apply_events(state: &AppState, headers: &HeaderMap, events: Vec<Event>) -> Response {
    let session = state.open_session(headers).await;
    state.dispatch(&session.controller, events).await;
    with_session_cookie(Redirect::to("/").into_response(), &session)
}

async fn select_entry(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    apply_events(&state, &headers, vec![Event::SelectEntry(id)]).await
}

async fn close_detail(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    apply_events(&state, &headers, vec![Event::CloseDetail]).await
}

async fn set_language(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(language): Path<String>,
) -> Response {
    let events = match language.parse::<Language>() {
        Ok(language) => vec![Event::SetLanguage(language)],
        Err(err) => {
            debug!(error = %err, "ignoring language switch");
            Vec::new()
        }
    };
    apply_events(&state, &headers, events).await
}

async fn open_shelf(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    apply_events(&state, &headers, vec![Event::OpenShelf]).await
}

async fn close_shelf(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    apply_events(&state, &headers, vec![Event::CloseShelf]).await
}

async fn select_category(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    apply_events(&state, &headers, vec![Event::SelectCategory(id)]).await
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

async fn search_shelf(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.unwrap_or_default();
    apply_events(
        &state,
        &headers,
        vec![Event::EditQuery(query), Event::SubmitSearch],
    )
    .await
}

async fn shelf_back(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    apply_events(&state, &headers, vec![Event::ShelfBack]).await
}

async fn open_library(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    apply_events(&state, &headers, vec![Event::OpenLibrary]).await
}

async fn close_library(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    apply_events(&state, &headers, vec![Event::CloseLibrary]).await
}

async fn select_tale(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    apply_events(&state, &headers, vec![Event::SelectTale(id)]).await
}

async fn library_back(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    apply_events(&state, &headers, vec![Event::LibraryBack]).await
}

async fn health(State(state): State<SharedState>) -> impl IntoResponse {
    let backend = state.client.welcome().await.is_ok();
    Json(json!({
        "status": "ok",
        "service": "living-itan-web",
        "backend": backend,
        "sessions": state.sessions.len(),
    }))
}

struct MarkerView<'a> {
    name: &'a str,
    href: String,
    left: String,
    top: String,
    selected: bool,
}

struct DailyView<'a> {
    loading: bool,
    plain: Option<&'a str>,
    structured: Option<&'a Proverb>,
    date: Option<&'a str>,
}

struct Swatch<'a> {
    name: &'a str,
    css: String,
}

struct TraditionView<'a> {
    label: String,
    description: &'a str,
}

struct DetailView<'a> {
    entry: &'a DeityEntry,
    english_active: bool,
    yoruba_active: bool,
    story_loading: bool,
    story: Option<&'a str>,
    swatches: Vec<Swatch<'a>>,
    traditions: Vec<TraditionView<'a>>,
    regions: String,
}

struct CategoryCard<'a> {
    category: &'a Category,
    href: String,
}

struct SearchView<'a> {
    query: &'a str,
    results: &'a [SearchResult],
}

struct ShelfView<'a> {
    draft: &'a str,
    categories_loading: bool,
    loading: bool,
    grid: Option<Vec<CategoryCard<'a>>>,
    category: Option<&'a CategoryDetail>,
    search: Option<SearchView<'a>>,
}

struct TaleCard<'a> {
    tale: &'a Folktale,
    characters: &'a [String],
    href: String,
}

struct LibraryView<'a> {
    loading: bool,
    tales: Vec<TaleCard<'a>>,
    reader: Option<&'a Folktale>,
}

fn percent(value: f32) -> String {
    format!("{value}%")
}

fn swatch_css(color: &str) -> String {
    let key = color.trim().to_lowercase();
    if let Some(css) = SWATCH_COLORS.get(key.as_str()) {
        return (*css).to_string();
    }
    if !key.is_empty() && key.chars().all(|ch| ch.is_ascii_alphabetic()) {
        key
    } else {
        "transparent".to_string()
    }
}

fn daily_view(state: &HighlightState) -> Option<DailyView<'_>> {
    match state {
        HighlightState::Loading => Some(DailyView {
            loading: true,
            plain: None,
            structured: None,
            date: None,
        }),
        HighlightState::Ready(daily) => {
            let (plain, structured) = match &daily.proverb {
                ProverbText::Plain(text) => (Some(text.as_str()), None),
                ProverbText::Structured(proverb) => (None, Some(proverb)),
            };
            Some(DailyView {
                loading: false,
                plain,
                structured,
                date: daily.date.as_deref(),
            })
        }
        HighlightState::Hidden => None,
    }
}

fn shelf_view(shelf: &crate::shelf::ProverbShelf) -> ShelfView<'_> {
    let mut view = ShelfView {
        draft: shelf.draft(),
        categories_loading: shelf.categories_loading(),
        loading: shelf.is_loading(),
        grid: None,
        category: None,
        search: None,
    };
    match shelf.mode() {
        ShelfMode::Categories => {
            view.grid = Some(
                shelf
                    .categories()
                    .iter()
                    .map(|category| CategoryCard {
                        category,
                        href: format!("/events/shelf/category/{}", encode_component(&category.id)),
                    })
                    .collect(),
            );
        }
        ShelfMode::Category(detail) => view.category = Some(detail),
        ShelfMode::Search { query, results } => {
            view.search = Some(SearchView { query, results });
        }
    }
    view
}

fn library_view(library: &crate::library::StoryBrowser) -> LibraryView<'_> {
    LibraryView {
        loading: library.is_loading(),
        tales: library
            .tales()
            .iter()
            .map(|tale| TaleCard {
                tale,
                characters: tale.card_characters(),
                href: format!("/events/tales/select/{}", encode_component(&tale.id)),
            })
            .collect(),
        reader: library.selected(),
    }
}

fn detail_view(panel: &crate::detail::DetailPanel) -> DetailView<'_> {
    let entry = panel.entry();
    let (story_loading, story) = match panel.story() {
        StoryView::Loading => (true, None),
        StoryView::Text(text) => (false, Some(text)),
        StoryView::Unavailable => (false, None),
    };
    DetailView {
        entry,
        english_active: panel.language() == Language::English,
        yoruba_active: panel.language() == Language::Yoruba,
        story_loading,
        story,
        swatches: entry
            .colors
            .iter()
            .map(|name| Swatch {
                name,
                css: swatch_css(name),
            })
            .collect(),
        traditions: entry
            .diaspora
            .traditions
            .iter()
            .map(|(key, description)| TraditionView {
                label: tradition_label(key),
                description,
            })
            .collect(),
        regions: entry.diaspora.regions_label(),
    }
}

/// Renders the whole page for one session's controller.
pub fn render_page(controller: &RootController) -> String {
    let template = PageTemplate {
        refresh: controller.has_pending(),
        entries_loading: controller.is_loading(),
        markers: controller
            .markers()
            .map(|marker| MarkerView {
                name: &marker.entry.name,
                href: format!("/events/select/{}", encode_component(&marker.entry.id)),
                left: percent(marker.position().x),
                top: percent(marker.position().y),
                selected: marker.selected,
            })
            .collect(),
        daily: controller.daily().and_then(|daily| daily_view(daily.state())),
        detail: controller.detail().map(detail_view),
        shelf: controller.shelf().map(shelf_view),
        library: controller.library().map(library_view),
    };
    template
        .render()
        .unwrap_or_else(|err| render_error_page(err.to_string()))
}

fn render_error_page(message: impl Into<String>) -> String {
    let message = message.into();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <title>The Living Ìtàn • Error</title>
  </head>
  <body>
    <main>
      <h1>Something went wrong</h1>
      <p>{message}</p>
      <a href="/">Back to the constellation</a>
    </main>
  </body>
</html>"#,
        message = message,
    )
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    {% if refresh %}<meta http-equiv="refresh" content="1" />{% endif %}
    <title>The Living Ìtàn</title>
    <script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4"></script>
    <style>
      .constellation-map { position: relative; height: 32rem; }
      .orisha-star { position: absolute; transform: translate(-50%, -50%); text-align: center; }
      .orisha-star .star-core { width: 0.9rem; height: 0.9rem; margin: 0 auto; border-radius: 9999px; background: #facc15; box-shadow: 0 0 12px #fde68a; }
      .orisha-star.selected .star-core { background: #f97316; box-shadow: 0 0 24px #fdba74; }
      .color-swatch { width: 2rem; height: 2rem; border-radius: 9999px; border: 1px solid #cbd5e1; }
      .modal-overlay { position: fixed; inset: 0; background: rgba(15, 23, 42, 0.7); overflow-y: auto; padding: 2.5rem 1rem; }
    </style>
  </head>
  <body class="bg-slate-950 text-slate-100">
    <main class="min-h-screen max-w-6xl mx-auto py-10 px-4 space-y-8">
      <header class="text-center space-y-2">
        <h1 class="text-4xl font-extrabold tracking-tight app-title">The Living Ìtàn</h1>
        <p class="text-lg text-slate-400">Àkọsílẹ̀ Àṣà Yorùbá Digital Encyclopedia</p>
      </header>

      <section class="cultural-pulse space-y-4">
        {% if let Some(daily) = daily %}
        {% if daily.loading %}
        <div class="loading">Loading proverb...</div>
        {% else %}
        <div class="daily-proverb rounded-lg bg-slate-900 p-6">
          <h3 class="text-xl font-semibold">Òwe Oni (Today's Proverb)</h3>
          {% if let Some(date) = daily.date %}<p class="text-sm text-slate-500">{{ date }}</p>{% endif %}
          <div class="proverb-content space-y-1">
            {% if let Some(text) = daily.plain %}
            <p class="proverb-yoruba text-lg">{{ text }}</p>
            {% endif %}
            {% if let Some(proverb) = daily.structured %}
            <p class="proverb-yoruba text-lg">{{ proverb.yoruba }}</p>
            <p class="proverb-translation italic">{{ proverb.literal }}</p>
            <p class="proverb-meaning">{{ proverb.meaning }}</p>
            <p class="proverb-context"><strong>Usage:</strong> {{ proverb.context }}</p>
            {% endif %}
          </div>
        </div>
        {% endif %}
        {% endif %}
        <div class="action-buttons flex flex-wrap gap-3">
          <a class="action-btn rounded-md bg-amber-500 px-4 py-2 font-semibold text-slate-950" href="/events/shelf/open">Òwe Shelf (Proverb Library)</a>
          <a class="action-btn rounded-md bg-emerald-500 px-4 py-2 font-semibold text-slate-950" href="/events/tales/open">Àlọ́ Ìjàpá (Tortoise Tales)</a>
        </div>
      </section>

      <section class="constellation-container space-y-2">
        <h2 class="text-2xl font-bold section-title">Òrìṣà Pantheon</h2>
        <p class="text-slate-400">Explore the divine constellation of Yorùbá deities. Click on any star to learn about their stories, domains, and connections across the diaspora.</p>
        {% if entries_loading %}
        <div class="loading">Loading constellation...</div>
        {% else %}
        <div class="constellation-map rounded-lg bg-slate-900">
          {% for marker in markers %}
          <a class="orisha-star{% if marker.selected %} selected{% endif %}" style="left: {{ marker.left }}; top: {{ marker.top }};" href="{{ marker.href }}">
            <div class="star-core"></div>
            <div class="orisha-name text-sm">{{ marker.name }}</div>
          </a>
          {% endfor %}
        </div>
        {% endif %}
      </section>
    </main>

    {% if let Some(detail) = detail %}
    <div class="modal-overlay orisha-profile-overlay">
      <div class="orisha-profile-container max-w-3xl mx-auto rounded-lg bg-slate-900 p-6 space-y-6">
        <div class="profile-header flex justify-between">
          <div class="language-toggle flex gap-2">
            <a class="px-3 py-1 rounded{% if detail.english_active %} active bg-amber-500 text-slate-950{% endif %}" href="/events/language/english">English</a>
            <a class="px-3 py-1 rounded{% if detail.yoruba_active %} active bg-amber-500 text-slate-950{% endif %}" href="/events/language/yoruba">Yorùbá</a>
          </div>
          <a class="close-btn text-2xl" href="/events/close">×</a>
        </div>
        <div>
          <h1 class="orisha-title text-3xl font-bold">{{ detail.entry.name }}</h1>
          <div class="orisha-subtitle text-slate-400">{{ detail.entry.yoruba_name }}</div>
        </div>
        <div class="orisha-attributes grid gap-4 md:grid-cols-3">
          <div class="attribute-group">
            <h3 class="font-semibold">Domains</h3>
            <div class="attribute-tags flex flex-wrap gap-2">
              {% for domain in detail.entry.domains %}<span class="attribute-tag rounded-full bg-slate-800 px-2">{{ domain }}</span>{% endfor %}
            </div>
          </div>
          <div class="attribute-group">
            <h3 class="font-semibold">Sacred Colors</h3>
            <div class="color-palette flex gap-2">
              {% for swatch in detail.swatches %}<div class="color-swatch" title="{{ swatch.name }}" style="background: {{ swatch.css }};"></div>{% endfor %}
            </div>
          </div>
          <div class="attribute-group">
            <h3 class="font-semibold">Sacred Number</h3>
            <div class="sacred-number text-3xl">{{ detail.entry.sacred_number }}</div>
          </div>
        </div>
        <div class="story-section">
          <h3 class="font-semibold">Story</h3>
          {% if detail.story_loading %}
          <div class="loading">Translating...</div>
          {% else %}
          {% if let Some(story) = detail.story %}
          <p class="story-text">{{ story }}</p>
          {% else %}
          <p class="story-text text-slate-500">Translation unavailable.</p>
          {% endif %}
          {% endif %}
        </div>
        <div class="diaspora-section">
          <h3 class="font-semibold">Diaspora Connections</h3>
          <div class="diaspora-info">
            {% for tradition in detail.traditions %}
            <div class="diaspora-item"><strong>{{ tradition.label }}:</strong> {{ tradition.description }}</div>
            {% endfor %}
            <div class="diaspora-item"><strong>Regions:</strong> {{ detail.regions }}</div>
          </div>
        </div>
        <div class="symbols-section">
          <h3 class="font-semibold">Sacred Symbols</h3>
          <div class="symbols-list flex flex-wrap gap-2">
            {% for symbol in detail.entry.symbols %}<span class="symbol-item rounded bg-slate-800 px-2">{{ symbol }}</span>{% endfor %}
          </div>
        </div>
      </div>
    </div>
    {% endif %}

    {% if let Some(shelf) = shelf %}
    <div class="modal-overlay">
      <div class="modal-container proverb-shelf max-w-4xl mx-auto rounded-lg bg-slate-900 p-6 space-y-6">
        <div class="modal-header flex justify-between">
          <h2 class="text-2xl font-bold">Òwe Yorùbá (Proverb Shelf)</h2>
          <a class="close-btn text-2xl" href="/events/shelf/close">×</a>
        </div>
        <form class="search-bar flex gap-2" action="/events/shelf/search" method="get">
          <input class="flex-1 rounded bg-slate-800 px-3 py-2" type="text" name="q" placeholder="Search proverbs..." value="{{ shelf.draft }}" />
          <button class="rounded bg-amber-500 px-4 py-2 text-slate-950" type="submit">Search</button>
        </form>
        <div class="proverb-content space-y-4">
          {% if shelf.loading %}
          <div class="loading">Loading proverbs...</div>
          {% endif %}
          {% if let Some(grid) = shelf.grid %}
          <div class="categories-grid">
            <h3 class="text-xl font-semibold">Categories</h3>
            {% if shelf.categories_loading %}
            <div class="loading">Loading categories...</div>
            {% endif %}
            <div class="category-cards grid gap-3 md:grid-cols-3">
              {% for card in grid %}
              <a class="category-card block rounded bg-slate-800 p-4" href="{{ card.href }}">
                <h4 class="font-semibold">{{ card.category.name }}</h4>
                <p>{{ card.category.name_yoruba }}</p>
                <span class="proverb-count text-sm text-slate-400">{{ card.category.count }} proverbs</span>
              </a>
              {% endfor %}
            </div>
          </div>
          {% endif %}
          {% if let Some(detail) = shelf.category %}
          <div class="category-proverbs space-y-3">
            <div class="category-header flex justify-between">
              <h3 class="text-xl font-semibold">{{ detail.category.name }} ({{ detail.category.name_yoruba }})</h3>
              <a class="back-btn" href="/events/shelf/back">← Back to Categories</a>
            </div>
            <div class="proverbs-list space-y-3">
              {% for proverb in detail.proverbs %}
              <div class="proverb-card rounded bg-slate-800 p-4">
                <p class="proverb-yoruba">{{ proverb.yoruba }}</p>
                <p class="proverb-translation italic">{{ proverb.literal }}</p>
                <p class="proverb-meaning">{{ proverb.meaning }}</p>
                <p class="proverb-context"><strong>Usage:</strong> {{ proverb.context }}</p>
              </div>
              {% endfor %}
            </div>
          </div>
          {% endif %}
          {% if let Some(search) = shelf.search %}
          <div class="search-results space-y-3">
            <div class="search-header flex justify-between">
              <h3 class="text-xl font-semibold">Search Results for "{{ search.query }}"</h3>
              <a class="back-btn" href="/events/shelf/back">← Clear Search</a>
            </div>
            {% if search.results.is_empty() %}
            <p class="text-slate-400">No proverbs matched.</p>
            {% endif %}
            <div class="proverbs-list space-y-3">
              {% for result in search.results %}
              <div class="proverb-card rounded bg-slate-800 p-4">
                <div class="category-badge text-xs uppercase text-amber-400">{{ result.category_name }}</div>
                <p class="proverb-yoruba">{{ result.proverb.yoruba }}</p>
                <p class="proverb-translation italic">{{ result.proverb.literal }}</p>
                <p class="proverb-meaning">{{ result.proverb.meaning }}</p>
                <p class="proverb-context"><strong>Usage:</strong> {{ result.proverb.context }}</p>
              </div>
              {% endfor %}
            </div>
          </div>
          {% endif %}
        </div>
      </div>
    </div>
    {% endif %}

    {% if let Some(library) = library %}
    <div class="modal-overlay">
      {% if let Some(tale) = library.reader %}
      <div class="modal-container folktale-reader max-w-3xl mx-auto rounded-lg bg-slate-900 p-6 space-y-4">
        <div class="modal-header flex justify-between">
          <h2 class="text-2xl font-bold">{{ tale.title }}</h2>
          <a class="close-btn text-2xl" href="/events/tales/close">×</a>
        </div>
        <div class="tale-header">
          <h3 class="tale-title-yoruba text-lg text-slate-300">{{ tale.title_yoruba }}</h3>
          <p class="tale-summary text-slate-400">{{ tale.summary }}</p>
        </div>
        <div class="tale-story">
          <h4 class="font-semibold">The Story</h4>
          <p class="story-text">{{ tale.full_story }}</p>
        </div>
        <div class="tale-moral">
          <h4 class="font-semibold">Moral of the Story</h4>
          <p class="moral-text">{{ tale.moral }}</p>
        </div>
        <div class="tale-characters">
          <h4 class="font-semibold">Characters</h4>
          <div class="character-list flex flex-wrap gap-2">
            {% for character in tale.characters %}<span class="character-tag rounded-full bg-slate-800 px-2">{{ character }}</span>{% endfor %}
          </div>
        </div>
        <a class="back-btn" href="/events/tales/back">← Back to Tales</a>
      </div>
      {% else %}
      <div class="modal-container folktale-library max-w-4xl mx-auto rounded-lg bg-slate-900 p-6 space-y-4">
        <div class="modal-header flex justify-between">
          <h2 class="text-2xl font-bold">Àlọ́ Ìjàpá (Tortoise Tales)</h2>
          <a class="close-btn text-2xl" href="/events/tales/close">×</a>
        </div>
        <p class="library-intro text-slate-400">Welcome to the adventures of Ìjàpá Alápàápàá, the cunning tortoise. These traditional tales teach us about wisdom, consequences, and the complexities of character.</p>
        {% if library.loading %}
        <div class="loading">Loading tales...</div>
        {% else %}
        <div class="tales-grid grid gap-3 md:grid-cols-2">
          {% for card in library.tales %}
          <a class="tale-card block rounded bg-slate-800 p-4" href="{{ card.href }}">
            <h3 class="font-semibold">{{ card.tale.title }}</h3>
            <p class="tale-title-yoruba text-slate-300">{{ card.tale.title_yoruba }}</p>
            <p class="tale-summary text-slate-400">{{ card.tale.summary }}</p>
            <div class="tale-characters flex flex-wrap gap-2">
              {% for character in card.characters %}<span class="character-tag rounded-full bg-slate-700 px-2">{{ character }}</span>{% endfor %}
            </div>
          </a>
          {% endfor %}
        </div>
        {% endif %}
      </div>
      {% endif %}
    </div>
    {% endif %}
  </body>
</html>"#,
    ext = "html"
)]
struct PageTemplate<'a> {
    refresh: bool,
    entries_loading: bool,
    markers: Vec<MarkerView<'a>>,
    daily: Option<DailyView<'a>>,
    detail: Option<DetailView<'a>>,
    shelf: Option<ShelfView<'a>>,
    library: Option<LibraryView<'a>>,
}
