//! In-process stand-in for the backend, used by the crate's tests.

use crate::client::{ApiClient, ClientConfig};
use crate::model::{Category, CategoryDetail, DeityEntry, Folktale, SearchResult};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;

pub(crate) fn deities_json() -> Value {
    json!([
        {
            "id": "obatala",
            "name": "Ọbàtálá",
            "yoruba_name": "Ọbàtálá",
            "domains": ["Creation", "Purity", "Peace"],
            "colors": ["White"],
            "symbols": ["White Cloth", "Dove"],
            "sacred_number": 8,
            "story": "The great creator deity who shaped humanity.",
            "yoruba_story": "Òrìṣà àgbà tí Olódùmarè rán láti dá ayé.",
            "diaspora": {"santeria": "Our Lady of Mercy", "location": "Cuba, Puerto Rico"},
            "constellation_position": {"x": 50, "y": 30}
        },
        {
            "id": "shango",
            "name": "Ṣàngó",
            "yoruba_name": "Ṣàngó",
            "domains": ["Thunder", "Lightning", "Justice"],
            "colors": ["Red", "White"],
            "symbols": ["Double-headed Axe (Oṣè)", "Ram"],
            "sacred_number": 16,
            "story": "The powerful Òrìṣà of thunder and lightning.",
            "yoruba_story": "Òrìṣà àrá àti mọ̀nàmọ́ná.",
            "diaspora": {"santeria": "St. Barbara", "location": "Cuba, Brazil, Trinidad"},
            "constellation_position": {"x": 75, "y": 25}
        },
        {
            "id": "oya",
            "name": "Oya",
            "yoruba_name": "Oya",
            "domains": ["Winds", "Storms"],
            "colors": ["Maroon", "Nine Colors"],
            "symbols": ["Buffalo Horns"],
            "sacred_number": 9,
            "story": "The fierce goddess of winds and storms.",
            "diaspora": {"santeria": "Our Lady of Candelaria", "location": "Cuba, Brazil"},
            "constellation_position": {"x": 85, "y": 40}
        }
    ])
}

pub(crate) fn deities() -> Vec<DeityEntry> {
    serde_json::from_value(deities_json()).expect("deity fixtures")
}

pub(crate) fn categories_json() -> Value {
    json!([
        {"id": "wisdom", "name": "Wisdom", "name_yoruba": "Ọgbọ́n", "count": 2},
        {"id": "silence", "name": "Silence", "name_yoruba": "Ìdákẹ́jẹ́", "count": 0}
    ])
}

pub(crate) fn categories() -> Vec<Category> {
    serde_json::from_value(categories_json()).expect("category fixtures")
}

pub(crate) fn category_json(id: &str) -> Option<Value> {
    match id {
        "wisdom" => Some(json!({
            "id": "wisdom",
            "name": "Wisdom",
            "name_yoruba": "Ọgbọ́n",
            "count": 2,
            "proverbs": [
                {
                    "yoruba": "Ọgbọ́n ju agbára lọ",
                    "literal": "Wisdom surpasses strength",
                    "meaning": "Thinking wins over force",
                    "context": "When someone relies on might alone"
                },
                {
                    "yoruba": "Àgbà kì í wà lọ́jà kí orí ọmọ tuntun wọ́",
                    "literal": "Elders do not stay in the market while a baby's head tilts",
                    "meaning": "Elders must act when they see wrong",
                    "context": "Reminding elders of responsibility"
                }
            ]
        })),
        "silence" => Some(json!({
            "id": "silence",
            "name": "Silence",
            "name_yoruba": "Ìdákẹ́jẹ́",
            "count": 0,
            "proverbs": []
        })),
        _ => None,
    }
}

pub(crate) fn category(id: &str) -> CategoryDetail {
    serde_json::from_value(category_json(id).expect("known category")).expect("category fixture")
}

pub(crate) fn search_json() -> Value {
    json!([
        {
            "category_name": "Wisdom",
            "category_id": "wisdom",
            "proverb": {
                "yoruba": "Ọgbọ́n ju agbára lọ",
                "literal": "Wisdom surpasses strength",
                "meaning": "Thinking wins over force",
                "context": "When someone relies on might alone"
            }
        },
        {
            "category_name": "Patience",
            "proverb": {
                "yoruba": "Sùúrù ni baba ìwà",
                "literal": "Patience is the father of character",
                "meaning": "Patience underlies every virtue",
                "context": "Counselling the hasty"
            }
        }
    ])
}

pub(crate) fn search_results() -> Vec<SearchResult> {
    serde_json::from_value(search_json()).expect("search fixtures")
}

pub(crate) fn folktales_json() -> Value {
    json!([
        {
            "id": "tortoise-and-birds",
            "title": "The Tortoise and the Birds",
            "title_yoruba": "Ìjàpá àti àwọn Ẹyẹ",
            "summary": "Ìjàpá tricks the birds at a feast in the sky.",
            "full_story": "Long ago the birds were invited to a feast in the sky...",
            "moral": "Greed leads to a fall.",
            "characters": ["Ìjàpá", "The Birds", "Sky King", "Yánníbo"]
        },
        {
            "id": "tortoise-and-drum",
            "title": "The Tortoise and the Magic Drum",
            "title_yoruba": "Ìjàpá àti Ìlù Idán",
            "summary": "A drum that feeds the village falls into the wrong hands.",
            "full_story": "In a time of famine Ìjàpá found a drum...",
            "moral": "What is shared multiplies.",
            "characters": ["Ìjàpá", "The King"]
        }
    ])
}

pub(crate) fn folktales() -> Vec<Folktale> {
    serde_json::from_value(folktales_json()).expect("folktale fixtures")
}

#[derive(Default)]
struct StubState {
    translate_calls: AtomicUsize,
    last_search: Mutex<Option<String>>,
}

pub(crate) struct StubBackend {
    addr: SocketAddr,
    state: Arc<StubState>,
}

impl StubBackend {
    pub(crate) async fn spawn() -> Self {
        let state = Arc::new(StubState::default());
        let router = Router::new()
            .route("/api/", get(welcome))
            .route("/api/orisha", get(|| async { Json(deities_json()) }))
            .route("/api/orisha/:id", get(deity))
            .route("/api/translate", post(translate))
            .route("/api/proverbs/daily", get(daily))
            .route("/api/proverbs/categories", get(|| async { Json(categories_json()) }))
            .route("/api/proverbs/category/:id", get(category_route))
            .route("/api/proverbs/search", get(search))
            .route("/api/folktales", get(|| async { Json(folktales_json()) }))
            .route("/api/cultural-content", post(cultural_content))
            .with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Self { addr, state }
    }

    pub(crate) fn backend_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub(crate) fn client(&self) -> ApiClient {
        ApiClient::new(ClientConfig::with_backend(self.backend_url())).expect("stub client")
    }

    pub(crate) fn translate_calls(&self) -> usize {
        self.state.translate_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_search(&self) -> Option<String> {
        self.state.last_search.lock().clone()
    }
}

async fn welcome() -> Json<Value> {
    Json(json!({"message": "Kábíyèsí! Welcome to The Living Ìtàn"}))
}

async fn deity(Path(id): Path<String>) -> Response {
    let found = deities_json()
        .as_array()
        .and_then(|all| all.iter().find(|entry| entry["id"] == id.as_str()).cloned());
    match found {
        Some(entry) => Json(entry).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Òrìṣà not found"}))).into_response(),
    }
}

async fn translate(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Json<Value> {
    state.translate_calls.fetch_add(1, Ordering::SeqCst);
    let text = body["text"].as_str().unwrap_or_default();
    let target = body["target_language"].as_str().unwrap_or_default();
    Json(json!({
        "original_text": text,
        "translated_text": format!("[{target}] {text}"),
        "language": target
    }))
}

async fn daily() -> Json<Value> {
    Json(json!({
        "proverb": {
            "yoruba": "A kì í jí",
            "literal_translation": "One does not wake",
            "meaning": "Every day begins with humility",
            "usage_context": "Morning greetings"
        },
        "date": "2026-10-17"
    }))
}

async fn category_route(Path(id): Path<String>) -> Response {
    match category_json(&id) {
        Some(detail) => Json(detail).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Category not found"}))).into_response(),
    }
}

async fn search(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    *state.last_search.lock() = params.get("q").cloned();
    Json(search_json())
}

async fn cultural_content() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"detail": "Content generation error: quota"})),
    )
        .into_response()
}
