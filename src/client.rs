//! HTTP client for the Living Ìtàn backend.
//!
//! The backend origin comes from `ITAN_BACKEND_URL` (default
//! `http://127.0.0.1:8001`); every route lives under `<origin>/api`.

use crate::encode_component;
use crate::fetch::{ApiCall, ApiReply, FetchRequest, FetchResponse};
use crate::model::{
    Category, CategoryDetail, CulturalContent, CulturalContentRequest, DailyProverb, DeityEntry,
    Folktale, Language, LoreKind, SearchResult, TranslationRequest, TranslationResponse, Welcome,
};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

pub const BACKEND_ENV: &str = "ITAN_BACKEND_URL";
pub const DEFAULT_BACKEND: &str = "http://127.0.0.1:8001";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin, without the `/api` suffix.
    pub backend_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: std::env::var(BACKEND_ENV).unwrap_or_else(|_| DEFAULT_BACKEND.to_string()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn with_backend(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn validate(&self) -> ApiResult<()> {
        let url = self.backend_url.trim();
        if url.is_empty() {
            return Err(ApiError::Config("backend url cannot be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "backend url must start with http:// or https://, got {url:?}"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ApiError::Config("timeout must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn api_root(&self) -> String {
        format!("{}/api", self.backend_url.trim().trim_end_matches('/'))
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    api_root: String,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ApiError::Config(err.to_string()))?;
        Ok(Self {
            api_root: config.api_root(),
            http,
        })
    }

    pub fn from_env() -> ApiResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.http.get(self.url(path)).send().await?;
        decode(path, response).await
    }

    pub async fn welcome(&self) -> ApiResult<Welcome> {
        self.get_json("/").await
    }

    pub async fn list_deities(&self) -> ApiResult<Vec<DeityEntry>> {
        self.get_json("/orisha").await
    }

    pub async fn deity(&self, id: &str) -> ApiResult<DeityEntry> {
        self.get_json(&format!("/orisha/{}", encode_component(id)))
            .await
    }

    pub async fn translate(&self, text: &str, target: Language) -> ApiResult<String> {
        let path = "/translate";
        let body = TranslationRequest {
            text,
            target_language: target,
        };
        let response = self.http.post(self.url(path)).json(&body).send().await?;
        let translation: TranslationResponse = decode(path, response).await?;
        Ok(translation.translated_text)
    }

    pub async fn daily_proverb(&self) -> ApiResult<DailyProverb> {
        self.get_json("/proverbs/daily").await
    }

    pub async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.get_json("/proverbs/categories").await
    }

    pub async fn category(&self, id: &str) -> ApiResult<CategoryDetail> {
        self.get_json(&format!("/proverbs/category/{}", encode_component(id)))
            .await
    }

    pub async fn search_proverbs(&self, query: &str) -> ApiResult<Vec<SearchResult>> {
        self.get_json(&format!("/proverbs/search?q={}", encode_component(query)))
            .await
    }

    pub async fn folktales(&self) -> ApiResult<Vec<Folktale>> {
        self.get_json("/folktales").await
    }

    pub async fn cultural_content(
        &self,
        orisha_name: &str,
        kind: LoreKind,
    ) -> ApiResult<CulturalContent> {
        let path = "/cultural-content";
        let body = CulturalContentRequest {
            orisha_name,
            content_type: kind,
        };
        let response = self.http.post(self.url(path)).json(&body).send().await?;
        decode(path, response).await
    }

    /// Runs one panel request and wraps the outcome for routing back.
    pub async fn execute(&self, request: FetchRequest) -> FetchResponse {
        let reply = match request.call {
            ApiCall::ListDeities => ApiReply::Deities(self.list_deities().await),
            ApiCall::Translate {
                field,
                text,
                target,
            } => ApiReply::Translation {
                field,
                result: self.translate(&text, target).await,
            },
            ApiCall::DailyProverb => ApiReply::DailyProverb(self.daily_proverb().await),
            ApiCall::ListCategories => ApiReply::Categories(self.categories().await),
            ApiCall::CategoryProverbs { category_id } => {
                ApiReply::CategoryProverbs(self.category(&category_id).await)
            }
            ApiCall::SearchProverbs { query } => {
                let result = self.search_proverbs(&query).await;
                ApiReply::SearchResults { query, result }
            }
            ApiCall::ListFolktales => ApiReply::Folktales(self.folktales().await),
        };
        FetchResponse::new(request.origin, reply)
    }
}

async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> ApiResult<T> {
    let status = response.status();
    let bytes = response.bytes().await?;
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(path.to_string()));
    }
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }
    Ok(serde_json::from_slice(&bytes)?)
}
