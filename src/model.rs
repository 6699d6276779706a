use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Tale cards only show this many character tags.
pub const CARD_CHARACTER_LIMIT: usize = 3;

const REGIONS_KEY: &str = "location";

/// Normalized constellation coordinates, both percentages in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(deserialize_with = "percentage")]
    pub x: f32,
    #[serde(deserialize_with = "percentage")]
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: clamp_percentage(x),
            y: clamp_percentage(y),
        }
    }
}

fn clamp_percentage(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

fn percentage<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    f32::deserialize(deserializer).map(clamp_percentage)
}

/// One Òrìṣà as served by `GET /orisha`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeityEntry {
    pub id: String,
    pub name: String,
    pub yoruba_name: String,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub symbols: Vec<String>,
    pub sacred_number: u32,
    pub story: String,
    #[serde(default)]
    pub yoruba_story: Option<String>,
    #[serde(default)]
    pub diaspora: Diaspora,
    #[serde(rename = "constellation_position")]
    pub position: Position,
}

/// Cross-reference into New World traditions.
///
/// On the wire this is a flat string map: `location` holds a comma-separated
/// region list and every other key names a tradition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diaspora {
    pub traditions: BTreeMap<String, String>,
    pub regions: Vec<String>,
}

impl Diaspora {
    pub fn regions_label(&self) -> String {
        self.regions.join(", ")
    }
}

impl<'de> Deserialize<'de> for Diaspora {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        let regions = raw
            .remove(REGIONS_KEY)
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|region| !region.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self {
            traditions: raw,
            regions,
        })
    }
}

impl Serialize for Diaspora {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.traditions.len() + 1))?;
        for (tradition, description) in &self.traditions {
            map.serialize_entry(tradition, description)?;
        }
        map.serialize_entry(REGIONS_KEY, &self.regions_label())?;
        map.end()
    }
}

/// Display name for a tradition key such as `santeria`.
pub fn tradition_label(key: &str) -> String {
    match key {
        "santeria" => "Santería".to_string(),
        "candomble" => "Candomblé".to_string(),
        "vodou" => "Vodou".to_string(),
        "umbanda" => "Umbanda".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Narrative languages offered by the detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Yoruba,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Yoruba => "yoruba",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Yoruba => "Yorùbá",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "yoruba" | "yorùbá" | "yo" => Ok(Language::Yoruba),
            other => Err(format!("unknown language {other:?}")),
        }
    }
}

/// A single òwe. Category listings and the daily endpoint spell the
/// translation and usage fields differently; both hydrate this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proverb {
    pub yoruba: String,
    #[serde(default, alias = "literal_translation", deserialize_with = "text_or_empty")]
    pub literal: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub meaning: String,
    #[serde(default, alias = "usage_context", deserialize_with = "text_or_empty")]
    pub context: String,
}

/// Generated proverbs sometimes carry `null` for a field they left out.
fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub name_yoruba: String,
    #[serde(default)]
    pub count: usize,
}

/// Response of `GET /proverbs/category/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    #[serde(default)]
    pub proverbs: Vec<Proverb>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub category_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub proverb: Proverb,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folktale {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub title_yoruba: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub full_story: String,
    #[serde(default)]
    pub moral: String,
    #[serde(default)]
    pub characters: Vec<String>,
}

impl Folktale {
    /// Character tags shown on a grid card.
    pub fn card_characters(&self) -> &[String] {
        let end = self.characters.len().min(CARD_CHARACTER_LIMIT);
        &self.characters[..end]
    }
}

/// The body of today's proverb, discriminated on its JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProverbText {
    Plain(String),
    Structured(Proverb),
}

impl TryFrom<Value> for ProverbText {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(ProverbText::Plain(text)),
            Value::Object(mut map) if !map.contains_key("yoruba") => match map.remove("content") {
                Some(Value::String(text)) => Ok(ProverbText::Plain(text)),
                _ => Err(de::Error::missing_field("yoruba")),
            },
            Value::Object(map) => serde_json::from_value(Value::Object(map)).map(ProverbText::Structured),
            other => Err(de::Error::custom(format!(
                "expected a proverb string or object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Response of `GET /proverbs/daily`.
///
/// Accepts either a wrapper `{"proverb": <string|object>, "date": ...}` or a
/// bare proverb record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyProverb {
    pub proverb: ProverbText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl DailyProverb {
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        let (body, date) = match value {
            Value::Object(mut map) => match map.remove("proverb") {
                Some(body) => {
                    let date = map
                        .remove("date")
                        .and_then(|date| date.as_str().map(str::to_string));
                    (body, date)
                }
                None => (Value::Object(map), None),
            },
            other => (other, None),
        };
        Ok(Self {
            proverb: ProverbText::try_from(body)?,
            date,
        })
    }
}

impl<'de> Deserialize<'de> for DailyProverb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        DailyProverb::from_json(value).map_err(de::Error::custom)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationRequest<'a> {
    pub text: &'a str,
    pub target_language: Language,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationResponse {
    pub translated_text: String,
}

/// Kinds of generated lore the backend can produce for an Òrìṣà.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum LoreKind {
    #[default]
    Story,
    Praise,
    Historical,
}

#[derive(Debug, Clone, Serialize)]
pub struct CulturalContentRequest<'a> {
    pub orisha_name: &'a str,
    pub content_type: LoreKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CulturalContent {
    pub orisha_name: String,
    pub content_type: String,
    pub content: String,
    #[serde(default)]
    pub generated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Welcome {
    pub message: String,
}
