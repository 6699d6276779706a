use std::collections::HashMap;

/// Narrative fields of a deity entry that can be machine translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentField {
    Story,
}

impl ContentField {
    pub fn key(&self) -> &'static str {
        match self {
            ContentField::Story => "story",
        }
    }
}

/// Lifecycle of one field's translation within a detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TranslationState {
    #[default]
    NotRequested,
    Pending,
    Resolved(String),
    Failed,
}

static NOT_REQUESTED: TranslationState = TranslationState::NotRequested;

/// Per-panel translation results keyed by content field.
///
/// A failed field may be requested again; a pending or resolved one never is.
#[derive(Debug, Default)]
pub struct TranslationCache {
    fields: HashMap<ContentField, TranslationState>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, field: ContentField) -> &TranslationState {
        self.fields.get(&field).unwrap_or(&NOT_REQUESTED)
    }

    pub fn needs_request(&self, field: ContentField) -> bool {
        matches!(
            self.state(field),
            TranslationState::NotRequested | TranslationState::Failed
        )
    }

    pub fn is_pending(&self, field: ContentField) -> bool {
        matches!(self.state(field), TranslationState::Pending)
    }

    pub fn resolved(&self, field: ContentField) -> Option<&str> {
        match self.state(field) {
            TranslationState::Resolved(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn mark_pending(&mut self, field: ContentField) {
        self.fields.insert(field, TranslationState::Pending);
    }

    pub fn resolve(&mut self, field: ContentField, text: String) {
        self.fields.insert(field, TranslationState::Resolved(text));
    }

    pub fn fail(&mut self, field: ContentField) {
        self.fields.insert(field, TranslationState::Failed);
    }

    pub fn any_pending(&self) -> bool {
        self.fields
            .values()
            .any(|state| matches!(state, TranslationState::Pending))
    }
}
