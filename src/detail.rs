use crate::client::ApiResult;
use crate::fetch::{ApiCall, FetchRequest, Origin};
use crate::model::{DeityEntry, Language};
use crate::translation::{ContentField, TranslationCache};
use tracing::{debug, warn};

/// What the story area of the detail panel shows right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryView<'a> {
    Loading,
    Text(&'a str),
    Unavailable,
}

/// Full profile of the selected Òrìṣà with a lazily translated narrative.
#[derive(Debug)]
pub struct DetailPanel {
    origin: Origin,
    entry: DeityEntry,
    language: Language,
    translations: TranslationCache,
}

impl DetailPanel {
    pub fn open(origin: Origin, entry: DeityEntry) -> Self {
        Self {
            origin,
            entry,
            language: Language::default(),
            translations: TranslationCache::new(),
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn entry(&self) -> &DeityEntry {
        &self.entry
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn translations(&self) -> &TranslationCache {
        &self.translations
    }

    fn source_text(&self, field: ContentField) -> &str {
        match field {
            ContentField::Story => &self.entry.story,
        }
    }

    /// Switches the narrative language, requesting a translation the first
    /// time Yorùbá is shown.
    pub fn set_language(&mut self, language: Language) -> Option<FetchRequest> {
        self.language = language;
        if language != Language::Yoruba {
            return None;
        }
        let field = ContentField::Story;
        if !self.translations.needs_request(field) {
            debug!(entry = %self.entry.id, field = field.key(), "translation already cached or in flight");
            return None;
        }
        self.translations.mark_pending(field);
        Some(FetchRequest::new(
            self.origin,
            ApiCall::Translate {
                field,
                text: self.source_text(field).to_string(),
                target: Language::Yoruba,
            },
        ))
    }

    pub fn apply_translation(&mut self, field: ContentField, result: ApiResult<String>) {
        match result {
            Ok(text) => self.translations.resolve(field, text),
            Err(err) => {
                warn!(entry = %self.entry.id, field = field.key(), error = %err, "translation failed");
                self.translations.fail(field);
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.translations.any_pending()
    }

    pub fn story(&self) -> StoryView<'_> {
        match self.language {
            Language::English => StoryView::Text(&self.entry.story),
            Language::Yoruba => {
                let field = ContentField::Story;
                if self.translations.is_pending(field) {
                    return StoryView::Loading;
                }
                self.translations
                    .resolved(field)
                    .or(self.entry.yoruba_story.as_deref())
                    .map(StoryView::Text)
                    .unwrap_or(StoryView::Unavailable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiError;
    use crate::fetch::PanelKind;
    use crate::stub;

    fn panel(index: usize) -> DetailPanel {
        let origin = Origin {
            panel: PanelKind::Detail,
            instance: 1,
        };
        DetailPanel::open(origin, stub::deities().remove(index))
    }

    #[test]
    fn opens_in_english_without_requests() {
        let panel = panel(0);
        assert_eq!(panel.language(), Language::English);
        assert_eq!(
            panel.story(),
            StoryView::Text("The great creator deity who shaped humanity.")
        );
        assert!(!panel.is_pending());
    }

    #[test]
    fn first_switch_requests_one_translation() {
        let mut panel = panel(0);
        let request = panel.set_language(Language::Yoruba).expect("translate request");
        assert_eq!(
            request.call,
            ApiCall::Translate {
                field: ContentField::Story,
                text: "The great creator deity who shaped humanity.".to_string(),
                target: Language::Yoruba,
            }
        );
        assert_eq!(panel.story(), StoryView::Loading);
        assert!(panel.set_language(Language::Yoruba).is_none());
    }

    #[test]
    fn cached_translation_is_reused_across_toggles() {
        let mut panel = panel(0);
        let mut requests = 0;
        requests += panel.set_language(Language::Yoruba).into_iter().count();
        panel.apply_translation(ContentField::Story, Ok("Ìtàn Ọbàtálá".to_string()));
        for _ in 0..5 {
            requests += panel.set_language(Language::English).into_iter().count();
            requests += panel.set_language(Language::Yoruba).into_iter().count();
        }
        assert_eq!(requests, 1);
        assert_eq!(panel.story(), StoryView::Text("Ìtàn Ọbàtálá"));
    }

    #[test]
    fn failure_falls_back_to_native_story_and_allows_retry() {
        let mut panel = panel(1);
        panel.set_language(Language::Yoruba);
        panel.apply_translation(
            ContentField::Story,
            Err(ApiError::NotFound("/translate".to_string())),
        );
        assert_eq!(panel.story(), StoryView::Text("Òrìṣà àrá àti mọ̀nàmọ́ná."));
        assert!(!panel.is_pending());
        panel.set_language(Language::English);
        assert!(panel.set_language(Language::Yoruba).is_some());
    }

    #[test]
    fn failure_without_native_story_is_unavailable() {
        let mut panel = panel(2);
        panel.set_language(Language::Yoruba);
        panel.apply_translation(
            ContentField::Story,
            Err(ApiError::Config("offline".to_string())),
        );
        assert_eq!(panel.story(), StoryView::Unavailable);
    }
}
