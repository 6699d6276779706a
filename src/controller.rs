//! Root controller: owns the pantheon list, the single selection and every
//! open panel, and routes fetch replies to the panel instance that asked.

use crate::daily::DailyHighlight;
use crate::detail::DetailPanel;
use crate::fetch::{ApiCall, ApiReply, FetchRequest, FetchResponse, Origin, PanelKind};
use crate::library::StoryBrowser;
use crate::model::{DeityEntry, Language, Position};
use crate::shelf::ProverbShelf;
use tracing::{debug, warn};

/// User interactions the controller understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Mount,
    SelectEntry(String),
    CloseDetail,
    SetLanguage(Language),
    OpenShelf,
    CloseShelf,
    SelectCategory(String),
    EditQuery(String),
    SubmitSearch,
    ShelfBack,
    OpenLibrary,
    CloseLibrary,
    SelectTale(String),
    LibraryBack,
}

/// A constellation star: one entry plus whether it is the current selection.
#[derive(Debug, Clone, Copy)]
pub struct EntryMarker<'a> {
    pub entry: &'a DeityEntry,
    pub selected: bool,
}

impl<'a> EntryMarker<'a> {
    pub fn new(entry: &'a DeityEntry, selected_id: Option<&str>) -> Self {
        Self {
            entry,
            selected: selected_id == Some(entry.id.as_str()),
        }
    }

    pub fn position(&self) -> Position {
        self.entry.position
    }

    pub fn on_click(&self) -> Event {
        Event::SelectEntry(self.entry.id.clone())
    }
}

#[derive(Debug, Default)]
pub struct RootController {
    next_instance: u64,
    mounted: bool,
    constellation: Option<Origin>,
    entries: Vec<DeityEntry>,
    entries_loading: bool,
    detail: Option<DetailPanel>,
    daily: Option<DailyHighlight>,
    shelf: Option<ProverbShelf>,
    library: Option<StoryBrowser>,
}

impl RootController {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, panel: PanelKind) -> Origin {
        self.next_instance += 1;
        Origin {
            panel,
            instance: self.next_instance,
        }
    }

    pub fn entries(&self) -> &[DeityEntry] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.entries_loading
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.detail.as_ref().map(|panel| panel.entry().id.as_str())
    }

    pub fn detail(&self) -> Option<&DetailPanel> {
        self.detail.as_ref()
    }

    pub fn daily(&self) -> Option<&DailyHighlight> {
        self.daily.as_ref()
    }

    pub fn shelf(&self) -> Option<&ProverbShelf> {
        self.shelf.as_ref()
    }

    pub fn library(&self) -> Option<&StoryBrowser> {
        self.library.as_ref()
    }

    pub fn markers(&self) -> impl Iterator<Item = EntryMarker<'_>> + '_ {
        let selected = self.selected_id();
        self.entries
            .iter()
            .map(move |entry| EntryMarker::new(entry, selected))
    }

    /// True while any panel still waits on a fetch.
    pub fn has_pending(&self) -> bool {
        self.entries_loading
            || self.detail.as_ref().is_some_and(DetailPanel::is_pending)
            || self.daily.as_ref().is_some_and(DailyHighlight::is_loading)
            || self.shelf.as_ref().is_some_and(ProverbShelf::is_pending)
            || self.library.as_ref().is_some_and(StoryBrowser::is_loading)
    }

    pub fn handle(&mut self, event: Event) -> Vec<FetchRequest> {
        match event {
            Event::Mount => self.mount(),
            Event::SelectEntry(id) => {
                self.select(&id);
                Vec::new()
            }
            Event::CloseDetail => {
                self.detail = None;
                Vec::new()
            }
            Event::SetLanguage(language) => match self.detail.as_mut() {
                Some(panel) => panel.set_language(language).into_iter().collect(),
                None => ignored("language change without a selection"),
            },
            Event::OpenShelf => {
                if self.shelf.is_some() {
                    return Vec::new();
                }
                let origin = self.allocate(PanelKind::ProverbShelf);
                let (shelf, request) = ProverbShelf::open(origin);
                self.shelf = Some(shelf);
                vec![request]
            }
            Event::CloseShelf => {
                self.shelf = None;
                Vec::new()
            }
            Event::SelectCategory(id) => match self.shelf.as_mut() {
                Some(shelf) => vec![shelf.select_category(id)],
                None => ignored("category selection with the shelf closed"),
            },
            Event::EditQuery(text) => {
                if let Some(shelf) = self.shelf.as_mut() {
                    shelf.edit_query(text);
                }
                Vec::new()
            }
            Event::SubmitSearch => match self.shelf.as_mut() {
                Some(shelf) => shelf.submit_search().into_iter().collect(),
                None => ignored("search with the shelf closed"),
            },
            Event::ShelfBack => {
                if let Some(shelf) = self.shelf.as_mut() {
                    shelf.back();
                }
                Vec::new()
            }
            Event::OpenLibrary => {
                if self.library.is_some() {
                    return Vec::new();
                }
                let origin = self.allocate(PanelKind::StoryBrowser);
                let (library, request) = StoryBrowser::open(origin);
                self.library = Some(library);
                vec![request]
            }
            Event::CloseLibrary => {
                self.library = None;
                Vec::new()
            }
            Event::SelectTale(id) => {
                if let Some(library) = self.library.as_mut() {
                    library.select(&id);
                }
                Vec::new()
            }
            Event::LibraryBack => {
                if let Some(library) = self.library.as_mut() {
                    library.back();
                }
                Vec::new()
            }
        }
    }

    fn mount(&mut self) -> Vec<FetchRequest> {
        if self.mounted {
            return ignored("controller already mounted");
        }
        self.mounted = true;
        let constellation = self.allocate(PanelKind::Constellation);
        self.constellation = Some(constellation);
        self.entries_loading = true;
        let daily_origin = self.allocate(PanelKind::DailyHighlight);
        let (daily, daily_request) = DailyHighlight::mount(daily_origin);
        self.daily = Some(daily);
        vec![
            FetchRequest::new(constellation, ApiCall::ListDeities),
            daily_request,
        ]
    }

    fn select(&mut self, id: &str) {
        if self.selected_id() == Some(id) {
            return;
        }
        let Some(entry) = self.entries.iter().find(|entry| entry.id == id).cloned() else {
            debug!(id, "ignoring selection of unknown entry");
            return;
        };
        let origin = self.allocate(PanelKind::Detail);
        self.detail = Some(DetailPanel::open(origin, entry));
    }

    /// Routes a completed fetch to its panel. Replies for closed or replaced
    /// panel instances are dropped.
    pub fn apply(&mut self, response: FetchResponse) {
        let origin = response.origin;
        match response.reply {
            ApiReply::Deities(result) => {
                if self.constellation != Some(origin) {
                    return stale(origin);
                }
                self.entries_loading = false;
                match result {
                    Ok(entries) => self.entries = entries,
                    Err(err) => warn!(error = %err, "failed to load Òrìṣà"),
                }
            }
            ApiReply::Translation { field, result } => {
                match self.detail.as_mut().filter(|panel| panel.origin() == origin) {
                    Some(panel) => panel.apply_translation(field, result),
                    None => stale(origin),
                }
            }
            ApiReply::DailyProverb(result) => {
                match self.daily.as_mut().filter(|panel| panel.origin() == origin) {
                    Some(panel) => panel.apply(result),
                    None => stale(origin),
                }
            }
            ApiReply::Categories(result) => match self.live_shelf(origin) {
                Some(shelf) => shelf.apply_categories(result),
                None => stale(origin),
            },
            ApiReply::CategoryProverbs(result) => match self.live_shelf(origin) {
                Some(shelf) => shelf.apply_category(result),
                None => stale(origin),
            },
            ApiReply::SearchResults { query, result } => match self.live_shelf(origin) {
                Some(shelf) => shelf.apply_search(query, result),
                None => stale(origin),
            },
            ApiReply::Folktales(result) => {
                match self.library.as_mut().filter(|panel| panel.origin() == origin) {
                    Some(library) => library.apply(result),
                    None => stale(origin),
                }
            }
        }
    }

    fn live_shelf(&mut self, origin: Origin) -> Option<&mut ProverbShelf> {
        self.shelf.as_mut().filter(|shelf| shelf.origin() == origin)
    }
}

fn ignored(reason: &str) -> Vec<FetchRequest> {
    debug!(reason, "event ignored");
    Vec::new()
}

fn stale(origin: Origin) {
    debug!(panel = ?origin.panel, instance = origin.instance, "dropping reply for a closed panel");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiError;
    use crate::daily::HighlightState;
    use crate::detail::StoryView;
    use crate::library::LibraryMode;
    use crate::model::{DailyProverb, ProverbText};
    use crate::shelf::ShelfMode;
    use crate::stub;
    use crate::translation::ContentField;

    /// Mounts a controller and answers its initial fetches from fixtures.
    fn mounted() -> RootController {
        let mut controller = RootController::new();
        let requests = controller.handle(Event::Mount);
        assert_eq!(requests.len(), 2);
        assert!(controller.is_loading());
        for request in requests {
            let reply = match request.call {
                ApiCall::ListDeities => ApiReply::Deities(Ok(stub::deities())),
                ApiCall::DailyProverb => ApiReply::DailyProverb(Ok(DailyProverb {
                    proverb: ProverbText::Plain("A kì í jí".to_string()),
                    date: None,
                })),
                other => panic!("unexpected mount call {other:?}"),
            };
            controller.apply(FetchResponse::new(request.origin, reply));
        }
        controller
    }

    fn reply_all(
        controller: &mut RootController,
        requests: Vec<FetchRequest>,
        answer: impl Fn(&ApiCall) -> ApiReply,
    ) {
        for request in requests {
            let reply = answer(&request.call);
            controller.apply(FetchResponse::new(request.origin, reply));
        }
    }

    #[test]
    fn mount_loads_entries_and_daily_proverb() {
        let controller = mounted();
        assert!(!controller.is_loading());
        assert_eq!(controller.entries().len(), 3);
        assert!(matches!(
            controller.daily().map(DailyHighlight::state),
            Some(HighlightState::Ready(_))
        ));
        assert!(!controller.has_pending());
    }

    #[test]
    fn mounting_twice_is_a_no_op() {
        let mut controller = mounted();
        assert!(controller.handle(Event::Mount).is_empty());
    }

    #[test]
    fn failed_entry_load_leaves_an_empty_constellation() {
        let mut controller = RootController::new();
        let requests = controller.handle(Event::Mount);
        reply_all(&mut controller, requests, |call| match call {
            ApiCall::ListDeities => {
                ApiReply::Deities(Err(ApiError::Config("offline".to_string())))
            }
            _ => ApiReply::DailyProverb(Err(ApiError::Config("offline".to_string()))),
        });
        assert!(!controller.is_loading());
        assert!(controller.entries().is_empty());
        assert_eq!(
            controller.daily().map(DailyHighlight::state),
            Some(&HighlightState::Hidden)
        );
    }

    #[test]
    fn markers_mirror_positions_and_single_selection() {
        let mut controller = mounted();
        for marker in controller.markers() {
            assert_eq!(marker.position(), marker.entry.position);
            assert!(!marker.selected);
        }

        let click = controller
            .markers()
            .find(|marker| marker.entry.id == "shango")
            .map(|marker| marker.on_click())
            .expect("shango marker");
        assert!(controller.handle(click).is_empty());
        let selected: Vec<_> = controller
            .markers()
            .filter(|marker| marker.selected)
            .map(|marker| marker.entry.id.clone())
            .collect();
        assert_eq!(selected, vec!["shango".to_string()]);

        controller.handle(Event::SelectEntry("oya".to_string()));
        assert_eq!(controller.markers().filter(|marker| marker.selected).count(), 1);
        assert_eq!(controller.selected_id(), Some("oya"));

        controller.handle(Event::CloseDetail);
        assert_eq!(controller.markers().filter(|marker| marker.selected).count(), 0);
        assert!(controller.detail().is_none());
    }

    #[test]
    fn unknown_selection_is_ignored() {
        let mut controller = mounted();
        controller.handle(Event::SelectEntry("olokun".to_string()));
        assert!(controller.detail().is_none());
    }

    #[test]
    fn translation_requested_once_per_panel_instance() {
        let mut controller = mounted();
        controller.handle(Event::SelectEntry("obatala".to_string()));

        let mut translate_requests = 0;
        let requests = controller.handle(Event::SetLanguage(Language::Yoruba));
        translate_requests += requests.len();
        assert!(controller.has_pending());
        assert_eq!(
            controller.detail().map(DetailPanel::story),
            Some(StoryView::Loading)
        );
        reply_all(&mut controller, requests, |_| ApiReply::Translation {
            field: ContentField::Story,
            result: Ok("Ìtàn".to_string()),
        });
        for _ in 0..3 {
            translate_requests += controller.handle(Event::SetLanguage(Language::English)).len();
            translate_requests += controller.handle(Event::SetLanguage(Language::Yoruba)).len();
        }
        assert_eq!(translate_requests, 1);

        controller.handle(Event::CloseDetail);
        controller.handle(Event::SelectEntry("obatala".to_string()));
        assert_eq!(controller.handle(Event::SetLanguage(Language::Yoruba)).len(), 1);
    }

    #[test]
    fn stale_translation_for_a_replaced_panel_is_dropped() {
        let mut controller = mounted();
        controller.handle(Event::SelectEntry("obatala".to_string()));
        let requests = controller.handle(Event::SetLanguage(Language::Yoruba));
        controller.handle(Event::SelectEntry("shango".to_string()));
        reply_all(&mut controller, requests, |_| ApiReply::Translation {
            field: ContentField::Story,
            result: Ok("stale".to_string()),
        });
        let panel = controller.detail().expect("shango panel");
        assert_eq!(panel.entry().id, "shango");
        assert_eq!(panel.translations().resolved(ContentField::Story), None);
    }

    #[test]
    fn shelf_search_flow() {
        let mut controller = mounted();
        let requests = controller.handle(Event::OpenShelf);
        reply_all(&mut controller, requests, |_| {
            ApiReply::Categories(Ok(stub::categories()))
        });
        assert!(controller.handle(Event::OpenShelf).is_empty());

        let requests = controller.handle(Event::SelectCategory("wisdom".to_string()));
        reply_all(&mut controller, requests, |_| {
            ApiReply::CategoryProverbs(Ok(stub::category("wisdom")))
        });

        controller.handle(Event::EditQuery("wisdom".to_string()));
        let requests = controller.handle(Event::SubmitSearch);
        assert_eq!(requests.len(), 1);
        reply_all(&mut controller, requests, |_| ApiReply::SearchResults {
            query: "wisdom".to_string(),
            result: Ok(stub::search_results()),
        });
        match controller.shelf().map(ProverbShelf::mode) {
            Some(ShelfMode::Search { results, .. }) => assert_eq!(results.len(), 2),
            other => panic!("expected search mode, got {other:?}"),
        }

        controller.handle(Event::ShelfBack);
        assert_eq!(
            controller.shelf().map(ProverbShelf::mode),
            Some(&ShelfMode::Categories)
        );
    }

    #[test]
    fn overlapping_shelf_fetches_keep_the_page_pending() {
        let mut controller = mounted();
        let requests = controller.handle(Event::OpenShelf);
        reply_all(&mut controller, requests, |_| {
            ApiReply::Categories(Ok(stub::categories()))
        });
        let category = controller.handle(Event::SelectCategory("wisdom".to_string()));
        controller.handle(Event::EditQuery("patience".to_string()));
        let search = controller.handle(Event::SubmitSearch);

        reply_all(&mut controller, category, |_| {
            ApiReply::CategoryProverbs(Ok(stub::category("wisdom")))
        });
        assert!(controller.has_pending());

        reply_all(&mut controller, search, |_| ApiReply::SearchResults {
            query: "patience".to_string(),
            result: Ok(stub::search_results()),
        });
        assert!(!controller.has_pending());
    }

    #[test]
    fn replies_after_closing_an_overlay_are_dropped() {
        let mut controller = mounted();
        let requests = controller.handle(Event::OpenLibrary);
        controller.handle(Event::CloseLibrary);
        let reopened = controller.handle(Event::OpenLibrary);
        reply_all(&mut controller, requests, |_| ApiReply::Folktales(Ok(stub::folktales())));
        let library = controller.library().expect("library open");
        assert!(library.is_loading());
        assert!(library.tales().is_empty());

        reply_all(&mut controller, reopened, |_| ApiReply::Folktales(Ok(stub::folktales())));
        assert_eq!(controller.library().map(|l| l.tales().len()), Some(2));
    }

    #[test]
    fn both_overlays_may_be_open() {
        let mut controller = mounted();
        let mut requests = controller.handle(Event::OpenShelf);
        requests.extend(controller.handle(Event::OpenLibrary));
        assert_eq!(requests.len(), 2);
        assert!(controller.shelf().is_some());
        assert!(controller.library().is_some());
        assert!(controller.has_pending());
    }

    #[test]
    fn library_reader_round_trip() {
        let mut controller = mounted();
        let requests = controller.handle(Event::OpenLibrary);
        reply_all(&mut controller, requests, |_| ApiReply::Folktales(Ok(stub::folktales())));
        controller.handle(Event::SelectTale("tortoise-and-drum".to_string()));
        assert_eq!(
            controller.library().and_then(StoryBrowser::selected).map(|t| t.id.as_str()),
            Some("tortoise-and-drum")
        );
        controller.handle(Event::LibraryBack);
        let library = controller.library().expect("library open");
        assert_eq!(library.mode(), &LibraryMode::Grid);
        assert_eq!(library.tales(), stub::folktales().as_slice());
    }
}
