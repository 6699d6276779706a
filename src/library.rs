use crate::client::ApiResult;
use crate::fetch::{ApiCall, FetchRequest, Origin};
use crate::model::Folktale;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LibraryMode {
    #[default]
    Grid,
    Reader {
        tale_id: String,
    },
}

/// Àlọ́ Ìjàpá: the folktale grid and reader.
#[derive(Debug)]
pub struct StoryBrowser {
    origin: Origin,
    tales: Vec<Folktale>,
    loading: bool,
    mode: LibraryMode,
}

impl StoryBrowser {
    pub fn open(origin: Origin) -> (Self, FetchRequest) {
        let browser = Self {
            origin,
            tales: Vec::new(),
            loading: true,
            mode: LibraryMode::Grid,
        };
        (browser, FetchRequest::new(origin, ApiCall::ListFolktales))
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn tales(&self) -> &[Folktale] {
        &self.tales
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn mode(&self) -> &LibraryMode {
        &self.mode
    }

    /// The tale open in the reader, if any.
    pub fn selected(&self) -> Option<&Folktale> {
        match &self.mode {
            LibraryMode::Grid => None,
            LibraryMode::Reader { tale_id } => self.tales.iter().find(|tale| &tale.id == tale_id),
        }
    }

    pub fn select(&mut self, tale_id: &str) -> bool {
        if !self.tales.iter().any(|tale| tale.id == tale_id) {
            debug!(tale_id, "ignoring selection of unknown folktale");
            return false;
        }
        self.mode = LibraryMode::Reader {
            tale_id: tale_id.to_string(),
        };
        true
    }

    pub fn back(&mut self) {
        self.mode = LibraryMode::Grid;
    }

    pub fn apply(&mut self, result: ApiResult<Vec<Folktale>>) {
        self.loading = false;
        match result {
            Ok(tales) => self.tales = tales,
            Err(err) => warn!(error = %err, "failed to load folktales"),
        }
    }
}
