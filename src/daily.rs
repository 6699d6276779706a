use crate::client::ApiResult;
use crate::fetch::{ApiCall, FetchRequest, Origin};
use crate::model::DailyProverb;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightState {
    Loading,
    Ready(DailyProverb),
    /// The fetch failed; the panel renders nothing.
    Hidden,
}

/// "Òwe Oni": today's proverb, fetched once on mount.
#[derive(Debug)]
pub struct DailyHighlight {
    origin: Origin,
    state: HighlightState,
}

impl DailyHighlight {
    pub fn mount(origin: Origin) -> (Self, FetchRequest) {
        let panel = Self {
            origin,
            state: HighlightState::Loading,
        };
        (panel, FetchRequest::new(origin, ApiCall::DailyProverb))
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn state(&self) -> &HighlightState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, HighlightState::Loading)
    }

    pub fn apply(&mut self, result: ApiResult<DailyProverb>) {
        self.state = match result {
            Ok(proverb) => HighlightState::Ready(proverb),
            Err(err) => {
                warn!(error = %err, "daily proverb unavailable");
                HighlightState::Hidden
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiError;
    use crate::fetch::PanelKind;
    use crate::model::ProverbText;

    fn origin() -> Origin {
        Origin {
            panel: PanelKind::DailyHighlight,
            instance: 3,
        }
    }

    #[test]
    fn mount_issues_a_single_fetch() {
        let (panel, request) = DailyHighlight::mount(origin());
        assert!(panel.is_loading());
        assert_eq!(request, FetchRequest::new(origin(), ApiCall::DailyProverb));
    }

    #[test]
    fn success_and_failure_states() {
        let (mut panel, _) = DailyHighlight::mount(origin());
        let proverb = DailyProverb {
            proverb: ProverbText::Plain("A kì í jí".to_string()),
            date: None,
        };
        panel.apply(Ok(proverb.clone()));
        assert_eq!(panel.state(), &HighlightState::Ready(proverb));

        let (mut failed, _) = DailyHighlight::mount(origin());
        failed.apply(Err(ApiError::NotFound("/proverbs/daily".to_string())));
        assert_eq!(failed.state(), &HighlightState::Hidden);
        assert!(!failed.is_loading());
    }
}
