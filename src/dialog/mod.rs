mod terminal;

pub use terminal::{AnswerInput, TerminalDialog};

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Candidate, Field};

/// What the user is asked to pick from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRequest {
    pub field: Field,
    pub options: Vec<Candidate>,
    pub preselected: usize,
}

impl ChoiceRequest {
    /// A request with the first option preselected.
    pub fn new(field: Field, options: Vec<Candidate>) -> Self {
        Self {
            field,
            options,
            preselected: 0,
        }
    }
}

/// How a dialog ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Confirmed(Candidate),
    Cancelled,
}

/// User gestures a dialog reacts to. `Cancel` (button) and `Dismiss`
/// (escape, closed input) end the dialog the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    Select(usize),
    Confirm,
    Cancel,
    Dismiss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    Open { selected: usize },
    Confirmed(Candidate),
    Cancelled,
}

/// One open dialog: `Open → Confirmed | Cancelled`.
#[derive(Debug)]
pub struct DialogSession {
    request: ChoiceRequest,
    state: DialogState,
}

impl DialogSession {
    pub fn open(request: ChoiceRequest) -> Self {
        let selected = request
            .preselected
            .min(request.options.len().saturating_sub(1));
        Self {
            request,
            state: DialogState::Open { selected },
        }
    }

    pub fn request(&self) -> &ChoiceRequest {
        &self.request
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    /// Feed one event. Returns the outcome once the dialog has closed;
    /// events arriving after that are ignored.
    pub fn apply(&mut self, event: DialogEvent) -> Option<Selection> {
        let DialogState::Open { selected } = self.state else {
            return None;
        };

        self.state = match event {
            DialogEvent::Select(index) if index < self.request.options.len() => {
                DialogState::Open { selected: index }
            }
            DialogEvent::Select(_) => return None,
            DialogEvent::Confirm => match self.request.options.get(selected) {
                Some(candidate) => DialogState::Confirmed(candidate.clone()),
                None => DialogState::Cancelled,
            },
            DialogEvent::Cancel | DialogEvent::Dismiss => DialogState::Cancelled,
        };

        match &self.state {
            DialogState::Open { .. } => None,
            DialogState::Confirmed(candidate) => Some(Selection::Confirmed(candidate.clone())),
            DialogState::Cancelled => Some(Selection::Cancelled),
        }
    }
}

/// A modal choice point. The caller is suspended until the user confirms
/// or cancels; there is no timeout.
#[async_trait]
pub trait ChoiceDialog: Send + Sync {
    async fn present_choice(&self, request: &ChoiceRequest) -> AppResult<Selection>;
}

/// Confirms the preselected option without asking anyone.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptDefaults;

#[async_trait]
impl ChoiceDialog for AcceptDefaults {
    async fn present_choice(&self, request: &ChoiceRequest) -> AppResult<Selection> {
        let mut session = DialogSession::open(request.clone());
        Ok(session
            .apply(DialogEvent::Confirm)
            .unwrap_or(Selection::Cancelled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ChoiceRequest {
        ChoiceRequest::new(
            Field::Url,
            vec![
                Candidate::new("https://a.com/1", "current URL"),
                Candidate::new("https://a.com/2", "canonical link"),
            ],
        )
    }

    #[test]
    fn confirm_returns_preselected() {
        let mut session = DialogSession::open(request());
        assert_eq!(session.state(), &DialogState::Open { selected: 0 });
        assert_eq!(
            session.apply(DialogEvent::Confirm),
            Some(Selection::Confirmed(Candidate::new(
                "https://a.com/1",
                "current URL"
            )))
        );
    }

    #[test]
    fn select_then_confirm_returns_selection() {
        let mut session = DialogSession::open(request());
        assert_eq!(session.apply(DialogEvent::Select(1)), None);
        let outcome = session.apply(DialogEvent::Confirm);
        assert!(matches!(outcome, Some(Selection::Confirmed(c)) if c.value == "https://a.com/2"));
    }

    #[test]
    fn out_of_range_select_is_ignored() {
        let mut session = DialogSession::open(request());
        assert_eq!(session.apply(DialogEvent::Select(9)), None);
        assert_eq!(session.state(), &DialogState::Open { selected: 0 });
    }

    #[test]
    fn cancel_and_dismiss_both_cancel() {
        for event in [DialogEvent::Cancel, DialogEvent::Dismiss] {
            let mut session = DialogSession::open(request());
            assert_eq!(session.apply(event), Some(Selection::Cancelled));
            assert_eq!(session.state(), &DialogState::Cancelled);
        }
    }

    #[test]
    fn events_after_close_are_ignored() {
        let mut session = DialogSession::open(request());
        session.apply(DialogEvent::Cancel);
        assert_eq!(session.apply(DialogEvent::Confirm), None);
        assert_eq!(session.state(), &DialogState::Cancelled);
    }

    #[test]
    fn accept_defaults_confirms_first_option() {
        let selection = tokio_test::block_on(AcceptDefaults.present_choice(&request())).unwrap();
        assert!(matches!(selection, Selection::Confirmed(c) if c.source_label == "current URL"));
    }
}
