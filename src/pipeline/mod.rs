use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::clipboard::{deliver, ClipboardSink, DeliveryPath};
use crate::dialog::{ChoiceDialog, ChoiceRequest, Selection};
use crate::document::DocumentQuery;
use crate::error::{AppError, AppResult};
use crate::extract::extract_metadata;
use crate::models::{Candidate, Field, RichSnippet};
use crate::normalize::normalize;
use crate::notify::{Notice, NoticeKind, Notifier};
use crate::reconcile::{reconcile, Reconciled};
use crate::render::render;
use crate::title::compose;

pub const MSG_COPIED: &str = "Link copied to clipboard";
pub const MSG_COPIED_PLAIN: &str = "Link copied to clipboard as plain text";
pub const MSG_CANCELLED: &str = "Copy cancelled";
pub const MSG_FAILED: &str = "Failed to copy link";

/// Points an invocation passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ExtractDone,
    SingleCandidate(Field),
    AwaitingChoice(Field),
    Rendered,
    Delivered,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Delivered {
        snippet: RichSnippet,
        path: DeliveryPath,
    },
    Cancelled {
        field: Field,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub outcome: Outcome,
    pub stages: Vec<Stage>,
}

enum Settled {
    Chosen(Candidate),
    Missing,
    Cancelled,
}

/// The "copy page link" command.
///
/// Runs extract → normalize → reconcile URL → (ask) → compose and reconcile
/// title → (ask) → render → deliver, one step at a time. Dialogs are opened
/// strictly one after another and a cancelled dialog ends the run before
/// anything reaches the clipboard. Every run ends with exactly one notice.
pub struct Pipeline<'a> {
    dialog: &'a dyn ChoiceDialog,
    clipboard: &'a dyn ClipboardSink,
    notifier: &'a dyn Notifier,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        dialog: &'a dyn ChoiceDialog,
        clipboard: &'a dyn ClipboardSink,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            dialog,
            clipboard,
            notifier,
        }
    }

    /// Run one invocation against `doc`. Never panics and never returns an
    /// error: faults are turned into `Outcome::Failed` and reported. After a
    /// delivery the clipboard sink gets to `finish`, which may block until
    /// another application takes over the clipboard.
    pub async fn run<D: DocumentQuery + ?Sized>(&self, doc: &D) -> PipelineReport {
        let mut stages = vec![Stage::Start];

        let result = AssertUnwindSafe(self.run_stages(doc, &mut stages))
            .catch_unwind()
            .await;

        let outcome = match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Copying page link failed");
                Outcome::Failed {
                    reason: e.to_string(),
                }
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                tracing::error!(reason = %reason, "Copying page link panicked");
                Outcome::Failed { reason }
            }
        };

        self.notifier.notify(notice_for(&outcome));

        if matches!(outcome, Outcome::Delivered { .. }) {
            if let Err(e) = self.clipboard.finish().await {
                tracing::warn!(error = %e, "Clipboard contents may not outlive this process");
            }
        }

        PipelineReport { outcome, stages }
    }

    async fn run_stages<D: DocumentQuery + ?Sized>(
        &self,
        doc: &D,
        stages: &mut Vec<Stage>,
    ) -> AppResult<Outcome> {
        let mut record = extract_metadata(doc);
        advance(stages, Stage::ExtractDone);

        // ── URL ───────────────────────────────────────────────────────────
        let urls = record
            .url
            .iter()
            .map(|c| Candidate::new(normalize(&c.value), c.source_label.clone()))
            .collect();
        let url = match self.settle(Field::Url, reconcile(urls), stages).await? {
            Settled::Chosen(url) => url,
            Settled::Cancelled => return Ok(Outcome::Cancelled { field: Field::Url }),
            Settled::Missing => return Err(AppError::Internal("page has no URL".into())),
        };
        record.settle(Field::Url, url.clone());

        // ── Title ─────────────────────────────────────────────────────────
        let site_name = record.site_name.as_deref();
        let titles = record
            .title
            .iter()
            .map(|c| Candidate::new(compose(&c.value, site_name), c.source_label.clone()))
            .collect();
        match self.settle(Field::Title, reconcile(titles), stages).await? {
            Settled::Chosen(title) => record.settle(Field::Title, title),
            Settled::Cancelled => return Ok(Outcome::Cancelled { field: Field::Title }),
            Settled::Missing => record.title.clear(),
        }

        // ── Render + deliver ──────────────────────────────────────────────
        let snippet = render(&url.value, &record);
        advance(stages, Stage::Rendered);

        let path = deliver(self.clipboard, &snippet).await?;
        advance(stages, Stage::Delivered);
        tracing::info!(url = %url.value, path = ?path, "Copied page link");

        Ok(Outcome::Delivered { snippet, path })
    }

    async fn settle(
        &self,
        field: Field,
        reconciled: Reconciled,
        stages: &mut Vec<Stage>,
    ) -> AppResult<Settled> {
        match reconciled {
            Reconciled::Empty => {
                tracing::debug!(field = field.label(), "No candidates");
                Ok(Settled::Missing)
            }
            Reconciled::Single(candidate) => {
                advance(stages, Stage::SingleCandidate(field));
                Ok(Settled::Chosen(candidate))
            }
            Reconciled::Choose(options) => {
                advance(stages, Stage::AwaitingChoice(field));
                let request = ChoiceRequest::new(field, options);
                match self.dialog.present_choice(&request).await? {
                    Selection::Confirmed(candidate) => Ok(Settled::Chosen(candidate)),
                    Selection::Cancelled => {
                        advance(stages, Stage::Aborted);
                        Ok(Settled::Cancelled)
                    }
                }
            }
        }
    }
}

fn advance(stages: &mut Vec<Stage>, stage: Stage) {
    tracing::debug!(stage = ?stage, "Pipeline stage");
    stages.push(stage);
}

fn notice_for(outcome: &Outcome) -> Notice {
    match outcome {
        Outcome::Delivered {
            path: DeliveryPath::Rich,
            ..
        } => Notice::new(NoticeKind::Success, MSG_COPIED),
        Outcome::Delivered {
            path: DeliveryPath::PlainText,
            ..
        } => Notice::new(NoticeKind::Success, MSG_COPIED_PLAIN),
        Outcome::Cancelled { .. } => Notice::new(NoticeKind::Cancelled, MSG_CANCELLED),
        Outcome::Failed { .. } => Notice::new(NoticeKind::Failure, MSG_FAILED),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
