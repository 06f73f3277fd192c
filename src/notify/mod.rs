use std::io::{IsTerminal, Write};
use std::sync::Mutex;

use once_cell::sync::OnceCell;

/// Tone of a notice; cancellation is reported apart from failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Cancelled,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Transient user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

// ── Terminal ───────────────────────────────────────────────────────────────

/// Colour palette for notices. Built once, on the first notice.
#[derive(Debug)]
pub struct ToastStyle {
    success: &'static str,
    cancelled: &'static str,
    failure: &'static str,
    reset: &'static str,
}

impl ToastStyle {
    fn detect(no_color: bool) -> Self {
        if no_color || !std::io::stderr().is_terminal() {
            Self::plain()
        } else {
            Self {
                success: "\x1b[1;32m",
                cancelled: "\x1b[1;33m",
                failure: "\x1b[1;31m",
                reset: "\x1b[0m",
            }
        }
    }

    fn plain() -> Self {
        Self {
            success: "",
            cancelled: "",
            failure: "",
            reset: "",
        }
    }

    fn paint(&self, notice: &Notice) -> String {
        let (color, tag) = match notice.kind {
            NoticeKind::Success => (self.success, "✔"),
            NoticeKind::Cancelled => (self.cancelled, "✖"),
            NoticeKind::Failure => (self.failure, "✖"),
        };
        format!("{color}{tag} {}{}", notice.message, self.reset)
    }
}

/// Writes notices to stderr.
pub struct TerminalNotifier {
    no_color: bool,
    style: OnceCell<ToastStyle>,
}

impl TerminalNotifier {
    pub fn new(no_color: bool) -> Self {
        Self {
            no_color,
            style: OnceCell::new(),
        }
    }

    /// Lazily built palette; every later call returns the same instance.
    pub fn style(&self) -> &ToastStyle {
        self.style.get_or_init(|| {
            tracing::debug!("Initializing notice style");
            ToastStyle::detect(self.no_color)
        })
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        let line = self.style().paint(&notice);
        let mut err = std::io::stderr().lock();
        // A notice that cannot be shown is not worth failing the run over.
        let _ = writeln!(err, "{line}");
    }
}

// ── In-memory ──────────────────────────────────────────────────────────────

/// Keeps every notice, for callers that report outcomes themselves.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_is_created_on_first_notice_only() {
        let notifier = TerminalNotifier::new(true);
        assert!(notifier.style.get().is_none());

        notifier.notify(Notice::new(NoticeKind::Success, "first"));
        assert!(notifier.style.get().is_some());

        let first: *const ToastStyle = notifier.style();
        notifier.notify(Notice::new(NoticeKind::Failure, "second"));
        let second: *const ToastStyle = notifier.style();
        assert_eq!(first, second);
    }

    #[test]
    fn plain_style_has_no_escape_codes() {
        let line = ToastStyle::plain().paint(&Notice::new(NoticeKind::Cancelled, "Copy cancelled"));
        assert_eq!(line, "✖ Copy cancelled");
    }

    #[test]
    fn recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notice::new(NoticeKind::Success, "a"));
        notifier.notify(Notice::new(NoticeKind::Failure, "b"));
        let kinds: Vec<NoticeKind> = notifier.notices().iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NoticeKind::Success, NoticeKind::Failure]);
    }
}
