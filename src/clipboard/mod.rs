use std::io::Write;
use std::sync::Mutex;

use arboard::Clipboard;
use async_trait::async_trait;
use serde::Serialize;

use crate::error::ClipboardError;
use crate::models::RichSnippet;

/// Which representation ended up on the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPath {
    Rich,
    PlainText,
}

/// Destination for the finished snippet.
#[async_trait]
pub trait ClipboardSink: Send + Sync {
    /// Store the HTML form with the plain text as its alternative.
    async fn write_rich(&self, snippet: &RichSnippet) -> Result<(), ClipboardError>;

    /// Store plain text only.
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;

    /// Called once after a successful delivery. Sinks whose contents would
    /// vanish with the process keep serving them here before returning.
    async fn finish(&self) -> Result<(), ClipboardError> {
        Ok(())
    }
}

/// Try the rich write first and fall back to plain text once.
pub async fn deliver(
    sink: &dyn ClipboardSink,
    snippet: &RichSnippet,
) -> Result<DeliveryPath, ClipboardError> {
    match sink.write_rich(snippet).await {
        Ok(()) => Ok(DeliveryPath::Rich),
        Err(e) => {
            tracing::warn!(error = %e, "Rich clipboard write failed, falling back to plain text");
            sink.write_text(&snippet.text).await?;
            Ok(DeliveryPath::PlainText)
        }
    }
}

// ── System clipboard ───────────────────────────────────────────────────────

// On X11 and Wayland the selection is served by the owning process, so
// it is gone once we exit unless we keep serving it.
#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
const SELECTION_DIES_WITH_OWNER: bool = true;
#[cfg(not(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
)))]
const SELECTION_DIES_WITH_OWNER: bool = false;

/// The desktop clipboard, opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Mutex<Option<Clipboard>>,
    last: Mutex<Option<ClipboardWrite>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_clipboard<T>(
        &self,
        op: impl FnOnce(&mut Clipboard) -> Result<T, arboard::Error>,
        on_error: fn(String) -> ClipboardError,
    ) -> Result<T, ClipboardError> {
        let mut guard = self
            .clipboard
            .lock()
            .map_err(|_| ClipboardError::Unavailable("clipboard lock poisoned".into()))?;

        if guard.is_none() {
            let opened = Clipboard::new().map_err(|e| {
                tracing::warn!("Failed to initialize clipboard: {}", e);
                ClipboardError::Unavailable(e.to_string())
            })?;
            *guard = Some(opened);
        }

        match guard.as_mut() {
            Some(clipboard) => op(clipboard).map_err(|e| on_error(e.to_string())),
            None => Err(ClipboardError::Unavailable("clipboard not initialized".into())),
        }
    }

    fn remember(&self, write: ClipboardWrite) {
        if let Ok(mut last) = self.last.lock() {
            *last = Some(write);
        }
    }

    /// Take whatever `finish` would have to keep serving, leaving nothing.
    fn take_pending(&self) -> Option<(Clipboard, ClipboardWrite)> {
        let content = self.last.lock().ok()?.take()?;
        let clipboard = self.clipboard.lock().ok()?.take()?;
        Some((clipboard, content))
    }
}

/// Re-set `content` and block until another application owns the selection.
#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
fn hold_selection(clipboard: &mut Clipboard, content: &ClipboardWrite) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;

    match content {
        ClipboardWrite::Rich(snippet) => clipboard
            .set()
            .wait()
            .html(snippet.html.as_str(), Some(snippet.text.as_str())),
        ClipboardWrite::Text(text) => clipboard.set().wait().text(text.as_str()),
    }
}

#[cfg(not(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
)))]
fn hold_selection(_clipboard: &mut Clipboard, _content: &ClipboardWrite) -> Result<(), arboard::Error> {
    Ok(())
}

#[async_trait]
impl ClipboardSink for SystemClipboard {
    async fn write_rich(&self, snippet: &RichSnippet) -> Result<(), ClipboardError> {
        self.with_clipboard(
            |cb| cb.set_html(snippet.html.as_str(), Some(snippet.text.as_str())),
            ClipboardError::RichUnsupported,
        )?;
        self.remember(ClipboardWrite::Rich(snippet.clone()));
        Ok(())
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.with_clipboard(|cb| cb.set_text(text), ClipboardError::WriteFailed)?;
        self.remember(ClipboardWrite::Text(text.to_string()));
        Ok(())
    }

    async fn finish(&self) -> Result<(), ClipboardError> {
        if !SELECTION_DIES_WITH_OWNER {
            return Ok(());
        }
        let Some((mut clipboard, content)) = self.take_pending() else {
            return Ok(());
        };

        tracing::info!("📋 Keeping the link on the clipboard until another application replaces it");
        tokio::task::spawn_blocking(move || hold_selection(&mut clipboard, &content))
            .await
            .map_err(|e| ClipboardError::WriteFailed(format!("clipboard holder failed: {e}")))?
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
    }
}

// ── Stdout ─────────────────────────────────────────────────────────────────

/// Prints the snippet instead of storing it, for pipes and headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl StdoutSink {
    fn emit(content: &str) -> Result<(), ClipboardError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{content}")
            .and_then(|_| out.flush())
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
    }
}

#[async_trait]
impl ClipboardSink for StdoutSink {
    async fn write_rich(&self, snippet: &RichSnippet) -> Result<(), ClipboardError> {
        Self::emit(&snippet.html)
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        Self::emit(text)
    }
}

// ── In-memory ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardWrite {
    Rich(RichSnippet),
    Text(String),
}

/// Records successful writes; can be told to reject rich or all writes.
#[derive(Default)]
pub struct MemoryClipboard {
    writes: Mutex<Vec<ClipboardWrite>>,
    finished: Mutex<usize>,
    reject_rich: bool,
    reject_all: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_rich() -> Self {
        Self {
            reject_rich: true,
            ..Self::default()
        }
    }

    pub fn rejecting_all() -> Self {
        Self {
            reject_rich: true,
            reject_all: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<ClipboardWrite> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    /// How many times `finish` was called.
    pub fn finished(&self) -> usize {
        self.finished.lock().map(|n| *n).unwrap_or_default()
    }

    fn record(&self, write: ClipboardWrite) -> Result<(), ClipboardError> {
        self.writes
            .lock()
            .map_err(|_| ClipboardError::WriteFailed("lock poisoned".into()))?
            .push(write);
        Ok(())
    }
}

#[async_trait]
impl ClipboardSink for MemoryClipboard {
    async fn write_rich(&self, snippet: &RichSnippet) -> Result<(), ClipboardError> {
        if self.reject_rich {
            return Err(ClipboardError::RichUnsupported("text/html".into()));
        }
        self.record(ClipboardWrite::Rich(snippet.clone()))
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.reject_all {
            return Err(ClipboardError::WriteFailed("clipboard denied".into()));
        }
        self.record(ClipboardWrite::Text(text.to_string()))
    }

    async fn finish(&self) -> Result<(), ClipboardError> {
        if let Ok(mut n) = self.finished.lock() {
            *n += 1;
        }
        Ok(())
    }
}
