//! # Clipboard Bridge
//!
//! Writes finished card text to the system clipboard and reports the
//! outcome as a notice. Failures are returned as values; nothing escapes the
//! event handler that triggered the copy.
//!
//! Two sink strategies:
//! - **Direct API**: implement [`ClipboardSink`] (browser clipboard API,
//!   in-memory sink).
//! - **Temporary surface**: implement [`SurfaceHost`] and wrap it in
//!   [`SurfaceClipboard`], which creates a hidden writable surface, selects
//!   it, issues the copy and always removes the surface again.

use crate::config::Messages;
use crate::notice::{NoticeBoard, NoticeKind};
use crate::scheduler::{Millis, Scheduler, TaskKind};
use scriptcard_page::Anchor;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Copy command rejected: {0}")]
    Rejected(String),
}

/// Anything that can receive plain text
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

impl<T: ClipboardSink + ?Sized> ClipboardSink for Box<T> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        (**self).write_text(text)
    }
}

/// Host able to mount a temporary, selectable text surface
pub trait SurfaceHost {
    type Surface;

    fn create_surface(&mut self, text: &str) -> Result<Self::Surface, ClipboardError>;

    fn select_all(&mut self, surface: &Self::Surface) -> Result<(), ClipboardError>;

    fn copy_selection(&mut self, surface: &Self::Surface) -> Result<(), ClipboardError>;

    fn remove_surface(&mut self, surface: Self::Surface);
}

/// Clipboard sink built on a [`SurfaceHost`]
#[derive(Debug)]
pub struct SurfaceClipboard<H> {
    host: H,
}

impl<H: SurfaceHost> SurfaceClipboard<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<H: SurfaceHost> ClipboardSink for SurfaceClipboard<H> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let surface = self.host.create_surface(text)?;
        let result = self
            .host
            .select_all(&surface)
            .and_then(|()| self.host.copy_selection(&surface));
        self.host.remove_surface(surface);
        result
    }
}

/// In-process clipboard, used by the CLI and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
    failure: Option<ClipboardError>,
    writes: usize,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose every write fails with `error`
    pub fn failing(error: ClipboardError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn set_failure(&mut self, failure: Option<ClipboardError>) {
        self.failure = failure;
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.contents = Some(text.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Failed(ClipboardError),
}

/// Clipboard writes with user-facing feedback
#[derive(Debug)]
pub struct ClipboardBridge<C> {
    sink: C,
    messages: Messages,
}

impl<C: ClipboardSink> ClipboardBridge<C> {
    pub fn new(sink: C, messages: Messages) -> Self {
        Self { sink, messages }
    }

    pub fn sink(&self) -> &C {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut C {
        &mut self.sink
    }

    /// Write `text` and show "Copied!" or a failure notice next to `anchor`
    pub fn copy(
        &mut self,
        text: &str,
        anchor: &Anchor,
        now: Millis,
        notices: &mut NoticeBoard,
        scheduler: &mut Scheduler<TaskKind>,
    ) -> CopyOutcome {
        match self.sink.write_text(text) {
            Ok(()) => {
                debug!(chars = text.chars().count(), "Copied card text");
                notices.show(
                    self.messages.copied.clone(),
                    NoticeKind::Success,
                    anchor,
                    now,
                    scheduler,
                );
                CopyOutcome::Copied
            }
            Err(e) => {
                warn!(error = %e, "Clipboard write failed");
                notices.show(
                    self.messages.copy_failed.clone(),
                    NoticeKind::Failure,
                    anchor,
                    now,
                    scheduler,
                );
                CopyOutcome::Failed(e)
            }
        }
    }
}
