//! # Script Card Editor
//!
//! Runtime behaviour of a script card page.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ page: markup → typed Page (bindings, cards) │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: ScriptCardApp                       │
//! │  - FormState: field values → field spans    │
//! │  - TextSyncRegistry: peer span mirroring    │
//! │  - EditSession: in-place manual edits       │
//! │  - CopyValidator + ClipboardBridge          │
//! │  - notices, errand forms, deferred tasks    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ host (wasm / cli): DOM events, clipboard    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scriptcard_editor::{EditorConfig, MemoryClipboard, ScriptCardApp};
//! use scriptcard_page::{Anchor, CardId, Page};
//!
//! let page = Page::from_json(markup)?;
//! let mut app = ScriptCardApp::new(page, EditorConfig::default(), MemoryClipboard::new())?;
//!
//! app.input_field("customerName", "Alex");
//! let attempt = app.validate_and_copy(CardId(0), &Anchor::default(), now)?;
//! ```

mod app;
mod clipboard;
mod config;
mod errands;
mod errors;
mod form_state;
mod notice;
mod scheduler;
mod session;
mod sync;
mod validator;

pub use app::{AppSnapshot, ClickOutcome, CopyAttempt, ScriptCardApp, SidePanel};
pub use clipboard::{
    ClipboardBridge, ClipboardError, ClipboardSink, CopyOutcome, MemoryClipboard,
    SurfaceClipboard, SurfaceHost,
};
pub use config::{EditorConfig, ErrandConfig, Messages, DEFAULT_CONFIG_NAME};
pub use errands::{ErrandCopy, ErrandDesk, ErrandForm};
pub use errors::EditorError;
pub use form_state::FormState;
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use scheduler::{Millis, ScheduledTask, Scheduler, TaskKind};
pub use session::{EditSession, COMMIT_KEY};
pub use sync::TextSyncRegistry;
pub use validator::{CopyValidator, Verdict};

// Re-export page types for convenience
pub use scriptcard_page::{Anchor, CardId, FieldName, NodeId, Page, VNode};
