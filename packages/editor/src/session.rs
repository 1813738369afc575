//! # Edit Session Management
//!
//! An EditSession turns one manual-edit span into a live text input:
//!
//! ```text
//! Display ──begin──▶ Editing ──Enter / blur──▶ Display
//!                      │
//!                   keystroke → mirror into peers
//! ```
//!
//! A pristine span (still showing its default text) starts with an empty
//! input; an edited span starts with its current text. Re-entering edit
//! mode is always allowed.

use crate::errors::EditorError;
use crate::sync::TextSyncRegistry;
use scriptcard_page::{NodeId, Page};
use tracing::debug;

pub const COMMIT_KEY: &str = "Enter";

/// Live edit of a single manual-edit span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    node: NodeId,
    default_text: String,
    value: String,
}

impl EditSession {
    /// Mount an input on `node`
    pub fn begin(page: &mut Page, node: NodeId) -> Result<Self, EditorError> {
        let display = page.node(node).ok_or(EditorError::UnknownNode(node))?;
        let default_text = display
            .binding
            .peer_key()
            .ok_or(EditorError::NotEditable(node))?
            .to_string();

        let current = display.text().trim();
        let value = if current == default_text {
            String::new()
        } else {
            current.to_string()
        };

        page.set_editing(node, value.clone());
        debug!(node = %node, key = %default_text, "Edit session started");

        Ok(Self {
            node,
            default_text,
            value,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn default_text(&self) -> &str {
        &self.default_text
    }

    /// Current input value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Keystroke: update the input and mirror the raw value into peers
    pub fn input(&mut self, page: &mut Page, registry: &TextSyncRegistry, value: impl Into<String>) {
        self.value = value.into();
        page.set_editing(self.node, self.value.clone());
        registry.propagate(page, &self.default_text, &self.value, Some(self.node));
    }

    /// Whether `key` ends the session
    pub fn is_commit_key(key: &str) -> bool {
        key == COMMIT_KEY
    }

    /// Leave edit mode. Whitespace-only input reverts to the default text.
    /// Returns the committed text.
    pub fn commit(self, page: &mut Page, registry: &TextSyncRegistry) -> String {
        let trimmed = self.value.trim();
        let committed = if trimmed.is_empty() {
            self.default_text.clone()
        } else {
            trimmed.to_string()
        };

        page.set_text(self.node, committed.clone());
        registry.propagate(page, &self.default_text, &committed, Some(self.node));
        debug!(node = %self.node, text = %committed, "Edit session committed");
        committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptcard_page::binding::{DEFAULT_TEXT_ATTR, MANUAL_EDIT_CLASS};
    use scriptcard_page::VNode;

    fn setup() -> (Page, TextSyncRegistry) {
        let manual = VNode::span(MANUAL_EDIT_CLASS, "ISSUE").with_attr(DEFAULT_TEXT_ATTR, "ISSUE");
        let page = Page::build(&[
            manual.clone(),
            manual,
            VNode::span("intent", "[intent]"),
        ])
        .unwrap();
        let registry = TextSyncRegistry::from_page(&page);
        (page, registry)
    }

    #[test]
    fn test_pristine_span_starts_blank() {
        let (mut page, _) = setup();
        let session = EditSession::begin(&mut page, NodeId(0)).unwrap();

        assert_eq!(session.value(), "");
        assert_eq!(session.default_text(), "ISSUE");
        assert!(page.node(NodeId(0)).unwrap().is_editing());
    }

    #[test]
    fn test_edited_span_starts_with_current_text() {
        let (mut page, registry) = setup();
        let mut session = EditSession::begin(&mut page, NodeId(0)).unwrap();
        session.input(&mut page, &registry, "billing");
        session.commit(&mut page, &registry);

        let session = EditSession::begin(&mut page, NodeId(0)).unwrap();
        assert_eq!(session.value(), "billing");
    }

    #[test]
    fn test_keystrokes_mirror_into_peers_only() {
        let (mut page, registry) = setup();
        let mut session = EditSession::begin(&mut page, NodeId(0)).unwrap();

        session.input(&mut page, &registry, "bill");
        assert_eq!(page.text(NodeId(1)), Some("bill"));
        assert_eq!(page.text(NodeId(0)), Some(""));

        session.input(&mut page, &registry, "");
        assert_eq!(page.text(NodeId(1)), Some("ISSUE"));
    }

    #[test]
    fn test_commit_trims_and_syncs_final_text() {
        let (mut page, registry) = setup();
        let mut session = EditSession::begin(&mut page, NodeId(0)).unwrap();
        session.input(&mut page, &registry, "  billing dispute  ");

        let committed = session.commit(&mut page, &registry);

        assert_eq!(committed, "billing dispute");
        assert_eq!(page.text(NodeId(0)), Some("billing dispute"));
        assert_eq!(page.text(NodeId(1)), Some("billing dispute"));
    }

    #[test]
    fn test_whitespace_commit_reverts_to_default() {
        let (mut page, registry) = setup();
        let mut session = EditSession::begin(&mut page, NodeId(0)).unwrap();
        session.input(&mut page, &registry, "   ");

        assert_eq!(session.commit(&mut page, &registry), "ISSUE");
        assert_eq!(page.text(NodeId(0)), Some("ISSUE"));
        assert_eq!(page.text(NodeId(1)), Some("ISSUE"));
    }

    #[test]
    fn test_reedit_and_commit_unchanged_is_idempotent() {
        let (mut page, registry) = setup();
        let mut session = EditSession::begin(&mut page, NodeId(0)).unwrap();
        session.input(&mut page, &registry, "billing");
        session.commit(&mut page, &registry);
        let before = page.snapshot();

        EditSession::begin(&mut page, NodeId(0))
            .unwrap()
            .commit(&mut page, &registry);

        assert_eq!(page.snapshot(), before);
    }

    #[test]
    fn test_only_manual_spans_are_editable() {
        let (mut page, _) = setup();

        assert!(matches!(
            EditSession::begin(&mut page, NodeId(2)),
            Err(EditorError::NotEditable(NodeId(2)))
        ));
        assert!(matches!(
            EditSession::begin(&mut page, NodeId(9)),
            Err(EditorError::UnknownNode(NodeId(9)))
        ));
    }

    #[test]
    fn test_commit_key() {
        assert!(EditSession::is_commit_key("Enter"));
        assert!(!EditSession::is_commit_key("Tab"));
    }
}
