//! Binding descriptors for display nodes.
//!
//! Class and attribute conventions are read exactly once, when the page is
//! built. Everything downstream dispatches on [`Binding`].

use crate::error::PageError;
use crate::field::FieldName;
use crate::vnode::VNode;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TEXT_ATTR: &str = "data-default-text";
pub const MANUAL_EDIT_CLASS: &str = "manual-edit";
pub const CARD_CLASS: &str = "script-card";
pub const FORM_INPUT_CLASS: &str = "form-input";
pub const ERRAND_FORM_CLASS: &str = "form-container";

/// What a display node renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Binding {
    /// Mirrors a form field
    Field { field: FieldName },

    /// Manually edited span, synchronized with every span sharing `key`.
    /// The key doubles as the span's default text.
    Peer { key: String },

    /// Non-editable member of the peer group keyed by `default_text`.
    /// Shows the default until an editable peer commits a value.
    Placeholder { default_text: String },

    Plain,
}

impl Binding {
    /// Classify a markup element. Returns `Plain` for elements that carry
    /// no binding convention.
    pub fn classify(node: &VNode) -> Result<Binding, PageError> {
        let tag = node.tag().unwrap_or_default().to_string();
        let manual = node.has_class(MANUAL_EDIT_CLASS);
        let field = node.classes().find_map(FieldName::from_display_class);
        let default_text = node.attr(DEFAULT_TEXT_ATTR);

        match (manual, field, default_text) {
            (true, Some(field), _) => Err(PageError::ConflictingBinding { tag, field }),
            (true, None, None) => Err(PageError::MissingDefaultText { tag }),
            (true, None, Some(key)) if key.trim().is_empty() => {
                Err(PageError::EmptyDefaultText { tag })
            }
            (true, None, Some(key)) => Ok(Binding::Peer {
                key: key.to_string(),
            }),
            (false, Some(field), _) => Ok(Binding::Field { field }),
            (false, None, Some(text)) if !text.trim().is_empty() => Ok(Binding::Placeholder {
                default_text: text.to_string(),
            }),
            (false, None, _) => Ok(Binding::Plain),
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Binding::Peer { .. })
    }

    pub fn peer_key(&self) -> Option<&str> {
        match self {
            Binding::Peer { key } => Some(key),
            _ => None,
        }
    }

    /// Peer group this node belongs to, editable or not
    pub fn sync_key(&self) -> Option<&str> {
        match self {
            Binding::Peer { key } => Some(key),
            Binding::Placeholder { default_text } => Some(default_text),
            _ => None,
        }
    }

    pub fn field(&self) -> Option<FieldName> {
        match self {
            Binding::Field { field } => Some(*field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_field_span() {
        let node = VNode::span("customer_name", "[Cx name]");
        assert_eq!(
            Binding::classify(&node).unwrap(),
            Binding::Field {
                field: FieldName::CustomerName
            }
        );
    }

    #[test]
    fn test_classify_manual_edit_span() {
        let node = VNode::span(MANUAL_EDIT_CLASS, "ISSUE").with_attr(DEFAULT_TEXT_ATTR, "ISSUE");
        assert_eq!(
            Binding::classify(&node).unwrap(),
            Binding::Peer {
                key: "ISSUE".to_string()
            }
        );
    }

    #[test]
    fn test_classify_placeholder_span() {
        let node = VNode::element("span").with_attr(DEFAULT_TEXT_ATTR, "[order id]");
        assert!(matches!(
            Binding::classify(&node).unwrap(),
            Binding::Placeholder { .. }
        ));
    }

    #[test]
    fn test_sync_key_covers_editable_and_fixed_spans() {
        let manual = Binding::classify(
            &VNode::span(MANUAL_EDIT_CLASS, "ISSUE").with_attr(DEFAULT_TEXT_ATTR, "ISSUE"),
        )
        .unwrap();
        let fixed =
            Binding::classify(&VNode::element("span").with_attr(DEFAULT_TEXT_ATTR, "ISSUE")).unwrap();

        assert_eq!(manual.sync_key(), Some("ISSUE"));
        assert_eq!(fixed.sync_key(), Some("ISSUE"));
        assert!(!fixed.is_manual());
        assert_eq!(fixed.peer_key(), None);
        assert_eq!(Binding::Plain.sync_key(), None);
    }

    #[test]
    fn test_manual_edit_requires_default_text() {
        let node = VNode::span(MANUAL_EDIT_CLASS, "x");
        assert!(matches!(
            Binding::classify(&node),
            Err(PageError::MissingDefaultText { .. })
        ));
    }

    #[test]
    fn test_manual_edit_and_field_class_conflict() {
        let node = VNode::span("manual-edit intent", "x").with_attr(DEFAULT_TEXT_ATTR, "x");
        assert!(matches!(
            Binding::classify(&node),
            Err(PageError::ConflictingBinding { .. })
        ));
    }

    #[test]
    fn test_plain_element() {
        assert_eq!(
            Binding::classify(&VNode::element("p")).unwrap(),
            Binding::Plain
        );
    }
}
