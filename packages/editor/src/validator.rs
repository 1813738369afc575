//! Copy validation.
//!
//! A card may only be copied once every placeholder in it carries real
//! text. Form-driven placeholders send the user to the form; manual-edit
//! spans are opened for editing one at a time, in document order, because
//! finishing one span can fill its peers.

use crate::errors::EditorError;
use crate::form_state::FormState;
use scriptcard_page::{Binding, CardId, DisplayNode, NodeId, Page};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Card text is final
    Ready(String),

    /// A form-driven placeholder still shows its fallback text
    NeedsForm { node: NodeId },

    /// First manual-edit span still showing its default text
    NeedsEdit { node: NodeId },
}

pub struct CopyValidator<'a> {
    page: &'a Page,
    form: &'a FormState,
}

impl<'a> CopyValidator<'a> {
    pub fn new(page: &'a Page, form: &'a FormState) -> Self {
        Self { page, form }
    }

    /// Default text a node shows while nothing has been supplied
    fn default_text<'b>(&'b self, binding: &'b Binding) -> Option<&'b str> {
        match binding {
            Binding::Field { field } => Some(self.form.placeholder(*field)),
            Binding::Peer { key } => Some(key),
            Binding::Placeholder { default_text } => Some(default_text),
            Binding::Plain => None,
        }
    }

    fn is_unfilled(&self, node: &DisplayNode) -> bool {
        self.default_text(&node.binding)
            .is_some_and(|default| node.text().trim() == default)
    }

    pub fn inspect(&self, card: CardId) -> Result<Verdict, EditorError> {
        let card = self.page.card(card).ok_or(EditorError::UnknownCard(card))?;
        let nodes: Vec<_> = card
            .nodes
            .iter()
            .filter_map(|id| self.page.node(*id))
            .collect();

        if let Some(node) = nodes
            .iter()
            .filter(|n| !n.binding.is_manual())
            .find(|n| self.is_unfilled(n))
        {
            debug!(card = %card.id, node = %node.id, "Copy blocked: form placeholder unfilled");
            return Ok(Verdict::NeedsForm { node: node.id });
        }

        if let Some(node) = nodes
            .iter()
            .filter(|n| n.binding.is_manual())
            .find(|n| n.is_editing() || self.is_unfilled(n))
        {
            debug!(card = %card.id, node = %node.id, "Copy blocked: manual edit pending");
            return Ok(Verdict::NeedsEdit { node: node.id });
        }

        let text = self
            .page
            .card_text(card.id)
            .ok_or(EditorError::UnknownCard(card.id))?;
        Ok(Verdict::Ready(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::sync::TextSyncRegistry;
    use scriptcard_page::binding::{CARD_CLASS, DEFAULT_TEXT_ATTR, MANUAL_EDIT_CLASS};
    use scriptcard_page::{FieldName, VNode};

    fn manual(key: &str) -> VNode {
        VNode::span(MANUAL_EDIT_CLASS, key).with_attr(DEFAULT_TEXT_ATTR, key)
    }

    fn setup() -> (Page, FormState) {
        let card = VNode::element("div").with_class(CARD_CLASS).with_children(vec![
            VNode::element("p").with_children(vec![
                VNode::text("Hi "),
                VNode::span("customer_name", ""),
                VNode::text(", about "),
                manual("ISSUE"),
                VNode::text(" on "),
                manual("DATE"),
            ]),
        ]);
        let mut page = Page::build(&[card]).unwrap();
        let form = FormState::new(EditorConfig::default().placeholders);
        form.render(&mut page);
        (page, form)
    }

    #[test]
    fn test_unfilled_field_blocks_before_manual_edits() {
        let (page, form) = setup();

        assert_eq!(
            CopyValidator::new(&page, &form).inspect(CardId(0)).unwrap(),
            Verdict::NeedsForm { node: NodeId(0) }
        );
    }

    #[test]
    fn test_first_unedited_manual_span_is_reported() {
        let (mut page, mut form) = setup();
        form.update(&mut page, FieldName::CustomerName, "Alex");

        assert_eq!(
            CopyValidator::new(&page, &form).inspect(CardId(0)).unwrap(),
            Verdict::NeedsEdit { node: NodeId(1) }
        );

        let registry = TextSyncRegistry::from_page(&page);
        registry.propagate(&mut page, "ISSUE", "billing", None);

        assert_eq!(
            CopyValidator::new(&page, &form).inspect(CardId(0)).unwrap(),
            Verdict::NeedsEdit { node: NodeId(2) }
        );
    }

    #[test]
    fn test_ready_when_everything_filled() {
        let (mut page, mut form) = setup();
        form.update(&mut page, FieldName::CustomerName, "Alex");
        let registry = TextSyncRegistry::from_page(&page);
        registry.propagate(&mut page, "ISSUE", "billing", None);
        registry.propagate(&mut page, "DATE", "Monday", None);

        assert_eq!(
            CopyValidator::new(&page, &form).inspect(CardId(0)).unwrap(),
            Verdict::Ready("Hi Alex, about billing on Monday".to_string())
        );
    }

    #[test]
    fn test_span_mid_edit_counts_as_pending() {
        let (mut page, mut form) = setup();
        form.update(&mut page, FieldName::CustomerName, "Alex");
        let registry = TextSyncRegistry::from_page(&page);
        registry.propagate(&mut page, "ISSUE", "billing", None);
        registry.propagate(&mut page, "DATE", "Monday", None);
        page.set_editing(NodeId(2), "Tues");

        assert_eq!(
            CopyValidator::new(&page, &form).inspect(CardId(0)).unwrap(),
            Verdict::NeedsEdit { node: NodeId(2) }
        );
    }

    #[test]
    fn test_value_equal_to_placeholder_counts_as_unfilled() {
        let (mut page, mut form) = setup();
        form.update(&mut page, FieldName::CustomerName, " [Cx name] ");

        assert!(matches!(
            CopyValidator::new(&page, &form).inspect(CardId(0)).unwrap(),
            Verdict::NeedsForm { .. }
        ));
    }

    #[test]
    fn test_unknown_card() {
        let (page, form) = setup();

        assert!(matches!(
            CopyValidator::new(&page, &form).inspect(CardId(3)),
            Err(EditorError::UnknownCard(CardId(3)))
        ));
    }
}
