//! # Form State
//!
//! Current values of the form fields. Every change re-renders all display
//! nodes bound to a field, synchronously, so the page is fully updated by
//! the time the triggering event returns.

use scriptcard_page::{FieldName, Page};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct FormState {
    values: BTreeMap<FieldName, String>,
    placeholders: BTreeMap<FieldName, String>,
}

impl FormState {
    /// Empty form with the given per-field placeholders
    pub fn new(placeholders: BTreeMap<FieldName, String>) -> Self {
        Self {
            values: FieldName::ALL
                .into_iter()
                .map(|f| (f, String::new()))
                .collect(),
            placeholders,
        }
    }

    pub fn value(&self, field: FieldName) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    pub fn placeholder(&self, field: FieldName) -> &str {
        self.placeholders
            .get(&field)
            .map(String::as_str)
            .unwrap_or_else(|| field.default_placeholder())
    }

    /// Text a display bound to `field` shows
    pub fn display_text(&self, field: FieldName) -> &str {
        match self.value(field) {
            "" => self.placeholder(field),
            value => value,
        }
    }

    /// Store the raw value and re-render
    pub fn update(&mut self, page: &mut Page, field: FieldName, value: impl Into<String>) {
        let value = value.into();
        debug!(field = %field, len = value.len(), "Updating field");
        self.values.insert(field, value);
        self.render(page);
    }

    /// String-keyed update used at the event boundary. Unknown names are
    /// logged and ignored.
    pub fn update_by_name(&mut self, page: &mut Page, name: &str, value: impl Into<String>) -> bool {
        match name.parse::<FieldName>() {
            Ok(field) => {
                self.update(page, field, value);
                true
            }
            Err(e) => {
                warn!(error = %e, "Ignoring input for unknown field");
                false
            }
        }
    }

    /// Clear every field not listed in `preserve`, then re-render
    pub fn reset(&mut self, page: &mut Page, preserve: &[FieldName]) {
        for (field, value) in self.values.iter_mut() {
            if !preserve.contains(field) {
                value.clear();
            }
        }
        debug!(preserved = ?preserve, "Form reset");
        self.render(page);
    }

    /// Push current values into every field-bound node. Returns the number
    /// of nodes rendered.
    pub fn render(&self, page: &mut Page) -> usize {
        let mut rendered = 0;
        for field in FieldName::ALL {
            let text = self.display_text(field).to_string();
            let ids: Vec<_> = page.field_nodes(field).collect();
            for id in ids {
                page.set_text(id, text.clone());
                rendered += 1;
            }
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use scriptcard_page::VNode;

    fn page() -> Page {
        Page::build(&[
            VNode::span("customer_name", ""),
            VNode::element("p").with_children(vec![
                VNode::span("customer_name", ""),
                VNode::span("agent_name", ""),
                VNode::span("intent", ""),
            ]),
        ])
        .unwrap()
    }

    fn form() -> FormState {
        FormState::new(EditorConfig::default().placeholders)
    }

    fn texts(page: &Page) -> Vec<&str> {
        page.nodes().iter().map(|n| n.text()).collect()
    }

    #[test]
    fn test_render_shows_placeholders_for_empty_fields() {
        let mut page = page();
        let form = form();

        assert_eq!(form.render(&mut page), 4);
        assert_eq!(
            texts(&page),
            vec!["[Cx name]", "[Cx name]", "[Agent name]", "[intent]"]
        );
    }

    #[test]
    fn test_update_reaches_every_bound_node() {
        let mut page = page();
        let mut form = form();
        form.render(&mut page);

        form.update(&mut page, FieldName::CustomerName, "Alex");

        assert_eq!(
            texts(&page),
            vec!["Alex", "Alex", "[Agent name]", "[intent]"]
        );
    }

    #[test]
    fn test_raw_value_is_stored_untrimmed() {
        let mut page = page();
        let mut form = form();

        form.update(&mut page, FieldName::Intent, "  refund ");

        assert_eq!(form.value(FieldName::Intent), "  refund ");
        assert_eq!(page.text(scriptcard_page::NodeId(3)), Some("  refund "));
    }

    #[test]
    fn test_unknown_field_name_is_ignored() {
        let mut page = page();
        let mut form = form();
        form.render(&mut page);

        assert!(!form.update_by_name(&mut page, "ticketNumber", "42"));
        assert!(form.update_by_name(&mut page, "agentName", "Sam"));
        assert_eq!(
            texts(&page),
            vec!["[Cx name]", "[Cx name]", "Sam", "[intent]"]
        );
    }

    #[test]
    fn test_reset_preserves_listed_fields() {
        let mut page = page();
        let mut form = form();
        form.update(&mut page, FieldName::AgentName, "Sam");
        form.update(&mut page, FieldName::CustomerName, "Alex");
        form.update(&mut page, FieldName::Intent, "refund");

        form.reset(&mut page, &[FieldName::AgentName]);

        assert_eq!(form.value(FieldName::AgentName), "Sam");
        assert_eq!(form.value(FieldName::CustomerName), "");
        assert_eq!(
            texts(&page),
            vec!["[Cx name]", "[Cx name]", "Sam", "[intent]"]
        );
    }

    #[test]
    fn test_reset_without_preserve_clears_everything() {
        let mut page = page();
        let mut form = form();
        form.update(&mut page, FieldName::AgentName, "Sam");

        form.reset(&mut page, &[]);

        assert_eq!(form.value(FieldName::AgentName), "");
        assert_eq!(form.display_text(FieldName::AgentName), "[Agent name]");
    }
}
