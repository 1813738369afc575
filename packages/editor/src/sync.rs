//! Peer group synchronization for `data-default-text` spans.
//!
//! Spans that share a `data-default-text` key form a peer group, whether or
//! not they are marked `manual-edit`. Whatever an editable member commits
//! (or types live) is mirrored into every other member.

use scriptcard_page::{NodeId, Page};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct TextSyncRegistry {
    groups: BTreeMap<String, Vec<NodeId>>,
}

impl TextSyncRegistry {
    /// Index every node carrying a default-text key
    pub fn from_page(page: &Page) -> Self {
        let mut groups: BTreeMap<String, Vec<NodeId>> = BTreeMap::new();
        for node in page.nodes() {
            if let Some(key) = node.binding.sync_key() {
                groups.entry(key.to_string()).or_default().push(node.id);
            }
        }
        debug!(groups = groups.len(), "Peer groups indexed");
        Self { groups }
    }

    pub fn group(&self, key: &str) -> &[NodeId] {
        self.groups.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Show `value` (or the key itself when `value` is empty) on every peer
    /// of `key` except `origin`. Peers holding a live edit input are left
    /// alone. Returns the number of nodes updated.
    pub fn propagate(&self, page: &mut Page, key: &str, value: &str, origin: Option<NodeId>) -> usize {
        let text = if value.is_empty() { key } else { value };
        let mut updated = 0;

        for &id in self.group(key) {
            if Some(id) == origin {
                continue;
            }
            if page.node(id).map_or(true, |n| n.is_editing()) {
                continue;
            }
            page.set_text(id, text);
            updated += 1;
        }

        debug!(key = %key, updated, "Propagated peer text");
        updated
    }

    /// Return every member of the group to its default text
    pub fn reset_group(&self, page: &mut Page, key: &str) -> usize {
        self.propagate(page, key, "", None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptcard_page::binding::{DEFAULT_TEXT_ATTR, MANUAL_EDIT_CLASS};
    use scriptcard_page::VNode;

    fn manual(key: &str) -> VNode {
        VNode::span(MANUAL_EDIT_CLASS, key).with_attr(DEFAULT_TEXT_ATTR, key)
    }

    fn page() -> Page {
        Page::build(&[manual("ISSUE"), manual("ISSUE"), manual("ISSUE"), manual("DATE")]).unwrap()
    }

    #[test]
    fn test_groups_by_key() {
        let registry = TextSyncRegistry::from_page(&page());

        assert_eq!(registry.group("ISSUE"), &[NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(registry.group("DATE"), &[NodeId(3)]);
        assert!(registry.group("MISSING").is_empty());
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["DATE", "ISSUE"]);
    }

    #[test]
    fn test_propagate_skips_origin() {
        let mut page = page();
        let registry = TextSyncRegistry::from_page(&page);

        let updated = registry.propagate(&mut page, "ISSUE", "billing", Some(NodeId(1)));

        assert_eq!(updated, 2);
        assert_eq!(page.text(NodeId(0)), Some("billing"));
        assert_eq!(page.text(NodeId(1)), Some("ISSUE"));
        assert_eq!(page.text(NodeId(2)), Some("billing"));
        assert_eq!(page.text(NodeId(3)), Some("DATE"));
    }

    #[test]
    fn test_empty_value_restores_default_text() {
        let mut page = page();
        let registry = TextSyncRegistry::from_page(&page);
        registry.propagate(&mut page, "ISSUE", "billing", None);

        registry.propagate(&mut page, "ISSUE", "", Some(NodeId(0)));

        assert_eq!(page.text(NodeId(1)), Some("ISSUE"));
        assert_eq!(page.text(NodeId(2)), Some("ISSUE"));
    }

    #[test]
    fn test_propagate_leaves_live_inputs_alone() {
        let mut page = page();
        let registry = TextSyncRegistry::from_page(&page);
        page.set_editing(NodeId(2), "bil");

        assert_eq!(registry.propagate(&mut page, "ISSUE", "billing", Some(NodeId(0))), 1);
        assert!(page.node(NodeId(2)).unwrap().is_editing());
    }

    #[test]
    fn test_fixed_span_joins_group_of_its_key() {
        let fixed = VNode::element("span")
            .with_attr(DEFAULT_TEXT_ATTR, "ISSUE")
            .with_child(VNode::text("ISSUE"));
        let mut page = Page::build(&[manual("ISSUE"), fixed]).unwrap();
        let registry = TextSyncRegistry::from_page(&page);

        assert_eq!(registry.group("ISSUE"), &[NodeId(0), NodeId(1)]);

        registry.propagate(&mut page, "ISSUE", "billing", Some(NodeId(0)));
        assert_eq!(page.text(NodeId(1)), Some("billing"));

        registry.reset_group(&mut page, "ISSUE");
        assert_eq!(page.text(NodeId(1)), Some("ISSUE"));
    }

    #[test]
    fn test_unknown_key_is_a_no_op() {
        let mut page = page();
        let registry = TextSyncRegistry::from_page(&page);

        assert_eq!(registry.propagate(&mut page, "NOPE", "x", None), 0);
    }

    #[test]
    fn test_reset_group() {
        let mut page = page();
        let registry = TextSyncRegistry::from_page(&page);
        registry.propagate(&mut page, "ISSUE", "billing", None);

        assert_eq!(registry.reset_group(&mut page, "ISSUE"), 3);
        assert!(registry
            .group("ISSUE")
            .iter()
            .all(|id| page.text(*id) == Some("ISSUE")));
    }
}
