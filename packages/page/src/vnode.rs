use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Markup node describing a script card page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element
    Element {
        tag: String,
        #[serde(default)]
        attributes: HashMap<String, String>,
        #[serde(default)]
        children: Vec<VNode>,
    },

    /// Text node
    Text { content: String },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    /// `<span class="...">text</span>` shorthand used by page fixtures
    pub fn span(class: impl Into<String>, content: impl Into<String>) -> Self {
        VNode::element("span")
            .with_attr("class", class)
            .with_child(VNode::text(content))
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    /// Append a class to the `class` attribute
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            let class = class.into();
            attributes
                .entry("class".to_string())
                .and_modify(|existing| {
                    if !existing.is_empty() {
                        existing.push(' ');
                    }
                    existing.push_str(&class);
                })
                .or_insert(class);
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            VNode::Text { .. } => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            VNode::Text { .. } => None,
        }
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            VNode::Text { .. } => &[],
        }
    }

    /// Concatenated text of this subtree (DOM `textContent`)
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            VNode::Text { content } => out.push_str(content),
            VNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Parse a JSON page description (an array of root nodes)
pub fn parse_markup(json: &str) -> Result<Vec<VNode>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_class_appends() {
        let node = VNode::element("span")
            .with_class("manual-edit")
            .with_class("highlight");

        assert_eq!(node.attr("class"), Some("manual-edit highlight"));
        assert!(node.has_class("highlight"));
        assert!(!node.has_class("manual"));
    }

    #[test]
    fn test_text_content_flattens_children() {
        let node = VNode::element("p")
            .with_child(VNode::text("Hi "))
            .with_child(VNode::span("customer_name", "[Cx name]"))
            .with_child(VNode::text("!"));

        assert_eq!(node.text_content(), "Hi [Cx name]!");
    }

    #[test]
    fn test_parse_markup_tagged_json() {
        let json = r#"[
            { "type": "Element", "tag": "div", "attributes": { "class": "script-card" },
              "children": [ { "type": "Text", "content": "Hello" } ] }
        ]"#;

        let roots = parse_markup(json).unwrap();
        assert_eq!(roots.len(), 1);
        assert!(roots[0].has_class("script-card"));
        assert_eq!(roots[0].text_content(), "Hello");
    }

    #[test]
    fn test_attributes_default_when_missing() {
        let json = r#"[{ "type": "Element", "tag": "br" }]"#;
        let roots = parse_markup(json).unwrap();
        assert_eq!(roots[0].tag(), Some("br"));
        assert!(roots[0].children().is_empty());
    }
}
