//! # Page Model
//!
//! A [`Page`] is the flattened, typed view of a script card document:
//! display nodes with their binding descriptors, the cards that group them,
//! the form controls that feed fields, and the errand form sections.
//!
//! ## Lifecycle
//!
//! ```text
//! VNode markup → Page::build → (events mutate node content) → snapshot
//! ```
//!
//! Nodes are addressed by [`NodeId`], an index assigned in document order.

use crate::binding::{
    Binding, CARD_CLASS, ERRAND_FORM_CLASS, FORM_INPUT_CLASS,
};
use crate::error::PageError;
use crate::errand::ErrandFormSpec;
use crate::field::FieldName;
use crate::vnode::{parse_markup, VNode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub usize);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card-{}", self.0)
    }
}

/// What a display node currently holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "camelCase")]
pub enum NodeContent {
    Text(String),

    /// Live edit input; the node renders no text of its own
    Editing(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayNode {
    pub id: NodeId,
    pub binding: Binding,
    pub card: Option<CardId>,
    content: NodeContent,
}

impl DisplayNode {
    /// Rendered text (`innerText`); empty while an edit input is mounted
    pub fn text(&self) -> &str {
        match &self.content {
            NodeContent::Text(text) => text,
            NodeContent::Editing(_) => "",
        }
    }

    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.content, NodeContent::Editing(_))
    }
}

/// Piece of a card's copyable text
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(String),
    Node(NodeId),
    LineBreak,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: CardId,
    /// Display nodes in encounter order
    pub nodes: Vec<NodeId>,
    segments: Vec<Segment>,
}

/// Input element feeding a form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormControl {
    pub id: String,
    pub field: Option<FieldName>,
    pub value: String,
}

/// Configuration problem found while checking bindings at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "camelCase")]
pub enum BindingIssue {
    /// A form input whose id names no known field
    UnknownControl { id: String },

    /// A field that no display node renders
    FieldWithoutDisplay { field: FieldName },

    /// A field no form input can change
    FieldWithoutInput { field: FieldName },
}

impl fmt::Display for BindingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingIssue::UnknownControl { id } => {
                write!(f, "form input '{}' does not name a field", id)
            }
            BindingIssue::FieldWithoutDisplay { field } => {
                write!(f, "field '{}' has no display node", field)
            }
            BindingIssue::FieldWithoutInput { field } => {
                write!(f, "field '{}' has no form input", field)
            }
        }
    }
}

/// Typed script card document
#[derive(Debug, Clone, Default)]
pub struct Page {
    nodes: Vec<DisplayNode>,
    cards: Vec<Card>,
    controls: Vec<FormControl>,
    errands: Vec<ErrandFormSpec>,
}

impl Page {
    /// Build a page from markup roots, classifying every element once
    pub fn build(roots: &[VNode]) -> Result<Self, PageError> {
        let mut builder = PageBuilder::default();
        for root in roots {
            builder.walk(root, None)?;
        }

        let page = builder.page;
        info!(
            nodes = page.nodes.len(),
            cards = page.cards.len(),
            controls = page.controls.len(),
            errands = page.errands.len(),
            "Page built"
        );
        Ok(page)
    }

    /// Build from a JSON array of markup roots
    pub fn from_json(json: &str) -> Result<Self, PageError> {
        let roots = parse_markup(json)?;
        Self::build(&roots)
    }

    /// Build and reject any [`BindingIssue`]
    pub fn build_strict(roots: &[VNode]) -> Result<Self, PageError> {
        let page = Self::build(roots)?;
        let issues = page.binding_issues();
        if issues.is_empty() {
            Ok(page)
        } else {
            Err(PageError::InvalidBindings(issues))
        }
    }

    pub fn nodes(&self) -> &[DisplayNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&DisplayNode> {
        self.nodes.get(id.0)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(DisplayNode::text)
    }

    /// Replace a node's content with rendered text. Returns `false` for an
    /// unknown node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) => {
                node.content = NodeContent::Text(text.into());
                true
            }
            None => false,
        }
    }

    /// Mount a live edit input holding `value`
    pub fn set_editing(&mut self, id: NodeId, value: impl Into<String>) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) => {
                node.content = NodeContent::Editing(value.into());
                true
            }
            None => false,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.0)
    }

    pub fn card_of(&self, node: NodeId) -> Option<CardId> {
        self.node(node).and_then(|n| n.card)
    }

    pub fn field_nodes(&self, field: FieldName) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(move |n| n.binding.field() == Some(field))
            .map(|n| n.id)
    }

    pub fn peer_nodes<'a>(&'a self, key: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.binding.peer_key() == Some(key))
            .map(|n| n.id)
    }

    /// Copyable text of a card (`innerText`): block boundaries become
    /// newlines, blank lines are dropped.
    pub fn card_text(&self, id: CardId) -> Option<String> {
        let card = self.card(id)?;
        let mut lines = vec![String::new()];

        for segment in &card.segments {
            match segment {
                Segment::Literal(text) => push_inline(&mut lines, text),
                Segment::Node(node) => push_inline(&mut lines, self.text(*node).unwrap_or_default()),
                Segment::LineBreak => lines.push(String::new()),
            }
        }

        let text = lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        Some(text)
    }

    pub fn controls(&self) -> &[FormControl] {
        &self.controls
    }

    pub fn control(&self, id: &str) -> Option<&FormControl> {
        self.controls.iter().find(|c| c.id == id)
    }

    /// Set the value shown by every input feeding `field`
    pub fn set_control_value(&mut self, field: FieldName, value: &str) {
        for control in self.controls.iter_mut().filter(|c| c.field == Some(field)) {
            control.value = value.to_string();
        }
    }

    pub fn errands(&self) -> &[ErrandFormSpec] {
        &self.errands
    }

    /// Startup check for bindings the runtime would otherwise silently ignore
    pub fn binding_issues(&self) -> Vec<BindingIssue> {
        let mut issues: Vec<BindingIssue> = self
            .controls
            .iter()
            .filter(|c| c.field.is_none())
            .map(|c| BindingIssue::UnknownControl { id: c.id.clone() })
            .collect();

        for field in FieldName::ALL {
            if self.field_nodes(field).next().is_none() {
                issues.push(BindingIssue::FieldWithoutDisplay { field });
            }
            if !self.controls.iter().any(|c| c.field == Some(field)) {
                issues.push(BindingIssue::FieldWithoutInput { field });
            }
        }

        issues
    }

    /// Serializable view of everything a host needs to repaint
    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeSnapshot {
                    id: n.id,
                    content: n.content.clone(),
                })
                .collect(),
            cards: self
                .cards
                .iter()
                .map(|c| CardSnapshot {
                    id: c.id,
                    text: self.card_text(c.id).unwrap_or_default(),
                })
                .collect(),
            controls: self.controls.clone(),
        }
    }
}

fn push_inline(lines: &mut Vec<String>, text: &str) {
    if let Some(line) = lines.last_mut() {
        line.push_str(text);
    }
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div" | "li" | "ul" | "ol" | "section" | "blockquote" | "h1" | "h2" | "h3" | "h4"
            | "h5" | "h6"
    )
}

/// Collapse whitespace runs the way rendered HTML text does
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

#[derive(Default)]
struct PageBuilder {
    page: Page,
    control_ids: HashSet<String>,
}

impl PageBuilder {
    fn walk(&mut self, node: &VNode, card: Option<CardId>) -> Result<(), PageError> {
        let (tag, children) = match node {
            VNode::Text { content } => {
                if let Some(card) = card {
                    self.push_segment(card, Segment::Literal(collapse_whitespace(content)));
                }
                return Ok(());
            }
            VNode::Element { tag, children, .. } => (tag.as_str(), children),
        };

        if node.has_class(CARD_CLASS) {
            if card.is_some() {
                return Err(PageError::NestedCard);
            }
            let id = CardId(self.page.cards.len());
            self.page.cards.push(Card {
                id,
                nodes: Vec::new(),
                segments: Vec::new(),
            });
            debug!(card = %id, "Registering script card");
            for child in children {
                self.walk(child, Some(id))?;
            }
            return Ok(());
        }

        if tag == "input" && node.has_class(FORM_INPUT_CLASS) {
            return self.push_control(node);
        }

        if node.has_class(ERRAND_FORM_CLASS) {
            let spec = ErrandFormSpec::from_markup(node);
            debug!(heading = %spec.heading, inputs = spec.inputs.len(), "Registering errand form");
            self.page.errands.push(spec);
            return Ok(());
        }

        if tag == "br" {
            if let Some(card) = card {
                self.push_segment(card, Segment::LineBreak);
            }
            return Ok(());
        }

        let binding = Binding::classify(node)?;
        if binding != Binding::Plain {
            let id = NodeId(self.page.nodes.len());
            debug!(node = %id, binding = ?binding, "Registering display node");
            self.page.nodes.push(DisplayNode {
                id,
                binding,
                card,
                content: NodeContent::Text(node.text_content().trim().to_string()),
            });
            if let Some(card) = card {
                self.page.cards[card.0].nodes.push(id);
                self.push_segment(card, Segment::Node(id));
            }
            return Ok(());
        }

        let block = is_block(tag);
        if block {
            self.push_break(card);
        }
        for child in children {
            self.walk(child, card)?;
        }
        if block {
            self.push_break(card);
        }
        Ok(())
    }

    fn push_control(&mut self, node: &VNode) -> Result<(), PageError> {
        let id = node.attr("id").ok_or(PageError::ControlWithoutId)?;
        if !self.control_ids.insert(id.to_string()) {
            return Err(PageError::DuplicateControl(id.to_string()));
        }
        self.page.controls.push(FormControl {
            id: id.to_string(),
            field: id.parse().ok(),
            value: node.attr("value").unwrap_or_default().to_string(),
        });
        Ok(())
    }

    fn push_segment(&mut self, card: CardId, segment: Segment) {
        self.page.cards[card.0].segments.push(segment);
    }

    fn push_break(&mut self, card: Option<CardId>) {
        if let Some(card) = card {
            self.push_segment(card, Segment::LineBreak);
        }
    }
}

/// Serializable page state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub cards: Vec<CardSnapshot>,
    pub controls: Vec<FormControl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub content: NodeContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub id: CardId,
    pub text: String,
}
