//! Errand form sections: collapsible blocks of labelled text inputs.

use crate::vnode::VNode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Inputs whose id starts with this prefix hold the customer's name and
/// drive the section heading.
pub const CUSTOMER_INPUT_PREFIX: &str = "input-cxname-";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrandInputSpec {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub value: String,
}

impl ErrandInputSpec {
    pub fn is_customer_name(&self) -> bool {
        self.id.starts_with(CUSTOMER_INPUT_PREFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrandFormSpec {
    /// Heading text as authored
    pub heading: String,
    pub inputs: Vec<ErrandInputSpec>,
}

impl ErrandFormSpec {
    pub fn from_markup(node: &VNode) -> Self {
        let mut heading = None;
        let mut labels = HashMap::new();
        let mut inputs = Vec::new();
        collect(node, &mut heading, &mut labels, &mut inputs);

        for input in &mut inputs {
            if let Some(label) = labels.get(&input.id) {
                input.label = label.clone();
            }
        }

        Self {
            heading: heading.unwrap_or_default(),
            inputs,
        }
    }
}

fn collect(
    node: &VNode,
    heading: &mut Option<String>,
    labels: &mut HashMap<String, String>,
    inputs: &mut Vec<ErrandInputSpec>,
) {
    match node.tag() {
        Some("h2") if heading.is_none() => {
            *heading = Some(node.text_content().trim().to_string());
            return;
        }
        Some("label") => {
            if let Some(target) = node.attr("for") {
                labels.insert(target.to_string(), node.text_content().trim().to_string());
            }
            return;
        }
        Some("input") if node.attr("type").unwrap_or("text") == "text" => {
            if let Some(id) = node.attr("id") {
                inputs.push(ErrandInputSpec {
                    id: id.to_string(),
                    label: id.to_string(),
                    value: node.attr("value").unwrap_or_default().to_string(),
                });
            }
            return;
        }
        _ => {}
    }

    for child in node.children() {
        collect(child, heading, labels, inputs);
    }
}
