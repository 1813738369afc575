use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Form fields tracked by the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    AgentName,
    CustomerName,
    Intent,
}

impl FieldName {
    pub const ALL: [FieldName; 3] = [
        FieldName::AgentName,
        FieldName::CustomerName,
        FieldName::Intent,
    ];

    /// Id of the form input feeding this field
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::AgentName => "agentName",
            FieldName::CustomerName => "customerName",
            FieldName::Intent => "intent",
        }
    }

    /// Class carried by display spans bound to this field
    pub fn display_class(self) -> &'static str {
        match self {
            FieldName::AgentName => "agent_name",
            FieldName::CustomerName => "customer_name",
            FieldName::Intent => "intent",
        }
    }

    pub fn default_placeholder(self) -> &'static str {
        match self {
            FieldName::AgentName => "[Agent name]",
            FieldName::CustomerName => "[Cx name]",
            FieldName::Intent => "[intent]",
        }
    }

    pub fn from_display_class(class: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.display_class() == class)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for FieldName {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
