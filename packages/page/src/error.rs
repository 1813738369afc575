//! Error types for page building

use crate::field::FieldName;
use crate::page::BindingIssue;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("Markup error: {0}")]
    Markup(#[from] serde_json::Error),

    #[error("<{tag}> is marked manual-edit but has no data-default-text")]
    MissingDefaultText { tag: String },

    #[error("<{tag}> has an empty data-default-text")]
    EmptyDefaultText { tag: String },

    #[error("<{tag}> is both manual-edit and bound to field {field}")]
    ConflictingBinding { tag: String, field: FieldName },

    #[error("Script cards cannot be nested")]
    NestedCard,

    #[error("Form input declared twice: {0}")]
    DuplicateControl(String),

    #[error("Form input without an id")]
    ControlWithoutId,

    #[error("Invalid bindings: {}", format_issues(.0))]
    InvalidBindings(Vec<BindingIssue>),
}

fn format_issues(issues: &[BindingIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
