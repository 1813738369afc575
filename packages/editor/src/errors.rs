//! Error types for the editor

use scriptcard_page::{CardId, NodeId, PageError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Page error: {0}")]
    Page(#[from] PageError),

    #[error("Node not found: {0}")]
    UnknownNode(NodeId),

    #[error("Card not found: {0}")]
    UnknownCard(CardId),

    #[error("Node {0} is not a manual-edit span")]
    NotEditable(NodeId),

    #[error("No edit session is active")]
    NoActiveSession,

    #[error("Errand form not found: {0}")]
    UnknownErrandForm(usize),

    #[error("Errand form {form} has no input '{id}'")]
    UnknownErrandInput { form: usize, id: String },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
