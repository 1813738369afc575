use crate::errors::EditorError;
use crate::scheduler::Millis;
use scriptcard_page::{FieldName, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "scriptcard.config.json";

/// Page layer configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// How long a notice stays visible
    pub notice_duration_ms: Millis,

    /// Gap between a notice and the element it points at
    pub notice_gap: f64,

    /// Notice box size used for placement
    pub notice_size: Size,

    /// Text shown by field displays while the field is empty
    pub placeholders: BTreeMap<FieldName, String>,

    /// Fields kept when the form is cleared
    pub preserved_fields: Vec<FieldName>,

    /// Refuse to start when the page has binding issues
    pub strict_bindings: bool,

    pub messages: Messages,

    pub errands: ErrandConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Messages {
    pub form_required: String,
    pub copied: String,
    pub copy_failed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrandConfig {
    pub copy_label: String,
    pub copied_label: String,
    pub copy_failed_label: String,
    pub nothing_to_copy_label: String,
    pub clear_label: String,
    pub cleared_label: String,
    pub copy_label_reset_ms: Millis,
    pub clear_label_reset_ms: Millis,
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults when the file
    /// is absent
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            Self::from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn placeholder(&self, field: FieldName) -> &str {
        self.placeholders
            .get(&field)
            .map(String::as_str)
            .unwrap_or_else(|| field.default_placeholder())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            notice_duration_ms: 2_000,
            notice_gap: 10.0,
            notice_size: Size {
                width: 160.0,
                height: 32.0,
            },
            placeholders: FieldName::ALL
                .into_iter()
                .map(|f| (f, f.default_placeholder().to_string()))
                .collect(),
            preserved_fields: vec![FieldName::AgentName],
            strict_bindings: false,
            messages: Messages::default(),
            errands: ErrandConfig::default(),
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            form_required: "Please update the form before copying.".to_string(),
            copied: "Copied!".to_string(),
            copy_failed: "Copy failed. Please try again.".to_string(),
        }
    }
}

impl Default for ErrandConfig {
    fn default() -> Self {
        Self {
            copy_label: "Copy".to_string(),
            copied_label: "Copied!".to_string(),
            copy_failed_label: "Copy Failed!".to_string(),
            nothing_to_copy_label: "Nothing to Copy!".to_string(),
            clear_label: "Clear".to_string(),
            cleared_label: "Cleared".to_string(),
            copy_label_reset_ms: 1_000,
            clear_label_reset_ms: 2_000,
        }
    }
}
