//! # Errand Forms
//!
//! Collapsible form sections with labelled inputs. Each section can copy
//! its filled-in inputs as `Label: value` lines, and its buttons briefly
//! show the result of the last action before reverting to their idle label.

use crate::clipboard::ClipboardSink;
use crate::config::ErrandConfig;
use crate::errors::EditorError;
use crate::scheduler::{Millis, Scheduler, TaskKind};
use scriptcard_page::{ErrandFormSpec, ErrandInputSpec};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrandForm {
    original_heading: String,
    pub heading: String,
    pub collapsed: bool,
    pub inputs: Vec<ErrandInputSpec>,
    pub copy_label: String,
    pub clear_label: String,
}

impl ErrandForm {
    fn new(spec: &ErrandFormSpec, config: &ErrandConfig) -> Self {
        Self {
            original_heading: spec.heading.clone(),
            heading: spec.heading.clone(),
            collapsed: false,
            inputs: spec.inputs.clone(),
            copy_label: config.copy_label.clone(),
            clear_label: config.clear_label.clone(),
        }
    }

    /// Trimmed customer name, or the authored heading
    fn refresh_heading(&mut self) {
        let customer = self
            .inputs
            .iter()
            .find(|i| i.is_customer_name())
            .map(|i| i.value.trim())
            .unwrap_or_default();

        self.heading = if customer.is_empty() {
            self.original_heading.clone()
        } else {
            customer.to_string()
        };
    }

    /// `Label: value` line for each non-empty input
    pub fn summary(&self) -> String {
        self.inputs
            .iter()
            .filter(|i| !i.value.trim().is_empty())
            .map(|i| format!("{}: {}\n", i.label, i.value.trim()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrandCopy {
    Copied(String),
    NothingToCopy,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ErrandDesk {
    forms: Vec<ErrandForm>,
    config: ErrandConfig,
}

impl ErrandDesk {
    pub fn new(specs: &[ErrandFormSpec], config: ErrandConfig) -> Self {
        Self {
            forms: specs.iter().map(|s| ErrandForm::new(s, &config)).collect(),
            config,
        }
    }

    pub fn forms(&self) -> &[ErrandForm] {
        &self.forms
    }

    pub fn form(&self, index: usize) -> Option<&ErrandForm> {
        self.forms.get(index)
    }

    fn form_mut(&mut self, index: usize) -> Result<&mut ErrandForm, EditorError> {
        self.forms
            .get_mut(index)
            .ok_or(EditorError::UnknownErrandForm(index))
    }

    /// Collapse or expand a section. Returns the new collapsed state.
    pub fn toggle(&mut self, index: usize) -> Result<bool, EditorError> {
        let form = self.form_mut(index)?;
        form.collapsed = !form.collapsed;
        form.refresh_heading();
        debug!(form = index, collapsed = form.collapsed, "Toggled errand form");
        Ok(form.collapsed)
    }

    pub fn set_input(&mut self, index: usize, id: &str, value: impl Into<String>) -> Result<(), EditorError> {
        let form = self.form_mut(index)?;
        let input = form
            .inputs
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| EditorError::UnknownErrandInput {
                form: index,
                id: id.to_string(),
            })?;
        input.value = value.into();

        if input.is_customer_name() {
            form.refresh_heading();
        }
        Ok(())
    }

    /// Copy the section summary; the copy button reports the outcome
    pub fn copy<C: ClipboardSink + ?Sized>(
        &mut self,
        index: usize,
        sink: &mut C,
        now: Millis,
        scheduler: &mut Scheduler<TaskKind>,
    ) -> Result<ErrandCopy, EditorError> {
        let summary = self.form_mut(index)?.summary();

        let (outcome, label) = if summary.is_empty() {
            (ErrandCopy::NothingToCopy, self.config.nothing_to_copy_label.clone())
        } else {
            match sink.write_text(&summary) {
                Ok(()) => (ErrandCopy::Copied(summary), self.config.copied_label.clone()),
                Err(e) => {
                    warn!(form = index, error = %e, "Errand copy failed");
                    (ErrandCopy::Failed, self.config.copy_failed_label.clone())
                }
            }
        };

        let delay = self.config.copy_label_reset_ms;
        self.form_mut(index)?.copy_label = label;
        scheduler.schedule(TaskKind::ResetErrandCopyLabel(index), now, delay);
        Ok(outcome)
    }

    /// Empty every input of a section
    pub fn clear(&mut self, index: usize, now: Millis, scheduler: &mut Scheduler<TaskKind>) -> Result<(), EditorError> {
        let cleared_label = self.config.cleared_label.clone();
        let delay = self.config.clear_label_reset_ms;

        let form = self.form_mut(index)?;
        for input in &mut form.inputs {
            input.value.clear();
        }
        form.refresh_heading();
        form.clear_label = cleared_label;

        scheduler.schedule(TaskKind::ResetErrandClearLabel(index), now, delay);
        Ok(())
    }

    /// Revert a button label once its scheduled task fires
    pub fn on_task(&mut self, task: TaskKind) {
        match task {
            TaskKind::ResetErrandCopyLabel(index) => {
                if let Some(form) = self.forms.get_mut(index) {
                    form.copy_label = self.config.copy_label.clone();
                }
            }
            TaskKind::ResetErrandClearLabel(index) => {
                if let Some(form) = self.forms.get_mut(index) {
                    form.clear_label = self.config.clear_label.clone();
                }
            }
            TaskKind::DismissNotice => {}
        }
    }
}
