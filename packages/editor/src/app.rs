//! # Script Card App
//!
//! Event-level controller tying the page layer together. It owns every
//! piece of state explicitly; hosts translate DOM events into calls:
//!
//! | DOM event | call |
//! |---|---|
//! | `input` on a form field | [`ScriptCardApp::input_field`] |
//! | click on a card / span | [`ScriptCardApp::click_node`], [`ScriptCardApp::validate_and_copy`] |
//! | `input` / `keydown` / `blur` on the edit input | [`ScriptCardApp::edit_input`], [`ScriptCardApp::edit_key`], [`ScriptCardApp::blur`] |
//! | animation frame / interval | [`ScriptCardApp::tick`] |
//!
//! Every call finishes all propagation before returning.

use crate::clipboard::{ClipboardBridge, ClipboardSink, CopyOutcome};
use crate::config::EditorConfig;
use crate::errands::{ErrandCopy, ErrandDesk, ErrandForm};
use crate::errors::EditorError;
use crate::form_state::FormState;
use crate::notice::{Notice, NoticeBoard, NoticeKind};
use crate::scheduler::{Millis, Scheduler, TaskKind};
use crate::session::EditSession;
use crate::sync::TextSyncRegistry;
use crate::validator::{CopyValidator, Verdict};
use scriptcard_page::{Anchor, CardId, FieldName, NodeId, Page, PageError, PageSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Open/closed flag of the side panel holding the form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SidePanel {
    open: bool,
}

impl SidePanel {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

/// Result of a copy attempt on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum CopyAttempt {
    Copied { text: String },
    CopyFailed { error: String },
    /// A form placeholder is unfilled; the side panel was opened
    NeedsForm { node: NodeId },
    /// A manual-edit span was put into edit mode
    NeedsEdit { node: NodeId },
}

/// What a click on a display node did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ClickOutcome {
    Editing { node: NodeId },
    Copy { attempt: CopyAttempt },
    /// Node sits outside any card
    Ignored,
}

/// Everything a host needs to repaint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub page: PageSnapshot,
    pub notice: Option<Notice>,
    pub panel_open: bool,
    pub editing: Option<NodeId>,
    pub errands: Vec<ErrandForm>,
}

pub struct ScriptCardApp<C> {
    config: EditorConfig,
    page: Page,
    form: FormState,
    registry: TextSyncRegistry,
    session: Option<EditSession>,
    notices: NoticeBoard,
    panel: SidePanel,
    scheduler: Scheduler<TaskKind>,
    clipboard: ClipboardBridge<C>,
    errands: ErrandDesk,
}

impl<C: ClipboardSink> ScriptCardApp<C> {
    /// Wire up a built page. Renders every field placeholder once.
    pub fn new(mut page: Page, config: EditorConfig, sink: C) -> Result<Self, EditorError> {
        if config.strict_bindings {
            let issues = page.binding_issues();
            if !issues.is_empty() {
                return Err(PageError::InvalidBindings(issues).into());
            }
        }

        let form = FormState::new(config.placeholders.clone());
        form.render(&mut page);

        let registry = TextSyncRegistry::from_page(&page);
        let errands = ErrandDesk::new(page.errands(), config.errands.clone());
        let notices = NoticeBoard::new(
            config.notice_size,
            config.notice_gap,
            config.notice_duration_ms,
        );
        let clipboard = ClipboardBridge::new(sink, config.messages.clone());

        info!(
            cards = page.cards().len(),
            peer_groups = registry.keys().count(),
            "Script card app ready"
        );

        Ok(Self {
            config,
            page,
            form,
            registry,
            session: None,
            notices,
            panel: SidePanel::default(),
            scheduler: Scheduler::new(),
            clipboard,
            errands,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notices.current()
    }

    pub fn panel(&self) -> &SidePanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut SidePanel {
        &mut self.panel
    }

    pub fn clipboard(&self) -> &C {
        self.clipboard.sink()
    }

    pub fn clipboard_mut(&mut self) -> &mut C {
        self.clipboard.sink_mut()
    }

    pub fn errands(&self) -> &ErrandDesk {
        &self.errands
    }

    pub fn scheduler(&self) -> &Scheduler<TaskKind> {
        &self.scheduler
    }

    /// `input` event on a form field. Unknown ids are ignored.
    pub fn input_field(&mut self, name: &str, value: &str) -> bool {
        let known = self.form.update_by_name(&mut self.page, name, value);
        if let Ok(field) = name.parse::<FieldName>() {
            self.page.set_control_value(field, value);
        }
        known
    }

    /// Put a manual-edit span into edit mode, committing any other live
    /// session first
    pub fn begin_edit(&mut self, node: NodeId) -> Result<(), EditorError> {
        self.commit_session();
        let session = EditSession::begin(&mut self.page, node)?;
        self.session = Some(session);
        Ok(())
    }

    /// Keystroke in the live edit input
    pub fn edit_input(&mut self, value: &str) -> Result<(), EditorError> {
        let session = self.session.as_mut().ok_or(EditorError::NoActiveSession)?;
        session.input(&mut self.page, &self.registry, value);
        Ok(())
    }

    /// `keydown` in the live edit input. Returns the committed text when
    /// the key ends the session.
    pub fn edit_key(&mut self, key: &str) -> Result<Option<String>, EditorError> {
        if self.session.is_none() {
            return Err(EditorError::NoActiveSession);
        }
        if EditSession::is_commit_key(key) {
            Ok(self.commit_session())
        } else {
            Ok(None)
        }
    }

    /// Focus left the edit input
    pub fn blur(&mut self) -> Option<String> {
        self.commit_session()
    }

    fn commit_session(&mut self) -> Option<String> {
        let session = self.session.take()?;
        Some(session.commit(&mut self.page, &self.registry))
    }

    /// Click on a display node: manual-edit spans open for editing, any
    /// other node copies its card
    pub fn click_node(&mut self, node: NodeId, anchor: &Anchor, now: Millis) -> Result<ClickOutcome, EditorError> {
        let display = self.page.node(node).ok_or(EditorError::UnknownNode(node))?;
        let (manual, card) = (display.binding.is_manual(), display.card);

        if manual {
            self.begin_edit(node)?;
            return Ok(ClickOutcome::Editing { node });
        }

        match card {
            Some(card) => {
                let attempt = self.validate_and_copy(card, anchor, now)?;
                Ok(ClickOutcome::Copy { attempt })
            }
            None => Ok(ClickOutcome::Ignored),
        }
    }

    /// Copy a card if it is complete; otherwise steer the user to what is
    /// missing
    #[instrument(skip(self, anchor))]
    pub fn validate_and_copy(&mut self, card: CardId, anchor: &Anchor, now: Millis) -> Result<CopyAttempt, EditorError> {
        // A click elsewhere blurs the live input before the click lands
        self.commit_session();

        let verdict = CopyValidator::new(&self.page, &self.form).inspect(card)?;
        let attempt = match verdict {
            Verdict::NeedsForm { node } => {
                self.notices.show(
                    self.config.messages.form_required.clone(),
                    NoticeKind::Warning,
                    anchor,
                    now,
                    &mut self.scheduler,
                );
                self.panel.open();
                CopyAttempt::NeedsForm { node }
            }
            Verdict::NeedsEdit { node } => {
                self.begin_edit(node)?;
                CopyAttempt::NeedsEdit { node }
            }
            Verdict::Ready(text) => {
                match self.clipboard.copy(
                    &text,
                    anchor,
                    now,
                    &mut self.notices,
                    &mut self.scheduler,
                ) {
                    CopyOutcome::Copied => CopyAttempt::Copied { text },
                    CopyOutcome::Failed(e) => CopyAttempt::CopyFailed {
                        error: e.to_string(),
                    },
                }
            }
        };

        debug!(attempt = ?attempt, "Copy attempt finished");
        Ok(attempt)
    }

    /// Return every manual-edit span of a card (and its peers) to default
    pub fn reset_card(&mut self, card: CardId) -> Result<(), EditorError> {
        // The reset control takes focus from a live input before it fires
        self.commit_session();

        let keys: Vec<String> = self
            .page
            .card(card)
            .ok_or(EditorError::UnknownCard(card))?
            .nodes
            .iter()
            .filter_map(|id| self.page.node(*id))
            .filter_map(|n| n.binding.sync_key().map(str::to_string))
            .collect();

        for key in keys {
            self.registry.reset_group(&mut self.page, &key);
        }
        Ok(())
    }

    /// Clear the form except preserved fields and reset all manual edits
    pub fn clear_form(&mut self) {
        self.commit_session();

        let preserved = self.config.preserved_fields.clone();
        self.form.reset(&mut self.page, &preserved);
        for field in FieldName::ALL {
            if !preserved.contains(&field) {
                self.page.set_control_value(field, "");
            }
        }

        let keys: Vec<String> = self.registry.keys().map(str::to_string).collect();
        for key in keys {
            self.registry.reset_group(&mut self.page, &key);
        }
        info!(preserved = ?preserved, "Form cleared");
    }

    pub fn toggle_errand(&mut self, form: usize) -> Result<bool, EditorError> {
        self.errands.toggle(form)
    }

    pub fn errand_input(&mut self, form: usize, id: &str, value: &str) -> Result<(), EditorError> {
        self.errands.set_input(form, id, value)
    }

    pub fn copy_errand(&mut self, form: usize, now: Millis) -> Result<ErrandCopy, EditorError> {
        self.errands
            .copy(form, self.clipboard.sink_mut(), now, &mut self.scheduler)
    }

    pub fn clear_errand(&mut self, form: usize, now: Millis) -> Result<(), EditorError> {
        self.errands.clear(form, now, &mut self.scheduler)
    }

    /// Run every deferred task due at `now`
    pub fn tick(&mut self, now: Millis) -> usize {
        let due = self.scheduler.take_due(now);
        for task in &due {
            match task {
                TaskKind::DismissNotice => {
                    self.notices.dismiss();
                }
                other => self.errands.on_task(*other),
            }
        }
        due.len()
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            page: self.page.snapshot(),
            notice: self.notices.current().cloned(),
            panel_open: self.panel.is_open(),
            editing: self.session.as_ref().map(EditSession::node),
            errands: self.errands.forms().to_vec(),
        }
    }
}
