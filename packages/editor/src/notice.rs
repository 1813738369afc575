//! Transient notices ("Copied!", validation hints) shown next to the
//! element that triggered them.

use crate::scheduler::{Millis, Scheduler, TaskKind};
use scriptcard_page::{Anchor, Position, Size};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    Success,
    Warning,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    pub position: Position,
}

/// The single notice slot of a page
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    current: Option<Notice>,
    size: Size,
    gap: f64,
    duration: Millis,
}

impl NoticeBoard {
    pub fn new(size: Size, gap: f64, duration: Millis) -> Self {
        Self {
            current: None,
            size,
            gap,
            duration,
        }
    }

    /// Show `message` above `anchor`, replacing any visible notice and
    /// restarting the dismiss timer
    pub fn show(
        &mut self,
        message: impl Into<String>,
        kind: NoticeKind,
        anchor: &Anchor,
        now: Millis,
        scheduler: &mut Scheduler<TaskKind>,
    ) -> &Notice {
        let notice = Notice {
            message: message.into(),
            kind,
            position: anchor.place_above(self.size, self.gap),
        };
        let due = scheduler.schedule(TaskKind::DismissNotice, now, self.duration);
        debug!(message = %notice.message, kind = ?kind, due, "Showing notice");
        self.current.insert(notice)
    }

    pub fn dismiss(&mut self) -> Option<Notice> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptcard_page::{Rect, ScrollOffset};

    fn board() -> NoticeBoard {
        NoticeBoard::new(
            Size {
                width: 100.0,
                height: 20.0,
            },
            10.0,
            2_000,
        )
    }

    #[test]
    fn test_show_positions_above_anchor_and_schedules_dismissal() {
        let mut board = board();
        let mut scheduler = Scheduler::new();
        let anchor = Anchor::new(Rect::new(50.0, 200.0, 300.0, 60.0), ScrollOffset::default());

        let notice = board.show("Copied!", NoticeKind::Success, &anchor, 500, &mut scheduler);

        assert_eq!(notice.position, Position { top: 170.0, left: 150.0 });
        assert_eq!(scheduler.due(TaskKind::DismissNotice), Some(2_500));
    }

    #[test]
    fn test_new_notice_replaces_old_and_resets_timer() {
        let mut board = board();
        let mut scheduler = Scheduler::new();
        let anchor = Anchor::default();

        board.show("first", NoticeKind::Warning, &anchor, 0, &mut scheduler);
        board.show("second", NoticeKind::Success, &anchor, 1_000, &mut scheduler);

        assert_eq!(board.current().unwrap().message, "second");
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.due(TaskKind::DismissNotice), Some(3_000));
    }

    #[test]
    fn test_dismiss() {
        let mut board = board();
        let mut scheduler = Scheduler::new();
        board.show("x", NoticeKind::Failure, &Anchor::default(), 0, &mut scheduler);

        assert!(board.dismiss().is_some());
        assert!(board.current().is_none());
    }
}
