//! Inline notice shown next to the control that started an operation.

use featuretour_core::{OperationSnapshot, OperationStatus, Theme};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

/// What the notice is reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// A request is in flight
    Pending,
    /// The last request was confirmed
    Success,
    /// The last request failed or was rejected
    Error,
}

/// Single bordered message, colored by kind
#[derive(Debug, Clone)]
pub struct Notice<'a> {
    kind: NoticeKind,
    text: String,
    theme: &'a Theme,
}

impl<'a> Notice<'a> {
    /// Creates a notice
    pub fn new(kind: NoticeKind, text: impl Into<String>, theme: &'a Theme) -> Self {
        Notice {
            kind,
            text: text.into(),
            theme,
        }
    }

    /// Notice for the state of an operation.
    ///
    /// `Pending` shows `pending_text`, `Failed` shows the operation's error
    /// message, and `Idle` shows nothing.
    pub fn for_snapshot<S>(
        snapshot: &OperationSnapshot<S>,
        pending_text: &str,
        theme: &'a Theme,
    ) -> Option<Self> {
        match snapshot.status {
            OperationStatus::Idle => None,
            OperationStatus::Pending => Some(Notice::new(NoticeKind::Pending, pending_text, theme)),
            OperationStatus::Failed => snapshot
                .error_message
                .as_deref()
                .map(|message| Notice::new(NoticeKind::Error, message, theme)),
        }
    }

    /// Kind of this notice
    pub fn kind(&self) -> NoticeKind {
        self.kind
    }

    /// Message text
    pub fn text(&self) -> &str {
        &self.text
    }

    fn color(&self) -> Color {
        match self.kind {
            NoticeKind::Pending => self.theme.colors.warning,
            NoticeKind::Success => self.theme.colors.success,
            NoticeKind::Error => self.theme.colors.error,
        }
    }
}

impl Widget for Notice<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let color = self.color();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        Paragraph::new(self.text)
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(status: OperationStatus, message: Option<&str>) -> OperationSnapshot<i64> {
        OperationSnapshot {
            committed: 0,
            speculative: 0,
            status,
            error_message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_idle_has_no_notice() {
        let theme = Theme::dark();
        assert!(Notice::for_snapshot(&snapshot(OperationStatus::Idle, None), "...", &theme).is_none());
    }

    #[test]
    fn test_pending_notice() {
        let theme = Theme::dark();
        let notice = Notice::for_snapshot(
            &snapshot(OperationStatus::Pending, None),
            "Updating...",
            &theme,
        )
        .expect("pending notice");
        assert_eq!(notice.kind(), NoticeKind::Pending);
        assert_eq!(notice.text(), "Updating...");
    }

    #[test]
    fn test_failed_notice_carries_message() {
        let theme = Theme::dark();
        let notice = Notice::for_snapshot(
            &snapshot(OperationStatus::Failed, Some("Server error")),
            "Updating...",
            &theme,
        )
        .expect("error notice");
        assert_eq!(notice.kind(), NoticeKind::Error);
        assert_eq!(notice.text(), "Server error");
    }

    #[test]
    fn test_render_uses_kind_color() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        Notice::new(NoticeKind::Success, "Saved", &theme).render(area, &mut buf);

        assert_eq!(buf[(1, 1)].symbol(), "S");
        assert_eq!(buf[(1, 1)].fg, theme.colors.success);
        assert_eq!(buf[(0, 0)].fg, theme.colors.success);
    }
}
