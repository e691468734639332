//! Transient notifications shown in a screen footer.

use crate::tui::Frame;
use ratatui::{prelude::*, widgets::*};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    shown_at: Instant,
}

/// Holds the latest notification until it expires.
pub struct Notices {
    current: Option<Notice>,
    ttl: Duration,
}

impl Notices {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    fn show(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.current = Some(Notice {
            kind,
            message: message.into(),
            shown_at: Instant::now(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(NoticeKind::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.show(NoticeKind::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(NoticeKind::Error, message);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn expire(&mut self, now: Instant) {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|n| now.saturating_duration_since(n.shown_at) > self.ttl);
        if expired {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(notice) = &self.current else {
            return;
        };
        let (prefix, color) = match notice.kind {
            NoticeKind::Success => ("✓", Color::Rgb(140, 219, 140)),
            NoticeKind::Warning => ("!", Color::Rgb(250, 200, 90)),
            NoticeKind::Error => ("✗", Color::Rgb(255, 100, 100)),
        };
        let paragraph = Paragraph::new(format!("{prefix} {}", notice.message))
            .style(
                Style::default()
                    .fg(color)
                    .add_modifier(Modifier::BOLD)
                    .bg(Color::Rgb(16, 16, 28)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}
