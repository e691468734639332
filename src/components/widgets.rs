//! Drawing helpers shared by the screens.

use crate::models::Badge;
use crate::tui::Frame;
use ratatui::{prelude::*, widgets::*};

pub const BACKGROUND: Color = Color::Rgb(16, 16, 28);
pub const BODY: Color = Color::Rgb(22, 22, 35);
pub const INPUT: Color = Color::Rgb(26, 26, 36);
pub const BORDER: Color = Color::Rgb(75, 75, 120);
pub const IDLE_BORDER: Color = Color::Rgb(140, 140, 200);
pub const FOCUS: Color = Color::Rgb(250, 250, 110);
pub const TITLE: Color = Color::Rgb(230, 230, 250);
pub const TEXT: Color = Color::Rgb(220, 220, 240);
pub const MUTED: Color = Color::Rgb(140, 140, 170);
pub const ERROR: Color = Color::Rgb(255, 100, 100);
pub const SUCCESS: Color = Color::Rgb(140, 219, 140);
pub const HIGHLIGHT: Color = Color::Rgb(40, 40, 65);

pub fn badge_color(badge: Badge) -> Color {
    match badge {
        Badge::Success => SUCCESS,
        Badge::Warning => Color::Rgb(250, 200, 90),
        Badge::Danger => ERROR,
        Badge::Info => Color::Rgb(129, 199, 245),
        Badge::Neutral => Color::Rgb(180, 180, 200),
    }
}

pub fn fill_background(frame: &mut Frame) {
    frame.render_widget(
        Block::default().style(Style::default().bg(BACKGROUND)),
        frame.area(),
    );
}

/// Title bar with a bottom border.
pub fn header(frame: &mut Frame, area: Rect, title: &str) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(BORDER))
        .style(Style::default().bg(BACKGROUND));
    frame.render_widget(block, area);

    let title = Paragraph::new(title.to_string())
        .style(
            Style::default()
                .fg(TITLE)
                .add_modifier(Modifier::BOLD)
                .bg(BACKGROUND),
        )
        .alignment(Alignment::Center);
    frame.render_widget(title, area);
}

pub fn help_line(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text.to_string())
        .style(Style::default().fg(MUTED))
        .alignment(Alignment::Center);
    frame.render_widget(help, area);
}

/// `► Label ◄` when selected.
pub fn button(label: &str, selected: bool, color: Color) -> Paragraph<'static> {
    let (text, style) = if selected {
        (
            format!("► {label} ◄"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            format!("  {label}  "),
            Style::default().fg(Color::Rgb(180, 180, 200)),
        )
    };
    Paragraph::new(text).style(style).alignment(Alignment::Center)
}

/// Yes/No dialog centred in `area`. `selected` is 0 for Yes, 1 for No.
pub fn confirm_dialog(frame: &mut Frame, area: Rect, title: &str, message: &str, selected: usize) {
    let width = (message.chars().count() as u16 + 8).clamp(40, area.width.max(40));
    let height = 8;
    let dialog_area = Rect::new(
        area.width.saturating_sub(width) / 2,
        area.height.saturating_sub(height) / 2,
        width.min(area.width),
        height.min(area.height),
    );

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(Style::default().fg(TITLE).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(IDLE_BORDER))
        .style(Style::default().bg(Color::Rgb(30, 30, 46)));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(inner);

    let text = Paragraph::new(message.to_string())
        .style(
            Style::default()
                .fg(TEXT)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(text, layout[0]);

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[1]);
    frame.render_widget(button("Yes", selected == 0, SUCCESS), buttons[0]);
    frame.render_widget(button("No", selected == 1, ERROR), buttons[1]);
}
