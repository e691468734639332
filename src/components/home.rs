use crate::app::{ResourceKind, Route};
use crate::components::widgets;
use crate::components::{Action, Component};
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Padding, Paragraph},
};

const RESOURCES_PANEL: usize = 0;
const ACTIONS_PANEL: usize = 1;

const ACTIONS: [&str; 2] = ["List", "Create"];

pub struct Home {
    backend_url: String,
    show_quit_dialog: bool,
    quit_dialog_selected: usize,
    active_panel: usize,
    selected_resource: usize,
    selected_action: usize,
}

impl Home {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            show_quit_dialog: false,
            quit_dialog_selected: 1,
            active_panel: RESOURCES_PANEL,
            selected_resource: 0,
            selected_action: 0,
        }
    }

    fn selected_kind(&self) -> ResourceKind {
        ResourceKind::ALL[self.selected_resource]
    }

    fn route(&self) -> Route {
        let kind = self.selected_kind();
        if self.selected_action == 0 {
            Route::list(kind)
        } else {
            Route::create(kind)
        }
    }

    fn handle_quit_dialog_input(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Left | KeyCode::Right => {
                self.quit_dialog_selected = 1 - self.quit_dialog_selected;
            }
            KeyCode::Enter => {
                self.show_quit_dialog = false;
                if self.quit_dialog_selected == 0 {
                    return Some(Action::Quit);
                }
            }
            KeyCode::Esc => self.show_quit_dialog = false,
            _ => {}
        }
        None
    }

    fn menu_items<'a>(
        labels: impl Iterator<Item = &'a str>,
        selected: usize,
        active: bool,
    ) -> Vec<ListItem<'a>> {
        labels
            .enumerate()
            .map(|(idx, label)| {
                let style = match (idx == selected, active) {
                    (true, true) => Style::default()
                        .fg(widgets::FOCUS)
                        .add_modifier(Modifier::BOLD),
                    (true, false) => Style::default()
                        .fg(widgets::SUCCESS)
                        .add_modifier(Modifier::BOLD),
                    _ => Style::default().fg(Color::Rgb(200, 200, 220)),
                };
                let prefix = if idx == selected { " ► " } else { "   " };
                ListItem::new(format!("{prefix}{label}")).style(style)
            })
            .collect()
    }

    fn panel(title: &str, active: bool) -> Block<'static> {
        Block::default()
            .title(format!(" {title} "))
            .title_style(
                Style::default()
                    .fg(widgets::TITLE)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if active {
                widgets::FOCUS
            } else {
                widgets::IDLE_BORDER
            }))
            .style(Style::default().bg(widgets::BODY))
    }
}

impl Component for Home {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.show_quit_dialog {
            return Ok(self.handle_quit_dialog_input(key));
        }

        let count = ResourceKind::ALL.len();
        match key.code {
            KeyCode::Left => self.active_panel = RESOURCES_PANEL,
            KeyCode::Right | KeyCode::Tab => self.active_panel = ACTIONS_PANEL,
            KeyCode::Up => {
                if self.active_panel == RESOURCES_PANEL {
                    self.selected_resource = (self.selected_resource + count - 1) % count;
                } else {
                    self.selected_action =
                        (self.selected_action + ACTIONS.len() - 1) % ACTIONS.len();
                }
            }
            KeyCode::Down => {
                if self.active_panel == RESOURCES_PANEL {
                    self.selected_resource = (self.selected_resource + 1) % count;
                } else {
                    self.selected_action = (self.selected_action + 1) % ACTIONS.len();
                }
            }
            KeyCode::Enter => {
                if self.active_panel == ACTIONS_PANEL {
                    return Ok(Some(Action::Open(self.route())));
                }
                self.active_panel = ACTIONS_PANEL;
            }
            KeyCode::Esc => {
                if self.active_panel == ACTIONS_PANEL {
                    self.active_panel = RESOURCES_PANEL;
                } else {
                    self.show_quit_dialog = true;
                    self.quit_dialog_selected = 1;
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame) {
        widgets::fill_background(frame);
        let area = frame.area();

        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(12),
                Constraint::Length(3),
            ])
            .split(area);

        let welcome_text = Line::from(vec![
            Span::styled(
                "Clinic administration · ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                self.backend_url.as_str(),
                Style::default()
                    .fg(Color::Rgb(129, 199, 245))
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        let welcome_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(widgets::BORDER))
            .style(Style::default().bg(Color::Rgb(24, 24, 40)));
        let welcome_inner = welcome_block.inner(main_layout[0]);
        frame.render_widget(welcome_block, main_layout[0]);
        frame.render_widget(
            Paragraph::new(welcome_text)
                .alignment(Alignment::Center)
                .block(Block::default().padding(Padding::new(0, 0, 1, 0))),
            welcome_inner,
        );

        frame.render_widget(
            Paragraph::new("Please select a resource:")
                .style(Style::default().fg(Color::Rgb(180, 190, 254)))
                .alignment(Alignment::Center),
            main_layout[1],
        );

        let content_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .spacing(2)
            .margin(1)
            .split(main_layout[2]);

        let resources_active = self.active_panel == RESOURCES_PANEL;
        let resources = Self::panel("Clinic", resources_active);
        let resources_inner = resources.inner(content_layout[0]);
        frame.render_widget(resources, content_layout[0]);
        let resource_items = Self::menu_items(
            ResourceKind::ALL.iter().map(|kind| kind.label()),
            self.selected_resource,
            resources_active,
        );
        frame.render_widget(
            List::new(resource_items).block(Block::default().padding(Padding::new(0, 0, 1, 0))),
            resources_inner,
        );

        let actions = Self::panel(self.selected_kind().label(), !resources_active);
        let actions_inner = actions.inner(content_layout[1]);
        frame.render_widget(actions, content_layout[1]);
        let action_items =
            Self::menu_items(ACTIONS.iter().copied(), self.selected_action, !resources_active);
        frame.render_widget(
            List::new(action_items).block(Block::default().padding(Padding::new(2, 0, 2, 0))),
            actions_inner,
        );

        widgets::help_line(
            frame,
            main_layout[3],
            "←→: Switch panels | ↑↓: Navigate | Enter: Select | Esc: Quit | Ctrl+Q: Quit",
        );

        if self.show_quit_dialog {
            widgets::confirm_dialog(
                frame,
                area,
                "Confirm Quit",
                "Are you sure you want to quit?",
                self.quit_dialog_selected,
            );
        }
    }
}
