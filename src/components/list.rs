//! Generic list screen: the cached collection of one entity as a table.
//!
//! The screen subscribes to the entity's store when it is created and
//! issues `list_all` on its first tick, so it shows both the initial fetch
//! and any refresh triggered by another screen. Dropping the screen drops
//! the subscription.

use crate::api::client::Entity;
use crate::api::clinic::Clinic;
use crate::api::store::{Snapshot, Subscription};
use crate::app::Route;
use crate::components::clinic::{CellText, ListOutcome, ResourceScreen};
use crate::components::notice::Notices;
use crate::components::widgets::{self, badge_color};
use crate::components::{Action, Component};
use crate::config::Config;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use std::sync::Arc;
use std::time::Instant;

const YES: usize = 0;
const NO: usize = 1;

/// Delete awaiting confirmation.
struct PendingDelete {
    id: u64,
    prompt: String,
    choice: usize,
}

pub struct ListView<E: ResourceScreen> {
    clinic: Arc<Clinic>,
    subscription: Subscription<E>,
    records: Snapshot<E>,
    state: TableState,
    show_details: bool,
    search_input: String,
    is_searching: bool,
    pending_delete: Option<PendingDelete>,
    /// Set until the first tick issues the initial fetch.
    loading: bool,
    notices: Notices,
}

impl<E: ResourceScreen> ListView<E> {
    pub fn new(clinic: Arc<Clinic>, config: &Config) -> Self {
        let subscription = E::client(&clinic).subscribe();
        let records = subscription.latest();
        Self {
            clinic,
            subscription,
            records,
            state: TableState::default(),
            show_details: false,
            search_input: String::new(),
            is_searching: false,
            pending_delete: None,
            loading: true,
            notices: Notices::new(config.notice_ttl()),
        }
    }

    /// Re-lists the collection. A failure keeps the rows on screen and
    /// shows an error.
    fn reload(&mut self) {
        self.loading = false;
        match E::client(&self.clinic).list_all() {
            Ok(_) => self.sync(),
            Err(e) => self
                .notices
                .error(format!("Could not load {}: {e}", E::TITLE.to_lowercase())),
        }
    }

    /// Picks up the latest store snapshot if it changed.
    fn sync(&mut self) {
        if let Some(records) = self.subscription.poll() {
            self.records = records;
            self.clamp_selection();
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.visible().len();
        if count == 0 {
            self.state.select(None);
            self.show_details = false;
        } else {
            let selection = self.state.selected().unwrap_or(0).min(count - 1);
            self.state.select(Some(selection));
        }
    }

    /// Records matching the search input, in store order.
    fn visible(&self) -> Vec<&E> {
        let needle = self.search_input.trim().to_lowercase();
        self.records
            .iter()
            .filter(|record| {
                needle.is_empty()
                    || record
                        .cells()
                        .iter()
                        .any(|cell| cell.text.to_lowercase().contains(&needle))
            })
            .collect()
    }

    fn selected(&self) -> Option<&E> {
        let index = self.state.selected()?;
        self.visible().get(index).copied()
    }

    fn select_next(&mut self) {
        let count = self.visible().len();
        if count == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < count => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    fn select_previous(&mut self) {
        let count = self.visible().len();
        if count == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn ask_delete(&mut self) {
        let pending = self.selected().map(|record| PendingDelete {
            id: record.id(),
            prompt: record.delete_prompt(),
            choice: NO,
        });
        if pending.is_some() {
            self.pending_delete = pending;
        }
    }

    fn delete(&mut self, id: u64) {
        match E::client(&self.clinic).remove(id) {
            Ok(()) => {
                E::after_mutation(&self.clinic);
                self.sync();
                self.notices.success(format!("Deleted {} #{id}", E::SINGULAR));
            }
            Err(e) => self
                .notices
                .error(format!("Could not delete {} #{id}: {e}", E::SINGULAR)),
        }
    }

    fn handle_confirm(&mut self, key: KeyEvent) {
        let Some(pending) = self.pending_delete.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                pending.choice = if pending.choice == YES { NO } else { YES };
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => pending.choice = YES,
            KeyCode::Char('n') | KeyCode::Char('N') => pending.choice = NO,
            KeyCode::Enter => {
                let confirmed = pending.choice == YES;
                let id = pending.id;
                self.pending_delete = None;
                if confirmed {
                    self.delete(id);
                }
            }
            KeyCode::Esc => self.pending_delete = None,
            _ => {}
        }
    }

    fn handle_search(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.search_input.push(c),
            KeyCode::Backspace => {
                self.search_input.pop();
            }
            KeyCode::Enter | KeyCode::Down | KeyCode::Tab => self.is_searching = false,
            KeyCode::Esc => {
                self.search_input.clear();
                self.is_searching = false;
            }
            _ => return,
        }
        self.clamp_selection();
    }

    fn run_list_action(&mut self, key: char) -> Option<Action> {
        let record = self.selected()?.clone();
        match E::list_action(&self.clinic, &record, key)? {
            ListOutcome::Navigate(route) => return Some(Action::Open(route)),
            ListOutcome::Done(message) => {
                E::after_mutation(&self.clinic);
                self.sync();
                self.notices.success(message);
            }
            ListOutcome::Failed(message) => self.notices.error(message),
        }
        None
    }

    fn help_text(&self) -> String {
        let mut help = String::from("↑↓: Navigate | Enter: Details | N: New | E: Edit | D: Delete");
        for (key, description) in E::list_keys() {
            help.push_str(&format!(" | {}: {description}", key.to_ascii_uppercase()));
        }
        help.push_str(" | R: Refresh | /: Search | B: Back");
        help
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let columns = E::columns();
        let header_cells = columns
            .iter()
            .map(|(title, _)| Cell::from(*title).style(Style::default().fg(widgets::TITLE)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(widgets::INPUT))
            .height(1)
            .bottom_margin(1);

        let rows = self.visible().into_iter().map(|record| {
            let cells = record.cells().into_iter().map(|CellText { text, badge }| match badge {
                Some(badge) => Cell::from(text).style(
                    Style::default()
                        .fg(badge_color(badge))
                        .add_modifier(Modifier::BOLD),
                ),
                None => Cell::from(text),
            });
            Row::new(cells).height(1)
        });

        let title = if self.loading {
            format!(" Loading {}... ", E::TITLE.to_lowercase())
        } else {
            format!(" {} ({}) ", E::KIND.label(), self.visible().len())
        };

        let table = Table::new(rows, columns.iter().map(|(_, width)| *width))
            .header(header)
            .block(
                Block::default()
                    .title(title)
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(widgets::BORDER))
                    .style(Style::default().bg(widgets::BODY)),
            )
            .row_highlight_style(
                Style::default()
                    .bg(widgets::HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("► ");

        frame.render_stateful_widget(table, area, &mut self.state.clone());
    }

    fn render_details(&self, frame: &mut Frame, area: Rect, record: &E) {
        let lines: Vec<Line> = record
            .details()
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(
                        format!("{label}: "),
                        Style::default()
                            .fg(widgets::MUTED)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(value, Style::default().fg(widgets::TEXT)),
                ])
            })
            .collect();

        let details = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(format!(" {} #{} ", E::SINGULAR, record.id()))
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(widgets::BORDER))
                    .style(Style::default().bg(widgets::BODY)),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(details, area);
    }

    fn render_search(&self, frame: &mut Frame, area: Rect) {
        let border = if self.is_searching {
            widgets::FOCUS
        } else {
            widgets::BORDER
        };
        let text = if self.search_input.is_empty() && !self.is_searching {
            "Press / to search".to_string()
        } else {
            self.search_input.clone()
        };
        let search = Paragraph::new(text)
            .style(Style::default().fg(widgets::TEXT).bg(widgets::INPUT))
            .block(
                Block::default()
                    .title(" Search ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(border)),
            );
        frame.render_widget(search, area);
    }
}

impl<E: ResourceScreen> Component for ListView<E> {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.pending_delete.is_some() {
            self.handle_confirm(key);
            return Ok(None);
        }
        if self.is_searching {
            self.handle_search(key);
            return Ok(None);
        }

        match key.code {
            KeyCode::Down => self.select_next(),
            KeyCode::Up => self.select_previous(),
            KeyCode::Enter => {
                if self.selected().is_some() {
                    self.show_details = !self.show_details;
                }
            }
            KeyCode::Char('/') => self.is_searching = true,
            KeyCode::Char('n') | KeyCode::Char('N') => {
                return Ok(Some(Action::Open(Route::create(E::KIND))));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(record) = self.selected() {
                    return Ok(Some(Action::Open(Route::edit(E::KIND, record.id()))));
                }
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => self.ask_delete(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reload(),
            KeyCode::Char('b') | KeyCode::Char('B') => return Ok(Some(Action::Home)),
            KeyCode::Esc => {
                if self.show_details {
                    self.show_details = false;
                } else {
                    return Ok(Some(Action::Home));
                }
            }
            KeyCode::Char(c) if E::list_keys().iter().any(|(k, _)| *k == c) => {
                return Ok(self.run_list_action(c));
            }
            _ => {}
        }
        Ok(None)
    }

    fn on_tick(&mut self, now: Instant) -> Option<Action> {
        if self.loading {
            self.reload();
        }
        self.sync();
        self.notices.expire(now);
        None
    }

    fn render(&self, frame: &mut Frame) {
        widgets::fill_background(frame);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Search
                Constraint::Min(8),    // Table and details
                Constraint::Length(1), // Help
                Constraint::Length(2), // Notice
            ])
            .margin(1)
            .split(frame.area());

        widgets::header(frame, layout[0], E::TITLE);
        self.render_search(frame, layout[1]);

        match self.selected().filter(|_| self.show_details) {
            Some(record) => {
                let body = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .split(layout[2]);
                self.render_table(frame, body[0]);
                self.render_details(frame, body[1], record);
            }
            None => self.render_table(frame, layout[2]),
        }

        widgets::help_line(frame, layout[3], &self.help_text());
        self.notices.render(frame, layout[4]);

        if let Some(pending) = &self.pending_delete {
            widgets::confirm_dialog(
                frame,
                frame.area(),
                "Confirm Delete",
                &pending.prompt,
                pending.choice,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use crate::components::notice::NoticeKind;
    use crate::models::payment::Payment;
    use crate::models::specialty::Specialty;
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn seed_payment(backend: &MockBackend) -> u64 {
        backend.seed(
            "payments",
            json!({"payment_method": "EFECTIVO", "amount": "150.00", "appointment_id": 4,
                   "payment_status": "RECIBIDO"}),
        )
    }

    fn payments_view(backend: &Arc<MockBackend>) -> (Arc<Clinic>, ListView<Payment>) {
        let clinic = Arc::new(Clinic::new(backend.clone()));
        let mut view = ListView::<Payment>::new(clinic.clone(), &Config::default());
        view.on_tick(Instant::now());
        (clinic, view)
    }

    #[test]
    fn first_tick_loads_the_collection() {
        let backend = MockBackend::new();
        seed_payment(&backend);
        let (_, view) = payments_view(&backend);
        assert!(!view.loading);
        assert_eq!(view.visible().len(), 1);
        assert_eq!(view.state.selected(), Some(0));
    }

    #[test]
    fn delete_defaults_to_no() {
        let backend = MockBackend::new();
        seed_payment(&backend);
        let (_, mut view) = payments_view(&backend);

        view.handle_input(key(KeyCode::Char('d'))).unwrap();
        assert_eq!(view.pending_delete.as_ref().unwrap().choice, NO);
        view.handle_input(key(KeyCode::Enter)).unwrap();

        assert!(view.pending_delete.is_none());
        assert_eq!(view.visible().len(), 1);
        assert_eq!(backend.request_count(), 1);
    }

    #[test]
    fn confirmed_delete_removes_the_payment_everywhere() {
        let backend = MockBackend::new();
        let id = seed_payment(&backend);
        let (clinic, mut view) = payments_view(&backend);
        assert_eq!(view.visible()[0].amount.raw(), "150.00");

        view.handle_input(key(KeyCode::Delete)).unwrap();
        view.handle_input(key(KeyCode::Left)).unwrap();
        view.handle_input(key(KeyCode::Enter)).unwrap();

        assert!(view.visible().is_empty());
        assert_eq!(view.state.selected(), None);
        let notice = view.notices.current().unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.message, format!("Deleted payment #{id}"));
        assert!(clinic.payments.list_all().unwrap().is_empty());
    }

    #[test]
    fn failed_delete_keeps_the_row() {
        let backend = MockBackend::new();
        seed_payment(&backend);
        let (_, mut view) = payments_view(&backend);

        backend.fail_next(500, r#"{"detail": "boom"}"#);
        view.handle_input(key(KeyCode::Char('d'))).unwrap();
        view.handle_input(key(KeyCode::Char('y'))).unwrap();
        view.handle_input(key(KeyCode::Enter)).unwrap();

        assert_eq!(view.visible().len(), 1);
        assert_eq!(view.notices.current().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn failed_listing_becomes_a_notice() {
        let backend = MockBackend::new();
        backend.set_offline(true);
        let (_, view) = payments_view(&backend);
        assert!(!view.loading);
        assert!(view.visible().is_empty());
        let notice = view.notices.current().unwrap();
        assert!(notice.message.starts_with("Could not load payments"));
    }

    #[test]
    fn search_filters_rendered_cells_only() {
        let backend = MockBackend::new();
        backend.seed("specialties", json!({"specialtyname": "Cardiología"}));
        backend.seed("specialties", json!({"specialtyname": "Pediatría"}));
        let clinic = Arc::new(Clinic::new(backend.clone()));
        let mut view = ListView::<Specialty>::new(clinic, &Config::default());
        view.on_tick(Instant::now());

        view.handle_input(key(KeyCode::Char('/'))).unwrap();
        for c in "CARD".chars() {
            view.handle_input(key(KeyCode::Char(c))).unwrap();
        }
        let visible = view.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].specialtyname, "Cardiología");
        assert_eq!(backend.request_count(), 1);

        view.handle_input(key(KeyCode::Esc)).unwrap();
        assert_eq!(view.visible().len(), 2);
    }

    #[test]
    fn refresh_elsewhere_reaches_the_view() {
        let backend = MockBackend::new();
        let (clinic, mut view) = payments_view(&backend);
        assert!(view.visible().is_empty());

        seed_payment(&backend);
        clinic.payments.refresh();
        view.on_tick(Instant::now());
        assert_eq!(view.visible().len(), 1);
    }

    #[test]
    fn navigation_keys() {
        let backend = MockBackend::new();
        let id = seed_payment(&backend);
        let (_, mut view) = payments_view(&backend);

        assert_eq!(
            view.handle_input(key(KeyCode::Char('e'))).unwrap(),
            Some(Action::Open(Route::edit(Payment::KIND, id)))
        );
        assert_eq!(
            view.handle_input(key(KeyCode::Char('n'))).unwrap(),
            Some(Action::Open(Route::create(Payment::KIND)))
        );
        view.handle_input(key(KeyCode::Enter)).unwrap();
        assert_eq!(view.handle_input(key(KeyCode::Esc)).unwrap(), None);
        assert_eq!(
            view.handle_input(key(KeyCode::Esc)).unwrap(),
            Some(Action::Home)
        );
    }
}
