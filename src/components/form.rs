//! Generic create/update screen.

use crate::api::clinic::Clinic;
use crate::app::Route;
use crate::components::clinic::ResourceScreen;
use crate::components::notice::Notices;
use crate::components::widgets;
use crate::components::{Action, Component};
use crate::config::Config;
use crate::forms::field::FieldKind;
use crate::forms::{FormMode, FormPhase, FormState, SubmitBlocked};
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct FormView<E: ResourceScreen> {
    clinic: Arc<Clinic>,
    form: FormState,
    /// Values set by the screen that opened this form.
    preset: Vec<(&'static str, String)>,
    /// Field index, then Save, then Cancel.
    focus: usize,
    load_error: Option<String>,
    /// The record being edited, kept for reference retries.
    current: Option<E>,
    /// Set while choice lists could not be fetched; Ctrl+R retries them.
    references_error: Option<String>,
    redirect_delay: Duration,
    notices: Notices,
    entity: PhantomData<E>,
}

impl<E: ResourceScreen> FormView<E> {
    pub fn new(
        clinic: Arc<Clinic>,
        config: &Config,
        mode: FormMode,
        preset: Vec<(&'static str, String)>,
    ) -> Self {
        Self {
            clinic,
            form: FormState::new(mode, E::form_fields(mode)),
            preset,
            focus: 0,
            load_error: None,
            current: None,
            references_error: None,
            redirect_delay: config.redirect_delay(),
            notices: Notices::new(config.notice_ttl()),
            entity: PhantomData,
        }
    }

    fn save_button(&self) -> usize {
        self.form.len()
    }

    fn cancel_button(&self) -> usize {
        self.form.len() + 1
    }

    fn back_to_list() -> Action {
        Action::Open(Route::list(E::KIND))
    }

    /// Fetches the edited record, then the reference collections, then
    /// fills the fields.
    fn load(&mut self) {
        self.form.begin_loading();

        self.current = match self.form.mode() {
            FormMode::Create => None,
            FormMode::Edit(id) => match E::client(&self.clinic).get_by_id(id) {
                Ok(record) => Some(record),
                Err(e) => {
                    let message = if e.is_not_found() {
                        format!("{} #{id} was not found", capitalized(E::SINGULAR))
                    } else {
                        format!("Could not load {} #{id}: {e}", E::SINGULAR)
                    };
                    self.notices.error(message.clone());
                    self.load_error = Some(message);
                    return;
                }
            },
        };

        self.load_references();
        if let Some(record) = &self.current {
            record.prefill(&mut self.form);
        }
        for (key, value) in &self.preset {
            self.form.set_value(key, value.clone());
        }

        self.load_error = None;
        self.form.mark_ready();
    }

    /// Fills the choice lists. Field values are left alone, so a retry keeps
    /// what the user already typed.
    fn load_references(&mut self) {
        match E::load_references(&self.clinic, &mut self.form, self.current.as_ref()) {
            Ok(()) => self.references_error = None,
            Err(e) => {
                tracing::warn!(entity = E::SINGULAR, error = %e, "reference data unavailable");
                let message = format!("Could not load reference data: {e}");
                self.notices.warning(message.clone());
                self.references_error = Some(message);
            }
        }
    }

    fn submit(&mut self) {
        let values = match self.form.begin_submit() {
            Ok(values) => values,
            Err(SubmitBlocked::Invalid) => {
                self.notices.error("Please correct the highlighted fields");
                return;
            }
            Err(SubmitBlocked::NotReady) => return,
        };

        let mode = self.form.mode();
        match E::submit(&self.clinic, mode, &values) {
            Ok(()) => {
                E::after_mutation(&self.clinic);
                self.form.submit_succeeded(Instant::now());
                let verb = match mode {
                    FormMode::Create => "created",
                    FormMode::Edit(_) => "updated",
                };
                self.notices.success(format!("{} {verb} successfully", capitalized(E::SINGULAR)));
            }
            Err(e) => {
                let message = self.form.submit_failed(&e, E::SINGULAR);
                self.notices.error(message);
            }
        }
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % (self.form.len() + 2);
    }

    fn focus_previous(&mut self) {
        let count = self.form.len() + 2;
        self.focus = (self.focus + count - 1) % count;
    }

    fn is_choice(&self, index: usize) -> bool {
        matches!(
            self.form.fields().get(index).map(|f| &f.kind),
            Some(FieldKind::Choice(_))
        )
    }

    fn render_field(&self, frame: &mut Frame, area: Rect, index: usize) {
        let spec = &self.form.fields()[index];
        let focused = self.focus == index;
        let error = self.form.field_error(index);

        let label = if spec.is_required() {
            format!(" {}* ", spec.label)
        } else {
            format!(" {} (optional) ", spec.label)
        };
        let value = self.form.display_value(index);
        let text = if focused && self.is_choice(index) {
            format!("◄ {value} ►")
        } else if focused {
            format!("{value}▏")
        } else {
            value
        };

        let border = if focused {
            widgets::FOCUS
        } else if error.is_some() {
            widgets::ERROR
        } else {
            widgets::IDLE_BORDER
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(Span::styled(label, Style::default().fg(widgets::TITLE)))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(widgets::INPUT));
        if let Some(error) = error {
            block = block.title_bottom(Span::styled(
                format!(" {error} "),
                Style::default().fg(widgets::ERROR),
            ));
        }

        let input = Paragraph::new(text)
            .style(Style::default().fg(widgets::TEXT).bg(widgets::INPUT))
            .block(block);
        frame.render_widget(input, area);
    }

    fn title(&self) -> String {
        match self.form.mode() {
            FormMode::Create => format!("NEW {}", E::SINGULAR.to_uppercase()),
            FormMode::Edit(id) => format!("EDIT {} #{id}", E::SINGULAR.to_uppercase()),
        }
    }

    fn status_text(&self) -> String {
        if let Some(error) = &self.load_error {
            return format!("{error} | Ctrl+R: Retry | Esc: Back");
        }
        match self.form.phase() {
            FormPhase::Idle | FormPhase::LoadingReferences => "Loading...".to_string(),
            FormPhase::Submitting => "Saving...".to_string(),
            FormPhase::Succeeded { .. } => "Saved. Returning to the list...".to_string(),
            FormPhase::Ready if self.references_error.is_some() => {
                "Reference data missing | Ctrl+R: Retry | Esc: Cancel".to_string()
            }
            FormPhase::Ready => {
                "Tab/↑↓: Move | ←→: Change option | Enter: Select | Esc: Cancel".to_string()
            }
        }
    }
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl<E: ResourceScreen> Component for FormView<E> {
    fn handle_input(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Esc {
            return Ok(Some(Self::back_to_list()));
        }
        let retry = key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL);
        if self.load_error.is_some() {
            if retry {
                self.load();
            }
            return Ok(None);
        }
        if self.form.phase() != FormPhase::Ready {
            return Ok(None);
        }
        if retry {
            if self.references_error.is_some() {
                self.load_references();
            }
            return Ok(None);
        }

        let on_field = self.focus < self.form.len();
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_previous(),
            KeyCode::Left | KeyCode::Right if on_field => {
                self.form.cycle_choice(self.focus, key.code == KeyCode::Right);
            }
            KeyCode::Left | KeyCode::Right => {
                self.focus = if self.focus == self.save_button() {
                    self.cancel_button()
                } else {
                    self.save_button()
                };
            }
            KeyCode::Char(c) if on_field => self.form.push_char(self.focus, c),
            KeyCode::Backspace if on_field => self.form.pop_char(self.focus),
            KeyCode::Enter => {
                if self.focus == self.save_button() {
                    self.submit();
                } else if self.focus == self.cancel_button() {
                    return Ok(Some(Self::back_to_list()));
                } else {
                    self.focus_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn on_tick(&mut self, now: Instant) -> Option<Action> {
        if self.form.phase() == FormPhase::Idle {
            self.load();
        }
        self.notices.expire(now);
        self.form
            .should_navigate(now, self.redirect_delay)
            .then(Self::back_to_list)
    }

    fn render(&self, frame: &mut Frame) {
        widgets::fill_background(frame);

        let rows = self.form.len().div_ceil(2) as u16;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),            // Header
                Constraint::Length(rows * 3 + 2), // Fields
                Constraint::Length(1),            // Spacer
                Constraint::Length(2),            // Buttons
                Constraint::Min(0),
                Constraint::Length(1), // Status
                Constraint::Length(2), // Notice
            ])
            .margin(1)
            .split(frame.area());

        widgets::header(frame, layout[0], &self.title());

        let body = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(widgets::BORDER))
            .style(Style::default().bg(widgets::BODY));
        let fields_area = body.inner(layout[1]);
        frame.render_widget(body, layout[1]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(fields_area);
        let column_rows = |area: Rect| {
            Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![Constraint::Length(3); rows as usize])
                .split(area)
        };
        let left = column_rows(columns[0]);
        let right = column_rows(columns[1]);
        for index in 0..self.form.len() {
            let column = if index % 2 == 0 { &left } else { &right };
            if let Some(area) = column.get(index / 2) {
                self.render_field(frame, *area, index);
            }
        }

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(layout[3]);
        frame.render_widget(
            widgets::button("Save", self.focus == self.save_button(), widgets::SUCCESS),
            buttons[0],
        );
        frame.render_widget(
            widgets::button("Cancel", self.focus == self.cancel_button(), widgets::ERROR),
            buttons[1],
        );

        widgets::help_line(frame, layout[5], &self.status_text());
        self.notices.render(frame, layout[6]);
    }
}
