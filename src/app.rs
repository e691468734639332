//! The main application state and screen routing.
//!
//! The application shows either the home menu or one resource screen (a
//! list or a form). Screens ask for navigation through [`Action`]s; the
//! router builds the next screen with the shared [`Clinic`] registry.

use crate::api::clinic::Clinic;
use crate::components::{clinic, home::Home, Action, Component};
use crate::config::Config;
use crate::tui::{self, Tui};
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use std::time::Instant;

/// The ten backend collections managed by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Specialties,
    Doctors,
    Patients,
    Appointments,
    Medicines,
    Prescriptions,
    RecipeDetails,
    Diagnoses,
    Procedures,
    Payments,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 10] = [
        ResourceKind::Specialties,
        ResourceKind::Doctors,
        ResourceKind::Patients,
        ResourceKind::Appointments,
        ResourceKind::Medicines,
        ResourceKind::Prescriptions,
        ResourceKind::RecipeDetails,
        ResourceKind::Diagnoses,
        ResourceKind::Procedures,
        ResourceKind::Payments,
    ];

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Specialties => "Specialties",
            ResourceKind::Doctors => "Doctors",
            ResourceKind::Patients => "Patients",
            ResourceKind::Appointments => "Appointments",
            ResourceKind::Medicines => "Medicines",
            ResourceKind::Prescriptions => "Prescriptions",
            ResourceKind::RecipeDetails => "Prescription Lines",
            ResourceKind::Diagnoses => "Diagnoses",
            ResourceKind::Procedures => "Medical Procedures",
            ResourceKind::Payments => "Payments",
        }
    }
}

/// Screen within a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    List,
    /// Create form, with field values filled in by the caller.
    Create { preset: Vec<(&'static str, String)> },
    Edit(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub kind: ResourceKind,
    pub page: Page,
}

impl Route {
    pub fn list(kind: ResourceKind) -> Self {
        Self {
            kind,
            page: Page::List,
        }
    }

    pub fn create(kind: ResourceKind) -> Self {
        Self {
            kind,
            page: Page::Create { preset: Vec::new() },
        }
    }

    pub fn edit(kind: ResourceKind, id: u64) -> Self {
        Self {
            kind,
            page: Page::Edit(id),
        }
    }
}

/// Main application struct.
pub struct App {
    clinic: Arc<Clinic>,
    config: Config,
    home: Home,
    /// The active resource screen; `None` shows the home menu.
    screen: Option<Box<dyn Component>>,
    should_quit: bool,
}

impl App {
    pub fn new(clinic: Arc<Clinic>, config: Config) -> Self {
        Self {
            home: Home::new(config.api_url()),
            clinic,
            config,
            screen: None,
            should_quit: false,
        }
    }

    /// Runs the main loop until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing or reading terminal events fails.
    pub fn run(&mut self, tui: &mut Tui) -> Result<()> {
        while !self.should_quit {
            tui.draw(|frame| match &self.screen {
                Some(screen) => screen.render(frame),
                None => self.home.render(frame),
            })?;

            if let tui::Event::Input(Event::Key(key)) = tui.next_event()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key)?;
                }
            }

            let tick = self.screen.as_mut().and_then(|s| s.on_tick(Instant::now()));
            if let Some(action) = tick {
                self.apply(action);
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Global keybinding: Ctrl+Q to quit
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        let action = match self.screen.as_mut() {
            Some(screen) => screen.handle_input(key)?,
            None => self.home.handle_input(key)?,
        };
        if let Some(action) = action {
            self.apply(action);
        }
        Ok(())
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Home => self.screen = None,
            Action::Open(route) => {
                tracing::debug!(?route, "navigate");
                self.screen = Some(clinic::build(&route, self.clinic.clone(), &self.config));
            }
            Action::Quit => self.should_quit = true,
        }
    }
}
