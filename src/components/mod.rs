use crate::app::Route;
use crate::tui::Frame;
use anyhow::Result;
use crossterm::event::KeyEvent;
use std::time::Instant;

pub mod clinic;
pub mod form;
pub mod home;
pub mod list;
pub mod notice;
pub mod widgets;

/// What a screen asks the application to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Home,
    Open(Route),
    Quit,
}

pub trait Component {
    fn handle_input(&mut self, event: KeyEvent) -> Result<Option<Action>>;

    /// Called once per frame for timers (notifications, delayed navigation)
    /// and to pick up store updates.
    fn on_tick(&mut self, _now: Instant) -> Option<Action> {
        None
    }

    fn render(&self, frame: &mut Frame);
}
