use ratatui::Frame;

use crate::{
    ui::{render_instructions, render_round_over},
    App, AppState,
};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Title card shown before the first round
pub struct InstructionsScreen;

impl Screen for InstructionsScreen {
    fn render(&self, _app: &App, f: &mut Frame) {
        let area = f.area();
        render_instructions(area, f.buffer_mut());
    }
}

/// Board screen - renders the board using the App widget
pub struct BoardScreen;

impl Screen for BoardScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Board with the end-of-round popup on top
pub struct RoundOverScreen;

impl Screen for RoundOverScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        BoardScreen.render(app, f);
        let area = f.area();
        render_round_over(app, area, f.buffer_mut());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Instructions => Box::new(InstructionsScreen),
        AppState::Playing => Box::new(BoardScreen),
        AppState::RoundOver => Box::new(RoundOverScreen),
    }
}
