use crate::session::Tallies;
use std::{cell::RefCell, rc::Rc};

/// Notifications emitted by a `GameSession` as rounds progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    RoundStarted { word_len: usize },
    LetterRevealed { position: usize, letter: char },
    Miss { miss_count: usize },
    RoundWon(Tallies),
    RoundLost(Tallies),
}

/// Hook for presentation, animation and audio collaborators.
///
/// Called synchronously, after the round state has been committed. Every
/// method defaults to a no-op so observers only implement what they use.
pub trait GameObserver {
    fn on_round_started(&mut self, _word_len: usize) {}
    fn on_letter_revealed(&mut self, _position: usize, _letter: char) {}
    fn on_miss(&mut self, _miss_count: usize) {}
    fn on_round_won(&mut self, _tallies: Tallies) {}
    fn on_round_lost(&mut self, _tallies: Tallies) {}
}

/// Observer that records events for later draining.
///
/// Clones share the same buffer, so one handle can be subscribed to a
/// session while another is kept by the caller.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: GameEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Take every event recorded so far
    pub fn drain(&self) -> Vec<GameEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl GameObserver for EventLog {
    fn on_round_started(&mut self, word_len: usize) {
        self.push(GameEvent::RoundStarted { word_len });
    }

    fn on_letter_revealed(&mut self, position: usize, letter: char) {
        self.push(GameEvent::LetterRevealed { position, letter });
    }

    fn on_miss(&mut self, miss_count: usize) {
        self.push(GameEvent::Miss { miss_count });
    }

    fn on_round_won(&mut self, tallies: Tallies) {
        self.push(GameEvent::RoundWon(tallies));
    }

    fn on_round_lost(&mut self, tallies: Tallies) {
        self.push(GameEvent::RoundLost(tallies));
    }
}
