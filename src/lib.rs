// Library surface for the terminal shell, headless tests, and any other
// front end. Presentation code lives in the binary.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod events;
pub mod random;
pub mod round;
pub mod runtime;
pub mod session;
pub mod word_bank;

pub use error::HangmanError;
pub use events::{EventLog, GameEvent, GameObserver};
pub use random::{RandomSource, SeededRandom, SequenceRandom, ThreadRandom};
pub use round::{
    GuessOutcome, RevealPolicy, RevealedLetter, RoundSnapshot, RoundState, RoundStatus,
};
pub use session::{GameSession, Tallies, DEFAULT_MAX_MISSES};
pub use word_bank::{WordBank, WordList};
