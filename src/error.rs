use std::{io, path::PathBuf};
use thiserror::Error;

/// Everything that can go wrong while loading words or playing a round.
///
/// `RoundAlreadyOver` and `DuplicateGuess` are recoverable: a shell that
/// disables input after a round ends (and disables keys once pressed) should
/// never see them, so they usually point at a UI/logic desync.
#[derive(Debug, Error)]
pub enum HangmanError {
    #[error("word list contains no usable words")]
    EmptyWordList,

    #[error("invalid secret word {0:?}: expected one or more letters A-Z")]
    InvalidWord(String),

    #[error("max misses must be at least 1, got {0}")]
    InvalidConfig(usize),

    #[error("the round is already over")]
    RoundAlreadyOver,

    #[error("letter {0} has already been guessed")]
    DuplicateGuess(char),

    #[error("{0:?} is not a letter A-Z")]
    InvalidLetter(char),

    #[error("no round in progress; start a game first")]
    NoActiveRound,

    #[error("failed to read word list {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HangmanError {
    /// True for errors a caller can ignore and keep playing after.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            HangmanError::RoundAlreadyOver
                | HangmanError::DuplicateGuess(_)
                | HangmanError::InvalidLetter(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(HangmanError::RoundAlreadyOver.is_recoverable());
        assert!(HangmanError::DuplicateGuess('A').is_recoverable());
        assert!(HangmanError::InvalidLetter('1').is_recoverable());
        assert!(!HangmanError::EmptyWordList.is_recoverable());
        assert!(!HangmanError::InvalidConfig(0).is_recoverable());
        assert!(!HangmanError::NoActiveRound.is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            HangmanError::DuplicateGuess('B').to_string(),
            "letter B has already been guessed"
        );
        assert_eq!(
            HangmanError::InvalidConfig(0).to_string(),
            "max misses must be at least 1, got 0"
        );

        let err = HangmanError::Io {
            path: PathBuf::from("/nope/words.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(
            err.to_string(),
            "failed to read word list /nope/words.txt: not found"
        );
    }
}
