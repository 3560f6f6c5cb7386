use crate::{error::HangmanError, word_bank::is_alphabetic_word};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    InProgress,
    Won,
    Lost,
}

impl RoundStatus {
    pub fn is_over(&self) -> bool {
        *self != RoundStatus::InProgress
    }
}

/// Result of a single accepted guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Hit,
    Miss,
    /// The guess was a hit that completed the word
    Win,
    /// The guess was a miss that used up the last allowed miss
    Lose,
}

impl GuessOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, GuessOutcome::Hit | GuessOutcome::Win)
    }

    pub fn ends_round(&self) -> bool {
        matches!(self, GuessOutcome::Win | GuessOutcome::Lose)
    }
}

/// Whether a finished round shows the whole secret word
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum RevealPolicy {
    #[default]
    FullOnRoundEnd,
    GuessedOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealedLetter {
    pub letter: char,
    pub revealed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSnapshot {
    pub miss_count: usize,
    pub max_misses: usize,
    pub status: RoundStatus,
}

/// One play-through from word selection to win or loss
#[derive(Debug, Clone)]
pub struct RoundState {
    secret_word: String,
    guessed_letters: HashSet<char>,
    miss_count: usize,
    max_misses: usize,
    status: RoundStatus,
}

impl RoundState {
    pub fn create(secret_word: &str, max_misses: usize) -> Result<Self, HangmanError> {
        let trimmed = secret_word.trim();
        if !is_alphabetic_word(trimmed) {
            return Err(HangmanError::InvalidWord(trimmed.to_string()));
        }
        let secret_word = trimmed.to_ascii_uppercase();
        if max_misses < 1 {
            return Err(HangmanError::InvalidConfig(max_misses));
        }

        log::debug!(
            "round created: {} letters, {} misses allowed",
            secret_word.len(),
            max_misses
        );

        Ok(Self {
            secret_word,
            guessed_letters: HashSet::new(),
            miss_count: 0,
            max_misses,
            status: RoundStatus::InProgress,
        })
    }

    /// Evaluate a guess and commit it. Rejected guesses leave the round
    /// untouched.
    pub fn guess(&mut self, letter: char) -> Result<GuessOutcome, HangmanError> {
        if self.status.is_over() {
            return Err(HangmanError::RoundAlreadyOver);
        }
        let letter = letter.to_ascii_uppercase();
        if !letter.is_ascii_uppercase() {
            return Err(HangmanError::InvalidLetter(letter));
        }
        if self.guessed_letters.contains(&letter) {
            return Err(HangmanError::DuplicateGuess(letter));
        }

        self.guessed_letters.insert(letter);

        let outcome = if self.secret_word.contains(letter) {
            if self.all_letters_guessed() {
                self.status = RoundStatus::Won;
                GuessOutcome::Win
            } else {
                GuessOutcome::Hit
            }
        } else {
            self.miss_count += 1;
            if self.miss_count == self.max_misses {
                self.status = RoundStatus::Lost;
                GuessOutcome::Lose
            } else {
                GuessOutcome::Miss
            }
        };

        log::debug!(
            "guess {letter}: {outcome:?} ({}/{} misses)",
            self.miss_count,
            self.max_misses
        );
        Ok(outcome)
    }

    fn all_letters_guessed(&self) -> bool {
        self.secret_word
            .chars()
            .all(|c| self.guessed_letters.contains(&c))
    }

    /// Every position of the secret word; fully revealed once the round is
    /// over.
    pub fn revealed_word(&self) -> Vec<RevealedLetter> {
        self.revealed_word_with(RevealPolicy::FullOnRoundEnd)
    }

    pub fn revealed_word_with(&self, policy: RevealPolicy) -> Vec<RevealedLetter> {
        let force = policy == RevealPolicy::FullOnRoundEnd && self.status.is_over();
        self.secret_word
            .chars()
            .map(|letter| RevealedLetter {
                letter,
                revealed: force || self.guessed_letters.contains(&letter),
            })
            .collect()
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            miss_count: self.miss_count,
            max_misses: self.max_misses,
            status: self.status,
        }
    }

    /// Positions in the secret word holding `letter`
    pub fn positions_of(&self, letter: char) -> Vec<usize> {
        let letter = letter.to_ascii_uppercase();
        self.secret_word.chars().positions(|c| c == letter).collect()
    }

    /// Distinct letters of the secret word, in first-occurrence order
    pub fn distinct_letters(&self) -> Vec<char> {
        self.secret_word.chars().unique().collect()
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    pub fn guessed_letters(&self) -> &HashSet<char> {
        &self.guessed_letters
    }

    pub fn has_guessed(&self, letter: char) -> bool {
        self.guessed_letters.contains(&letter.to_ascii_uppercase())
    }

    pub fn miss_count(&self) -> usize {
        self.miss_count
    }

    pub fn max_misses(&self) -> usize {
        self.max_misses
    }

    pub fn remaining_misses(&self) -> usize {
        self.max_misses - self.miss_count
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }
}
