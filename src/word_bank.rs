use crate::{error::HangmanError, random::RandomSource};
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

static WORDS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/words");

/// Word lists bundled into the binary
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WordList {
    English,
    Animals,
    Countries,
}

impl WordList {
    fn file_name(&self) -> String {
        format!("{self}.txt")
    }
}

/// The candidate secret words for a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    /// Parse a newline-delimited list. Lines are trimmed and uppercased;
    /// blank lines are ignored and lines with anything outside A-Z are
    /// skipped.
    pub fn load(source: &str) -> Result<Self, HangmanError> {
        let mut words = Vec::new();
        for (line_no, line) in source.lines().enumerate() {
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            if !is_alphabetic_word(word) {
                log::warn!("skipping word list line {}: {:?}", line_no + 1, word);
                continue;
            }
            words.push(word.to_ascii_uppercase());
        }

        if words.is_empty() {
            return Err(HangmanError::EmptyWordList);
        }

        log::debug!("loaded {} words", words.len());
        Ok(Self { words })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HangmanError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| HangmanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(&data)
    }

    pub fn embedded(list: WordList) -> Result<Self, HangmanError> {
        let contents = WORDS_DIR
            .get_file(list.file_name())
            .and_then(|file| file.contents_utf8())
            .ok_or(HangmanError::EmptyWordList)?;
        Self::load(contents)
    }

    /// Pick a uniformly random word using the supplied source
    pub fn pick_random<R: RandomSource + ?Sized>(&self, rng: &mut R) -> &str {
        let idx = rng.pick_index(self.words.len());
        &self.words[idx]
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false; a loaded bank holds at least one word.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Checked before case folding so non-ASCII letters never fold into A-Z
pub(crate) fn is_alphabetic_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}
