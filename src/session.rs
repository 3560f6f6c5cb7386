use crate::{
    error::HangmanError,
    events::GameObserver,
    random::RandomSource,
    round::{GuessOutcome, RoundState},
    word_bank::WordBank,
};

/// Misses allowed when a session is restarted without ever being started
pub const DEFAULT_MAX_MISSES: usize = 6;

/// Victory and defeat counts for the life of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tallies {
    pub victories: u32,
    pub defeats: u32,
}

impl Tallies {
    pub fn rounds_finished(&self) -> u32 {
        self.victories + self.defeats
    }
}

/// Runs successive rounds and keeps score across them
pub struct GameSession {
    tallies: Tallies,
    current_round: Option<RoundState>,
    max_misses: usize,
    observers: Vec<Box<dyn GameObserver>>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("tallies", &self.tallies)
            .field("current_round", &self.current_round)
            .field("max_misses", &self.max_misses)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            tallies: Tallies::default(),
            current_round: None,
            max_misses: DEFAULT_MAX_MISSES,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    /// Begin a round with a fresh word. Tallies are kept; any round still in
    /// progress is abandoned without being counted.
    pub fn start<R: RandomSource + ?Sized>(
        &mut self,
        word_bank: &WordBank,
        max_misses: usize,
        rng: &mut R,
    ) -> Result<(), HangmanError> {
        let round = RoundState::create(word_bank.pick_random(rng), max_misses)?;
        self.max_misses = max_misses;
        self.begin(round);
        Ok(())
    }

    /// Replace the current round using the miss budget of the last start
    pub fn restart<R: RandomSource + ?Sized>(
        &mut self,
        word_bank: &WordBank,
        rng: &mut R,
    ) -> Result<(), HangmanError> {
        let round = RoundState::create(word_bank.pick_random(rng), self.max_misses)?;
        self.begin(round);
        Ok(())
    }

    fn begin(&mut self, round: RoundState) {
        if self.current_round.as_ref().is_some_and(|r| !r.status().is_over()) {
            log::info!("abandoning unfinished round");
        }
        let word_len = round.secret_word().len();
        self.current_round = Some(round);
        self.emit(|o| o.on_round_started(word_len));
    }

    pub fn guess_letter(&mut self, letter: char) -> Result<GuessOutcome, HangmanError> {
        let round = self
            .current_round
            .as_mut()
            .ok_or(HangmanError::NoActiveRound)?;

        let outcome = match round.guess(letter) {
            Ok(outcome) => outcome,
            Err(err @ HangmanError::DuplicateGuess(_)) => {
                log::warn!("input desync: {err}");
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let revealed: Vec<(usize, char)> = if outcome.is_hit() {
            let letter = letter.to_ascii_uppercase();
            round
                .positions_of(letter)
                .into_iter()
                .map(|pos| (pos, letter))
                .collect()
        } else {
            Vec::new()
        };
        let miss_count = round.miss_count();

        match outcome {
            GuessOutcome::Hit | GuessOutcome::Win => {
                for (position, letter) in revealed {
                    self.emit(|o| o.on_letter_revealed(position, letter));
                }
            }
            GuessOutcome::Miss | GuessOutcome::Lose => {
                self.emit(|o| o.on_miss(miss_count));
            }
        }

        match outcome {
            GuessOutcome::Win => {
                self.tallies.victories += 1;
                log::info!("round won; tallies {:?}", self.tallies);
                let tallies = self.tallies;
                self.emit(|o| o.on_round_won(tallies));
            }
            GuessOutcome::Lose => {
                self.tallies.defeats += 1;
                log::info!("round lost; tallies {:?}", self.tallies);
                let tallies = self.tallies;
                self.emit(|o| o.on_round_lost(tallies));
            }
            GuessOutcome::Hit | GuessOutcome::Miss => {}
        }

        Ok(outcome)
    }

    fn emit<F: Fn(&mut dyn GameObserver)>(&mut self, notify: F) {
        for observer in self.observers.iter_mut() {
            notify(observer.as_mut());
        }
    }

    pub fn tallies(&self) -> Tallies {
        self.tallies
    }

    pub fn current_round(&self) -> Option<&RoundState> {
        self.current_round.as_ref()
    }

    /// True when there is no round or the current one has finished
    pub fn is_round_over(&self) -> bool {
        self.current_round
            .as_ref()
            .map_or(true, |r| r.status().is_over())
    }

    pub fn max_misses(&self) -> usize {
        self.max_misses
    }
}
