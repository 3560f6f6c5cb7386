use hangman::runtime::TICK_RATE_MS;

/// Delay between word slots appearing
pub const LETTER_INTERVAL_MS: u64 = 250;
/// Delay between keyboard keys appearing
pub const KEY_INTERVAL_MS: u64 = 50;

/// Staged build-out of the word slots and keyboard, advanced by ticks.
///
/// Purely cosmetic: the round is fully set up before staging begins, and
/// staging never changes what a guess does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staging {
    ticks: u64,
    word_len: usize,
    key_count: usize,
    animate_letters: bool,
    animate_keys: bool,
}

impl Staging {
    pub fn new(
        word_len: usize,
        key_count: usize,
        animate_letters: bool,
        animate_keys: bool,
    ) -> Self {
        Self {
            ticks: 0,
            word_len,
            key_count,
            animate_letters,
            animate_keys,
        }
    }

    /// Everything visible from the start
    pub fn settled(word_len: usize, key_count: usize) -> Self {
        Self::new(word_len, key_count, false, false)
    }

    pub fn on_tick(&mut self) {
        if !self.is_settled() {
            self.ticks += 1;
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.ticks * TICK_RATE_MS
    }

    pub fn visible_letters(&self) -> usize {
        if !self.animate_letters {
            return self.word_len;
        }
        let shown = (self.elapsed_ms() / LETTER_INTERVAL_MS) as usize + 1;
        shown.min(self.word_len)
    }

    pub fn visible_keys(&self) -> usize {
        if !self.animate_keys {
            return self.key_count;
        }
        let shown = (self.elapsed_ms() / KEY_INTERVAL_MS) as usize + 1;
        shown.min(self.key_count)
    }

    pub fn keyboard_ready(&self) -> bool {
        self.visible_keys() == self.key_count
    }

    pub fn is_settled(&self) -> bool {
        self.keyboard_ready() && self.visible_letters() == self.word_len
    }
}
