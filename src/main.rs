mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use hangman::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{CrosstermEventSource, FixedTicker, Runner, TermEvent, TermEventSource, Ticker},
    EventLog, GameEvent, GameSession, HangmanError, RandomSource, RevealPolicy, SeededRandom,
    ThreadRandom, WordBank, WordList,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, File, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
};

use crate::ui::{screen::current_screen, staging::Staging};

/// terminal hangman with a staged keyboard, a growing gallows, and per-session tallies
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Guess the secret word one letter at a time before the gallows is complete. Victories and defeats are tallied for as long as the game stays open."
)]
pub struct Cli {
    /// number of misses allowed before the round is lost
    #[clap(short = 'm', long)]
    max_misses: Option<usize>,

    /// bundled word list to draw secret words from
    #[clap(short = 'l', long, value_enum)]
    word_list: Option<WordList>,

    /// newline-separated word file to use instead of a bundled list
    #[clap(short = 'w', long = "words")]
    word_file: Option<PathBuf>,

    /// whether a finished round shows the whole secret word
    #[clap(long, value_enum)]
    reveal: Option<RevealPolicy>,

    /// skip the staged word and keyboard build-out
    #[clap(long)]
    no_animation: bool,

    /// seed the word picker for a reproducible session
    #[clap(long)]
    seed: Option<u64>,

    /// write the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line flags over stored settings
    fn apply_to(&self, mut cfg: Config) -> Config {
        if let Some(max_misses) = self.max_misses {
            cfg.max_misses = max_misses;
        }
        if let Some(list) = self.word_list {
            cfg.word_list = list;
            cfg.word_file = None;
        }
        if let Some(ref path) = self.word_file {
            cfg.word_file = Some(path.clone());
        }
        if let Some(policy) = self.reveal {
            cfg.reveal_policy = policy;
        }
        if self.no_animation {
            cfg.animate = false;
        }
        cfg
    }

    fn random_source(&self) -> Box<dyn RandomSource> {
        match self.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(ThreadRandom),
        }
    }
}

fn load_word_bank(cfg: &Config) -> Result<WordBank, HangmanError> {
    match cfg.word_file {
        Some(ref path) => WordBank::from_file(path),
        None => WordBank::embedded(cfg.word_list),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Instructions,
    Playing,
    RoundOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub settings: Config,
    pub word_bank: WordBank,
    pub session: GameSession,
    pub rng: Box<dyn RandomSource>,
    pub events: EventLog,
    pub state: AppState,
    pub staging: Staging,
    pub keyboard_built: bool,
    pub status_line: String,
}

impl App {
    pub fn new(settings: Config, word_bank: WordBank, rng: Box<dyn RandomSource>) -> Self {
        let events = EventLog::new();
        let mut session = GameSession::new();
        session.subscribe(Box::new(events.clone()));

        Self {
            settings,
            word_bank,
            session,
            rng,
            events,
            state: AppState::Instructions,
            staging: Staging::settled(0, ui::key_count()),
            keyboard_built: false,
            status_line: String::new(),
        }
    }

    pub fn start_game(&mut self) -> Result<(), HangmanError> {
        self.session
            .start(&self.word_bank, self.settings.max_misses, self.rng.as_mut())?;
        self.enter_round();
        Ok(())
    }

    pub fn restart_game(&mut self) -> Result<(), HangmanError> {
        self.session.restart(&self.word_bank, self.rng.as_mut())?;
        self.enter_round();
        Ok(())
    }

    fn enter_round(&mut self) {
        let word_len = self
            .session
            .current_round()
            .map_or(0, |r| r.secret_word().len());
        // the keyboard is only built once; later rounds just re-enable it
        let animate_keys = self.settings.animate && !self.keyboard_built;
        self.staging = Staging::new(
            word_len,
            ui::key_count(),
            self.settings.animate,
            animate_keys,
        );
        self.keyboard_built = true;
        self.state = AppState::Playing;
        self.absorb_events();
    }

    /// Keys accept input once the keyboard is built, until their letter is used
    pub fn key_enabled(&self, letter: char) -> bool {
        self.state == AppState::Playing
            && self.staging.keyboard_ready()
            && self
                .session
                .current_round()
                .is_some_and(|r| !r.has_guessed(letter.to_ascii_uppercase()))
    }

    /// Returns false when the key is disabled and nothing reached the session
    pub fn guess(&mut self, letter: char) -> bool {
        if !self.key_enabled(letter) {
            return false;
        }
        match self.session.guess_letter(letter) {
            Ok(_) => self.absorb_events(),
            Err(err) if err.is_recoverable() => log::debug!("ignored key {letter:?}: {err}"),
            Err(err) => log::error!("guess {letter:?} failed: {err}"),
        }
        true
    }

    /// Turn drained session events into the status line and state changes
    fn absorb_events(&mut self) {
        let events = self.events.drain();
        let max_misses = self.session.max_misses();
        let revealed: Vec<char> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::LetterRevealed { letter, .. } => Some(*letter),
                _ => None,
            })
            .collect();
        if let Some(letter) = revealed.first() {
            self.status_line = match revealed.len() {
                1 => format!("{letter} is in the word"),
                n => format!("{letter} appears {n} times"),
            };
        }

        for event in events {
            match event {
                GameEvent::RoundStarted { word_len } => {
                    self.status_line = format!("A new word with {word_len} letters");
                }
                GameEvent::Miss { miss_count } => {
                    self.status_line = format!("Miss {miss_count} of {max_misses}");
                }
                GameEvent::RoundWon(_) => {
                    self.status_line = "You Win!".to_string();
                    self.state = AppState::RoundOver;
                }
                GameEvent::RoundLost(_) => {
                    self.status_line = "You Lose!".to_string();
                    self.state = AppState::RoundOver;
                }
                GameEvent::LetterRevealed { .. } => {}
            }
        }
    }

    /// Advance animations. Returns true when a redraw is needed.
    pub fn on_tick(&mut self) -> bool {
        if self.staging.is_settled() {
            return false;
        }
        self.staging.on_tick();
        true
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Result<Flow, HangmanError> {
        let ctrl_c =
            key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
        if ctrl_c || key.code == KeyCode::Esc {
            return Ok(Flow::Quit);
        }

        match self.state {
            AppState::Instructions => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.start_game()?;
                }
            }
            AppState::Playing => match key.code {
                KeyCode::Tab => self.restart_game()?,
                KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                    self.guess(c);
                }
                _ => {}
            },
            AppState::RoundOver => {
                if matches!(
                    key.code,
                    KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R')
                ) {
                    self.restart_game()?;
                }
            }
        }
        Ok(Flow::Continue)
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn init_logging() -> io::Result<()> {
    let Some(path) = AppDirs::log_path() else {
        return Ok(());
    };
    let file = open_log_file(&path).map_err(|err| {
        io::Error::new(err.kind(), format!("{}: {err}", path.display()))
    })?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    if let Err(err) = init_logging() {
        eprintln!("hangman: logging disabled, cannot open log file {err}");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let settings = cli.apply_to(store.load());
    if settings.max_misses < 1 {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::InvalidValue, "max misses must be at least 1")
            .exit();
    }
    if cli.save_config {
        store.save(&settings)?;
        log::info!("saved settings to {}", store.path().display());
    }

    let word_bank = match load_word_bank(&settings) {
        Ok(bank) => bank,
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err.to_string()).exit();
        }
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(settings, word_bank, cli.random_source());
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    run_app(terminal, app, &runner)
}

fn run_app<B: Backend, E: TermEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            TermEvent::Tick => {
                if app.on_tick() {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            TermEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            TermEvent::Key(key) => {
                if app.on_key(key)? == Flow::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
            TermEvent::Closed => {
                log::error!("input source closed, leaving the game");
                break;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    current_screen(&app.state).render(app, f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use hangman::{RoundStatus, SequenceRandom, Tallies};

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn code(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn quiet_settings() -> Config {
        Config {
            animate: false,
            ..Config::default()
        }
    }

    fn app_with_words(words: &str, settings: Config) -> App {
        App::new(
            settings,
            WordBank::load(words).unwrap(),
            Box::new(SequenceRandom::new(vec![0, 1, 2])),
        )
    }

    fn type_word(app: &mut App, letters: &str) {
        for c in letters.chars() {
            app.on_key(key(c)).unwrap();
        }
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["hangman"]);

        assert_eq!(cli.max_misses, None);
        assert_eq!(cli.word_list, None);
        assert_eq!(cli.word_file, None);
        assert_eq!(cli.reveal, None);
        assert!(!cli.no_animation);
        assert_eq!(cli.seed, None);
        assert!(!cli.save_config);
        assert_eq!(cli.apply_to(Config::default()), Config::default());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "hangman",
            "-m",
            "8",
            "-l",
            "animals",
            "--reveal",
            "guessed-only",
            "--no-animation",
        ]);
        let stored = Config {
            word_file: Some(PathBuf::from("/tmp/old.txt")),
            ..Config::default()
        };
        let cfg = cli.apply_to(stored);

        assert_eq!(cfg.max_misses, 8);
        assert_eq!(cfg.word_list, WordList::Animals);
        assert_eq!(cfg.word_file, None);
        assert_eq!(cfg.reveal_policy, RevealPolicy::GuessedOnly);
        assert!(!cfg.animate);
    }

    #[test]
    fn test_cli_word_file_wins() {
        let cli = Cli::parse_from(["hangman", "-l", "countries", "-w", "mine.txt"]);
        let cfg = cli.apply_to(Config::default());
        assert_eq!(cfg.word_list, WordList::Countries);
        assert_eq!(cfg.word_file, Some(PathBuf::from("mine.txt")));
    }

    #[test]
    fn test_cli_rejects_unknown_word_list() {
        assert!(Cli::try_parse_from(["hangman", "-l", "klingon"]).is_err());
    }

    #[test]
    fn test_load_word_bank_from_config() {
        let bank = load_word_bank(&Config::default()).unwrap();
        assert!(!bank.is_empty());

        let missing = Config {
            word_file: Some(PathBuf::from("/definitely/not/here.txt")),
            ..Config::default()
        };
        assert!(matches!(
            load_word_bank(&missing),
            Err(HangmanError::Io { .. })
        ));
    }

    #[test]
    fn test_open_log_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("hangman").join("hangman.log");
        open_log_file(&path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_open_log_file_reports_unusable_parent() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "").unwrap();
        assert!(open_log_file(&blocker.join("hangman.log")).is_err());
    }

    #[test]
    fn test_app_starts_on_instructions() {
        let mut app = app_with_words("CAT", quiet_settings());
        assert_eq!(app.state, AppState::Instructions);
        assert!(app.session.current_round().is_none());

        // letters do nothing before the game starts
        app.on_key(key('c')).unwrap();
        assert!(app.session.current_round().is_none());

        app.on_key(code(KeyCode::Enter)).unwrap();
        assert_eq!(app.state, AppState::Playing);
        assert_eq!(app.status_line, "A new word with 3 letters");
    }

    #[test]
    fn test_app_win_then_restart() {
        let mut app = app_with_words("CAT\nDOG", quiet_settings());
        app.on_key(code(KeyCode::Enter)).unwrap();
        type_word(&mut app, "cat");

        assert_eq!(app.state, AppState::RoundOver);
        assert_eq!(app.status_line, "You Win!");
        assert_eq!(
            app.session.tallies(),
            Tallies {
                victories: 1,
                defeats: 0
            }
        );

        app.on_key(key('r')).unwrap();
        assert_eq!(app.state, AppState::Playing);
        assert_eq!(app.session.current_round().unwrap().secret_word(), "DOG");
        assert_eq!(app.session.tallies().victories, 1);
    }

    #[test]
    fn test_app_loss_reports_misses() {
        let settings = Config {
            max_misses: 2,
            ..quiet_settings()
        };
        let mut app = app_with_words("DOG", settings);
        app.on_key(code(KeyCode::Enter)).unwrap();

        app.on_key(key('x')).unwrap();
        assert_eq!(app.status_line, "Miss 1 of 2");
        app.on_key(key('y')).unwrap();
        assert_eq!(app.state, AppState::RoundOver);
        assert_eq!(app.session.tallies().defeats, 1);
        assert_eq!(
            app.session.current_round().unwrap().status(),
            RoundStatus::Lost
        );
    }

    #[test]
    fn test_app_reports_repeated_letters() {
        let mut app = app_with_words("BANANA", quiet_settings());
        app.on_key(code(KeyCode::Enter)).unwrap();
        app.on_key(key('a')).unwrap();
        assert_eq!(app.status_line, "A appears 3 times");
        app.on_key(key('b')).unwrap();
        assert_eq!(app.status_line, "B is in the word");
    }

    #[test]
    fn test_app_ignores_repeat_and_post_round_keys() {
        let mut app = app_with_words("CAT", quiet_settings());
        app.on_key(code(KeyCode::Enter)).unwrap();
        app.on_key(key('z')).unwrap();
        app.on_key(key('z')).unwrap();
        assert_eq!(app.session.current_round().unwrap().miss_count(), 1);

        type_word(&mut app, "cat");
        assert_eq!(app.state, AppState::RoundOver);
        app.on_key(key('q')).unwrap();
        assert_eq!(app.session.current_round().unwrap().guessed_letters().len(), 4);
    }

    #[test]
    fn test_app_disables_guessed_keys() {
        let mut app = app_with_words("CAT", quiet_settings());
        assert!(!app.key_enabled('z'));
        app.on_key(code(KeyCode::Enter)).unwrap();

        assert!(app.guess('z'));
        assert!(!app.key_enabled('z'));
        assert!(!app.key_enabled('Z'));
        assert!(!app.guess('z'));
        assert!(!app.guess('Z'));
        assert_eq!(app.status_line, "Miss 1 of 6");
        assert!(app.key_enabled('c'));
    }

    #[test]
    fn test_run_app_stops_when_input_closes() {
        use ratatui::backend::TestBackend;
        use std::sync::mpsc::RecvTimeoutError;
        use std::time::Duration;

        struct HungUp;
        impl TermEventSource for HungUp {
            fn recv_timeout(&self, _timeout: Duration) -> Result<TermEvent, RecvTimeoutError> {
                Err(RecvTimeoutError::Disconnected)
            }
        }

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut app = app_with_words("CAT", quiet_settings());
        let runner = Runner::new(HungUp, FixedTicker::default());

        run_app(&mut terminal, &mut app, &runner).unwrap();
        assert_eq!(app.state, AppState::Instructions);
    }

    #[test]
    fn test_app_waits_for_keyboard_build_out() {
        let mut app = app_with_words("CAT", Config::default());
        app.on_key(code(KeyCode::Enter)).unwrap();
        assert!(!app.staging.keyboard_ready());

        app.on_key(key('c')).unwrap();
        assert!(app.session.current_round().unwrap().guessed_letters().is_empty());

        while app.on_tick() {}
        app.on_key(key('c')).unwrap();
        assert!(app.session.current_round().unwrap().has_guessed('C'));
    }

    #[test]
    fn test_app_keyboard_built_only_once() {
        let mut app = app_with_words("CAT\nDOG", Config::default());
        app.on_key(code(KeyCode::Enter)).unwrap();
        while app.on_tick() {}

        app.on_key(code(KeyCode::Tab)).unwrap();
        assert!(app.staging.keyboard_ready());
        assert_eq!(app.session.current_round().unwrap().secret_word(), "DOG");
    }

    #[test]
    fn test_app_quit_keys() {
        let mut app = app_with_words("CAT", quiet_settings());
        assert_eq!(app.on_key(code(KeyCode::Esc)).unwrap(), Flow::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.on_key(ctrl_c).unwrap(), Flow::Quit);

        app.on_key(code(KeyCode::Enter)).unwrap();
        assert_eq!(app.on_key(key('c')).unwrap(), Flow::Continue);
        assert_eq!(app.on_key(code(KeyCode::Esc)).unwrap(), Flow::Quit);
    }

    #[test]
    fn test_app_renders_every_state() {
        use ratatui::backend::TestBackend;

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut app = app_with_words("CAT", quiet_settings());

        terminal.draw(|f| ui(&app, f)).unwrap();
        app.on_key(code(KeyCode::Enter)).unwrap();
        terminal.draw(|f| ui(&app, f)).unwrap();
        type_word(&mut app, "cat");
        terminal.draw(|f| ui(&app, f)).unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("You Win!"));
        assert!(rendered.contains("Victories: 1"));
    }
}
