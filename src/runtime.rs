use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Mutex;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Tick interval driving the staged reveal animations
pub const TICK_RATE_MS: u64 = 50;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum TermEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// The input source hung up; no further events will arrive
    Closed,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait TermEventSource {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<TermEvent, RecvTimeoutError>;
}

/// Production event source reading crossterm on a background thread
pub struct CrosstermEventSource {
    rx: Receiver<TermEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // Windows reports releases too; only presses are input
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => TermEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => TermEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    log::error!("terminal input stopped: {err}");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TermEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TermEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Replays a fixed list of events, then times out forever
pub struct ScriptedEventSource {
    events: Mutex<VecDeque<TermEvent>>,
}

impl ScriptedEventSource {
    pub fn new<I: IntoIterator<Item = TermEvent>>(events: I) -> Self {
        Self {
            events: Mutex::new(events.into_iter().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.lock().map(|q| q.len()).unwrap_or(0)
    }
}

impl TermEventSource for ScriptedEventSource {
    fn recv_timeout(&self, _timeout: Duration) -> Result<TermEvent, RecvTimeoutError> {
        let mut queue = self
            .events
            .lock()
            .map_err(|_| RecvTimeoutError::Disconnected)?;
        queue.pop_front().ok_or(RecvTimeoutError::Timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: TermEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: TermEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, Tick on timeout,
    /// or Closed once the source has disconnected
    pub fn step(&self) -> TermEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => TermEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => TermEvent::Closed,
        }
    }

    pub fn event_source(&self) -> &E {
        &self.event_source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn step_returns_tick_when_script_is_empty() {
        let source = ScriptedEventSource::new(Vec::<TermEvent>::new());
        let runner = Runner::new(source, FixedTicker::default());
        assert!(matches!(runner.step(), TermEvent::Tick));
    }

    #[test]
    fn step_replays_script_in_order() {
        let source = ScriptedEventSource::new([
            TermEvent::Resize,
            TermEvent::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
        ]);
        let runner = Runner::new(source, FixedTicker::new(Duration::from_millis(1)));

        assert!(matches!(runner.step(), TermEvent::Resize));
        match runner.step() {
            TermEvent::Key(key) => assert_eq!(key.code, KeyCode::Char('a')),
            other => panic!("expected key event, got {other:?}"),
        }
        assert!(matches!(runner.step(), TermEvent::Tick));
        assert_eq!(runner.event_source().remaining(), 0);
    }

    struct HungUpSource;

    impl TermEventSource for HungUpSource {
        fn recv_timeout(&self, _timeout: Duration) -> Result<TermEvent, RecvTimeoutError> {
            Err(RecvTimeoutError::Disconnected)
        }
    }

    #[test]
    fn step_reports_closed_when_source_disconnects() {
        let runner = Runner::new(HungUpSource, FixedTicker::default());
        assert!(matches!(runner.step(), TermEvent::Closed));
        assert!(matches!(runner.step(), TermEvent::Closed));
    }

    #[test]
    fn step_reports_closed_after_reader_thread_exits() {
        let (tx, rx) = mpsc::channel();
        drop(tx);
        let runner = Runner::new(CrosstermEventSource { rx }, FixedTicker::default());
        assert!(matches!(runner.step(), TermEvent::Closed));
    }

    #[test]
    fn default_ticker_uses_tick_rate() {
        assert_eq!(
            FixedTicker::default().interval(),
            Duration::from_millis(TICK_RATE_MS)
        );
    }
}
