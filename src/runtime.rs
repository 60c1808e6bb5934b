use std::sync::mpsc::{self, Receiver};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app loop.
#[derive(Clone, Debug)]
pub enum InputEvent {
    Key(KeyEvent),
    Resize,
}

/// Source of terminal events (keyboard, resize).
pub trait InputSource {
    /// Blocks for the next event. `None` means the source is exhausted and
    /// the loop should shut down.
    fn next_event(&self) -> Option<InputEvent>;
}

/// Production event source using crossterm on a reader thread.
pub struct CrosstermInputSource {
    rx: Receiver<InputEvent>,
}

impl CrosstermInputSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    // Windows terminals deliver Release events too; the
                    // session must see each physical press exactly once.
                    if key.kind == KeyEventKind::Press
                        && tx.send(InputEvent::Key(key)).is_err()
                    {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(InputEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermInputSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for CrosstermInputSource {
    fn next_event(&self) -> Option<InputEvent> {
        self.rx.recv().ok()
    }
}

/// Channel-backed event source for unit tests.
pub struct TestInputSource {
    rx: Receiver<InputEvent>,
}

impl TestInputSource {
    pub fn new(rx: Receiver<InputEvent>) -> Self {
        Self { rx }
    }
}

impl InputSource for TestInputSource {
    fn next_event(&self) -> Option<InputEvent> {
        self.rx.recv().ok()
    }
}
