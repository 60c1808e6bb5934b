use clap::ValueEnum;
use crossterm::event::KeyEvent;
use serde::{Deserialize, Serialize};

use crate::buffer::{InputBuffer, SENTENCE_TERMINATOR};
use crate::complete::AutocompleteEngine;
use crate::error::SessionError;
use crate::event_log::{EventKind, EventLogger, LogRecord, LogSink};
use crate::key_action::{classify, KeyAction};
use crate::timing::{Clock, Granularity, TimingTracker};

/// Character whose insertion closes the current word.
pub const WORD_BOUNDARY: char = ' ';

/// Text-entry technique under measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technique {
    Plain,
    Assisted,
}

impl Technique {
    /// Mode code used in log records and result filenames.
    pub fn mode(self) -> u8 {
        match self {
            Technique::Plain => 0,
            Technique::Assisted => 1,
        }
    }

    /// Study sentence used when no custom sentence is configured. These are
    /// the sentences of the original experiment scripts.
    pub fn default_sentence(self) -> &'static str {
        match self {
            Technique::Plain => "An 123 Tagen kamen 1342 Personen.",
            Technique::Assisted => "The five boxing wizards jump very quickly.",
        }
    }
}

/// Session lifecycle. `Finished` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Active,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub participant_id: String,
    pub technique: Technique,
    pub target_sentence: String,
}

/// One complete attempt by one participant to retype one target sentence.
///
/// Owns the timers, the input buffer, the event log, and (for the assisted
/// technique) the autocomplete engine, and runs the state machine that ties
/// them together. Every raw key notification is processed to completion
/// before the next one is accepted.
pub struct Session {
    config: SessionConfig,
    phase: Phase,
    timers: TimingTracker,
    buffer: InputBuffer,
    logger: EventLogger,
    completer: Option<AutocompleteEngine>,
    sink: Box<dyn LogSink>,
}

impl Session {
    pub fn new(config: SessionConfig, sink: Box<dyn LogSink>) -> Self {
        let timers = TimingTracker::new();
        Self::build(config, sink, timers)
    }

    /// Same as `new` but with an injected clock, for deterministic tests.
    pub fn with_clock(
        config: SessionConfig,
        sink: Box<dyn LogSink>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let timers = TimingTracker::with_clock(clock);
        Self::build(config, sink, timers)
    }

    fn build(config: SessionConfig, sink: Box<dyn LogSink>, timers: TimingTracker) -> Self {
        let completer = match config.technique {
            Technique::Assisted => Some(AutocompleteEngine::new(&config.target_sentence)),
            Technique::Plain => None,
        };
        let logger = EventLogger::new(config.participant_id.clone(), config.technique.mode());
        Self {
            config,
            phase: Phase::NotStarted,
            timers,
            buffer: InputBuffer::new(),
            logger,
            completer,
            sink,
        }
    }

    /// Classifies a raw key event and applies it.
    pub fn handle_key_event(&mut self, key: &KeyEvent) -> Result<(), SessionError> {
        let action = classify(key, self.has_started(), self.autocomplete_enabled());
        self.handle_key(action)
    }

    /// Applies one semantic action.
    ///
    /// In `NotStarted` only `StartSession` does anything: it arms all three
    /// timers and is neither logged nor inserted. In `Finished` all input is
    /// ignored. In `Active` every action, `NoOp` included, is logged as a
    /// keystroke and restarts the key timer before anything else happens.
    pub fn handle_key(&mut self, action: KeyAction) -> Result<(), SessionError> {
        match self.phase {
            Phase::NotStarted => {
                if action == KeyAction::StartSession {
                    self.timers.arm();
                    self.phase = Phase::Active;
                }
                Ok(())
            }
            Phase::Active => self.on_key(action),
            Phase::Finished => Ok(()),
        }
    }

    fn on_key(&mut self, action: KeyAction) -> Result<(), SessionError> {
        let key_ms = self.timers.elapsed_and_restart(Granularity::Key)?;
        self.logger
            .record(EventKind::KeyPressed, key_ms, action.log_content())?;

        match action {
            KeyAction::InsertChar(c) => {
                self.buffer.append_char(c);
                if c == WORD_BOUNDARY {
                    self.on_word_typed()?;
                }
                if c == SENTENCE_TERMINATOR {
                    self.on_word_typed()?;
                    self.on_sentence_typed()?;
                }
            }
            KeyAction::DeleteLast => self.buffer.delete_last(),
            KeyAction::CommitSuggestion => {
                if let Some(completer) = self.completer.as_mut() {
                    completer.commit(&mut self.buffer);
                }
            }
            KeyAction::StartSession | KeyAction::NoOp => {}
        }

        // Commit clears the suggestion instead of recomputing it; a finished
        // session proposes nothing further.
        if self.phase == Phase::Active && action != KeyAction::CommitSuggestion {
            if let Some(completer) = self.completer.as_mut() {
                completer.refresh(&self.buffer);
            }
        }
        Ok(())
    }

    fn on_word_typed(&mut self) -> Result<(), SessionError> {
        let word_ms = self.timers.elapsed_and_restart(Granularity::Word)?;
        let word = self.buffer.last_word().to_string();
        self.logger.record(EventKind::WordTyped, word_ms, word)
    }

    fn on_sentence_typed(&mut self) -> Result<(), SessionError> {
        let sentence_ms = self.timers.elapsed_and_restart(Granularity::Sentence)?;
        let content = self.buffer.normalized_for_completion();
        self.logger
            .record(EventKind::SentenceTyped, sentence_ms, content.clone())?;
        self.logger
            .record(EventKind::TestFinished, sentence_ms, content)?;
        self.logger.finalize(self.sink.as_mut())?;
        self.phase = Phase::Finished;
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_started(&self) -> bool {
        self.phase != Phase::NotStarted
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn autocomplete_enabled(&self) -> bool {
        self.completer.is_some()
    }

    pub fn technique(&self) -> Technique {
        self.config.technique
    }

    pub fn participant_id(&self) -> &str {
        &self.config.participant_id
    }

    pub fn target_sentence(&self) -> &str {
        &self.config.target_sentence
    }

    /// Committed input so far; never includes the suggestion preview.
    pub fn typed_text(&self) -> &str {
        self.buffer.current_text()
    }

    /// Current suggestion tail, empty for the plain technique.
    pub fn suggestion(&self) -> &str {
        self.completer
            .as_ref()
            .map(AutocompleteEngine::suggestion)
            .unwrap_or("")
    }

    pub fn records(&self) -> &[LogRecord] {
        self.logger.records()
    }
}
