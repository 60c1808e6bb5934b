pub mod buffer;
pub mod complete;
pub mod config;
pub mod error;
pub mod event_log;
pub mod key_action;
pub mod runtime;
pub mod session;
pub mod timing;
pub mod ui;

use crate::{
    config::{Config, ConfigStore, FileConfigStore},
    event_log::{CsvSink, LogSink, NullSink},
    runtime::{CrosstermInputSource, InputEvent, InputSource},
    session::{Session, SessionConfig, Technique},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
};

/// measures text-entry speed at key, word, and sentence granularity
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Shows a target sentence, waits for Enter, then measures the participant retyping it. Every keystroke, word, and the completed sentence are logged with their own elapsed-time clocks; the assisted technique adds in-sentence word autocompletion committed with Enter."
)]
pub struct Cli {
    /// participant identifier used in log records and the result filename
    participant_id: String,

    /// text-entry technique under test
    #[clap(short = 't', long, value_enum)]
    technique: Option<Technique>,

    /// custom target sentence to retype
    #[clap(short = 's', long)]
    sentence: Option<String>,

    /// keep the event log in memory only; do not write a result file
    #[clap(long)]
    no_persist: bool,
}

impl Cli {
    /// Merge CLI arguments over persisted defaults into a session config.
    fn to_session_config(&self, defaults: &Config) -> SessionConfig {
        let technique = self.technique.unwrap_or(defaults.technique);
        let target_sentence = self
            .sentence
            .clone()
            .or_else(|| defaults.target_sentence.clone())
            .unwrap_or_else(|| technique.default_sentence().to_string());
        SessionConfig {
            participant_id: self.participant_id.clone(),
            technique,
            target_sentence,
        }
    }

    fn wants_persistence(&self, defaults: &Config) -> bool {
        defaults.persist_results && !self.no_persist
    }
}

pub struct App {
    pub session: Session,
}

impl App {
    pub fn new(cli: &Cli, defaults: &Config) -> Self {
        let session_config = cli.to_session_config(defaults);
        let sink: Box<dyn LogSink> = if cli.wants_persistence(defaults) {
            Box::new(CsvSink::new(
                session_config.technique.mode(),
                &session_config.participant_id,
            ))
        } else {
            Box::new(NullSink)
        };
        Self {
            session: Session::new(session_config, sink),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let defaults = FileConfigStore::new().load();
    let mut app = App::new(&cli, &defaults);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermInputSource::new();
    let result = run_session(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;

    echo_log(&app);

    Ok(())
}

/// Drives the session until the sentence terminator finishes it, the input
/// source closes, or the operator aborts with ctrl+c. Each event is handled
/// to completion before the next one is read.
fn run_session<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &impl InputSource,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while let Some(event) = events.next_event() {
        match event {
            InputEvent::Key(key) => {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    // Aborted run: nothing is finalized or persisted.
                    break;
                }

                app.session.handle_key_event(&key)?;
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;

                if app.session.is_finished() {
                    break;
                }
            }
            InputEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
        }
    }

    Ok(())
}

/// The original tool echoed every event to the console as it happened; the
/// alternate screen makes that impossible live, so the full log is printed
/// once the terminal is restored.
fn echo_log(app: &App) {
    println!("event,time(ms),content");
    for record in app.session.records() {
        println!("{},{},{}", record.event, record.elapsed_ms, record.content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_action::KeyAction;
    use clap::Parser;

    #[test]
    fn cli_requires_participant_id() {
        assert!(Cli::try_parse_from(["supertext"]).is_err());
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["supertext", "p01"]);

        assert_eq!(cli.participant_id, "p01");
        assert_eq!(cli.technique, None);
        assert_eq!(cli.sentence, None);
        assert!(!cli.no_persist);
    }

    #[test]
    fn cli_technique_flag() {
        let cli = Cli::parse_from(["supertext", "p01", "-t", "assisted"]);
        assert_eq!(cli.technique, Some(Technique::Assisted));

        let cli = Cli::parse_from(["supertext", "p01", "--technique", "plain"]);
        assert_eq!(cli.technique, Some(Technique::Plain));
    }

    #[test]
    fn cli_custom_sentence() {
        let cli = Cli::parse_from(["supertext", "p01", "-s", "Short test."]);
        assert_eq!(cli.sentence, Some("Short test.".to_string()));
    }

    #[test]
    fn session_config_uses_technique_default_sentence() {
        let cli = Cli::parse_from(["supertext", "p01", "-t", "assisted"]);
        let config = cli.to_session_config(&Config::default());

        assert_eq!(config.technique, Technique::Assisted);
        assert_eq!(
            config.target_sentence,
            "The five boxing wizards jump very quickly."
        );
    }

    #[test]
    fn session_config_prefers_cli_sentence_over_defaults() {
        let cli = Cli::parse_from(["supertext", "p01", "-s", "From the flag."]);
        let defaults = Config {
            technique: Technique::Plain,
            target_sentence: Some("From the config file.".into()),
            persist_results: true,
        };

        let config = cli.to_session_config(&defaults);
        assert_eq!(config.target_sentence, "From the flag.");
    }

    #[test]
    fn session_config_falls_back_to_config_file_sentence() {
        let cli = Cli::parse_from(["supertext", "p01"]);
        let defaults = Config {
            technique: Technique::Plain,
            target_sentence: Some("From the config file.".into()),
            persist_results: true,
        };

        let config = cli.to_session_config(&defaults);
        assert_eq!(config.target_sentence, "From the config file.");
    }

    #[test]
    fn no_persist_flag_disables_persistence() {
        let cli = Cli::parse_from(["supertext", "p01", "--no-persist"]);
        assert!(!cli.wants_persistence(&Config::default()));

        let cli = Cli::parse_from(["supertext", "p01"]);
        assert!(cli.wants_persistence(&Config::default()));

        let no_persist_default = Config {
            persist_results: false,
            ..Config::default()
        };
        assert!(!cli.wants_persistence(&no_persist_default));
    }

    #[test]
    fn app_starts_with_fresh_session() {
        let cli = Cli::parse_from(["supertext", "p01", "--no-persist"]);
        let app = App::new(&cli, &Config::default());

        assert!(!app.session.has_started());
        assert_eq!(app.session.typed_text(), "");
        assert!(app.session.records().is_empty());
    }

    #[test]
    fn app_session_runs_end_to_end() {
        let cli = Cli::parse_from(["supertext", "p01", "--no-persist", "-s", "ok."]);
        let mut app = App::new(&cli, &Config::default());

        app.session.handle_key(KeyAction::StartSession).unwrap();
        for c in "ok.".chars() {
            app.session.handle_key(KeyAction::InsertChar(c)).unwrap();
        }

        assert!(app.session.is_finished());
    }
}
