use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic action derived from one raw key notification.
///
/// Downstream logic switches on this closed set only; platform key codes are
/// confined to `classify`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    InsertChar(char),
    DeleteLast,
    CommitSuggestion,
    StartSession,
    NoOp,
}

impl KeyAction {
    /// Content string logged with the keyPressed record for this action.
    pub fn log_content(&self) -> String {
        match self {
            KeyAction::InsertChar(c) => c.to_string(),
            KeyAction::DeleteLast => "Backspace".to_string(),
            KeyAction::CommitSuggestion | KeyAction::StartSession => "Enter".to_string(),
            KeyAction::NoOp => String::new(),
        }
    }
}

/// Maps a raw key event to a semantic action. Pure function of its inputs.
///
/// Enter doubles as activation key: it starts the session while not started,
/// and commits the suggestion while started with autocompletion enabled.
pub fn classify(key: &KeyEvent, started: bool, autocomplete_enabled: bool) -> KeyAction {
    match key.code {
        KeyCode::Enter => {
            if !started {
                KeyAction::StartSession
            } else if autocomplete_enabled {
                KeyAction::CommitSuggestion
            } else {
                KeyAction::NoOp
            }
        }
        KeyCode::Backspace => KeyAction::DeleteLast,
        KeyCode::Char(c) => {
            if key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            {
                KeyAction::NoOp
            } else {
                KeyAction::InsertChar(c)
            }
        }
        _ => KeyAction::NoOp,
    }
}
