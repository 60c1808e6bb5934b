use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::session::{Phase, Technique};
use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let suggestion_style = Style::default().fg(Color::DarkGray).patch(dim_style);

        // Static preamble: instructions plus the target sentence.
        let mut lines = vec![
            Line::from(Span::styled("Type the following sentence:", italic_style)),
            Line::from(""),
            Line::from(Span::styled(session.target_sentence(), bold_style)),
            Line::from(""),
        ];

        if session.technique() == Technique::Assisted {
            lines.push(Line::from(Span::styled(
                "You can use autocompletion by pressing \"Enter\"",
                dim_style,
            )));
        }

        match session.phase() {
            Phase::NotStarted => {
                lines.push(Line::from(Span::styled(
                    "(Press \"Enter\" to start)",
                    dim_style,
                )));
            }
            Phase::Active => {
                lines.push(Line::from(""));
                let mut spans = vec![Span::styled(session.typed_text().to_string(), bold_style)];
                if !session.suggestion().is_empty() {
                    // The proposed completion trails the committed text in a
                    // visually distinct span; it is preview only.
                    spans.push(Span::styled(
                        session.suggestion().to_string(),
                        suggestion_style,
                    ));
                }
                spans.push(Span::styled("_", dim_style));
                lines.push(Line::from(spans));
            }
            Phase::Finished => {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    session.typed_text().to_string(),
                    bold_style,
                )));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("Test finished.", italic_style)));
            }
        }

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let occupied: u16 = lines
            .iter()
            .map(|line| {
                let width: usize = line.spans.iter().map(|span| span.content.width()).sum();
                ((width as f64 / max_chars_per_line as f64).ceil() as u16).max(1)
            })
            .sum();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints(
                [
                    Constraint::Length((area.height.saturating_sub(occupied)) / 2),
                    Constraint::Length(occupied),
                    Constraint::Min(0),
                ]
                .as_ref(),
            )
            .split(area);

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(chunks[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_log::MemorySink;
    use crate::key_action::KeyAction;
    use crate::session::{Session, SessionConfig};
    use ratatui::{backend::TestBackend, Terminal};

    fn app(technique: Technique) -> App {
        let config = SessionConfig {
            participant_id: "p01".to_string(),
            technique,
            target_sentence: technique.default_sentence().to_string(),
        };
        App {
            session: Session::new(config, Box::new(MemorySink::default())),
        }
    }

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| f.render_widget(app, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn renders_preamble_before_start() {
        let app = app(Technique::Plain);
        let content = draw(&app);
        assert!(content.contains("Type the following sentence:"));
        assert!(content.contains("An 123 Tagen kamen 1342"));
        assert!(content.contains("to start"));
    }

    #[test]
    fn renders_autocomplete_hint_for_assisted() {
        let app = app(Technique::Assisted);
        let content = draw(&app);
        assert!(content.contains("autocompletion"));
    }

    #[test]
    fn renders_typed_text_and_suggestion_while_active() {
        let mut app = app(Technique::Assisted);
        app.session.handle_key(KeyAction::StartSession).unwrap();
        for c in "wiz".chars() {
            app.session.handle_key(KeyAction::InsertChar(c)).unwrap();
        }
        assert_eq!(app.session.suggestion(), "ards");

        let content = draw(&app);
        assert!(content.contains("wizards"));
    }

    #[test]
    fn renders_finished_state() {
        let mut app = app(Technique::Plain);
        app.session.handle_key(KeyAction::StartSession).unwrap();
        for c in "An 123 Tagen kamen 1342 Personen.".chars() {
            app.session.handle_key(KeyAction::InsertChar(c)).unwrap();
        }
        assert!(app.session.is_finished());

        let content = draw(&app);
        assert!(content.contains("Test finished."));
    }
}
