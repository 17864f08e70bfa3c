use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{app::App, scoring, scoring::CharOutcome, session::Phase};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let dim_italic_style = Style::default()
            .patch(italic_style)
            .add_modifier(Modifier::DIM);

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let prompt_width = session.reference_text.width();
        let prompt_occupied_lines = if prompt_width <= max_chars_per_line as usize {
            1
        } else {
            ((prompt_width as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2),                    // title
                Constraint::Min(prompt_occupied_lines),   // reference paragraph
                Constraint::Length(1),                    // padding
                Constraint::Length(2),                    // typed input
                Constraint::Length(1),                    // time / high score
                Constraint::Length(1),                    // wpm / accuracy
                Constraint::Length(1),                    // word counts
                Constraint::Length(1),                    // padding
                Constraint::Length(1),                    // legend
            ])
            .split(area);

        let title = Paragraph::new(Span::styled("TYPING SPEED TEST", bold_style))
            .alignment(Alignment::Center);
        title.render(chunks[0], buf);

        let paragraph = if session.reference_text.is_empty() {
            Paragraph::new(Span::styled("waiting for a paragraph....", dim_italic_style))
        } else {
            let spans = scoring::char_feedback(&session.reference_text, &session.typed_text)
                .map(|(expected, outcome)| match outcome {
                    CharOutcome::Correct => Span::styled(expected.to_string(), green_bold_style),
                    CharOutcome::Incorrect => Span::styled(
                        match expected {
                            ' ' => "·".to_owned(),
                            c => c.to_string(),
                        },
                        red_bold_style,
                    ),
                    CharOutcome::Untyped => Span::styled(expected.to_string(), dim_bold_style),
                })
                .collect::<Vec<Span>>();
            Paragraph::new(Line::from(spans))
        }
        .alignment(if prompt_occupied_lines == 1 {
            // a one-line paragraph reads best centered
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });

        paragraph.render(chunks[1], buf);

        let input_line = match session.phase {
            Phase::Countdown => Span::styled(
                format!("Starting in {}....", session.countdown_remaining),
                dim_italic_style,
            ),
            Phase::Running if session.typed_text.is_empty() => {
                Span::styled("Start typing here....".to_owned(), dim_italic_style)
            }
            _ => Span::styled(session.typed_text.clone(), bold_style),
        };
        Paragraph::new(input_line)
            .wrap(Wrap { trim: false })
            .render(chunks[3], buf);

        let status = Paragraph::new(Span::styled(
            format!(
                "time remaining: {}s   high score: {} words",
                session.time_remaining, self.high_score
            ),
            bold_style,
        ))
        .alignment(Alignment::Center);
        status.render(chunks[4], buf);

        let summary = session.summary.clone().unwrap_or_default();

        let results = Paragraph::new(Span::styled(
            format!(
                "{:.2} wpm   {:.2}% acc",
                summary.words_per_minute, summary.accuracy_percent
            ),
            bold_style,
        ))
        .alignment(Alignment::Center);
        results.render(chunks[5], buf);

        let words = Paragraph::new(Span::styled(
            format!(
                "correct words: {}   incorrect words: {}",
                summary.correct_word_count, summary.incorrect_word_count
            ),
            bold_style,
        ))
        .alignment(Alignment::Center);
        words.render(chunks[6], buf);

        let legend_text = match session.phase {
            Phase::Idle | Phase::Ended => "(enter) start / (esc) quit",
            Phase::Countdown => "get ready....",
            Phase::Running => "(enter) stop / (esc) quit",
        };
        Paragraph::new(Span::styled(legend_text, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[8], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::source::FixedParagraphSource;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::mpsc;
    use std::sync::Arc;

    fn buffer_content(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn test_app() -> App {
        App::new(
            &Config::default(),
            Arc::new(FixedParagraphSource::new("pack my box")),
            None,
        )
    }

    #[test]
    fn renders_idle_screen() {
        let app = test_app();
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();

        let content = buffer_content(&terminal);
        assert!(content.contains("TYPING SPEED TEST"));
        assert!(content.contains("waiting for a paragraph"));
        assert!(content.contains("time remaining: 60s"));
        assert!(content.contains("(enter) start"));
    }

    #[test]
    fn renders_countdown_placeholder() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel();
        app.start_session(&tx);

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();

        let content = buffer_content(&terminal);
        assert!(content.contains("Starting in 3"));
        assert!(content.contains("get ready"));
    }

    #[test]
    fn renders_reference_and_typed_text_while_running() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel();
        app.start_session(&tx);
        let id = app.session.id;
        app.on_paragraph(id, Ok("pack my box".to_string()));
        for _ in 0..3 {
            app.on_tick(id);
        }
        app.on_char('p');
        app.on_char('a');

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();

        let content = buffer_content(&terminal);
        assert!(content.contains("pack my box"));
        assert!(content.contains("pa"));
        assert!(content.contains("(enter) stop"));
    }

    #[test]
    fn renders_summary_after_session_ends() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel();
        app.start_session(&tx);
        let id = app.session.id;
        app.on_paragraph(id, Ok("pack my box".to_string()));
        for _ in 0..3 {
            app.on_tick(id);
        }
        for c in "pack my".chars() {
            app.on_char(c);
        }
        for _ in 0..30 {
            app.on_tick(id);
        }
        app.stop_session();

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();

        let content = buffer_content(&terminal);
        assert!(content.contains("4.00 wpm"));
        assert!(content.contains("66.67% acc"));
        assert!(content.contains("correct words: 2"));
        assert!(content.contains("incorrect words: 0"));
    }

    #[test]
    fn renders_in_a_small_area_without_panicking() {
        let app = test_app();
        let backend = TestBackend::new(20, 6);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();
    }
}
