pub mod gallows;
pub mod screen;
pub mod staging;

use hangman::{RoundState, RoundStatus};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::App;

pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const KEYS_PER_ROW: usize = 9;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const POPUP_WIDTH: u16 = 34;
const POPUP_HEIGHT: u16 = 9;

pub fn key_count() -> usize {
    ALPHABET.len()
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// The playing board: tallies, gallows, word slots, keyboard, status
impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(round) = self.session.current_round() else {
            return;
        };

        let keyboard_rows = key_count().div_ceil(KEYS_PER_ROW) as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // tallies
                Constraint::Min(1),    // padding
                Constraint::Length(gallows::height()),
                Constraint::Length(1), // padding
                Constraint::Length(1), // word
                Constraint::Length(1), // padding
                Constraint::Length(keyboard_rows * 2 - 1),
                Constraint::Min(1), // padding
                Constraint::Length(1), // status
                Constraint::Length(1), // legend
            ])
            .split(area);

        let tallies = self.session.tallies();
        Paragraph::new(Line::from(vec![
            Span::styled("Victories: ", dim()),
            Span::styled(tallies.victories.to_string(), bold().fg(Color::Green)),
            Span::raw("   "),
            Span::styled("Defeats: ", dim()),
            Span::styled(tallies.defeats.to_string(), bold().fg(Color::Red)),
            Span::raw("   "),
            Span::styled("Misses left: ", dim()),
            Span::styled(round.remaining_misses().to_string(), bold()),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        let parts = gallows::parts_visible(round.miss_count(), round.max_misses());
        let figure_style = if round.status() == RoundStatus::Lost {
            bold().fg(Color::Red)
        } else {
            bold()
        };
        Paragraph::new(
            gallows::figure_lines(parts)
                .into_iter()
                .map(|l| Line::from(Span::styled(l, figure_style)))
                .collect::<Vec<Line>>(),
        )
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        Paragraph::new(self.word_line(round))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);

        Paragraph::new(self.keyboard_lines(round))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);

        Paragraph::new(Span::styled(
            self.status_line.as_str(),
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[8], buf);

        Paragraph::new(Span::styled(
            "(a-z) guess  (tab) new word  (esc)ape",
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[9], buf);
    }
}

impl App {
    fn word_line(&self, round: &RoundState) -> Line<'static> {
        let visible = self.staging.visible_letters();
        let spans = round
            .revealed_word_with(self.settings.reveal_policy)
            .into_iter()
            .take(visible)
            .enumerate()
            .flat_map(|(idx, slot)| {
                let glyph = if slot.revealed {
                    let style = if round.has_guessed(slot.letter) {
                        bold().fg(Color::Green)
                    } else {
                        // shown only because the round ended
                        bold().fg(Color::Red)
                    };
                    Span::styled(slot.letter.to_string(), style)
                } else {
                    Span::styled("_", bold())
                };
                let gap = if idx == 0 { "" } else { " " };
                [Span::raw(gap), glyph]
            })
            .collect::<Vec<Span>>();
        Line::from(spans)
    }

    fn keyboard_lines(&self, round: &RoundState) -> Vec<Line<'static>> {
        let visible = self.staging.visible_keys();
        let keys: Vec<char> = ALPHABET.chars().collect();
        let mut lines = Vec::new();
        for (row_idx, row) in keys.chunks(KEYS_PER_ROW).enumerate() {
            if row_idx > 0 {
                lines.push(Line::default());
            }
            let spans = row
                .iter()
                .enumerate()
                .map(|(col, &key)| {
                    let idx = row_idx * KEYS_PER_ROW + col;
                    if idx >= visible {
                        return Span::raw("    ");
                    }
                    let in_word = round.secret_word().contains(key);
                    let style = match (round.has_guessed(key), in_word) {
                        (false, _) => bold(),
                        (true, true) => dim().fg(Color::Green),
                        (true, false) => dim()
                            .fg(Color::Red)
                            .add_modifier(Modifier::CROSSED_OUT),
                    };
                    Span::styled(format!("[{key}] "), style)
                })
                .collect::<Vec<Span>>();
            lines.push(Line::from(spans));
        }
        lines
    }
}

pub fn render_instructions(area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(2),
            Constraint::Length(gallows::height()),
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    Paragraph::new(Span::styled("H A N G M A N", bold().fg(Color::Yellow)))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(
        gallows::figure_lines(gallows::FIGURE_PARTS)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, dim())))
            .collect::<Vec<Line>>(),
    )
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(vec![
        Line::from("Guess the secret word one letter at a time."),
        Line::from("Every wrong letter adds a piece to the gallows."),
        Line::from("Find every letter before the figure is complete."),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[4], buf);

    Paragraph::new(Span::styled(
        "(enter) start  (esc)ape",
        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);
}

/// End-of-round overlay drawn on top of the board
pub fn render_round_over(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(round) = app.session.current_round() else {
        return;
    };
    let tallies = app.session.tallies();
    let (title, color) = match round.status() {
        RoundStatus::Won => ("You Win!", Color::Green),
        _ => ("You Lose!", Color::Red),
    };

    let popup = centered_rect(POPUP_WIDTH, POPUP_HEIGHT, area);
    Clear.render(popup, buf);

    Paragraph::new(vec![
        Line::from(Span::styled(title, bold().fg(color))),
        Line::default(),
        Line::from(format!("The word was {}", round.secret_word())),
        Line::from(format!("Victories: {}", tallies.victories)),
        Line::from(format!("Defeats: {}", tallies.defeats)),
        Line::default(),
        Line::from(Span::styled(
            "(r)estart  (esc)ape",
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL))
    .render(popup, buf);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
