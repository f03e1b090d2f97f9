use ticketbook_api::{AttendanceRecord, Outcome, Side, Team, parse_score};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Paragraph, Widget};

use crate::draw::default_border;

/// Rows a card takes, borders included.
pub const CARD_HEIGHT: u16 = 5;

pub fn result_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::Win => Color::Green,
        Outcome::Lose => Color::Red,
        Outcome::Draw => Color::Gray,
        Outcome::Scheduled => Color::Yellow,
    }
}

/// `"#RRGGBB"` → RGB color.
pub fn hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Highlight color for the user's club, white without one.
pub fn team_color(team: Option<&Team>) -> Color {
    team.and_then(|t| hex_color(t.primary_color))
        .filter(|c| *c != Color::Rgb(0, 0, 0))
        .unwrap_or(Color::White)
}

/// One attended game, drawn like a ticket stub.
pub struct TicketCard<'a> {
    pub record: &'a AttendanceRecord,
    pub selected: bool,
    pub accent: Color,
}

impl TicketCard<'_> {
    fn matchup_line(&self) -> Line<'static> {
        let matchup = self.record.matchup();
        let mine = Style::default().add_modifier(Modifier::BOLD);
        let plain = Style::default();
        let (away_style, home_style) = match self.record.my_side {
            Side::Away => (mine, plain),
            Side::Home => (plain, mine),
        };

        let middle = match parse_score(&self.record.score) {
            Ok(score) => format!("  {}  ", score),
            Err(_) => "  vs  ".to_string(),
        };
        Line::from(vec![
            Span::styled(matchup.away, away_style),
            Span::styled(middle, Style::default().fg(Color::Gray)),
            Span::styled(matchup.home, home_style),
        ])
    }
}

impl Widget for TicketCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.selected { self.accent } else { Color::DarkGray };
        let block = default_border(border_color);
        let inner = block.inner(area);
        block.render(area, buf);

        let result = self.record.result;
        let header = Line::from(vec![
            Span::styled(self.record.date.clone(), Style::default().fg(Color::Gray)),
            Span::raw("  "),
            Span::styled(
                format!("[{}]", result.label()),
                Style::default().fg(result_color(result)).add_modifier(Modifier::BOLD),
            ),
        ]);

        let mut place = self.record.stadium.clone();
        if !self.record.seat.is_empty() {
            place = format!("{place} · {}", self.record.seat);
        }

        let lines = vec![
            header,
            self.matchup_line(),
            Line::from(Span::styled(place, Style::default().fg(Color::DarkGray))),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol().to_string()).collect()
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(hex_color("#C30452"), Some(Color::Rgb(0xC3, 0x04, 0x52)));
        assert_eq!(hex_color("C30452"), None);
        assert_eq!(hex_color("#12"), None);
        assert_eq!(hex_color("#zzzzzz"), None);
    }

    #[test]
    fn black_team_color_falls_back_to_white() {
        assert_eq!(team_color(ticketbook_api::team_by_id("kt")), Color::White);
        assert_eq!(team_color(None), Color::White);
        assert_eq!(team_color(ticketbook_api::team_by_id("lg")), Color::Rgb(0xC3, 0x04, 0x52));
    }

    #[test]
    fn card_shows_result_and_score() {
        let record = AttendanceRecord {
            date: "2025-05-05 (Mon)".into(),
            matchup: "KIA vs LG".into(),
            result: Outcome::Lose,
            score: "3:5".into(),
            stadium: "Jamsil".into(),
            seat: "1B".into(),
            my_side: Side::Away,
            ..Default::default()
        };
        let area = Rect::new(0, 0, 40, CARD_HEIGHT);
        let mut buf = Buffer::empty(area);
        TicketCard { record: &record, selected: true, accent: Color::Red }.render(area, &mut buf);

        assert!(row(&buf, 1).contains("[LOSE]"));
        assert!(row(&buf, 2).contains("KIA  3:5  LG"));
        assert!(row(&buf, 3).contains("Jamsil · 1B"));
    }
}
