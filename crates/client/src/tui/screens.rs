use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};

use bomber::{ScoreEntry, Tick};

use super::board::to_color;

const SIDEBAR_WIDTH: u16 = 34;

/// Everything the last repaint showed, updated piecemeal by the frontend.
#[derive(Debug, Default)]
pub struct Hud {
    pub board: Vec<Line<'static>>,
    pub tick: Tick,
    pub status: String,
    pub connected: bool,
    pub scoreboard: Vec<ScoreEntry>,
    pub revivals: Vec<String>,
    pub game_over: Option<String>,
    pub flash: bool,
}

pub fn render(frame: &mut Frame, hud: &Hud) {
    let area = frame.area();

    let border = if hud.flash { Color::Red } else { Color::Cyan };
    let block = Block::default()
        .title(" Bomber ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(SIDEBAR_WIDTH)])
        .split(area);

    render_board(frame, columns[0], hud);
    render_sidebar(frame, columns[1], hud);

    if let Some(message) = &hud.game_over {
        render_game_over(frame, columns[0], message);
    }
}

fn render_board(frame: &mut Frame, area: Rect, hud: &Hud) {
    let block = Block::default()
        .title(format!(" Tick {} ", hud.tick))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let body = if hud.board.is_empty() {
        Paragraph::new("Waiting for the game state...")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
    } else {
        Paragraph::new(hud.board.clone())
    };
    frame.render_widget(body.block(block), area);
}

fn render_sidebar(frame: &mut Frame, area: Rect, hud: &Hud) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(hud.revivals.len() as u16 + 2),
            Constraint::Length(3),
        ])
        .split(area);

    let status_color = if hud.connected {
        Color::Green
    } else {
        Color::Yellow
    };
    let status = Paragraph::new(hud.status.as_str())
        .style(Style::default().fg(status_color))
        .block(Block::default().title(" Status ").borders(Borders::ALL));
    frame.render_widget(status, chunks[0]);

    let items: Vec<ListItem> = hud.scoreboard.iter().map(score_item).collect();
    let scoreboard = List::new(items).block(
        Block::default()
            .title(" Kills ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(scoreboard, chunks[1]);

    let revivals: Vec<ListItem> = hud
        .revivals
        .iter()
        .map(|line| ListItem::new(line.as_str()))
        .collect();
    let revivals = List::new(revivals)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().title(" Graveyard ").borders(Borders::ALL));
    frame.render_widget(revivals, chunks[2]);

    let help = Paragraph::new("Arrows/WASD Move  Space Bomb\nEnter Join  R Reset  Q Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

fn score_item(entry: &ScoreEntry) -> ListItem<'static> {
    let marker = if entry.is_me { "> " } else { "  " };
    let mut style = Style::default().fg(entry.color.map_or(Color::White, to_color));
    if !entry.alive {
        style = style.add_modifier(Modifier::CROSSED_OUT | Modifier::DIM);
    }
    if entry.is_me {
        style = style.add_modifier(Modifier::BOLD);
    }

    ListItem::new(Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{:<20}", entry.name), style),
        Span::styled(format!("{:>4}", entry.kills), Style::default().fg(Color::White)),
    ]))
}

fn render_game_over(frame: &mut Frame, area: Rect, message: &str) {
    let dialog_area = centered_rect(36, 6, area);
    frame.render_widget(Clear, dialog_area);

    let lines = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "R Reset  Q Quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let dialog = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(" Game Over ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(dialog, dialog_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
