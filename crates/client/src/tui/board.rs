//! Turns a [`GameView`] into styled terminal lines, two columns per tile.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use bomber::Tile;
use bomber::state::{GameView, Rgb};

use crate::assets::Glyphs;

const WALL: &str = "██";
const BRICK: &str = "▒▒";
const EMPTY: &str = "  ";
const FIRE: &str = "**";

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub glyph: String,
    pub style: Style,
}

impl Cell {
    fn new(glyph: &str, style: Style) -> Self {
        Self {
            glyph: glyph.to_string(),
            style,
        }
    }
}

/// Layers tiles, tombstones, bombs, fire and players, later layers on top.
pub fn compose(view: &GameView<'_>, glyphs: &Glyphs) -> Vec<Vec<Cell>> {
    // Sized from the received rows, never from the declared dimensions.
    let mut grid: Vec<Vec<Cell>> = view
        .board()
        .rows()
        .iter()
        .map(|row| row.iter().map(|&tile| tile_cell(tile)).collect())
        .collect();

    let mut put = |x: u32, y: u32, cell: Cell| {
        if let Some(slot) = grid
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *slot = cell;
        }
    };

    for sprite in view.tombstones() {
        let stone = sprite.tombstone;
        put(
            stone.x,
            stone.y,
            Cell::new(&glyphs.tombstone, Style::default().fg(Color::Gray)),
        );
    }

    for sprite in view.bombs().filter(|b| b.visible) {
        put(
            sprite.bomb.x,
            sprite.bomb.y,
            Cell::new(&glyphs.bomb, Style::default().fg(Color::LightRed)),
        );
    }

    for sprite in view.explosions() {
        put(sprite.x, sprite.y, Cell::new(FIRE, fire_style(sprite.intensity)));
    }

    for sprite in view.players().filter(|p| p.visible && p.player.alive) {
        let mut style = Style::default().fg(sprite.color.map_or(Color::White, to_color));
        if sprite.is_me {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        if sprite.immortal {
            style = style.add_modifier(Modifier::DIM);
        }
        let player = sprite.player;
        put(player.x, player.y, Cell::new(glyphs.hero(player.figure), style));
    }

    grid
}

pub fn lines(grid: Vec<Vec<Cell>>) -> Vec<Line<'static>> {
    grid.into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|cell| Span::styled(cell.glyph, cell.style))
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

pub fn render(view: &GameView<'_>, glyphs: &Glyphs) -> Vec<Line<'static>> {
    lines(compose(view, glyphs))
}

pub fn to_color(rgb: Rgb) -> Color {
    let Rgb(r, g, b) = rgb;
    Color::Rgb(r, g, b)
}

fn tile_cell(tile: Tile) -> Cell {
    match tile {
        Tile::Wall => Cell::new(WALL, Style::default().fg(Color::DarkGray)),
        Tile::Brick => Cell::new(BRICK, Style::default().fg(Color::Rgb(160, 82, 45))),
        Tile::Empty => Cell::new(EMPTY, Style::default()),
    }
}

/// Yellow when fresh, fading to deep red.
fn fire_style(intensity: f32) -> Style {
    let green = (64.0 + 191.0 * intensity.clamp(0.0, 1.0)) as u8;
    Style::default()
        .fg(Color::Rgb(255, green, 0))
        .add_modifier(Modifier::BOLD)
}
