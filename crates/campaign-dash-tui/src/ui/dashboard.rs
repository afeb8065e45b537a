//! Metric tile widget and tile hit-testing.
//!
//! Tiles are laid out left to right in catalog order. Each tile owns a slot
//! one row taller than the tile itself; a resting tile sits at the bottom of
//! its slot and a hovered tile is lifted to the top with a thick bright
//! border. Mouse hit-testing uses the whole slot so the hover target does
//! not move when the tile does.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Position, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use campaign_dash_core::dashboard::{Dashboard, Tile};

use super::styles;

/// Rows taken by the dashboard row, including the lift margin
pub const DASHBOARD_HEIGHT: u16 = 6;

const TILE_HEIGHT: u16 = DASHBOARD_HEIGHT - 1;
const MAX_TILE_WIDTH: u16 = 26;
const MIN_TILE_WIDTH: u16 = 12;
/// Blank columns between tiles
const TILE_GAP: u16 = 1;

/// Slots for `count` tiles inside `area`. Empty when they do not fit.
pub fn tile_slots(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 || area.height < DASHBOARD_HEIGHT {
        return Vec::new();
    }
    let slot_width = (area.width / count as u16).min(MAX_TILE_WIDTH);
    if slot_width < MIN_TILE_WIDTH {
        return Vec::new();
    }

    (0..count as u16)
        .map(|i| Rect::new(area.x + i * slot_width, area.y, slot_width, DASHBOARD_HEIGHT))
        .collect()
}

/// Index of the tile whose slot contains `position`
pub fn tile_at(area: Rect, count: usize, position: Position) -> Option<usize> {
    tile_slots(area, count)
        .iter()
        .position(|slot| slot.contains(position))
}

/// Where the tile box is drawn inside its slot
fn tile_rect(slot: Rect, hovered: bool) -> Rect {
    let y = if hovered { slot.y } else { slot.y + 1 };
    Rect::new(slot.x, y, slot.width.saturating_sub(TILE_GAP), TILE_HEIGHT)
}

/// Renders a mounted [`Dashboard`]
pub struct DashboardWidget<'a> {
    dashboard: &'a Dashboard,
    hovered: Option<usize>,
    selected: Option<usize>,
}

impl<'a> DashboardWidget<'a> {
    pub fn new(dashboard: &'a Dashboard) -> Self {
        Self {
            dashboard,
            hovered: None,
            selected: None,
        }
    }

    pub fn hovered(mut self, index: Option<usize>) -> Self {
        self.hovered = index;
        self
    }

    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }
}

fn tile_lines(tile: &Tile) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(tile.display_label(), styles::tile_label_style())),
        Line::from(Span::styled(
            tile.display_value(),
            styles::tile_value_style(tile.color),
        )),
    ];
    if let Some(pct) = tile.display_percentage() {
        lines.push(Line::from(Span::styled(pct, styles::muted_style())));
    }
    lines
}

impl Widget for DashboardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let slots = tile_slots(area, self.dashboard.len());

        for (i, (tile, slot)) in self.dashboard.tiles.iter().zip(slots).enumerate() {
            let hovered = self.hovered == Some(i);
            let selected = self.selected == Some(i);

            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(if hovered { BorderType::Thick } else { BorderType::Rounded })
                .border_style(styles::tile_border_style(tile.color, hovered, selected))
                .style(styles::tile_body_style(hovered));

            Paragraph::new(tile_lines(tile))
                .alignment(Alignment::Center)
                .block(block)
                .render(tile_rect(slot, hovered), buf);
        }
    }
}
