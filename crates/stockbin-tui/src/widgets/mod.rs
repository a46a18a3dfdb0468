//! Ratatui widgets for the stockbin TUI.

use ratatui::layout::Rect;

pub mod command_bar;
pub mod detail;
pub mod header;
pub mod help;
pub mod query_bar;
pub mod result_list;

pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
