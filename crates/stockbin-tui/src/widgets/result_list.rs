//! Result list: the search results rendered as a column of cards.
//!
//! # Navigation (when focused)
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k` | Previous card |
//! | `↓` / `j` | Next card |
//! | `PageUp` / `Ctrl+u` | Up one page of cards |
//! | `PageDown` / `Ctrl+d` | Down one page of cards |
//! | `Enter` / `Space` | Open the detail popup (handled by the app) |
//!
//! `offset` is the index of the first visible card; `cursor` is always kept
//! inside the visible window.

use std::cell::Cell;

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};
use stockbin_core::display::{bin_label, format_expiry, quantity_label};
use stockbin_core::Row;

/// Rows per card, borders included.
pub const CARD_HEIGHT: u16 = 5;

pub const NO_RESULTS: &str = "검색 결과가 없어요.";

/// `검색 결과 N건`, shown above the cards while a query is present.
pub fn summary_line(count: usize) -> String {
    format!("검색 결과 {count}건")
}

/// Text lines inside a card, below its bin-label title.
pub fn card_lines(row: &Row) -> [String; 3] {
    [
        row.company.clone(),
        row.product.clone(),
        format!(
            "입고 {} · 유통 {}",
            quantity_label(&row.incoming_quantity),
            format_expiry(&row.expiry)
        ),
    ]
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ResultListState {
    /// Matches for the current query, in source order.
    pub rows: Vec<Row>,
    /// Whether a non-empty query produced `rows`.
    pub has_query: bool,
    /// Index into `rows` of the highlighted card.
    pub cursor: usize,
    /// Index of the first visible card.
    pub offset: usize,
    /// Cards that fit in the last render; `handle()` pages by this.
    last_page: Cell<usize>,
}

impl ResultListState {
    /// Replace the results and move back to the top.
    pub fn set(&mut self, rows: Vec<Row>, has_query: bool) {
        self.rows = rows;
        self.has_query = has_query;
        self.cursor = 0;
        self.offset = 0;
    }

    pub fn clear(&mut self) {
        self.set(Vec::new(), false);
    }

    pub fn selected(&self) -> Option<&Row> {
        self.rows.get(self.cursor)
    }

    fn page(&self) -> usize {
        self.last_page.get().max(1)
    }

    fn follow_cursor(&mut self) {
        let page = self.page();
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + page {
            self.offset = self.cursor + 1 - page;
        }
    }

    pub fn handle(&mut self, event: &AppEvent) {
        let total = self.rows.len();
        if total == 0 {
            return;
        }

        match event {
            AppEvent::Nav(Direction::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            AppEvent::Nav(Direction::Down) => {
                if self.cursor + 1 < total {
                    self.cursor += 1;
                }
            }
            AppEvent::PageUp => {
                self.cursor = self.cursor.saturating_sub(self.page());
            }
            AppEvent::PageDown => {
                self.cursor = (self.cursor + self.page()).min(total - 1);
            }
            _ => return,
        }
        self.follow_cursor();
        tracing::debug!(cursor = self.cursor, offset = self.offset, "results: cursor moved");
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct ResultList<'a> {
    state: &'a ResultListState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> ResultList<'a> {
    pub fn new(state: &'a ResultListState, focused: bool, theme: &'a Theme) -> Self {
        Self { state, focused, theme }
    }
}

impl Widget for ResultList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };
        let block = Block::bordered().title("결과").border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        if !self.state.has_query || inner.height == 0 {
            self.state.last_page.set(1);
            return;
        }

        let header = Rect { height: 1, ..inner };
        let text = if self.state.rows.is_empty() {
            NO_RESULTS.to_string()
        } else {
            summary_line(self.state.rows.len())
        };
        Paragraph::new(Line::from(Span::styled(text, self.theme.card_meta))).render(header, buf);

        let body = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
            ..inner
        };
        let page = (body.height / CARD_HEIGHT) as usize;
        self.state.last_page.set(page);

        let visible = self.state.rows.iter().enumerate().skip(self.state.offset).take(page);
        for (slot, (index, row)) in visible.enumerate() {
            let card_area = Rect {
                y: body.y + slot as u16 * CARD_HEIGHT,
                height: CARD_HEIGHT,
                ..body
            };
            render_card(row, index == self.state.cursor && self.focused, self.theme, card_area, buf);
        }
    }
}

fn render_card(row: &Row, highlighted: bool, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let mut border = theme.border_unfocused;
    if highlighted {
        border = border.patch(theme.card_selected);
    }
    let title = Span::styled(
        format!(" {} ", bin_label(&row.storage_bin)),
        theme.card_bin.add_modifier(Modifier::BOLD),
    );
    let block = Block::bordered().title(title).border_style(border);
    let inner = block.inner(area);
    block.render(area, buf);

    let [company, product, meta] = card_lines(row);
    let lines = vec![
        Line::from(Span::styled(company, theme.card_company)),
        Line::from(Span::styled(product, theme.card_product)),
        Line::from(Span::styled(meta, theme.card_meta)),
    ];
    Paragraph::new(lines).render(inner, buf);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
