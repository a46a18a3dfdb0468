//! Detail popup for the highlighted card. Closed with `Escape`, `Enter` or `q`.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};
use stockbin_core::display::{bin_label, format_expiry, quantity_label};
use stockbin_core::Row;

/// `(label, value)` pairs listed under the bin label.
pub fn detail_lines(row: &Row) -> Vec<(&'static str, String)> {
    vec![
        ("업체명", row.company.clone()),
        ("상품명", row.product.clone()),
        ("입고수량", quantity_label(&row.incoming_quantity).to_string()),
        ("유통기한", format_expiry(&row.expiry)),
    ]
}

pub struct DetailPopup<'a> {
    row: &'a Row,
    theme: &'a Theme,
}

impl<'a> DetailPopup<'a> {
    pub fn new(row: &'a Row, theme: &'a Theme) -> Self {
        Self { row, theme }
    }
}

impl Widget for DetailPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = super::centered_rect(48, 11, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" 보관장 ")
            .border_style(self.theme.border_popup);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = vec![
            Line::from(Span::styled(
                bin_label(&self.row.storage_bin),
                self.theme.card_bin.add_modifier(Modifier::BOLD),
            ))
            .centered(),
            Line::default(),
        ];
        lines.extend(detail_lines(self.row).into_iter().map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:<6}"), self.theme.card_meta),
                Span::raw("  "),
                Span::raw(value),
            ])
        }));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Esc / Enter 로 닫기", self.theme.placeholder)).centered());

        Paragraph::new(lines).render(inner, buf);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
