//! Header: title, store status and the latest status message.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};
use stockbin_core::{Status, Store};

pub const TITLE: &str = "물품 보관장";

/// Message-box severity; decides which status style the message gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Info,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub tone: Tone,
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Info }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Error }
    }
}

pub struct Header<'a> {
    store: &'a Store,
    message: &'a Message,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(store: &'a Store, message: &'a Message, theme: &'a Theme) -> Self {
        Self { store, message, theme }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().border_style(self.theme.border_unfocused);
        let inner = block.inner(area);
        block.render(area, buf);

        let title = Line::from(vec![
            Span::styled(TITLE, self.theme.title),
            Span::raw("  "),
            Span::styled(self.store.status_line(), self.theme.status_style(self.store.status())),
        ]);

        let message_style = match self.message.tone {
            Tone::Error => self.theme.status_error,
            Tone::Info => match self.store.status() {
                Status::Failed { .. } => self.theme.status_idle,
                other => self.theme.status_style(other),
            },
        };
        let message = Line::from(Span::styled(self.message.text.as_str(), message_style));

        Paragraph::new(vec![title, message]).render(inner, buf);
    }
}
