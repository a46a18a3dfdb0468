//! stockbin TUI: ratatui application shell.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use stockbin_core::config::Config;

/// Start the TUI with an already-resolved configuration. Blocks until the
/// user quits.
pub fn run(config: Config) -> anyhow::Result<()> {
    let theme = theme::Theme::by_name(&config.ui.theme);
    tracing::info!(
        location = %config.source.location,
        autoload = config.source.autoload,
        theme = %config.ui.theme,
        "starting tui"
    );
    App::new(config, theme)?.run()
}
