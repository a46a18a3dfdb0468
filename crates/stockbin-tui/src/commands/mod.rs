// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use std::path::PathBuf;

use stockbin_feeds::{LoadOrigin, Source};

use crate::{app::AppState, theme::Theme};

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Close the app
    Quit,
    // Display help
    Help,
    // Change theme
    Theme(String),
    // Load a local workbook; on failure the current rows stay
    Open(PathBuf),
    // Fetch the configured source again
    Reload,
    // Drop rows, query and selection
    Reset,
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// string returns `Err("")` as a sentinel meaning "close without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            "reload" => Ok(Command::Reload),
            "reset" => Ok(Command::Reset),
            "theme" => {
                if rest.is_empty() {
                    Err("usage: theme <default|gruvbox>".to_string())
                } else {
                    Ok(Command::Theme(rest.to_string()))
                }
            }
            "o" | "open" => {
                if rest.is_empty() {
                    return Err("usage: open <path.xlsx>".to_string());
                }
                let path = PathBuf::from(rest);
                let is_xlsx = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
                if is_xlsx {
                    Ok(Command::Open(path))
                } else {
                    Err("엑셀(.xlsx) 파일만 열 수 있어요.".to_string())
                }
            }
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Execute a parsed [`Command`] against the application state.
pub fn execute_command(s: &mut AppState, cmd: Command) {
    match cmd {
        Command::Quit => {
            s.quit = true;
        }
        Command::Help => {
            s.show_help = !s.show_help;
        }
        Command::Theme(name) => {
            s.theme = Theme::by_name(&name);
        }
        Command::Open(path) => {
            s.request_load(Source::File(path), LoadOrigin::Upload);
        }
        Command::Reload => {
            let location = s.config.source.location.clone();
            s.request_location(&location, LoadOrigin::Reload);
        }
        Command::Reset => {
            s.reset();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
