use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use stockbin::headless::{self, Format};
use stockbin_core::config::{Config, Profile};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileArg {
    /// Fetch the configured workbook at startup, cap results at 120.
    Fetch,
    /// Start empty and load with `:open`; keep every row and space.
    Upload,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Fetch => Profile::Fetch,
            ProfileArg::Upload => Profile::Upload,
        }
    }
}

#[derive(Parser)]
#[command(name = "stockbin", about = "Storage-bin lookup for an inventory spreadsheet")]
struct Cli {
    /// Workbook location: an http:// URL or a local path.
    #[arg(long, value_name = "LOC")]
    source: Option<String>,

    /// Config file (default: ~/.config/stockbin/config.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum number of search results.
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Keep rows whose company, product and bin are all empty.
    #[arg(long)]
    keep_blank_rows: bool,

    /// Match internal spaces in queries literally.
    #[arg(long)]
    keep_spaces: bool,

    /// Preset for the policy flags above.
    #[arg(long, value_enum)]
    profile: Option<ProfileArg>,

    /// Write debug logs to a file in the temp dir (tail -f to inspect).
    #[arg(long)]
    debug: bool,

    /// Load once, print matches to stdout and exit.
    #[arg(long)]
    headless: bool,

    /// Search query for headless mode. Without it every loaded row is
    /// printed; an empty query matches nothing.
    #[arg(long, value_name = "Q", requires = "headless")]
    query: Option<String>,

    /// Headless output format.
    #[arg(long, value_enum, default_value_t = Format::Raw)]
    format: Format,
}

impl Cli {
    /// Profile first, then individual flags on top.
    fn apply(&self, config: &mut Config) {
        if let Some(profile) = self.profile {
            config.apply_profile(profile.into());
        }
        if let Some(source) = &self.source {
            config.source.location = source.clone();
        }
        if self.limit.is_some() {
            config.search.limit = self.limit;
        }
        if self.keep_blank_rows {
            config.ingest.drop_blank_rows = false;
        }
        if self.keep_spaces {
            config.search.strip_whitespace = false;
        }
    }
}

fn env_filter(default: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    if cli.headless {
        // stdout carries results; logs go to stderr.
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter(if cli.debug { "debug" } else { "warn" }))
            .init();
    } else if cli.debug {
        let path = std::env::temp_dir().join("stockbin-debug.log");
        let file = std::fs::OpenOptions::new().create(true).append(true).open(&path)?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(env_filter("debug"))
            .init();
        tracing::info!(path = %path.display(), "stockbin debug log started");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    tracing::debug!(?config, "configuration resolved");

    if cli.headless {
        return headless::run(&config, cli.query.as_deref(), cli.format);
    }
    stockbin_tui::run(config)
}
