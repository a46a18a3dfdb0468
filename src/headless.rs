//! Headless mode: load once, print matching rows, exit.

use std::io::Write;

use anyhow::Context;
use stockbin_core::{
    config::Config,
    display::{bin_label, format_expiry, quantity_label},
    Row,
};
use stockbin_feeds::{load_once, Source};

/// Output encoding for headless results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    /// One tab-separated line per row, display-normalised.
    #[default]
    Raw,
    /// One JSON object per row: the raw fields plus `expiry_display`.
    Jsonl,
}

/// `company\tproduct\tquantity\texpiry\tbin`, as shown on a result card.
pub fn raw_line(row: &Row) -> String {
    [
        row.company.as_str(),
        row.product.as_str(),
        quantity_label(&row.incoming_quantity),
        &format_expiry(&row.expiry),
        bin_label(&row.storage_bin),
    ]
    .join("\t")
}

pub fn jsonl_line(row: &Row) -> anyhow::Result<String> {
    let mut value = serde_json::to_value(row)?;
    if let Some(map) = value.as_object_mut() {
        map.insert("expiry_display".to_string(), format_expiry(&row.expiry).into());
    }
    Ok(serde_json::to_string(&value)?)
}

/// Write `rows` to `out` in `format`.
pub fn write_rows<W: Write>(out: &mut W, rows: &[&Row], format: Format) -> anyhow::Result<()> {
    for row in rows {
        let line = match format {
            Format::Raw => raw_line(row),
            Format::Jsonl => jsonl_line(row)?,
        };
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Load the configured source once and print the rows matching `query`, or
/// every row when there is no query. A failed load is an error.
pub fn run(config: &Config, query: Option<&str>, format: Format) -> anyhow::Result<()> {
    let location = config.source.location.as_str();
    let source = Source::parse(location)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let rows = runtime
        .block_on(load_once(&source, &config.ingest_options()))
        .with_context(|| format!("loading {location}"))?;
    tracing::info!(%location, rows = rows.len(), "headless load complete");

    let matches: Vec<&Row> = match query {
        Some(q) => stockbin_core::search(&rows, q, &config.search_options()),
        None => rows.iter().collect(),
    };
    tracing::debug!(query = ?query, matches = matches.len(), "headless search");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_rows(&mut out, &matches, format)?;
    out.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
