//! Runs loads on the tokio runtime and reports completions.
//!
//! Loads never touch the store themselves. Each one carries the
//! [`LoadTicket`] issued by `Store::begin_load`, and the UI thread hands the
//! finished [`LoadOutcome`] back to `Store::complete`, which discards it if a
//! newer load or a reset happened in the meantime. There is no cancellation;
//! a superseded load simply runs to completion and is ignored.

use stockbin_core::{ingest, IngestOptions, LoadError, LoadTicket, OnError, ParseError, Row};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::source::Source;

/// Why a load was started. Decides what a failure does to the current rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Automatic fetch of the configured source at startup.
    Startup,
    /// User asked to fetch the configured source again.
    Reload,
    /// User picked a local file.
    Upload,
}

impl LoadOrigin {
    pub fn on_error(self) -> OnError {
        match self {
            LoadOrigin::Startup | LoadOrigin::Reload => OnError::Clear,
            LoadOrigin::Upload => OnError::Retain,
        }
    }
}

/// A finished load, waiting to be applied to the store.
#[derive(Debug)]
pub struct LoadOutcome {
    pub ticket: LoadTicket,
    pub origin: LoadOrigin,
    /// Location of the source, for status messages.
    pub location: String,
    pub result: Result<Vec<Row>, LoadError>,
}

/// Read `source` and ingest its bytes on the blocking pool.
pub async fn load_once(source: &Source, options: &IngestOptions) -> Result<Vec<Row>, LoadError> {
    let bytes = source.read().await?;
    let options = *options;
    let rows = tokio::task::spawn_blocking(move || ingest(&bytes, &options))
        .await
        .map_err(|e| ParseError::Aborted(e.to_string()))??;
    Ok(rows)
}

/// Spawns loads and collects their outcomes.
pub struct Loader {
    handle: Handle,
    tx: mpsc::UnboundedSender<LoadOutcome>,
    rx: mpsc::UnboundedReceiver<LoadOutcome>,
}

impl Loader {
    pub fn new(handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { handle, tx, rx }
    }

    /// Start a background load. The outcome arrives on [`Loader::try_recv`] /
    /// [`Loader::recv`].
    pub fn spawn(
        &self,
        ticket: LoadTicket,
        source: Source,
        options: IngestOptions,
        origin: LoadOrigin,
    ) {
        let tx = self.tx.clone();
        let location = source.location();
        tracing::info!(%location, ?origin, generation = ticket.generation(), "load spawned");

        self.handle.spawn(async move {
            let result = load_once(&source, &options).await;
            let outcome = LoadOutcome { ticket, origin, location, result };
            // The receiver only goes away when the app is shutting down.
            let _ = tx.send(outcome);
        });
    }

    /// Next finished load, if any, without blocking.
    pub fn try_recv(&mut self) -> Option<LoadOutcome> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next finished load.
    pub async fn recv(&mut self) -> Option<LoadOutcome> {
        self.rx.recv().await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
