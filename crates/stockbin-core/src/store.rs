//! The in-memory batch of [`Row`] values from the last good load.
//!
//! The store is the single source of truth; the UI reads from it, never from
//! a source directly. Its collection is only ever replaced wholesale. Every
//! load is bracketed by [`Store::begin_load`] and [`Store::complete`]; the
//! [`LoadTicket`] handed out by the former lets the latter drop results from
//! a load that a newer one has since superseded.

use crate::error::{ErrorKind, LoadError};
use crate::search::{search, SearchOptions};
use crate::types::Row;

/// Identifies one load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// What happens to the current rows when a load fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnError {
    /// Drop them (startup fetch, reload).
    Clear,
    /// Keep the last good batch (upload).
    Retain,
}

/// Load state shown in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Nothing loaded yet, or reset.
    Idle,
    Loading,
    Ready { count: usize },
    Failed { message: String, kind: ErrorKind },
}

/// Result of handing a completion to [`Store::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Rows replaced.
    Replaced { count: usize },
    /// Failure recorded; `retained` rows from the previous batch are still held.
    Failed { retained: usize },
    /// A newer load (or a reset) has started since this ticket was issued.
    Superseded,
}

#[derive(Debug)]
pub struct Store {
    rows: Vec<Row>,
    status: Status,
    generation: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self { rows: Vec::new(), status: Status::Idle, generation: 0 }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    /// Start a load. Any ticket issued earlier is now stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.status = Status::Loading;
        tracing::debug!(generation = self.generation, "load started");
        LoadTicket(self.generation)
    }

    /// Apply the outcome of the load identified by `ticket`.
    ///
    /// Success replaces the rows. Failure records the error and, depending on
    /// `on_error`, clears or keeps the previous rows. A stale ticket changes
    /// nothing.
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Row>, LoadError>,
        on_error: OnError,
    ) -> Applied {
        if ticket.0 != self.generation {
            tracing::warn!(
                ticket = ticket.0,
                current = self.generation,
                "discarding superseded load"
            );
            return Applied::Superseded;
        }

        match result {
            Ok(rows) => {
                let count = rows.len();
                self.rows = rows;
                self.status = Status::Ready { count };
                tracing::info!(count, generation = ticket.0, "rows replaced");
                Applied::Replaced { count }
            }
            Err(err) => {
                if on_error == OnError::Clear {
                    self.rows = Vec::new();
                }
                tracing::warn!(error = %err, ?on_error, retained = self.rows.len(), "load failed");
                self.status = Status::Failed { message: err.to_string(), kind: err.kind() };
                Applied::Failed { retained: self.rows.len() }
            }
        }
    }

    /// Drop all rows and return to [`Status::Idle`]. In-flight loads are
    /// superseded.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.rows = Vec::new();
        self.status = Status::Idle;
        tracing::debug!(generation = self.generation, "store reset");
    }

    /// Whether queries may run: not while loading, and only when there is a
    /// batch to search (a fresh one, or the last good one kept after a
    /// failed upload).
    pub fn search_enabled(&self) -> bool {
        match self.status {
            Status::Ready { .. } => true,
            Status::Failed { .. } => !self.rows.is_empty(),
            Status::Idle | Status::Loading => false,
        }
    }

    /// Run a query against the current batch. Empty while search is disabled.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<&Row> {
        if !self.search_enabled() {
            return Vec::new();
        }
        search(&self.rows, query, options)
    }

    /// Short status shown next to the title.
    pub fn status_line(&self) -> String {
        match self.status {
            Status::Idle => "데이터 없음".to_string(),
            Status::Loading => "로딩 중".to_string(),
            Status::Ready { count } => format!("데이터 {count}건"),
            Status::Failed { .. } => "오류".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
