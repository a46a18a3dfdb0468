//! stockbin-core: inventory spreadsheet lookup core library.
//!
//! This crate exposes the pipeline layers as public modules, plus the shared
//! types used across all layers.
//!
//! # Architecture
//!
//! ```text
//! bytes ──► Ingest ──► Store ──► Search ──► UI
//!                                  │
//!                        Display ◄─┘
//! ```
//!
//! Ingestion and search are pure functions. The [`store::Store`] is owned by
//! the UI thread and replaced wholesale on every successful load.

pub mod config;
pub mod display;
pub mod error;
pub mod ingest;
pub mod search;
pub mod store;
pub mod types;

pub use error::{ErrorKind, FetchError, LoadError, ParseError};
pub use ingest::{ingest, IngestOptions, RowFilter};
pub use search::{search, SearchOptions, Whitespace};
pub use store::{Applied, LoadTicket, OnError, Status, Store};
pub use types::{Field, Row};
