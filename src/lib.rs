//! stockbin: storage-bin lookup for an inventory spreadsheet.
//!
//! Load a workbook (from an HTTP asset or a local file), search it by company
//! or product, and read off the storage bin. The work is split across the
//! workspace crates:
//!
//! ```text
//! stockbin-feeds ──► stockbin-core (ingest ─► Store ─► search) ──► stockbin-tui
//!                                                   │
//!                                       headless ◄──┘
//! ```
//!
//! This crate only adds the non-interactive [`headless`] mode used by the
//! binary's `--headless` flag.

pub mod headless;
