//! stockbin-feeds: workbook byte sources for stockbin.
//!
//! A [`Source`] fetches the raw bytes of a workbook from a well-known HTTP
//! asset or a local file. The [`Loader`] runs source reads and ingestion on
//! background tasks and reports each [`LoadOutcome`] over a channel so the
//! UI thread can apply it to the store.

pub mod loader;
pub mod source;

pub use loader::{load_once, LoadOrigin, LoadOutcome, Loader};
pub use source::Source;
