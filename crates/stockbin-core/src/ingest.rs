//! Ingestion. Decodes workbook bytes into normalised [`Row`] values.
//!
//! The first sheet by position is read into a [`Table`] of header names and
//! text records, each logical [`Field`] is resolved to a column through its
//! alias list, and every record becomes one `Row`.
//!
//! Record keys follow the usual spreadsheet-to-records naming: an empty
//! header cell becomes `__EMPTY`, and repeated headers get `_1`, `_2`, …
//! suffixes so no column is shadowed.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::error::ParseError;
use crate::search::{normalize, Whitespace};
use crate::types::{Field, Row};

/// What to do with rows whose company, product and storage bin are all empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowFilter {
    /// Drop them (auto-fetch behaviour).
    #[default]
    DropBlank,
    /// Keep every record (upload behaviour).
    KeepAll,
}

/// Ingestion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestOptions {
    pub row_filter: RowFilter,
}

/// Decode `bytes` and produce the ordered rows of the first sheet.
///
/// Pure: the same bytes and options always yield element-wise equal rows.
pub fn ingest(bytes: &[u8], options: &IngestOptions) -> Result<Vec<Row>, ParseError> {
    let range = first_sheet(bytes)?;
    let rows = Table::from_range(&range).into_rows(options);
    tracing::info!(rows = rows.len(), filter = ?options.row_filter, "workbook ingested");
    Ok(rows)
}

fn first_sheet(bytes: &[u8]) -> Result<Range<Data>, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ParseError::NoSheet)?;

    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(ParseError::Sheet { name, reason: e.to_string() }),
        None => Err(ParseError::NoSheet),
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// A sheet flattened to header names plus text records.
///
/// Every record has exactly `headers.len()` cells; short rows are padded
/// with empty text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from a calamine range. The first non-empty row is the
    /// header row; later rows that are entirely empty are skipped.
    pub fn from_range(range: &Range<Data>) -> Self {
        let mut rows = range
            .rows()
            .filter(|cells| !cells.iter().all(is_blank_cell))
            .map(|cells| cells.iter().map(cell_text).collect::<Vec<_>>());

        let Some(header_cells) = rows.next() else {
            return Self::default();
        };
        let headers = record_keys(&header_cells);
        let width = headers.len();

        let records = rows
            .map(|mut cells| {
                cells.resize(width, String::new());
                cells
            })
            .collect();

        Self { headers, records }
    }

    /// Normalise every record into a [`Row`], applying the row filter.
    pub fn into_rows(self, options: &IngestOptions) -> Vec<Row> {
        let columns = ColumnMap::resolve(self.headers.as_slice());
        tracing::debug!(?columns, headers = ?self.headers, "columns resolved");

        self.records
            .iter()
            .map(|record| columns.row(record))
            .filter(|row| options.row_filter == RowFilter::KeepAll || !row.is_blank())
            .collect()
    }
}

/// Assign a unique key to every header cell.
fn record_keys(cells: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    cells
        .iter()
        .map(|cell| {
            let base = if cell.is_empty() { "__EMPTY".to_string() } else { cell.clone() };
            let counter = seen.get(&base).copied().unwrap_or(0);
            if counter == 0 {
                seen.insert(base.clone(), 1);
                return base;
            }
            let mut n = counter;
            let mut key = format!("{base}_{n}");
            while seen.contains_key(&key) {
                n += 1;
                key = format!("{base}_{n}");
            }
            seen.insert(base, n + 1);
            seen.insert(key.clone(), 1);
            key
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

/// Column index for each logical field, `None` when no header matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnMap {
    company: Option<usize>,
    product: Option<usize>,
    incoming_quantity: Option<usize>,
    expiry: Option<usize>,
    storage_bin: Option<usize>,
}

impl ColumnMap {
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Self {
        Self {
            company: resolve_column(headers, Field::Company),
            product: resolve_column(headers, Field::Product),
            incoming_quantity: resolve_column(headers, Field::IncomingQuantity),
            expiry: resolve_column(headers, Field::Expiry),
            storage_bin: resolve_column(headers, Field::StorageBin),
        }
    }

    pub fn column(&self, field: Field) -> Option<usize> {
        match field {
            Field::Company => self.company,
            Field::Product => self.product,
            Field::IncomingQuantity => self.incoming_quantity,
            Field::Expiry => self.expiry,
            Field::StorageBin => self.storage_bin,
        }
    }

    fn row(&self, record: &[String]) -> Row {
        let take = |field: Field| -> String {
            self.column(field)
                .and_then(|i| record.get(i))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        Row {
            company: take(Field::Company),
            product: take(Field::Product),
            incoming_quantity: take(Field::IncomingQuantity),
            expiry: take(Field::Expiry),
            storage_bin: take(Field::StorageBin),
        }
    }
}

/// Find the column for `field`.
///
/// Aliases are tried in priority order. For each alias an exact header match
/// wins; failing that, the first header equal to the alias after lowercasing
/// and removing all whitespace is taken.
pub fn resolve_column<S: AsRef<str>>(headers: &[S], field: Field) -> Option<usize> {
    field.aliases().iter().find_map(|alias| {
        headers.iter().position(|h| h.as_ref() == *alias).or_else(|| {
            let key = normalize(alias, Whitespace::Strip);
            headers
                .iter()
                .position(|h| normalize(h.as_ref(), Whitespace::Strip) == key)
        })
    })
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Convert a cell to trimmed text. Empty cells become `""`.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Float(f) => number_text(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        // Date-formatted cells keep their serial day count; display converts it.
        Data::DateTime(dt) => number_text(dt.as_f64()),
        Data::Error(_) => String::new(),
    }
}

/// Whether a cell holds nothing at all. Judged on the raw value, so a cell
/// of only spaces still counts as content.
fn is_blank_cell(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Print a number the way a script runtime does: integers without a
/// fractional part, exponent form outside `[1e-6, 1e21)`.
pub fn number_text(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return n.to_string();
    }
    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
