//! Search layer: case-insensitive substring match over company and product.
//!
//! [`search`] is pure and re-entrant, cheap enough to run on every keystroke.
//! An empty query returns nothing rather than the whole dataset.

use crate::types::Row;

/// How internal whitespace is treated before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Whitespace {
    /// Remove every whitespace run, so `"아 이 스"` matches `"아이스"`.
    #[default]
    Strip,
    /// Only trim the ends.
    Keep,
}

/// Search policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    pub whitespace: Whitespace,
    /// Maximum number of results; `None` is uncapped.
    pub limit: Option<usize>,
}

/// Lowercase and trim `text`, removing internal whitespace under
/// [`Whitespace::Strip`].
pub fn normalize(text: &str, whitespace: Whitespace) -> String {
    let lowered = text.trim().to_lowercase();
    match whitespace {
        Whitespace::Strip => lowered.chars().filter(|c| !c.is_whitespace()).collect(),
        Whitespace::Keep => lowered,
    }
}

/// Rows whose company or product contains `query`, in ingestion order.
pub fn search<'a>(rows: &'a [Row], query: &str, options: &SearchOptions) -> Vec<&'a Row> {
    let q = normalize(query, options.whitespace);
    if q.is_empty() {
        return Vec::new();
    }

    let matches = rows.iter().filter(|row| {
        normalize(&row.company, options.whitespace).contains(&q)
            || normalize(&row.product, options.whitespace).contains(&q)
    });

    match options.limit {
        Some(limit) => matches.take(limit).collect(),
        None => matches.collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
