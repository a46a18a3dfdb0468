//! Domain-specific assertion macros for stockbin harnesses.
//!
//! These wrap `pretty_assertions` and say which rows were involved when an
//! expectation fails.

// ---------------------------------------------------------------------------
// Row assertions
// ---------------------------------------------------------------------------

/// Assert the storage bins of a result set, in order.
///
/// ```rust
/// assert_bins!(results, ["A-01", "C-03"]);
/// ```
#[macro_export]
macro_rules! assert_bins {
    ($rows:expr, [$($bin:expr),* $(,)?]) => {{
        let actual: Vec<&str> = $rows.iter().map(|r| r.storage_bin.as_str()).collect();
        let expected: Vec<&str> = vec![$($bin),*];
        pretty_assertions::assert_eq!(actual, expected, "storage bins of result set");
    }};
}

/// Assert that every row in a result set satisfies a predicate.
///
/// ```rust
/// assert_all_rows!(results, |r| r.company.contains("상사"));
/// ```
#[macro_export]
macro_rules! assert_all_rows {
    ($rows:expr, $pred:expr) => {{
        for (i, row) in $rows.iter().enumerate() {
            if !($pred)(row) {
                panic!("assert_all_rows! failed at index {}:\n  row: {:?}", i, row);
            }
        }
    }};
}

// ---------------------------------------------------------------------------
// Store assertions
// ---------------------------------------------------------------------------

/// Assert the store is in `Failed` with the given [`stockbin_core::ErrorKind`].
#[macro_export]
macro_rules! assert_failed {
    ($store:expr, $kind:expr) => {{
        match $store.status() {
            stockbin_core::Status::Failed { kind, .. } if *kind == $kind => {}
            other => panic!(
                "assert_failed! expected Failed {{ kind: {:?} }}, got {:?}",
                $kind, other
            ),
        }
    }};
}
