//! Test builders: ergonomic constructors for `Row` values and row batches.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use stockbin_core::Row;

// ---------------------------------------------------------------------------
// RowBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Row`] test fixtures.
///
/// # Example
///
/// ```rust
/// let row = RowBuilder::new("행복상사", "우유").bin("A-01").expiry("45000").build();
/// ```
pub struct RowBuilder {
    row: Row,
}

impl RowBuilder {
    pub fn new(company: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            row: Row {
                company: company.into(),
                product: product.into(),
                ..Row::default()
            },
        }
    }

    pub fn quantity(mut self, quantity: impl Into<String>) -> Self {
        self.row.incoming_quantity = quantity.into();
        self
    }

    pub fn expiry(mut self, expiry: impl Into<String>) -> Self {
        self.row.expiry = expiry.into();
        self
    }

    pub fn bin(mut self, bin: impl Into<String>) -> Self {
        self.row.storage_bin = bin.into();
        self
    }

    pub fn build(self) -> Row {
        self.row
    }
}

/// A small warehouse: five rows with distinct bins, covering Hangul, Latin
/// and mixed-case names.
pub fn sample_rows() -> Vec<Row> {
    vec![
        RowBuilder::new("행복상사", "서울우유 1L").quantity("12").expiry("2024-05-01").bin("A-01").build(),
        RowBuilder::new("바른식품", "국산 두부").quantity("30").expiry("45000").bin("A-02").build(),
        RowBuilder::new("Fresh Farm", "Green Apple").quantity("5").bin("B-10").build(),
        RowBuilder::new("행복상사", "아이스 크림").expiry("유통기한 없음").bin("C-03").build(),
        RowBuilder::new("ACME Corp", "두부 과자").quantity("7").expiry("45292").bin("").build(),
    ]
}

/// `n` synthetic rows for volume tests and benches.
pub fn synthetic_rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            RowBuilder::new(format!("업체{:04}", i % 97), format!("상품 {i}"))
                .quantity((i % 50).to_string())
                .expiry((44000 + i % 2000).to_string())
                .bin(format!("{}-{:02}", (b'A' + (i % 26) as u8) as char, i % 40))
                .build()
        })
        .collect()
}
