//! Core types for stockbin-core.
//!
//! This module defines the normalised inventory [`Row`] and the [`Field`]
//! discriminant that carries each column's header aliases.

use serde::Serialize;

/// One normalised inventory record produced by ingestion.
///
/// Every field is trimmed text. Missing or empty cells are stored as `""`,
/// never as a placeholder word. Display rules (`0` for an empty quantity,
/// `-` for an empty bin, serial-date expiry conversion) live in
/// [`crate::display`] and are applied at render time, so the raw value is
/// preserved here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Row {
    /// Company or manufacturer name.
    pub company: String,
    /// Product name.
    pub product: String,
    /// Incoming quantity, kept as text.
    pub incoming_quantity: String,
    /// ISO date, serial day number as text, or free text.
    pub expiry: String,
    /// Storage-bin label shown large in the UI.
    pub storage_bin: String,
}

impl Row {
    /// Value of a single logical field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Company => &self.company,
            Field::Product => &self.product,
            Field::IncomingQuantity => &self.incoming_quantity,
            Field::Expiry => &self.expiry,
            Field::StorageBin => &self.storage_bin,
        }
    }

    /// True when company, product and storage bin are all empty.
    ///
    /// Quantity and expiry alone do not make a row worth keeping.
    pub fn is_blank(&self) -> bool {
        self.company.trim().is_empty()
            && self.product.trim().is_empty()
            && self.storage_bin.trim().is_empty()
    }
}

/// A logical inventory column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Company,
    Product,
    IncomingQuantity,
    Expiry,
    StorageBin,
}

impl Field {
    /// All fields in display order.
    pub const ALL: [Field; 5] = [
        Field::Company,
        Field::Product,
        Field::IncomingQuantity,
        Field::Expiry,
        Field::StorageBin,
    ];

    /// Accepted header labels, highest priority first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Company => &["업체명", "업체", "회사명", "제조사"],
            Field::Product => &["상품명", "품명", "제품명", "상품"],
            Field::IncomingQuantity => &["입고수량", "입고예정수량", "수량", "입고"],
            Field::Expiry => &["유통기한", "유통", "기한", "소비기한"],
            Field::StorageBin => &["보관장", "보관위치", "위치", "로케이션", "진열"],
        }
    }

    /// Canonical label, used in the detail popup.
    pub fn label(self) -> &'static str {
        self.aliases()[0]
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Company => write!(f, "company"),
            Field::Product => write!(f, "product"),
            Field::IncomingQuantity => write!(f, "incoming_quantity"),
            Field::Expiry => write!(f, "expiry"),
            Field::StorageBin => write!(f, "storage_bin"),
        }
    }
}
