//! Shared test utilities for stockbin integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Workbooks are built in memory with `rust_xlsxwriter`,
//! so no binary fixtures are checked in.

#![allow(dead_code)]

pub mod assertions;
pub mod builders;
pub mod fake_asset_server;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;
