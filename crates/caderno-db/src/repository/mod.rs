//! # Repository Implementations
//!
//! One repository per aggregate:
//!
//! - [`product`] - Catalog access and stock mutation
//! - [`sale`] - The immutable sales ledger
//! - [`report`] - Materialized daily and monthly reports
//!
//! ## Transaction Convention
//! Methods that must participate in a caller-owned transaction take a
//! `&mut SqliteConnection` (obtained via `&mut *tx`). Methods that run
//! standalone use the repository's pool directly.

pub mod product;
pub mod report;
pub mod sale;
