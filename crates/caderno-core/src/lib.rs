//! # caderno-core: Pure Business Logic for the Caderno Register
//!
//! This crate is the heart of the register. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                      Caderno Architecture                          │
//! │                                                                    │
//! │  caderno-register (finalizer, consolidator, presenter, batch)      │
//! │       │                                                            │
//! │       ▼                                                            │
//! │  ★ caderno-core (THIS CRATE) ★                                     │
//! │                                                                    │
//! │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌──────────┐ ┌───────┐     │
//! │   │  types  │ │  money  │ │ summary  │ │ calendar │ │ clock │     │
//! │   │ Product │ │  Money  │ │ Product  │ │  month   │ │ Clock │     │
//! │   │  Sale   │ │  (R$)   │ │ Summary  │ │ lengths  │ │ trait │     │
//! │   └─────────┘ └─────────┘ └──────────┘ └──────────┘ └───────┘     │
//! │                                                                    │
//! │   NO I/O • NO DATABASE • NO AMBIENT CLOCK • PURE FUNCTIONS         │
//! │       │                                                            │
//! │       ▼                                                            │
//! │  caderno-db (SQLite queries, migrations, repositories)             │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, reports, ...)
//! - [`money`] - Money type with integer-cent arithmetic (no floating point!)
//! - [`summary`] - Product summary accumulator and the daily consolidation fold
//! - [`calendar`] - Month lengths (leap-aware) and Portuguese month names
//! - [`clock`] - Injected clock (deterministic "now" and "today")
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output - the consolidation fold is
//!    a function of the ledger rows it is given
//! 2. **No I/O**: database and file system access are FORBIDDEN here
//! 3. **Integer Money**: all monetary values are centavos (i64); floats only
//!    appear at the presentation edge
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calendar;
pub mod clock;
pub mod error;
pub mod money;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use summary::{consolidate_day, DayLine, DayTotals, ProductSummary, ProductTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Freshness window for a materialized daily report, in seconds.
///
/// A daily report older than this is rebuilt on the next read. The window
/// bounds redundant recomputation while tolerating sales that land moments
/// after a rebuild; those are picked up once the window lapses.
pub const FRESHNESS_WINDOW_SECS: i64 = 3600;

/// Maximum line items accepted in a single sale.
///
/// Prevents runaway requests from the register screen; a real counter sale
/// never comes close.
pub const MAX_SALE_LINES: usize = 100;
