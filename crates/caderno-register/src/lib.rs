//! # caderno-register: Register Services for the Caderno
//!
//! The application layer of the register: sale finalization, report
//! consolidation, and report presentation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      caderno-register (THIS CRATE)                       │
//! │                                                                         │
//! │   web layer / scheduler (external)                                      │
//! │        │                │                                               │
//! │        ▼                ▼                                               │
//! │   ┌───────────┐   ┌──────────┐   ┌───────────────┐   ┌────────────┐   │
//! │   │ finalizer │──►│  batch   │──►│ consolidator  │──►│ presenter  │   │
//! │   │ (sales)   │   │ (cron)   │   │ (the core)    │   │ text/json/ │   │
//! │   └───────────┘   └──────────┘   └───────────────┘   │    pdf     │   │
//! │        │                              │              └────────────┘   │
//! │        ▼                              ▼                                │
//! │   caderno-db (catalog, ledger, report rows)                            │
//! │        │                                                               │
//! │        ▼                                                               │
//! │   caderno-core (Money, ProductSummary, consolidate_day, Clock)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`finalizer`] - Sale finalization (all-or-nothing transaction)
//! - [`consolidator`] - Daily/monthly report consolidation with staleness cache
//! - [`presenter`] - Plain text, JSON payloads, PDF bytes and filenames
//! - [`pdf`] - PDF layout (behind the presenter)
//! - [`batch`] - Scheduled-trigger entry point with per-unit error isolation
//! - [`error`] - RegisterError and the serializable error payload

// =============================================================================
// Module Declarations
// =============================================================================

pub mod batch;
pub mod consolidator;
pub mod error;
pub mod finalizer;
pub mod pdf;
pub mod presenter;

// =============================================================================
// Re-exports
// =============================================================================

pub use batch::{run_batch, BatchOutcome, BatchTarget};
pub use consolidator::ReportConsolidator;
pub use error::{ErrorCode, ErrorPayload, RegisterError, RegisterResult};
pub use finalizer::SaleFinalizer;
