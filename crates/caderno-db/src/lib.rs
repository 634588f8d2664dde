//! # caderno-db: Database Layer for the Caderno Register
//!
//! This crate provides database access for the caderno register.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Caderno Data Flow                                   │
//! │                                                                         │
//! │  caderno-register (finalizer / consolidator / presenter)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    caderno-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐ │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │ │   │
//! │  │   │               │    │ ProductRepo    │    │              │ │   │
//! │  │   │ SqlitePool    │◄───│ SaleRepo       │    │ 001_init.sql │ │   │
//! │  │   │ Connection    │    │ ReportRepo     │    │              │ │   │
//! │  │   │ Management    │    │                │    │              │ │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (or :memory: in tests)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, sale, report)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use caderno_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("caderno.db")).await?;
//! let products = db.products().list_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::product::{NewProduct, ProductRepository};
pub use repository::report::ReportRepository;
pub use repository::sale::SaleRepository;
