//! System schema and mapping types for sales data ingestion.
//!
//! This crate provides:
//!
//! - **System columns**: the closed set of logical fields a sales dataset is
//!   reconciled against ([`SystemColumnId`])
//! - **Schema registry**: static per-column metadata ([`ColumnSpec`]) and the
//!   ordered required/optional/inferable lists ([`schema`])
//! - **Mapping types**: source-to-system associations ([`Mapping`]) and the
//!   derived [`ValidationResult`]
//!
//! # Example
//!
//! ```
//! use tally_model::{SystemColumnId, schema};
//!
//! assert_eq!(schema::all_required().len(), 5);
//! assert!(schema::get(SystemColumnId::Quantity).required);
//! ```

pub mod column;
pub mod error;
pub mod mapping;
pub mod schema;

pub use column::{ColumnSpec, DataType, SystemColumnId};
pub use error::{ModelError, Result};
pub use mapping::{Mapping, ValidationResult};
