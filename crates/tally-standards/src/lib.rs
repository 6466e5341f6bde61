//! Header synonym tables for sales column reconciliation.
//!
//! Synonyms are configuration data, not logic. The default table is a CSV
//! file compiled into the binary; further locales or site-specific headers
//! are added by overlaying another CSV with the same layout.
//!
//! # Data Directory Structure
//!
//! ```text
//! data/
//! └── synonyms/
//!     └── default.csv      # Header,System Column,Locale (English + Spanish)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use tally_standards::SynonymTable;
//! use tally_model::SystemColumnId;
//!
//! let table = SynonymTable::load_default()?.with_overlay_path("site.csv".as_ref())?;
//! assert_eq!(table.lookup("Fecha"), Some(SystemColumnId::TransactionDate));
//! ```

pub mod embedded;
pub mod error;
pub mod synonyms;

pub use error::{Result, StandardsError};
pub use synonyms::{SynonymEntry, SynonymTable, normalize_header};
