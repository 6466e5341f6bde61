//! Column reconciliation for sales data ingestion.
//!
//! Maps arbitrary source column names (CSV headers) onto the fixed system
//! schema from `tally-model`:
//!
//! - **Suggestions** (`resolver`): exact synonym lookup after normalization
//! - **Mapping state** (`state`): one entry per source column, edited by the user
//! - **Validation** (`validate`): which required columns are still unmapped
//! - **Engine** (`engine`): state plus change notifications to observers
//!
//! # Error Handling
//!
//! Reconciliation itself never fails; unexpected headers are treated as opaque
//! strings. [`MappingError`] covers the edges: parsing user-typed assignments,
//! loading configuration and synonym files.
//!
//! # Example
//!
//! ```ignore
//! use tally_map::{EngineConfig, ReconciliationEngine, SuggestionResolver};
//!
//! let resolver = SuggestionResolver::with_defaults()?;
//! let mut engine = ReconciliationEngine::new(resolver, EngineConfig::default());
//! engine.initialize(&["fecha", "cantidad", "precio_total"], None);
//!
//! engine.set_mapping("fecha", None);
//! println!("valid: {}", engine.validation().valid);
//! ```

pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod state;
pub mod validate;

pub use command::MappingCommand;
pub use config::{EngineConfig, UniquenessPolicy};
pub use engine::{MappingObserver, ReconciliationEngine, Requests};
pub use error::{MappingError, ObserverError, Result};
pub use resolver::{SuggestionResolver, normalize_header};
pub use state::{MappingConfig, MappingState, MappingSummary};
pub use validate::{missing_required_details, validate};
