//! Embedded synonym data.
//!
//! Tables are embedded at compile time using `include_str!()` so the default
//! behavior needs no runtime file access.

/// Default English and Spanish header synonyms.
pub const DEFAULT_SYNONYMS: &str = include_str!("../data/synonyms/default.csv");

/// Path label reported in errors raised while parsing embedded data.
pub const DEFAULT_SYNONYMS_LABEL: &str = "<embedded>/synonyms/default.csv";
