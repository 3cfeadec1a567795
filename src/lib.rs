//! langdict - keep translation dictionaries in sync with source code
//!
//! langdict scans a source tree for calls like `lang.Translate("Some text")`,
//! collects the literal keys and rewrites one flat JSON dictionary per
//! language so each holds exactly those keys. Existing translations are kept,
//! new keys get an empty value and keys no longer used are dropped.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `extract`: Source scanning and key extraction
//! - `dictionary`: Loading, reconciling and writing language files
//! - `sync`: The full extract-and-reconcile pass

pub mod cli;
pub mod config;
pub mod dictionary;
pub mod extract;
pub mod sync;
