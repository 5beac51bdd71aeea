//! Indicator certification lookup library.
//!
//! Loads an employee roster from a remote spreadsheet (with a local cache
//! and a built-in fallback), evaluates ETIT, Assertividade and DPA against
//! sector targets, and serves lookups over HTTP.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `evaluator`: Indicator parsing and certification verdict.
//! - `fallback`: Built-in roster.
//! - `handlers`: HTTP request handlers and router.
//! - `loader`: Remote/cache/fallback roster loading and periodic refresh.
//! - `models`: Core data models.
//! - `report`: Lookup response building.
//! - `roster`: Immutable roster snapshot and its store.
//! - `roster_cache`: Checksummed local roster cache.
//! - `sheet`: Workbook decoding and row parsing.
//! - `sheet_client`: Workbook download client.
//! - `targets`: Indicator target table.

pub mod config;
pub mod errors;
pub mod evaluator;
pub mod fallback;
pub mod handlers;
pub mod loader;
pub mod models;
pub mod report;
pub mod roster;
pub mod roster_cache;
pub mod sheet;
pub mod sheet_client;
pub mod targets;
