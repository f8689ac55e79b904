//! Output renderers for a resolved schema.
//!
//! - [`DdlGenerator`]: `Create Table` scripts for H2 and Oracle
//! - [`SbootGenerator`]: `sboot generate` scaffold commands
//! - [`json`]: machine-readable model dump

pub mod ddl;
pub mod dialect;
pub mod json;
pub mod sboot;
pub mod timestamp;

pub use ddl::{DdlGenerator, DEFAULT_STRING_TYPE};
pub use dialect::{DdlDialect, H2Dialect, OracleDialect, SqlDialect};
pub use sboot::{SbootGenerator, StackEnv};
pub use timestamp::normalize_timestamp;
