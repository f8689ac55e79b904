// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod config;
pub mod diagnostics;
pub mod diagram;
pub mod input;
pub mod json_schema;
pub mod pipeline;
pub mod render;
pub mod schema;
