//! Test diagram generator for schema2script integration tests.
//!
//! Builds draw.io ER diagrams cell by cell and renders them in every
//! format the decoder accepts.
//!
//! # Example
//!
//! ```rust
//! use test_data_gen::{DiagramBuilder, Format};
//!
//! let mut diagram = DiagramBuilder::new();
//! let users = diagram.table("users");
//! let id = diagram.pk_field(users, "id:Integer");
//! let orders = diagram.table("orders");
//! let user_id = diagram.field(orders, "user_id:Integer");
//! diagram.relation(id, user_id);
//!
//! let xml = diagram.render(Format::Compressed);
//! assert!(xml.starts_with("<mxfile"));
//! ```

pub mod builder;
pub mod encode;
pub mod generator;

pub use builder::{CellId, DiagramBuilder, MANY_TO_ONE_STYLE, ONE_TO_MANY_STYLE};
pub use encode::{compress_payload, escape_attr, Format};
pub use generator::{Generator, Scale};
