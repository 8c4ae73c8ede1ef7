//! # dbc
//!
//! `dbc` is the module to work with .dbc files: [`parse`] reads them into a
//! [`Database`](types::database::Database), [`render`] writes a database back as text
//! and [`save`] stores that text on disk.

pub(crate) mod core;
pub mod parse;
pub mod render;
pub mod save;
pub mod types;

pub use parse::{from_file, from_str, read_text};
pub use render::{AttributeRecord, AttributeTarget, Orderings, RenderPolicy, render};
pub use save::save_to_file;
