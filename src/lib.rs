//! # dbc_format
//!
//! Canonical formatter for **Vector DBC** CAN databases.
//!
//! ## Highlights
//! - **DBC parser**: load `.dbc` text (Windows-1252 on disk) into a plain [`Database`].
//! - **Policy-driven renderer**: every emission order and the number spelling are passed
//!   in explicitly through a [`RenderPolicy`].
//! - **Canonical form**: [`canonicalize`] yields byte-identical text for semantically
//!   identical databases, whatever the authored order, whitespace or literal spelling.
//!
//! ```no_run
//! use dbc_format::{canonicalize, dbc};
//!
//! let mut db = dbc::from_file("bus.dbc").expect("parse");
//! let text = canonicalize(&mut db).expect("canonicalize");
//! dbc::save_to_file("bus.dbc", &text).expect("save");
//! ```

pub mod canonical;
pub mod dbc;

#[doc(inline)]
pub use crate::canonical::{
    FormatOptions, canonical_policy, canonicalize, canonicalize_with, format_str, is_canonical,
    postprocess::PostProcessOptions,
};
#[doc(inline)]
pub use crate::dbc::{
    render::{Orderings, RenderPolicy},
    types::{
        database::Database,
        errors::{CanonicalizeError, DbcParseError, DbcSaveError, FormatError},
    },
};
