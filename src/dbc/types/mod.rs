//! # types
//!
//! The DBC data model: database, nodes, messages, signals, attributes and the
//! error types of the parse / canonicalize / save pipeline.

pub mod attributes;
pub mod database;
pub mod decimal;
pub mod errors;
pub mod message;
pub mod node;
pub mod signal;
