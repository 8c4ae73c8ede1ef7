//! # canonical
//!
//! Turns a [`Database`] into its one canonical DBC text.
//!
//! [`canonicalize`] runs, in order: the attribute-definition fix-ups of
//! [`attr_defs`], the finiteness check of [`numeric`], the renderer with the
//! comparators of [`ordering`] and the number spelling of [`numeric`], and finally
//! the text rules of [`postprocess`].

pub mod attr_defs;
pub mod collate;
pub mod numeric;
pub mod ordering;
pub mod postprocess;

use crate::dbc::{
    parse,
    render::{RenderPolicy, render},
    types::{
        database::Database,
        errors::{CanonicalizeError, FormatError},
    },
};
use postprocess::{PostProcessOptions, postprocess};

/// Knobs of the canonical form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FormatOptions {
    pub postprocess: PostProcessOptions,
}

/// Render policy with canonical orderings and number spelling.
pub fn canonical_policy() -> RenderPolicy {
    RenderPolicy {
        orderings: ordering::canonical(),
        number: numeric::format_number,
    }
}

/// Canonical text of `db` with default options.
///
/// The attribute-definition table of `db` is updated in place (noise definition
/// removed, `GenMsgCycleTime` inserted when missing); nothing else is modified.
pub fn canonicalize(db: &mut Database) -> Result<String, CanonicalizeError> {
    canonicalize_with(db, &FormatOptions::default())
}

pub fn canonicalize_with(
    db: &mut Database,
    options: &FormatOptions,
) -> Result<String, CanonicalizeError> {
    attr_defs::canonicalize_definitions(db);
    numeric::validate(db)?;
    let rendered: String = render(db, &canonical_policy());
    Ok(postprocess(&rendered, &options.postprocess))
}

/// Parses DBC text and returns its canonical form.
pub fn format_str(text: &str, options: &FormatOptions) -> Result<String, FormatError> {
    let mut db: Database = parse::from_str(text)?;
    Ok(canonicalize_with(&mut db, options)?)
}

/// `true` when `text` is already in canonical form.
pub fn is_canonical(text: &str, options: &FormatOptions) -> Result<bool, FormatError> {
    Ok(format_str(text, options)? == text)
}
