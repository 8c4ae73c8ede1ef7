//! Canonical spelling of decimal literals.
//!
//! The authored digits are kept: trailing zeros survive (`1.0` stays `1.0`) and nothing
//! is re-rounded. Only the spelling is normalised: no leading `+`, no redundant leading
//! zeros, lowercase `e`, exponent without `+` or leading zeros, zero exponent dropped.

use crate::dbc::types::{
    attributes::{AttrType, AttributeValue, AttributeValues},
    database::Database,
    decimal::{Decimal, DecimalKind},
    errors::CanonicalizeError,
};

/// Canonical text of a finite decimal; `None` for NaN and infinities.
pub fn normalize(value: &Decimal) -> Option<String> {
    let DecimalKind::Finite {
        negative,
        integer,
        fraction,
        exponent,
    } = value.kind()
    else {
        return None;
    };

    let mut out = String::new();
    if *negative {
        out.push('-');
    }

    let integer: &str = integer.trim_start_matches('0');
    out.push_str(if integer.is_empty() { "0" } else { integer });

    if let Some(fraction) = fraction.as_deref().filter(|f| !f.is_empty()) {
        out.push('.');
        out.push_str(fraction);
    }

    if let Some(exp) = exponent.filter(|e| *e != 0) {
        out.push('e');
        out.push_str(&exp.to_string());
    }

    Some(out)
}

/// Number formatter used by the canonical render policy.
///
/// Callers run [`validate`] first; a non-finite value that slips through is written
/// as authored.
pub fn format_number(value: &Decimal) -> String {
    normalize(value).unwrap_or_else(|| value.raw().to_string())
}

fn check(value: &Decimal, field: impl FnOnce() -> String) -> Result<(), CanonicalizeError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CanonicalizeError::NonFinite { field: field() })
    }
}

fn check_values(values: &AttributeValues, owner: &str) -> Result<(), CanonicalizeError> {
    for (name, value) in values.iter() {
        if let AttributeValue::Float(d) = value {
            check(d, || format!("attribute \"{}\" of {}", name, owner))?;
        }
    }
    Ok(())
}

/// Rejects databases holding a decimal that DBC text cannot represent.
///
/// Covers signal factor/offset/min/max, `FLOAT` definition bounds, and decimal
/// defaults and assignments.
pub fn validate(db: &Database) -> Result<(), CanonicalizeError> {
    for def in db.attribute_definitions.iter() {
        if let AttrType::Float { min, max } = &def.kind {
            check(min, || format!("minimum of attribute definition \"{}\"", def.name))?;
            check(max, || format!("maximum of attribute definition \"{}\"", def.name))?;
        }
        if let Some(AttributeValue::Float(d)) = &def.default {
            check(d, || format!("default of attribute definition \"{}\"", def.name))?;
        }
    }

    check_values(&db.attributes, "the database")?;
    for node in &db.nodes {
        check_values(&node.attributes, &format!("node {}", node.name))?;
    }

    for msg in &db.messages {
        check_values(&msg.attributes, &format!("message {}", msg.id))?;
        for sig in &msg.signals {
            let fields = [
                ("factor", &sig.factor),
                ("offset", &sig.offset),
                ("minimum", &sig.min),
                ("maximum", &sig.max),
            ];
            for (label, value) in fields {
                check(value, || {
                    format!("{} of signal {} in message {}", label, sig.name, msg.id)
                })?;
            }
            check_values(
                &sig.attributes,
                &format!("signal {} in message {}", sig.name, msg.id),
            )?;
        }
    }

    Ok(())
}
