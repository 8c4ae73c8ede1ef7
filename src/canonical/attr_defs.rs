//! Attribute-definition fix-ups applied before rendering.
//!
//! `SystemSignalLongSymbol` is dropped together with every assignment of it, and the
//! `GenMsgCycleTime` definition is added when the database does not declare one.

use tracing::debug;

use crate::dbc::types::{
    attributes::{AttrObject, AttrType, AttributeDefinition, AttributeValue, AttributeValues},
    database::Database,
};

/// Definition injected by some authoring tools; never part of canonical output.
pub const NOISE_DEFINITION: &str = "SystemSignalLongSymbol";

/// Definition every canonical database carries.
pub const CYCLE_TIME_DEFINITION: &str = "GenMsgCycleTime";

/// Default `GenMsgCycleTime` definition: `BA_DEF_ BO_ "GenMsgCycleTime" INT 0 65535;`
/// with default `0`.
pub fn cycle_time_definition() -> AttributeDefinition {
    AttributeDefinition {
        name: CYCLE_TIME_DEFINITION.to_string(),
        object: AttrObject::Message,
        kind: AttrType::Int { min: 0, max: 65535 },
        default: Some(AttributeValue::Int(0)),
    }
}

/// Drops the noise definition (and its assignments) and inserts `GenMsgCycleTime`
/// when missing.
pub fn canonicalize_definitions(db: &mut Database) {
    if db.attribute_definitions.remove(NOISE_DEFINITION).is_some() {
        debug!("removed attribute definition {}", NOISE_DEFINITION);
    }

    let mut removed: usize = 0;
    let mut strip = |values: &mut AttributeValues| {
        if values.remove(NOISE_DEFINITION).is_some() {
            removed += 1;
        }
    };
    strip(&mut db.attributes);
    for node in &mut db.nodes {
        strip(&mut node.attributes);
    }
    for msg in &mut db.messages {
        strip(&mut msg.attributes);
        for sig in &mut msg.signals {
            strip(&mut sig.attributes);
        }
    }
    if removed > 0 {
        debug!(count = removed, "removed {} assignments", NOISE_DEFINITION);
    }

    if !db.attribute_definitions.contains(CYCLE_TIME_DEFINITION) {
        db.attribute_definitions.insert(cycle_time_definition());
        debug!("inserted default attribute definition {}", CYCLE_TIME_DEFINITION);
    }
}
