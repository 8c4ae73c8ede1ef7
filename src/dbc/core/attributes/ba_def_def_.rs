use tracing::warn;

use crate::dbc::core::attributes::read_value;
use crate::dbc::core::strings::{Cursor, Token};
use crate::dbc::types::{attributes::AttributeValue, database::Database};

/// Decode an attribute default value.
/// Format: `BA_DEF_DEF_ "<name>" <value>;`
pub(crate) fn decode(db: &mut Database, tokens: &[Token]) -> Result<(), String> {
    let mut cur = Cursor::new(tokens);
    cur.next(); // BA_DEF_DEF_

    let name: &str = cur.quoted("attribute name")?;
    let value: AttributeValue = read_value(&mut cur)?;

    match db.attribute_definitions.get_mut(name) {
        Some(def) => def.default = Some(value),
        None => warn!(attribute = %name, "default for undefined attribute skipped"),
    }
    Ok(())
}
