use tracing::warn;

use crate::dbc::core::strings::{Cursor, Token};
use crate::dbc::types::database::Database;

/// Decode the BU_ line listing node names and register them in the database.
/// Example: `BU_: ECU1 ECU2 ECU3`
pub(crate) fn decode(db: &mut Database, tokens: &[Token]) -> Result<(), String> {
    let mut cur = Cursor::new(tokens);
    cur.next(); // BU_
    cur.eat(':');

    while let Some(tok) = cur.next() {
        match tok {
            Token::Word(name) => {
                if !db.add_node_if_absent(name) {
                    warn!(node = %name, "duplicate node name ignored");
                }
            }
            other => return Err(format!("unexpected token {:?} in node list", other)),
        }
    }
    Ok(())
}
