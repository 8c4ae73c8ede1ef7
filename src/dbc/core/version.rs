use crate::dbc::core::strings::{Cursor, Token};
use crate::dbc::types::database::Database;

/// Decode the version line. Example: `VERSION "1.0.2"`
pub(crate) fn decode(db: &mut Database, tokens: &[Token]) -> Result<(), String> {
    let mut cur = Cursor::new(tokens);
    cur.next(); // VERSION
    // Some writers emit a bare `VERSION` line.
    db.version = match cur.peek() {
        Some(Token::Quoted(_)) => cur.quoted("version")?.to_string(),
        _ => String::new(),
    };
    Ok(())
}
