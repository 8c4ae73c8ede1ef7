pub(crate) mod ba_;
pub(crate) mod ba_def_;
pub(crate) mod ba_def_def_;

use crate::dbc::core::strings::{Cursor, Token};
use crate::dbc::types::attributes::AttributeValue;

// Read an attribute value: a quoted string or a number.
pub(crate) fn read_value(cur: &mut Cursor<'_>) -> Result<AttributeValue, String> {
    match cur.next() {
        Some(Token::Quoted(s)) => Ok(AttributeValue::Str(s.clone())),
        Some(Token::Word(w)) => AttributeValue::from_number_token(w)
            .ok_or_else(|| format!("invalid attribute value '{}'", w)),
        other => Err(format!("expected attribute value, found {:?}", other)),
    }
}
