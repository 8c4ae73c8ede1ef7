use tracing::warn;

use crate::dbc::core::strings::{Cursor, Token};
use crate::dbc::types::{database::Database, signal::ValueType};

/// Decode the raw value encoding of a signal.
/// Format: `SIG_VALTYPE_ <id> <signal> : <0|1|2>;`
pub(crate) fn decode(db: &mut Database, tokens: &[Token]) -> Result<(), String> {
    let mut cur = Cursor::new(tokens);
    cur.next(); // SIG_VALTYPE_

    let id: u32 = cur.number("message id")?;
    let signal_name: &str = cur.word("signal name")?;
    cur.eat(':');
    let code: u8 = cur.number("value type")?;
    let value_type: ValueType =
        ValueType::from_code(code).ok_or_else(|| format!("unknown value type {}", code))?;

    match db.signal_mut(id, signal_name) {
        Some(sig) => sig.value_type = value_type,
        None => warn!(id, signal = %signal_name, "SIG_VALTYPE_ for unknown signal skipped"),
    }
    Ok(())
}
