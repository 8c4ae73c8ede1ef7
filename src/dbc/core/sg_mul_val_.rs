use tracing::warn;

use crate::dbc::core::strings::{Cursor, Token};
use crate::dbc::types::{database::Database, message::ExtendedMux};

/// Decode an extended multiplexing entry.
/// Format: `SG_MUL_VAL_ <id> <signal> <switch> <lo>-<hi>, <lo>-<hi> ...;`
pub(crate) fn decode(db: &mut Database, tokens: &[Token]) -> Result<(), String> {
    let mut cur = Cursor::new(tokens);
    cur.next(); // SG_MUL_VAL_

    let id: u32 = cur.number("message id")?;
    let signal: &str = cur.word("signal name")?;
    let switch: &str = cur.word("switch name")?;

    let mut ranges: Vec<(u64, u64)> = Vec::new();
    while !cur.at_end() {
        if cur.eat(',') {
            continue;
        }
        ranges.push(parse_range(cur.word("value range")?)?);
    }
    if ranges.is_empty() {
        return Err("expected at least one value range".to_string());
    }

    let Some(msg) = db.message_mut(id) else {
        warn!(id, signal = %signal, "SG_MUL_VAL_ for unknown message skipped");
        return Ok(());
    };
    if msg.signal(signal).is_none() || msg.signal(switch).is_none() {
        warn!(id, signal = %signal, switch = %switch, "SG_MUL_VAL_ for unknown signal skipped");
        return Ok(());
    }
    msg.set_extended_mux(ExtendedMux {
        signal: signal.to_string(),
        switch: switch.to_string(),
        ranges,
    });
    Ok(())
}

// `<lo>-<hi>`, both inclusive.
fn parse_range(word: &str) -> Result<(u64, u64), String> {
    let invalid = || format!("invalid value range '{}'", word);
    let (lo, hi) = word.split_once('-').ok_or_else(invalid)?;
    let lo: u64 = lo.parse().map_err(|_| invalid())?;
    let hi: u64 = hi.parse().map_err(|_| invalid())?;
    Ok((lo, hi))
}
