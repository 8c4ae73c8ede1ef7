use tracing::warn;

use crate::dbc::core::strings::{Cursor, Token};
use crate::dbc::types::{database::Database, message::SignalGroup};

/// Decode a signal group of a message.
/// Format: `SIG_GROUP_ <id> <name> <repetitions> : <signal> <signal> ...;`
pub(crate) fn decode(db: &mut Database, tokens: &[Token]) -> Result<(), String> {
    let mut cur = Cursor::new(tokens);
    cur.next(); // SIG_GROUP_

    let id: u32 = cur.number("message id")?;
    let name: &str = cur.word("signal group name")?;
    let repetitions: u32 = cur.number("repetitions")?;
    cur.expect(':')?;

    let mut members: Vec<&str> = Vec::new();
    while !cur.at_end() {
        if cur.eat(',') {
            continue;
        }
        members.push(cur.word("signal name")?);
    }

    let Some(msg) = db.message_mut(id) else {
        warn!(id, group = %name, "SIG_GROUP_ for unknown message skipped");
        return Ok(());
    };
    let mut signals: Vec<String> = Vec::with_capacity(members.len());
    for member in members {
        if msg.signal(member).is_none() {
            warn!(id, group = %name, signal = %member, "unknown signal dropped from group");
            continue;
        }
        signals.push(member.to_string());
    }
    msg.set_signal_group(SignalGroup {
        name: name.to_string(),
        repetitions,
        signals,
    });
    Ok(())
}
