use tracing::warn;

use crate::dbc::core::strings::{Cursor, Token};
use crate::dbc::types::database::Database;

/// Decode additional transmitters of a message.
/// Format: `BO_TX_BU_ <id> : <node>,<node>;`
pub(crate) fn decode(db: &mut Database, tokens: &[Token]) -> Result<(), String> {
    let mut cur = Cursor::new(tokens);
    cur.next(); // BO_TX_BU_

    let id: u32 = cur.number("message id")?;
    cur.expect(':')?;

    let mut senders: Vec<&str> = Vec::new();
    while !cur.at_end() {
        if cur.eat(',') {
            continue;
        }
        senders.push(cur.word("transmitter")?);
    }

    let Some(msg) = db.message_mut(id) else {
        warn!(id, "BO_TX_BU_ for unknown message skipped");
        return Ok(());
    };
    for sender in senders {
        msg.add_sender(sender);
    }
    Ok(())
}
