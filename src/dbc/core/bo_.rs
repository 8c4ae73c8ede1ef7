use crate::dbc::core::strings::{Cursor, Token};
use crate::dbc::types::{database::Database, message::Message};

/// Placeholder transmitter used by DBC writers when a message has no sender.
pub(crate) const NO_NODE: &str = "Vector__XXX";

/// Decode a message header; subsequent `SG_` lines attach to it.
/// Format: `BO_ <id> <name>: <byte_length> <sender>`
pub(crate) fn decode(db: &mut Database, tokens: &[Token]) -> Result<(), String> {
    let mut cur = Cursor::new(tokens);
    cur.next(); // BO_

    let id: u32 = cur.number("message id")?;
    let name: &str = cur.word("message name")?;
    cur.expect(':')?;
    let byte_length: u32 = cur.number("message length")?;

    let mut msg: Message = Message {
        id,
        name: name.to_string(),
        byte_length,
        ..Default::default()
    };
    if let Some(Token::Word(sender)) = cur.next()
        && sender != NO_NODE
    {
        msg.add_sender(sender);
    }

    db.add_message(msg);
    Ok(())
}
