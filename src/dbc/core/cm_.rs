use tracing::{debug, warn};

use crate::dbc::core::strings::{Cursor, Token};
use crate::dbc::types::database::Database;

/// Decode a comment for the database, a node, a message or a signal:
/// `CM_ "<text>";`
/// `CM_ BU_ <node> "<text>";`
/// `CM_ BO_ <id> "<text>";`
/// `CM_ SG_ <id> <signal> "<text>";`
pub(crate) fn decode(db: &mut Database, tokens: &[Token]) -> Result<(), String> {
    let mut cur = Cursor::new(tokens);
    cur.next(); // CM_

    match cur.peek() {
        Some(Token::Quoted(_)) => {
            db.comment = Some(cur.quoted("comment")?.to_string());
        }
        Some(Token::Word(tag)) if tag == "BU_" => {
            cur.next();
            let node_name: &str = cur.word("node name")?;
            let text: &str = cur.quoted("comment")?;
            match db.node_mut(node_name) {
                Some(node) => node.comment = Some(text.to_string()),
                None => warn!(node = %node_name, "comment for unknown node skipped"),
            }
        }
        Some(Token::Word(tag)) if tag == "BO_" => {
            cur.next();
            let id: u32 = cur.number("message id")?;
            let text: &str = cur.quoted("comment")?;
            match db.message_mut(id) {
                Some(msg) => msg.comment = Some(text.to_string()),
                None => warn!(id, "comment for unknown message skipped"),
            }
        }
        Some(Token::Word(tag)) if tag == "SG_" => {
            cur.next();
            let id: u32 = cur.number("message id")?;
            let signal_name: &str = cur.word("signal name")?;
            let text: &str = cur.quoted("comment")?;
            match db.signal_mut(id, signal_name) {
                Some(sig) => sig.comment = Some(text.to_string()),
                None => warn!(id, signal = %signal_name, "comment for unknown signal skipped"),
            }
        }
        Some(Token::Word(tag)) => {
            debug!(tag = %tag, "comment on unsupported object skipped");
        }
        other => return Err(format!("unexpected comment target {:?}", other)),
    }
    Ok(())
}
