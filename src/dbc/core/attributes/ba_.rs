use tracing::{debug, warn};

use crate::dbc::core::attributes::read_value;
use crate::dbc::core::strings::{Cursor, Token};
use crate::dbc::types::{attributes::AttributeValue, database::Database};

/// Decode an attribute assignment:
/// `BA_ "<name>" <value>;`
/// `BA_ "<name>" BU_ <node> <value>;`
/// `BA_ "<name>" BO_ <id> <value>;`
/// `BA_ "<name>" SG_ <id> <signal> <value>;`
pub(crate) fn decode(db: &mut Database, tokens: &[Token]) -> Result<(), String> {
    let mut cur = Cursor::new(tokens);
    cur.next(); // BA_

    let name: &str = cur.quoted("attribute name")?;

    match cur.peek() {
        Some(Token::Word(tag)) if tag == "BU_" => {
            cur.next();
            let node_name: &str = cur.word("node name")?;
            let value: AttributeValue = read_value(&mut cur)?;
            match db.node_mut(node_name) {
                Some(node) => node.attributes.set(name, value),
                None => warn!(attribute = %name, node = %node_name, "attribute for unknown node skipped"),
            }
        }
        Some(Token::Word(tag)) if tag == "BO_" => {
            cur.next();
            let id: u32 = cur.number("message id")?;
            let value: AttributeValue = read_value(&mut cur)?;
            match db.message_mut(id) {
                Some(msg) => msg.attributes.set(name, value),
                None => warn!(attribute = %name, id, "attribute for unknown message skipped"),
            }
        }
        Some(Token::Word(tag)) if tag == "SG_" => {
            cur.next();
            let id: u32 = cur.number("message id")?;
            let signal_name: &str = cur.word("signal name")?;
            let value: AttributeValue = read_value(&mut cur)?;
            match db.signal_mut(id, signal_name) {
                Some(sig) => sig.attributes.set(name, value),
                None => {
                    warn!(attribute = %name, id, signal = %signal_name, "attribute for unknown signal skipped")
                }
            }
        }
        Some(Token::Word(tag)) if tag == "EV_" => {
            debug!(attribute = %name, "environment variable attribute skipped");
        }
        _ => {
            let value: AttributeValue = read_value(&mut cur)?;
            db.attributes.set(name, value);
        }
    }
    Ok(())
}
