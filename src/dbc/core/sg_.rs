use crate::dbc::core::bo_::NO_NODE;
use crate::dbc::core::strings::{Cursor, Token};
use crate::dbc::types::{
    database::Database,
    decimal::Decimal,
    signal::{Endianness, MuxRole, Signal, Signess},
};

/// Decode a `SG_` line belonging to the **current message** (the last parsed BO_).
/// Format (typical):
/// SG_ <name> [M|mX|mXM] : <bit_start>|<bit_length>@<endian><sign> (<factor>,<offset>) [<min>|<max>] "<unit>" <receivers...>
pub(crate) fn decode(db: &mut Database, tokens: &[Token]) -> Result<(), String> {
    let mut cur = Cursor::new(tokens);
    cur.next(); // SG_

    let name: &str = cur.word("signal name")?;

    // multiplexing tag decoding (if present)
    let mut mux: MuxRole = MuxRole::None;
    if let Some(Token::Word(tag)) = cur.peek() {
        mux = MuxRole::from_tag(tag).ok_or_else(|| format!("invalid multiplexer tag '{}'", tag))?;
        cur.next();
    }
    cur.expect(':')?;

    // bit info: "63|1@1+"
    let bit_start: u32 = cur.number("start bit")?;
    cur.expect('|')?;
    let bit_length: u32 = cur.number("bit length")?;
    cur.expect('@')?;
    let es: &str = cur.word("byte order and sign")?;
    let mut es_chars = es.chars();
    let endian: Endianness = match es_chars.next() {
        Some('1') => Endianness::Intel,
        Some('0') => Endianness::Motorola,
        _ => return Err(format!("invalid byte order '{}'", es)),
    };
    let sign: Signess = match es_chars.next() {
        Some('+') => Signess::Unsigned,
        Some('-') => Signess::Signed,
        _ => return Err(format!("invalid sign '{}'", es)),
    };

    // "(factor,offset)"
    cur.expect('(')?;
    let factor: Decimal = cur.number("factor")?;
    cur.expect(',')?;
    let offset: Decimal = cur.number("offset")?;
    cur.expect(')')?;

    // "[min|max]"
    cur.expect('[')?;
    let min: Decimal = cur.number("minimum")?;
    cur.expect('|')?;
    let max: Decimal = cur.number("maximum")?;
    cur.expect(']')?;

    let unit: &str = cur.quoted("unit")?;

    // receivers (comma separated)
    let mut receivers: Vec<String> = Vec::new();
    while !cur.at_end() {
        if cur.eat(',') {
            continue;
        }
        let receiver: &str = cur.word("receiver")?;
        if receiver != NO_NODE && !receivers.iter().any(|r| r == receiver) {
            receivers.push(receiver.to_string());
        }
    }

    let Some(msg) = db.current_message_mut() else {
        return Err(format!("signal '{}' appears before any BO_", name));
    };
    if msg.signal(name).is_some() {
        return Err(format!("signal '{}' defined twice in message {}", name, msg.id));
    }

    msg.signals.push(Signal {
        name: name.to_string(),
        bit_start,
        bit_length,
        endian,
        sign,
        factor,
        offset,
        min,
        max,
        unit: unit.to_string(),
        receivers,
        mux,
        ..Default::default()
    });
    Ok(())
}
