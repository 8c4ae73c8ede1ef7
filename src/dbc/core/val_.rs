use tracing::warn;

use crate::dbc::core::strings::{Cursor, Token};
use crate::dbc::types::{
    database::Database,
    signal::{ValueChoice, ValueTable, set_choice},
};

/// Parse a VAL_ line that defines the value table of a specific signal:
/// `VAL_ <MessageID> <SignalName> <value> "<desc>" ... ;`
pub(crate) fn decode(db: &mut Database, tokens: &[Token]) -> Result<(), String> {
    let mut cur = Cursor::new(tokens);
    cur.next(); // VAL_

    // `VAL_ <env_var> ...` targets an environment variable, which is not modeled.
    let Ok(id) = cur.number::<u32>("message id") else {
        return Ok(());
    };
    let signal_name: &str = cur.word("signal name")?;
    let pairs: Vec<(i64, String)> = cur.choices()?;

    let Some(sig) = db.signal_mut(id, signal_name) else {
        warn!(id, signal = %signal_name, "VAL_ for unknown signal skipped");
        return Ok(());
    };
    sig.choices.clear();
    for (value, description) in pairs {
        set_choice(&mut sig.choices, value, description);
    }
    Ok(())
}

/// Parse a named, database-level value table:
/// `VAL_TABLE_ <name> <value> "<desc>" ... ;`
pub(crate) fn decode_table(db: &mut Database, tokens: &[Token]) -> Result<(), String> {
    let mut cur = Cursor::new(tokens);
    cur.next(); // VAL_TABLE_

    let name: &str = cur.word("value table name")?;
    let mut choices: Vec<ValueChoice> = Vec::new();
    for (value, description) in cur.choices()? {
        set_choice(&mut choices, value, description);
    }

    match db.value_tables.iter_mut().find(|t| t.name == name) {
        Some(table) => table.choices = choices,
        None => db.value_tables.push(ValueTable {
            name: name.to_string(),
            choices,
        }),
    }
    Ok(())
}
