use crate::dbc::core::strings::{Cursor, Token};
use crate::dbc::types::{
    attributes::{AttrObject, AttrType, AttributeDefinition},
    database::Database,
    decimal::Decimal,
};

pub(crate) fn decode(db: &mut Database, tokens: &[Token]) -> Result<(), String> {
    // Expected formats:
    // BA_DEF_  "DBName" STRING;
    // BA_DEF_ BU_ "NmNode" ENUM "No","Yes";
    // BA_DEF_ BO_ "GenMsgCycleTime" INT 0 65535;
    // BA_DEF_ SG_ "GenSigStartValue" FLOAT -3.4E+038 3.4E+038;
    // BA_DEF_  "NmhBaseAddress" HEX 0 536870911;
    let mut cur = Cursor::new(tokens);
    cur.next(); // BA_DEF_

    let object: AttrObject = match cur.peek() {
        Some(Token::Word(tag)) => {
            let object =
                AttrObject::from_tag(tag).ok_or_else(|| format!("unknown object type '{}'", tag))?;
            cur.next();
            object
        }
        _ => AttrObject::Database,
    };

    let name: &str = cur.quoted("attribute name")?;
    let attr_type: &str = cur.word("attribute type")?;

    let kind: AttrType = match attr_type {
        "STRING" => AttrType::String,
        "INT" => AttrType::Int {
            min: cur.number("minimum")?,
            max: cur.number("maximum")?,
        },
        "HEX" => AttrType::Hex {
            min: cur.number("minimum")?,
            max: cur.number("maximum")?,
        },
        "FLOAT" => AttrType::Float {
            min: cur.number::<Decimal>("minimum")?,
            max: cur.number::<Decimal>("maximum")?,
        },
        "ENUM" => {
            let mut values: Vec<String> = Vec::new();
            while !cur.at_end() {
                if cur.eat(',') {
                    continue;
                }
                values.push(cur.quoted("enum value")?.to_string());
            }
            AttrType::Enum(values)
        }
        other => return Err(format!("unknown attribute type '{}'", other)),
    };

    db.attribute_definitions.insert(AttributeDefinition {
        name: name.to_string(),
        object,
        kind,
        default: None,
    });
    Ok(())
}
