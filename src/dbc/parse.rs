use std::fs;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use tracing::{debug, warn};

use crate::dbc::core::{
    self,
    strings::{Token, quotes_balanced, statement_complete, tokenize},
};
use crate::dbc::types::{database::Database, errors::DbcParseError};

/// Keywords whose statements are terminated by `;` and may span several lines.
const TERMINATED: &[&str] = &[
    "CM_",
    "BA_DEF_",
    "BA_DEF_DEF_",
    "BA_",
    "VAL_",
    "VAL_TABLE_",
    "BO_TX_BU_",
    "SIG_VALTYPE_",
    "BA_DEF_REL_",
    "BA_REL_",
    "BA_DEF_DEF_REL_",
    "BA_DEF_SGTYPE_",
    "BA_SGTYPE_",
    "SIG_GROUP_",
    "SG_MUL_VAL_",
    "EV_",
    "ENVVAR_DATA_",
    "SGTYPE_",
    "SGTYPE_VAL_",
    "SIG_TYPE_REF_",
    "SIGTYPE_VALTYPE_",
    "BU_SG_REL_",
    "BU_EV_REL_",
    "BU_BO_REL_",
    "CAT_DEF_",
    "CAT_",
    "FILTER",
    "EV_DATA_",
];

/// Single-line statements.
const LINE_KEYWORDS: &[&str] = &["VERSION", "NS_", "BS_", "BU_", "BO_", "SG_"];

/// Parses a DBC file and returns a populated [`Database`] instance.
///
/// # Errors
/// Returns an `Err(DbcParseError)` if:
/// - The path does not end in `.dbc`.
/// - The file cannot be opened or read.
/// - A record cannot be decoded (see [`from_str`]).
pub fn from_file(path: impl AsRef<Path>) -> Result<Database, DbcParseError> {
    let text: String = read_text(path)?;
    from_str(&text)
}

/// Reads a `.dbc` file into text.
///
/// The file is decoded as Windows-1252 (the encoding DBC authoring tools write); a UTF-8
/// byte-order mark switches decoding to UTF-8.
pub fn read_text(path: impl AsRef<Path>) -> Result<String, DbcParseError> {
    let path: &Path = path.as_ref();
    let path_str: String = path.display().to_string();

    // check if provided file has .dbc format
    if !path_str.to_ascii_lowercase().ends_with(".dbc") {
        return Err(DbcParseError::InvalidExtension { path: path_str });
    }

    let bytes: Vec<u8> = fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DbcParseError::OpenFile {
                path: path_str.clone(),
                source,
            }
        } else {
            DbcParseError::Read {
                path: path_str.clone(),
                source,
            }
        }
    })?;

    let (text, _, _) = WINDOWS_1252.decode(&bytes);
    Ok(text.into_owned())
}

/// Parses DBC text into a [`Database`].
///
/// Statements are read line by line; records terminated by `;` (comments, attributes,
/// value tables) are accumulated across lines until their terminator, so multi-line
/// comments are joined before decoding. The `NS_` symbol block, `BS_`, and records
/// outside the supported grammar are skipped.
///
/// References to unknown messages, signals or nodes are skipped with a warning.
///
/// # Errors
/// [`DbcParseError::Malformed`] with the 1-based line number when a supported record
/// cannot be decoded.
pub fn from_str(text: &str) -> Result<Database, DbcParseError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut db: Database = Database::default();
    let mut in_ns_block: bool = false;
    let mut i: usize = 0;

    while i < lines.len() {
        let line_no: usize = i + 1;
        let line: &str = lines[i];
        let line_trimmed: &str = line.trim_start();
        i += 1;

        // skip comments and empty lines
        if line_trimmed.is_empty() || line_trimmed.starts_with("//") {
            continue;
        }

        // NS_ entries are indented keywords, one per line
        if in_ns_block {
            if line.starts_with([' ', '\t']) {
                continue;
            }
            in_ns_block = false;
        }

        let keyword: &str = keyword_of(line_trimmed);
        let mut statement: String = line_trimmed.to_string();
        if TERMINATED.contains(&keyword) {
            while i < lines.len() && !statement_complete(&statement) {
                // a missing ';' must not swallow the next record
                if quotes_balanced(&statement) && starts_statement(lines[i]) {
                    break;
                }
                statement.push('\n');
                statement.push_str(lines[i]);
                i += 1;
            }
        }

        let malformed = |reason: String| DbcParseError::Malformed {
            line: line_no,
            keyword: keyword.to_string(),
            reason,
        };
        let tokens: Vec<Token> = tokenize(&statement).map_err(malformed)?;

        let result: Result<(), String> = match keyword {
            "VERSION" => core::version::decode(&mut db, &tokens),
            "NS_" => {
                in_ns_block = true;
                Ok(())
            }
            "BS_" => Ok(()),
            "BU_" => core::bu_::decode(&mut db, &tokens),
            "BO_" => core::bo_::decode(&mut db, &tokens),
            "SG_" => core::sg_::decode(&mut db, &tokens),
            "BO_TX_BU_" => core::bo_tx_bu_::decode(&mut db, &tokens),
            "CM_" => core::cm_::decode(&mut db, &tokens),
            "BA_DEF_" => core::attributes::ba_def_::decode(&mut db, &tokens),
            "BA_DEF_DEF_" => core::attributes::ba_def_def_::decode(&mut db, &tokens),
            "BA_" => core::attributes::ba_::decode(&mut db, &tokens),
            "VAL_" => core::val_::decode(&mut db, &tokens),
            "VAL_TABLE_" => core::val_::decode_table(&mut db, &tokens),
            "SIG_VALTYPE_" => core::sig_valtype_::decode(&mut db, &tokens),
            "SIG_GROUP_" => core::sig_group_::decode(&mut db, &tokens),
            "SG_MUL_VAL_" => core::sg_mul_val_::decode(&mut db, &tokens),
            "BA_DEF_REL_" | "BA_REL_" | "BA_DEF_DEF_REL_" => {
                warn!(line = line_no, keyword = %keyword, "relation attribute dropped");
                Ok(())
            }
            other => {
                debug!(line = line_no, keyword = %other, "unsupported record skipped");
                Ok(())
            }
        };
        result.map_err(malformed)?;
    }

    db.current_msg = None;
    Ok(db)
}

// First word of a statement; a trailing ':' is not part of it (`BU_:`, `NS_ :`).
fn keyword_of(line: &str) -> &str {
    line.split(|c: char| c.is_whitespace() || c == ':')
        .next()
        .unwrap_or("")
}

// True when `line` opens a new record (or is blank).
fn starts_statement(line: &str) -> bool {
    let trimmed: &str = line.trim_start();
    if trimmed.is_empty() {
        return true;
    }
    let keyword: &str = keyword_of(trimmed);
    TERMINATED.contains(&keyword) || LINE_KEYWORDS.contains(&keyword)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbc::types::{
        attributes::{AttrObject, AttrType, AttributeValue},
        signal::{Endianness, MuxRole, Signess, ValueType},
    };

    const SAMPLE: &str = r#"VERSION "1.0.2"

NS_ :
	NS_DESC_
	CM_
	BA_DEF_
	BA_
	VAL_
	BA_DEF_DEF_
	SIG_VALTYPE_
	BO_TX_BU_

BS_:

BU_: Motor Infotainment Gateway

VAL_TABLE_ OnOff 1 "On" 0 "Off" ;

BO_ 2527679645 Motor_01: 8 Motor
 SG_ Status : 61|1@1+ (1,0) [0|1] ""  Infotainment,Gateway
 SG_ Overheat : 62|1@1+ (1,0) [0|1] ""  Gateway
 SG_ Engine_Speed : 48|8@1+ (1.0E-3,0) [0|255] "km/h" Infotainment
 SG_ Failure : 63|1@0- (1,0) [0|1] "" Vector__XXX

BO_ 708 ZV_04: 8 Vector__XXX
 SG_ Mux M : 0|4@1+ (1,0) [0|15] "" Vector__XXX
 SG_ Lock_A m0 : 8|1@1+ (1,0) [0|1] "" Vector__XXX
 SG_ Lock_B m1 : 8|1@1+ (1,0) [0|1] "" Vector__XXX

BO_TX_BU_ 2527679645 : Motor,Gateway;

CM_ "Bus comment";
CM_ BO_ 2527679645 "Funny comment about Motor_01";
CM_ SG_ 2527679645 Engine_Speed "First line
second line";
CM_ BU_ Motor "Motor ECU";
BA_DEF_  "BusType" STRING ;
BA_DEF_ BO_ "GenMsgCycleTime" INT 0 65535;
BA_DEF_ SG_ "GenSigStartValue" FLOAT -3.4E+038 3.4E+038;
BA_DEF_ BU_ "NmNode" ENUM "No","Yes";
BA_DEF_DEF_  "BusType" "CAN";
BA_DEF_DEF_  "GenMsgCycleTime" 0;
BA_ "BusType" "CAN FD";
BA_ "GenMsgCycleTime" BO_ 2527679645 100;
BA_ "GenSigStartValue" SG_ 2527679645 Status 0.5;
BA_ "NmNode" BU_ Motor 1;
VAL_ 2527679645 Status 1 "On" 0 "Off" ;
VAL_ 2527679645 Engine_Speed 255 "Error";
SIG_VALTYPE_ 2527679645 Failure : 1;
SIG_GROUP_ 708 Group 1 : Lock_A;
SG_MUL_VAL_ 708 Lock_B Mux 1-1, 4-6;
"#;

    #[test]
    fn test_parse_sample() {
        let db: Database = from_str(SAMPLE).expect("Failed to parse DBC");

        // --- Database first checks ---
        assert_eq!(db.version, "1.0.2");
        assert_eq!(db.comment.as_deref(), Some("Bus comment"));
        let node_names: Vec<&str> = db.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(node_names, vec!["Motor", "Infotainment", "Gateway"]);
        assert_eq!(db.nodes[0].comment.as_deref(), Some("Motor ECU"));
        assert_eq!(db.value_tables.len(), 1);
        assert_eq!(db.value_tables[0].choices.len(), 2);

        // --- Messages ---
        assert_eq!(db.messages.len(), 2);
        let msg = &db.messages[0];
        assert_eq!(msg.id, 2527679645);
        assert_eq!(msg.name, "Motor_01");
        assert_eq!(msg.byte_length, 8);
        assert_eq!(msg.senders, vec!["Motor", "Gateway"]);
        assert_eq!(
            msg.comment.as_deref(),
            Some("Funny comment about Motor_01")
        );
        assert_eq!(msg.signals.len(), 4);
        assert!(db.messages[1].senders.is_empty());

        // --- Signals ---
        let status = &msg.signals[0];
        assert_eq!(status.bit_start, 61);
        assert_eq!(status.receivers, vec!["Infotainment", "Gateway"]);
        assert_eq!(status.choices.len(), 2);
        assert_eq!(status.choices[0].value, 1);

        let speed = msg.signal("Engine_Speed").unwrap();
        assert_eq!(speed.factor.raw(), "1.0E-3");
        assert_eq!(speed.unit, "km/h");
        assert_eq!(speed.comment.as_deref(), Some("First line\nsecond line"));

        let failure = msg.signal("Failure").unwrap();
        assert_eq!(failure.endian, Endianness::Motorola);
        assert_eq!(failure.sign, Signess::Signed);
        assert_eq!(failure.value_type, ValueType::IeeeFloat);
        assert!(failure.receivers.is_empty());

        let mux_msg = &db.messages[1];
        assert_eq!(mux_msg.signals[0].mux, MuxRole::Multiplexor);
        assert_eq!(mux_msg.signals[2].mux, MuxRole::Multiplexed(1));
        assert_eq!(mux_msg.signal_groups.len(), 1);
        assert_eq!(mux_msg.signal_groups[0].name, "Group");
        assert_eq!(mux_msg.signal_groups[0].signals, vec!["Lock_A"]);
        assert_eq!(mux_msg.extended_mux[0].signal, "Lock_B");
        assert_eq!(mux_msg.extended_mux[0].ranges, vec![(1, 1), (4, 6)]);

        // --- Attributes ---
        let defs = &db.attribute_definitions;
        assert_eq!(defs.len(), 4);
        assert_eq!(defs.get("BusType").unwrap().object, AttrObject::Database);
        assert_eq!(
            defs.get("BusType").unwrap().default,
            Some(AttributeValue::Str("CAN".into()))
        );
        assert_eq!(
            defs.get("GenMsgCycleTime").unwrap().kind,
            AttrType::Int { min: 0, max: 65535 }
        );
        assert_eq!(
            defs.get("NmNode").unwrap().kind,
            AttrType::Enum(vec!["No".into(), "Yes".into()])
        );
        assert_eq!(
            db.attributes.get("BusType"),
            Some(&AttributeValue::Str("CAN FD".into()))
        );
        assert_eq!(
            msg.attributes.get("GenMsgCycleTime"),
            Some(&AttributeValue::Int(100))
        );
        assert!(matches!(
            status.attributes.get("GenSigStartValue"),
            Some(AttributeValue::Float(_))
        ));
        assert_eq!(
            db.nodes[0].attributes.get("NmNode"),
            Some(&AttributeValue::Int(1))
        );
    }

    #[test]
    fn test_crlf_and_missing_semicolon() {
        let text = "VERSION \"\"\r\n\r\nBU_: A\r\nBO_ 1 M: 8 A\r\n SG_ S : 0|8@1+ (1,0) [0|0] \"\" A\r\nCM_ BO_ 1 \"no terminator\"\r\nCM_ SG_ 1 S \"next\";\r\n";
        let db = from_str(text).unwrap();
        assert_eq!(db.messages[0].comment.as_deref(), Some("no terminator"));
        assert_eq!(
            db.messages[0].signals[0].comment.as_deref(),
            Some("next")
        );
    }

    #[test]
    fn test_malformed_reports_line() {
        let text = "VERSION \"\"\n\nBO_ 1 M: 8 A\n SG_ S : 0|x@1+ (1,0) [0|0] \"\" A\n";
        match from_str(text) {
            Err(DbcParseError::Malformed { line, keyword, .. }) => {
                assert_eq!(line, 4);
                assert_eq!(keyword, "SG_");
            }
            other => panic!("expected malformed error, got {:?}", other),
        }
    }

    #[test]
    fn test_signal_before_message_is_malformed() {
        let text = " SG_ S : 0|8@1+ (1,0) [0|0] \"\" A\n";
        assert!(matches!(
            from_str(text),
            Err(DbcParseError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_relation_attributes_skipped() {
        let text = "BU_: A\nBO_ 1 M: 8 A\n SG_ S : 0|8@1+ (1,0) [0|0] \"\" A\n\
BA_DEF_REL_ BU_SG_REL_ \"GenSigTimeout\" INT 0 100;\n\
BA_DEF_DEF_REL_ \"GenSigTimeout\" 0;\n\
BA_REL_ \"GenSigTimeout\" BU_SG_REL_ A SG_ 1 S 10;\n";
        let db = from_str(text).unwrap();
        assert!(db.attribute_definitions.is_empty());
        assert_eq!(db.messages[0].signals.len(), 1);
    }

    #[test]
    fn test_dangling_references_skipped() {
        let text = "BU_: A\nCM_ BO_ 99 \"nobody\";\nBA_ \"X\" BU_ Ghost 1;\nVAL_ 99 S 1 \"x\";\n";
        let db = from_str(text).unwrap();
        assert!(db.messages.is_empty());
        assert!(db.nodes[0].attributes.is_empty());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bus.DBC");
        // 0xB0 is the degree sign in Windows-1252
        let mut bytes: Vec<u8> = b"BU_: A\nBO_ 1 M: 8 A\n SG_ T : 0|8@1+ (1,0) [0|0] \"".to_vec();
        bytes.push(0xB0);
        bytes.extend_from_slice(b"C\" A\n");
        std::fs::write(&path, bytes).unwrap();

        let db = from_file(&path).unwrap();
        assert_eq!(db.messages[0].signals[0].unit, "\u{b0}C");

        assert!(matches!(
            from_file(dir.path().join("bus.txt")),
            Err(DbcParseError::InvalidExtension { .. })
        ));
        assert!(matches!(
            from_file(dir.path().join("missing.dbc")),
            Err(DbcParseError::OpenFile { .. })
        ));
    }
}
