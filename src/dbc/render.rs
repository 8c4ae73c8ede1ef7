//! DBC text renderer.
//!
//! [`render`] serializes a [`Database`] section by section. It never decides emission
//! order on its own: every record kind is sorted with the comparator supplied in the
//! [`Orderings`] of the [`RenderPolicy`], and every decimal goes through the policy's
//! number formatter. [`RenderPolicy::authored`] keeps the parsed order and spelling.

use std::cmp::Ordering;

use crate::dbc::core::{bo_::NO_NODE, strings::escape_dbc_string};
use crate::dbc::types::{
    attributes::{AttrType, AttributeDefinition, AttributeValue},
    database::Database,
    decimal::Decimal,
    message::{ExtendedMux, Message, SignalGroup},
    node::Node,
    signal::{Endianness, Signal, Signess, ValueChoice, ValueTable},
};

const CRLF: &str = "\r\n";

const NS_KEYWORDS: &[&str] = &[
    "NS_DESC_",
    "CM_",
    "BA_DEF_",
    "BA_",
    "VAL_",
    "CAT_DEF_",
    "CAT_",
    "FILTER",
    "BA_DEF_DEF_",
    "EV_DATA_",
    "ENVVAR_DATA_",
    "SGTYPE_",
    "SGTYPE_VAL_",
    "BA_DEF_SGTYPE_",
    "BA_SGTYPE_",
    "SIG_TYPE_REF_",
    "VAL_TABLE_",
    "SIG_GROUP_",
    "SIG_VALTYPE_",
    "SIGTYPE_VALTYPE_",
    "BO_TX_BU_",
    "BA_DEF_REL_",
    "BA_REL_",
    "BA_DEF_DEF_REL_",
    "BU_SG_REL_",
    "BU_EV_REL_",
    "BU_BO_REL_",
    "SG_MUL_VAL_",
];

/// Object an attribute assignment (`BA_`) targets.
#[derive(Clone, Copy, Debug)]
pub enum AttributeTarget<'a> {
    Database,
    Node(&'a Node),
    Message(&'a Message),
    Signal(&'a Message, &'a Signal),
}

/// One attribute assignment, as seen by the attribute ordering.
#[derive(Clone, Copy, Debug)]
pub struct AttributeRecord<'a> {
    pub name: &'a str,
    pub value: &'a AttributeValue,
    pub target: AttributeTarget<'a>,
}

/// Comparators deciding emission order, one per record kind.
///
/// The renderer sorts stably, so a comparator returning `Equal` keeps the parsed order.
/// Signals inside a `BO_` block are laid out by a function over the whole message,
/// since their position can depend on the other signals of the message.
#[derive(Clone, Copy)]
pub struct Orderings {
    /// Names in the `BU_` line (and node-level comments/attributes).
    pub nodes: fn(&Node, &Node) -> Ordering,
    /// `BO_` blocks and every per-message listing.
    pub messages: fn(&Message, &Message) -> Ordering,
    /// Transmitters listed by `BO_TX_BU_`.
    pub senders: fn(&str, &str) -> Ordering,
    /// `SG_` lines inside a `BO_` block.
    pub signals: fn(&Message) -> Vec<&Signal>,
    /// Signals in the comment, attribute, `VAL_` and `SIG_VALTYPE_` listings.
    pub attribute_signals: fn(&Signal, &Signal) -> Ordering,
    /// `BA_DEF_` lines.
    pub attribute_definitions: fn(&AttributeDefinition, &AttributeDefinition) -> Ordering,
    /// Rendered `BA_DEF_DEF_` lines.
    pub attribute_defaults: fn(&str, &str) -> Ordering,
    /// Rendered `CM_` lines.
    pub comments: fn(&str, &str) -> Ordering,
    /// `BA_` assignments.
    pub attributes: fn(&AttributeRecord<'_>, &AttributeRecord<'_>) -> Ordering,
    /// Entries of `VAL_` and `VAL_TABLE_` lines.
    pub choices: fn(&ValueChoice, &ValueChoice) -> Ordering,
    /// `VAL_TABLE_` lines.
    pub value_tables: fn(&ValueTable, &ValueTable) -> Ordering,
    /// `SIG_GROUP_` lines of one message.
    pub signal_groups: fn(&SignalGroup, &SignalGroup) -> Ordering,
    /// `SG_MUL_VAL_` lines of one message.
    pub extended_mux: fn(&ExtendedMux, &ExtendedMux) -> Ordering,
}

impl Orderings {
    /// Keeps every record in the order it was parsed.
    pub fn authored() -> Orderings {
        Orderings {
            nodes: |_, _| Ordering::Equal,
            messages: |_, _| Ordering::Equal,
            senders: |_, _| Ordering::Equal,
            signals: authored_signals,
            attribute_signals: |_, _| Ordering::Equal,
            attribute_definitions: |_, _| Ordering::Equal,
            attribute_defaults: |_, _| Ordering::Equal,
            comments: |_, _| Ordering::Equal,
            attributes: |_: &AttributeRecord<'_>, _: &AttributeRecord<'_>| Ordering::Equal,
            choices: |_, _| Ordering::Equal,
            value_tables: |_, _| Ordering::Equal,
            signal_groups: |_, _| Ordering::Equal,
            extended_mux: |_, _| Ordering::Equal,
        }
    }
}

fn authored_signals(msg: &Message) -> Vec<&Signal> {
    msg.signals.iter().collect()
}

/// Formatter applied to every decimal field.
pub type NumberFormat = fn(&Decimal) -> String;

/// Everything the renderer needs to decide order and spelling.
#[derive(Clone, Copy)]
pub struct RenderPolicy {
    pub orderings: Orderings,
    pub number: NumberFormat,
}

impl RenderPolicy {
    /// Parsed order, authored number spelling.
    pub fn authored() -> RenderPolicy {
        RenderPolicy {
            orderings: Orderings::authored(),
            number: |d| d.to_string(),
        }
    }
}

/// Serializes `db` as DBC text with `\r\n` line endings.
pub fn render(db: &Database, policy: &RenderPolicy) -> String {
    let r = Renderer { db, policy };
    let mut out = String::new();

    r.write_header(&mut out);
    r.write_nodes(&mut out);
    r.write_value_tables(&mut out);
    blank(&mut out);
    blank(&mut out);
    r.write_messages(&mut out);
    blank(&mut out);
    blank(&mut out);
    r.write_bo_tx_bu(&mut out);
    blank(&mut out);
    blank(&mut out);
    r.write_comments(&mut out);
    r.write_attribute_definitions(&mut out);
    r.write_attribute_defaults(&mut out);
    r.write_attribute_assignments(&mut out);
    r.write_choices(&mut out);
    r.write_sig_valtype(&mut out);
    r.write_signal_groups(&mut out);
    r.write_extended_mux(&mut out);

    out
}

struct Renderer<'a> {
    db: &'a Database,
    policy: &'a RenderPolicy,
}

impl<'a> Renderer<'a> {
    fn ord(&self) -> &Orderings {
        &self.policy.orderings
    }

    fn num(&self, d: &Decimal) -> String {
        (self.policy.number)(d)
    }

    fn nodes(&self) -> Vec<&'a Node> {
        sorted(&self.db.nodes, self.ord().nodes)
    }

    fn messages(&self) -> Vec<&'a Message> {
        sorted(&self.db.messages, self.ord().messages)
    }

    fn listed_signals(&self, msg: &'a Message) -> Vec<&'a Signal> {
        sorted(&msg.signals, self.ord().attribute_signals)
    }

    fn write_header(&self, out: &mut String) {
        line(out, format!("VERSION \"{}\"", escape_dbc_string(&self.db.version)));
        blank(out);
        blank(out);
        line(out, "NS_ :");
        for keyword in NS_KEYWORDS {
            line(out, format!("\t{}", keyword));
        }
        blank(out);
        line(out, "BS_:");
        blank(out);
    }

    fn write_nodes(&self, out: &mut String) {
        let mut bu = String::from("BU_:");
        for node in self.nodes() {
            bu.push(' ');
            bu.push_str(&node.name);
        }
        line(out, bu);
    }

    fn write_value_tables(&self, out: &mut String) {
        for table in sorted(&self.db.value_tables, self.ord().value_tables) {
            line(
                out,
                format!("VAL_TABLE_ {} {} ;", table.name, self.choice_list(&table.choices)),
            );
        }
    }

    fn write_messages(&self, out: &mut String) {
        let mut first = true;
        for msg in self.messages() {
            if !first {
                blank(out);
            }
            first = false;

            let transmitter: &str = msg.senders.first().map_or(NO_NODE, String::as_str);
            line(
                out,
                format!(
                    "BO_ {} {}: {} {}",
                    msg.id, msg.name, msg.byte_length, transmitter
                ),
            );
            for sig in (self.ord().signals)(msg) {
                line(out, self.signal_line(sig));
            }
        }
    }

    fn signal_line(&self, sig: &Signal) -> String {
        let mux_tag: String = match sig.mux.tag() {
            tag if tag.is_empty() => tag,
            tag => format!(" {}", tag),
        };
        let endian: char = match sig.endian {
            Endianness::Intel => '1',
            Endianness::Motorola => '0',
        };
        let sign: char = match sig.sign {
            Signess::Unsigned => '+',
            Signess::Signed => '-',
        };
        let receivers: String = if sig.receivers.is_empty() {
            NO_NODE.to_string()
        } else {
            sig.receivers.join(",")
        };
        format!(
            " SG_ {}{} : {}|{}@{}{} ({},{}) [{}|{}] \"{}\"  {}",
            sig.name,
            mux_tag,
            sig.bit_start,
            sig.bit_length,
            endian,
            sign,
            self.num(&sig.factor),
            self.num(&sig.offset),
            self.num(&sig.min),
            self.num(&sig.max),
            escape_dbc_string(&sig.unit),
            receivers
        )
    }

    fn write_bo_tx_bu(&self, out: &mut String) {
        for msg in self.messages() {
            if msg.senders.len() > 1 {
                let mut senders: Vec<&str> = msg.senders.iter().map(String::as_str).collect();
                let cmp = self.ord().senders;
                senders.sort_by(|a, b| cmp(a, b));
                line(
                    out,
                    format!("BO_TX_BU_ {} : {};", msg.id, senders.join(",")),
                );
            }
        }
    }

    fn write_comments(&self, out: &mut String) {
        let mut lines: Vec<String> = Vec::new();

        if let Some(text) = &self.db.comment {
            lines.push(format!("CM_ \"{}\";", escape_dbc_string(text)));
        }
        for node in self.nodes() {
            if let Some(text) = &node.comment {
                lines.push(format!(
                    "CM_ BU_ {} \"{}\";",
                    node.name,
                    escape_dbc_string(text)
                ));
            }
        }
        for msg in self.messages() {
            if let Some(text) = &msg.comment {
                lines.push(format!("CM_ BO_ {} \"{}\";", msg.id, escape_dbc_string(text)));
            }
        }
        for msg in self.messages() {
            for sig in self.listed_signals(msg) {
                if let Some(text) = &sig.comment {
                    lines.push(format!(
                        "CM_ SG_ {} {} \"{}\";",
                        msg.id,
                        sig.name,
                        escape_dbc_string(text)
                    ));
                }
            }
        }

        let cmp = self.ord().comments;
        lines.sort_by(|a, b| cmp(a, b));
        for l in lines {
            line(out, l);
        }
    }

    fn definitions(&self) -> Vec<&'a AttributeDefinition> {
        let mut defs: Vec<&AttributeDefinition> = self.db.attribute_definitions.iter().collect();
        let cmp = self.ord().attribute_definitions;
        defs.sort_by(|a, b| cmp(a, b));
        defs
    }

    fn write_attribute_definitions(&self, out: &mut String) {
        for def in self.definitions() {
            line(
                out,
                format!(
                    "BA_DEF_ {} \"{}\" {};",
                    def.object.tag().unwrap_or(""),
                    def.name,
                    self.attribute_type(&def.kind)
                ),
            );
        }
    }

    fn attribute_type(&self, kind: &AttrType) -> String {
        match kind {
            AttrType::Int { min, max } => format!("INT {} {}", min, max),
            AttrType::Hex { min, max } => format!("HEX {} {}", min, max),
            AttrType::Float { min, max } => {
                format!("FLOAT {} {}", self.num(min), self.num(max))
            }
            AttrType::String => "STRING".to_string(),
            AttrType::Enum(values) => {
                let joined: String = values
                    .iter()
                    .map(|v| format!("\"{}\"", escape_dbc_string(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                format!("ENUM {}", joined)
            }
        }
    }

    fn write_attribute_defaults(&self, out: &mut String) {
        let mut lines: Vec<String> = self
            .definitions()
            .into_iter()
            .filter_map(|def| {
                let value = def.default.as_ref()?;
                Some(format!(
                    "BA_DEF_DEF_  \"{}\" {};",
                    def.name,
                    self.attribute_value(value)
                ))
            })
            .collect();

        let cmp = self.ord().attribute_defaults;
        lines.sort_by(|a, b| cmp(a, b));
        for l in lines {
            line(out, l);
        }
    }

    fn attribute_value(&self, value: &AttributeValue) -> String {
        match value {
            AttributeValue::Str(s) => format!("\"{}\"", escape_dbc_string(s)),
            AttributeValue::Int(v) => v.to_string(),
            AttributeValue::Float(d) => self.num(d),
        }
    }

    fn write_attribute_assignments(&self, out: &mut String) {
        let mut records: Vec<AttributeRecord<'a>> = Vec::new();

        for (name, value) in self.db.attributes.iter() {
            records.push(AttributeRecord {
                name,
                value,
                target: AttributeTarget::Database,
            });
        }
        for node in self.nodes() {
            for (name, value) in node.attributes.iter() {
                records.push(AttributeRecord {
                    name,
                    value,
                    target: AttributeTarget::Node(node),
                });
            }
        }
        for msg in self.messages() {
            for (name, value) in msg.attributes.iter() {
                records.push(AttributeRecord {
                    name,
                    value,
                    target: AttributeTarget::Message(msg),
                });
            }
        }
        for msg in self.messages() {
            for sig in self.listed_signals(msg) {
                for (name, value) in sig.attributes.iter() {
                    records.push(AttributeRecord {
                        name,
                        value,
                        target: AttributeTarget::Signal(msg, sig),
                    });
                }
            }
        }

        let cmp = self.ord().attributes;
        records.sort_by(|a, b| cmp(a, b));

        for rec in records {
            let value: String = self.attribute_value(rec.value);
            let text: String = match rec.target {
                AttributeTarget::Database => format!("BA_ \"{}\" {};", rec.name, value),
                AttributeTarget::Node(node) => {
                    format!("BA_ \"{}\" BU_ {} {};", rec.name, node.name, value)
                }
                AttributeTarget::Message(msg) => {
                    format!("BA_ \"{}\" BO_ {} {};", rec.name, msg.id, value)
                }
                AttributeTarget::Signal(msg, sig) => format!(
                    "BA_ \"{}\" SG_ {} {} {};",
                    rec.name, msg.id, sig.name, value
                ),
            };
            line(out, text);
        }
    }

    fn choice_list(&self, choices: &[ValueChoice]) -> String {
        sorted(choices, self.ord().choices)
            .into_iter()
            .map(|c| format!("{} \"{}\"", c.value, escape_dbc_string(&c.description)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn write_choices(&self, out: &mut String) {
        for msg in self.messages() {
            for sig in self.listed_signals(msg) {
                if sig.choices.is_empty() {
                    continue;
                }
                line(
                    out,
                    format!(
                        "VAL_ {} {} {} ;",
                        msg.id,
                        sig.name,
                        self.choice_list(&sig.choices)
                    ),
                );
            }
        }
    }

    fn write_sig_valtype(&self, out: &mut String) {
        for msg in self.messages() {
            for sig in self.listed_signals(msg) {
                if let Some(code) = sig.value_type.code() {
                    line(
                        out,
                        format!("SIG_VALTYPE_ {} {} : {};", msg.id, sig.name, code),
                    );
                }
            }
        }
    }

    fn write_signal_groups(&self, out: &mut String) {
        for msg in self.messages() {
            for group in sorted(&msg.signal_groups, self.ord().signal_groups) {
                line(
                    out,
                    format!(
                        "SIG_GROUP_ {} {} {} : {};",
                        msg.id,
                        group.name,
                        group.repetitions,
                        group.signals.join(" ")
                    ),
                );
            }
        }
    }

    fn write_extended_mux(&self, out: &mut String) {
        for msg in self.messages() {
            for entry in sorted(&msg.extended_mux, self.ord().extended_mux) {
                let ranges: String = entry
                    .ranges
                    .iter()
                    .map(|(lo, hi)| format!("{}-{}", lo, hi))
                    .collect::<Vec<_>>()
                    .join(", ");
                line(
                    out,
                    format!(
                        "SG_MUL_VAL_ {} {} {} {};",
                        msg.id, entry.signal, entry.switch, ranges
                    ),
                );
            }
        }
    }
}

fn sorted<T>(items: &[T], cmp: fn(&T, &T) -> Ordering) -> Vec<&T> {
    let mut refs: Vec<&T> = items.iter().collect();
    refs.sort_by(|a, b| cmp(a, b));
    refs
}

fn line(out: &mut String, text: impl AsRef<str>) {
    out.push_str(text.as_ref());
    out.push_str(CRLF);
}

fn blank(out: &mut String) {
    out.push_str(CRLF);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbc::parse::from_str;

    const SAMPLE: &str = r#"VERSION "7"

BU_: Zeta Alpha

BO_ 20 Second: 8 Alpha
 SG_ B : 8|8@1+ (1,0) [0|0] "" Zeta

BO_ 10 First: 4 Zeta
 SG_ Speed m1 : 0|16@0- (1.0E-3,-5) [-1.5|2E+2] "km/h"  Alpha,Zeta

CM_ BO_ 20 "say \"hi\"";
BA_DEF_ BO_ "GenMsgCycleTime" INT 0 65535;
BA_DEF_  "Gain" FLOAT 0 1.5;
BA_DEF_DEF_ "GenMsgCycleTime" 0;
BA_ "GenMsgCycleTime" BO_ 20 100;
BA_ "Gain" 0.25;
VAL_ 10 Speed 0 "Off" 2 "Error" 1 "On" ;
SIG_VALTYPE_ 20 B : 2;
SIG_GROUP_ 20 Grp 1 : B;
SG_MUL_VAL_ 10 Speed Speed 1-1, 3-4;
"#;

    fn lines(text: &str) -> Vec<&str> {
        text.split(CRLF).filter(|l| !l.is_empty()).collect()
    }

    #[test]
    fn test_authored_render_keeps_order_and_spelling() {
        let db = from_str(SAMPLE).unwrap();
        let text = render(&db, &RenderPolicy::authored());
        let lines = lines(&text);

        assert_eq!(lines[0], "VERSION \"7\"");
        assert!(lines.contains(&"BU_: Zeta Alpha"));

        let first_bo = lines.iter().position(|l| l.starts_with("BO_ ")).unwrap();
        assert_eq!(lines[first_bo], "BO_ 20 Second: 8 Alpha");
        assert!(lines.contains(&" SG_ B : 8|8@1+ (1,0) [0|0] \"\"  Zeta"));
        assert!(lines.contains(
            &" SG_ Speed m1 : 0|16@0- (1.0E-3,-5) [-1.5|2E+2] \"km/h\"  Alpha,Zeta"
        ));
        assert!(lines.contains(&"CM_ BO_ 20 \"say \\\"hi\\\"\";"));
        assert!(lines.contains(&"BA_DEF_ BO_ \"GenMsgCycleTime\" INT 0 65535;"));
        assert!(lines.contains(&"BA_DEF_  \"Gain\" FLOAT 0 1.5;"));
        assert!(lines.contains(&"BA_DEF_DEF_  \"GenMsgCycleTime\" 0;"));
        assert!(lines.contains(&"BA_ \"GenMsgCycleTime\" BO_ 20 100;"));
        assert!(lines.contains(&"BA_ \"Gain\" 0.25;"));
        assert!(lines.contains(&"VAL_ 10 Speed 0 \"Off\" 2 \"Error\" 1 \"On\" ;"));
        assert!(lines.contains(&"SIG_VALTYPE_ 20 B : 2;"));

        let valtype = lines.iter().position(|l| l.starts_with("SIG_VALTYPE_")).unwrap();
        let group = lines.iter().position(|l| *l == "SIG_GROUP_ 20 Grp 1 : B;").unwrap();
        let mul = lines
            .iter()
            .position(|l| *l == "SG_MUL_VAL_ 10 Speed Speed 1-1, 3-4;")
            .unwrap();
        assert!(valtype < group && group < mul);
    }

    #[test]
    fn test_render_uses_supplied_orderings() {
        let db = from_str(SAMPLE).unwrap();
        let mut policy = RenderPolicy::authored();
        policy.orderings.nodes = |a, b| a.name.cmp(&b.name);
        policy.orderings.messages = |a, b| a.id.cmp(&b.id);
        policy.orderings.choices = |a, b| b.value.cmp(&a.value);
        policy.number = |d| format!("<{}>", d);

        let text = render(&db, &policy);
        let lines = lines(&text);

        assert!(lines.contains(&"BU_: Alpha Zeta"));
        let first_bo = lines.iter().position(|l| l.starts_with("BO_ ")).unwrap();
        assert_eq!(lines[first_bo], "BO_ 10 First: 4 Zeta");
        assert!(lines.contains(&"VAL_ 10 Speed 2 \"Error\" 1 \"On\" 0 \"Off\" ;"));
        assert!(lines.iter().any(|l| l.contains("(<1.0E-3>,<-5>)")));
    }

    #[test]
    fn test_render_round_trips_through_parser() {
        let db = from_str(SAMPLE).unwrap();
        let text = render(&db, &RenderPolicy::authored());
        let reparsed = from_str(&text).unwrap();
        assert_eq!(reparsed, db);
    }

    #[test]
    fn test_empty_database() {
        let text = render(&Database::default(), &RenderPolicy::authored());
        assert!(text.starts_with("VERSION \"\"\r\n"));
        assert!(text.contains("BU_:\r\n"));
        assert!(!text.contains("BO_ "));
    }
}
