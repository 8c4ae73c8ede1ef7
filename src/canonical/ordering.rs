//! Canonical emission order for every record kind.
//!
//! Every comparator is a total order: ties on the primary key are broken by secondary
//! keys so the result never depends on the order records were parsed in. Name
//! comparisons go through [`natural_cmp`].

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::warn;

use crate::canonical::collate::natural_cmp;
use crate::dbc::render::{AttributeRecord, AttributeTarget, Orderings};
use crate::dbc::types::{
    attributes::{AttrObject, AttributeDefinition},
    message::{ExtendedMux, Message, SignalGroup},
    node::Node,
    signal::{Signal, ValueChoice, ValueTable},
};

/// The full set of canonical comparators.
pub fn canonical() -> Orderings {
    Orderings {
        nodes,
        messages,
        senders,
        signals: signals_in_message,
        attribute_signals: signals_by_name,
        attribute_definitions,
        attribute_defaults: attribute_default_lines,
        comments: comment_lines,
        attributes: attribute_assignments,
        choices: choices_descending,
        value_tables,
        signal_groups,
        extended_mux,
    }
}

pub fn nodes(a: &Node, b: &Node) -> Ordering {
    natural_cmp(&a.name, &b.name)
}

/// Frame ID ascending; a standard frame sorts before an extended frame of the same ID.
pub fn messages(a: &Message, b: &Message) -> Ordering {
    a.frame_id()
        .cmp(&b.frame_id())
        .then_with(|| a.is_extended().cmp(&b.is_extended()))
}

/// Layout of the `SG_` lines of one message.
///
/// Unmultiplexed signals and the multiplexor come first, then one block per
/// multiplexer value. Blocks are ranked by their lowest linearised start bit, then by
/// the value itself. Inside a block signals follow linearised start bit, then name.
pub fn signals_in_message(msg: &Message) -> Vec<&Signal> {
    let mut block_start: BTreeMap<u32, u32> = BTreeMap::new();
    for sig in &msg.signals {
        if let Some(value) = sig.mux.selector() {
            let start: &mut u32 = block_start.entry(value).or_insert(u32::MAX);
            *start = (*start).min(sig.linear_start_bit());
        }
    }
    let block = |sig: &Signal| -> Option<(u32, u32)> {
        let value: u32 = sig.mux.selector()?;
        Some((block_start.get(&value).copied().unwrap_or(0), value))
    };

    let mut signals: Vec<&Signal> = msg.signals.iter().collect();
    signals.sort_by(|a, b| {
        block(*a)
            .cmp(&block(*b))
            .then_with(|| a.linear_start_bit().cmp(&b.linear_start_bit()))
            .then_with(|| natural_cmp(&a.name, &b.name))
    });
    signals
}

/// Transmitter names in natural order; the `BO_` line keeps its own transmitter.
pub fn senders(a: &str, b: &str) -> Ordering {
    natural_cmp(a, b)
}

pub fn signals_by_name(a: &Signal, b: &Signal) -> Ordering {
    natural_cmp(&a.name, &b.name)
}

/// Definitions without an object kind first, then grouped by kind tag.
pub fn attribute_definitions(a: &AttributeDefinition, b: &AttributeDefinition) -> Ordering {
    let group = |d: &AttributeDefinition| match d.object {
        AttrObject::Database => None,
        other => other.tag(),
    };
    group(a)
        .cmp(&group(b))
        .then_with(|| natural_cmp(&a.name, &b.name))
}

/// Case-insensitive on the rendered `BA_DEF_DEF_` line.
pub fn attribute_default_lines(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum CommentGroup {
    Bus,
    Node,
    Message,
    Signal,
    Other,
}

fn comment_group(line: &str) -> CommentGroup {
    // CM_ <tag> ...
    let tag: &str = line.split(' ').nth(1).unwrap_or("");
    if tag.starts_with('"') {
        return CommentGroup::Bus;
    }
    match tag {
        "BU_" => CommentGroup::Node,
        "BO_" => CommentGroup::Message,
        "SG_" => CommentGroup::Signal,
        _ => {
            warn!(tag, "unrecognised comment target");
            CommentGroup::Other
        }
    }
}

/// Grouped bus, node, message, signal, other; natural order of the line within a group.
pub fn comment_lines(a: &str, b: &str) -> Ordering {
    comment_group(a)
        .cmp(&comment_group(b))
        .then_with(|| natural_cmp(a, b))
}

fn target_rank(target: &AttributeTarget<'_>) -> u8 {
    match target {
        AttributeTarget::Database => 0,
        AttributeTarget::Node(_) => 1,
        AttributeTarget::Message(_) => 2,
        AttributeTarget::Signal(..) => 3,
    }
}

/// Grouped database, node, message, signal; then attribute name, then the target.
pub fn attribute_assignments(a: &AttributeRecord<'_>, b: &AttributeRecord<'_>) -> Ordering {
    target_rank(&a.target)
        .cmp(&target_rank(&b.target))
        .then_with(|| natural_cmp(a.name, b.name))
        .then_with(|| match (&a.target, &b.target) {
            (AttributeTarget::Node(x), AttributeTarget::Node(y)) => nodes(x, y),
            (AttributeTarget::Message(x), AttributeTarget::Message(y)) => messages(x, y),
            (AttributeTarget::Signal(mx, sx), AttributeTarget::Signal(my, sy)) => {
                messages(mx, my).then_with(|| signals_by_name(sx, sy))
            }
            _ => Ordering::Equal,
        })
}

pub fn choices_descending(a: &ValueChoice, b: &ValueChoice) -> Ordering {
    b.value.cmp(&a.value)
}

pub fn value_tables(a: &ValueTable, b: &ValueTable) -> Ordering {
    natural_cmp(&a.name, &b.name)
}

pub fn signal_groups(a: &SignalGroup, b: &SignalGroup) -> Ordering {
    natural_cmp(&a.name, &b.name)
}

/// Multiplexed signal name, then switch name.
pub fn extended_mux(a: &ExtendedMux, b: &ExtendedMux) -> Ordering {
    natural_cmp(&a.signal, &b.signal).then_with(|| natural_cmp(&a.switch, &b.switch))
}
