//! Database model.
//!
//! In-memory form of a DBC file. Entities are stored in plain vectors in the order the
//! parser met them; nothing here sorts. Emission order is decided at render time by the
//! [`Orderings`](crate::dbc::render::Orderings) passed to the renderer.

use crate::dbc::types::{
    attributes::{AttributeDefinitions, AttributeValues},
    message::Message,
    node::Node,
    signal::{Signal, ValueTable},
};

/// In-memory representation of a CAN database (DBC).
#[derive(Default, Clone, Debug, PartialEq)]
pub struct Database {
    // --- General information ---
    /// `VERSION` string.
    pub version: String,
    /// Bus-level comment (`CM_ "..."`).
    pub comment: Option<String>,

    // --- Main storage ---
    pub nodes: Vec<Node>,
    pub value_tables: Vec<ValueTable>,
    pub messages: Vec<Message>,

    // --- Attributes ---
    /// `BA_DEF_` definitions keyed by name, with their `BA_DEF_DEF_` defaults.
    pub attribute_definitions: AttributeDefinitions,
    /// Database-level `BA_` assignments.
    pub attributes: AttributeValues,

    // Parsing state: index of the last message seen (used by the SG_ decoder)
    pub(crate) current_msg: Option<usize>,
}

impl Database {
    // --------- Nodes --------
    /// Adds a node if no node with that name exists yet.
    ///
    /// Returns `false` when the node was already present.
    pub fn add_node_if_absent(&mut self, name: &str) -> bool {
        if self.node(name).is_some() {
            return false;
        }
        self.nodes.push(Node::new(name));
        true
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.name == name)
    }

    // ------------- Messages ------------
    /// Adds a message and makes it the target of subsequent `SG_` lines.
    ///
    /// A message whose ID is already known is not added again: the existing one becomes
    /// current, so its signals keep accumulating there.
    pub(crate) fn add_message(&mut self, msg: Message) -> usize {
        let idx: usize = match self.messages.iter().position(|m| m.id == msg.id) {
            Some(idx) => idx,
            None => {
                self.messages.push(msg);
                self.messages.len() - 1
            }
        };
        self.current_msg = Some(idx);
        idx
    }

    /// Returns the message with the given DBC ID.
    pub fn message(&self, id: u32) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn message_mut(&mut self, id: u32) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    pub(crate) fn current_message_mut(&mut self) -> Option<&mut Message> {
        let idx: usize = self.current_msg?;
        self.messages.get_mut(idx)
    }

    // -------------- Signals ------------
    /// Returns the signal `name` of message `id`.
    pub fn signal(&self, id: u32, name: &str) -> Option<&Signal> {
        self.message(id)?.signal(name)
    }

    pub fn signal_mut(&mut self, id: u32, name: &str) -> Option<&mut Signal> {
        self.message_mut(id)?.signal_mut(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_unique() {
        let mut db = Database::default();
        assert!(db.add_node_if_absent("Motor"));
        assert!(db.add_node_if_absent("Gateway"));
        assert!(!db.add_node_if_absent("Motor"));
        assert_eq!(db.nodes.len(), 2);
        assert!(db.node("Gateway").is_some());
        assert!(db.node("gateway").is_none());
    }

    #[test]
    fn test_duplicate_message_id_merges() {
        let mut db = Database::default();
        let first = db.add_message(Message {
            id: 100,
            name: "A".into(),
            ..Default::default()
        });
        db.add_message(Message {
            id: 200,
            name: "B".into(),
            ..Default::default()
        });
        let again = db.add_message(Message {
            id: 100,
            name: "A2".into(),
            ..Default::default()
        });

        assert_eq!(first, again);
        assert_eq!(db.messages.len(), 2);
        assert_eq!(db.current_message_mut().unwrap().name, "A");
    }

    #[test]
    fn test_signal_lookup() {
        let mut db = Database::default();
        db.add_message(Message {
            id: 5,
            signals: vec![Signal {
                name: "Speed".into(),
                ..Default::default()
            }],
            ..Default::default()
        });
        assert!(db.signal(5, "Speed").is_some());
        assert!(db.signal(5, "Torque").is_none());
        assert!(db.signal(6, "Speed").is_none());
    }
}
