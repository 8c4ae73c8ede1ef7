use crate::dbc::types::attributes::AttributeValues;

/// Node/ECU defined in the database (`BU_`).
#[derive(Default, Clone, PartialEq, Debug)]
pub struct Node {
    /// Node/ECU name.
    pub name: String,
    /// Associated comment (`CM_ BU_`).
    pub comment: Option<String>,

    // --- Attributes ---
    pub attributes: AttributeValues,
}

impl Node {
    pub fn new(name: &str) -> Node {
        Node {
            name: name.to_string(),
            ..Default::default()
        }
    }
}
