use crate::dbc::types::decimal::Decimal;

/// The type of object an attribute definition applies to.
///
/// `Database` is the definition without an object-kind tag (`BA_DEF_ "Name" ...`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AttrObject {
    #[default]
    Database,
    Node,
    Message,
    Signal,
    EnvironmentVariable,
}

impl AttrObject {
    /// DBC object-kind tag, `None` for database-wide definitions.
    pub fn tag(self) -> Option<&'static str> {
        match self {
            AttrObject::Database => None,
            AttrObject::Node => Some("BU_"),
            AttrObject::Message => Some("BO_"),
            AttrObject::Signal => Some("SG_"),
            AttrObject::EnvironmentVariable => Some("EV_"),
        }
    }

    pub fn from_tag(tag: &str) -> Option<AttrObject> {
        match tag {
            "BU_" => Some(AttrObject::Node),
            "BO_" => Some(AttrObject::Message),
            "SG_" => Some(AttrObject::Signal),
            "EV_" => Some(AttrObject::EnvironmentVariable),
            _ => None,
        }
    }
}

/// Value type declared by a `BA_DEF_` line.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrType {
    Int { min: i64, max: i64 },
    Hex { min: i64, max: i64 },
    Float { min: Decimal, max: Decimal },
    String,
    Enum(Vec<String>),
}

/// Concrete attribute value, as assigned by `BA_` or `BA_DEF_DEF_`.
///
/// Enum values are stored as written: an index (`Int`) or a quoted label (`Str`).
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Str(String),
    Int(i64),
    Float(Decimal),
}

impl AttributeValue {
    /// Interprets an unquoted value token.
    pub fn from_number_token(token: &str) -> Option<AttributeValue> {
        if let Ok(v) = token.parse::<i64>() {
            return Some(AttributeValue::Int(v));
        }
        token.parse::<Decimal>().ok().map(AttributeValue::Float)
    }
}

/// A `BA_DEF_` definition plus its optional `BA_DEF_DEF_` default.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeDefinition {
    /// Attribute name.
    pub name: String,
    /// Object kind the attribute applies to.
    pub object: AttrObject,
    /// Value type and range.
    pub kind: AttrType,
    /// Default value from `BA_DEF_DEF_`.
    pub default: Option<AttributeValue>,
}

/// Attribute definitions keyed by name, in the order they were declared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeDefinitions {
    entries: Vec<AttributeDefinition>,
}

impl AttributeDefinitions {
    /// Inserts a definition, replacing (in place) any definition with the same name.
    pub fn insert(&mut self, def: AttributeDefinition) {
        match self.entries.iter_mut().find(|d| d.name == def.name) {
            Some(existing) => *existing = def,
            None => self.entries.push(def),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeDefinition> {
        let idx: usize = self.entries.iter().position(|d| d.name == name)?;
        Some(self.entries.remove(idx))
    }

    pub fn get(&self, name: &str) -> Option<&AttributeDefinition> {
        self.entries.iter().find(|d| d.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AttributeDefinition> {
        self.entries.iter_mut().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Attribute values assigned to one target (database, node, message or signal).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeValues {
    entries: Vec<(String, AttributeValue)>,
}

impl AttributeValues {
    /// Assigns `value` to `name`; a repeated assignment overrides the previous one.
    pub fn set(&mut self, name: &str, value: AttributeValue) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        let idx: usize = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
