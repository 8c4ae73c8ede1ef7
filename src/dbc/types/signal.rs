use crate::dbc::types::{attributes::AttributeValues, decimal::Decimal};

/// Byte order of a signal (`@1` Intel, `@0` Motorola).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Endianness {
    #[default]
    Intel,
    Motorola,
}

/// Signedness of the raw value (`+` / `-`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Signess {
    #[default]
    Unsigned,
    Signed,
}

/// Raw value encoding declared by `SIG_VALTYPE_`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValueType {
    #[default]
    Integer,
    /// `SIG_VALTYPE_ ... : 1`
    IeeeFloat,
    /// `SIG_VALTYPE_ ... : 2`
    IeeeDouble,
}

impl ValueType {
    pub fn code(self) -> Option<u8> {
        match self {
            ValueType::Integer => None,
            ValueType::IeeeFloat => Some(1),
            ValueType::IeeeDouble => Some(2),
        }
    }

    pub fn from_code(code: u8) -> Option<ValueType> {
        match code {
            0 => Some(ValueType::Integer),
            1 => Some(ValueType::IeeeFloat),
            2 => Some(ValueType::IeeeDouble),
            _ => None,
        }
    }
}

/// What role (if any) a signal plays in multiplexing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MuxRole {
    /// Not multiplexed (always present).
    #[default]
    None,
    /// The multiplexer switch (`M`).
    Multiplexor,
    /// Present only when the switch equals the value (`mX`).
    Multiplexed(u32),
    /// Multiplexed by `X` and itself a switch for nested signals (`mXM`).
    MultiplexedMultiplexor(u32),
}

impl MuxRole {
    /// Switch value gating this signal, if it is multiplexed.
    pub fn selector(self) -> Option<u32> {
        match self {
            MuxRole::Multiplexed(v) | MuxRole::MultiplexedMultiplexor(v) => Some(v),
            MuxRole::None | MuxRole::Multiplexor => None,
        }
    }

    pub fn is_multiplexed(self) -> bool {
        self.selector().is_some()
    }

    /// Tag following the signal name in a `SG_` line (`""`, `"M"`, `"m3"`, `"m3M"`).
    pub fn tag(self) -> String {
        match self {
            MuxRole::None => String::new(),
            MuxRole::Multiplexor => "M".to_string(),
            MuxRole::Multiplexed(v) => format!("m{}", v),
            MuxRole::MultiplexedMultiplexor(v) => format!("m{}M", v),
        }
    }

    /// Parses a multiplexing tag; `None` when the token is not one.
    pub fn from_tag(tag: &str) -> Option<MuxRole> {
        if tag == "M" {
            return Some(MuxRole::Multiplexor);
        }
        let rest: &str = tag.strip_prefix('m')?;
        match rest.strip_suffix('M') {
            Some(v) => v.parse().ok().map(MuxRole::MultiplexedMultiplexor),
            None => rest.parse().ok().map(MuxRole::Multiplexed),
        }
    }
}

/// One raw value → description entry of a value table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueChoice {
    pub value: i64,
    pub description: String,
}

/// Adds or replaces the entry for `value`.
pub(crate) fn set_choice(choices: &mut Vec<ValueChoice>, value: i64, description: String) {
    match choices.iter_mut().find(|c| c.value == value) {
        Some(existing) => existing.description = description,
        None => choices.push(ValueChoice { value, description }),
    }
}

/// Named, database-level value table (`VAL_TABLE_`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueTable {
    pub name: String,
    pub choices: Vec<ValueChoice>,
}

/// Definition of a signal within a CAN message (`SG_`).
///
/// Describes position/bit-length, endianness, sign, scaling (factor/offset),
/// valid range, unit of measure, value table, and receiver nodes.
#[derive(Clone, PartialEq, Debug)]
pub struct Signal {
    /// Signal name.
    pub name: String,
    /// Start bit as written in the DBC.
    pub bit_start: u32,
    /// Bit length.
    pub bit_length: u32,
    /// Endianness.
    pub endian: Endianness,
    /// Sign.
    pub sign: Signess,
    /// Raw value encoding (`SIG_VALTYPE_`).
    pub value_type: ValueType,
    /// Scaling factor.
    pub factor: Decimal,
    /// Scaling offset.
    pub offset: Decimal,
    /// Minimum physical value.
    pub min: Decimal,
    /// Maximum physical value.
    pub max: Decimal,
    /// Unit of measure.
    pub unit: String,
    /// Receiver nodes, in authored order.
    pub receivers: Vec<String>,
    /// Multiplexing role.
    pub mux: MuxRole,
    /// Value-to-text mapping (`VAL_`), in authored order.
    pub choices: Vec<ValueChoice>,
    /// Associated comment (`CM_ SG_`).
    pub comment: Option<String>,

    // --- Signal Attribute Entry ---
    pub attributes: AttributeValues,
}

impl Default for Signal {
    fn default() -> Self {
        Signal {
            name: String::new(),
            bit_start: 0,
            bit_length: 1,
            endian: Endianness::default(),
            sign: Signess::default(),
            value_type: ValueType::default(),
            factor: Decimal::from(1),
            offset: Decimal::from(0),
            min: Decimal::from(0),
            max: Decimal::from(0),
            unit: String::new(),
            receivers: Vec::new(),
            mux: MuxRole::default(),
            choices: Vec::new(),
            comment: None,
            attributes: AttributeValues::default(),
        }
    }
}

impl Signal {
    /// Start bit on a linear (LSB-first) bit axis.
    ///
    /// Motorola start bits count MSB-first inside each byte; they are mirrored within
    /// their byte so that signals of both byte orders sort on the same axis.
    pub fn linear_start_bit(&self) -> u32 {
        match self.endian {
            Endianness::Intel => self.bit_start,
            Endianness::Motorola => 8 * (self.bit_start / 8) + (7 - self.bit_start % 8),
        }
    }
}
