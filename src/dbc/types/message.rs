use crate::dbc::types::{attributes::AttributeValues, signal::Signal};

/// Bit 31 of a DBC message ID marks an extended (29-bit) frame.
pub const EXTENDED_ID_FLAG: u32 = 0x8000_0000;

/// CAN message defined in the database (`BO_`).
#[derive(Default, Clone, PartialEq, Debug)]
pub struct Message {
    /// Message ID exactly as written in the DBC (extended flag included).
    pub id: u32,
    /// Message name.
    pub name: String,
    /// Payload length in bytes.
    pub byte_length: u32,
    /// Transmitting nodes: the `BO_` sender first, then any extra `BO_TX_BU_` senders.
    pub senders: Vec<String>,
    /// Signals, in authored order.
    pub signals: Vec<Signal>,
    /// Associated comment (`CM_ BO_`).
    pub comment: Option<String>,
    /// Signal groups (`SIG_GROUP_`), in authored order.
    pub signal_groups: Vec<SignalGroup>,
    /// Extended multiplexing entries (`SG_MUL_VAL_`), in authored order.
    pub extended_mux: Vec<ExtendedMux>,

    // --- Message Attribute Entry ---
    pub attributes: AttributeValues,
}

/// Named set of signals of one message (`SIG_GROUP_`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignalGroup {
    pub name: String,
    pub repetitions: u32,
    /// Member signal names, in authored order.
    pub signals: Vec<String>,
}

/// Extended multiplexing (`SG_MUL_VAL_`): `signal` is present while the switch
/// signal `switch` holds a value inside one of `ranges` (inclusive bounds).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtendedMux {
    pub signal: String,
    pub switch: String,
    pub ranges: Vec<(u64, u64)>,
}

impl Message {
    pub fn is_extended(&self) -> bool {
        self.id & EXTENDED_ID_FLAG != 0
    }

    /// CAN identifier without the extended-frame flag.
    pub fn frame_id(&self) -> u32 {
        self.id & !EXTENDED_ID_FLAG
    }

    pub fn signal(&self, name: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.name == name)
    }

    pub fn signal_mut(&mut self, name: &str) -> Option<&mut Signal> {
        self.signals.iter_mut().find(|s| s.name == name)
    }

    /// Adds a signal group, replacing any group of the same name.
    pub fn set_signal_group(&mut self, group: SignalGroup) {
        match self.signal_groups.iter_mut().find(|g| g.name == group.name) {
            Some(existing) => *existing = group,
            None => self.signal_groups.push(group),
        }
    }

    /// Adds an extended multiplexing entry, replacing the one for the same signal and switch.
    pub fn set_extended_mux(&mut self, entry: ExtendedMux) {
        match self
            .extended_mux
            .iter_mut()
            .find(|e| e.signal == entry.signal && e.switch == entry.switch)
        {
            Some(existing) => *existing = entry,
            None => self.extended_mux.push(entry),
        }
    }

    /// Adds a transmitter unless it is already listed.
    pub fn add_sender(&mut self, name: &str) {
        if !self.senders.iter().any(|s| s == name) {
            self.senders.push(name.to_string());
        }
    }
}
