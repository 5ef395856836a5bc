//! Register catalog for the D-300 controller family.
//!
//! Single source of truth for the device register map: every named quantity
//! is one `RegisterDef` constant consumed by the generic decode path in the
//! controller. Addresses, widths and scale divisors come from the device
//! documentation and are bit-exact; 32-bit quantities are two consecutive
//! words, high word first.

use core::ops::RangeInclusive;

/// Width of a catalogued quantity on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterWidth {
    /// One 16-bit holding register.
    Word,
    /// Two consecutive registers, big-endian word order.
    DoubleWord,
}

/// Immutable descriptor of one named telemetry quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDef {
    pub address: u16,
    pub width: RegisterWidth,
    /// Integer divisor applied after word assembly. Never zero.
    pub scale: u16,
}

impl RegisterDef {
    pub const fn word(address: u16, scale: u16) -> Self {
        Self {
            address,
            width: RegisterWidth::Word,
            scale,
        }
    }

    pub const fn double(address: u16, scale: u16) -> Self {
        Self {
            address,
            width: RegisterWidth::DoubleWord,
            scale,
        }
    }

    /// Number of 16-bit words occupied on the bus.
    pub const fn word_count(&self) -> u16 {
        match self.width {
            RegisterWidth::Word => 1,
            RegisterWidth::DoubleWord => 2,
        }
    }
}

/// Electrical quantities, per source (mains / generator).
pub mod electrical {
    use super::RegisterDef;

    pub const MAINS_L1_VOLTAGE: RegisterDef = RegisterDef::double(10240, 10);
    pub const MAINS_L2_VOLTAGE: RegisterDef = RegisterDef::double(10242, 10);
    pub const MAINS_L3_VOLTAGE: RegisterDef = RegisterDef::double(10244, 10);
    pub const GEN_L1_VOLTAGE: RegisterDef = RegisterDef::double(10246, 10);
    pub const GEN_L2_VOLTAGE: RegisterDef = RegisterDef::double(10248, 10);
    pub const GEN_L3_VOLTAGE: RegisterDef = RegisterDef::double(10250, 10);

    pub const MAINS_L1_L2_VOLTAGE: RegisterDef = RegisterDef::double(10252, 10);
    pub const MAINS_L2_L3_VOLTAGE: RegisterDef = RegisterDef::double(10254, 10);
    pub const MAINS_L3_L1_VOLTAGE: RegisterDef = RegisterDef::double(10256, 10);
    pub const GEN_L1_L2_VOLTAGE: RegisterDef = RegisterDef::double(10258, 10);
    pub const GEN_L2_L3_VOLTAGE: RegisterDef = RegisterDef::double(10260, 10);
    pub const GEN_L3_L1_VOLTAGE: RegisterDef = RegisterDef::double(10262, 10);

    pub const MAINS_L1_CURRENT: RegisterDef = RegisterDef::double(10264, 10);
    pub const MAINS_L2_CURRENT: RegisterDef = RegisterDef::double(10266, 10);
    pub const MAINS_L3_CURRENT: RegisterDef = RegisterDef::double(10268, 10);
    pub const GEN_L1_CURRENT: RegisterDef = RegisterDef::double(10270, 10);
    pub const GEN_L2_CURRENT: RegisterDef = RegisterDef::double(10272, 10);
    pub const GEN_L3_CURRENT: RegisterDef = RegisterDef::double(10274, 10);
    pub const MAINS_NEUTRAL_CURRENT: RegisterDef = RegisterDef::double(10276, 10);
    pub const GEN_NEUTRAL_CURRENT: RegisterDef = RegisterDef::double(10278, 10);

    pub const MAINS_TOTAL_ACTIVE_POWER: RegisterDef = RegisterDef::double(10292, 10);
    pub const GEN_TOTAL_ACTIVE_POWER: RegisterDef = RegisterDef::double(10294, 10);
    pub const MAINS_TOTAL_REACTIVE_POWER: RegisterDef = RegisterDef::double(10308, 10);
    pub const GEN_TOTAL_REACTIVE_POWER: RegisterDef = RegisterDef::double(10310, 10);
    pub const MAINS_TOTAL_APPARENT_POWER: RegisterDef = RegisterDef::double(10324, 10);
    pub const GEN_TOTAL_APPARENT_POWER: RegisterDef = RegisterDef::double(10326, 10);

    pub const MAINS_POWER_FACTOR: RegisterDef = RegisterDef::word(10334, 10);
    pub const GEN_POWER_FACTOR: RegisterDef = RegisterDef::word(10335, 10);

    pub const MAINS_FREQUENCY: RegisterDef = RegisterDef::word(10338, 100);
    pub const GEN_FREQUENCY: RegisterDef = RegisterDef::word(10339, 100);

    pub const GEN_AVG_VOLTAGE: RegisterDef = RegisterDef::double(10377, 10);
    pub const GEN_AVG_CURRENT: RegisterDef = RegisterDef::double(10379, 10);
    pub const MAINS_AVG_VOLTAGE: RegisterDef = RegisterDef::double(10381, 10);
    pub const MAINS_AVG_CURRENT: RegisterDef = RegisterDef::double(10383, 10);
}

/// Engine and DC-side quantities.
pub mod engine {
    use super::RegisterDef;

    pub const RPM: RegisterDef = RegisterDef::word(10376, 1);
    pub const COOLANT_TEMP: RegisterDef = RegisterDef::word(10362, 10);
    pub const OIL_PRESSURE: RegisterDef = RegisterDef::word(10361, 10);
    pub const FUEL_LEVEL: RegisterDef = RegisterDef::word(10363, 10);
    pub const OIL_TEMP: RegisterDef = RegisterDef::word(10364, 10);
    pub const CANOPY_TEMP: RegisterDef = RegisterDef::word(10365, 10);
    pub const AMBIENT_TEMP: RegisterDef = RegisterDef::word(10366, 10);
    pub const BATTERY_VOLTAGE: RegisterDef = RegisterDef::word(10341, 100);
    pub const MIN_BATTERY_VOLTAGE: RegisterDef = RegisterDef::word(10385, 100);
    pub const CHARGE_VOLTAGE: RegisterDef = RegisterDef::word(10340, 100);
    pub const CHARGE_CURRENT: RegisterDef = RegisterDef::word(11173, 10);
}

/// System status block.
pub mod status {
    use super::RegisterDef;

    pub const OPERATING_STATE: RegisterDef = RegisterDef::word(10604, 1);
    pub const OPERATING_MODE: RegisterDef = RegisterDef::word(10605, 1);
    pub const OPERATION_TIMER: RegisterDef = RegisterDef::word(10606, 1);
    pub const GOVERNOR_OUTPUT: RegisterDef = RegisterDef::word(10607, 10);
    pub const AVR_OUTPUT: RegisterDef = RegisterDef::word(10608, 10);
    pub const DEVICE_IDENTITY: RegisterDef = RegisterDef::word(10609, 1);
    pub const HARDWARE_VERSION: RegisterDef = RegisterDef::word(10610, 1);
    pub const SOFTWARE_VERSION: RegisterDef = RegisterDef::word(10611, 1);
}

/// Lifetime counters and energy accumulators.
pub mod counters {
    use super::RegisterDef;

    pub const RUN_COUNT: RegisterDef = RegisterDef::double(10616, 1);
    pub const CRANK_COUNT: RegisterDef = RegisterDef::double(10618, 1);
    pub const LOADED_RUN_COUNT: RegisterDef = RegisterDef::double(10620, 1);
    pub const ENGINE_HOURS: RegisterDef = RegisterDef::double(10622, 100);
    pub const HOURS_SINCE_SERVICE: RegisterDef = RegisterDef::double(10624, 100);
    pub const DAYS_SINCE_SERVICE: RegisterDef = RegisterDef::double(10626, 100);
    pub const TOTAL_ACTIVE_ENERGY: RegisterDef = RegisterDef::double(10628, 10);
    pub const REACTIVE_ENERGY_INDUCTIVE: RegisterDef = RegisterDef::double(10630, 10);
    pub const REACTIVE_ENERGY_CAPACITIVE: RegisterDef = RegisterDef::double(10632, 10);
    pub const FUEL_COUNTER: RegisterDef = RegisterDef::double(11577, 10);
    pub const FLOW_METER: RegisterDef = RegisterDef::double(11680, 10);
}

/// Harmonic analysis block for the currently selected measurement channel.
pub mod harmonics {
    use super::RegisterDef;

    pub const THD: RegisterDef = RegisterDef::word(10386, 100);
    pub const FUNDAMENTAL: RegisterDef = RegisterDef::word(10387, 100);
    pub const H3: RegisterDef = RegisterDef::word(10388, 100);
    pub const H5: RegisterDef = RegisterDef::word(10389, 100);
    pub const H7: RegisterDef = RegisterDef::word(10390, 100);
    pub const H9: RegisterDef = RegisterDef::word(10391, 100);
    pub const H11: RegisterDef = RegisterDef::word(10392, 100);
    pub const H13: RegisterDef = RegisterDef::word(10393, 100);
    pub const CHANNEL_SELECT: RegisterDef = RegisterDef::word(10403, 1);
}

/// GPS fix, exported by the device as raw IEEE-754 bit patterns.
pub mod gps {
    use super::RegisterDef;

    pub const LATITUDE: RegisterDef = RegisterDef::double(10594, 1);
    pub const LONGITUDE: RegisterDef = RegisterDef::double(10596, 1);
    pub const ALTITUDE: RegisterDef = RegisterDef::double(10598, 1);
}

/// Communications diagnostics block.
pub mod comms {
    use super::RegisterDef;

    pub const ETHERNET_RESET_COUNT: RegisterDef = RegisterDef::word(11682, 1);
    pub const TCP_PACKET_COUNT: RegisterDef = RegisterDef::word(11683, 1);
    pub const GPRS_IP: RegisterDef = RegisterDef::double(10646, 1);
    /// MAC address, 48 bits across three registers, big-endian bytes.
    pub const MAC_BASE: u16 = 11684;
    pub const MAC_WORDS: u16 = 3;
}

/// On-board analog input channels (six resistance senders + two raw values).
pub mod analog {
    pub const ANALOG_CHANNEL_BASE: u16 = 10345;
    pub const ANALOG_CHANNEL_COUNT: usize = 8;
}

/// Alarm class derived from a contiguous scan range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmClass {
    Shutdown,
    LoadDump,
    Warning,
}

/// The three disjoint alarm-scan ranges, in scan order. Each register in a
/// range holds a bitfield of active alarms of that class; any non-zero word
/// raises the class flag.
pub const ALARM_SCAN_TABLE: [(AlarmClass, RangeInclusive<u16>); 3] = [
    (AlarmClass::Shutdown, 10504..=10519),
    (AlarmClass::LoadDump, 10520..=10535),
    (AlarmClass::Warning, 10536..=10551),
];

/// Front-panel button bits accepted by the button register. Values may be
/// OR'd; the high bits are press-duration modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum PanelButton {
    Stop = 0x0001,
    ManualRun = 0x0002,
    Auto = 0x0004,
    Test = 0x0008,
    Run = 0x0010,
    GenBreaker = 0x0020,
    MainsBreaker = 0x0040,
    MenuPlus = 0x0080,
    MenuMinus = 0x0100,
    Up = 0x0200,
    Down = 0x0400,
    LongPress = 0x4000,
    VeryLongPress = 0x8000,
}

impl PanelButton {
    pub const fn mask(self) -> u16 {
        self as u16
    }
}

/// Button / intent register address.
pub const BUTTON_REGISTER: u16 = 8193;

/// Writable harmonic channel-select register (read back through
/// [`harmonics::CHANNEL_SELECT`]).
pub const HARMONIC_CHANNEL_REGISTER: u16 = 8194;

/// Unit-reset register and its magic value.
pub const RESET_REGISTER: u16 = 8210;
pub const RESET_MAGIC: u16 = 14536;

/// Identity codes accepted from the device-identity register. Any other
/// value, even when read successfully, means the responding unit is not a
/// controller of the expected family.
pub const ACCEPTED_IDENTITY_CODES: [u16; 3] = [0xD300, 0xD500, 0xD700];

/// Valid unit (slave) address range on the shared bus.
pub const UNIT_ADDRESS_RANGE: RangeInclusive<u8> = 1..=240;
