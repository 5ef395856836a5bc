//! Domain snapshot types.
//!
//! The snapshot tree is owned by the controller and mutated only by its
//! acquisition pass; consumers get `&`-views. A failed register read leaves
//! the previous field value in place (last-known-good), so the structures
//! are always structurally valid even on a degraded link.

use serde::Serialize;

/// Enumerated run state of the unit, in the device's fixed total order.
/// Raw codes outside the documented table map to `Unknown` instead of being
/// cast blindly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperatingState {
    EngineAtRest,
    PreFuelDelay,
    EnginePreheat,
    OilFlashDelay,
    CrankRest,
    Cranking,
    IdleSpeed,
    EngineWarmup,
    RunningOffLoad,
    SynchronizingToBusbar,
    LoadTransferToGenerator,
    GenBreakerActivation,
    GenBreakerTimer,
    MasterUnitLoaded,
    PeakLopping,
    PowerExporting,
    SecondaryUnitLoaded,
    SynchronizingToMains,
    LoadTransferToMains,
    MainsBreakerActivation,
    MainsBreakerTimer,
    CooldownStop,
    CoolingDown,
    EngineStopIdle,
    EmergencyStop,
    EngineStopping,
    Unknown(u16),
}

/// Inclusive run-range of the state table: the unit counts as "running" from
/// idle speed up through a loaded secondary unit. Domain constant from the
/// device's documented state table.
const RUN_RANGE: core::ops::RangeInclusive<u16> = 6..=16;

impl OperatingState {
    pub fn from_raw(code: u16) -> Self {
        match code {
            0 => Self::EngineAtRest,
            1 => Self::PreFuelDelay,
            2 => Self::EnginePreheat,
            3 => Self::OilFlashDelay,
            4 => Self::CrankRest,
            5 => Self::Cranking,
            6 => Self::IdleSpeed,
            7 => Self::EngineWarmup,
            8 => Self::RunningOffLoad,
            9 => Self::SynchronizingToBusbar,
            10 => Self::LoadTransferToGenerator,
            11 => Self::GenBreakerActivation,
            12 => Self::GenBreakerTimer,
            13 => Self::MasterUnitLoaded,
            14 => Self::PeakLopping,
            15 => Self::PowerExporting,
            16 => Self::SecondaryUnitLoaded,
            17 => Self::SynchronizingToMains,
            18 => Self::LoadTransferToMains,
            19 => Self::MainsBreakerActivation,
            20 => Self::MainsBreakerTimer,
            21 => Self::CooldownStop,
            22 => Self::CoolingDown,
            23 => Self::EngineStopIdle,
            24 => Self::EmergencyStop,
            25 => Self::EngineStopping,
            other => Self::Unknown(other),
        }
    }

    /// The raw code this state was decoded from.
    pub fn code(&self) -> u16 {
        match *self {
            Self::EngineAtRest => 0,
            Self::PreFuelDelay => 1,
            Self::EnginePreheat => 2,
            Self::OilFlashDelay => 3,
            Self::CrankRest => 4,
            Self::Cranking => 5,
            Self::IdleSpeed => 6,
            Self::EngineWarmup => 7,
            Self::RunningOffLoad => 8,
            Self::SynchronizingToBusbar => 9,
            Self::LoadTransferToGenerator => 10,
            Self::GenBreakerActivation => 11,
            Self::GenBreakerTimer => 12,
            Self::MasterUnitLoaded => 13,
            Self::PeakLopping => 14,
            Self::PowerExporting => 15,
            Self::SecondaryUnitLoaded => 16,
            Self::SynchronizingToMains => 17,
            Self::LoadTransferToMains => 18,
            Self::MainsBreakerActivation => 19,
            Self::MainsBreakerTimer => 20,
            Self::CooldownStop => 21,
            Self::CoolingDown => 22,
            Self::EngineStopIdle => 23,
            Self::EmergencyStop => 24,
            Self::EngineStopping => 25,
            Self::Unknown(code) => code,
        }
    }

    /// True when the state lies within the running sub-range of the table.
    pub fn is_running(&self) -> bool {
        RUN_RANGE.contains(&self.code()) && !matches!(self, Self::Unknown(_))
    }
}

/// Front-panel mode selection. Raw codes are one-hot on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperatingMode {
    Stop,
    Manual,
    Auto,
    Test,
    Unknown(u16),
}

impl OperatingMode {
    pub fn from_raw(code: u16) -> Self {
        match code {
            1 => Self::Stop,
            2 => Self::Manual,
            4 => Self::Auto,
            8 => Self::Test,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> u16 {
        match *self {
            Self::Stop => 1,
            Self::Manual => 2,
            Self::Auto => 4,
            Self::Test => 8,
            Self::Unknown(code) => code,
        }
    }
}

/// Per-phase electrical readings for one source. Power quantities exist only
/// as source totals on the device, so none appear here.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PhaseReadings {
    pub voltage: f32,
    pub current: f32,
}

/// Aggregate quantities for one source.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SourceTotals {
    pub active_power: f32,
    pub reactive_power: f32,
    pub apparent_power: f32,
    pub power_factor: f32,
    pub average_voltage: f32,
    pub average_current: f32,
}

/// Complete electrical picture of one source (mains or generator).
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SourceReadings {
    pub l1: PhaseReadings,
    pub l2: PhaseReadings,
    pub l3: PhaseReadings,
    pub totals: SourceTotals,
    pub frequency: f32,
    pub l1_l2_voltage: f32,
    pub l2_l3_voltage: f32,
    pub l3_l1_voltage: f32,
    pub neutral_current: f32,
}

/// Both measured sources.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ElectricalSnapshot {
    pub mains: SourceReadings,
    pub generator: SourceReadings,
}

/// Engine and DC-side quantities.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EngineSnapshot {
    pub rpm: f32,
    pub coolant_temp: f32,
    pub oil_pressure: f32,
    pub fuel_level: f32,
    /// Level from the auxiliary resistive sender, −1.0 when unreadable.
    pub external_fuel_level: f32,
    pub oil_temp: f32,
    pub canopy_temp: f32,
    pub ambient_temp: f32,
    pub battery_voltage: f32,
    pub min_battery_voltage: f32,
    pub charge_voltage: f32,
    pub charge_current: f32,
}

/// Operational status block; alarm flags are recomputed wholesale on every
/// core pass, never incrementally.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SystemStatus {
    pub state: OperatingState,
    pub mode: OperatingMode,
    pub operation_timer: u16,
    pub governor_output: f32,
    pub avr_output: f32,
    pub shutdown_alarm: bool,
    pub load_dump_alarm: bool,
    pub warning_alarm: bool,
    pub device_identity: u16,
    pub hardware_version: u16,
    pub software_version: u16,
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self {
            state: OperatingState::EngineAtRest,
            mode: OperatingMode::Stop,
            operation_timer: 0,
            governor_output: 0.0,
            avr_output: 0.0,
            shutdown_alarm: false,
            load_dump_alarm: false,
            warning_alarm: false,
            device_identity: 0,
            hardware_version: 0,
            software_version: 0,
        }
    }
}

impl SystemStatus {
    pub fn any_alarm(&self) -> bool {
        self.shutdown_alarm || self.load_dump_alarm || self.warning_alarm
    }
}

/// Lifetime counters, refreshed by the extended pass only.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RunCounters {
    pub run_count: u32,
    pub crank_count: u32,
    pub loaded_run_count: u32,
    pub engine_hours: f32,
    pub hours_since_service: f32,
    pub days_since_service: f32,
    pub total_active_energy: f32,
    pub reactive_energy_inductive: f32,
    pub reactive_energy_capacitive: f32,
    pub fuel_counter: f32,
    pub flow_meter: f32,
}

/// Raw on-board analog channels, refreshed by the extended pass.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct AnalogInputs {
    pub channels: [u16; crate::registers::analog::ANALOG_CHANNEL_COUNT],
}

/// Measurement point the harmonic analyzer is pointed at, in the device's
/// fixed channel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarmonicChannel {
    MainsL1Voltage,
    MainsL2Voltage,
    MainsL3Voltage,
    GenL1Voltage,
    GenL2Voltage,
    GenL3Voltage,
    MainsL1L2Voltage,
    MainsL2L3Voltage,
    MainsL3L1Voltage,
    GenL1L2Voltage,
    GenL2L3Voltage,
    GenL3L1Voltage,
    MainsL1Current,
    MainsL2Current,
    MainsL3Current,
    GenL1Current,
    GenL2Current,
    GenL3Current,
    MainsNeutralCurrent,
    GenNeutralCurrent,
    Unknown(u16),
}

impl HarmonicChannel {
    pub fn from_raw(code: u16) -> Self {
        match code {
            0 => Self::MainsL1Voltage,
            1 => Self::MainsL2Voltage,
            2 => Self::MainsL3Voltage,
            3 => Self::GenL1Voltage,
            4 => Self::GenL2Voltage,
            5 => Self::GenL3Voltage,
            6 => Self::MainsL1L2Voltage,
            7 => Self::MainsL2L3Voltage,
            8 => Self::MainsL3L1Voltage,
            9 => Self::GenL1L2Voltage,
            10 => Self::GenL2L3Voltage,
            11 => Self::GenL3L1Voltage,
            12 => Self::MainsL1Current,
            13 => Self::MainsL2Current,
            14 => Self::MainsL3Current,
            15 => Self::GenL1Current,
            16 => Self::GenL2Current,
            17 => Self::GenL3Current,
            18 => Self::MainsNeutralCurrent,
            19 => Self::GenNeutralCurrent,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> u16 {
        match *self {
            Self::MainsL1Voltage => 0,
            Self::MainsL2Voltage => 1,
            Self::MainsL3Voltage => 2,
            Self::GenL1Voltage => 3,
            Self::GenL2Voltage => 4,
            Self::GenL3Voltage => 5,
            Self::MainsL1L2Voltage => 6,
            Self::MainsL2L3Voltage => 7,
            Self::MainsL3L1Voltage => 8,
            Self::GenL1L2Voltage => 9,
            Self::GenL2L3Voltage => 10,
            Self::GenL3L1Voltage => 11,
            Self::MainsL1Current => 12,
            Self::MainsL2Current => 13,
            Self::MainsL3Current => 14,
            Self::GenL1Current => 15,
            Self::GenL2Current => 16,
            Self::GenL3Current => 17,
            Self::MainsNeutralCurrent => 18,
            Self::GenNeutralCurrent => 19,
            Self::Unknown(code) => code,
        }
    }
}

/// Harmonic analysis of the selected channel, percentages of fundamental.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HarmonicSnapshot {
    pub thd: f32,
    pub fundamental: f32,
    pub h3: f32,
    pub h5: f32,
    pub h7: f32,
    pub h9: f32,
    pub h11: f32,
    pub h13: f32,
    pub channel: HarmonicChannel,
}

impl Default for HarmonicSnapshot {
    fn default() -> Self {
        Self {
            thd: 0.0,
            fundamental: 0.0,
            h3: 0.0,
            h5: 0.0,
            h7: 0.0,
            h9: 0.0,
            h11: 0.0,
            h13: 0.0,
            channel: HarmonicChannel::GenL1Voltage,
        }
    }
}

/// Position fix from the unit's GPS option, degrees and metres.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct GpsFix {
    pub latitude: f32,
    pub longitude: f32,
    pub altitude: f32,
}

/// Communications diagnostics, refreshed on demand only.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CommsDiagnostics {
    pub ethernet_resets: u16,
    pub tcp_packets: u16,
    pub gprs_ip: u32,
    pub mac: [u8; 6],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trips_through_known_states() {
        for code in 0..=25u16 {
            let state = OperatingState::from_raw(code);
            assert_eq!(state.code(), code);
            assert!(!matches!(state, OperatingState::Unknown(_)));
        }
    }

    #[test]
    fn unknown_codes_are_preserved_not_cast() {
        assert_eq!(OperatingState::from_raw(99), OperatingState::Unknown(99));
        assert_eq!(OperatingMode::from_raw(3), OperatingMode::Unknown(3));
    }

    #[test]
    fn run_range_covers_idle_through_secondary_loaded_only() {
        for code in 0..=25u16 {
            let expected = (6..=16).contains(&code);
            assert_eq!(
                OperatingState::from_raw(code).is_running(),
                expected,
                "code {code}"
            );
        }
        // An unknown code inside the numeric window is still not "running".
        assert!(!OperatingState::Unknown(10).is_running());
    }

    #[test]
    fn harmonic_channels_round_trip_and_reject_unknown_codes() {
        for code in 0..=19u16 {
            let channel = HarmonicChannel::from_raw(code);
            assert_eq!(channel.code(), code);
            assert!(!matches!(channel, HarmonicChannel::Unknown(_)));
        }
        assert_eq!(HarmonicChannel::from_raw(20), HarmonicChannel::Unknown(20));
    }
}
