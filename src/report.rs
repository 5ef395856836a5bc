//! Exchange documents.
//!
//! Two JSON shapes are exported: a full nested document carrying the whole
//! high-value snapshot, and a basic document with a fixed subset of fields
//! for constrained channels. Both are plain serde structs; field names are
//! part of the exchange contract.

use crate::state::{ElectricalSnapshot, EngineSnapshot, SystemStatus};
use arrayvec::ArrayString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_REPORT_SIZE: usize = 2048;

pub type ReportBuffer = ArrayString<MAX_REPORT_SIZE>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("report serialization failed")]
    Serialization,
    #[error("report exceeds buffer size")]
    TooLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseVoltages {
    pub l1: f32,
    pub l2: f32,
    pub l3: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    pub voltage: PhaseVoltages,
    pub frequency: f32,
    pub power: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectricalReport {
    pub mains: SourceReport,
    pub generator: SourceReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineReport {
    pub rpm: f32,
    pub temperature: f32,
    pub oil_pressure: f32,
    pub fuel_level: f32,
    pub external_fuel_level: f32,
    pub battery_voltage: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmReport {
    pub shutdown: bool,
    pub loaddump: bool,
    pub warning: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemReport {
    /// Raw operating-state code.
    pub status: u16,
    /// Raw mode code.
    pub mode: u16,
    pub alarms: AlarmReport,
}

/// Full-detail exchange document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FullReport {
    pub timestamp: u64,
    pub connected: bool,
    pub electrical: ElectricalReport,
    pub engine: EngineReport,
    pub system: SystemReport,
    pub healthy: bool,
}

/// Fixed high-value subset for constrained channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasicReport {
    pub gen_power: f32,
    pub gen_freq: f32,
    pub mains_freq: f32,
    pub rpm: f32,
    pub battery: f32,
    pub fuel: f32,
    pub status: u16,
    pub mode: u16,
    pub alarms: bool,
    pub connected: bool,
}

impl FullReport {
    pub fn capture(
        timestamp: u64,
        connected: bool,
        electrical: &ElectricalSnapshot,
        engine: &EngineSnapshot,
        status: &SystemStatus,
        healthy: bool,
    ) -> Self {
        Self {
            timestamp,
            connected,
            electrical: ElectricalReport {
                mains: SourceReport {
                    voltage: PhaseVoltages {
                        l1: electrical.mains.l1.voltage,
                        l2: electrical.mains.l2.voltage,
                        l3: electrical.mains.l3.voltage,
                    },
                    frequency: electrical.mains.frequency,
                    power: electrical.mains.totals.active_power,
                },
                generator: SourceReport {
                    voltage: PhaseVoltages {
                        l1: electrical.generator.l1.voltage,
                        l2: electrical.generator.l2.voltage,
                        l3: electrical.generator.l3.voltage,
                    },
                    frequency: electrical.generator.frequency,
                    power: electrical.generator.totals.active_power,
                },
            },
            engine: EngineReport {
                rpm: engine.rpm,
                temperature: engine.coolant_temp,
                oil_pressure: engine.oil_pressure,
                fuel_level: engine.fuel_level,
                external_fuel_level: engine.external_fuel_level,
                battery_voltage: engine.battery_voltage,
            },
            system: SystemReport {
                status: status.state.code(),
                mode: status.mode.code(),
                alarms: AlarmReport {
                    shutdown: status.shutdown_alarm,
                    loaddump: status.load_dump_alarm,
                    warning: status.warning_alarm,
                },
            },
            healthy,
        }
    }
}

impl BasicReport {
    pub fn capture(
        electrical: &ElectricalSnapshot,
        engine: &EngineSnapshot,
        status: &SystemStatus,
        connected: bool,
    ) -> Self {
        Self {
            gen_power: electrical.generator.totals.active_power,
            gen_freq: electrical.generator.frequency,
            mains_freq: electrical.mains.frequency,
            rpm: engine.rpm,
            battery: engine.battery_voltage,
            fuel: engine.fuel_level,
            status: status.state.code(),
            mode: status.mode.code(),
            alarms: status.any_alarm(),
            connected,
        }
    }
}

/// Serializer with a preallocated bounded buffer, reused across reports.
#[derive(Debug, Default)]
pub struct ReportWriter {
    buffer: ReportBuffer,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            buffer: ArrayString::new(),
        }
    }

    pub fn serialize_full(&mut self, report: &FullReport) -> Result<&str, ReportError> {
        self.fill(report)
    }

    pub fn serialize_basic(&mut self, report: &BasicReport) -> Result<&str, ReportError> {
        self.fill(report)
    }

    fn fill<T: Serialize>(&mut self, value: &T) -> Result<&str, ReportError> {
        self.buffer.clear();
        let json = serde_json::to_string(value).map_err(|_| ReportError::Serialization)?;
        if json.len() > MAX_REPORT_SIZE {
            return Err(ReportError::TooLarge);
        }
        self.buffer.push_str(&json);
        Ok(&self.buffer)
    }
}
