//! In-memory register bus for tests and the demo monitor.
//!
//! Holds a sparse register image, answers reads the way a real unit would,
//! records every write, and injects failures on demand so link-health and
//! last-known-good behavior can be exercised without hardware.

use crate::registers::{RegisterDef, RegisterWidth};
use crate::transport::{BusError, RegisterBus, WordBuffer, MAX_READ_WORDS};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct SimulatedUnit {
    registers: HashMap<u16, u16>,
    unit_address: u8,
    fail_reads: u32,
    fail_writes: u32,
    faulted: HashSet<u16>,
    offline: bool,
    writes: Vec<(u16, u16)>,
}

impl SimulatedUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// A plausible idle unit: healthy mains, engine at rest, auto mode,
    /// genuine identity, no alarms.
    pub fn with_idle_image() -> Self {
        let mut unit = Self::new();

        unit.set_word(crate::registers::status::DEVICE_IDENTITY.address, 0xD300);
        unit.set_word(crate::registers::status::HARDWARE_VERSION.address, 0x0102);
        unit.set_word(crate::registers::status::SOFTWARE_VERSION.address, 0x0304);
        unit.set_word(crate::registers::status::OPERATING_STATE.address, 0);
        unit.set_word(crate::registers::status::OPERATING_MODE.address, 4);

        use crate::registers::electrical as el;
        for def in [el::MAINS_L1_VOLTAGE, el::MAINS_L2_VOLTAGE, el::MAINS_L3_VOLTAGE] {
            unit.set_scaled(def, 230.0);
        }
        unit.set_scaled(el::MAINS_AVG_VOLTAGE, 230.0);
        unit.set_scaled(el::MAINS_FREQUENCY, 50.0);
        unit.set_scaled(el::GEN_FREQUENCY, 0.0);

        use crate::registers::engine as eng;
        unit.set_scaled(eng::BATTERY_VOLTAGE, 13.8);
        unit.set_scaled(eng::CHARGE_VOLTAGE, 14.1);
        unit.set_scaled(eng::FUEL_LEVEL, 75.0);
        unit.set_scaled(eng::COOLANT_TEMP, 24.0);
        unit.set_scaled(eng::AMBIENT_TEMP, 21.5);

        use crate::registers::counters as ctr;
        unit.set_scaled(ctr::ENGINE_HOURS, 1234.56);
        unit.set_double(ctr::RUN_COUNT.address, 42);

        use crate::registers::{gps, harmonics};
        unit.set_scaled(harmonics::THD, 2.8);
        unit.set_scaled(harmonics::FUNDAMENTAL, 100.0);
        unit.set_word(harmonics::CHANNEL_SELECT.address, 3);
        unit.set_double(gps::LATITUDE.address, 41.0082_f32.to_bits());
        unit.set_double(gps::LONGITUDE.address, 28.9784_f32.to_bits());

        unit
    }

    /// Store one raw word.
    pub fn set_word(&mut self, address: u16, value: u16) {
        self.registers.insert(address, value);
    }

    /// Store one raw 32-bit value across two words, high word first.
    pub fn set_double(&mut self, address: u16, value: u32) {
        self.registers.insert(address, (value >> 16) as u16);
        self.registers.insert(address + 1, value as u16);
    }

    /// Encode a physical value through a catalog descriptor (multiply by the
    /// scale divisor) and store it at the descriptor's address.
    pub fn set_scaled(&mut self, def: RegisterDef, value: f32) {
        let raw = (value * f32::from(def.scale)).round() as u32;
        match def.width {
            RegisterWidth::Word => self.set_word(def.address, raw as u16),
            RegisterWidth::DoubleWord => self.set_double(def.address, raw),
        }
    }

    /// Fail the next `count` read operations with a timeout.
    pub fn fail_next_reads(&mut self, count: u32) {
        self.fail_reads = count;
    }

    /// Fail the next `count` write operations with a timeout.
    pub fn fail_next_writes(&mut self, count: u32) {
        self.fail_writes = count;
    }

    /// Fail any read touching `address` until cleared again, leaving the
    /// rest of the image readable.
    pub fn set_register_fault(&mut self, address: u16, faulted: bool) {
        if faulted {
            self.faulted.insert(address);
        } else {
            self.faulted.remove(&address);
        }
    }

    /// Fail everything until cleared.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Every write issued so far, in order.
    pub fn writes(&self) -> &[(u16, u16)] {
        &self.writes
    }

    pub fn last_write(&self) -> Option<(u16, u16)> {
        self.writes.last().copied()
    }

    pub fn unit_address(&self) -> u8 {
        self.unit_address
    }
}

impl RegisterBus for SimulatedUnit {
    fn read_holding(&mut self, address: u16, count: u16) -> Result<WordBuffer, BusError> {
        if count as usize > MAX_READ_WORDS {
            return Err(BusError::RequestTooLarge);
        }
        if self.offline {
            return Err(BusError::Timeout);
        }
        if self.fail_reads > 0 {
            self.fail_reads -= 1;
            return Err(BusError::Timeout);
        }
        if (address..address + count).any(|a| self.faulted.contains(&a)) {
            return Err(BusError::InvalidResponse);
        }

        let mut words = WordBuffer::new();
        for offset in 0..count {
            let value = self
                .registers
                .get(&(address + offset))
                .copied()
                .unwrap_or(0);
            words.push(value).map_err(|_| BusError::RequestTooLarge)?;
        }
        Ok(words)
    }

    fn write_single(&mut self, address: u16, value: u16) -> Result<(), BusError> {
        if self.offline {
            return Err(BusError::Timeout);
        }
        if self.fail_writes > 0 {
            self.fail_writes -= 1;
            return Err(BusError::Timeout);
        }
        self.registers.insert(address, value);
        self.writes.push((address, value));
        Ok(())
    }

    fn set_unit_address(&mut self, address: u8) {
        self.unit_address = address;
    }
}
