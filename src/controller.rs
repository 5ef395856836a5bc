//! The controller: catalog-driven acquisition, derived-state classification
//! and command encoding over one [`RegisterBus`].
//!
//! One controller instance owns one unit's snapshot, link monitor and
//! transport handle. All calls are synchronous and take `&mut self`;
//! multiple units on a shared bus need one controller each and external
//! coordination of the underlying transport.

use crate::fuel::{self, AnalogInput, FuelSensorConfig};
use crate::link::LinkMonitor;
use crate::registers::{
    analog, comms, counters, electrical, engine, gps, harmonics, status, AlarmClass, PanelButton,
    RegisterDef, RegisterWidth, ACCEPTED_IDENTITY_CODES, ALARM_SCAN_TABLE, BUTTON_REGISTER,
    HARMONIC_CHANNEL_REGISTER, RESET_MAGIC, RESET_REGISTER, UNIT_ADDRESS_RANGE,
};
use crate::report::{BasicReport, FullReport};
use crate::state::{
    AnalogInputs, CommsDiagnostics, ElectricalSnapshot, EngineSnapshot, GpsFix, HarmonicChannel,
    HarmonicSnapshot, OperatingMode, OperatingState, RunCounters, SystemStatus,
};
use crate::transport::{RegisterBus, WordBuffer};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Named control actions, each encoding to exactly one register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlIntent {
    Start,
    Stop,
    AutoMode,
    ManualMode,
    TestMode,
    EmergencyStop,
    ResetUnit,
}

pub struct GensetController<B: RegisterBus> {
    bus: B,
    link: LinkMonitor,
    started: Instant,
    unit_address: u8,

    electrical: ElectricalSnapshot,
    engine: EngineSnapshot,
    status: SystemStatus,
    counters: RunCounters,
    analog: AnalogInputs,
    harmonics: HarmonicSnapshot,
    gps: GpsFix,
    comms: CommsDiagnostics,
    fuel_sensor: FuelSensorConfig,
}

impl<B: RegisterBus> GensetController<B> {
    /// Addresses outside 1..=240 are clamped into the valid range.
    pub fn new(mut bus: B, unit_address: u8) -> Self {
        let unit_address =
            unit_address.clamp(*UNIT_ADDRESS_RANGE.start(), *UNIT_ADDRESS_RANGE.end());
        bus.set_unit_address(unit_address);
        let engine = EngineSnapshot {
            external_fuel_level: fuel::LEVEL_INVALID,
            ..EngineSnapshot::default()
        };

        Self {
            bus,
            link: LinkMonitor::new(),
            started: Instant::now(),
            unit_address,
            electrical: ElectricalSnapshot::default(),
            engine,
            status: SystemStatus::default(),
            counters: RunCounters::default(),
            analog: AnalogInputs::default(),
            harmonics: HarmonicSnapshot::default(),
            gps: GpsFix::default(),
            comms: CommsDiagnostics::default(),
            fuel_sensor: FuelSensorConfig::default(),
        }
    }

    /// Probe the unit identity and, when a known controller answers, run a
    /// first core pass. Returns the connected flag after the attempt.
    pub fn init(&mut self) -> bool {
        if self.probe_identity() {
            self.poll_core()
        } else {
            false
        }
    }

    // ---- acquisition -----------------------------------------------------

    /// Core acquisition pass: electrical, engine, system status and the
    /// alarm scan, in that fixed order. Individual read failures are
    /// absorbed (the affected field keeps its last-known-good value) and
    /// never abort the pass. Returns the link connected flag afterwards.
    pub fn poll_core(&mut self) -> bool {
        self.poll_electrical();
        self.poll_engine();
        self.poll_status();
        self.scan_alarms();
        self.link.touch(Instant::now());
        self.link.is_connected()
    }

    /// Extended pass: lifetime counters, analog channels, harmonic block and
    /// GPS fix. Invoked at a lower cadence or on demand; never part of the
    /// core pass.
    pub fn poll_extended(&mut self) -> bool {
        self.poll_counters();
        self.poll_analog();
        self.poll_harmonics();
        self.poll_gps();
        self.link.is_connected()
    }

    /// Refresh the communications diagnostics block. On demand only; the
    /// block sits far from the telemetry map and changes rarely.
    pub fn poll_comms(&mut self) -> bool {
        let bus = &mut self.bus;
        let link = &mut self.link;
        let diag = &mut self.comms;

        if let Some(v) = read_word(bus, link, comms::ETHERNET_RESET_COUNT) {
            diag.ethernet_resets = v;
        }
        if let Some(v) = read_word(bus, link, comms::TCP_PACKET_COUNT) {
            diag.tcp_packets = v;
        }
        if let Some(v) = read_double(bus, link, comms::GPRS_IP) {
            diag.gprs_ip = v;
        }
        if let Some(words) = read_raw(bus, link, comms::MAC_BASE, comms::MAC_WORDS) {
            for (pair, word) in diag.mac.chunks_exact_mut(2).zip(words.iter()) {
                pair[0] = (word >> 8) as u8;
                pair[1] = (word & 0xFF) as u8;
            }
        }
        link.is_connected()
    }

    /// Caller-driven tick. Runs a core pass when auto-poll is enabled and
    /// the configured interval has elapsed; returns whether a pass ran.
    pub fn service(&mut self) -> bool {
        if self.link.poll_due(Instant::now()) {
            self.poll_core();
            true
        } else {
            false
        }
    }

    fn poll_electrical(&mut self) {
        let bus = &mut self.bus;
        let link = &mut self.link;
        let el = &mut self.electrical;

        refresh(bus, link, electrical::MAINS_L1_VOLTAGE, &mut el.mains.l1.voltage);
        refresh(bus, link, electrical::MAINS_L2_VOLTAGE, &mut el.mains.l2.voltage);
        refresh(bus, link, electrical::MAINS_L3_VOLTAGE, &mut el.mains.l3.voltage);
        refresh(bus, link, electrical::GEN_L1_VOLTAGE, &mut el.generator.l1.voltage);
        refresh(bus, link, electrical::GEN_L2_VOLTAGE, &mut el.generator.l2.voltage);
        refresh(bus, link, electrical::GEN_L3_VOLTAGE, &mut el.generator.l3.voltage);

        refresh(bus, link, electrical::MAINS_L1_L2_VOLTAGE, &mut el.mains.l1_l2_voltage);
        refresh(bus, link, electrical::MAINS_L2_L3_VOLTAGE, &mut el.mains.l2_l3_voltage);
        refresh(bus, link, electrical::MAINS_L3_L1_VOLTAGE, &mut el.mains.l3_l1_voltage);
        refresh(bus, link, electrical::GEN_L1_L2_VOLTAGE, &mut el.generator.l1_l2_voltage);
        refresh(bus, link, electrical::GEN_L2_L3_VOLTAGE, &mut el.generator.l2_l3_voltage);
        refresh(bus, link, electrical::GEN_L3_L1_VOLTAGE, &mut el.generator.l3_l1_voltage);

        refresh(bus, link, electrical::MAINS_L1_CURRENT, &mut el.mains.l1.current);
        refresh(bus, link, electrical::MAINS_L2_CURRENT, &mut el.mains.l2.current);
        refresh(bus, link, electrical::MAINS_L3_CURRENT, &mut el.mains.l3.current);
        refresh(bus, link, electrical::GEN_L1_CURRENT, &mut el.generator.l1.current);
        refresh(bus, link, electrical::GEN_L2_CURRENT, &mut el.generator.l2.current);
        refresh(bus, link, electrical::GEN_L3_CURRENT, &mut el.generator.l3.current);
        refresh(bus, link, electrical::MAINS_NEUTRAL_CURRENT, &mut el.mains.neutral_current);
        refresh(bus, link, electrical::GEN_NEUTRAL_CURRENT, &mut el.generator.neutral_current);

        refresh(bus, link, electrical::MAINS_TOTAL_ACTIVE_POWER, &mut el.mains.totals.active_power);
        refresh(bus, link, electrical::GEN_TOTAL_ACTIVE_POWER, &mut el.generator.totals.active_power);
        refresh(bus, link, electrical::MAINS_TOTAL_REACTIVE_POWER, &mut el.mains.totals.reactive_power);
        refresh(bus, link, electrical::GEN_TOTAL_REACTIVE_POWER, &mut el.generator.totals.reactive_power);
        refresh(bus, link, electrical::MAINS_TOTAL_APPARENT_POWER, &mut el.mains.totals.apparent_power);
        refresh(bus, link, electrical::GEN_TOTAL_APPARENT_POWER, &mut el.generator.totals.apparent_power);

        refresh(bus, link, electrical::MAINS_POWER_FACTOR, &mut el.mains.totals.power_factor);
        refresh(bus, link, electrical::GEN_POWER_FACTOR, &mut el.generator.totals.power_factor);

        refresh(bus, link, electrical::MAINS_FREQUENCY, &mut el.mains.frequency);
        refresh(bus, link, electrical::GEN_FREQUENCY, &mut el.generator.frequency);

        refresh(bus, link, electrical::GEN_AVG_VOLTAGE, &mut el.generator.totals.average_voltage);
        refresh(bus, link, electrical::GEN_AVG_CURRENT, &mut el.generator.totals.average_current);
        refresh(bus, link, electrical::MAINS_AVG_VOLTAGE, &mut el.mains.totals.average_voltage);
        refresh(bus, link, electrical::MAINS_AVG_CURRENT, &mut el.mains.totals.average_current);
    }

    fn poll_engine(&mut self) {
        let bus = &mut self.bus;
        let link = &mut self.link;
        let eng = &mut self.engine;

        refresh(bus, link, engine::RPM, &mut eng.rpm);
        refresh(bus, link, engine::COOLANT_TEMP, &mut eng.coolant_temp);
        refresh(bus, link, engine::OIL_PRESSURE, &mut eng.oil_pressure);
        refresh(bus, link, engine::FUEL_LEVEL, &mut eng.fuel_level);
        refresh(bus, link, engine::OIL_TEMP, &mut eng.oil_temp);
        refresh(bus, link, engine::CANOPY_TEMP, &mut eng.canopy_temp);
        refresh(bus, link, engine::AMBIENT_TEMP, &mut eng.ambient_temp);
        refresh(bus, link, engine::BATTERY_VOLTAGE, &mut eng.battery_voltage);
        refresh(bus, link, engine::MIN_BATTERY_VOLTAGE, &mut eng.min_battery_voltage);
        refresh(bus, link, engine::CHARGE_VOLTAGE, &mut eng.charge_voltage);
        refresh(bus, link, engine::CHARGE_CURRENT, &mut eng.charge_current);
    }

    fn poll_status(&mut self) {
        let bus = &mut self.bus;
        let link = &mut self.link;
        let st = &mut self.status;

        if let Some(raw) = read_word(bus, link, status::OPERATING_STATE) {
            st.state = OperatingState::from_raw(raw);
        }
        if let Some(raw) = read_word(bus, link, status::OPERATING_MODE) {
            st.mode = OperatingMode::from_raw(raw);
        }
        if let Some(v) = read_word(bus, link, status::OPERATION_TIMER) {
            st.operation_timer = v;
        }
        refresh(bus, link, status::GOVERNOR_OUTPUT, &mut st.governor_output);
        refresh(bus, link, status::AVR_OUTPUT, &mut st.avr_output);
        if let Some(v) = read_word(bus, link, status::DEVICE_IDENTITY) {
            st.device_identity = v;
        }
        if let Some(v) = read_word(bus, link, status::HARDWARE_VERSION) {
            st.hardware_version = v;
        }
        if let Some(v) = read_word(bus, link, status::SOFTWARE_VERSION) {
            st.software_version = v;
        }
    }

    fn poll_counters(&mut self) {
        let bus = &mut self.bus;
        let link = &mut self.link;
        let c = &mut self.counters;

        if let Some(v) = read_double(bus, link, counters::RUN_COUNT) {
            c.run_count = v;
        }
        if let Some(v) = read_double(bus, link, counters::CRANK_COUNT) {
            c.crank_count = v;
        }
        if let Some(v) = read_double(bus, link, counters::LOADED_RUN_COUNT) {
            c.loaded_run_count = v;
        }
        refresh(bus, link, counters::ENGINE_HOURS, &mut c.engine_hours);
        refresh(bus, link, counters::HOURS_SINCE_SERVICE, &mut c.hours_since_service);
        refresh(bus, link, counters::DAYS_SINCE_SERVICE, &mut c.days_since_service);
        refresh(bus, link, counters::TOTAL_ACTIVE_ENERGY, &mut c.total_active_energy);
        refresh(bus, link, counters::REACTIVE_ENERGY_INDUCTIVE, &mut c.reactive_energy_inductive);
        refresh(bus, link, counters::REACTIVE_ENERGY_CAPACITIVE, &mut c.reactive_energy_capacitive);
        refresh(bus, link, counters::FUEL_COUNTER, &mut c.fuel_counter);
        refresh(bus, link, counters::FLOW_METER, &mut c.flow_meter);
    }

    fn poll_analog(&mut self) {
        for index in 0..analog::ANALOG_CHANNEL_COUNT {
            let def = RegisterDef::word(analog::ANALOG_CHANNEL_BASE + index as u16, 1);
            if let Some(v) = read_word(&mut self.bus, &mut self.link, def) {
                self.analog.channels[index] = v;
            }
        }
    }

    fn poll_harmonics(&mut self) {
        let bus = &mut self.bus;
        let link = &mut self.link;
        let h = &mut self.harmonics;

        refresh(bus, link, harmonics::THD, &mut h.thd);
        refresh(bus, link, harmonics::FUNDAMENTAL, &mut h.fundamental);
        refresh(bus, link, harmonics::H3, &mut h.h3);
        refresh(bus, link, harmonics::H5, &mut h.h5);
        refresh(bus, link, harmonics::H7, &mut h.h7);
        refresh(bus, link, harmonics::H9, &mut h.h9);
        refresh(bus, link, harmonics::H11, &mut h.h11);
        refresh(bus, link, harmonics::H13, &mut h.h13);

        if let Some(raw) = read_word(bus, link, harmonics::CHANNEL_SELECT) {
            h.channel = HarmonicChannel::from_raw(raw);
        }
    }

    /// GPS words carry raw IEEE-754 bit patterns, not scaled integers.
    fn poll_gps(&mut self) {
        let bus = &mut self.bus;
        let link = &mut self.link;
        let fix = &mut self.gps;

        if let Some(bits) = read_double(bus, link, gps::LATITUDE) {
            fix.latitude = f32::from_bits(bits);
        }
        if let Some(bits) = read_double(bus, link, gps::LONGITUDE) {
            fix.longitude = f32::from_bits(bits);
        }
        if let Some(bits) = read_double(bus, link, gps::ALTITUDE) {
            fix.altitude = f32::from_bits(bits);
        }
    }

    // ---- derived state ---------------------------------------------------

    /// Recompute the three alarm-class flags from their scan ranges. Flags
    /// are rewritten wholesale every pass. A non-zero register short-circuits
    /// its range; a failed read contributes nothing but the scan proceeds to
    /// the next address, so a degraded bus can hide an alarm (the degraded
    /// condition itself is visible through the connected flag).
    fn scan_alarms(&mut self) {
        for (class, range) in &ALARM_SCAN_TABLE {
            let mut active = false;
            for address in range.clone() {
                let def = RegisterDef::word(address, 1);
                match read_word(&mut self.bus, &mut self.link, def) {
                    Some(word) if word != 0 => {
                        active = true;
                        break;
                    }
                    _ => {}
                }
            }
            match class {
                AlarmClass::Shutdown => self.status.shutdown_alarm = active,
                AlarmClass::LoadDump => self.status.load_dump_alarm = active,
                AlarmClass::Warning => self.status.warning_alarm = active,
            }
        }
        if self.status.any_alarm() {
            debug!(
                shutdown = self.status.shutdown_alarm,
                load_dump = self.status.load_dump_alarm,
                warning = self.status.warning_alarm,
                "alarm scan raised flags"
            );
        }
    }

    /// Liveness probe: read the device-identity register and accept only the
    /// known family codes. A successful read of an unexpected code counts as
    /// not connected. Independent of the counter-based connected flag.
    pub fn probe_identity(&mut self) -> bool {
        match read_word(&mut self.bus, &mut self.link, status::DEVICE_IDENTITY) {
            Some(code) if ACCEPTED_IDENTITY_CODES.contains(&code) => true,
            Some(code) => {
                debug!(code = format_args!("{code:#06x}"), "unexpected identity code");
                false
            }
            None => false,
        }
    }

    /// True while the current operating state lies in the running sub-range
    /// of the state table.
    pub fn is_generator_running(&self) -> bool {
        self.status.state.is_running()
    }

    /// Mains is considered present above 100 V average with the frequency
    /// strictly inside the 45–65 Hz window.
    pub fn is_mains_present(&self) -> bool {
        self.electrical.mains.totals.average_voltage > 100.0
            && self.electrical.mains.frequency > 45.0
            && self.electrical.mains.frequency < 65.0
    }

    /// Composite health predicate, recomputed from the snapshot on every
    /// call: link up, no shutdown alarm, battery above 10 V, and oil
    /// pressure above 0.5 bar unless the engine is stopped anyway.
    pub fn is_system_healthy(&self) -> bool {
        self.link.is_connected()
            && !self.status.shutdown_alarm
            && self.engine.battery_voltage > 10.0
            && (self.engine.oil_pressure > 0.5 || !self.is_generator_running())
    }

    // ---- command path ----------------------------------------------------

    /// Encode and issue one control intent as a single register write.
    /// Returns the immediate write result; callers that need confirmation
    /// must poll state afterwards.
    pub fn send_intent(&mut self, intent: ControlIntent) -> bool {
        match intent {
            // The device's auto sequencer performs the actual start.
            ControlIntent::Start => self.press_button(PanelButton::Auto.mask()),
            ControlIntent::Stop => self.press_button(PanelButton::Stop.mask()),
            ControlIntent::AutoMode => self.press_button(PanelButton::Auto.mask()),
            ControlIntent::ManualMode => self.press_button(PanelButton::ManualRun.mask()),
            ControlIntent::TestMode => self.press_button(PanelButton::Test.mask()),
            ControlIntent::EmergencyStop => {
                self.press_button(PanelButton::Stop.mask() | PanelButton::LongPress.mask())
            }
            ControlIntent::ResetUnit => self.write_checked(RESET_REGISTER, RESET_MAGIC),
        }
    }

    pub fn start_generator(&mut self) -> bool {
        self.send_intent(ControlIntent::Start)
    }

    pub fn stop_generator(&mut self) -> bool {
        self.send_intent(ControlIntent::Stop)
    }

    pub fn set_auto_mode(&mut self) -> bool {
        self.send_intent(ControlIntent::AutoMode)
    }

    pub fn set_manual_mode(&mut self) -> bool {
        self.send_intent(ControlIntent::ManualMode)
    }

    pub fn set_test_mode(&mut self) -> bool {
        self.send_intent(ControlIntent::TestMode)
    }

    pub fn emergency_stop(&mut self) -> bool {
        self.send_intent(ControlIntent::EmergencyStop)
    }

    pub fn reset_unit(&mut self) -> bool {
        self.send_intent(ControlIntent::ResetUnit)
    }

    /// Simulate a front-panel button press, OR-able with the press-duration
    /// modifier bits.
    pub fn press_button(&mut self, mask: u16) -> bool {
        self.write_checked(BUTTON_REGISTER, mask)
    }

    /// Point the harmonic analyzer at a different measurement channel. The
    /// snapshot reflects the change after the next extended pass.
    pub fn set_harmonic_channel(&mut self, channel: HarmonicChannel) -> bool {
        self.write_checked(HARMONIC_CHANNEL_REGISTER, channel.code())
    }

    fn write_checked(&mut self, address: u16, value: u16) -> bool {
        match self.bus.write_single(address, value) {
            Ok(()) => {
                self.link.record_success();
                true
            }
            Err(err) => {
                debug!(%err, address, "register write failed");
                self.link.record_failure();
                false
            }
        }
    }

    // ---- auxiliary fuel sender --------------------------------------------

    /// Sample the external resistive fuel sender through the host ADC and
    /// store the level in the engine snapshot. Returns the level, or the
    /// invalid sentinel when the divider voltage is out of range.
    pub fn sample_external_fuel<A: AnalogInput>(&mut self, adc: &mut A) -> f32 {
        let level = fuel::sample_level(adc, &self.fuel_sensor);
        self.engine.external_fuel_level = level;
        level
    }

    /// Replace the sender calibration endpoints; effective on the next read.
    pub fn calibrate_fuel_sensor(&mut self, empty_ohms: f32, full_ohms: f32) {
        self.fuel_sensor.empty_ohms = empty_ohms;
        self.fuel_sensor.full_ohms = full_ohms;
    }

    pub fn set_fuel_sensor_pin(&mut self, pin: u8) {
        self.fuel_sensor.adc_pin = pin;
    }

    // ---- configuration ----------------------------------------------------

    /// Retarget the controller at a different unit address. Addresses
    /// outside 1..=240 are rejected.
    pub fn set_unit_address(&mut self, address: u8) -> bool {
        if !UNIT_ADDRESS_RANGE.contains(&address) {
            return false;
        }
        self.unit_address = address;
        self.bus.set_unit_address(address);
        true
    }

    pub fn unit_address(&self) -> u8 {
        self.unit_address
    }

    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.link.set_poll_interval(interval);
    }

    pub fn set_auto_poll(&mut self, enabled: bool) {
        self.link.set_auto_poll(enabled);
    }

    // ---- read-only views ---------------------------------------------------

    pub fn electrical(&self) -> &ElectricalSnapshot {
        &self.electrical
    }

    pub fn engine(&self) -> &EngineSnapshot {
        &self.engine
    }

    pub fn status(&self) -> &SystemStatus {
        &self.status
    }

    pub fn counters(&self) -> &RunCounters {
        &self.counters
    }

    pub fn analog_inputs(&self) -> &AnalogInputs {
        &self.analog
    }

    pub fn harmonics(&self) -> &HarmonicSnapshot {
        &self.harmonics
    }

    pub fn gps(&self) -> &GpsFix {
        &self.gps
    }

    pub fn comms(&self) -> &CommsDiagnostics {
        &self.comms
    }

    pub fn link(&self) -> &LinkMonitor {
        &self.link
    }

    pub fn fuel_sensor(&self) -> &FuelSensorConfig {
        &self.fuel_sensor
    }

    /// Mutable access to the underlying transport. Intended for simulated
    /// buses in tests and demos; a real transport has nothing to poke.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Milliseconds since controller construction, the report time base.
    pub fn uptime_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    // ---- exchange documents -------------------------------------------------

    pub fn full_report(&self) -> FullReport {
        FullReport::capture(
            self.uptime_ms(),
            self.link.is_connected(),
            &self.electrical,
            &self.engine,
            &self.status,
            self.is_system_healthy(),
        )
    }

    pub fn basic_report(&self) -> BasicReport {
        BasicReport::capture(
            &self.electrical,
            &self.engine,
            &self.status,
            self.link.is_connected(),
        )
    }
}

// ---- generic decode path -------------------------------------------------

fn read_raw<B: RegisterBus>(
    bus: &mut B,
    link: &mut LinkMonitor,
    address: u16,
    count: u16,
) -> Option<WordBuffer> {
    match bus.read_holding(address, count) {
        Ok(words) if words.len() == count as usize => {
            link.record_success();
            Some(words)
        }
        Ok(words) => {
            trace!(address, got = words.len(), want = count, "short read");
            link.record_failure();
            None
        }
        Err(err) => {
            trace!(%err, address, "register read failed");
            link.record_failure();
            None
        }
    }
}

/// Read one catalogued 16-bit value, un-scaled.
fn read_word<B: RegisterBus>(bus: &mut B, link: &mut LinkMonitor, def: RegisterDef) -> Option<u16> {
    read_raw(bus, link, def.address, 1).map(|words| words[0])
}

/// Read one catalogued 32-bit value: two words, high word first.
fn read_double<B: RegisterBus>(
    bus: &mut B,
    link: &mut LinkMonitor,
    def: RegisterDef,
) -> Option<u32> {
    read_raw(bus, link, def.address, 2)
        .map(|words| (u32::from(words[0]) << 16) | u32::from(words[1]))
}

/// Read one catalogued quantity and apply its scale divisor.
fn read_scaled<B: RegisterBus>(
    bus: &mut B,
    link: &mut LinkMonitor,
    def: RegisterDef,
) -> Option<f32> {
    let raw = match def.width {
        RegisterWidth::Word => read_word(bus, link, def).map(u32::from)?,
        RegisterWidth::DoubleWord => read_double(bus, link, def)?,
    };
    Some(raw as f32 / f32::from(def.scale))
}

/// Decode one quantity into its snapshot slot, keeping the previous value on
/// failure (last-known-good).
fn refresh<B: RegisterBus>(bus: &mut B, link: &mut LinkMonitor, def: RegisterDef, slot: &mut f32) {
    if let Some(value) = read_scaled(bus, link, def) {
        *slot = value;
    }
}
