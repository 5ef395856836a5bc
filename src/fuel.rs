//! Auxiliary resistive fuel-sender conversion.
//!
//! The sender sits in a voltage divider read through a 12-bit ADC. The
//! conversion chain is pure: averaged counts → volts → sender resistance →
//! linearly interpolated 0–100 % level. Calibration endpoints live on the
//! controller and take effect on the next read.

use serde::Serialize;

/// Samples averaged per reading to suppress ADC noise.
pub const ADC_SAMPLES: usize = 10;
/// 12-bit converter full-scale count.
pub const ADC_FULL_SCALE: f32 = 4095.0;
/// ADC reference voltage.
pub const ADC_REF_VOLTS: f32 = 3.3;
/// Lower divider resistor, ohms.
pub const DIVIDER_R1_OHMS: f32 = 680.0;
/// Upper divider resistor, ohms.
pub const DIVIDER_R2_OHMS: f32 = 4700.0;

/// Sentinel returned when the sampled voltage is outside the usable window.
pub const LEVEL_INVALID: f32 = -1.0;

/// Runtime-mutable sender calibration plus the host ADC pin assignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FuelSensorConfig {
    /// Sender resistance with an empty tank, ohms.
    pub empty_ohms: f32,
    /// Sender resistance with a full tank, ohms.
    pub full_ohms: f32,
    /// Host ADC pin the divider is wired to.
    pub adc_pin: u8,
}

impl Default for FuelSensorConfig {
    fn default() -> Self {
        Self {
            empty_ohms: 10.0,
            full_ohms: 180.0,
            adc_pin: 34,
        }
    }
}

/// Host-provided analog sampling primitive; one call returns one raw count.
pub trait AnalogInput {
    fn read_counts(&mut self) -> u16;
}

/// Average `ADC_SAMPLES` raw counts and convert the result to a level.
pub fn sample_level<A: AnalogInput>(adc: &mut A, config: &FuelSensorConfig) -> f32 {
    let mut sum: u32 = 0;
    for _ in 0..ADC_SAMPLES {
        sum += u32::from(adc.read_counts());
    }
    let average = sum as f32 / ADC_SAMPLES as f32;
    let volts = (average / ADC_FULL_SCALE) * ADC_REF_VOLTS;
    level_from_volts(volts, config)
}

/// Convert a sampled divider voltage to a tank level.
///
/// Voltages at or beyond the reference, or at or below zero, cannot come
/// from a sender in circuit and yield [`LEVEL_INVALID`].
pub fn level_from_volts(volts: f32, config: &FuelSensorConfig) -> f32 {
    if volts >= ADC_REF_VOLTS || volts <= 0.0 {
        return LEVEL_INVALID;
    }
    let resistance = (volts * (DIVIDER_R1_OHMS + DIVIDER_R2_OHMS)) / (ADC_REF_VOLTS - volts);
    level_from_resistance(resistance, config)
}

/// Linear interpolation between the calibration endpoints, clamped to
/// [0, 100].
pub fn level_from_resistance(resistance: f32, config: &FuelSensorConfig) -> f32 {
    if resistance <= config.empty_ohms {
        return 0.0;
    }
    if resistance >= config.full_ohms {
        return 100.0;
    }
    let percent =
        (resistance - config.empty_ohms) / (config.full_ohms - config.empty_ohms) * 100.0;
    percent.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FuelSensorConfig {
        FuelSensorConfig::default()
    }

    #[test]
    fn endpoints_clamp_to_empty_and_full() {
        assert_eq!(level_from_resistance(5.0, &config()), 0.0);
        assert_eq!(level_from_resistance(10.0, &config()), 0.0);
        assert_eq!(level_from_resistance(180.0, &config()), 100.0);
        assert_eq!(level_from_resistance(400.0, &config()), 100.0);
    }

    #[test]
    fn midpoint_resistance_reads_half_tank() {
        let level = level_from_resistance(95.0, &config());
        assert!((level - 50.0).abs() < 0.01, "level = {level}");
    }

    #[test]
    fn out_of_range_voltage_is_sentinel() {
        assert_eq!(level_from_volts(0.0, &config()), LEVEL_INVALID);
        assert_eq!(level_from_volts(-0.1, &config()), LEVEL_INVALID);
        assert_eq!(level_from_volts(ADC_REF_VOLTS, &config()), LEVEL_INVALID);
        assert_eq!(level_from_volts(3.4, &config()), LEVEL_INVALID);
    }

    #[test]
    fn divider_inversion_matches_hand_calculation() {
        // R = V * (R1 + R2) / (Vref - V); pick V giving R = 95 ohms.
        let r = 95.0;
        let volts = ADC_REF_VOLTS * r / (DIVIDER_R1_OHMS + DIVIDER_R2_OHMS + r);
        let level = level_from_volts(volts, &config());
        assert!((level - 50.0).abs() < 0.1, "level = {level}");
    }

    #[test]
    fn recalibration_takes_effect_immediately() {
        let mut cfg = config();
        let before = level_from_resistance(95.0, &cfg);
        cfg.empty_ohms = 0.0;
        cfg.full_ohms = 95.0;
        let after = level_from_resistance(95.0, &cfg);
        assert!((before - 50.0).abs() < 0.01);
        assert_eq!(after, 100.0);
    }

    struct FixedAdc(u16);

    impl AnalogInput for FixedAdc {
        fn read_counts(&mut self) -> u16 {
            self.0
        }
    }

    #[test]
    fn sampler_averages_counts_and_converts() {
        // Full-scale counts put the voltage at the reference -> sentinel.
        assert_eq!(sample_level(&mut FixedAdc(4095), &config()), LEVEL_INVALID);
        // Zero counts -> zero volts -> sentinel.
        assert_eq!(sample_level(&mut FixedAdc(0), &config()), LEVEL_INVALID);
        // Mid-range counts land inside the calibrated window.
        let level = sample_level(&mut FixedAdc(80), &config());
        assert!((0.0..=100.0).contains(&level), "level = {level}");
    }
}
