use genbus::registers::{electrical, engine, status, ALARM_SCAN_TABLE};
use genbus::{GensetController, OperatingState, SimulatedUnit};

fn controller_with(unit: SimulatedUnit) -> GensetController<SimulatedUnit> {
    GensetController::new(unit, 1)
}

#[cfg(test)]
mod alarm_scan_tests {
    use super::*;

    #[test]
    fn test_nonzero_register_raises_only_its_class_flag() {
        let mut unit = SimulatedUnit::with_idle_image();
        unit.set_word(10510, 0x0004); // inside the shutdown range

        let mut controller = controller_with(unit);
        controller.poll_core();

        assert!(controller.status().shutdown_alarm);
        assert!(!controller.status().load_dump_alarm);
        assert!(!controller.status().warning_alarm);
        assert!(controller.status().any_alarm());
    }

    #[test]
    fn test_each_range_maps_to_its_class() {
        let mut unit = SimulatedUnit::with_idle_image();
        unit.set_word(10520, 1); // first load-dump register
        unit.set_word(10551, 1); // last warning register

        let mut controller = controller_with(unit);
        controller.poll_core();

        assert!(!controller.status().shutdown_alarm);
        assert!(controller.status().load_dump_alarm);
        assert!(controller.status().warning_alarm);
    }

    #[test]
    fn test_flags_are_recomputed_wholesale_each_pass() {
        let mut unit = SimulatedUnit::with_idle_image();
        unit.set_word(10504, 0x8000);

        let mut controller = controller_with(unit);
        controller.poll_core();
        assert!(controller.status().shutdown_alarm);

        controller.bus_mut().set_word(10504, 0);
        controller.poll_core();
        assert!(!controller.status().shutdown_alarm);
    }

    #[test]
    fn test_failed_reads_do_not_abort_the_scan() {
        let mut unit = SimulatedUnit::with_idle_image();
        // The first four shutdown registers fail, a later one is alarming.
        for address in 10504..=10507 {
            unit.set_register_fault(address, true);
        }
        unit.set_word(10510, 1);

        let mut controller = controller_with(unit);
        controller.poll_core();

        assert!(controller.status().shutdown_alarm);
    }

    #[test]
    fn test_offline_scan_masks_a_previously_raised_alarm() {
        // Preserved source behavior: a failed read contributes nothing, so a
        // dead bus clears the flag. The degraded condition stays visible
        // through the connected flag.
        let mut unit = SimulatedUnit::with_idle_image();
        unit.set_word(10504, 1);

        let mut controller = controller_with(unit);
        controller.poll_core();
        assert!(controller.status().shutdown_alarm);

        controller.bus_mut().set_offline(true);
        controller.poll_core();
        assert!(!controller.status().shutdown_alarm);
        assert!(!controller.is_connected());
    }

    #[test]
    fn test_scan_table_covers_all_three_classes() {
        assert_eq!(ALARM_SCAN_TABLE.len(), 3);
    }
}

#[cfg(test)]
mod run_state_tests {
    use super::*;

    #[test]
    fn test_running_follows_the_state_register() {
        let mut controller = controller_with(SimulatedUnit::with_idle_image());
        controller.poll_core();
        assert_eq!(controller.status().state, OperatingState::EngineAtRest);
        assert!(!controller.is_generator_running());

        controller.bus_mut().set_word(status::OPERATING_STATE.address, 8);
        controller.poll_core();
        assert_eq!(controller.status().state, OperatingState::RunningOffLoad);
        assert!(controller.is_generator_running());
    }

    #[test]
    fn test_cranking_and_cooldown_are_not_running() {
        let mut controller = controller_with(SimulatedUnit::with_idle_image());

        controller.bus_mut().set_word(status::OPERATING_STATE.address, 5);
        controller.poll_core();
        assert!(!controller.is_generator_running());

        controller.bus_mut().set_word(status::OPERATING_STATE.address, 22);
        controller.poll_core();
        assert!(!controller.is_generator_running());
    }

    #[test]
    fn test_unknown_state_code_is_preserved_and_not_running() {
        let mut controller = controller_with(SimulatedUnit::with_idle_image());
        controller.bus_mut().set_word(status::OPERATING_STATE.address, 77);
        controller.poll_core();

        assert_eq!(controller.status().state, OperatingState::Unknown(77));
        assert!(!controller.is_generator_running());
    }
}

#[cfg(test)]
mod mains_present_tests {
    use super::*;

    fn mains_unit(avg_volts: f32, freq_hz: f32) -> SimulatedUnit {
        let mut unit = SimulatedUnit::with_idle_image();
        unit.set_scaled(electrical::MAINS_AVG_VOLTAGE, avg_volts);
        unit.set_scaled(electrical::MAINS_FREQUENCY, freq_hz);
        unit
    }

    #[test]
    fn test_healthy_mains_is_present() {
        let mut controller = controller_with(mains_unit(150.0, 50.0));
        controller.poll_core();
        assert!(controller.is_mains_present());
    }

    #[test]
    fn test_frequency_outside_window_means_absent() {
        let mut controller = controller_with(mains_unit(150.0, 70.0));
        controller.poll_core();
        assert!(!controller.is_mains_present());
    }

    #[test]
    fn test_window_bounds_are_strict() {
        for freq in [45.0, 65.0] {
            let mut controller = controller_with(mains_unit(150.0, freq));
            controller.poll_core();
            assert!(!controller.is_mains_present(), "freq {freq}");
        }
    }

    #[test]
    fn test_low_voltage_means_absent() {
        let mut controller = controller_with(mains_unit(90.0, 50.0));
        controller.poll_core();
        assert!(!controller.is_mains_present());
    }
}

#[cfg(test)]
mod system_health_tests {
    use super::*;

    #[test]
    fn test_idle_unit_with_good_battery_is_healthy() {
        let mut controller = controller_with(SimulatedUnit::with_idle_image());
        controller.poll_core();
        // Engine at rest, so zero oil pressure does not count against it.
        assert!(controller.is_system_healthy());
    }

    #[test]
    fn test_shutdown_alarm_always_means_unhealthy() {
        let mut unit = SimulatedUnit::with_idle_image();
        unit.set_word(10504, 1);

        let mut controller = controller_with(unit);
        controller.poll_core();
        assert!(controller.is_connected());
        assert!(!controller.is_system_healthy());
    }

    #[test]
    fn test_low_battery_means_unhealthy() {
        let mut unit = SimulatedUnit::with_idle_image();
        unit.set_scaled(engine::BATTERY_VOLTAGE, 9.5);

        let mut controller = controller_with(unit);
        controller.poll_core();
        assert!(!controller.is_system_healthy());
    }

    #[test]
    fn test_oil_pressure_only_matters_while_running() {
        let mut unit = SimulatedUnit::with_idle_image();
        unit.set_word(status::OPERATING_STATE.address, 8);
        unit.set_scaled(engine::OIL_PRESSURE, 0.2);

        let mut controller = controller_with(unit);
        controller.poll_core();
        assert!(controller.is_generator_running());
        assert!(!controller.is_system_healthy());

        controller.bus_mut().set_scaled(engine::OIL_PRESSURE, 4.1);
        controller.poll_core();
        assert!(controller.is_system_healthy());
    }

    #[test]
    fn test_degraded_link_means_unhealthy() {
        let mut controller = controller_with(SimulatedUnit::with_idle_image());
        controller.poll_core();
        assert!(controller.is_system_healthy());

        controller.bus_mut().set_offline(true);
        controller.poll_core();
        assert!(!controller.is_system_healthy());
    }
}
