use genbus::link::MAX_CONSECUTIVE_ERRORS;
use genbus::registers::status;
use genbus::{GensetController, SimulatedUnit};
use std::time::Duration;

fn controller_with(unit: SimulatedUnit) -> GensetController<SimulatedUnit> {
    GensetController::new(unit, 1)
}

#[cfg(test)]
mod identity_probe_tests {
    use super::*;

    #[test]
    fn test_known_identity_code_is_accepted() {
        let mut unit = SimulatedUnit::new();
        unit.set_word(status::DEVICE_IDENTITY.address, 0xD300);

        let mut controller = controller_with(unit);
        assert!(controller.probe_identity());
    }

    #[test]
    fn test_every_family_code_is_accepted() {
        for code in [0xD300u16, 0xD500, 0xD700] {
            let mut unit = SimulatedUnit::new();
            unit.set_word(status::DEVICE_IDENTITY.address, code);

            let mut controller = controller_with(unit);
            assert!(controller.probe_identity(), "code {code:#06x}");
        }
    }

    #[test]
    fn test_unexpected_code_is_rejected_despite_successful_read() {
        let mut unit = SimulatedUnit::new();
        unit.set_word(status::DEVICE_IDENTITY.address, 0x1234);

        let mut controller = controller_with(unit);
        assert!(!controller.probe_identity());
        // The read itself completed, so the error counter is untouched.
        assert_eq!(controller.link().consecutive_errors(), 0);
    }

    #[test]
    fn test_failed_identity_read_is_rejected_and_counted() {
        let mut controller = controller_with(SimulatedUnit::with_idle_image());
        controller.bus_mut().set_offline(true);

        assert!(!controller.probe_identity());
        assert_eq!(controller.link().consecutive_errors(), 1);
    }

    #[test]
    fn test_init_polls_only_after_identity_accepted() {
        let mut controller = controller_with(SimulatedUnit::with_idle_image());
        assert!(controller.init());
        assert!((controller.engine().battery_voltage - 13.8).abs() < f32::EPSILON);

        let mut imposter = SimulatedUnit::new();
        imposter.set_word(status::DEVICE_IDENTITY.address, 0x1234);
        let mut controller = controller_with(imposter);
        assert!(!controller.init());
    }
}

#[cfg(test)]
mod error_counter_tests {
    use super::*;

    #[test]
    fn test_five_failures_degrade_then_one_success_recovers() {
        let mut controller = controller_with(SimulatedUnit::with_idle_image());
        controller.bus_mut().fail_next_reads(u32::from(MAX_CONSECUTIVE_ERRORS));

        for attempt in 1..=MAX_CONSECUTIVE_ERRORS {
            assert!(!controller.probe_identity());
            assert_eq!(controller.link().consecutive_errors(), attempt);
        }
        assert!(!controller.is_connected());

        // The sixth call succeeds: counter resets, connected flips back.
        assert!(controller.probe_identity());
        assert_eq!(controller.link().consecutive_errors(), 0);
        assert!(controller.is_connected());
    }

    #[test]
    fn test_four_failures_leave_link_healthy() {
        let mut controller = controller_with(SimulatedUnit::with_idle_image());
        assert!(controller.probe_identity());

        controller
            .bus_mut()
            .fail_next_reads(u32::from(MAX_CONSECUTIVE_ERRORS) - 1);
        for _ in 0..MAX_CONSECUTIVE_ERRORS - 1 {
            controller.probe_identity();
        }
        assert!(controller.is_connected());
    }

    #[test]
    fn test_write_failures_feed_the_same_counter() {
        let mut controller = controller_with(SimulatedUnit::with_idle_image());
        assert!(controller.probe_identity());

        controller
            .bus_mut()
            .fail_next_writes(u32::from(MAX_CONSECUTIVE_ERRORS));
        for _ in 0..MAX_CONSECUTIVE_ERRORS {
            assert!(!controller.stop_generator());
        }
        assert!(!controller.is_connected());

        assert!(controller.stop_generator());
        assert!(controller.is_connected());
    }
}

#[cfg(test)]
mod service_tick_tests {
    use super::*;

    #[test]
    fn test_first_service_call_runs_a_pass() {
        let mut controller = controller_with(SimulatedUnit::with_idle_image());
        assert!(controller.service());
        assert!((controller.engine().battery_voltage - 13.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_service_waits_for_the_configured_interval() {
        let mut controller = controller_with(SimulatedUnit::with_idle_image());
        assert!(controller.service());
        // Default interval is seconds; an immediate second tick is a no-op.
        assert!(!controller.service());

        controller.set_poll_interval(Duration::ZERO);
        assert!(controller.service());
    }

    #[test]
    fn test_auto_poll_disabled_suppresses_service() {
        let mut controller = controller_with(SimulatedUnit::with_idle_image());
        controller.set_auto_poll(false);
        assert!(!controller.service());

        controller.set_auto_poll(true);
        assert!(controller.service());
    }
}

#[cfg(test)]
mod configuration_tests {
    use super::*;

    #[test]
    fn test_unit_address_range_is_enforced() {
        let mut controller = controller_with(SimulatedUnit::new());
        assert!(!controller.set_unit_address(0));
        assert!(!controller.set_unit_address(241));
        assert_eq!(controller.unit_address(), 1);

        assert!(controller.set_unit_address(240));
        assert_eq!(controller.unit_address(), 240);
        assert_eq!(controller.bus_mut().unit_address(), 240);
    }

    #[test]
    fn test_constructor_clamps_out_of_range_addresses() {
        let mut controller = GensetController::new(SimulatedUnit::new(), 0);
        assert_eq!(controller.unit_address(), 1);
        assert_eq!(controller.bus_mut().unit_address(), 1);

        let mut controller = GensetController::new(SimulatedUnit::new(), 255);
        assert_eq!(controller.unit_address(), 240);
        assert_eq!(controller.bus_mut().unit_address(), 240);

        // A clamped controller stays reachable through the setter.
        assert!(controller.set_unit_address(7));
        assert_eq!(controller.unit_address(), 7);
    }

    #[test]
    fn test_link_state_export_reflects_configuration() {
        let mut controller = controller_with(SimulatedUnit::new());
        controller.set_poll_interval(Duration::from_millis(250));
        controller.set_auto_poll(false);

        let state = controller.link().state();
        assert_eq!(state.poll_interval_ms, 250);
        assert!(!state.auto_poll);
        assert!(!state.connected);
        assert_eq!(state.consecutive_errors, 0);
    }
}
