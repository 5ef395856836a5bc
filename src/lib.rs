//! # genbus
//!
//! Register-mapped telemetry acquisition and control engine for D-300 family
//! generator controllers spoken to over a Modbus-RTU-style master transport.
//!
//! ## Features
//!
//! - **Catalog-driven acquisition**: one declarative register table, one
//!   generic decode path, last-known-good semantics on read failures
//! - **Link health tracking**: consecutive-failure counting with a single
//!   degraded threshold, plus an identity liveness probe
//! - **Derived state**: alarm-class range scans, run-range classification,
//!   mains-present and system-healthy composites
//! - **Command encoding**: named control intents to single-register writes
//! - **Exchange documents**: full and basic JSON reports
//!
//! ## Quick start
//!
//! ```rust
//! use genbus::{GensetController, SimulatedUnit};
//!
//! let mut controller = GensetController::new(SimulatedUnit::with_idle_image(), 1);
//!
//! if controller.init() {
//!     println!("battery: {:.1} V", controller.engine().battery_voltage);
//!     println!("running: {}", controller.is_generator_running());
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`transport`] - the master read/write primitive seam
//! - [`registers`] - the immutable register catalog
//! - [`link`] - consecutive-failure link health machine
//! - [`state`] - the owned domain snapshot types
//! - [`controller`] - acquisition engine, classifier and command encoder
//! - [`report`] - full/basic exchange documents
//! - [`fuel`] - auxiliary resistive fuel-sender math
//! - [`sim`] - in-memory bus for tests and demos

#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod controller;
pub mod fuel;
pub mod link;
pub mod registers;
pub mod report;
pub mod sim;
pub mod state;
pub mod transport;

// Re-export main public types for convenience
pub use controller::{ControlIntent, GensetController};
pub use link::{LinkMonitor, LinkState};
pub use registers::{AlarmClass, PanelButton, RegisterDef, RegisterWidth};
pub use report::{BasicReport, FullReport, ReportWriter};
pub use sim::SimulatedUnit;
pub use state::{HarmonicChannel, OperatingMode, OperatingState};
pub use transport::{BusError, RegisterBus, WordBuffer};
