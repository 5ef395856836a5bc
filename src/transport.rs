use heapless::Vec;
use thiserror::Error;

/// Largest contiguous register read the engine ever issues (32-bit
/// quantities are two words; the margin covers future grouped reads).
pub const MAX_READ_WORDS: usize = 8;

/// Bounded response buffer returned by holding-register reads.
pub type WordBuffer = Vec<u16, MAX_READ_WORDS>;

/// Failure signal from the master transport.
///
/// The engine treats every variant uniformly (one failed operation); the
/// distinction exists for logging and for transport implementations that
/// want to report what actually went wrong on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("request timed out")]
    Timeout,
    #[error("device returned exception code {0}")]
    Exception(u8),
    #[error("malformed or incomplete response")]
    InvalidResponse,
    #[error("requested count exceeds transport buffer")]
    RequestTooLarge,
}

/// Master-side request/response primitive over holding registers.
///
/// Implementations own framing, addressing, checksum validation and timeout
/// policy. Calls are synchronous and blocking; the bus is half-duplex with
/// one outstanding request at a time, so `&mut self` is the honest contract.
pub trait RegisterBus {
    /// Read `count` contiguous 16-bit holding registers starting at `address`.
    fn read_holding(&mut self, address: u16, count: u16) -> Result<WordBuffer, BusError>;

    /// Write a single 16-bit holding register.
    fn write_single(&mut self, address: u16, value: u16) -> Result<(), BusError>;

    /// Retarget the transport at a different unit address (1..=240).
    fn set_unit_address(&mut self, address: u8);
}
