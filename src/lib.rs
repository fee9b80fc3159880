#![no_std]

//! Register-level UART and millisecond-timebase driver for PIC24H family
//! parts (PIC24HJ32GP202/204 register map).
//!
//! Channels form a closed enum; the block wired on this part is UART1, and
//! every operation on an unwired channel is a defined no-op, so callers
//! never fault on a missing peripheral. All hardware access goes through
//! [`SfrBus`], which a test harness or an emulator can implement over plain
//! memory.
//!
//! ```no_run
//! use pic24h_hal::{Channel, Config, Mmio, Uart};
//!
//! let uart = Uart::new(Mmio::DIRECT);
//! uart.init(Channel::Uart1, 9600, &Config::new(16_000_000)).unwrap();
//! uart.tx_byte(Channel::Uart1, b'+');
//! while !uart.done_transmitting(Channel::Uart1) {}
//! ```
//!
//! On the device, the interrupt vectors call into [`uart::dispatch`] and
//! [`timing::t1_interrupt`]; the embedding provides the `critical-section`
//! implementation.

use bitflags::bitflags;
use thiserror::Error;

mod sfr;
pub mod timing;
pub mod uart;

pub use sfr::{Mmio, SfrBus};
pub use timing::Timebase;
pub use uart::baud::{BaudConfig, Prescaler};
pub use uart::{Channel, Uart};

/// Configuration faults reported by the drivers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No BRG divisor reaches the requested rate from this clock.
    #[error("baud {baud} not reachable from {clock_hz} Hz within the 16-bit divisor")]
    BaudOutOfRange { clock_hz: u32, baud: u32 },
    /// Pin number outside the remappable range of this package.
    #[error("RP{0} is not a remappable pin on this package")]
    InvalidPin(u8),
    /// No 1 ms period fits the 16-bit timer period register.
    #[error("no 1 ms tick period reachable from {clock_hz} Hz")]
    TickPeriodOutOfRange { clock_hz: u32 },
}

/// Board wiring facts consumed by [`Uart::init`].
///
/// Pins are remappable-pin numbers (RPn). The defaults match the reference
/// board: U1TX on RP19, U1RX on RP17, both interrupts at priority 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub peripheral_clock_hz: u32,
    pub tx_pin: u8,
    pub rx_pin: u8,
    pub irq_priority: u8,
}

impl Config {
    pub const DEFAULT_TX_PIN: u8 = 19;
    pub const DEFAULT_RX_PIN: u8 = 17;
    pub const DEFAULT_IRQ_PRIORITY: u8 = 3;

    pub const fn new(peripheral_clock_hz: u32) -> Self {
        Self {
            peripheral_clock_hz,
            tx_pin: Self::DEFAULT_TX_PIN,
            rx_pin: Self::DEFAULT_RX_PIN,
            irq_priority: Self::DEFAULT_IRQ_PRIORITY,
        }
    }

    pub const fn tx_pin(mut self, pin: u8) -> Self {
        self.tx_pin = pin;
        self
    }

    pub const fn rx_pin(mut self, pin: u8) -> Self {
        self.rx_pin = pin;
        self
    }

    /// Priority of both UART vectors (3-bit INTC field).
    pub const fn irq_priority(mut self, level: u8) -> Self {
        self.irq_priority = level;
        self
    }
}

bitflags! {
    /// UxSTA status bits; flag values equal the hardware bit positions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineStatus: u16 {
        const DATA_READY = 1 << 0;
        const RX_OVERRUN = 1 << 1;
        const FRAMING_ERROR = 1 << 2;
        const PARITY_ERROR = 1 << 3;
        const RX_IDLE = 1 << 4;
        const TX_SHIFT_EMPTY = 1 << 8;
        const TX_FULL = 1 << 9;
    }
}

impl LineStatus {
    pub fn can_read(&self) -> bool {
        self.contains(LineStatus::DATA_READY)
    }

    pub fn can_write(&self) -> bool {
        !self.contains(LineStatus::TX_FULL)
    }
}
