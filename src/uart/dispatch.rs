//! Interrupt plumbing.
//!
//! The application registers one handler per direction; the vector bodies
//! run the handler first, while the hardware flag still reflects the event,
//! and clear the flag last. A vector with no registered handler still clears
//! the flag so the interrupt does not refire forever.

use core::cell::Cell;

use critical_section::Mutex;

use super::{Channel, Uart};
use crate::sfr::{Mmio, SfrBus};

/// Byte-event callback; the channel that raised the interrupt is passed in.
pub type ByteHandler = fn(Channel);

static RX_HANDLER: Mutex<Cell<Option<ByteHandler>>> = Mutex::new(Cell::new(None));
static TX_HANDLER: Mutex<Cell<Option<ByteHandler>>> = Mutex::new(Cell::new(None));

/// Registers the receive handler. It runs in interrupt context and should
/// drain UxRXREG before returning.
pub fn set_rx_handler(handler: ByteHandler) {
    critical_section::with(|cs| RX_HANDLER.borrow(cs).set(Some(handler)));
}

/// Registers the transmit handler. It runs in interrupt context whenever the
/// holding register empties and may refill UxTXREG.
pub fn set_tx_handler(handler: ByteHandler) {
    critical_section::with(|cs| TX_HANDLER.borrow(cs).set(Some(handler)));
}

fn rx_handler() -> Option<ByteHandler> {
    critical_section::with(|cs| RX_HANDLER.borrow(cs).get())
}

fn tx_handler() -> Option<ByteHandler> {
    critical_section::with(|cs| TX_HANDLER.borrow(cs).get())
}

impl<B: SfrBus> Uart<B> {
    /// Receive vector body: handler first (URXDA is still valid), flag
    /// clear last.
    ///
    /// A byte arriving after the handler drained the FIFO but before the
    /// flag clear stays in the FIFO and is seen by the next poll of
    /// [`Uart::data_available`], not by a fresh interrupt.
    pub fn rx_interrupt(&self, channel: Channel) {
        if let Some(handler) = rx_handler() {
            handler(channel);
        }
        self.clear_rx_flag(channel);
    }

    /// Transmit vector body: handler first, flag clear last.
    pub fn tx_interrupt(&self, channel: Channel) {
        if let Some(handler) = tx_handler() {
            handler(channel);
        }
        self.clear_tx_flag(channel);
    }
}

/// `U1RXInterrupt` vector body for the running device.
pub fn u1rx_interrupt() {
    Uart::new(Mmio::DIRECT).rx_interrupt(Channel::Uart1);
}

/// `U1TXInterrupt` vector body for the running device.
pub fn u1tx_interrupt() {
    Uart::new(Mmio::DIRECT).tx_interrupt(Channel::Uart1);
}
