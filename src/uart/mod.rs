//! UART channel driver.
//!
//! One logical [`Channel`] per UART block. The part modeled here wires only
//! UART1; UART2 exists in the family and stays a defined no-op variant, so
//! callers (and tests) can exercise the unsupported path without faulting.
//!
//! The driver is a stateless layer over the SFR bus: every operation takes
//! the channel, looks its register block up, and performs the one or two
//! accesses the data sheet asks for. Operations on an unwired channel touch
//! no register at all; queries answer with the quiet value (false, 0, empty).

pub mod baud;
pub mod dispatch;
mod registers;

use tock_registers::fields::FieldValue;
use tock_registers::RegisterLongName;

use crate::sfr::{IrqLine, SfrBus, IEC0, IFS0, IPC2, IPC3};
use crate::{Config, ConfigError, LineStatus};
use baud::Prescaler;
use registers::{MODE, STA};

/// Logical UART channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Uart1,
    Uart2,
}

impl Channel {
    /// Register block of the channel; `None` when it is not wired on this
    /// part.
    fn regs(self) -> Option<&'static ChannelRegs> {
        match self {
            Channel::Uart1 => Some(&UART1),
            Channel::Uart2 => None,
        }
    }
}

/// SFR addresses and interrupt lines of one UART block.
struct ChannelRegs {
    mode: u16,
    sta: u16,
    txreg: u16,
    rxreg: u16,
    brg: u16,
    /// RPINR register carrying the UxRX source field.
    rx_pin_select: u16,
    /// RPOR function code of this channel's TX output.
    tx_function: u16,
    rx_irq: IrqLine,
    tx_irq: IrqLine,
}

static UART1: ChannelRegs = ChannelRegs {
    mode: registers::U1MODE,
    sta: registers::U1STA,
    txreg: registers::U1TXREG,
    rxreg: registers::U1RXREG,
    brg: registers::U1BRG,
    rx_pin_select: registers::RPINR18,
    tx_function: registers::U1TX_FUNCTION,
    rx_irq: IrqLine::new(
        IFS0,
        IEC0,
        registers::U1RX_IRQ_BIT,
        IPC2,
        registers::U1RX_PRIORITY_SHIFT,
    ),
    tx_irq: IrqLine::new(
        IFS0,
        IEC0,
        registers::U1TX_IRQ_BIT,
        IPC3,
        registers::U1TX_PRIORITY_SHIFT,
    ),
};

/// UART driver over an SFR bus.
pub struct Uart<B> {
    bus: B,
}

impl<B: SfrBus> Uart<B> {
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Brings a channel up: pins, interrupt priorities, baud, receive
    /// interrupt, transmitter.
    ///
    /// Pin numbers and the baud setting are validated before the first
    /// register write, so on error the hardware is left untouched. An
    /// unsupported channel logs a warning and succeeds without touching
    /// anything.
    pub fn init(&self, channel: Channel, baud: u32, config: &Config) -> Result<(), ConfigError> {
        let Some(regs) = channel.regs() else {
            log::warn!("{channel:?}: not wired on this part, init skipped");
            return Ok(());
        };

        if config.tx_pin > registers::RP_PIN_MAX {
            return Err(ConfigError::InvalidPin(config.tx_pin));
        }
        if config.rx_pin > registers::RP_PIN_MAX {
            return Err(ConfigError::InvalidPin(config.rx_pin));
        }
        let setting = baud::select(config.peripheral_clock_hz, baud)?;

        self.route_tx(regs, config.tx_pin);
        self.route_rx(regs, config.rx_pin);

        regs.rx_irq.set_priority(&self.bus, config.irq_priority);
        regs.tx_irq.set_priority(&self.bus, config.irq_priority);

        // TX interrupt when the holding register empties (UTXISEL = 0b10)
        self.bus.write(regs.sta, STA::UTXISEL1::SET.value);

        self.disable(channel);
        self.program_baud(regs, setting);
        self.clear_rx_flag(channel);
        self.enable_rx_interrupt(channel);
        self.enable(channel);
        self.tx_enable(channel);

        log::debug!(
            "{:?}: {} baud requested, {} achieved (divisor {}, 1:{})",
            channel,
            baud,
            setting.actual_baud(config.peripheral_clock_hz),
            setting.divisor,
            setting.prescaler.factor(),
        );
        Ok(())
    }

    /// Turns the channel on (UARTEN).
    pub fn enable(&self, channel: Channel) {
        if let Some(regs) = channel.regs() {
            self.modify(regs.mode, MODE::UARTEN::SET);
        }
    }

    /// Turns the channel off. Safe to call repeatedly.
    pub fn disable(&self, channel: Channel) {
        if let Some(regs) = channel.regs() {
            self.modify(regs.mode, MODE::UARTEN::CLEAR);
        }
    }

    /// Releases the transmitter (UTXEN). The channel itself must also be
    /// enabled before anything leaves the pin.
    pub fn tx_enable(&self, channel: Channel) {
        if let Some(regs) = channel.regs() {
            self.modify(regs.sta, STA::UTXEN::SET);
        }
    }

    pub fn enable_rx_interrupt(&self, channel: Channel) {
        if let Some(regs) = channel.regs() {
            regs.rx_irq.enable(&self.bus);
        }
    }

    pub fn disable_rx_interrupt(&self, channel: Channel) {
        if let Some(regs) = channel.regs() {
            regs.rx_irq.disable(&self.bus);
        }
    }

    pub fn enable_tx_interrupt(&self, channel: Channel) {
        if let Some(regs) = channel.regs() {
            regs.tx_irq.enable(&self.bus);
        }
    }

    pub fn disable_tx_interrupt(&self, channel: Channel) {
        if let Some(regs) = channel.regs() {
            regs.tx_irq.disable(&self.bus);
        }
    }

    pub fn rx_interrupt_enabled(&self, channel: Channel) -> bool {
        match channel.regs() {
            Some(regs) => regs.rx_irq.is_enabled(&self.bus),
            None => false,
        }
    }

    pub fn tx_interrupt_enabled(&self, channel: Channel) -> bool {
        match channel.regs() {
            Some(regs) => regs.tx_irq.is_enabled(&self.bus),
            None => false,
        }
    }

    /// Queues one byte on the transmit FIFO. No readiness check: callers
    /// poll [`Uart::space_available`] first, the hardware drops the write
    /// when the FIFO is full.
    pub fn tx_byte(&self, channel: Channel, byte: u8) {
        if let Some(regs) = channel.regs() {
            self.bus.write(regs.txreg, u16::from(byte));
        }
    }

    /// Pops the oldest received byte (0 when the channel is not wired).
    pub fn rx_byte(&self, channel: Channel) -> u8 {
        match channel.regs() {
            Some(regs) => self.bus.read(regs.rxreg) as u8,
            None => 0,
        }
    }

    /// Acknowledges the receive interrupt.
    pub fn clear_rx_flag(&self, channel: Channel) {
        if let Some(regs) = channel.regs() {
            regs.rx_irq.clear_flag(&self.bus);
        }
    }

    /// Acknowledges the transmit interrupt.
    pub fn clear_tx_flag(&self, channel: Channel) {
        if let Some(regs) = channel.regs() {
            regs.tx_irq.clear_flag(&self.bus);
        }
    }

    /// A received byte is waiting (URXDA).
    pub fn data_available(&self, channel: Channel) -> bool {
        match channel.regs() {
            Some(regs) => STA::URXDA.is_set(self.bus.read(regs.sta)),
            None => false,
        }
    }

    /// The transmit FIFO can take another byte (!UTXBF).
    pub fn space_available(&self, channel: Channel) -> bool {
        match channel.regs() {
            Some(regs) => !STA::UTXBF.is_set(self.bus.read(regs.sta)),
            None => false,
        }
    }

    /// Shift register idle and FIFO empty (TRMT): the last byte has fully
    /// left the pin.
    pub fn done_transmitting(&self, channel: Channel) -> bool {
        match channel.regs() {
            Some(regs) => STA::TRMT.is_set(self.bus.read(regs.sta)),
            None => false,
        }
    }

    /// Snapshot of the UxSTA status bits.
    pub fn line_status(&self, channel: Channel) -> LineStatus {
        match channel.regs() {
            Some(regs) => LineStatus::from_bits_truncate(self.bus.read(regs.sta)),
            None => LineStatus::empty(),
        }
    }

    /// Routes the channel's TX function code onto RPn. Even pins sit in the
    /// low field of their RPOR register, odd pins in the high field.
    fn route_tx(&self, regs: &ChannelRegs, pin: u8) {
        let rpor = registers::RPOR_BASE + u16::from(pin / 2) * 2;
        let shift = if pin % 2 == 1 { 8 } else { 0 };
        let current = self.bus.read(rpor);
        self.bus.write(
            rpor,
            (current & !(registers::RPOR_FUNCTION_MASK << shift)) | (regs.tx_function << shift),
        );
    }

    /// Selects RPn as the channel's RX source.
    fn route_rx(&self, regs: &ChannelRegs, pin: u8) {
        let rpinr = self.bus.read(regs.rx_pin_select);
        self.bus.write(
            regs.rx_pin_select,
            (rpinr & !registers::RPINR_SOURCE_MASK) | u16::from(pin),
        );
    }

    fn program_baud(&self, regs: &ChannelRegs, setting: baud::BaudConfig) {
        let brgh = match setting.prescaler {
            Prescaler::Div4 => MODE::BRGH::SET,
            Prescaler::Div16 => MODE::BRGH::CLEAR,
        };
        self.modify(regs.mode, brgh);
        self.bus.write(regs.brg, setting.divisor);
    }

    /// Read-modify-write of one SFR through a typed field value.
    fn modify<R: RegisterLongName>(&self, addr: u16, field: FieldValue<u16, R>) {
        let value = self.bus.read(addr);
        self.bus.write(addr, field.modify(value));
    }
}
