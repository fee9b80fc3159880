//! In-memory SFR window used by the integration tests.
//!
//! Plain storage for every register, an access log for ordering and
//! must-not-touch assertions, plus a small behavioural model of the UART1
//! byte path: a receive FIFO feeding URXDA, and a transmit holding/shift
//! pair drained one frame at a time by [`FakeBus::advance_frame`].

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use pic24h_hal::SfrBus;

pub const IFS0: u16 = 0x0084;
pub const IEC0: u16 = 0x0094;
pub const IPC0: u16 = 0x00A4;
pub const IPC2: u16 = 0x00A8;
pub const IPC3: u16 = 0x00AA;
pub const TMR1: u16 = 0x0100;
pub const PR1: u16 = 0x0102;
pub const T1CON: u16 = 0x0104;
pub const U1MODE: u16 = 0x0220;
pub const U1STA: u16 = 0x0222;
pub const U1TXREG: u16 = 0x0224;
pub const U1RXREG: u16 = 0x0226;
pub const U1BRG: u16 = 0x0228;
pub const RPINR18: u16 = 0x06A4;
/// RPOR register holding RP19's output function in its high field.
pub const RPOR9: u16 = 0x06D2;

pub const URXDA: u16 = 1 << 0;
pub const TRMT: u16 = 1 << 8;
pub const UTXBF: u16 = 1 << 9;
pub const UTXEN: u16 = 1 << 10;
pub const UTXISEL1: u16 = 1 << 15;
pub const BRGH: u16 = 1 << 3;
pub const UARTEN: u16 = 1 << 15;

pub const U1RX_IRQ: u16 = 1 << 11;
pub const U1TX_IRQ: u16 = 1 << 12;
pub const T1_IRQ: u16 = 1 << 3;

/// One bus access, in driver order. Notes are injected by test handlers to
/// prove where they ran relative to the hardware traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Read(u16),
    Write(u16, u16),
    Note(&'static str),
}

/// Index of the first `Write(addr, value)` in the log.
pub fn first_write(log: &[Access], addr: u16, value: u16) -> usize {
    log.iter()
        .position(|a| *a == Access::Write(addr, value))
        .unwrap_or_else(|| panic!("no write of {value:#06X} to {addr:#06X}"))
}

/// Index of the last write to `addr`, whatever the value.
pub fn last_write_to(log: &[Access], addr: u16) -> usize {
    log.iter()
        .rposition(|a| matches!(a, Access::Write(reg, _) if *reg == addr))
        .unwrap_or_else(|| panic!("no write to {addr:#06X}"))
}

struct Inner {
    regs: Vec<u16>,
    log: Vec<Access>,
    rx_fifo: VecDeque<u8>,
    tx_holding: Option<u8>,
    tx_shift: Option<u8>,
    wire: Vec<u8>,
}

pub struct FakeBus {
    inner: Mutex<Inner>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                regs: vec![0; 0x400],
                log: Vec::new(),
                rx_fifo: VecDeque::new(),
                tx_holding: None,
                tx_shift: None,
                wire: Vec::new(),
            }),
        }
    }

    fn idx(addr: u16) -> usize {
        assert!(addr < 0x0800, "address {addr:#06X} outside the SFR window");
        usize::from(addr / 2)
    }

    /// Queues a byte on the receive side and latches U1RXIF, the way the
    /// receiver hardware would.
    pub fn push_rx(&self, byte: u8) {
        let mut inner = self.inner.lock().unwrap();
        inner.rx_fifo.push_back(byte);
        inner.regs[Self::idx(IFS0)] |= U1RX_IRQ;
    }

    /// Completes one frame time: the byte in the shift register reaches the
    /// wire and the next one loads from the holding register.
    pub fn advance_frame(&self) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(byte) = inner.tx_shift.take() {
            inner.wire.push(byte);
        }
        Self::load_shift(&mut inner);
    }

    pub fn advance_frames(&self, frames: usize) {
        for _ in 0..frames {
            self.advance_frame();
        }
    }

    /// Bytes that have fully left the shift register.
    pub fn wire(&self) -> Vec<u8> {
        self.inner.lock().unwrap().wire.clone()
    }

    /// Raw stored register value; not logged, no model side effects.
    pub fn reg(&self, addr: u16) -> u16 {
        self.inner.lock().unwrap().regs[Self::idx(addr)]
    }

    /// Stores a raw register value; not logged.
    pub fn set_reg(&self, addr: u16, value: u16) {
        self.inner.lock().unwrap().regs[Self::idx(addr)] = value;
    }

    pub fn accesses(&self) -> Vec<Access> {
        self.inner.lock().unwrap().log.clone()
    }

    pub fn clear_accesses(&self) {
        self.inner.lock().unwrap().log.clear();
    }

    /// Drops a marker into the access log.
    pub fn note(&self, tag: &'static str) {
        self.inner.lock().unwrap().log.push(Access::Note(tag));
    }

    // Holding register moves into the idle shift register only while UTXEN
    // is set; the transfer latches U1TXIF (UTXISEL = 0b10 semantics).
    fn load_shift(inner: &mut Inner) {
        let tx_enabled = inner.regs[Self::idx(U1STA)] & UTXEN != 0;
        if tx_enabled && inner.tx_shift.is_none() {
            if let Some(byte) = inner.tx_holding.take() {
                inner.tx_shift = Some(byte);
                inner.regs[Self::idx(IFS0)] |= U1TX_IRQ;
            }
        }
    }

    // URXDA, UTXBF and TRMT are read-only bits composed from model state.
    fn sta_view(inner: &Inner) -> u16 {
        let mut sta = inner.regs[Self::idx(U1STA)] & !(URXDA | UTXBF | TRMT);
        if !inner.rx_fifo.is_empty() {
            sta |= URXDA;
        }
        if inner.tx_holding.is_some() {
            sta |= UTXBF;
        }
        if inner.tx_holding.is_none() && inner.tx_shift.is_none() {
            sta |= TRMT;
        }
        sta
    }
}

impl SfrBus for FakeBus {
    fn read(&self, addr: u16) -> u16 {
        let mut inner = self.inner.lock().unwrap();
        inner.log.push(Access::Read(addr));
        match addr {
            U1RXREG => u16::from(inner.rx_fifo.pop_front().unwrap_or(0)),
            U1STA => Self::sta_view(&inner),
            _ => inner.regs[Self::idx(addr)],
        }
    }

    fn write(&self, addr: u16, value: u16) {
        let mut inner = self.inner.lock().unwrap();
        inner.log.push(Access::Write(addr, value));
        match addr {
            U1TXREG => {
                // a write to a full FIFO is dropped by the hardware
                if inner.tx_holding.is_none() {
                    inner.tx_holding = Some(value as u8);
                }
                Self::load_shift(&mut inner);
            }
            U1STA => {
                inner.regs[Self::idx(U1STA)] = value & !(URXDA | UTXBF | TRMT);
                Self::load_shift(&mut inner);
            }
            _ => inner.regs[Self::idx(addr)] = value,
        }
    }
}
