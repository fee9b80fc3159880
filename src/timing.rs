//! 1 ms timebase on Timer1.
//!
//! [`Timebase::init`] programs Timer1 to roll over once per millisecond
//! (PR1 = clock / 1000 - 1, internal clock, 1:1 prescale) and enables its
//! interrupt. The vector body runs the registered tick handler, then clears
//! T1IF.

use core::cell::Cell;

use critical_section::Mutex;
use tock_registers::register_bitfields;

use crate::sfr::{IrqLine, Mmio, SfrBus, IEC0, IFS0, IPC0};
use crate::ConfigError;

/// Tick rate programmed by [`Timebase::init`].
pub const TICK_HZ: u32 = 1_000;

// Timer1 block.
const TMR1: u16 = 0x0100;
const PR1: u16 = 0x0102;
const T1CON: u16 = 0x0104;

const T1_IRQ: IrqLine = IrqLine::new(IFS0, IEC0, 3, IPC0, 12); // IPC0<14:12>

register_bitfields![u16,
    /// T1CON
    TCON [
        TCS OFFSET(1) NUMBITS(1) [],
        TSYNC OFFSET(2) NUMBITS(1) [],
        TCKPS OFFSET(4) NUMBITS(2) [],
        TGATE OFFSET(6) NUMBITS(1) [],
        TSIDL OFFSET(13) NUMBITS(1) [],
        TON OFFSET(15) NUMBITS(1) []
    ]
];

static TICK_HANDLER: Mutex<Cell<Option<fn()>>> = Mutex::new(Cell::new(None));

/// Registers the 1 kHz tick callback. It runs in interrupt context.
pub fn set_tick_handler(handler: fn()) {
    critical_section::with(|cs| TICK_HANDLER.borrow(cs).set(Some(handler)));
}

fn tick_handler() -> Option<fn()> {
    critical_section::with(|cs| TICK_HANDLER.borrow(cs).get())
}

/// Millisecond timebase over an SFR bus.
pub struct Timebase<B> {
    bus: B,
}

impl<B: SfrBus> Timebase<B> {
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Programs Timer1 for a 1 ms period at `priority` and starts it.
    ///
    /// The period is validated before the first register write: clocks whose
    /// millisecond does not fit the 16-bit period register are reported and
    /// the timer is left alone.
    pub fn init(&self, peripheral_clock_hz: u32, priority: u8) -> Result<(), ConfigError> {
        let counts = peripheral_clock_hz / TICK_HZ;
        if counts == 0 || counts > u32::from(u16::MAX) + 1 {
            return Err(ConfigError::TickPeriodOutOfRange {
                clock_hz: peripheral_clock_hz,
            });
        }

        self.bus.write(T1CON, 0); // stop, internal clock, 1:1 prescale
        self.bus.write(TMR1, 0);
        self.bus.write(PR1, (counts - 1) as u16);

        T1_IRQ.set_priority(&self.bus, priority);
        T1_IRQ.clear_flag(&self.bus);
        T1_IRQ.enable(&self.bus);

        self.bus.write(T1CON, TCON::TON::SET.value);

        log::debug!(
            "timer1: 1 ms tick, {} counts at {} Hz",
            counts,
            peripheral_clock_hz
        );
        Ok(())
    }

    /// Timer1 vector body: tick handler first, T1IF cleared last.
    pub fn tick_interrupt(&self) {
        if let Some(handler) = tick_handler() {
            handler();
        }
        T1_IRQ.clear_flag(&self.bus);
    }
}

/// `T1Interrupt` vector body for the running device.
pub fn t1_interrupt() {
    Timebase::new(Mmio::DIRECT).tick_interrupt();
}
