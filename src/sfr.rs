//! SFR window access.
//!
//! Every driver in this crate reaches the hardware through [`SfrBus`], so a
//! test harness or an emulator can substitute an in-memory register file for
//! the real 16-bit SFR space.

use core::ptr;

/// 16-bit special-function-register bus.
///
/// Addresses are data-space addresses from the device data sheet (U1MODE at
/// 0x0220 and so on). Implementations perform exactly one access per call;
/// the drivers rely on that for flag and FIFO-backed registers.
pub trait SfrBus {
    fn read(&self, addr: u16) -> u16;
    fn write(&self, addr: u16, value: u16);
}

impl<T: SfrBus + ?Sized> SfrBus for &T {
    fn read(&self, addr: u16) -> u16 {
        (**self).read(addr)
    }

    fn write(&self, addr: u16, value: u16) {
        (**self).write(addr, value)
    }
}

/// Memory-mapped SFR window.
///
/// `base` is added to every SFR address; on the device itself the window
/// starts at zero ([`Mmio::DIRECT`]). Accesses are volatile and only
/// meaningful where the window is actually mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// The un-offset window of the running device.
    pub const DIRECT: Mmio = Mmio { base: 0 };

    pub const fn new(base: usize) -> Self {
        Self { base }
    }
}

impl SfrBus for Mmio {
    fn read(&self, addr: u16) -> u16 {
        unsafe { ptr::read_volatile((self.base + addr as usize) as *const u16) }
    }

    fn write(&self, addr: u16, value: u16) {
        unsafe { ptr::write_volatile((self.base + addr as usize) as *mut u16, value) }
    }
}

// Interrupt controller registers shared by the UART and timer drivers.
pub(crate) const IFS0: u16 = 0x0084;
pub(crate) const IEC0: u16 = 0x0094;
pub(crate) const IPC0: u16 = 0x00A4;
pub(crate) const IPC2: u16 = 0x00A8;
pub(crate) const IPC3: u16 = 0x00AA;

/// One interrupt source in the INTC: its flag and enable bits plus the 3-bit
/// priority field in the matching IPC register.
pub(crate) struct IrqLine {
    flag_reg: u16,
    enable_reg: u16,
    bit: u16,
    priority_reg: u16,
    priority_shift: u16,
}

impl IrqLine {
    pub(crate) const fn new(
        flag_reg: u16,
        enable_reg: u16,
        bit: u16,
        priority_reg: u16,
        priority_shift: u16,
    ) -> Self {
        Self {
            flag_reg,
            enable_reg,
            bit,
            priority_reg,
            priority_shift,
        }
    }

    pub(crate) fn enable<B: SfrBus>(&self, bus: &B) {
        let iec = bus.read(self.enable_reg);
        bus.write(self.enable_reg, iec | 1 << self.bit);
    }

    pub(crate) fn disable<B: SfrBus>(&self, bus: &B) {
        let iec = bus.read(self.enable_reg);
        bus.write(self.enable_reg, iec & !(1 << self.bit));
    }

    pub(crate) fn is_enabled<B: SfrBus>(&self, bus: &B) -> bool {
        bus.read(self.enable_reg) & (1 << self.bit) != 0
    }

    /// Acknowledge the source. This is a read-modify-write of the IFS
    /// register; a flag another source latches between the read and the
    /// write is lost, so callers sequence flag handling per priority level.
    pub(crate) fn clear_flag<B: SfrBus>(&self, bus: &B) {
        let ifs = bus.read(self.flag_reg);
        bus.write(self.flag_reg, ifs & !(1 << self.bit));
    }

    /// Program the priority level (0..=7; higher bits are ignored).
    pub(crate) fn set_priority<B: SfrBus>(&self, bus: &B, level: u8) {
        let field = u16::from(level & 0b111) << self.priority_shift;
        let ipc = bus.read(self.priority_reg);
        bus.write(
            self.priority_reg,
            (ipc & !(0b111 << self.priority_shift)) | field,
        );
    }
}
