//! UART1 block and pin-select registers of the PIC24HJ32GP202/204 group.
//!
//! Addresses are data-space addresses from the data sheet SFR map; the
//! MODE/STA layouts follow the family reference manual UART section.

use tock_registers::register_bitfields;

/// U1MODE: mode register (enable, baud mode, frame format).
pub const U1MODE: u16 = 0x0220;
/// U1STA: status and control register (transmitter control, line status).
pub const U1STA: u16 = 0x0222;
/// U1TXREG: transmit register. Writing queues a byte on the 4-deep FIFO.
pub const U1TXREG: u16 = 0x0224;
/// U1RXREG: receive register. Reading pops the receive FIFO.
pub const U1RXREG: u16 = 0x0226;
/// U1BRG: baud rate generator period.
pub const U1BRG: u16 = 0x0228;

// Peripheral pin select. RPINR18 carries the U1RX source in its low five
// bits; each RPOR register packs two 6-bit output function fields.
pub const RPINR18: u16 = 0x06A4;
pub const RPOR_BASE: u16 = 0x06C0;
pub const RPINR_SOURCE_MASK: u16 = 0x001F;
pub const RPOR_FUNCTION_MASK: u16 = 0x003F;
/// RPOR function code that routes U1TX onto a pin.
pub const U1TX_FUNCTION: u16 = 0x0003;
/// Highest remappable pin on the 44-pin package.
pub const RP_PIN_MAX: u8 = 25;

// IFS0/IEC0 bit positions and IPC priority fields of the UART1 sources.
pub const U1RX_IRQ_BIT: u16 = 11;
pub const U1TX_IRQ_BIT: u16 = 12;
pub const U1RX_PRIORITY_SHIFT: u16 = 12; // IPC2<14:12>
pub const U1TX_PRIORITY_SHIFT: u16 = 0; // IPC3<2:0>

register_bitfields![u16,
    /// UxMODE
    pub MODE [
        STSEL OFFSET(0) NUMBITS(1) [],
        PDSEL OFFSET(1) NUMBITS(2) [],
        BRGH OFFSET(3) NUMBITS(1) [],
        URXINV OFFSET(4) NUMBITS(1) [],
        ABAUD OFFSET(5) NUMBITS(1) [],
        LPBACK OFFSET(6) NUMBITS(1) [],
        WAKE OFFSET(7) NUMBITS(1) [],
        UEN OFFSET(8) NUMBITS(2) [],
        RTSMD OFFSET(11) NUMBITS(1) [],
        IREN OFFSET(12) NUMBITS(1) [],
        USIDL OFFSET(13) NUMBITS(1) [],
        UARTEN OFFSET(15) NUMBITS(1) []
    ],

    /// UxSTA
    pub STA [
        URXDA OFFSET(0) NUMBITS(1) [],
        OERR OFFSET(1) NUMBITS(1) [],
        FERR OFFSET(2) NUMBITS(1) [],
        PERR OFFSET(3) NUMBITS(1) [],
        RIDLE OFFSET(4) NUMBITS(1) [],
        ADDEN OFFSET(5) NUMBITS(1) [],
        URXISEL OFFSET(6) NUMBITS(2) [],
        TRMT OFFSET(8) NUMBITS(1) [],
        UTXBF OFFSET(9) NUMBITS(1) [],
        UTXEN OFFSET(10) NUMBITS(1) [],
        UTXBRK OFFSET(11) NUMBITS(1) [],
        UTXISEL0 OFFSET(13) NUMBITS(1) [],
        UTXINV OFFSET(14) NUMBITS(1) [],
        UTXISEL1 OFFSET(15) NUMBITS(1) []
    ]
];
