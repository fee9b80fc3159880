//! Baud rate generator selection.
//!
//! The BRG divides the peripheral clock by 16 (low-speed, BRGH = 0) or 4
//! (high-speed, BRGH = 1); a divisor `d` achieves `clock / (factor * (d + 1))`
//! baud. Selection tries low-speed first and falls back to high-speed when
//! the relative error exceeds 2.5%.

use crate::ConfigError;

/// BRG input prescaler, i.e. the BRGH mode bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prescaler {
    /// 1:16, BRGH = 0.
    Div16,
    /// 1:4, BRGH = 1.
    Div4,
}

impl Prescaler {
    pub const fn factor(self) -> u32 {
        match self {
            Prescaler::Div16 => 16,
            Prescaler::Div4 => 4,
        }
    }
}

/// A programmable BRG setting: prescaler mode plus 16-bit divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaudConfig {
    pub prescaler: Prescaler,
    pub divisor: u16,
}

impl BaudConfig {
    /// Rate this setting actually produces from `clock_hz`.
    pub const fn actual_baud(self, clock_hz: u32) -> u32 {
        let factor = self.prescaler.factor() as u64;
        (clock_hz as u64 / (factor * (self.divisor as u64 + 1))) as u32
    }
}

/// Best divisor for `baud` at the given prescale factor, with its error.
///
/// The integer quotient q = clock / (factor * baud) and its predecessor are
/// the divisors bracketing the target; the smaller absolute error wins and a
/// tie keeps the larger divisor (the lower achieved rate).
fn best_divisor(clock: u64, baud: u64, factor: u64) -> (u64, u64) {
    let q = clock / (factor * baud);
    if q == 0 {
        return (0, (clock / factor).abs_diff(baud));
    }

    let error_under = (clock / (factor * q)).abs_diff(baud);
    let error_over = (clock / (factor * (q + 1))).abs_diff(baud);

    if error_under < error_over {
        (q - 1, error_under)
    } else {
        (q, error_over)
    }
}

/// Selects the prescaler mode and divisor for `baud` from `clock_hz`.
///
/// Low-speed (1:16) is kept while its relative error stays within 2.5%
/// (integer test: error * 1000 / baud > 25 switches); past that the
/// high-speed (1:4) candidate is taken unconditionally. A divisor that does
/// not fit UxBRG, a zero clock or a zero baud are reported rather than
/// truncated.
pub fn select(clock_hz: u32, baud: u32) -> Result<BaudConfig, ConfigError> {
    if clock_hz == 0 || baud == 0 {
        return Err(ConfigError::BaudOutOfRange { clock_hz, baud });
    }

    let clock = u64::from(clock_hz);
    let target = u64::from(baud);

    let (low_divisor, low_error) = best_divisor(clock, target, 16);
    let (prescaler, divisor) = if low_error * 1000 / target > 25 {
        let (high_divisor, _) = best_divisor(clock, target, 4);
        (Prescaler::Div4, high_divisor)
    } else {
        (Prescaler::Div16, low_divisor)
    };

    match u16::try_from(divisor) {
        Ok(divisor) => Ok(BaudConfig { prescaler, divisor }),
        Err(_) => Err(ConfigError::BaudOutOfRange { clock_hz, baud }),
    }
}
