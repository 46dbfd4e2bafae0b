//! CFIFO command words.
//!
//! Two layouts share the upper bits:
//!
//! ```text
//! configuration:  BN[25] R/W[24] TAG[23:20] VALUE[23:8] ADDR[7:0]
//! conversion:     BN[25]         TAG[23:20] CHANNEL[15:8]
//! ```
//!
//! `TAG` selects the RFIFO a result is returned to; it only exists on
//! commands that produce one (reads and conversions). Configuration
//! commands always carry a non-zero register address, conversions leave
//! the low byte clear.

use super::types::{Fifo, Unit};

const BN_SHIFT: u32 = 25;
const READ: u32 = 1 << 24;
const TAG_SHIFT: u32 = 20;
const VALUE_SHIFT: u32 = 8;
const CHANNEL_SHIFT: u32 = 8;

/// Internal channel sampling 25 % of (VRH - VRL).
pub const CHANNEL_VREF_25: u8 = 44;
/// Internal channel sampling 75 % of (VRH - VRL).
pub const CHANNEL_VREF_75: u8 = 43;

/// Registers inside an ADC unit, reachable only through configuration commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AdcRegister {
    /// Control: enable bit and clock prescaler.
    Cr = 0x01,
    /// Time stamp control.
    Tscr = 0x02,
    /// Time base counter.
    Tbcr = 0x03,
    /// Gain calibration constant, default configuration (12 bit).
    Gccr = 0x04,
    /// Offset calibration constant, default configuration (12 bit).
    Occr = 0x05,
    /// Alternate configuration 1 control.
    Ac1cr = 0x30,
    Ac1gccr = 0x31,
    Ac1occr = 0x32,
    /// Alternate configuration 2 control.
    Ac2cr = 0x34,
    Ac2gccr = 0x35,
    Ac2occr = 0x36,
}

impl AdcRegister {
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// `CR` fields.
pub mod cr {
    pub const EN: u16 = 1 << 15;

    pub const fn clk_ps(prescaler: u8) -> u16 {
        (prescaler & 0x1F) as u16
    }
}

/// Result resolution of an alternate configuration (`ACnCR.RESSEL`).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    Bits12,
    Bits10,
    Bits8,
}

impl Resolution {
    pub const fn ressel(self) -> u16 {
        match self {
            Self::Bits12 => 0 << 6,
            Self::Bits10 => 1 << 6,
            Self::Bits8 => 2 << 6,
        }
    }
}

/// Encoded 32-bit CFIFO command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandWord(u32);

impl CommandWord {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Configuration write of `value` into `reg` of `unit`.
    pub const fn write(unit: Unit, reg: AdcRegister, value: u16) -> Self {
        Self(bn(unit) | ((value as u32) << VALUE_SHIFT) | reg.addr() as u32)
    }

    /// Configuration read of `reg`, answered into `fifo`'s RFIFO.
    pub const fn read(unit: Unit, reg: AdcRegister, fifo: Fifo) -> Self {
        Self(bn(unit) | READ | tag(fifo) | reg.addr() as u32)
    }

    /// Single conversion of `channel`, answered into `fifo`'s RFIFO.
    pub const fn convert(unit: Unit, channel: u8, fifo: Fifo) -> Self {
        Self(bn(unit) | tag(fifo) | ((channel as u32) << CHANNEL_SHIFT))
    }

    pub const fn unit(self) -> Unit {
        if self.0 & (1 << BN_SHIFT) != 0 {
            Unit::Adc1
        } else {
            Unit::Adc0
        }
    }

    pub const fn is_read(self) -> bool {
        self.0 & READ != 0
    }
}

const fn bn(unit: Unit) -> u32 {
    (unit.index() as u32) << BN_SHIFT
}

const fn tag(fifo: Fifo) -> u32 {
    (fifo.index() as u32) << TAG_SHIFT
}
