//! Transmitter registers
//!
//! This module contains registers related to the transmit path:
//! - Power amplifier selection and output level
//! - Over-current protection
//! - +20 dBm boost test registers of the RFM69HW

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

bitflags! {
    /// Power amplifier enables, bits 7:5 of RegPaLevel
    ///
    /// PA0 drives the RFIO pin and exists only on standard modules; PA1 and PA2
    /// drive PA_BOOST and exist only on high power modules.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PaSelect: u8 {
        const PA0 = 1 << 7;
        const PA1 = 1 << 6;
        const PA2 = 1 << 5;
    }
}

/// Power amplifier level register (address: 0x11)
///
/// Output power depends on the amplifiers selected:
/// - PA0: -18 + level dBm
/// - PA1: -18 + level dBm
/// - PA1+PA2: -14 + level dBm
/// - PA1+PA2 with boost: -11 + level dBm
#[register(0x11u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PaLevel {
    /// Enabled amplifiers
    pub select: PaSelect,
    /// Output power setting, 0..=31
    pub level: u8,
}

impl PaLevel {
    /// Highest value of the level field
    pub const MAX_LEVEL: u8 = 0x1F;
}

impl Default for PaLevel {
    fn default() -> Self {
        Self {
            select: PaSelect::PA0,
            level: Self::MAX_LEVEL,
        }
    }
}

/// Over current protection register (address: 0x13)
///
/// # Important Notes
/// - Must be disabled when the +20 dBm boost is used
/// - Imax = 45 + 5 * trim mA
#[register(0x13u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Ocp {
    /// Enable current limiting
    pub enabled: bool,
    /// Current limit trim, 0..=15
    pub trim: u8,
}

impl Default for Ocp {
    fn default() -> Self {
        Self {
            enabled: true,
            trim: 0x0A, // 95 mA
        }
    }
}

/// High power PA test register 1 (address: 0x5A)
///
/// 0x5D enables the +20 dBm setting, 0x55 restores normal operation.
#[register(0x5Au8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct TestPa1 {
    /// Raw register value, [`Self::NORMAL`] or [`Self::BOOST`]
    pub value: u8,
}

impl TestPa1 {
    /// Normal PA operation
    pub const NORMAL: u8 = 0x55;
    /// +20 dBm boost
    pub const BOOST: u8 = 0x5D;

    /// Register value for the boost on or off.
    pub fn new(boost: bool) -> Self {
        Self {
            value: if boost { Self::BOOST } else { Self::NORMAL },
        }
    }
}

/// High power PA test register 2 (address: 0x5C)
///
/// 0x7C enables the +20 dBm setting, 0x70 restores normal operation.
///
/// # Important Notes
/// - Leave in normal mode while receiving
/// - The boost is limited to 1% duty cycle at +20 dBm
#[register(0x5Cu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct TestPa2 {
    /// Raw register value, [`Self::NORMAL`] or [`Self::BOOST`]
    pub value: u8,
}

impl TestPa2 {
    /// Normal PA operation
    pub const NORMAL: u8 = 0x70;
    /// +20 dBm boost
    pub const BOOST: u8 = 0x7C;

    /// Register value for the boost on or off.
    pub fn new(boost: bool) -> Self {
        Self {
            value: if boost { Self::BOOST } else { Self::NORMAL },
        }
    }
}

impl FromByteArray for PaLevel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            select: PaSelect::from_bits_truncate(bytes[0]),
            level: bytes[0] & Self::MAX_LEVEL,
        })
    }
}

impl ToByteArray for PaLevel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.select.bits() | (self.level & Self::MAX_LEVEL)])
    }
}

impl FromByteArray for Ocp {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            enabled: bytes[0] & 0x10 != 0,
            trim: bytes[0] & 0x0F,
        })
    }
}

impl ToByteArray for Ocp {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([if self.enabled { 0x10 } else { 0x00 } | (self.trim & 0x0F)])
    }
}

impl FromByteArray for TestPa1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for TestPa1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

impl FromByteArray for TestPa2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for TestPa2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}
