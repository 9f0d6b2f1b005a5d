//! Receiver registers
//!
//! RSSI sampling control and the last sampled value.

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

bitflags! {
    /// RSSI configuration bits of RegRssiConfig
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RssiFlags: u8 {
        /// Trigger a sample (only needed outside RX)
        const START = 1 << 0;
        /// A sample is available in RegRssiValue
        const DONE = 1 << 1;
    }
}

/// RSSI configuration register (address: 0x23)
///
/// In RX mode the chip samples continuously; DONE is set once the first
/// sample after entering RX is ready (~1 ms).
#[register(0x23u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct RssiConfig {
    /// Sampling control and status
    pub flags: RssiFlags,
}

/// RSSI value register (address: 0x24)
///
/// Read only. RSSI = -value / 2 dBm.
#[register(0x24u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct RssiValue {
    /// Raw value, -2 x dBm
    pub raw: u8,
}

impl RssiValue {
    /// Signal strength in dBm
    pub fn dbm(self) -> i16 {
        -(i16::from(self.raw) / 2)
    }
}

impl FromByteArray for RssiConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: RssiFlags::from_bits_truncate(bytes[0]),
        })
    }
}

impl ToByteArray for RssiConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}

impl FromByteArray for RssiValue {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { raw: bytes[0] })
    }
}
