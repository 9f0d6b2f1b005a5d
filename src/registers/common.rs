//! Common configuration registers
//!
//! This module contains the registers shared by transmitter and receiver:
//! - Operating mode selection
//! - Data mode and modulation scheme
//! - Bitrate and frequency deviation
//! - Carrier frequency
//! - Silicon version

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use crate::config::{FSTEP_HZ, XO_HZ};

/// Error type for invalid operating mode values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidMode(pub u8);

/// Transceiver operating mode
///
/// Values match the Mode field (bits 4:2) of RegOpMode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Lowest power consumption, oscillator off
    Sleep = 0,
    /// Oscillator running, the usual idle state
    Standby = 1,
    /// Frequency synthesizer enabled
    FrequencySynthesizer = 2,
    /// Transmitter active
    Tx = 3,
    /// Receiver active
    Rx = 4,
}

impl TryFrom<u8> for Mode {
    type Error = InvalidMode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Sleep),
            1 => Ok(Self::Standby),
            2 => Ok(Self::FrequencySynthesizer),
            3 => Ok(Self::Tx),
            4 => Ok(Self::Rx),
            invalid => Err(InvalidMode(invalid)),
        }
    }
}

/// Operating mode register (address: 0x01)
///
/// The driver writes this register with the sequencer enabled and listen mode off,
/// so only the mode field is modelled.
///
/// # Important Notes
/// - Writes must go through [`Rfm69::set_mode`](crate::Rfm69::set_mode) or
///   [`Rfm69::set_custom_config`](crate::Rfm69::set_custom_config) so the
///   recorded mode stays trustworthy
/// - ModeReady in RegIrqFlags1 signals completion of the transition
#[register(0x01u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct OpMode {
    /// Requested operating mode
    pub mode: Mode,
}

/// Data processing mode, bits 6:5 of RegDataModul
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataMode {
    /// Packet engine active
    #[default]
    Packet = 0,
    /// Continuous mode with bit synchronizer
    ContinuousWithSync = 2,
    /// Continuous mode without bit synchronizer
    ContinuousWithoutSync = 3,
}

/// Modulation scheme, bits 4:3 of RegDataModul
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Modulation {
    /// Frequency shift keying
    #[default]
    Fsk = 0,
    /// On-off keying
    Ook = 1,
}

/// Error type for data modulation decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidDataModulation(pub u8);

/// Data modulation register (address: 0x02)
///
/// Selects the data processing mode, modulation scheme and pulse shaping.
#[register(0x02u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct DataModulation {
    /// Packet or continuous mode
    pub data_mode: DataMode,
    /// FSK or OOK
    pub modulation: Modulation,
    /// Modulation shaping (meaning depends on modulation)
    pub shaping: u8,
}

/// Bitrate register pair (address: 0x03..0x04)
///
/// Bitrate = FXOSC / value
#[register(0x03u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Bitrate {
    /// Oscillator periods per bit
    pub value: u16,
}

impl Bitrate {
    /// Register value for a bitrate in bits per second.
    pub fn from_bps(bps: u32) -> Self {
        Self {
            value: (XO_HZ / bps.max(1)) as u16,
        }
    }
}

impl Default for Bitrate {
    fn default() -> Self {
        Self { value: 0x1A0B } // 4.8 kbps
    }
}

/// Frequency deviation register pair (address: 0x05..0x06)
///
/// Fdev = Fstep * value
#[register(0x05u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct FrequencyDeviation {
    /// Deviation in synthesizer steps
    pub value: u16,
}

impl FrequencyDeviation {
    /// Register value for a deviation in Hz.
    pub fn from_hz(hz: u32) -> Self {
        Self {
            value: (hz / FSTEP_HZ) as u16,
        }
    }
}

impl Default for FrequencyDeviation {
    fn default() -> Self {
        Self { value: 0x0052 } // 5 kHz
    }
}

/// Carrier frequency registers (address: 0x07..0x09)
///
/// Frf = Fstep * value. The value is 24 bits wide and only takes effect
/// once the least significant byte has been written.
#[register(0x07u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct CarrierFrequency {
    /// Frequency in synthesizer steps (24 bits)
    pub value: u32,
}

impl CarrierFrequency {
    /// Register value for a carrier frequency in Hz.
    pub fn from_hz(hz: u32) -> Self {
        Self {
            value: (hz / FSTEP_HZ) & 0x00FF_FFFF,
        }
    }
}

impl Default for CarrierFrequency {
    fn default() -> Self {
        Self { value: 0xE4C000 } // 915 MHz
    }
}

/// Silicon version register (address: 0x10)
///
/// Read only. Reads 0x24 on all RFM69 modules.
#[register(0x10u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct Version {
    /// Full revision (bits 7:4) and metal mask revision (bits 3:0)
    pub revision: u8,
}

impl Version {
    /// Revision reported by RFM69 silicon
    pub const EXPECTED: u8 = 0x24;
}

impl FromByteArray for OpMode {
    type Error = InvalidMode;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            mode: Mode::try_from((bytes[0] >> 2) & 0x07)?,
        })
    }
}

impl ToByteArray for OpMode {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.mode as u8) << 2])
    }
}

impl FromByteArray for DataModulation {
    type Error = InvalidDataModulation;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let data_mode = match (bytes[0] >> 5) & 0x03 {
            0 => DataMode::Packet,
            2 => DataMode::ContinuousWithSync,
            3 => DataMode::ContinuousWithoutSync,
            _ => return Err(InvalidDataModulation(bytes[0])),
        };
        let modulation = match (bytes[0] >> 3) & 0x03 {
            0 => Modulation::Fsk,
            1 => Modulation::Ook,
            _ => return Err(InvalidDataModulation(bytes[0])),
        };

        Ok(Self {
            data_mode,
            modulation,
            shaping: bytes[0] & 0x03,
        })
    }
}

impl ToByteArray for DataModulation {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.data_mode as u8) << 5) | ((self.modulation as u8) << 3) | (self.shaping & 0x03)])
    }
}

impl FromByteArray for Bitrate {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            value: u16::from_be_bytes(bytes),
        })
    }
}

impl ToByteArray for Bitrate {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.value.to_be_bytes())
    }
}

impl FromByteArray for FrequencyDeviation {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            value: u16::from_be_bytes(bytes),
        })
    }
}

impl ToByteArray for FrequencyDeviation {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.value.to_be_bytes())
    }
}

impl FromByteArray for CarrierFrequency {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            value: u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]),
        })
    }
}

impl ToByteArray for CarrierFrequency {
    type Error = Infallible;
    type Array = [u8; 3];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let [_, msb, mid, lsb] = self.value.to_be_bytes();
        Ok([msb, mid, lsb])
    }
}

impl FromByteArray for Version {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { revision: bytes[0] })
    }
}
