#![cfg_attr(not(test), no_std)]
//! RFM69 Radio Driver
//!
//! This crate provides a blocking, type-safe interface for the HopeRF RFM69 family of
//! sub-GHz FSK/OOK packet radio modules, including the +20 dBm RFM69HW/RFM69HCW variants.
//!
//! # Features
//! - Frequency range: 315/433/868/915 MHz modules
//! - Packet engine with variable length frames up to 64 bytes
//! - Output power:
//!   - RFM69W/CW: -18 to +13 dBm (PA0)
//!   - RFM69HW/HCW: -2 to +20 dBm (PA1, PA1+PA2, PA1+PA2 with boost)
//! - Optional AES-128 payload encryption
//! - CSMA/CA listen-before-talk with randomized backoff
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`device`]: Register transport over an [`embedded_hal::spi::SpiDevice`]
//!   - Single register reads/writes, raw 16-bit transfers and FIFO bursts
//!
//! - [`registers`]: Typed register definitions
//!   - [`registers::common`]: operating mode, modulation, bitrate and frequency
//!   - [`registers::transmitter`]: power amplifier, OCP and boost registers
//!   - [`registers::receiver`]: RSSI sampling
//!   - [`registers::irq`]: status flags
//!   - [`registers::packet`]: packet engine and AES key
//!
//! - [`radio`]: The [`Rfm69`] handle: mode state machine, configuration,
//!   channel access and the send/receive pipelines
//!
//! # Usage
//! The handle owns the SPI device, a millisecond [`Clock`], a delay provider and a
//! random number generator used for CSMA backoff.
//!
//! 1. Create the handle with [`Rfm69::new`]; the chip version is checked
//! 2. Call [`Rfm69::init`] to load the base configuration
//! 3. Adjust frequency, bitrate and output power as needed
//! 4. Poll [`Rfm69::receive`] periodically and call [`Rfm69::send`] to transmit
//!
//! # Important Notes
//! - All operations block until the chip responds or a bounded timeout expires
//! - Timeouts are soft: the driver proceeds rather than reporting an error
//! - Frames are lost if the receive poll interval exceeds the time the chip holds them
//!
//! # Example
//! ```no_run
//! use embedded_hal::{delay::DelayNs, spi::SpiDevice};
//! use rand_core::RngCore;
//! use rfm69::{Clock, Config, Error, Rfm69, Variant};
//!
//! fn beacon<SPI, CLK, DELAY, RNG>(
//!     spi: SPI,
//!     clock: CLK,
//!     delay: DELAY,
//!     rng: RNG,
//! ) -> Result<(), Error>
//! where
//!     SPI: SpiDevice,
//!     CLK: Clock,
//!     DELAY: DelayNs,
//!     RNG: RngCore,
//! {
//!     let config = Config::new(Variant::HighPower).with_csma(true);
//!     let mut radio = Rfm69::new(spi, clock, delay, rng, config)?;
//!     radio.init()?;
//!     radio.set_power_dbm(17)?;
//!     radio.send(b"hello")?;
//!     Ok(())
//! }
//! ```

#[macro_use]
mod fmt;

pub mod clock;
pub mod config;
pub mod device;
pub mod radio;
pub mod registers;
pub mod transceiver;

pub use clock::Clock;
pub use config::{Config, Variant};
pub use device::Device;
pub use radio::Rfm69;
pub use registers::*;
pub use transceiver::Transceiver;

use regiface::errors::Error as RegifaceError;

/// Errors reported by the driver
///
/// Timeouts and "no data" are not errors; see the individual operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// SPI communication failed
    Bus,
    /// Register contents could not be decoded
    Deserialization,
    /// Reset line could not be driven
    Pin,
    /// The version register did not identify an RFM69 (value read)
    DeviceNotFound(u8),
    /// Requested output power is outside the range of the device (dBm requested)
    PowerOutOfRange(i8),
}

impl From<RegifaceError> for Error {
    fn from(err: RegifaceError) -> Self {
        match err {
            RegifaceError::BusError => Self::Bus,
            _ => Self::Deserialization,
        }
    }
}
