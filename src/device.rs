//! RFM69 Register Transport
//!
//! This module provides the low-level interface to the RFM69 register file over SPI.
//! Every access is a single SPI transaction that starts with an address byte; bit 7
//! of that byte selects a write (1) or a read (0). The chip auto-increments the
//! address for bursts, except for the FIFO which is accessed repeatedly at 0x00.
//!
//! The interface is built around the `Device<SPI>` struct which wraps an SPI device and
//! provides methods for:
//! - Reading and writing typed registers
//! - Raw 16-bit command transfers and single register access by address
//! - Burst writes (AES key, FIFO frames)
//!
//! # Example
//! ```no_run
//! use rfm69::{Device, registers::Version};
//! # fn demo<SPI: embedded_hal::spi::SpiDevice>(spi: SPI) -> Result<(), rfm69::Error> {
//! let mut device = Device::new(spi);
//!
//! // Read a typed register
//! let version: Version = device.read_register()?;
//!
//! // Read a register by address
//! let op_mode = device.read_raw(0x01)?;
//! # Ok(())
//! # }
//! ```

use core::convert::Infallible;

use embedded_hal::spi::Operation;
use regiface::{errors::Error as RegifaceError, ByteArray, ReadableRegister, WritableRegister};

use crate::registers::{FIFO, MAX_ADDRESS, WRITE_FLAG};

/// Register transport for the RFM69.
///
/// This struct wraps an SPI device and provides methods to access the chip's registers.
/// Chip select framing is handled by the [`embedded_hal::spi::SpiDevice`] implementation.
pub struct Device<SPI> {
    spi: SPI,
}

impl<SPI> Device<SPI> {
    /// Creates a new Device instance wrapping the provided SPI device.
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Releases the underlying SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Device<SPI>
where
    SPI: embedded_hal::spi::SpiDevice,
{
    /// Exchanges a 16-bit command word with the chip.
    ///
    /// The high byte is the address byte, the low byte the value. Returns the word
    /// clocked out by the chip during the same transfer; for a read its low byte
    /// holds the register value.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    pub fn transfer(&mut self, command: u16) -> Result<u16, RegifaceError> {
        let mut word = command.to_be_bytes();

        self.spi
            .transfer_in_place(&mut word)
            .map_err(|_| RegifaceError::BusError)?;

        Ok(u16::from_be_bytes(word))
    }

    /// Reads a register by address.
    ///
    /// Addresses above 0x7F do not exist; they read as 0 without touching the bus.
    pub fn read_raw(&mut self, address: u8) -> Result<u8, RegifaceError> {
        if address > MAX_ADDRESS {
            return Ok(0);
        }

        let response = self.transfer(u16::from(address) << 8)?;
        Ok(response as u8)
    }

    /// Writes a register by address.
    ///
    /// Writes to addresses above 0x7F are ignored.
    pub fn write_raw(&mut self, address: u8, value: u8) -> Result<(), RegifaceError> {
        if address > MAX_ADDRESS {
            return Ok(());
        }

        self.transfer((u16::from(address | WRITE_FLAG) << 8) | u16::from(value))?;
        Ok(())
    }

    /// Reads a register value from the device.
    ///
    /// Multi-byte registers are read in one burst, most significant byte first.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    /// * `RegifaceError::DeserializationError` - Failed to parse register value
    pub fn read_register<R>(&mut self) -> Result<R, RegifaceError>
    where
        R: ReadableRegister<IdType = u8>,
    {
        let mut raw_value = R::Array::new();

        self.spi
            .transaction(&mut [
                Operation::Write(&[R::id() & MAX_ADDRESS]),
                Operation::Read(raw_value.as_mut()),
            ])
            .map_err(|_| RegifaceError::BusError)?;

        R::from_bytes(raw_value).map_err(|_| RegifaceError::DeserializationError)
    }

    /// Writes a value to a device register.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    pub fn write_register<R>(&mut self, register: R) -> Result<(), RegifaceError>
    where
        R: WritableRegister<IdType = u8, Error = Infallible>,
    {
        let raw_value = match register.to_bytes() {
            Ok(raw) => raw,
            Err(never) => match never {},
        };

        self.write_burst(R::id(), raw_value.as_ref())
    }

    /// Reads a register, applies `f` and writes the result back.
    pub fn modify_register<R, F>(&mut self, f: F) -> Result<(), RegifaceError>
    where
        R: ReadableRegister<IdType = u8> + WritableRegister<IdType = u8, Error = Infallible>,
        F: FnOnce(R) -> R,
    {
        let register: R = self.read_register()?;
        self.write_register(f(register))
    }

    /// Writes consecutive bytes starting at `address` in one transaction.
    ///
    /// # Arguments
    /// * `address` - First register to write
    /// * `bytes` - Data to write
    pub fn write_burst(&mut self, address: u8, bytes: &[u8]) -> Result<(), RegifaceError> {
        if address > MAX_ADDRESS {
            return Ok(());
        }

        self.spi
            .transaction(&mut [
                Operation::Write(&[address | WRITE_FLAG]),
                Operation::Write(bytes),
            ])
            .map_err(|_| RegifaceError::BusError)
    }

    /// Loads a variable length frame into the FIFO: one length byte, then the payload.
    ///
    /// The caller bounds `payload` to the configured maximum payload.
    pub fn write_fifo(&mut self, payload: &[u8]) -> Result<(), RegifaceError> {
        let header = [FIFO | WRITE_FLAG, payload.len() as u8];

        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Write(payload)])
            .map_err(|_| RegifaceError::BusError)
    }

    /// Pops one byte from the FIFO.
    pub fn read_fifo(&mut self) -> Result<u8, RegifaceError> {
        self.read_raw(FIFO)
    }
}
