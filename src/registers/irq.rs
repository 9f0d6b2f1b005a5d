//! Status flag registers
//!
//! RegIrqFlags1 reports mode transitions and receiver events, RegIrqFlags2
//! reports FIFO and packet engine events. Both are polled by the driver; the
//! DIO mapping is left at its defaults.

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

bitflags! {
    /// Flags of RegIrqFlags1
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Irq1: u8 {
        /// Requested operating mode is ready
        const MODE_READY = 1 << 7;
        const RX_READY = 1 << 6;
        const TX_READY = 1 << 5;
        const PLL_LOCK = 1 << 4;
        /// RSSI exceeded the threshold
        const RSSI = 1 << 3;
        const TIMEOUT = 1 << 2;
        const AUTO_MODE = 1 << 1;
        const SYNC_ADDRESS_MATCH = 1 << 0;
    }
}

bitflags! {
    /// Flags of RegIrqFlags2
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Irq2: u8 {
        const FIFO_FULL = 1 << 7;
        /// At least one byte in the FIFO
        const FIFO_NOT_EMPTY = 1 << 6;
        const FIFO_LEVEL = 1 << 5;
        /// Writing this bit clears the FIFO and the flags
        const FIFO_OVERRUN = 1 << 4;
        /// Frame has been transmitted
        const PACKET_SENT = 1 << 3;
        /// A complete frame is waiting in the FIFO
        const PAYLOAD_READY = 1 << 2;
        const CRC_OK = 1 << 1;
    }
}

/// IRQ flags register 1 (address: 0x27)
#[register(0x27u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct IrqFlags1 {
    /// Set flags
    pub flags: Irq1,
}

/// IRQ flags register 2 (address: 0x28)
///
/// # Important Notes
/// - PAYLOAD_READY clears once the FIFO has been emptied
/// - PACKET_SENT clears when leaving TX
#[register(0x28u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct IrqFlags2 {
    /// Set flags; write FIFO_OVERRUN to clear the FIFO
    pub flags: Irq2,
}

impl IrqFlags2 {
    /// Value that clears FIFO and flags when written
    pub fn clear_fifo() -> Self {
        Self {
            flags: Irq2::FIFO_OVERRUN,
        }
    }
}

impl FromByteArray for IrqFlags1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: Irq1::from_bits_truncate(bytes[0]),
        })
    }
}

impl FromByteArray for IrqFlags2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: Irq2::from_bits_truncate(bytes[0]),
        })
    }
}

impl ToByteArray for IrqFlags2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}
