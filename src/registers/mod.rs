//! Register definitions for the RFM69
//! Generated from the RFM69HCW datasheet (RevisionHistory 1.1)

pub mod common;
pub mod irq;
pub mod packet;
pub mod receiver;
pub mod transmitter;

pub use common::*;
pub use irq::*;
pub use packet::*;
pub use receiver::*;
pub use transmitter::*;

/// FIFO data register; reads pop and writes push one byte
pub const FIFO: u8 = 0x00;

/// Operating mode register, see [`OpMode`]
pub const OP_MODE: u8 = 0x01;

/// Highest register address
pub const MAX_ADDRESS: u8 = 0x7F;

/// Address bit selecting a write access
pub const WRITE_FLAG: u8 = 0x80;

/// Last register included in a register dump
pub const LAST_DUMPED: u8 = 0x71;
