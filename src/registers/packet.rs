//! Packet engine registers
//!
//! This module contains registers for packet handling features including:
//! - RX restart and inter-packet delay
//! - AES-128 encryption enable and key storage
//!
//! Framing itself (preamble, sync word, length, CRC, whitening) is loaded
//! as part of the base configuration.

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// AES key length in bytes
pub const AES_KEY_LEN: usize = 16;

bitflags! {
    /// Flags of RegPacketConfig2
    ///
    /// Bits 7:4 hold the inter-packet RX delay and are carried through unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PacketFlags: u8 {
        /// Restart the receiver, self-clearing
        const RESTART_RX = 1 << 2;
        const AUTO_RX_RESTART = 1 << 1;
        /// Encrypt/decrypt payloads with the stored key
        const AES_ON = 1 << 0;

        const _ = !0;
    }
}

/// Packet configuration register 2 (address: 0x3D)
#[register(0x3Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PacketConfig2 {
    /// Configuration bits, including the RX delay nibble
    pub flags: PacketFlags,
}

/// AES key registers (address: 0x3E..0x4D)
///
/// Write only. The key is stored most significant byte first.
#[register(0x3Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, WritableRegister)]
pub struct AesKey {
    /// AES-128 key
    pub key: [u8; AES_KEY_LEN],
}

impl FromByteArray for PacketConfig2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: PacketFlags::from_bits_retain(bytes[0]),
        })
    }
}

impl ToByteArray for PacketConfig2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}

impl ToByteArray for AesKey {
    type Error = Infallible;
    type Array = [u8; AES_KEY_LEN];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.key)
    }
}
