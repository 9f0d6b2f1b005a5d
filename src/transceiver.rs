//! Payload-level interface shared by packet radio drivers
//!
//! Protocol code written against [`Transceiver`] does not depend on the chip
//! generation behind it.

use embedded_hal::{delay::DelayNs, spi::SpiDevice};
use rand_core::RngCore;

use crate::{Clock, Error, Rfm69};

/// Blocking send/receive of raw radio frames
pub trait Transceiver {
    type Error;

    /// Transmits `payload`, returning the number of bytes sent.
    fn send(&mut self, payload: &[u8]) -> Result<usize, Self::Error>;

    /// Polls for a frame, returning the number of bytes written to `buf`;
    /// 0 means nothing was received.
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<SPI, CLK, DELAY, RNG> Transceiver for Rfm69<SPI, CLK, DELAY, RNG>
where
    SPI: SpiDevice,
    CLK: Clock,
    DELAY: DelayNs,
    RNG: RngCore,
{
    type Error = Error;

    fn send(&mut self, payload: &[u8]) -> Result<usize, Error> {
        Rfm69::send(self, payload)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        Rfm69::receive(self, buf)
    }
}
