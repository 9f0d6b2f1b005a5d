//! Send pipeline

use embedded_hal::{delay::DelayNs, spi::SpiDevice};
use rand_core::RngCore;

use super::Rfm69;
use crate::{
    config::{MAX_PAYLOAD, PACKET_SENT_TIMEOUT_MS},
    registers::{Irq2, IrqFlags2, Mode},
    Clock, Error,
};

impl<SPI, CLK, DELAY, RNG> Rfm69<SPI, CLK, DELAY, RNG>
where
    SPI: SpiDevice,
    CLK: Clock,
    DELAY: DelayNs,
    RNG: RngCore,
{
    /// Sends a frame over the air and blocks until it has left the transmitter.
    ///
    /// Payloads longer than [`MAX_PAYLOAD`] are truncated. With CSMA enabled the
    /// channel is checked first, see [`set_csma`](Self::set_csma). The module is
    /// in standby afterwards.
    ///
    /// Returns the number of payload bytes sent; 0 for an empty payload, in which
    /// case nothing is transmitted.
    pub fn send(&mut self, payload: &[u8]) -> Result<usize, Error> {
        if self.mode != Mode::Sleep {
            self.set_mode(Mode::Standby)?;
            self.wait_for_mode_ready()?;
        }

        self.clear_fifo()?;

        let length = payload.len().min(MAX_PAYLOAD);
        if length == 0 {
            return Ok(0);
        }

        if self.config.csma {
            self.wait_for_free_channel()?;
            self.set_mode(Mode::Standby)?;
        }

        self.device.write_fifo(&payload[..length])?;

        self.set_mode(Mode::Tx)?;
        self.wait_for_packet_sent()?;

        self.set_mode(Mode::Standby)?;

        trace!("sent {=usize} bytes", length);
        Ok(length)
    }

    /// Waits until PacketSent is set or [`PACKET_SENT_TIMEOUT_MS`] elapses.
    fn wait_for_packet_sent(&mut self) -> Result<bool, Error> {
        let sent = self.poll_until(PACKET_SENT_TIMEOUT_MS, |device| {
            let irq: IrqFlags2 = device.read_register()?;
            Ok(irq.flags.contains(Irq2::PACKET_SENT))
        })?;

        if !sent {
            warn!("timeout waiting for packet sent");
        }
        Ok(sent)
    }
}
