//! Receive pipeline

use embedded_hal::{delay::DelayNs, spi::SpiDevice};
use rand_core::RngCore;

use super::Rfm69;
use crate::{
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
    /// Polls for a received frame and copies it into `buf`.
    ///
    /// A frame captured during CSMA is returned first without touching the radio.
    /// Otherwise the module is put in RX (if it is not already) and a complete
    /// frame, if any, is read from the FIFO. The module stays in RX.
    ///
    /// The returned bytes are the raw FIFO contents: the length byte followed by
    /// the payload. At most `buf.len()` bytes are read; the rest of a longer frame
    /// stays in the chip's FIFO.
    ///
    /// Returns the number of bytes received, 0 if no frame was available.
    /// For a captured frame this is its full length: a value larger than
    /// `buf.len()` means only the first `buf.len()` bytes were copied and the
    /// rest is dropped.
    pub fn receive(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if !self.pending.is_empty() {
            let captured = self.pending.len();
            let copied = captured.min(buf.len());
            buf[..copied].copy_from_slice(&self.pending[..copied]);
            self.pending.clear();
            return Ok(captured);
        }

        self.receive_frame(buf)
    }

    /// Reads a frame from the FIFO if PayloadReady is set.
    pub(crate) fn receive_frame(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if self.mode != Mode::Rx {
            self.set_mode(Mode::Rx)?;
            self.wait_for_mode_ready()?;
        }

        let irq: IrqFlags2 = self.device.read_register()?;
        if !irq.flags.contains(Irq2::PAYLOAD_READY) {
            return Ok(0);
        }

        self.set_mode(Mode::Standby)?;

        let mut read = 0;
        while read < buf.len() {
            let irq: IrqFlags2 = self.device.read_register()?;
            if !irq.flags.contains(Irq2::FIFO_NOT_EMPTY) {
                break;
            }
            buf[read] = self.device.read_fifo()?;
            read += 1;
        }

        if self.config.auto_read_rssi {
            self.read_rssi()?;
        }
        debug!("received {=usize} bytes, rssi {=i16} dBm", read, self.rssi);

        self.set_mode(Mode::Rx)?;
        self.restart_rx()?;

        Ok(read)
    }
}
