//! Listen before talk (CSMA/CA)
//!
//! Before a transmission the receiver is started and RSSI is sampled until the
//! channel reads below the threshold. While the channel is busy the driver backs
//! off for a random 0..10 ms and tries to pick up any frame that arrives meanwhile;
//! such a frame is parked in the pending slot for the next receive call.

use embedded_hal::{delay::DelayNs, spi::SpiDevice};
use heapless::Vec;
use rand_core::RngCore;

use super::Rfm69;
use crate::{
    config::{CSMA_TIMEOUT_MS, MAX_BACKOFF_MS, MAX_PAYLOAD, RSSI_READY_TIMEOUT_MS},
    registers::{Mode, PacketConfig2, PacketFlags, RssiConfig, RssiFlags, RssiValue},
    Clock, Error,
};

impl<SPI, CLK, DELAY, RNG> Rfm69<SPI, CLK, DELAY, RNG>
where
    SPI: SpiDevice,
    CLK: Clock,
    DELAY: DelayNs,
    RNG: RngCore,
{
    /// Samples RSSI and records it, see [`rssi`](Self::rssi).
    ///
    /// Only meaningful in RX once the first sample is done; reads -127 dBm
    /// otherwise.
    pub fn read_rssi(&mut self) -> Result<i16, Error> {
        let value: RssiValue = self.device.read_register()?;
        self.rssi = value.dbm();
        Ok(self.rssi)
    }

    /// Samples RSSI and compares it against the CSMA threshold.
    pub fn channel_free(&mut self) -> Result<bool, Error> {
        Ok(self.read_rssi()? < self.config.csma_threshold_dbm)
    }

    /// Restarts the receiver so a new frame (and RSSI sample) can be detected.
    pub(crate) fn restart_rx(&mut self) -> Result<(), Error> {
        self.device
            .modify_register(|reg: PacketConfig2| PacketConfig2 {
                flags: reg.flags | PacketFlags::RESTART_RX,
            })?;
        Ok(())
    }

    /// Waits for the first RSSI sample after (re)starting the receiver.
    fn wait_for_rssi_sample(&mut self) -> Result<bool, Error> {
        let done = self.poll_until(RSSI_READY_TIMEOUT_MS, |device| {
            let config: RssiConfig = device.read_register()?;
            Ok(config.flags.contains(RssiFlags::DONE))
        })?;

        if !done {
            warn!("timeout waiting for rssi sample");
        }
        Ok(done)
    }

    /// Waits until the channel is free or [`CSMA_TIMEOUT_MS`] elapses.
    ///
    /// Leaves the module in RX. Returns `false` if the wait timed out; the
    /// caller transmits anyway.
    pub(crate) fn wait_for_free_channel(&mut self) -> Result<bool, Error> {
        self.restart_rx()?;
        self.set_mode(Mode::Rx)?;

        let start = self.clock.now_ms();
        self.wait_for_rssi_sample()?;

        while !self.channel_free()? {
            if self.clock.elapsed_ms(start) >= CSMA_TIMEOUT_MS {
                warn!("channel busy for {=u32} ms, sending anyway", CSMA_TIMEOUT_MS);
                return Ok(false);
            }

            let backoff = self.rng.next_u32() % MAX_BACKOFF_MS;
            self.delay.delay_ms(backoff);

            let mut frame = [0u8; MAX_PAYLOAD];
            let received = self.receive_frame(&mut frame)?;
            if received > 0 {
                debug!("captured {=usize} bytes while waiting for channel", received);

                // a later capture replaces an earlier one
                match Vec::from_slice(&frame[..received]) {
                    Ok(captured) => self.pending = captured,
                    // `frame` has the slot's capacity
                    Err(_) => warn!("captured {=usize} bytes exceed the pending slot", received),
                }

                self.restart_rx()?;
                self.wait_for_rssi_sample()?;
            }
        }

        Ok(true)
    }
}
