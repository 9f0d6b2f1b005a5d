//! Operating mode state machine

use embedded_hal::{delay::DelayNs, spi::SpiDevice};
use rand_core::RngCore;

use super::Rfm69;
use crate::{
    config::{Variant, MODE_READY_TIMEOUT_MS},
    device::Device,
    registers::{Irq1, IrqFlags1, Mode, OpMode, TestPa1, TestPa2},
    Clock, Error,
};

impl<SPI, CLK, DELAY, RNG> Rfm69<SPI, CLK, DELAY, RNG>
where
    SPI: SpiDevice,
    CLK: Clock,
    DELAY: DelayNs,
    RNG: RngCore,
{
    /// Switches the operating mode.
    ///
    /// Requesting the current mode does nothing. On high power modules the
    /// +20 dBm boost is switched off when entering RX and back on when entering
    /// TX, if it is configured. The ModeReady flag is not awaited here.
    ///
    /// Returns the recorded mode after the call.
    pub fn set_mode(&mut self, mode: Mode) -> Result<Mode, Error> {
        if mode == self.mode {
            return Ok(self.mode);
        }

        self.device.write_register(OpMode { mode })?;

        if self.config.variant == Variant::HighPower && self.high_power_settings {
            match mode {
                Mode::Rx => self.write_boost(false)?,
                Mode::Tx => self.write_boost(true)?,
                _ => {}
            }
        }

        trace!("mode {} -> {}", self.mode, mode);
        self.mode = mode;

        Ok(self.mode)
    }

    /// Puts the module to sleep (lowest power consumption).
    pub fn sleep(&mut self) -> Result<(), Error> {
        self.set_mode(Mode::Sleep)?;
        Ok(())
    }

    /// Switches to standby if the transmitter or receiver is active.
    pub(crate) fn standby_if_active(&mut self) -> Result<(), Error> {
        if matches!(self.mode, Mode::Rx | Mode::Tx) {
            self.set_mode(Mode::Standby)?;
        }
        Ok(())
    }

    /// Waits until the chip reports the requested mode ready.
    ///
    /// Gives up after [`MODE_READY_TIMEOUT_MS`]; returns `false` in that case.
    pub(crate) fn wait_for_mode_ready(&mut self) -> Result<bool, Error> {
        let ready = self.poll_until(MODE_READY_TIMEOUT_MS, |device| {
            let irq: IrqFlags1 = device.read_register()?;
            Ok(irq.flags.contains(Irq1::MODE_READY))
        })?;

        if !ready {
            warn!("timeout waiting for mode {}", self.mode);
        }
        Ok(ready)
    }

    /// Writes the +20 dBm boost test registers.
    pub(crate) fn write_boost(&mut self, enable: bool) -> Result<(), Error> {
        self.device.write_register(TestPa1::new(enable))?;
        self.device.write_register(TestPa2::new(enable))?;
        Ok(())
    }

    /// Polls `ready` until it returns `true` or `timeout_ms` elapses.
    ///
    /// The condition is checked at least once.
    pub(crate) fn poll_until<F>(&mut self, timeout_ms: u32, mut ready: F) -> Result<bool, Error>
    where
        F: FnMut(&mut Device<SPI>) -> Result<bool, Error>,
    {
        let start = self.clock.now_ms();
        loop {
            if ready(&mut self.device)? {
                return Ok(true);
            }
            if self.clock.elapsed_ms(start) >= timeout_ms {
                return Ok(false);
            }
        }
    }
}
