//! Base configuration and physical-unit settings

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
use rand_core::RngCore;
use regiface::FromByteArray;

use super::Rfm69;
use crate::{
    config::BASE_CONFIG,
    registers::{
        AesKey, Bitrate, CarrierFrequency, DataMode, DataModulation, FrequencyDeviation,
        IrqFlags2, Mode, Modulation, OpMode, PacketConfig2, PacketFlags, AES_KEY_LEN, LAST_DUMPED,
        OP_MODE,
    },
    Clock, Error,
};

use super::power::ForcePa;

impl<SPI, CLK, DELAY, RNG> Rfm69<SPI, CLK, DELAY, RNG>
where
    SPI: SpiDevice,
    CLK: Clock,
    DELAY: DelayNs,
    RNG: RngCore,
{
    /// Loads the base configuration and leaves the module in standby.
    ///
    /// Applies [`BASE_CONFIG`], selects the power amplifier matching the module
    /// variant and clears the FIFO. Must be called before the first send/receive.
    pub fn init(&mut self) -> Result<(), Error> {
        self.set_custom_config(BASE_CONFIG)?;
        self.mode = Mode::Standby;

        self.set_pa_settings(ForcePa::empty())?;

        self.clear_fifo()?;

        self.initialized = true;
        debug!("rfm69 initialized ({})", self.config.variant);

        Ok(())
    }

    /// Pulses the reset line and waits for the chip to come back.
    ///
    /// The line is active high. All registers return to their power-on values,
    /// so [`init`](Self::init) has to be called again.
    pub fn reset<P: OutputPin>(&mut self, reset: &mut P) -> Result<(), Error> {
        self.initialized = false;

        reset.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_ms(1);
        reset.set_low().map_err(|_| Error::Pin)?;
        self.delay.delay_ms(10);

        self.mode = Mode::Standby;
        self.high_power_settings = false;
        self.encryption = false;
        self.pending.clear();

        Ok(())
    }

    /// Writes a batch of register/value pairs, in order.
    ///
    /// A write to RegOpMode updates the recorded mode but skips the boost
    /// handling of [`set_mode`](Self::set_mode).
    pub fn set_custom_config(&mut self, config: &[(u8, u8)]) -> Result<(), Error> {
        for &(register, value) in config {
            self.device.write_raw(register, value)?;

            if register == OP_MODE {
                if let Ok(op_mode) = OpMode::from_bytes([value]) {
                    self.mode = op_mode.mode;
                }
            }
        }
        Ok(())
    }

    /// Sets the carrier frequency in Hz. Leaves TX/RX for standby first.
    pub fn set_frequency(&mut self, hz: u32) -> Result<(), Error> {
        self.standby_if_active()?;
        self.device.write_register(CarrierFrequency::from_hz(hz))?;
        Ok(())
    }

    /// Sets the FSK frequency deviation in Hz. Leaves TX/RX for standby first.
    pub fn set_frequency_deviation(&mut self, hz: u32) -> Result<(), Error> {
        self.standby_if_active()?;
        self.device.write_register(FrequencyDeviation::from_hz(hz))?;
        Ok(())
    }

    /// Sets the bitrate in bits per second. Leaves TX/RX for standby first.
    pub fn set_bitrate(&mut self, bps: u32) -> Result<(), Error> {
        self.standby_if_active()?;
        self.device.write_register(Bitrate::from_bps(bps))?;
        Ok(())
    }

    /// Selects OOK (`true`) or FSK (`false`) modulation. Leaves TX/RX for standby first.
    pub fn set_ook_mode(&mut self, enable: bool) -> Result<(), Error> {
        self.standby_if_active()?;

        let modulation = if enable { Modulation::Ook } else { Modulation::Fsk };
        self.device
            .modify_register(|reg: DataModulation| DataModulation { modulation, ..reg })?;

        self.ook = enable;
        Ok(())
    }

    /// Selects the data processing mode. Leaves TX/RX for standby first.
    ///
    /// Only [`DataMode::Packet`] is supported by the send/receive pipelines.
    pub fn set_data_mode(&mut self, data_mode: DataMode) -> Result<(), Error> {
        self.standby_if_active()?;

        self.device
            .modify_register(|reg: DataModulation| DataModulation { data_mode, ..reg })?;

        self.data_mode = data_mode;
        Ok(())
    }

    /// Enables AES encryption with `key`, or disables it.
    ///
    /// Encryption is enabled only for a 16 byte key; `None` or any other length
    /// disables it and leaves the stored key untouched. The module is put in
    /// standby first.
    ///
    /// Returns whether encryption is now enabled.
    pub fn set_aes_encryption(&mut self, key: Option<&[u8]>) -> Result<bool, Error> {
        let key = key.and_then(|key| <[u8; AES_KEY_LEN]>::try_from(key).ok());
        let enable = key.is_some();

        self.set_mode(Mode::Standby)?;

        if let Some(key) = key {
            self.device.write_register(AesKey { key })?;
        }

        self.device.modify_register(|reg: PacketConfig2| {
            let mut flags = reg.flags;
            flags.set(PacketFlags::AES_ON, enable);
            PacketConfig2 { flags }
        })?;

        self.encryption = enable;
        Ok(enable)
    }

    /// Clears the FIFO and the FIFO/packet flags.
    pub fn clear_fifo(&mut self) -> Result<(), Error> {
        self.device.write_register(IrqFlags2::clear_fifo())?;
        Ok(())
    }

    /// Reads registers 0x01..=0x71 into `dump`; `dump[i]` holds register `i + 1`.
    pub fn dump_registers(&mut self, dump: &mut [u8; LAST_DUMPED as usize]) -> Result<(), Error> {
        for (address, value) in (1..=LAST_DUMPED).zip(dump.iter_mut()) {
            *value = self.device.read_raw(address)?;
        }
        Ok(())
    }
}
