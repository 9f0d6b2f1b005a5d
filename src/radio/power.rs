//! Power amplifier selection and output power

use bitflags::bitflags;
use embedded_hal::{delay::DelayNs, spi::SpiDevice};
use rand_core::RngCore;

use super::Rfm69;
use crate::{
    config::Variant,
    registers::{Ocp, PaLevel, PaSelect},
    Clock, Error,
};

bitflags! {
    /// Manual amplifier selection for [`Rfm69::set_pa_settings`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ForcePa: u8 {
        const PA0 = 1 << 0;
        const PA1 = 1 << 1;
        const PA2 = 1 << 2;
        /// +20 dBm boost registers
        const BOOST = 1 << 3;
    }
}

/// Register settings producing a requested output power
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerSettings {
    /// Amplifier selection and level for RegPaLevel
    pub pa_level: PaLevel,
    /// +20 dBm boost registers engaged during TX
    pub boost: bool,
}

/// Computes amplifier selection and level for `dbm` on a module `variant`.
///
/// Standard modules use PA0 with level = dBm + 18. High power modules use
/// PA1 alone up to +13 dBm (level = dBm + 18), PA1+PA2 up to +17 dBm
/// (level = dBm + 14) and PA1+PA2 with boost up to +20 dBm (level = dBm + 11).
///
/// # Errors
/// * `Error::PowerOutOfRange` - `dbm` is outside the variant's range
pub fn power_settings(variant: Variant, dbm: i8) -> Result<PowerSettings, Error> {
    if dbm < variant.min_dbm() || dbm > variant.max_dbm() {
        return Err(Error::PowerOutOfRange(dbm));
    }

    let (select, offset, boost) = match variant {
        Variant::Standard => (PaSelect::PA0, 18, false),
        Variant::HighPower => match dbm {
            ..=13 => (PaSelect::PA1, 18, false),
            14..=17 => (PaSelect::PA1 | PaSelect::PA2, 14, false),
            _ => (PaSelect::PA1 | PaSelect::PA2, 11, true),
        },
    };

    Ok(PowerSettings {
        pa_level: PaLevel {
            select,
            level: (dbm + offset) as u8,
        },
        boost,
    })
}

impl<SPI, CLK, DELAY, RNG> Rfm69<SPI, CLK, DELAY, RNG>
where
    SPI: SpiDevice,
    CLK: Clock,
    DELAY: DelayNs,
    RNG: RngCore,
{
    /// Sets the output power in dBm.
    ///
    /// Picks PA0, PA1 or PA1+PA2 depending on module and request, see
    /// [`power_settings`]. On high power modules the +20 dBm boost is configured
    /// for +18..=+20 dBm and cleared otherwise.
    ///
    /// # Errors
    /// * `Error::PowerOutOfRange` - nothing is written
    pub fn set_power_dbm(&mut self, dbm: i8) -> Result<(), Error> {
        let settings = power_settings(self.config.variant, dbm).inspect_err(|_| {
            warn!("rejected output power {=i8} dBm", dbm);
        })?;

        self.device.write_register(settings.pa_level)?;
        self.power_level = settings.pa_level.level;

        if self.config.variant == Variant::HighPower {
            self.set_high_power_settings(settings.boost)?;
        }

        Ok(())
    }

    /// Sets the raw output power level, 0..=31; larger values are clamped.
    ///
    /// The amplifier selection is left as is.
    pub fn set_power_level(&mut self, level: u8) -> Result<(), Error> {
        let level = level.min(PaLevel::MAX_LEVEL);

        self.device
            .modify_register(|reg: PaLevel| PaLevel { level, ..reg })?;

        self.power_level = level;
        Ok(())
    }

    /// Configures the +20 dBm boost and writes the boost registers.
    ///
    /// Enabling is ignored on standard modules. While receiving the registers
    /// are restored to normal on the next switch to RX.
    pub fn set_high_power_settings(&mut self, enable: bool) -> Result<(), Error> {
        let enable = enable && self.config.variant == Variant::HighPower;

        self.high_power_settings = enable;
        self.write_boost(enable)
    }

    /// Selects power amplifiers and over-current protection.
    ///
    /// OCP is enabled on standard modules and disabled on high power modules.
    /// With an empty `force` PA0 (standard) or PA1 (high power) is selected;
    /// otherwise exactly the given amplifiers, and the boost if requested.
    pub fn set_pa_settings(&mut self, force: ForcePa) -> Result<(), Error> {
        let high_power = self.config.variant == Variant::HighPower;

        self.device.write_register(Ocp {
            enabled: !high_power,
            ..Default::default()
        })?;

        let select = if force.is_empty() {
            if high_power {
                PaSelect::PA1
            } else {
                PaSelect::PA0
            }
        } else {
            self.set_high_power_settings(force.contains(ForcePa::BOOST))?;

            let mut select = PaSelect::empty();
            select.set(PaSelect::PA0, force.contains(ForcePa::PA0));
            select.set(PaSelect::PA1, force.contains(ForcePa::PA1));
            select.set(PaSelect::PA2, force.contains(ForcePa::PA2));
            select
        };

        self.device
            .modify_register(|reg: PaLevel| PaLevel { select, ..reg })?;

        Ok(())
    }
}
