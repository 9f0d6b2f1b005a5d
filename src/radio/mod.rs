//! The RFM69 device handle
//!
//! [`Rfm69`] owns the register transport together with the time, delay and
//! randomness sources, and records the driver-side state the chip does not
//! report back cheaply: the current mode, power settings and the last RSSI.
//!
//! The implementation is split by concern:
//! - `mode`: operating mode state machine
//! - `configure`: base configuration and physical-unit settings
//! - `power`: amplifier selection and output power
//! - `csma`: listen before talk
//! - `tx`: send pipeline
//! - `rx`: receive pipeline and the pending packet slot

mod configure;
mod csma;
mod mode;
mod power;
mod rx;
mod tx;

pub use power::{power_settings, ForcePa, PowerSettings};

use embedded_hal::{delay::DelayNs, spi::SpiDevice};
use heapless::Vec;
use rand_core::RngCore;

use crate::{
    config::{Config, Variant, MAX_PAYLOAD},
    device::Device,
    registers::{DataMode, Mode, Version},
    Clock, Error,
};

/// RSSI reported before any sample was taken (dBm)
pub const RSSI_UNKNOWN: i16 = -127;

/// Driver for one RFM69 module.
///
/// Exactly one handle exists per chip. It is not meant to be shared between
/// threads; wrap it in a mutex if several contexts need it.
pub struct Rfm69<SPI, CLK, DELAY, RNG> {
    device: Device<SPI>,
    clock: CLK,
    delay: DELAY,
    rng: RNG,
    config: Config,
    initialized: bool,
    mode: Mode,
    power_level: u8,
    high_power_settings: bool,
    rssi: i16,
    encryption: bool,
    ook: bool,
    data_mode: DataMode,
    /// Frame captured while waiting for a free channel
    pending: Vec<u8, MAX_PAYLOAD>,
}

impl<SPI, CLK, DELAY, RNG> Rfm69<SPI, CLK, DELAY, RNG>
where
    SPI: SpiDevice,
    CLK: Clock,
    DELAY: DelayNs,
    RNG: RngCore,
{
    /// Creates the handle and checks that an RFM69 answers on the bus.
    ///
    /// The chip is left untouched apart from reading its version register;
    /// call [`init`](Self::init) before sending or receiving.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    /// * `Error::DeviceNotFound` - The version register did not read 0x24
    pub fn new(spi: SPI, clock: CLK, delay: DELAY, rng: RNG, config: Config) -> Result<Self, Error> {
        let mut radio = Self {
            device: Device::new(spi),
            clock,
            delay,
            rng,
            config,
            initialized: false,
            mode: Mode::Standby,
            power_level: 0,
            high_power_settings: false,
            rssi: RSSI_UNKNOWN,
            encryption: false,
            ook: false,
            data_mode: DataMode::Packet,
            pending: Vec::new(),
        };

        let version: Version = radio.device.read_register()?;
        if version.revision != Version::EXPECTED {
            return Err(Error::DeviceNotFound(version.revision));
        }
        debug!("rfm69 version {=u8:#x}", version.revision);

        Ok(radio)
    }
}

impl<SPI, CLK, DELAY, RNG> Rfm69<SPI, CLK, DELAY, RNG> {
    /// Releases the bus and the auxiliary sources.
    pub fn release(self) -> (SPI, CLK, DELAY, RNG) {
        (self.device.release(), self.clock, self.delay, self.rng)
    }

    /// Settings the handle was created with, as modified at runtime
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Module variant
    pub fn variant(&self) -> Variant {
        self.config.variant
    }

    /// `true` once [`init`](Self::init) has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Last operating mode requested through [`set_mode`](Self::set_mode)
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Last power level written with [`set_power_level`](Self::set_power_level)
    /// or derived by [`set_power_dbm`](Self::set_power_dbm)
    pub fn power_level(&self) -> u8 {
        self.power_level
    }

    /// Whether the +20 dBm boost is configured for transmissions
    pub fn high_power_settings(&self) -> bool {
        self.high_power_settings
    }

    /// Last sampled RSSI in dBm, -127 if none was taken.
    ///
    /// Only updated by [`read_rssi`](Self::read_rssi), which runs automatically
    /// after each received frame unless disabled.
    pub fn rssi(&self) -> i16 {
        self.rssi
    }

    /// Whether AES encryption is enabled
    pub fn encryption(&self) -> bool {
        self.encryption
    }

    /// Whether OOK modulation is selected
    pub fn ook(&self) -> bool {
        self.ook
    }

    /// Selected data mode
    pub fn data_mode(&self) -> DataMode {
        self.data_mode
    }

    /// Enable/disable sampling RSSI after every received frame.
    pub fn set_auto_read_rssi(&mut self, enable: bool) {
        self.config.auto_read_rssi = enable;
    }

    /// Enable/disable listen before talk in [`send`](Self::send).
    pub fn set_csma(&mut self, enable: bool) {
        self.config.csma = enable;
    }

    /// `true` if a frame captured during CSMA is waiting to be received
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
