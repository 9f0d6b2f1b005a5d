//! Driver configuration and timing constants
//!
//! Everything here is owned by the [`Rfm69`](crate::Rfm69) handle and passed at
//! construction. Settings that live in chip registers (frequency, bitrate, power)
//! are changed through the handle at runtime instead.

use embedded_hal::spi::{Mode as SpiMode, MODE_0};

/// Maximum payload carried by one frame (bytes)
pub const MAX_PAYLOAD: usize = 64;

/// Crystal oscillator frequency (Hz)
pub const XO_HZ: u32 = 32_000_000;

/// Frequency synthesizer step, XO / 2^19, rounded (Hz)
pub const FSTEP_HZ: u32 = 61;

/// Maximum time to wait for a requested mode to become ready (ms)
pub const MODE_READY_TIMEOUT_MS: u32 = 100;

/// Maximum time to wait for a frame to leave the transmitter (ms)
pub const PACKET_SENT_TIMEOUT_MS: u32 = 100;

/// Maximum time CSMA waits for a free channel before transmitting anyway (ms)
pub const CSMA_TIMEOUT_MS: u32 = 500;

/// Maximum time to wait for the first RSSI sample after entering RX (ms)
pub const RSSI_READY_TIMEOUT_MS: u32 = 10;

/// Upper bound (exclusive) of the random CSMA backoff (ms)
pub const MAX_BACKOFF_MS: u32 = 10;

/// Default CSMA threshold; a channel reading below this is free (dBm)
pub const CSMA_RSSI_THRESHOLD_DBM: i16 = -85;

/// SPI mode expected by the chip
pub const SPI_MODE: SpiMode = MODE_0;

/// Highest SPI clock the module is driven at (Hz)
pub const SPI_MAX_FREQUENCY_HZ: u32 = 500_000;

/// Module variant, which decides the usable power amplifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// RFM69W/CW: PA0 only, -18 to +13 dBm
    #[default]
    Standard,
    /// RFM69HW/HCW: PA1/PA2 on PA_BOOST, -2 to +20 dBm
    HighPower,
}

impl Variant {
    /// Lowest output power the variant accepts (dBm)
    pub fn min_dbm(self) -> i8 {
        match self {
            Self::Standard => -18,
            Self::HighPower => -2,
        }
    }

    /// Highest output power the variant accepts (dBm)
    pub fn max_dbm(self) -> i8 {
        match self {
            Self::Standard => 13,
            Self::HighPower => 20,
        }
    }
}

/// Construction-time driver settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Module variant
    pub variant: Variant,
    /// Sample RSSI after every received frame
    pub auto_read_rssi: bool,
    /// Listen before talk
    pub csma: bool,
    /// CSMA free-channel threshold (dBm)
    pub csma_threshold_dbm: i16,
}

impl Config {
    /// Defaults for `variant`: automatic RSSI on, CSMA off, -85 dBm threshold.
    pub const fn new(variant: Variant) -> Self {
        Self {
            variant,
            auto_read_rssi: true,
            csma: false,
            csma_threshold_dbm: CSMA_RSSI_THRESHOLD_DBM,
        }
    }

    /// Sample RSSI after every received frame.
    pub const fn with_auto_read_rssi(mut self, enable: bool) -> Self {
        self.auto_read_rssi = enable;
        self
    }

    /// Listen before talk in every send.
    pub const fn with_csma(mut self, enable: bool) -> Self {
        self.csma = enable;
        self
    }

    /// RSSI below which the channel counts as free (dBm).
    pub const fn with_csma_threshold(mut self, dbm: i16) -> Self {
        self.csma_threshold_dbm = dbm;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Variant::Standard)
    }
}

/// Base configuration applied by [`Rfm69::init`](crate::Rfm69::init), in order.
///
/// Register/value pairs. Adjust with
/// [`Rfm69::set_custom_config`](crate::Rfm69::set_custom_config) after init.
pub const BASE_CONFIG: &[(u8, u8)] = &[
    (0x01, 0x04), // RegOpMode: standby
    (0x02, 0x00), // RegDataModul: packet mode, FSK, no shaping
    (0x03, 0x0D), // RegBitrateMsb: 9600 bps
    (0x04, 0x05), // RegBitrateLsb
    (0x05, 0x01), // RegFdevMsb: 20 kHz
    (0x06, 0x48), // RegFdevLsb
    (0x07, 0xD9), // RegFrfMsb: 868.3 MHz
    (0x08, 0x13), // RegFrfMid
    (0x09, 0x33), // RegFrfLsb
    (0x18, 0x00), // RegLna: automatic gain
    (0x19, 0x4B), // RegRxBw: DCC 4%, 100 kHz
    (0x2C, 0x00), // RegPreambleMsb: 6 bytes
    (0x2D, 0x06), // RegPreambleLsb
    (0x2E, 0x98), // RegSyncConfig: sync on, 4 bytes
    (0x2F, 0xDE), // RegSyncValue1: 0xDEADBEEF
    (0x30, 0xAD), // RegSyncValue2
    (0x31, 0xBE), // RegSyncValue3
    (0x32, 0xEF), // RegSyncValue4
    (0x37, 0xD0), // RegPacketConfig1: variable length, whitening, CRC on
    (0x38, 0x40), // RegPayloadLength: 64 bytes
    (0x3C, 0x8F), // RegFifoThresh: TX start on FIFO not empty
    (0x58, 0x1B), // RegTestLna: normal sensitivity
    (0x6F, 0x30), // RegTestDagc: improved margin
];
