//! Simulated RFM69 for driving the handle without hardware
#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    convert::Infallible,
    rc::Rc,
};

use embedded_hal::{
    delay::DelayNs,
    spi::{ErrorType, Operation, SpiDevice},
};
use rand_core::RngCore;
use rfm69::{Clock, Config, Rfm69, Variant};

pub const RSSI_BUSY: u8 = 100; // -50 dBm
pub const RSSI_FREE: u8 = 200; // -100 dBm

/// Register file and FIFO behaviour of the chip
pub struct Chip {
    pub regs: [u8; 128],
    pub rx_fifo: VecDeque<u8>,
    pub tx_fifo: Vec<u8>,
    pub payload_ready: bool,
    pub packet_sent: bool,
    pub mode_ready: bool,
    pub rssi_done: bool,
    /// Returned by RegRssiValue once `rssi_script` is exhausted
    pub rssi_raw: u8,
    pub rssi_script: VecDeque<u8>,
    /// Delivered into the RX FIFO on the first RSSI read
    pub arrival: Option<Vec<u8>>,
    /// Frames handed to the transmitter
    pub transmitted: Vec<Vec<u8>>,
    /// Every register byte written, in order
    pub writes: Vec<(u8, u8)>,
    /// Every register byte read, in order
    pub reads: Vec<u8>,
    pub rx_restarts: usize,
    address: Option<u8>,
    writing: bool,
}

impl Chip {
    pub fn new() -> Self {
        let mut regs = [0u8; 128];
        regs[0x01] = 0x04;
        regs[0x10] = 0x24;
        regs[0x11] = 0x9F;
        regs[0x5A] = 0x55;
        regs[0x5C] = 0x70;

        Self {
            regs,
            rx_fifo: VecDeque::new(),
            tx_fifo: Vec::new(),
            payload_ready: false,
            packet_sent: false,
            mode_ready: true,
            rssi_done: true,
            rssi_raw: RSSI_FREE,
            rssi_script: VecDeque::new(),
            arrival: None,
            transmitted: Vec::new(),
            writes: Vec::new(),
            reads: Vec::new(),
            rx_restarts: 0,
            address: None,
            writing: false,
        }
    }

    /// Places a complete frame in the RX FIFO.
    pub fn deliver(&mut self, frame: &[u8]) {
        self.rx_fifo.extend(frame.iter().copied());
        self.payload_ready = true;
    }

    pub fn mode(&self) -> u8 {
        (self.regs[0x01] >> 2) & 0x07
    }

    pub fn writes_to(&self, address: u8) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(a, _)| *a == address)
            .map(|(_, v)| *v)
            .collect()
    }

    fn begin(&mut self) {
        self.address = None;
    }

    fn clock_byte(&mut self, mosi: u8) -> u8 {
        let Some(address) = self.address else {
            self.address = Some(mosi & 0x7F);
            self.writing = mosi & 0x80 != 0;
            return 0;
        };

        let miso = if self.writing {
            self.write_reg(address, mosi);
            0
        } else {
            self.read_reg(address)
        };

        if address != 0x00 {
            self.address = Some((address + 1) & 0x7F);
        }
        miso
    }

    fn write_reg(&mut self, address: u8, value: u8) {
        self.writes.push((address, value));
        match address {
            0x00 => self.tx_fifo.push(value),
            0x01 => {
                self.regs[0x01] = value;
                self.packet_sent = false;
                if self.mode() == 3 {
                    let frame = std::mem::take(&mut self.tx_fifo);
                    self.transmitted.push(frame);
                    self.packet_sent = true;
                }
            }
            0x28 => {
                if value & 0x10 != 0 {
                    self.rx_fifo.clear();
                    self.tx_fifo.clear();
                    self.payload_ready = false;
                }
            }
            0x3D => {
                if value & 0x04 != 0 {
                    self.rx_restarts += 1;
                }
                self.regs[0x3D] = value & !0x04;
            }
            _ => self.regs[address as usize] = value,
        }
    }

    fn read_reg(&mut self, address: u8) -> u8 {
        self.reads.push(address);
        match address {
            0x00 => {
                let byte = self.rx_fifo.pop_front().unwrap_or(0);
                if self.rx_fifo.is_empty() {
                    self.payload_ready = false;
                }
                byte
            }
            0x23 => {
                if self.rssi_done {
                    0x02
                } else {
                    0x00
                }
            }
            0x24 => {
                if let Some(frame) = self.arrival.take() {
                    self.deliver(&frame);
                }
                self.rssi_script.pop_front().unwrap_or(self.rssi_raw)
            }
            0x27 => {
                if self.mode_ready {
                    0x80
                } else {
                    0x00
                }
            }
            0x28 => {
                let mut flags = 0;
                if !self.rx_fifo.is_empty() {
                    flags |= 0x40;
                }
                if self.payload_ready {
                    flags |= 0x04;
                }
                if self.packet_sent {
                    flags |= 0x08;
                }
                flags
            }
            _ => self.regs[address as usize],
        }
    }
}

pub type SharedChip = Rc<RefCell<Chip>>;

pub struct FakeSpi(pub SharedChip);

impl ErrorType for FakeSpi {
    type Error = Infallible;
}

impl SpiDevice for FakeSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        let mut chip = self.0.borrow_mut();
        chip.begin();
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    for byte in bytes.iter() {
                        chip.clock_byte(*byte);
                    }
                }
                Operation::Read(bytes) => {
                    for byte in bytes.iter_mut() {
                        *byte = chip.clock_byte(0);
                    }
                }
                Operation::Transfer(read, write) => {
                    for i in 0..read.len().max(write.len()) {
                        let miso = chip.clock_byte(write.get(i).copied().unwrap_or(0));
                        if let Some(byte) = read.get_mut(i) {
                            *byte = miso;
                        }
                    }
                }
                Operation::TransferInPlace(bytes) => {
                    for byte in bytes.iter_mut() {
                        *byte = chip.clock_byte(*byte);
                    }
                }
                Operation::DelayNs(_) => {}
            }
        }
        Ok(())
    }
}

/// Millisecond clock that advances by one tick on every reading
#[derive(Clone)]
pub struct FakeClock(pub Rc<Cell<u32>>);

impl Clock for FakeClock {
    fn now_ms(&mut self) -> u32 {
        let now = self.0.get();
        self.0.set(now.wrapping_add(1));
        now
    }
}

/// Delay that moves the shared clock forward
pub struct FakeDelay {
    pub time: Rc<Cell<u32>>,
    pub delays_ms: Rc<RefCell<Vec<u32>>>,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.time.set(self.time.get().wrapping_add(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.borrow_mut().push(ms);
        self.time.set(self.time.get().wrapping_add(ms));
    }
}

/// Counter standing in for a random source
pub struct FakeRng(pub u32);

impl RngCore for FakeRng {
    fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_add(7);
        self.0
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for byte in dst {
            *byte = self.next_u32() as u8;
        }
    }
}

pub type TestRadio = Rfm69<FakeSpi, FakeClock, FakeDelay, FakeRng>;

pub struct Harness {
    pub radio: TestRadio,
    pub chip: SharedChip,
    pub time: Rc<Cell<u32>>,
    pub delays_ms: Rc<RefCell<Vec<u32>>>,
}

impl Harness {
    /// Handle on a fresh simulated chip, before init
    pub fn new(config: Config) -> Self {
        Self::with_chip(config, Chip::new())
    }

    pub fn with_chip(config: Config, chip: Chip) -> Self {
        let chip = Rc::new(RefCell::new(chip));
        let time = Rc::new(Cell::new(0));
        let delays_ms = Rc::new(RefCell::new(Vec::new()));

        let radio = Rfm69::new(
            FakeSpi(chip.clone()),
            FakeClock(time.clone()),
            FakeDelay {
                time: time.clone(),
                delays_ms: delays_ms.clone(),
            },
            FakeRng(0),
            config,
        )
        .expect("simulated chip reports version 0x24");

        Self {
            radio,
            chip,
            time,
            delays_ms,
        }
    }

    /// Initialized handle with the chip's write/read logs cleared
    pub fn initialized(variant: Variant) -> Self {
        Self::initialized_with(Config::new(variant))
    }

    pub fn initialized_with(config: Config) -> Self {
        let mut harness = Self::new(config);
        harness.radio.init().expect("init");
        harness.clear_logs();
        harness
    }

    pub fn clear_logs(&self) {
        let mut chip = self.chip.borrow_mut();
        chip.writes.clear();
        chip.reads.clear();
    }
}
