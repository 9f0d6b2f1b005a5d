mod common;

use common::{Chip, FakeClock, FakeDelay, FakeRng, FakeSpi, Harness};
use rfm69::{Config, Error, Mode, Rfm69, Variant};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

#[test]
fn construction_fails_without_chip() {
    let mut chip = Chip::new();
    chip.regs[0x10] = 0x00;
    let chip = Rc::new(RefCell::new(chip));
    let time = Rc::new(Cell::new(0));

    let result = Rfm69::new(
        FakeSpi(chip.clone()),
        FakeClock(time.clone()),
        FakeDelay {
            time,
            delays_ms: Rc::new(RefCell::new(Vec::new())),
        },
        FakeRng(0),
        Config::default(),
    );

    assert!(matches!(result, Err(Error::DeviceNotFound(0x00))));
    assert!(chip.borrow().writes.is_empty());
}

#[test]
fn new_handle_starts_in_standby_without_rssi() {
    let h = Harness::new(Config::default());
    assert_eq!(h.radio.mode(), Mode::Standby);
    assert_eq!(h.radio.rssi(), -127);
    assert!(!h.radio.is_initialized());
}

#[test]
fn set_mode_is_idempotent() {
    let mut h = Harness::initialized(Variant::Standard);

    assert_eq!(h.radio.set_mode(Mode::Rx), Ok(Mode::Rx));
    assert_eq!(h.chip.borrow().writes_to(0x01), vec![0x10]);

    assert_eq!(h.radio.set_mode(Mode::Rx), Ok(Mode::Rx));
    assert_eq!(h.chip.borrow().writes_to(0x01), vec![0x10]);
    assert_eq!(h.radio.mode(), Mode::Rx);
}

#[test]
fn set_mode_writes_mode_field() {
    let mut h = Harness::initialized(Variant::Standard);

    h.radio.set_mode(Mode::FrequencySynthesizer).unwrap();
    assert_eq!(h.chip.borrow().mode(), 2);

    h.radio.sleep().unwrap();
    assert_eq!(h.chip.borrow().mode(), 0);
    assert_eq!(h.radio.mode(), Mode::Sleep);
}

#[test]
fn standard_module_never_touches_boost_registers() {
    let mut h = Harness::initialized(Variant::Standard);

    h.radio.set_mode(Mode::Rx).unwrap();
    h.radio.set_mode(Mode::Tx).unwrap();

    let chip = h.chip.borrow();
    assert!(chip.writes_to(0x5A).is_empty());
    assert!(chip.writes_to(0x5C).is_empty());
}

#[test]
fn high_power_boost_follows_rx_and_tx() {
    let mut h = Harness::initialized(Variant::HighPower);
    h.radio.set_power_dbm(20).unwrap();
    h.clear_logs();

    h.radio.set_mode(Mode::Rx).unwrap();
    assert_eq!(h.chip.borrow().writes_to(0x5A), vec![0x55]);
    assert_eq!(h.chip.borrow().writes_to(0x5C), vec![0x70]);

    h.radio.set_mode(Mode::Tx).unwrap();
    assert_eq!(h.chip.borrow().writes_to(0x5A), vec![0x55, 0x5D]);
    assert_eq!(h.chip.borrow().writes_to(0x5C), vec![0x70, 0x7C]);

    h.radio.set_mode(Mode::Standby).unwrap();
    assert_eq!(h.chip.borrow().writes_to(0x5A).len(), 2);
    assert!(h.radio.high_power_settings());
}

#[test]
fn high_power_without_boost_leaves_test_registers_alone() {
    let mut h = Harness::initialized(Variant::HighPower);
    h.radio.set_power_dbm(10).unwrap();
    h.clear_logs();

    h.radio.set_mode(Mode::Rx).unwrap();
    h.radio.set_mode(Mode::Tx).unwrap();

    assert!(h.chip.borrow().writes_to(0x5A).is_empty());
}

#[test]
fn stalled_mode_ready_times_out() {
    let mut h = Harness::initialized(Variant::Standard);
    h.chip.borrow_mut().mode_ready = false;
    let start = h.time.get();

    assert_eq!(h.radio.receive(&mut [0u8; 8]), Ok(0));

    assert!(h.time.get().wrapping_sub(start) >= 100);
    assert_eq!(h.radio.mode(), Mode::Rx);
}

#[test]
fn reinit_after_receive_records_standby() {
    let mut h = Harness::initialized(Variant::Standard);
    let mut buf = [0u8; 8];
    h.radio.receive(&mut buf).unwrap();
    assert_eq!(h.radio.mode(), Mode::Rx);

    h.radio.init().unwrap();

    assert_eq!(h.radio.mode(), Mode::Standby);
    assert_eq!(h.chip.borrow().mode(), 1);

    // the next poll has to start the receiver again
    h.chip.borrow_mut().deliver(&[1, 0x42]);
    assert_eq!(h.radio.receive(&mut buf), Ok(2));
    assert_eq!(h.chip.borrow().mode(), 4);
}

#[test]
fn custom_config_tracks_mode_register() {
    let mut h = Harness::initialized(Variant::Standard);

    h.radio.set_custom_config(&[(0x01, 0x10)]).unwrap();
    assert_eq!(h.radio.mode(), Mode::Rx);
    assert_eq!(h.chip.borrow().mode(), 4);

    h.radio.set_mode(Mode::Rx).unwrap();
    assert_eq!(h.chip.borrow().writes_to(0x01), vec![0x10]);

    // mode field 7 does not exist; the record is kept
    h.radio.set_custom_config(&[(0x01, 0x1C)]).unwrap();
    assert_eq!(h.radio.mode(), Mode::Rx);

    h.radio.set_custom_config(&[(0x02, 0x08), (0x01, 0x00)]).unwrap();
    assert_eq!(h.radio.mode(), Mode::Sleep);
}

#[test]
fn high_power_boost_untouched_outside_rx_and_tx() {
    let mut h = Harness::initialized(Variant::HighPower);
    h.radio.set_power_dbm(20).unwrap();
    h.radio.set_mode(Mode::Rx).unwrap();
    h.clear_logs();

    h.radio.set_mode(Mode::FrequencySynthesizer).unwrap();
    h.radio.sleep().unwrap();

    {
        let chip = h.chip.borrow();
        assert_eq!(chip.writes_to(0x01), vec![0x08, 0x00]);
        assert!(chip.writes_to(0x5A).is_empty());
        assert!(chip.writes_to(0x5C).is_empty());
        assert_eq!(chip.regs[0x5A], 0x55);
    }
    assert!(h.radio.high_power_settings());

    h.radio.set_mode(Mode::Tx).unwrap();
    assert_eq!(h.chip.borrow().writes_to(0x5A), vec![0x5D]);
}
