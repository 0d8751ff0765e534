//! Direct SPI transport against recording embedded-hal fakes

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::{
    blocking::{delay::DelayUs, spi::Write},
    digital::v2::OutputPin,
};

use lmx2581::{
    device::SpiError,
    gen_synth, Lmx2581, RegisterSet, SpiTransport, SynthOptions, Transport,
};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Spi(Vec<u8>),
    Ce(bool),
    Le(bool),
}

type Log = Rc<RefCell<Vec<Event>>>;

struct FakeSpi(Log, bool);

impl Write<u8> for FakeSpi {
    type Error = ();

    fn write(&mut self, words: &[u8]) -> Result<(), ()> {
        if self.1 {
            return Err(());
        }
        self.0.borrow_mut().push(Event::Spi(words.to_vec()));
        Ok(())
    }
}

struct FakePin(Log, fn(bool) -> Event);

impl OutputPin for FakePin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push((self.1)(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push((self.1)(true));
        Ok(())
    }
}

struct NoDelay;

impl DelayUs<u16> for NoDelay {
    fn delay_us(&mut self, _us: u16) {}
}

fn transport(log: &Log, spi_fails: bool) -> SpiTransport<FakeSpi, FakePin, FakePin, NoDelay> {
    SpiTransport::new(
        FakeSpi(log.clone(), spi_fails),
        FakePin(log.clone(), Event::Ce),
        FakePin(log.clone(), Event::Le),
        NoDelay,
    )
}

#[test]
fn word_is_shifted_msb_first_and_latched() {
    let log = Log::default();
    let mut t = transport(&log, false);
    t.write_register("lmx_ctrl", 0x60C8_0010, true).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            Event::Spi(vec![0x60, 0xC8, 0x00, 0x10]),
            Event::Le(true),
            Event::Le(false),
        ]
    );
}

#[test]
fn enable_register_drives_chip_enable() {
    let log = Log::default();
    let mut t = transport(&log, false);
    t.write_register("adc16_use_synth", 1, false).unwrap();
    t.write_register("adc16_use_synth", 0, false).unwrap();
    assert_eq!(*log.borrow(), vec![Event::Ce(true), Event::Ce(false)]);
}

#[test]
fn unknown_register_is_rejected() {
    let log = Log::default();
    let mut t = transport(&log, false);
    assert_eq!(t.write_register("adc16_ctrl", 1, true), Err(SpiError::UnknownRegister));
    assert!(log.borrow().is_empty());
}

#[test]
fn renamed_registers_reach_the_pins() {
    let log = Log::default();
    let t = transport(&log, false).with_register_names("synth_en", "synth_ctrl");
    let mut dev = Lmx2581::new(t, 10.0).with_register_names("synth_en", "synth_ctrl");
    let rs = RegisterSet::default();
    dev.commit(&rs).unwrap();

    let log = log.borrow();
    assert_eq!(log[0], Event::Ce(true));
    let latches = log.iter().filter(|e| **e == Event::Le(true)).count();
    assert_eq!(latches, rs.to_words().len());

    let mut t = dev.release();
    assert_eq!(t.write_register("lmx_ctrl", 0, true), Err(SpiError::UnknownRegister));
}

#[test]
fn spi_failure_stops_commit() {
    let log = Log::default();
    let mut dev = Lmx2581::new(transport(&log, true), 10.0);
    assert_eq!(dev.commit(&RegisterSet::default()), Err(SpiError::Spi));
    // CE went high, nothing was latched
    assert_eq!(*log.borrow(), vec![Event::Ce(true)]);
}

#[test]
fn full_commit_over_spi() {
    let log = Log::default();
    let rs = gen_synth(200.0 + 3.0 / 4.0, 10.0, &SynthOptions::default()).unwrap();
    let mut dev = Lmx2581::new(transport(&log, false), 10.0);
    dev.commit(&rs).unwrap();

    let log = log.borrow();
    assert_eq!(log[0], Event::Ce(true));
    let shifted: Vec<u32> = log.iter()
        .filter_map(|e| match e {
            Event::Spi(b) => Some(u32::from_be_bytes([b[0], b[1], b[2], b[3]])),
            _ => None,
        })
        .collect();
    assert_eq!(&shifted[..], &rs.to_words()[..]);
    let latches = log.iter().filter(|e| **e == Event::Le(true)).count();
    assert_eq!(latches, rs.to_words().len());
}
