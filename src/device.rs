///! Register writer
///!
///! Streams a programming sequence to the chip through a board transport.

use core::fmt;

use embedded_hal:: {
    digital::v2::OutputPin,
    blocking::{ delay::*, spi::*, },
};
use log::{trace, warn};

use crate::{config::*, constants::*, errors::*, register::*, synth::*};


/// Named register write primitive of the board the chip sits on.
///
/// Writes are synchronous: a returned `Ok` means the value reached the board.
/// `ordered` asks the transport to deliver the write in sequence with the
/// writes before it.
pub trait Transport {
    type Error;

    fn write_register(&mut self, name: &str, value: u32, ordered: bool) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    #[inline]
    fn write_register(&mut self, name: &str, value: u32, ordered: bool) -> Result<(), Self::Error> {
        (**self).write_register(name, value, ordered)
    }
}


/// Failure of a convenience entry point
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DeviceError<E> {
    /// Registers could not be synthesized or loaded, nothing was written
    Config(Error),
    /// Transport failed part way through the sequence
    Transport(E),
}

impl<E> From<Error> for DeviceError<E> {
    fn from(e: Error) -> Self {
        DeviceError::Config(e)
    }
}

impl<E: fmt::Debug> fmt::Display for DeviceError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::Config(e) => write!(f, "{}", e),
            DeviceError::Transport(e) => write!(f, "transport error: {:?}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for DeviceError<E> {}


/// LMX2581 device
///
/// Holds the transport exclusively; one `commit` runs to completion
/// before anything else can write to the chip.
pub struct Lmx2581<T> {
    transport: T,
    opts: SynthOptions,
    reference_mhz: f64,
    enable_register: &'static str,
    control_register: &'static str,
}

impl<T> Lmx2581<T>
where T: Transport,
{
    /// Creates the device, nothing is written.
    ///
    /// `transport` - board register access
    /// `reference_mhz` - OSCin frequency
    pub fn new(transport: T, reference_mhz: f64) -> Self {
        Lmx2581 {
            transport,
            opts: SynthOptions::default(),
            reference_mhz,
            enable_register: ENABLE_REGISTER,
            control_register: CONTROL_REGISTER,
        }
    }

    /// Replace synthesis options
    pub fn with_options(mut self: Self, opts: SynthOptions) -> Self {
        self.opts = opts;
        self
    }

    /// Board register names for the enable switch and the chip control word
    pub fn with_register_names(mut self: Self, enable: &'static str, control: &'static str) -> Self {
        self.enable_register = enable;
        self.control_register = control;
        self
    }

    pub fn options(self: &Self) -> &SynthOptions {
        &self.opts
    }

    pub fn reference_mhz(self: &Self) -> f64 {
        self.reference_mhz
    }

    /// Give the transport back
    pub fn release(self: Self) -> T {
        self.transport
    }

    /// Enables the synth, then writes every word in sequence order.
    /// Blocking call; the first failed write aborts the sequence and the
    /// chip keeps whatever was written up to that point.
    pub fn commit(self: &mut Self, rs: &RegisterSet) -> Result<(), T::Error> {
        self.transport.write_register(self.enable_register, ENABLE_VALUE, false)
            .map_err(|e| { warn!("enabling synth failed"); e })?;

        for (slot, w) in rs.iter() {
            trace!("{} <- {} {:#010x}", self.control_register, slot.name(), w);
            self.transport.write_register(self.control_register, w, true)
                .map_err(|e| { warn!("writing {} failed, sequence aborted", slot.name()); e })?;
        }
        Ok(())
    }

    /// Program the chip from a Code Loader register dump
    #[cfg(feature = "std")]
    pub fn from_codeloader<P>(self: &mut Self, path: P) -> Result<RegisterSet, DeviceError<T::Error>>
    where P: AsRef<std::path::Path>,
    {
        let rs = crate::hexdump::load_registers_from_file(path)?;
        self.commit(&rs).map_err(DeviceError::Transport)?;
        Ok(rs)
    }

    /// Program the chip for an output frequency
    pub fn from_gen_synth(self: &mut Self, target_mhz: f64) -> Result<RegisterSet, DeviceError<T::Error>> {
        let rs = gen_synth(target_mhz, self.reference_mhz, &self.opts)?;
        self.commit(&rs).map_err(DeviceError::Transport)?;
        Ok(rs)
    }
}


/// Bit-banged transport errors
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SpiError {
    Spi,
    Pin,
    /// Register name the transport has no mapping for
    UnknownRegister,
}


/// Direct connection to the chip: SPI for data, CE and LE pins.
///
/// The enable register drives CE, the control register shifts a word
/// out MSB first and latches it with an LE pulse. Register names must match
/// the ones the `Lmx2581` writer uses (`with_register_names` on both).
pub struct SpiTransport<SPI, CE, LE, D> {
    spi: SPI,
    pin_ce: CE,
    pin_le: LE,
    delay: D,
    enable_register: &'static str,
    control_register: &'static str,
}

impl<SPI, CE, LE, D> SpiTransport<SPI, CE, LE, D>
where SPI: Write<u8>,
      CE: OutputPin,
      LE: OutputPin,
      D: DelayUs<u16>,
{
    /// `spi` - SPI device (`MOSI` => `DATA`, `CLK` => `CLK`, `CPHA` = 0)
    /// `pin_ce` - "chip enable" pin
    /// `pin_le` - "latch enable" pin
    pub fn new(spi: SPI, pin_ce: CE, pin_le: LE, delay: D) -> Self {
        SpiTransport {
            spi,
            pin_ce,
            pin_le,
            delay,
            enable_register: ENABLE_REGISTER,
            control_register: CONTROL_REGISTER,
        }
    }

    /// Answer to other enable / control register names
    pub fn with_register_names(mut self: Self, enable: &'static str, control: &'static str) -> Self {
        self.enable_register = enable;
        self.control_register = control;
        self
    }

    pub fn release(self: Self) -> (SPI, CE, LE, D) {
        (self.spi, self.pin_ce, self.pin_le, self.delay)
    }

    /// Data is clocked into the 32-bit shift register on each rising edge
    /// of CLK, MSB first, and latched into the addressed register on the
    /// rising edge of LE.
    pub fn shift_word(self: &mut Self, w: u32) -> Result<(), SpiError> {
        self.spi.write(&w.to_be_bytes()).map_err(|_| SpiError::Spi)?;

        self.delay.delay_us(5);
        self.pin_le.set_high().map_err(|_| SpiError::Pin)?;
        self.delay.delay_us(10);
        self.pin_le.set_low().map_err(|_| SpiError::Pin)?;
        self.delay.delay_us(5);

        Ok(())
    }

    /// Powers the chip up or down
    pub fn chip_enable(self: &mut Self, on: bool) -> Result<(), SpiError> {
        if on {
            self.pin_ce.set_high().map_err(|_| SpiError::Pin)
        } else {
            self.pin_ce.set_low().map_err(|_| SpiError::Pin)
        }
    }
}

impl<SPI, CE, LE, D> Transport for SpiTransport<SPI, CE, LE, D>
where SPI: Write<u8>,
      CE: OutputPin,
      LE: OutputPin,
      D: DelayUs<u16>,
{
    type Error = SpiError;

    /// Words always go out in call order, `ordered` has nothing to add here.
    fn write_register(&mut self, name: &str, value: u32, _ordered: bool) -> Result<(), SpiError> {
        if name == self.enable_register {
            self.chip_enable(value != 0)
        } else if name == self.control_register {
            self.shift_word(value)
        } else {
            Err(SpiError::UnknownRegister)
        }
    }
}
