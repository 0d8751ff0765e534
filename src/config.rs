///! Synthesis options
///!
///! Lock detect tuning, output power and every chip constant whose
///! default has only been confirmed on hardware, not derived from the datasheet.

use crate::{constants::*, register::*};


/// Pin configuration for one of the FLout / MUXout / LD pins (R7)
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct PinConfig {
    /// Signal routed to the pin (xx_SELECT)
    pub select: u32,
    /// Invert the pin output (xx_INV)
    pub inverted: bool,
    /// Pin driver mode (xx_PINMODE), 0 is three-state, 1 push-pull
    pub pin_mode: u32,
}

impl PinConfig {
    pub const fn new(select: u32, inverted: bool, pin_mode: u32) -> Self {
        PinConfig { select, inverted, pin_mode }
    }

    /// Pin held in three-state
    pub const fn disabled() -> Self {
        PinConfig::new(0, false, 0)
    }
}


/// Options applied on top of the computed PLL fields
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct SynthOptions {
    /// DLD_ERR_CNT
    pub lock_detect_error_count: u32,
    /// DLD_PASS_CNT
    pub lock_detect_pass_count: u32,
    /// OUTA_PWR and OUTB_PWR, 0..=47
    pub output_power: u32,

    /// Fast lock pin
    pub fl_pin: PinConfig,
    /// MUXout pin
    pub muxout_pin: PinConfig,
    /// Lock detect pin
    pub ld_pin: PinConfig,

    /// RDADDR
    pub readback_address: u32,
    /// VCO_SEL_MODE
    pub vco_sel_mode: u32,
    /// BUFEN_DIS
    pub buffer_enable_disabled: bool,
    /// CPG. Only the top bits are set by default; observed to lock, not tuned
    pub charge_pump_gain: u32,

    /// Dithering when the denominator is large and divisible by 6
    pub dither_reduced: FracDither,
    /// Dithering for everything else
    pub dither_default: FracDither,

    /// Reset word written ahead of R15
    pub init_word: u32,
}

impl Default for SynthOptions {
    fn default() -> Self {
        SynthOptions {
            lock_detect_error_count: 4,
            lock_detect_pass_count: 32,
            output_power: 15,
            fl_pin: PinConfig::disabled(),
            muxout_pin: PinConfig::new(6, false, 1),
            ld_pin: PinConfig::new(4, false, 1),
            readback_address: 6,
            vco_sel_mode: 1,
            buffer_enable_disabled: false,
            charge_pump_gain: 0b11000,
            dither_reduced: FracDither::Weak,
            dither_default: FracDither::Disabled,
            init_word: INIT_WORD,
        }
    }
}

impl SynthOptions {
    pub fn with_lock_detect(mut self: Self, error_count: u32, pass_count: u32) -> Self {
        self.lock_detect_error_count = error_count;
        self.lock_detect_pass_count = pass_count;
        self
    }

    pub fn with_output_power(mut self: Self, power: u32) -> Self {
        self.output_power = power;
        self
    }

    pub fn with_pins(mut self: Self, fl: PinConfig, muxout: PinConfig, ld: PinConfig) -> Self {
        self.fl_pin = fl;
        self.muxout_pin = muxout;
        self.ld_pin = ld;
        self
    }

    pub fn with_dither(mut self: Self, reduced: FracDither, default: FracDither) -> Self {
        self.dither_reduced = reduced;
        self.dither_default = default;
        self
    }

    pub fn with_charge_pump_gain(mut self: Self, cpg: u32) -> Self {
        self.charge_pump_gain = cpg;
        self
    }

    pub fn with_init_word(mut self: Self, w: u32) -> Self {
        self.init_word = w;
        self
    }

    /// Apply R7 pin configuration
    pub fn set_pins(self: &Self, rs: RegisterSet) -> Result<RegisterSet, crate::errors::Error> {
        rs.set(FlSelect(self.fl_pin.select))?
          .set(FlInv(self.fl_pin.inverted as u32))?
          .set(FlPinMode(self.fl_pin.pin_mode))?
          .set(MuxoutSelect(self.muxout_pin.select))?
          .set(MuxInv(self.muxout_pin.inverted as u32))?
          .set(MuxoutPinMode(self.muxout_pin.pin_mode))?
          .set(LdSelect(self.ld_pin.select))?
          .set(LdInv(self.ld_pin.inverted as u32))?
          .set(LdPinMode(self.ld_pin.pin_mode))
    }
}
