//! LMX2581 registers

use core::fmt;
use core::marker::PhantomData;

use crate::{constants::*, errors::*};

/// Number of words in a full programming sequence
pub const NUM_SLOTS: usize = 14;

/// Register naming for diagnostics
pub trait RegName {
    fn name() -> &'static str;
}

/// Register marker types
macro_rules! gen_register_marker {
    ($r:ident, $name:expr, $template:expr) => {
        /// Register marker
        #[derive(Debug,Copy,Clone,PartialEq)]
        pub struct $r {}

        impl RegName for $r { #[inline] fn name() -> &'static str { $name } }

        impl Default for Reg<$r> { #[inline] fn default() -> Self { Reg::new($template) } }
    }
}

gen_register_marker!(Init, "INIT", INIT_WORD);
gen_register_marker!(R15, "R15", REGISTER_TEMPLATE[0]);
gen_register_marker!(R13, "R13", REGISTER_TEMPLATE[1]);
gen_register_marker!(R10, "R10", REGISTER_TEMPLATE[2]);
gen_register_marker!(R9, "R9", REGISTER_TEMPLATE[3]);
gen_register_marker!(R8, "R8", REGISTER_TEMPLATE[4]);
gen_register_marker!(R7, "R7", REGISTER_TEMPLATE[5]);
gen_register_marker!(R6, "R6", REGISTER_TEMPLATE[6]);
gen_register_marker!(R5, "R5", REGISTER_TEMPLATE[7]);
gen_register_marker!(R4, "R4", REGISTER_TEMPLATE[8]);
gen_register_marker!(R3, "R3", REGISTER_TEMPLATE[9]);
gen_register_marker!(R2, "R2", REGISTER_TEMPLATE[10]);
gen_register_marker!(R1, "R1", REGISTER_TEMPLATE[11]);
gen_register_marker!(R0, "R0", REGISTER_TEMPLATE[12]);


/// Single control register
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct Reg<R> {
    /// Control register word
    pub w: u32,
    phantom: PhantomData<R>,
}

/// Bit operations on 32bit words
impl<R> Reg<R> {
    #[inline]
    pub fn new(w: u32) -> Self {
        Reg { w, phantom: PhantomData }
    }

    #[inline]
    pub fn get<F>(self: &Self) -> F
    where F: BitField<R> + From<u32>
    {
        F::from(
            (self.w >> F::offset()) & F::mask()
        )
    }

    /// Replace a bit field.
    /// Values wider than the field are rejected, the register is left untouched.
    #[inline]
    pub fn set<F>(mut self: Self, f: F) -> Result<Self, Error>
    where F: BitField<R> + Into<u32>,
          R: RegName,
    {
        let v: u32 = f.into();
        if v & !F::mask() != 0 {
            return Err(Error::FieldOverflow { register: R::name(), field: F::name(), value: v });
        }
        let rbits = self.w & !(F::mask() << F::offset());
        self.w = rbits | (v << F::offset());
        Ok(self)
    }
}


/// Position of a word in the programming sequence.
///
/// The chip wants the reset word first, then R15 down to R0;
/// R0 goes last because writing it starts VCO calibration.
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum Slot {
    Init,
    R15,
    R13,
    R10,
    R9,
    R8,
    R7,
    R6,
    R5,
    R4,
    R3,
    R2,
    R1,
    R0,
}

impl Slot {
    /// All slots, in the order they must be written
    pub const WRITE_ORDER: [Slot; NUM_SLOTS] = [
        Slot::Init,
        Slot::R15,
        Slot::R13,
        Slot::R10,
        Slot::R9,
        Slot::R8,
        Slot::R7,
        Slot::R6,
        Slot::R5,
        Slot::R4,
        Slot::R3,
        Slot::R2,
        Slot::R1,
        Slot::R0,
    ];

    /// Chip register address encoded in the low 4 bits of the word.
    /// The reset word has no address of its own.
    pub fn address(self: Self) -> Option<u8> {
        match self {
            Slot::Init => None,
            Slot::R15 => Some(15),
            Slot::R13 => Some(13),
            Slot::R10 => Some(10),
            Slot::R9 => Some(9),
            Slot::R8 => Some(8),
            Slot::R7 => Some(7),
            Slot::R6 => Some(6),
            Slot::R5 => Some(5),
            Slot::R4 => Some(4),
            Slot::R3 => Some(3),
            Slot::R2 => Some(2),
            Slot::R1 => Some(1),
            Slot::R0 => Some(0),
        }
    }

    pub fn name(self: Self) -> &'static str {
        match self {
            Slot::Init => Init::name(),
            Slot::R15 => R15::name(),
            Slot::R13 => R13::name(),
            Slot::R10 => R10::name(),
            Slot::R9 => R9::name(),
            Slot::R8 => R8::name(),
            Slot::R7 => R7::name(),
            Slot::R6 => R6::name(),
            Slot::R5 => R5::name(),
            Slot::R4 => R4::name(),
            Slot::R3 => R3::name(),
            Slot::R2 => R2::name(),
            Slot::R1 => R1::name(),
            Slot::R0 => R0::name(),
        }
    }

    /// Index into the programming sequence
    #[inline]
    pub fn index(self: Self) -> usize {
        self as usize
    }
}


/// Full programming sequence.
/// Defaults to the chip template with every computed field cleared.
///
/// Power-up programming: reset word, then R15, R13, R10 .. R0.
/// Field order of this struct is the write order.
#[derive(Debug,Copy,Clone,PartialEq,Default)]
pub struct RegisterSet {
    pub init: Reg<Init>,
    pub r15: Reg<R15>,
    pub r13: Reg<R13>,
    pub r10: Reg<R10>,
    pub r9: Reg<R9>,
    pub r8: Reg<R8>,
    pub r7: Reg<R7>,
    pub r6: Reg<R6>,
    pub r5: Reg<R5>,
    pub r4: Reg<R4>,
    pub r3: Reg<R3>,
    pub r2: Reg<R2>,
    pub r1: Reg<R1>,
    pub r0: Reg<R0>,
}

/// Type-indexed register access
pub trait RIdx<R> {
    fn r(self: &Self) -> Reg<R>;
    fn update_r<F>(self: Self, f: F) -> Result<Self, Error>
    where Self: Sized,
          F: FnOnce(Reg<R>) -> Result<Reg<R>, Error>;
}

macro_rules! gen_register_index {
    ($r:ident, $f:tt) => {
        impl RIdx<$r> for RegisterSet {
            #[inline]
            fn r(self: &Self) -> Reg<$r> { self.$f }
            #[inline]
            fn update_r<F>(mut self: Self, f: F) -> Result<Self, Error>
            where F: FnOnce(Reg<$r>) -> Result<Reg<$r>, Error>
            {
                self.$f = f(self.$f)?;
                Ok(self)
            }
        }
    }
}

gen_register_index!(Init, init);
gen_register_index!(R15, r15);
gen_register_index!(R13, r13);
gen_register_index!(R10, r10);
gen_register_index!(R9, r9);
gen_register_index!(R8, r8);
gen_register_index!(R7, r7);
gen_register_index!(R6, r6);
gen_register_index!(R5, r5);
gen_register_index!(R4, r4);
gen_register_index!(R3, r3);
gen_register_index!(R2, r2);
gen_register_index!(R1, r1);
gen_register_index!(R0, r0);


impl RegisterSet {

    /// Register values in write order.
    pub fn to_words(self: &Self) -> [u32; NUM_SLOTS] {
        [
            self.init.w,
            self.r15.w,
            self.r13.w,
            self.r10.w,
            self.r9.w,
            self.r8.w,
            self.r7.w,
            self.r6.w,
            self.r5.w,
            self.r4.w,
            self.r3.w,
            self.r2.w,
            self.r1.w,
            self.r0.w,
        ]
    }

    /// Register set from raw words in write order, taken verbatim.
    pub fn from_words(w: [u32; NUM_SLOTS]) -> Self {
        RegisterSet {
            init: Reg::new(w[0]),
            r15: Reg::new(w[1]),
            r13: Reg::new(w[2]),
            r10: Reg::new(w[3]),
            r9: Reg::new(w[4]),
            r8: Reg::new(w[5]),
            r7: Reg::new(w[6]),
            r6: Reg::new(w[7]),
            r5: Reg::new(w[8]),
            r4: Reg::new(w[9]),
            r3: Reg::new(w[10]),
            r2: Reg::new(w[11]),
            r1: Reg::new(w[12]),
            r0: Reg::new(w[13]),
        }
    }

    /// Word stored in a slot
    #[inline]
    pub fn word(self: &Self, slot: Slot) -> u32 {
        self.to_words()[slot.index()]
    }

    /// Slots paired with their words, in write order.
    pub fn iter(self: &Self) -> impl Iterator<Item = (Slot, u32)> {
        let words = self.to_words();
        Slot::WRITE_ORDER.iter().map(move |s| (*s, words[s.index()]))
    }

    /// Get register bitfield value
    #[inline]
    pub fn get<F,R>(self: &Self) -> F
    where F: BitField<R> + From<u32>,
          Self: RIdx<R>
    {
        <Self as RIdx<R>>::r(self).get()
    }

    /// Update register bitfield
    #[inline]
    pub fn set<F,R>(self: Self, f: F) -> Result<Self, Error>
    where F: BitField<R> + Into<u32>,
          R: RegName,
          Self: RIdx<R>
    {
        <Self as RIdx<R>>::update_r(self, |r| r.set(f))
    }
}

/// Code Loader style listing, one `NAME<TAB>0xXXXXXXXX` line per slot, CRLF terminated.
impl fmt::Display for RegisterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (slot, w) in self.iter() {
            write!(f, "{}\t{:#010X}\r\n", slot.name(), w)?;
        }
        Ok(())
    }
}



/// Bit operations on 32bit words
pub trait BitField<R> {
    /// Datasheet field name
    fn name() -> &'static str;

    /// Number of bits in the bit field
    fn num_bits() -> u8;

    /// Offset from 0
    fn offset() -> u8;

    #[inline]
    fn mask() -> u32 {
        !(0xFFFFFFFFu32 << Self::num_bits())
    }
}

/// Generate BitField implementation
macro_rules! gen_bitfield_impl {
	($r:ty, $n:ident, $name:expr, $nb:tt, $off:tt) => {
        impl BitField<$r> for $n {
            #[inline] fn name() -> &'static str { $name }
            #[inline] fn num_bits() -> u8 { $nb }
            #[inline] fn offset() -> u8 { $off }
        }
    }
}

/// Bitfield-encoded numbers boilerplate
macro_rules! gen_bitfield_struct {
	($(#[$meta:meta])*, $r:ty, $n:ident, $name:expr, $nb:tt, $off:tt) => {
        $(#[$meta])*
        #[derive(Debug,Copy,Clone,PartialEq)]
        pub struct $n(pub u32);

        gen_bitfield_impl!($r, $n, $name, $nb, $off);

        impl From<u32> for $n { #[inline] fn from(x: u32) -> Self { $n(x) } }
        impl From<$n> for u32 { #[inline] fn from(f: $n) -> u32 { f.0 } }
	};
}

macro_rules! gen_bitfield_enum {
	($r:ty, $n:ident, $name:expr, $nb:tt, $off:tt) => {
        gen_bitfield_impl!($r, $n, $name, $nb, $off);

        impl From<$n> for u32 { #[inline] fn from(f: $n) -> u32 { f as u32 } }
    }
}


gen_bitfield_struct!(
    /// PLL_N, integer part of the N divider.
    , R0, PllN, "PLL_N", 12, 16
);

gen_bitfield_struct!(
    /// Lower 12 bits of the 22 bit fractional numerator PLL_NUM
    , R0, PllNumLow, "PLL_NUM[11:0]", 12, 4
);


/// FRAC_DITHER sets the dithering used by the fractional modulator.
/// Dithering trades spurs for phase noise; it helps when the
/// denominator has small factors and hurts otherwise.
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum FracDither {
    Weak,
    Medium,
    Strong,
    Disabled,
}
gen_bitfield_enum!(R0, FracDither, "FRAC_DITHER", 2, 29);

impl From<u32> for FracDither {
    fn from(x: u32) -> Self {
        match x & 0b11 {
            0 => FracDither::Weak,
            1 => FracDither::Medium,
            2 => FracDither::Strong,
            _ => FracDither::Disabled,
        }
    }
}


gen_bitfield_struct!(
    /// CPG, charge pump gain. 0 is three-state, each step adds 1 x 110 uA.
    , R1, Cpg, "CPG", 5, 27
);

gen_bitfield_struct!(
    /// VCO_SEL, VCO core the band calibration starts from.
    , R1, VcoSel, "VCO_SEL", 2, 25
);

gen_bitfield_struct!(
    /// Upper 10 bits of the 22 bit fractional numerator PLL_NUM
    , R1, PllNumHigh, "PLL_NUM[21:12]", 10, 15
);


/// FRAC_ORDER, delta-sigma modulator order.
/// Integer-N mode runs with the modulator off.
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum FracOrder {
    IntN,
    First,
    Second,
    Third,
    Fourth,
    Reserved,
}
gen_bitfield_enum!(R1, FracOrder, "FRAC_ORDER", 3, 12);

impl From<u32> for FracOrder {
    fn from(x: u32) -> Self {
        match x {
            0 => FracOrder::IntN,
            1 => FracOrder::First,
            2 => FracOrder::Second,
            3 => FracOrder::Third,
            4 => FracOrder::Fourth,
            _ => FracOrder::Reserved,
        }
    }
}

gen_bitfield_struct!(
    /// PLL_R, reference divider ahead of the phase detector.
    , R1, PllR, "PLL_R", 8, 4
);


gen_bitfield_struct!(
    /// PLL_DEN, 22 bit fractional denominator.
    , R2, PllDen, "PLL_DEN", 22, 4
);


gen_bitfield_struct!(
    /// VCO_DIV, output divider. Divides by 2 x (VCO_DIV + 1).
    , R3, VcoDiv, "VCO_DIV", 5, 18
);

gen_bitfield_struct!(
    /// OUTB_PWR, RFoutB power level
    , R3, OutBPwr, "OUTB_PWR", 6, 12
);

gen_bitfield_struct!(
    /// OUTA_PWR, RFoutA power level
    , R3, OutAPwr, "OUTA_PWR", 6, 6
);


// R5: OUT_LDEN 24, OSC_FREQ 23:21, BUFEN_DIS 20, VCO_SEL_MODE 16:15,
// OUTB_MUX 14:13, OUTA_MUX 12:11, 0_DLY 10, MODE 9:8, PWDN_MODE 7:5, RESET 4

gen_bitfield_struct!(
    /// OSC_FREQ, reference frequency range for the input buffer.
    /// 0: < 64 MHz, 1: 64..128, 2: 128..256, 3: 256..512, 4: >= 512 MHz
    , R5, OscFreq, "OSC_FREQ", 3, 21
);

gen_bitfield_struct!(
    /// BUFEN_DIS, ignore the BUFEN pin
    , R5, BufEnDis, "BUFEN_DIS", 1, 20
);

gen_bitfield_struct!(
    /// VCO_SEL_MODE, how the band calibration picks its starting core
    , R5, VcoSelMode, "VCO_SEL_MODE", 2, 15
);

gen_bitfield_struct!(
    /// OUTB_MUX, 1 routes the channel divider to RFoutB
    , R5, OutBMux, "OUTB_MUX", 2, 13
);

gen_bitfield_struct!(
    /// OUTA_MUX, 1 routes the channel divider to RFoutA
    , R5, OutAMux, "OUTA_MUX", 2, 11
);


gen_bitfield_struct!(
    /// RDADDR, register presented on the readback path
    , R6, RdAddr, "RDADDR", 4, 4
);


gen_bitfield_struct!(, R7, FlSelect, "FL_SELECT", 5, 26);
gen_bitfield_struct!(, R7, FlPinMode, "FL_PINMODE", 3, 23);
gen_bitfield_struct!(, R7, FlInv, "FL_INV", 1, 22);
gen_bitfield_struct!(, R7, MuxoutSelect, "MUXOUT_SELECT", 5, 17);
gen_bitfield_struct!(, R7, MuxInv, "MUX_INV", 1, 16);
gen_bitfield_struct!(, R7, MuxoutPinMode, "MUXOUT_PINMODE", 3, 13);
gen_bitfield_struct!(, R7, LdSelect, "LD_SELECT", 5, 8);
gen_bitfield_struct!(, R7, LdInv, "LD_INV", 1, 7);
gen_bitfield_struct!(, R7, LdPinMode, "LD_PINMODE", 3, 4);


gen_bitfield_struct!(
    /// DLD_ERR_CNT, phase errors tolerated before digital lock detect drops
    , R13, DldErrCnt, "DLD_ERR_CNT", 4, 28
);

gen_bitfield_struct!(
    /// DLD_PASS_CNT, good phase detector cycles needed to declare lock
    , R13, DldPassCnt, "DLD_PASS_CNT", 10, 18
);

gen_bitfield_struct!(
    /// DLD_TOL, lock detect window; must track the phase detector frequency
    , R13, DldTol, "DLD_TOL", 3, 15
);
