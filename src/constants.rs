//! Constants
//!
//! Frequencies are in MHz throughout the crate.

/// Lower edge of the VCO range, MHz.
/// The output divider is chosen so the VCO never runs below this.
pub const VCO_FREQ_MIN: f64 = 1800.0;

/// Upper edge of the VCO range, MHz
pub const VCO_FREQ_MAX: f64 = 3800.0;

/// The four VCO cores, (min, max) MHz, both edges inclusive.
/// Neighbouring bands overlap, the lower band wins on the overlap.
pub const VCO_BANDS: [(f64, f64); 4] = [
    (1800.0, 2270.0),
    (2135.0, 2720.0),
    (2610.0, 3220.0),
    (3075.0, 3800.0),
];

/// Largest fractional denominator, all ones in the 22 bit PLL_DEN field
pub const PLL_DEN_MAX: u64 = (1 << 22) - 1;

/// Fractions below the fractional modulator resolution snap to integer-N
pub const FRAC_RESOLUTION: f64 = 1.0 / (1u64 << 22) as f64;

/// OSC_FREQ is derived from the reference frequency relative to 32 MHz
pub const OSC_FREQ_BASE_MHZ: f64 = 32.0;

/// Largest OSC_FREQ code (>= 512 MHz)
pub const OSC_FREQ_MAX_CODE: u32 = 4;

/// Digital lock detect tolerance tiers: (phase detector frequency lower bound, DLD_TOL).
/// The first tier whose bound is exceeded wins, everything at or below 30 MHz gets 5.
pub const DLD_TOL_TIERS: [(f64, u32); 5] = [
    (130.0, 0),
    (80.0, 1),
    (60.0, 2),
    (45.0, 3),
    (30.0, 4),
];

/// DLD_TOL for phase detector frequencies up to 30 MHz
pub const DLD_TOL_SLOWEST: u32 = 5;

/// Reset word written ahead of R15.
/// This is the value TI Code Loader emits and it has been observed to reset
/// the part on hardware; datasheets place the RESET bit in R5 instead.
pub const INIT_WORD: u32 = 0x4087_0010;

/// Chip default register contents with every computed field cleared,
/// in write order R15, R13, R10, R9, R8, R7, R6, R5, R4, R3, R2, R1, R0.
/// Bits that are not computed are programmed exactly as shown.
pub const REGISTER_TEMPLATE: [u32; 13] = [
    0b0000_0010_0001_1111_1110_0000_0000_1111, // R15
    0b0000_0000_0000_0000_0100_0001_0000_1101, // R13
    0b0010_0001_0000_0000_0101_0000_1100_1010, // R10
    0b0000_0011_1100_0111_1100_0000_0011_1001, // R9
    0b0010_0000_0111_1101_1101_1011_1111_1000, // R8
    0b0000_0000_0000_0000_0000_0000_0000_0111, // R7
    0b0000_0000_0000_0000_0000_0100_0000_0110, // R6
    0b0000_0000_0000_0000_0000_0000_0000_0101, // R5
    0b0000_0000_0000_0000_0000_0000_0000_0100, // R4
    0b0010_0000_0000_0000_0000_0000_0000_0011, // R3
    0b0000_0100_0000_0000_0000_0000_0000_0010, // R2
    0b0000_0000_0000_0000_0000_0000_0000_0001, // R1
    0b0000_0000_0000_0000_0000_0000_0000_0000, // R0
];

/// Board register that routes the synth output to the ADCs
pub const ENABLE_REGISTER: &str = "adc16_use_synth";

/// Value written to `ENABLE_REGISTER` ahead of programming
pub const ENABLE_VALUE: u32 = 1;

/// Board register that shifts one 32 bit word into the LMX2581
pub const CONTROL_REGISTER: &str = "lmx_ctrl";
