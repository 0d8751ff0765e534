///! Frequency calculations

use log::debug;

use crate::{constants::*, errors::*};


/// Divider settings for one output frequency
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct PllParameters {
    /// Integer part of the N divider
    pub n: u32,
    /// Fractional numerator, always < den
    pub num: u32,
    /// Fractional denominator, 1..=2^22 - 1
    pub den: u32,
    /// Channel divider between VCO and output, None if the VCO drives the output
    pub vco_divider: Option<u32>,
    /// Reference divider
    pub r: u32,
}

impl PllParameters {

    /// Divider the output frequency is multiplied by to get the VCO frequency
    #[inline]
    pub fn effective_divider(self: &Self) -> u32 {
        self.vco_divider.unwrap_or(1)
    }

    /// VCO frequency, MHz
    /// f VCO = OSCin / R x (N + NUM / DEN)
    pub fn vco_mhz(self: &Self, reference_mhz: f64) -> f64 {
        reference_mhz / self.r as f64
            * (self.n as f64 + self.num as f64 / self.den as f64)
    }

    /// Output frequency, MHz
    pub fn output_mhz(self: &Self, reference_mhz: f64) -> f64 {
        self.vco_mhz(reference_mhz) / self.effective_divider() as f64
    }

    /// Integer-N mode, no fractional part
    #[inline]
    pub fn is_integer(self: &Self) -> bool {
        self.num == 0
    }
}


/// Channel divider for a target output frequency.
///
/// None when the target already lies strictly inside the VCO range,
/// otherwise the smallest even divider that lifts the VCO to at least 1800 MHz.
pub fn vco_divider(target_mhz: f64) -> Option<u32> {
    if target_mhz > VCO_FREQ_MIN && target_mhz < VCO_FREQ_MAX {
        None
    } else {
        let guess = (libm::floor(VCO_FREQ_MIN / target_mhz) as u32).saturating_add(1);
        Some(guess.saturating_add(guess % 2))
    }
}


/// Work out N, NUM, DEN and the channel divider for a target frequency.
/// R is fixed at 1, the reference feeds the phase detector directly.
pub fn derive_pll_parameters(target_mhz: f64, reference_mhz: f64) -> Result<PllParameters, Error> {
    if !target_mhz.is_finite() || target_mhz <= 0.0 {
        return Err(Error::InvalidOutputFrequency);
    }
    if !reference_mhz.is_finite() || reference_mhz <= 0.0 {
        return Err(Error::InvalidReferenceFrequency);
    }

    let vco_divider = vco_divider(target_mhz);
    let divider = vco_divider.unwrap_or(1);

    let pll = divider as f64 * target_mhz / reference_mhz;
    if pll >= u32::MAX as f64 {
        return Err(Error::InvalidOutputFrequency);
    }
    let mut n = libm::floor(pll) as u32;
    let frac = pll - n as f64;

    let (num, den) = if frac < FRAC_RESOLUTION {
        (0, 1)
    } else {
        let (num, den) = best_rational(frac, PLL_DEN_MAX);
        if num == den {
            // rounded up to a whole step
            n += 1;
            (0, 1)
        } else {
            (num as u32, den as u32)
        }
    };

    let p = PllParameters { n, num, den, vco_divider, r: 1 };
    debug!("{} MHz from {} MHz: {:?}", target_mhz, reference_mhz, p);
    Ok(p)
}


/// (N, NUM, DEN, channel divider) for diagnostics
pub fn get_osc_values(target_mhz: f64, reference_mhz: f64) -> Result<(u32, u32, u32, Option<u32>), Error> {
    let p = derive_pll_parameters(target_mhz, reference_mhz)?;
    Ok((p.n, p.num, p.den, p.vco_divider))
}


/// Closest fraction p/q to `x` with q <= `max_den`, in lowest terms.
///
/// `x` must be in [0, 1). The float is taken at its exact binary value,
/// then walked down its continued fraction; the last convergent is compared
/// against the best semiconvergent that still fits the denominator limit.
pub fn best_rational(x: f64, max_den: u64) -> (u64, u64) {
    debug_assert!(x >= 0.0 && x < 1.0);
    debug_assert!(max_den >= 1 && max_den <= PLL_DEN_MAX);

    let (xn, xd) = exact_ratio(x);
    if xd <= max_den as u128 {
        return (xn as u64, xd as u64);
    }
    // nothing but 0/1 is that close to 0; also keeps the products below in range
    if x * 2.0 * (max_den as f64) < 1.0 {
        return (0, 1);
    }
    let max_den = max_den as u128;

    // convergents p0/q0, p1/q1
    let (mut p0, mut q0, mut p1, mut q1) = (0u128, 1u128, 1u128, 0u128);
    let (mut n, mut d) = (xn, xd);
    while d != 0 {
        let a = n / d;
        let q2 = q0 + a * q1;
        if q2 > max_den {
            break;
        }
        let p2 = p0 + a * p1;
        p0 = p1;
        q0 = q1;
        p1 = p2;
        q1 = q2;
        let rem = n - a * d;
        n = d;
        d = rem;
    }

    let k = (max_den - q0) / q1;
    let (sp, sq) = (p0 + k * p1, q0 + k * q1);

    // |p/q - xn/xd| = |p*xd - xn*q| / (q*xd), compare without dividing
    let err = |p: u128, q: u128| -> u128 {
        let a = p * xd;
        let b = xn * q;
        if a > b { a - b } else { b - a }
    };
    if err(p1, q1) * sq <= err(sp, sq) * q1 {
        (p1 as u64, q1 as u64)
    } else {
        (sp as u64, sq as u64)
    }
}

/// Exact value of a float in [0, 1) as numerator / power of two denominator,
/// reduced to lowest terms.
fn exact_ratio(x: f64) -> (u128, u128) {
    if x == 0.0 {
        return (0, 1);
    }
    let bits = x.to_bits();
    let exp = ((bits >> 52) & 0x7ff) as i32;
    let mut mantissa = bits & ((1u64 << 52) - 1);
    if exp != 0 {
        mantissa |= 1u64 << 52;
    }
    // x = mantissa * 2^(exp - 1075), exp - 1075 < 0 for x < 1
    let mut shift = (1075 - exp.max(1)) as u32;
    let tz = mantissa.trailing_zeros().min(shift);
    mantissa >>= tz;
    shift -= tz;
    if shift >= 127 {
        // far below any denominator limit this crate uses
        return (0, 1);
    }
    (mantissa as u128, 1u128 << shift)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_divider_inside_vco_range() {
        assert_eq!(vco_divider(1800.5), None);
        assert_eq!(vco_divider(2500.0), None);
        assert_eq!(vco_divider(3799.9), None);
    }

    #[test]
    fn divider_on_range_edges() {
        // edges are not strictly inside
        assert_eq!(vco_divider(1800.0), Some(2));
        assert_eq!(vco_divider(3800.0), Some(2));
    }

    #[test]
    fn divider_examples() {
        assert_eq!(vco_divider(200.0), Some(10));
        assert_eq!(vco_divider(250.0), Some(8));
        assert_eq!(vco_divider(500.0), Some(4));
        assert_eq!(vco_divider(1000.0), Some(2));
    }

    #[test]
    fn integer_ratio_snaps_to_integer_n() {
        let p = derive_pll_parameters(200.0, 10.0).unwrap();
        assert_eq!(p, PllParameters { n: 200, num: 0, den: 1, vco_divider: Some(10), r: 1 });
        assert!(p.is_integer());
        assert_eq!(p.vco_mhz(10.0), 2000.0);
        assert_eq!(p.output_mhz(10.0), 200.0);
    }

    #[test]
    fn third_of_a_megahertz() {
        let p = derive_pll_parameters(200.0 + 1.0 / 3.0, 10.0).unwrap();
        assert_eq!((p.n, p.num, p.den), (200, 1, 3));
        assert_eq!(p.vco_divider, Some(10));
    }

    #[test]
    fn large_denominator_is_found() {
        let p = derive_pll_parameters(200.0 + 23124.0 / 123323.0, 10.0).unwrap();
        assert_eq!((p.n, p.num, p.den), (200, 23124, 123323));
    }

    #[test]
    fn direct_vco_output() {
        let p = derive_pll_parameters(2500.0, 10.0).unwrap();
        assert_eq!(p, PllParameters { n: 250, num: 0, den: 1, vco_divider: None, r: 1 });
    }

    #[test]
    fn fraction_rounding_up_carries_into_n() {
        // 0.99999999999 is closer to 1/1 than to anything with q < 2^22
        let p = derive_pll_parameters(2000.0 + 0.999_999_999_99 * 10.0, 10.0).unwrap();
        assert_eq!((p.n, p.num, p.den), (201, 0, 1));
    }

    #[test]
    fn denominator_fits_pll_den() {
        // 3/2^22 itself needs one more bit than PLL_DEN has
        let p = derive_pll_parameters(2500.0 + 30.0 / (1u64 << 22) as f64, 10.0).unwrap();
        assert_eq!((p.n, p.num, p.den), (250, 2, 2_796_203));
        assert!(p.den as u64 <= PLL_DEN_MAX);
    }

    #[test]
    fn rejects_bad_frequencies() {
        assert_eq!(derive_pll_parameters(0.0, 10.0), Err(Error::InvalidOutputFrequency));
        assert_eq!(derive_pll_parameters(f64::INFINITY, 10.0), Err(Error::InvalidOutputFrequency));
        assert_eq!(derive_pll_parameters(200.0, -1.0), Err(Error::InvalidReferenceFrequency));
    }

    #[test]
    fn osc_values() {
        assert_eq!(get_osc_values(200.75, 10.0), Ok((200, 3, 4, Some(10))));
    }

    #[test]
    fn best_rational_simple() {
        assert_eq!(best_rational(0.5, PLL_DEN_MAX), (1, 2));
        assert_eq!(best_rational(0.0, PLL_DEN_MAX), (0, 1));
        assert_eq!(best_rational(1.0 / 3.0, PLL_DEN_MAX), (1, 3));
        assert_eq!(best_rational(core::f64::consts::PI - 3.0, 1000), (16, 113));
        assert_eq!(best_rational(core::f64::consts::PI - 3.0, 100), (14, 99));
    }

    #[test]
    fn best_rational_tiny_values() {
        assert_eq!(best_rational(1e-30, PLL_DEN_MAX), (0, 1));
        assert_eq!(best_rational(1.0 / 3_000_000.0, PLL_DEN_MAX), (1, 3_000_000));
    }

    #[test]
    fn exact_ratio_of_binary_fractions() {
        assert_eq!(exact_ratio(0.75), (3, 4));
        assert_eq!(exact_ratio(0.0), (0, 1));
        assert_eq!(exact_ratio(1.0 / 1024.0), (1, 1024));
    }
}
