///! Input reference config
///! OSCin / R divider / phase detector

use crate::{ constants::*, errors::* };


/// Input reference frequency config
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct RefIn {
    /// Input frequency, MHz
    f: f64,
    /// PLL_R divider value
    r: u32,
}

impl RefIn {

    /// Configure reference input frequency
    pub fn new(
        f: f64,
        r: u32,
    ) -> Result<Self, Error> {
        if !f.is_finite() || f <= 0.0 || r == 0 {
            Err(Error::InvalidReferenceFrequency)
        } else {
            Ok(RefIn { f, r })
        }
    }

    /// PLL_R
    #[inline]
    pub fn r(self: &Self) -> u32 {
        self.r
    }

    /// Phase detector frequency, MHz
    /// f PD = OSCin / R
    pub fn f_pd(self: &Self) -> f64 {
        self.f / self.r as f64
    }

    /// OSC_FREQ code, floor(log2(OSCin / 32 MHz)) clamped to 0..=4
    pub fn osc_freq(self: &Self) -> u32 {
        let code = libm::floor(libm::log2(self.f / OSC_FREQ_BASE_MHZ));
        if code <= 0.0 {
            0
        } else if code >= OSC_FREQ_MAX_CODE as f64 {
            OSC_FREQ_MAX_CODE
        } else {
            code as u32
        }
    }

    /// DLD_TOL for the current phase detector frequency.
    /// Faster phase detectors need a tighter lock window.
    pub fn dld_tol(self: &Self) -> u32 {
        let f_pd = self.f_pd();
        DLD_TOL_TIERS.iter()
            .find(|(bound, _)| f_pd > *bound)
            .map(|(_, tol)| *tol)
            .unwrap_or(DLD_TOL_SLOWEST)
    }
}
