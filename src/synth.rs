///! Register synthesis
///!
///! Turns PLL parameters into the full programming sequence.

use log::debug;

use crate::{
    config::*,
    constants::*,
    errors::*,
    frequency::*,
    refin::*,
    register::*,
};


/// VCO core covering a VCO frequency, MHz.
/// Upper band edges are inclusive, the lower band wins where bands overlap.
pub fn vco_band(vco_mhz: f64) -> Result<u32, Error> {
    if vco_mhz >= VCO_BANDS[0].0 {
        for (i, (_, max)) in VCO_BANDS.iter().enumerate() {
            if vco_mhz <= *max {
                return Ok(i as u32);
            }
        }
    }
    Err(Error::VcoOutOfRange { vco_mhz })
}

/// FRAC_DITHER for a fraction.
/// Large denominators with factors 2 and 3 get the reduced setting.
pub fn frac_dither(num: u32, den: u32, opts: &SynthOptions) -> FracDither {
    if num != 0 && den > 200 && den % 2 == 0 && den % 3 == 0 {
        opts.dither_reduced
    } else {
        opts.dither_default
    }
}

/// FRAC_ORDER for a fraction and the dithering chosen for it
pub fn frac_order(num: u32, den: u32, dither: FracDither) -> FracOrder {
    if num == 0 {
        FracOrder::IntN
    } else if den < 20 {
        FracOrder::First
    } else if den % 3 != 0 && dither == FracDither::Disabled {
        FracOrder::Third
    } else {
        FracOrder::Second
    }
}


/// Fill the register template with the computed fields.
/// Every field is width checked, nothing is truncated.
pub fn pack_registers(
    reference_mhz: f64,
    params: &PllParameters,
    opts: &SynthOptions,
) -> Result<RegisterSet, Error> {
    let refin = RefIn::new(reference_mhz, params.r)?;

    let vco_mhz = params.vco_mhz(reference_mhz);
    let band = vco_band(vco_mhz)?;
    let dither = frac_dither(params.num, params.den, opts);
    let order = frac_order(params.num, params.den, dither);
    debug!("VCO {} MHz, band {}, {:?}, {:?}", vco_mhz, band, order, dither);

    let divided = params.vco_divider.is_some() as u32;

    let mut rs = RegisterSet::default();
    rs.init.w = opts.init_word;

    let rs = rs
        // lock detect
        .set(DldTol(refin.dld_tol()))?
        .set(DldPassCnt(opts.lock_detect_pass_count))?
        .set(DldErrCnt(opts.lock_detect_error_count))?

        .set(RdAddr(opts.readback_address))?

        // output routing, reference buffer
        .set(OutAMux(divided))?
        .set(OutBMux(divided))?
        .set(VcoSelMode(opts.vco_sel_mode))?
        .set(BufEnDis(opts.buffer_enable_disabled as u32))?
        .set(OscFreq(refin.osc_freq()))?

        // output power
        .set(OutAPwr(opts.output_power))?
        .set(OutBPwr(opts.output_power))?

        .set(PllDen(params.den))?

        .set(Cpg(opts.charge_pump_gain))?
        .set(VcoSel(band))?
        .set(PllNumHigh(params.num >> 12))?
        .set(order)?
        .set(PllR(refin.r()))?

        .set(dither)?
        .set(PllN(params.n))?
        .set(PllNumLow(params.num & 0xFFF))?;

    let rs = match params.vco_divider {
        Some(d) => rs.set(VcoDiv((d / 2).saturating_sub(1)))?,
        None => rs,
    };

    opts.set_pins(rs)
}


/// Programming sequence for an output frequency
pub fn gen_synth(
    target_mhz: f64,
    reference_mhz: f64,
    opts: &SynthOptions,
) -> Result<RegisterSet, Error> {
    let params = derive_pll_parameters(target_mhz, reference_mhz)?;
    pack_registers(reference_mhz, &params, opts)
}
