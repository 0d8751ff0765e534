//! Property-based tests for divider selection and fraction search

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

use lmx2581::{
    constants::*,
    frequency::{best_rational, vco_divider},
    derive_pll_parameters, gen_synth, SynthOptions,
};

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 2_000,
        ..ProptestConfig::default()
    }
}

/// Brute force closest distance to `x` over every denominator up to `max_den`
fn closest_distance(x: f64, max_den: u64) -> f64 {
    (1..=max_den)
        .map(|q| {
            let p = (x * q as f64).round();
            (p / q as f64 - x).abs()
        })
        .fold(f64::INFINITY, f64::min)
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn no_divider_inside_vco_range(target in 1800.001f64..3799.999) {
        prop_assert_eq!(vco_divider(target), None);
    }

    #[test]
    fn divider_lifts_vco_into_range(target in 48.0f64..1800.0) {
        let d = vco_divider(target).unwrap();
        prop_assert_eq!(d % 2, 0);
        prop_assert!(target * d as f64 >= VCO_FREQ_MIN);
        // and it is the smallest such even divider
        prop_assert!(d == 2 || target * (d - 2) as f64 <= VCO_FREQ_MIN + 1e-9);
    }

    #[test]
    fn divider_above_vco_range(target in 3800.0f64..10_000.0) {
        prop_assert_eq!(vco_divider(target), Some(2));
    }

    #[test]
    fn best_rational_is_closest(x in 0.0f64..1.0, max_den in 1u64..300) {
        let (p, q) = best_rational(x, max_den);
        prop_assert!(q >= 1 && q <= max_den);
        prop_assert_eq!(gcd(p, q), 1);
        let err = (p as f64 / q as f64 - x).abs();
        prop_assert!(err <= closest_distance(x, max_den) + 1e-12);
    }

    #[test]
    fn fraction_within_resolution(target in 48.0f64..3800.0, reference in 10.0f64..200.0) {
        let p = derive_pll_parameters(target, reference).unwrap();
        prop_assert!(p.num < p.den);
        prop_assert!(p.den as u64 <= PLL_DEN_MAX);
        let pll = p.effective_divider() as f64 * target / reference;
        let got = p.n as f64 + p.num as f64 / p.den as f64;
        prop_assert!((pll - got).abs() <= FRAC_RESOLUTION + 1e-12);
    }

    #[test]
    fn output_frequency_is_reproduced(target in 48.0f64..3800.0) {
        let p = derive_pll_parameters(target, 10.0).unwrap();
        // one fractional step of the phase detector frequency at most
        prop_assert!((p.output_mhz(10.0) - target).abs() <= 10.0 * FRAC_RESOLUTION + 1e-9);
    }

    #[test]
    fn synthesis_covers_the_divider_range(target in 48.0f64..3800.0) {
        let rs = gen_synth(target, 10.0, &SynthOptions::default());
        prop_assert!(rs.is_ok(), "{}: {:?}", target, rs);
    }

    #[test]
    fn synthesis_next_to_integer_n(n in 1801u32..3799, steps in 1u32..64, above in any::<bool>()) {
        // a few 2^-22 steps either side of a whole N, direct VCO output from 1 MHz
        let step = steps as f64 / (1u64 << 22) as f64;
        let target = if above { n as f64 + step } else { n as f64 - step };
        let rs = gen_synth(target, 1.0, &SynthOptions::default());
        prop_assert!(rs.is_ok(), "{}: {:?}", target, rs);
    }
}
