#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! [LMX2581](https://www.ti.com/product/LMX2581) register generator and programmer.
//!
//! `synth::gen_synth` turns an output frequency into the 14 word programming
//! sequence, `device::Lmx2581` streams a sequence to the chip through a board
//! `Transport`. `hexdump` reads sequences saved by TI Code Loader.

pub mod constants;
pub mod register;
pub mod errors;
pub mod config;
pub mod refin;
pub mod frequency;
pub mod synth;
pub mod hexdump;
pub mod device;

pub use crate::{
    config::SynthOptions,
    device::{DeviceError, Lmx2581, SpiTransport, Transport},
    errors::Error,
    frequency::{derive_pll_parameters, get_osc_values, PllParameters},
    hexdump::load_registers_from_hex_dump,
    register::RegisterSet,
    synth::{gen_synth, pack_registers},
};
