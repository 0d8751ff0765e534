//! Synthesize an LMX2581 sequence and "write" it through a transport that prints.
//!
//! cargo run --example gen_synth -- 200.333333 10
//! RUST_LOG=trace shows every register write.

use std::convert::Infallible;
use std::env;
use std::process;

use lmx2581::{get_osc_values, register::*, Lmx2581, Transport};

/// Prints writes the way a board register client would send them
struct Stdout;

impl Transport for Stdout {
    type Error = Infallible;

    fn write_register(&mut self, name: &str, value: u32, ordered: bool) -> Result<(), Infallible> {
        println!("{:<16} {:#010x}{}", name, value, if ordered { " (ordered)" } else { "" });
        Ok(())
    }
}

fn arg(args: &[String], i: usize, default: f64) -> f64 {
    match args.get(i) {
        Some(s) => s.parse().unwrap_or_else(|_| {
            eprintln!("not a frequency: {}", s);
            process::exit(2);
        }),
        None => default,
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let target = arg(&args, 1, 200.0 + 1.0 / 3.0);
    let reference = arg(&args, 2, 10.0);

    let mut synth = Lmx2581::new(Stdout, reference);
    let rs = match synth.from_gen_synth(target) {
        Ok(rs) => rs,
        Err(e) => {
            eprintln!("{} MHz: {}", target, e);
            process::exit(1);
        }
    };

    println!();
    print!("{}", rs);

    if let Ok((n, num, den, div)) = get_osc_values(target, reference) {
        println!("N {} NUM {} DEN {} VCO divider {:?}", n, num, den, div);
    }
    let order: FracOrder = rs.get();
    let dither: FracDither = rs.get();
    let band: VcoSel = rs.get();
    println!("{:?} {:?} {:?}", order, dither, band);
}
