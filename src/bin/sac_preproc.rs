
use clap::{Arg, App};
use colored::*;
use rust_sac::io::sac::SacTrace;
use rust_sac::preproc;

fn main() -> Result<(), &'static str> {

	let matches = App::new("SAC Preprocess")
		.version("0.1.0")
		.about("Applies a gain, removes the mean of the head of the trace and fills gaps with zero")
		.arg(Arg::with_name("filename")
			.short("f").long("filename")
			.help("Input SAC file")
			.required(true).takes_value(true))
		.arg(Arg::with_name("output_filename")
			.short("o").long("output_filename")
			.help("Output SAC file; written to stdout if not given")
			.takes_value(true))
		.arg(Arg::with_name("gain")
			.short("g").long("gain")
			.help("Gain factor applied to every defined sample")
			.takes_value(true))
		.get_matches();

	let fname:&str = matches.value_of("filename").ok_or("No input filename provided")?;
	let gain:f32 = matches.value_of("gain").unwrap_or("1.0").parse().map_err(|_| "Unable to parse gain as an f32")?;

	let mut trace = SacTrace::load(fname)?;
	if !(trace.delta() > 0.0) { return Err("SAC sample interval must be positive"); }

	let npts = trace.npts();
	let delta = trace.delta();
	let gaps = preproc::preprocess(&mut trace.data, delta, gain);
	let gap_str = format!("Found {} gaps within total {} samples, filled with 0.0", gaps, npts);
	if gaps > 0 { eprintln!("{} {}", trace.scnl(), gap_str.yellow()); }
	else { eprintln!("{} {}", trace.scnl(), gap_str); }

	match matches.value_of("output_filename") {
		Some(out) => trace.save(out)?,
		None => trace.write_to(&mut std::io::stdout().lock())?,
	}

	eprintln!("{} {}", trace.scnl(), "SAC preprocessing finished".green());
	Ok(())

}
