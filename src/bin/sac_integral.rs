
use clap::{Arg, App};
use colored::*;
use rust_sac::io::sac::SacTrace;
use rust_sac::filters::iir::{IirFilter, FilterType, AnalogPrototype};
use rust_sac::preproc::{self, FilterPass};

const MIN_DELTA:f64 = 0.001;
const HIGHPASS_ORDER:usize = 2;
const HIGHPASS_CORNER_HZ:f64 = 0.075;

fn main() -> Result<(), &'static str> {

	let matches = App::new("SAC Integral")
		.version("0.1.0")
		.about("Integrates a SAC trace once, optionally followed by a 0.075 Hz highpass filter")
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
			.takes_value(true))
		.arg(Arg::with_name("highpass")
			.long("highpass")
			.help("Highpass filter applied after integrating")
			.takes_value(true)
			.possible_values(&["off", "on", "zp"]))
		.get_matches();

	let fname:&str = matches.value_of("filename").ok_or("No input filename provided")?;
	let gain:f32 = matches.value_of("gain").unwrap_or("1.0").parse().map_err(|_| "Unable to parse gain as an f32")?;
	let pass:Option<FilterPass> = match matches.value_of("highpass").unwrap_or("off") {
		"on" => Some(FilterPass::Forward),
		"zp" => Some(FilterPass::ZeroPhase),
		_    => None,
	};

	let mut trace = SacTrace::load(fname)?;
	if trace.delta() < MIN_DELTA {
		eprintln!("{} {}", trace.scnl(), format!("SAC sample delta too small: {}", trace.delta()).red());
		return Err("SAC sample delta too small");
	}
	if let Some(t) = trace.reference_time() {
		eprintln!("{} SAC start at {:.3}", trace.scnl(), t + trace.begin());
	}

	preproc::demean_fill_with_mean(&mut trace.data, gain);
	let mut integrated = preproc::integrate(&trace.data, trace.delta());
	if let Some(pass) = pass {
		let filter = IirFilter::try_design(HIGHPASS_ORDER, FilterType::Highpass, AnalogPrototype::Butterworth, HIGHPASS_CORNER_HZ, 0.0, trace.delta())?;
		preproc::filter_trace(&mut integrated, &filter, pass);
	}
	trace.data = integrated;

	match matches.value_of("output_filename") {
		Some(out) => trace.save(out)?,
		None => trace.write_to(&mut std::io::stdout().lock())?,
	}

	eprintln!("{} {}", trace.scnl(), "SAC integral finished".green());
	Ok(())

}
