
use std::fs::File;
use std::io::BufReader;

use clap::{Arg, App};
use colored::*;
use rust_sac::io::sac::SacTrace;
use rust_sac::filters::iir::{IirFilter, FilterSpec, FilterType, AnalogPrototype};
use rust_sac::preproc::{self, FilterPass};

fn main() -> Result<(), &'static str> {

	let matches = App::new("SAC Filter")
		.version("0.1.0")
		.about("Designs a recursive Butterworth or Bessel filter and runs a SAC trace through it")
		.arg(Arg::with_name("filename")
			.short("f").long("filename")
			.help("Input SAC file")
			.required(true).takes_value(true))
		.arg(Arg::with_name("output_filename")
			.short("o").long("output_filename")
			.help("Output SAC file; written to stdout if not given")
			.takes_value(true))
		.arg(Arg::with_name("json_spec")
			.short("j").long("json_spec")
			.help("JSON filter specification; overrides the individual design options")
			.takes_value(true))
		.arg(Arg::with_name("filter_type")
			.short("t").long("type")
			.takes_value(true)
			.possible_values(&["bp", "br", "lp", "hp"]))
		.arg(Arg::with_name("prototype")
			.short("p").long("prototype")
			.takes_value(true)
			.possible_values(&["bu", "be"]))
		.arg(Arg::with_name("order")
			.short("n").long("order")
			.takes_value(true))
		.arg(Arg::with_name("freq_low")
			.short("l").long("freq_low")
			.help("Low corner frequency [Hz]")
			.takes_value(true))
		.arg(Arg::with_name("freq_high")
			.short("u").long("freq_high")
			.help("High corner frequency [Hz]")
			.takes_value(true))
		.arg(Arg::with_name("zero_phase")
			.short("z").long("zero_phase")
			.help("Filter forward and then backward"))
		.get_matches();

	let fname:&str = matches.value_of("filename").ok_or("No input filename provided")?;

	let spec:FilterSpec = match matches.value_of("json_spec") {
		Some(spec_fname) => {
			let file = File::open(spec_fname).map_err(|_| "Unable to open JSON specification file")?;
			let reader = BufReader::new(file);
			serde_json::from_reader(reader).map_err(|_| "Unable to parse JSON specification")?
		},
		None => FilterSpec {
			order:        matches.value_of("order").unwrap_or("2").parse().map_err(|_| "Unable to parse filter order")?,
			filter_type:  matches.value_of("filter_type").ok_or("Filter type or JSON specification required")?.parse::<FilterType>()?,
			prototype:    matches.value_of("prototype").unwrap_or("bu").parse::<AnalogPrototype>()?,
			freq_low_hz:  matches.value_of("freq_low").unwrap_or("0.0").parse().map_err(|_| "Unable to parse low corner frequency")?,
			freq_high_hz: matches.value_of("freq_high").unwrap_or("0.0").parse().map_err(|_| "Unable to parse high corner frequency")?,
		}
	};
	let pass = if matches.is_present("zero_phase") { FilterPass::ZeroPhase } else { FilterPass::Forward };

	let mut trace = SacTrace::load(fname)?;
	let filter = IirFilter::try_design(spec.order, spec.filter_type, spec.prototype, spec.freq_low_hz, spec.freq_high_hz, trace.delta())?;
	eprintln!("{} {:?} {:?} order {}, {} sections, {:?}", trace.scnl(), spec.prototype, spec.filter_type, spec.order, filter.nsects(), pass);

	preproc::filter_trace(&mut trace.data, &filter, pass);

	match matches.value_of("output_filename") {
		Some(out) => trace.save(out)?,
		None => trace.write_to(&mut std::io::stdout().lock())?,
	}

	eprintln!("{} {}", trace.scnl(), "SAC filtering finished".green());
	Ok(())

}
