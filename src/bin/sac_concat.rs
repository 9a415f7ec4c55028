
use clap::{Arg, App};
use colored::*;
use rust_sac::io::sac::SacTrace;

fn main() -> Result<(), &'static str> {

	let matches = App::new("SAC Concatenate")
		.version("0.1.0")
		.about("Joins two SAC files of the same channel, filling the gap between them with undefined samples")
		.arg(Arg::with_name("first")
			.index(1)
			.help("Earlier SAC file")
			.required(true))
		.arg(Arg::with_name("second")
			.index(2)
			.help("Later SAC file")
			.required(true))
		.arg(Arg::with_name("output_filename")
			.short("o").long("output_filename")
			.help("Output SAC file; written to stdout if not given")
			.takes_value(true))
		.get_matches();

	let first_fname:&str = matches.value_of("first").ok_or("No first input file provided")?;
	let second_fname:&str = matches.value_of("second").ok_or("No second input file provided")?;

	let first = SacTrace::load(first_fname)?;
	let second = SacTrace::load(second_fname)?;
	for trace in &[&first, &second] {
		if let Some(t) = trace.reference_time() {
			eprintln!("{} starts at {:.3}, ends at {:.3}, {} samples with {:.3} delta",
				trace.scnl(), t + trace.begin(), t + trace.end(), trace.npts(), trace.delta());
		}
	}

	let (joined, gap) = match first.concat(&second) {
		Ok(x) => x,
		Err(e) => {
			let msg:&'static str = e.into();
			eprintln!("{}", msg.red());
			return Err(msg);
		}
	};
	if gap > 0 {
		eprintln!("{}", format!("Filled a gap of {} samples with undefined values", gap).yellow());
	}

	match matches.value_of("output_filename") {
		Some(out) => joined.save(out)?,
		None => joined.write_to(&mut std::io::stdout().lock())?,
	}

	eprintln!("{}", format!("SAC files {} & {} concatenating finished", first_fname, second_fname).green());
	Ok(())

}
