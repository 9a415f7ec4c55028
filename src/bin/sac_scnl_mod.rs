
use clap::{Arg, App};
use colored::*;
use rust_sac::io::sac::SacTrace;

fn main() -> Result<(), &'static str> {

	let matches = App::new("SAC SCNL Modify")
		.version("0.1.0")
		.about("Changes the station, channel, network and location codes and the component orientation of a SAC file")
		.arg(Arg::with_name("filename")
			.short("f").long("filename")
			.help("Input SAC file")
			.required(true).takes_value(true))
		.arg(Arg::with_name("output_filename")
			.short("o").long("output_filename")
			.help("Output SAC file; written to stdout if not given")
			.takes_value(true))
		.arg(Arg::with_name("station").short("s").long("station").takes_value(true))
		.arg(Arg::with_name("channel").short("c").long("channel").takes_value(true))
		.arg(Arg::with_name("network").short("n").long("network").takes_value(true))
		.arg(Arg::with_name("location").short("l").long("location").takes_value(true))
		.arg(Arg::with_name("azimuth")
			.long("azimuth")
			.help("Component azimuth [deg]")
			.takes_value(true))
		.arg(Arg::with_name("inclination")
			.long("inclination")
			.help("Component inclination [deg]")
			.takes_value(true))
		.get_matches();

	let fname:&str = matches.value_of("filename").ok_or("No input filename provided")?;
	let (sta, chan, net, loc) = (matches.value_of("station"), matches.value_of("channel"), matches.value_of("network"), matches.value_of("location"));
	if sta.is_none() && chan.is_none() && net.is_none() && loc.is_none() {
		return Err("No new SCNL was specified");
	}
	let azimuth:Option<f32> = match matches.value_of("azimuth") {
		Some(s) => Some(s.parse().map_err(|_| "Unable to parse azimuth")?),
		None => None,
	};
	let inclination:Option<f32> = match matches.value_of("inclination") {
		Some(s) => Some(s.parse().map_err(|_| "Unable to parse inclination")?),
		None => None,
	};

	let mut trace = SacTrace::load(fname)?;
	let orig_scnl = trace.scnl();
	trace.set_scnl(sta, chan, net, loc);
	trace.set_orientation(azimuth, inclination);

	match matches.value_of("output_filename") {
		Some(out) => trace.save(out)?,
		None => trace.write_to(&mut std::io::stdout().lock())?,
	}

	eprintln!("{}", format!("SAC file {} SCNL has been modified ({} -> {})", fname, orig_scnl, trace.scnl()).green());
	Ok(())

}
