
use std::fs::File;
use std::io::BufReader;

use clap::{Arg, App};
use colored::*;
use serde::Serialize;
use rust_sac::io::sac::SacTrace;
use rust_sac::picker::{self, CharFunction, PickerConfig, Quality};
use rust_sac::preproc;

#[derive(Debug, Serialize)]
struct PhasePick {
	index: usize,
	/// Seconds since the Unix epoch, if the header carries a reference time
	time: Option<f64>,
	quality: Quality,
}

#[derive(Debug, Serialize)]
struct PickReport {
	scnl: String,
	p: Option<PhasePick>,
	p_rejected: bool,
	s: Option<PhasePick>,
}

fn pick_time(trace:&SacTrace, index:usize) -> Option<f64> {
	trace.reference_time().map(|t| t + trace.begin() + (index as f64) * trace.delta())
}

fn load_preprocessed(fname:&str, gain:f32) -> Result<SacTrace, &'static str> {
	let mut trace = SacTrace::load(fname)?;
	if !(trace.delta() > 0.0) { return Err("SAC sample interval must be positive"); }

	let delta = trace.delta();
	let gaps = preproc::preprocess(&mut trace.data, delta, gain);
	if gaps > 0 {
		eprintln!("{} {}", trace.scnl(), format!("Found {} gaps within total {} samples, filled with 0.0", gaps, trace.npts()).yellow());
	}
	Ok(trace)
}

fn main() -> Result<(), &'static str> {

	let matches = App::new("SAC Picker")
		.version("0.1.0")
		.about("Picks P on a vertical component and S on the horizontal pair with an STA/LTA picker")
		.arg(Arg::with_name("vertical")
			.short("z").long("vertical")
			.help("Vertical component SAC file")
			.required(true).takes_value(true))
		.arg(Arg::with_name("north")
			.short("n").long("north")
			.help("North component SAC file")
			.takes_value(true))
		.arg(Arg::with_name("east")
			.short("e").long("east")
			.help("East component SAC file")
			.takes_value(true))
		.arg(Arg::with_name("json_config")
			.short("j").long("json_config")
			.help("JSON picker configuration")
			.takes_value(true))
		.arg(Arg::with_name("char_function")
			.short("c").long("char_function")
			.help("1 for squared amplitude, anything else adds the squared first difference")
			.takes_value(true))
		.arg(Arg::with_name("gain")
			.short("g").long("gain")
			.takes_value(true))
		.get_matches();

	let mut config:PickerConfig = match matches.value_of("json_config") {
		Some(fname) => {
			let file = File::open(fname).map_err(|_| "Unable to open JSON configuration file")?;
			let reader = BufReader::new(file);
			serde_json::from_reader(reader).map_err(|_| "Unable to parse JSON configuration")?
		},
		None => PickerConfig::default(),
	};
	if let Some(flag) = matches.value_of("char_function") {
		config.char_function = CharFunction::from_flag(flag.parse().map_err(|_| "Unable to parse characteristic function flag")?);
	}
	let gain:f32 = matches.value_of("gain").unwrap_or("1.0").parse().map_err(|_| "Unable to parse gain as an f32")?;

	let z = load_preprocessed(matches.value_of("vertical").ok_or("No vertical component provided")?, gain)?;
	let delta = z.delta();
	let p_start:usize = (config.p_start_sec.max(0.0) / delta) as usize;

	let mut report = PickReport{ scnl: z.scnl(), p: None, p_rejected: false, s: None };

	let p_idx = picker::pick_p(&z.data, delta, config.char_function, p_start);
	if p_idx == 0 {
		eprintln!("{} {}", z.scnl(), "No P arrival found".yellow());
	} else if config.check_trigger && !picker::p_trigger_check(&z.data, delta, p_idx) {
		eprintln!("{} {}", z.scnl(), format!("P trigger at sample {} looks like a spike or a DC drift", p_idx).yellow());
		report.p_rejected = true;
	} else {
		let quality = picker::p_quality(&z.data, delta, p_idx);
		eprintln!("{} {}", z.scnl(), format!("P at sample {}, weight {}", p_idx, quality.weight).green());
		report.p = Some(PhasePick{ index: p_idx, time: pick_time(&z, p_idx), quality });
	}

	if let (Some(p), Some(n_fname), Some(e_fname)) = (&report.p, matches.value_of("north"), matches.value_of("east")) {
		let n = load_preprocessed(n_fname, gain)?;
		let e = load_preprocessed(e_fname, gain)?;
		if (n.delta() - delta).abs() > 1.0e-6 || (e.delta() - delta).abs() > 1.0e-6 {
			return Err("All three components must share a sample interval");
		}

		let s_idx = picker::pick_s(Some(&n.data), Some(&e.data), delta, config.char_function, p.index);
		if s_idx == 0 {
			eprintln!("{} {}", n.scnl(), "No S arrival found".yellow());
		} else {
			let quality = picker::s_quality(&n.data, &e.data, delta, s_idx);
			eprintln!("{} {}", n.scnl(), format!("S at sample {}, weight {}", s_idx, quality.weight).green());
			report.s = Some(PhasePick{ index: s_idx, time: pick_time(&n, s_idx), quality });
		}
	}

	println!("{}", serde_json::to_string_pretty(&report).map_err(|_| "Unable to serialize pick report")?);

	Ok(())

}
