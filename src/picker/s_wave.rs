
use super::{CharFunction, Quality, samples_per_sec, mean_f32, squared};
use super::{SWAVE_ARRIVE, SWAVE_LTA, SWAVE_LTA_FLOOR, SWAVE_STA, SWAVE_TRIGGER, DEFAULT_SNR};

/// Scans both horizontal components for an S arrival between 2 and 42 seconds after the P arrival.
/// Returns 0 if a component is missing, the window doesn't fit or nothing triggered.
pub fn pick_s(input_n:Option<&[f32]>, input_e:Option<&[f32]>, delta:f64, cf:CharFunction, p_arrival:usize) -> usize {
	let (input_n, input_e) = match (input_n, input_e) {
		(Some(n), Some(e)) => (n, e),
		_ => return 0,
	};
	if !(delta > 0.0) { return 0; }

	let np = input_n.len().min(input_e.len());
	let samprate = samples_per_sec(delta);
	let ilta = (SWAVE_LTA / delta) as usize;
	let ista = (SWAVE_STA / delta) as usize;
	if ista == 0 || ilta == 0 { return 0; }

	let pos_2sec = match samprate.checked_mul(2).and_then(|n| p_arrival.checked_add(n)) {
		Some(pos) => pos,
		None => return 0,
	};
	if pos_2sec >= np || np - pos_2sec < ista.saturating_mul(2) { return 0; }
	let pos_42sec = pos_2sec.saturating_add(samprate.saturating_mul(40)).min(np);

	let value = |i:usize| cf.eval(input_n[i], input_n[i-1]) + cf.eval(input_e[i], input_e[i-1]);

	let sum:f64 = (pos_2sec..pos_2sec+ista).map(|i| value(i)).sum();
	let mut x_sta:f64 = sum / (ista as f64);
	let mut x_lta:f64 = x_sta;

	let mut result:usize = 0;
	for i in pos_2sec+ista..pos_42sec {
		let v = value(i);

		x_sta = (x_sta * ((ista - 1) as f64) + v) / (ista as f64);
		x_lta = (x_lta * ((ilta - 1) as f64) + v) / (ilta as f64);
		if x_lta < SWAVE_LTA_FLOOR { x_lta = SWAVE_LTA_FLOOR; }

		let ratio:f64 = x_sta / x_lta;
		if ratio <= SWAVE_ARRIVE { result = i; }

		if ratio > SWAVE_TRIGGER {
			// Never settled before triggering, back off a tenth of a second
			if result == 0 {
				result = i.saturating_sub((0.1 * samprate as f64) as usize);
			}
			return result;
		}
	}

	0
}

/// Same as the P quality but summing the power of both horizontal components
pub fn s_quality(input_n:&[f32], input_e:&[f32], delta:f64, s_arrival:usize) -> Quality {
	let np = input_n.len().min(input_e.len());
	let samprate = samples_per_sec(delta);
	if samprate == 0 || s_arrival >= np || np - s_arrival < samprate {
		return Quality::short_data();
	}

	let power = |i:usize| squared(input_n[i] as f64) + squared(input_e[i] as f64);

	let after:f32 = mean_f32((s_arrival..s_arrival+samprate).map(power), samprate);

	let start = s_arrival.saturating_sub(samprate);
	let before:f32 = if s_arrival > start {
		mean_f32((start..s_arrival).map(power), s_arrival - start)
	} else { 0.0 };

	let snr:f64 = if (before as f64) > 0.001 { (after / before) as f64 } else { DEFAULT_SNR };

	let weight:u8 = if snr > 30.0 { 0 }
		else if snr > 15.0 { 1 }
		else if snr > 5.0  { 2 }
		else if snr > 2.0  { 3 }
		else               { 4 };

	Quality{ weight, snr }
}
