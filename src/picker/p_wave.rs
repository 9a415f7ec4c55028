
use super::{CharFunction, Quality, samples_per_sec, mean_f32, squared};
use super::{PWAVE_ARRIVE, PWAVE_LTA, PWAVE_LTA_FLOOR, PWAVE_STA, PWAVE_TRIGGER, DEFAULT_SNR};

/// Scans the vertical component for a P arrival.  Returns the last sample at which the STA/LTA ratio was
/// still at or below the arrival threshold before the first trigger at or after `p_start`, or 0 if
/// nothing triggered.
pub fn pick_p(input_z:&[f32], delta:f64, cf:CharFunction, p_start:usize) -> usize {
	let np = input_z.len();
	if np == 0 || !(delta > 0.0) { return 0; }

	let ilta = (PWAVE_LTA / delta) as usize;
	let ista = (PWAVE_STA / delta) as usize;
	if ista == 0 || ilta == 0 { return 0; }

	// Seed both averages from the first ista + 100 points
	let seed_len:usize = ista.saturating_add(100).min(np);
	let sum:f64 = (0..seed_len).map(|i| match cf {
		CharFunction::Squared         => squared(input_z[i] as f64),
		// Forward difference, the last point pairs with itself
		CharFunction::SquaredWithDiff => cf.eval(input_z[(i + 1).min(np - 1)], input_z[i]),
	}).sum();

	let mut x_sta:f64 = sum / (seed_len as f64);
	let mut x_lta:f64 = x_sta * 1.25;

	let mut result:usize = 0;
	for i in seed_len..np {
		let value:f64 = cf.eval(input_z[i], input_z[i-1]);

		x_sta = (x_sta * ((ista - 1) as f64) + value) / (ista as f64);
		x_lta = (x_lta * ((ilta - 1) as f64) + value) / (ilta as f64);
		if x_lta < PWAVE_LTA_FLOOR { x_lta = PWAVE_LTA_FLOOR; }

		let ratio:f64 = x_sta / x_lta;
		if ratio <= PWAVE_ARRIVE { result = i; }

		if i < p_start { continue; }
		if ratio > PWAVE_TRIGGER { return result; }
	}

	0
}

/// Ratio of the mean square amplitude in the second after the arrival to the one before it,
/// banded into a weight from 0 (best) to 4
pub fn p_quality(input_z:&[f32], delta:f64, p_arrival:usize) -> Quality {
	let np = input_z.len();
	let samprate = samples_per_sec(delta);
	if samprate == 0 || p_arrival >= np || np - p_arrival < samprate {
		return Quality::short_data();
	}

	let after:f32 = mean_f32(input_z[p_arrival..p_arrival+samprate].iter().map(|&x| squared(x as f64)), samprate);

	let start = p_arrival.saturating_sub(samprate);
	let before:f32 = if p_arrival > start {
		mean_f32(input_z[start..p_arrival].iter().map(|&x| squared(x as f64)), p_arrival - start)
	} else { 0.0 };

	let snr:f64 = if (before as f64) > 0.0001 { (after / before) as f64 } else { DEFAULT_SNR };

	let weight:u8 = if snr > 30.0 { 0 }
		else if snr > 15.0 { 1 }
		else if snr > 3.0  { 2 }
		else if snr > 1.5  { 3 }
		else               { 4 };

	Quality{ weight, snr }
}

/// Rejects P picks caused by transmission errors.  A spike leaves the signal two seconds after the
/// arrival no stronger than before it; a DC drift shifts the mean by more than one input unit.
/// Returns true when the pick should be kept.
pub fn p_trigger_check(input_z:&[f32], delta:f64, p_arrival:usize) -> bool {
	let np = input_z.len();
	let samprate = samples_per_sec(delta);

	// Not enough data to judge either way
	if samprate == 0 || p_arrival >= np || np - p_arrival < samprate.saturating_mul(3) { return true; }

	let start = p_arrival.saturating_sub(samprate);
	let before_sq:f32 = if p_arrival > start {
		mean_f32(input_z[start..p_arrival].iter().map(|&x| squared(x as f64)), p_arrival - start)
	} else { 0.0 };

	let late = p_arrival + samprate * 2;
	let after_sq:f32 = mean_f32(input_z[late..late+samprate].iter().map(|&x| squared(x as f64)), samprate);

	let ratio:f32 = if (after_sq as f64) > 0.0001 { after_sq / before_sq } else { DEFAULT_SNR as f32 };
	if (ratio as f64) < 1.05 { return false; }

	// Mean of the second after the arrival against the second ending one second before it
	let after_mean:f32 = mean_raw(&input_z[p_arrival..p_arrival+samprate]);
	let (lo, hi) = (p_arrival.saturating_sub(samprate * 2), p_arrival.saturating_sub(samprate));
	if hi > lo {
		let before_mean:f32 = mean_raw(&input_z[lo..hi]);
		if ((after_mean - before_mean) as f64).abs() > 1.0 { return false; }
	}

	true
}

fn mean_raw(x:&[f32]) -> f32 {
	let sum:f32 = x.iter().fold(0.0f32, |acc, v| acc + v);
	(sum as f64 / x.len() as f64) as f32
}
