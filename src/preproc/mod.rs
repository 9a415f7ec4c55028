
use crate::SAC_UNDEF;
use crate::filters::ScalarFilter;
use crate::filters::iir::{IirFilter, IirStream};


#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FilterPass {
	Forward,
	/// Forward, then backward over the same samples with cleared state
	ZeroPhase,
}

pub fn apply_gain(data:&mut [f32], gain:f32) {
	for x in data.iter_mut() {
		if *x != SAC_UNDEF { *x *= gain; }
	}
}

/// Removes the mean of the first tenth of the trace (the whole trace when that tenth is shorter
/// than one second).  Undefined samples are skipped and left as they are.
pub fn remove_mean(data:&mut [f32], samprate:f32) -> f32 {
	let npts = data.len();
	let i_head:usize = {
		let tenth = ((npts as f64) * 0.1) as usize;
		if tenth as i64 >= samprate as i64 { tenth } else { npts }
	};

	let mut mean:f32 = 0.0;
	let mut mean_count:usize = 0;
	for x in data[..i_head].iter().filter(|x| **x != SAC_UNDEF) {
		mean += x;
		mean_count += 1;
	}
	if mean_count == 0 { return 0.0; }
	mean /= mean_count as f32;

	for x in data.iter_mut() {
		if *x != SAC_UNDEF { *x -= mean; }
	}

	mean
}

/// Replaces undefined samples and returns how many there were
pub fn fill_gaps(data:&mut [f32], fill:f32) -> usize {
	let mut gap_count:usize = 0;
	for x in data.iter_mut().filter(|x| **x == SAC_UNDEF) {
		*x = fill;
		gap_count += 1;
	}
	gap_count
}

/// Gain, mean removal and gap filling with 0.0, in that order.  Returns the number of gaps.
pub fn preprocess(data:&mut [f32], delta:f64, gain:f32) -> usize {
	apply_gain(data, gain);
	remove_mean(data, (1.0 / delta) as f32);
	fill_gaps(data, 0.0)
}

/// Older single-pass variant: gaps become zero, defined samples are scaled by the gain, and the mean of
/// the defined samples in the first tenth is removed.  Samples that are exactly zero afterwards
/// (gaps included) are set to the mean instead.
pub fn demean_fill_with_mean(data:&mut [f32], gain:f32) -> f32 {
	let npts = data.len();
	let i_head:usize = match ((npts as f64) * 0.1) as usize {
		0 => npts,
		n => n,
	};

	let mut gap_count:usize = 0;
	let mut mean:f32 = 0.0;
	for (i, x) in data.iter_mut().enumerate() {
		if *x == SAC_UNDEF {
			*x = 0.0;
			if i < i_head { gap_count += 1; }
			continue;
		}
		*x *= gain;
		if i < i_head { mean += *x; }
	}

	if i_head > gap_count { mean /= (i_head - gap_count) as f32; } else { mean = 0.0; }

	for x in data.iter_mut() {
		if *x != 0.0 { *x -= mean; } else { *x = mean; }
	}

	mean
}

/// Trapezoidal integration, y[i] = (x[i] + x[i-1]) * dt / 2 + y[i-1]
pub fn integrate(data:&[f32], delta:f64) -> Vec<f32> {
	let delta_f32 = delta as f32;
	let mut acc0:f32 = 0.0;
	let mut vel0:f32 = 0.0;

	data.iter().map(|&x| {
		let y = ((((x + acc0) * delta_f32) as f64) * 0.5 + vel0 as f64) as f32;
		acc0 = x;
		vel0 = y;
		y
	}).collect()
}

/// Runs the trace through the filter in place
pub fn filter_trace(data:&mut [f32], filter:&IirFilter, pass:FilterPass) {
	let mut stream = IirStream::new(filter);

	for x in data.iter_mut() {
		*x = stream.apply(*x as f64) as f32;
	}

	if pass == FilterPass::ZeroPhase {
		stream.initialize();
		for x in data.iter_mut().rev() {
			*x = stream.apply(*x as f64) as f32;
		}
	}
}
