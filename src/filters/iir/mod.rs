
use std::str::FromStr;

use num_complex::Complex;
use serde_derive::{Serialize, Deserialize};

use crate::SacProcErr;
use super::ScalarFilter;

pub mod prototype;
pub mod transform;


pub const MAX_NUM_SECTIONS:usize = 10;

// Single-precision values of pi and 2*pi widened to f64; the designs are defined in terms of these
pub const PI:f64  = std::f32::consts::PI as f64;
pub const PI2:f64 = (2.0 * std::f32::consts::PI) as f64;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum FilterType {
	Bandpass,
	Bandreject,
	Lowpass,
	Highpass,
}

impl FromStr for FilterType {
	type Err = &'static str;

	fn from_str(s:&str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"bp" | "bandpass"   => Ok(FilterType::Bandpass),
			"br" | "bandreject" => Ok(FilterType::Bandreject),
			"lp" | "lowpass"    => Ok(FilterType::Lowpass),
			"hp" | "highpass"   => Ok(FilterType::Highpass),
			_ => Err("Unknown filter type, expected one of bp, br, lp, hp"),
		}
	}
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum AnalogPrototype {
	Butterworth,
	Bessel,
}

impl FromStr for AnalogPrototype {
	type Err = &'static str;

	fn from_str(s:&str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"bu" | "butterworth" => Ok(AnalogPrototype::Butterworth),
			"be" | "bessel"      => Ok(AnalogPrototype::Bessel),
			_ => Err("Unknown analog prototype, expected one of bu, be"),
		}
	}
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SectionType {
	SingleRealPole,
	ComplexConjPolePair,
	ComplexConjPoleZeroPair,
}

/// Second-order section, coefficients in increasing power (of s before the bilinear transform, of z^-1 after)
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, Default)]
pub struct IirSection {
	pub numerator: [f64; 3],
	pub denominator: [f64; 3],
}

/// Delay line for one section: previous two inputs and outputs
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct IirStage {
	pub x1: f64,
	pub x2: f64,
	pub y1: f64,
	pub y2: f64,
}

/// Everything needed to design a filter except the sample interval
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct FilterSpec {
	pub order: usize,
	pub filter_type: FilterType,
	pub prototype: AnalogPrototype,
	#[serde(default)]
	pub freq_low_hz: f64,
	#[serde(default)]
	pub freq_high_hz: f64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct IirFilter {
	sections: Vec<IirSection>,
}

impl IirFilter {

	/// Designs a cascade of digital second-order sections.  Unsupported combinations (Bessel order outside
	/// 1..=8, zero order, or more sections than MAX_NUM_SECTIONS) give a filter with no sections.
	pub fn design(order:usize, filter_type:FilterType, prototype:AnalogPrototype, freq_low_hz:f64, freq_high_hz:f64, delta:f64) -> Self {
		let freq_high_w:f64 = transform::warp(freq_high_hz * delta / 2.0, 2.0);
		let freq_low_w:f64  = transform::warp(freq_low_hz * delta / 2.0, 2.0);

		let proto = match prototype {
			AnalogPrototype::Butterworth => prototype::butterworth(order),
			AnalogPrototype::Bessel      => prototype::bessel(order),
		};
		let proto = match proto {
			Some(p) => p,
			None    => return Self::default(),
		};

		let mut sections:Vec<IirSection> = match filter_type {
			FilterType::Bandpass   => transform::bandpass(&proto, freq_low_w, freq_high_w),
			FilterType::Bandreject => transform::bandreject(&proto, freq_low_w, freq_high_w),
			FilterType::Lowpass    => {
				let mut s = transform::lowpass(&proto);
				transform::cutoff(freq_high_w, &mut s);
				s
			},
			FilterType::Highpass   => {
				let mut s = transform::highpass(&proto);
				transform::cutoff(freq_low_w, &mut s);
				s
			},
		};

		if sections.len() > MAX_NUM_SECTIONS {
			return Self::default();
		}

		transform::bilinear(&mut sections);
		Self{ sections }
	}

	pub fn from_spec(spec:&FilterSpec, delta:f64) -> Self {
		Self::design(spec.order, spec.filter_type, spec.prototype, spec.freq_low_hz, spec.freq_high_hz, delta)
	}

	/// Same as `design`, but reports an unusable design as an error instead of an empty cascade
	pub fn try_design(order:usize, filter_type:FilterType, prototype:AnalogPrototype, freq_low_hz:f64, freq_high_hz:f64, delta:f64) -> Result<Self, SacProcErr> {
		let filter = Self::design(order, filter_type, prototype, freq_low_hz, freq_high_hz, delta);
		if filter.nsects() > 0 {
			Ok(filter)
		} else if prototype == AnalogPrototype::Bessel && (order == 0 || order > prototype::BESSEL_MAX_ORDER) {
			Err(SacProcErr::UnsupportedFilter("Bessel prototype only supports orders 1 through 8"))
		} else if order == 0 {
			Err(SacProcErr::UnsupportedFilter("Filter order must be at least 1"))
		} else {
			Err(SacProcErr::UnsupportedFilter("Filter design needs more second-order sections than supported"))
		}
	}

	pub fn nsects(&self) -> usize { self.sections.len() }
	pub fn sections(&self) -> &[IirSection] { &self.sections }

	/// Zeroed delay lines, one per section
	pub fn new_stages(&self) -> Vec<IirStage> { vec![IirStage::default(); self.sections.len()] }

	/// Filters one sample.  Every section is driven by the same input sample and the output of the
	/// last section is returned; the sections are not chained.
	pub fn apply(&self, sample:f64, stages:&mut [IirStage]) -> f64 {
		let mut output:f64 = 0.0;

		for (sect, stage) in self.sections.iter().zip(stages.iter_mut()) {
			let b0 = sect.numerator[0] * sample;
			let b1 = sect.numerator[1] * stage.x1;
			let b2 = sect.numerator[2] * stage.x2;
			let a1 = sect.denominator[1] * stage.y1;
			let a2 = sect.denominator[2] * stage.y2;

			output = (b0 + b1 + b2) - (a1 + a2);

			stage.y2 = stage.y1;
			stage.y1 = output;
			stage.x2 = stage.x1;
			stage.x1 = sample;
		}

		output
	}

	/// Nominal response of the designed cascade, every section multiplied in.  This is the response the
	/// design targets; `apply` only realises it when there is a single section.
	pub fn design_response(&self, freq_hz:f64, delta:f64) -> Complex<f64> {
		let z1 = unit_delay(freq_hz, delta);
		self.sections.iter().fold(Complex{ re: 1.0, im: 0.0 }, |h, sect| h * sect.response(z1))
	}

	pub fn design_gain_at(&self, freq_hz:f64, delta:f64) -> f64 { self.design_response(freq_hz, delta).norm() }

	/// Response of the filter as `apply` runs it: the last section alone, zero for an empty cascade
	pub fn response(&self, freq_hz:f64, delta:f64) -> Complex<f64> {
		match self.sections.last() {
			Some(sect) => sect.response(unit_delay(freq_hz, delta)),
			None => Complex{ re: 0.0, im: 0.0 },
		}
	}

	pub fn gain_at(&self, freq_hz:f64, delta:f64) -> f64 { self.response(freq_hz, delta).norm() }

}

impl IirSection {

	fn response(&self, z1:Complex<f64>) -> Complex<f64> {
		let z2 = z1 * z1;
		let n = &self.numerator;
		let d = &self.denominator;
		(n[0] + n[1] * z1 + n[2] * z2) / (d[0] + d[1] * z1 + d[2] * z2)
	}

}

// z^-1 on the unit circle
fn unit_delay(freq_hz:f64, delta:f64) -> Complex<f64> {
	let omega:f64 = 2.0 * std::f64::consts::PI * freq_hz * delta;
	Complex::from_polar(&1.0, &(-omega))
}

pub fn reset_stages(stages:&mut [IirStage]) {
	for stage in stages.iter_mut() { *stage = IirStage::default(); }
}

/// A designed filter together with the state of one stream running through it
pub struct IirStream<'a> {
	filter: &'a IirFilter,
	stages: Vec<IirStage>,
}

impl<'a> IirStream<'a> {

	pub fn new(filter:&'a IirFilter) -> Self { Self{ filter, stages: filter.new_stages() } }

	pub fn stages(&self) -> &[IirStage] { &self.stages }

}

impl<'a> ScalarFilter for IirStream<'a> {

	fn apply(&mut self, x:f64) -> f64 { self.filter.apply(x, &mut self.stages) }

	fn initialize(&mut self) { reset_stages(&mut self.stages); }

}
