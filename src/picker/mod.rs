
use serde_derive::{Serialize, Deserialize};

pub mod p_wave;
pub mod s_wave;


pub use self::p_wave::{pick_p, p_quality, p_trigger_check};
pub use self::s_wave::{pick_s, s_quality};

pub const PWAVE_TRIGGER:f64 = 2.85;
pub const PWAVE_ARRIVE:f64  = 1.25;
pub const PWAVE_STA:f64     = 0.4;		// [sec]
pub const PWAVE_LTA:f64     = 40.0;		// [sec]
pub const PWAVE_LTA_FLOOR:f64 = 0.005;

pub const SWAVE_TRIGGER:f64 = 3.0;
pub const SWAVE_ARRIVE:f64  = 1.25;
pub const SWAVE_STA:f64     = 0.5;		// [sec]
pub const SWAVE_LTA:f64     = 3.0;		// [sec]
pub const SWAVE_LTA_FLOOR:f64 = 0.05;

/// Weight given when there isn't a full second of data after the arrival
pub const SHORT_DATA_WEIGHT:u8 = 3;
pub const DEFAULT_SNR:f64 = 0.1;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum CharFunction {
	/// x[i]^2
	Squared,
	/// (x[i] - x[i-1])^2 + x[i]^2
	SquaredWithDiff,
}

impl Default for CharFunction {
	fn default() -> Self { CharFunction::SquaredWithDiff }
}

impl CharFunction {

	/// Numeric flag used on the command line, 1 or 2; anything else selects the default
	pub fn from_flag(flag:i32) -> Self {
		match flag {
			1 => CharFunction::Squared,
			_ => CharFunction::SquaredWithDiff,
		}
	}

	#[inline]
	pub fn eval(&self, sample:f32, sample_prev:f32) -> f64 {
		match self {
			CharFunction::Squared         => squared(sample as f64),
			CharFunction::SquaredWithDiff => squared_with_diff(sample as f64, sample_prev as f64),
		}
	}

}

#[inline]
fn squared(sample:f64) -> f64 { sample * sample }

#[inline]
fn squared_with_diff(sample:f64, sample_prev:f64) -> f64 {
	let mut result:f64 = sample - sample_prev;
	result *= result;
	result + sample * sample
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
pub struct Quality {
	pub weight: u8,
	pub snr: f64,
}

impl Quality {

	fn short_data() -> Self { Self{ weight: SHORT_DATA_WEIGHT, snr: DEFAULT_SNR } }

}

/// Picker settings that can be loaded from JSON
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct PickerConfig {
	#[serde(default)]
	pub char_function: CharFunction,
	/// Earliest time, relative to the first sample, at which a P trigger is accepted
	#[serde(default)]
	pub p_start_sec: f64,
	/// Drop P picks that fail the spike and DC drift checks
	#[serde(default = "default_true")]
	pub check_trigger: bool,
}

fn default_true() -> bool { true }

impl Default for PickerConfig {
	fn default() -> Self { Self{ char_function: CharFunction::default(), p_start_sec: 0.0, check_trigger: true } }
}

// Whole samples in one second, as the picker counts them
fn samples_per_sec(delta:f64) -> usize { (1.0 / delta) as usize }

// Running f32 sum of a per-sample value, each step widened to f64 and narrowed back
fn sum_f32<I: Iterator<Item=f64>>(values:I) -> f32 {
	values.fold(0.0f32, |acc, v| (acc as f64 + v) as f32)
}

fn mean_f32<I: Iterator<Item=f64>>(values:I, count:usize) -> f32 {
	(sum_f32(values) as f64 / count as f64) as f32
}
