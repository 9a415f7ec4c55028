
use num_complex::Complex;

use super::{IirSection, SectionType, PI, PI2};
use super::prototype::Prototype;

/// Bilinear pre-warping of a frequency, returned in the normalized units the transforms expect
pub fn warp(freq:f64, delta:f64) -> f64 {
	let result:f64 = PI * freq * delta;
	(2.0 * result.tan() / delta) / PI2
}

// Roots of p^2 - b*c*p + a = 0, i.e. the two band poles generated by one prototype pole c
fn split_root(c:Complex<f64>, a:f64, b:f64) -> (Complex<f64>, Complex<f64>) {
	let mut ctemp:Complex<f64> = b * c;
	ctemp = ctemp * ctemp;
	ctemp = ctemp - 4.0 * a;
	ctemp = ctemp.sqrt();
	(0.5 * (b * c + ctemp), 0.5 * (b * c - ctemp))
}

// Quadratic (s^2 - 2 Re(p) s + |p|^2) coefficients, lowest power first
fn conj_quadratic(p:Complex<f64>) -> [f64; 3] {
	[p.norm_sqr(), -2.0 * p.re, 1.0]
}

fn scale_first(sections:&mut Vec<IirSection>, scale:f64) {
	if let Some(first) = sections.first_mut() {
		for n in first.numerator.iter_mut() { *n *= scale; }
	}
}

pub fn lowpass(proto:&Prototype) -> Vec<IirSection> {
	let mut sections:Vec<IirSection> = proto.sections.iter().map(|ps| {
		let (p, z) = (ps.pole, ps.zero);
		match ps.stype {
			SectionType::ComplexConjPoleZeroPair => {
				let tmppole = p.norm_sqr();
				let tmpzero = z.norm_sqr();
				let scale = tmppole / tmpzero;
				IirSection{ numerator: [tmpzero * scale, -2.0 * z.re * scale, 1.0 * scale],
				            denominator: [tmppole, -2.0 * p.re, 1.0] }
			},
			SectionType::ComplexConjPolePair => {
				let tmppole = p.norm_sqr();
				IirSection{ numerator: [tmppole, 0.0, 0.0], denominator: [tmppole, -2.0 * p.re, 1.0] }
			},
			SectionType::SingleRealPole => {
				let tmppole = -p.re;
				IirSection{ numerator: [tmppole, 0.0, 0.0], denominator: [tmppole, 1.0, 0.0] }
			},
		}
	}).collect();

	scale_first(&mut sections, proto.dc_value);
	sections
}

pub fn highpass(proto:&Prototype) -> Vec<IirSection> {
	let mut sections:Vec<IirSection> = proto.sections.iter().map(|ps| {
		let (p, z) = (ps.pole, ps.zero);
		match ps.stype {
			SectionType::ComplexConjPoleZeroPair => {
				let tmppole = p.norm_sqr();
				let tmpzero = z.norm_sqr();
				let scale = tmppole / tmpzero;
				IirSection{ numerator: [1.0 * scale, -2.0 * z.re * scale, tmpzero * scale],
				            denominator: [1.0, -2.0 * p.re, tmppole] }
			},
			SectionType::ComplexConjPolePair => {
				let tmppole = p.norm_sqr();
				IirSection{ numerator: [0.0, 0.0, tmppole], denominator: [1.0, -2.0 * p.re, tmppole] }
			},
			SectionType::SingleRealPole => {
				let tmppole = -p.re;
				IirSection{ numerator: [0.0, tmppole, 0.0], denominator: [1.0, tmppole, 0.0] }
			},
		}
	}).collect();

	scale_first(&mut sections, proto.dc_value);
	sections
}

pub fn bandpass(proto:&Prototype, freq_low:f64, freq_high:f64) -> Vec<IirSection> {
	let a:f64 = PI2 * PI2 * freq_low * freq_high;
	let b:f64 = PI2 * (freq_high - freq_low);

	let mut sections:Vec<IirSection> = Vec::with_capacity(2 * proto.sections.len());
	for ps in &proto.sections {
		match ps.stype {
			SectionType::ComplexConjPoleZeroPair => {
				let (z1, z2) = split_root(ps.zero, a, b);
				let (p1, p2) = split_root(ps.pole, a, b);
				sections.push(IirSection{ numerator: conj_quadratic(z1), denominator: conj_quadratic(p1) });
				sections.push(IirSection{ numerator: conj_quadratic(z2), denominator: conj_quadratic(p2) });
			},
			SectionType::ComplexConjPolePair => {
				let (p1, p2) = split_root(ps.pole, a, b);
				sections.push(IirSection{ numerator: [0.0, b, 0.0], denominator: conj_quadratic(p1) });
				sections.push(IirSection{ numerator: [0.0, b, 0.0], denominator: conj_quadratic(p2) });
			},
			SectionType::SingleRealPole => {
				sections.push(IirSection{ numerator: [0.0, b, 0.0], denominator: [a, -b * ps.pole.re, 1.0] });
			},
		}
	}

	// Normalize the gain at the geometric center frequency
	let s = Complex{ re: 0.0, im: a.sqrt() };
	let mut h = Complex{ re: 1.0, im: 0.0 };
	for sect in &sections {
		let n = &sect.numerator;
		let d = &sect.denominator;
		let num:Complex<f64> = (n[2] * s + n[1]) * s + n[0];
		let den:Complex<f64> = (d[2] * s + d[1]) * s + d[0];
		h = h * (num / den);
	}

	scale_first(&mut sections, proto.dc_value / h.norm_sqr().sqrt());
	sections
}

pub fn bandreject(proto:&Prototype, freq_low:f64, freq_high:f64) -> Vec<IirSection> {
	let a:f64 = PI2 * PI2 * freq_low * freq_high;
	let b:f64 = PI2 * (freq_high - freq_low);

	let mut sections:Vec<IirSection> = Vec::with_capacity(2 * proto.sections.len());
	for ps in &proto.sections {
		match ps.stype {
			SectionType::ComplexConjPoleZeroPair => {
				let (z1, z2) = split_root(ps.zero.inv(), a, b);
				let (p1, p2) = split_root(ps.pole.inv(), a, b);
				sections.push(IirSection{ numerator: conj_quadratic(z1), denominator: conj_quadratic(p1) });
				sections.push(IirSection{ numerator: conj_quadratic(z2), denominator: conj_quadratic(p2) });
			},
			SectionType::ComplexConjPolePair => {
				let (p1, p2) = split_root(ps.pole.inv(), a, b);
				sections.push(IirSection{ numerator: [a, 0.0, 1.0], denominator: conj_quadratic(p1) });
				sections.push(IirSection{ numerator: [a, 0.0, 1.0], denominator: conj_quadratic(p2) });
			},
			SectionType::SingleRealPole => {
				let re = ps.pole.re;
				sections.push(IirSection{ numerator: [a, 0.0, 1.0], denominator: [-a * re, b, -re] });
			},
		}
	}

	// Normalize the product of the per-section DC gains
	let dc_gain:f64 = sections.iter().fold(1.0, |acc, sect| acc * (sect.numerator[0] / sect.denominator[0]));
	scale_first(&mut sections, proto.dc_value / dc_gain.abs());
	sections
}

/// Moves a normalized lowpass or highpass to the (warped) cutoff frequency
pub fn cutoff(freq:f64, sections:&mut [IirSection]) {
	let scale:f64 = PI2 * freq;
	let sqscale:f64 = scale * scale;

	for sect in sections.iter_mut() {
		sect.numerator[1]   /= scale;
		sect.denominator[1] /= scale;
		sect.numerator[2]   /= sqscale;
		sect.denominator[2] /= sqscale;
	}
}

/// Maps analog sections to digital with s = (1 - z^-1) / (1 + z^-1)
pub fn bilinear(sections:&mut [IirSection]) {
	for sect in sections.iter_mut() {
		let [a0, a1, a2] = sect.denominator;
		let scale:f64 = a2 + a1 + a0;
		sect.denominator = [1.0, (2.0 * (a0 - a2)) / scale, (a2 - a1 + a0) / scale];

		let [a0, a1, a2] = sect.numerator;
		sect.numerator = [(a2 + a1 + a0) / scale, (2.0 * (a0 - a2)) / scale, (a2 - a1 + a0) / scale];
	}
}

#[cfg(test)]
mod tests {

	use super::*;

	#[test]
	fn bilinear_normalizes_leading_denominator() {
		let mut sections = vec![IirSection{ numerator: [1.0, 0.0, 0.0], denominator: [1.0, 1.414, 1.0] }];
		bilinear(&mut sections);
		assert_eq!(sections[0].denominator[0], 1.0);
		// DC gain (z = 1) is preserved by the mapping
		let n:f64 = sections[0].numerator.iter().sum();
		let d:f64 = sections[0].denominator.iter().sum();
		assert!((n / d - 1.0).abs() < 1.0e-12);
	}

	#[test]
	fn warp_tracks_tangent() {
		// warp(f*dt/2, 2) == tan(pi*f*dt) / 2pi, up to the single-precision constants
		let dt = 0.01;
		let w = warp(5.0 * dt / 2.0, 2.0);
		let expected = (std::f64::consts::PI * 5.0 * dt).tan() / (2.0 * std::f64::consts::PI);
		assert!((w - expected).abs() / expected < 1.0e-6);
	}

	#[test]
	fn split_root_solves_quadratic() {
		let c = Complex{ re: -0.7071, im: 0.7071 };
		let (a, b) = (3.0, 1.5);
		let (p1, p2) = split_root(c, a, b);
		for p in &[p1, p2] {
			let r = p * p - b * c * p + a;
			assert!(r.norm() < 1.0e-12);
		}
	}

}
