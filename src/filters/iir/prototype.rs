
use num_complex::Complex;
use num_traits::Zero;

use super::{SectionType, PI};

/// One pole (and zero, for pole-zero pairs) of a normalized analog lowpass prototype.
/// Conjugate pairs are represented by the member with the positive imaginary part.
#[derive(Debug, Clone, Copy)]
pub struct PrototypeSection {
	pub pole: Complex<f64>,
	pub zero: Complex<f64>,
	pub stype: SectionType,
}

impl PrototypeSection {

	fn real_pole(re:f64) -> Self {
		Self{ pole: Complex{ re, im: 0.0 }, zero: Complex::zero(), stype: SectionType::SingleRealPole }
	}

	fn conj_pole_pair(re:f64, im:f64) -> Self {
		Self{ pole: Complex{ re, im }, zero: Complex::zero(), stype: SectionType::ComplexConjPolePair }
	}

}

#[derive(Debug, Clone)]
pub struct Prototype {
	pub sections: Vec<PrototypeSection>,
	pub dc_value: f64,
}

// Bessel poles normalized to unit delay, conjugate pairs first and the real pole (odd orders) last
const BESSEL_POLES:[&[(f64, f64)]; 8] = [
	&[(-1.0,       0.0)],
	&[(-1.1016013, 0.6360098)],
	&[(-1.0474091, 0.9992645), (-1.3226758, 0.0)],
	&[(-0.9952088, 1.2571058), (-1.3700679, 0.4102497)],
	&[(-0.9576766, 1.4711244), (-1.3808774, 0.7179096), (-1.5023160, 0.0)],
	&[(-0.9306565, 1.6618633), (-1.3818581, 0.9714719), (-1.5714904, 0.3208964)],
	&[(-0.9098678, 1.8364514), (-1.3789032, 1.1915667), (-1.6120388, 0.5892445), (-1.6843682, 0.0)],
	&[(-0.8928710, 1.9983286), (-1.3738431, 1.3883585), (-1.6369417, 0.8227968), (-1.7574108, 0.2728679)],
];

pub const BESSEL_MAX_ORDER:usize = 8;

/// Butterworth poles on the unit circle.  For odd orders the real pole at -1 comes first.
pub fn butterworth(order:usize) -> Option<Prototype> {
	if order == 0 { return None; }

	let half = order / 2;
	let mut sections:Vec<PrototypeSection> = Vec::with_capacity(order - half);

	if half * 2 < order {
		sections.push(PrototypeSection::real_pole(-1.0));
	}

	for i in 0..half {
		let angle:f64 = PI * (0.5 + (2.0 * (i as f64) + 1.0) / (2.0 * (order as f64)));
		sections.push(PrototypeSection::conj_pole_pair(angle.cos(), angle.sin()));
	}

	Some(Prototype{ sections, dc_value: 1.0 })
}

/// Bessel poles from the fixed table; only orders 1 through 8 exist.
pub fn bessel(order:usize) -> Option<Prototype> {
	if order == 0 || order > BESSEL_MAX_ORDER { return None; }

	let sections:Vec<PrototypeSection> = BESSEL_POLES[order - 1].iter().map(|&(re, im)| {
		if im == 0.0 { PrototypeSection::real_pole(re) }
		else         { PrototypeSection::conj_pole_pair(re, im) }
	}).collect();

	Some(Prototype{ sections, dc_value: 1.0 })
}

#[cfg(test)]
mod tests {

	use super::*;

	#[test]
	fn butterworth_section_layout() {
		let p = butterworth(5).unwrap();
		assert_eq!(p.sections.len(), 3);
		assert_eq!(p.sections[0].stype, SectionType::SingleRealPole);
		assert_eq!(p.sections[0].pole, Complex{ re: -1.0, im: 0.0 });
		for s in &p.sections[1..] {
			assert_eq!(s.stype, SectionType::ComplexConjPolePair);
			assert!(s.pole.re < 0.0);
			assert!((s.pole.norm() - 1.0).abs() < 1.0e-12);
		}

		let p = butterworth(4).unwrap();
		assert_eq!(p.sections.len(), 2);
		assert!(p.sections.iter().all(|s| s.stype == SectionType::ComplexConjPolePair));
		assert!(butterworth(0).is_none());
	}

	#[test]
	fn bessel_table_bounds() {
		for order in 1..=BESSEL_MAX_ORDER {
			let p = bessel(order).unwrap();
			assert_eq!(p.sections.len(), order - order / 2);
			// Odd orders end with the single real pole
			let last = p.sections.last().unwrap();
			assert_eq!(last.stype == SectionType::SingleRealPole, order % 2 == 1);
		}
		assert!(bessel(0).is_none());
		assert!(bessel(9).is_none());
	}

	#[test]
	fn bessel_literals_are_exact() {
		let p = bessel(8).unwrap();
		assert_eq!(p.sections[3].pole, Complex{ re: -1.7574108, im: 0.2728679 });
		let p = bessel(3).unwrap();
		assert_eq!(p.sections[1].pole, Complex{ re: -1.3226758, im: 0.0 });
	}

}
