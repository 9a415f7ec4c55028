
use std::convert::TryFrom;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};

use byteorder::{ByteOrder, BigEndian, LittleEndian, WriteBytesExt};
use chrono::NaiveDate;

use crate::{SacProcErr, SAC_UNDEF};

pub const HEADER_LEN:usize = 632;

const NUMERIC_LEN:usize = 440;
const INT_START:usize = 280;
const K_LEN:usize = 8;

// Float fields, by word index
const DELTA:usize  = 0;
const B:usize      = 5;
const E:usize      = 6;
const CMPAZ:usize  = 57;
const CMPINC:usize = 58;

// Integer fields, by word index after the floats
const NZYEAR:usize = 0;
const NPTS:usize   = 9;

// String fields, by byte offset
const KSTNM:usize  = 440;
const KHOLE:usize  = 464;
const KCMPNM:usize = 600;
const KNETWK:usize = 608;

const MAX_GAP_SEC:f64 = 86400.0;
const MAX_DELTA_DIFF:f64 = 1.0e-6;

/// One SAC time series.  The header is kept little-endian in memory; `big_endian` records the byte order
/// the trace is written back out in.
#[derive(Debug, Clone, PartialEq)]
pub struct SacTrace {
	header: Vec<u8>,
	big_endian: bool,
	pub data: Vec<f32>,
}

impl SacTrace {

	/// Reads a header and its samples.  The byte order is whichever one makes the header's npts agree with `file_len`.
	pub fn read_from<R: Read>(reader:&mut R, file_len:u64) -> Result<Self, SacProcErr> {
		if file_len < HEADER_LEN as u64 {
			return Err(SacProcErr::InvalidHeader("SAC file is shorter than its header"));
		}

		let mut header:Vec<u8> = vec![0; HEADER_LEN];
		reader.read_exact(&mut header).map_err(|_| SacProcErr::Io("Unable to read SAC header"))?;

		let npts_bytes = &header[INT_START + NPTS*4..INT_START + NPTS*4 + 4];
		let fits = |npts:i32| npts >= 0 && file_len == (HEADER_LEN as u64) + 4*(npts as u64);
		let (big_endian, npts) = match (LittleEndian::read_i32(npts_bytes), BigEndian::read_i32(npts_bytes)) {
			(n, _) if fits(n) => (false, n as usize),
			(_, n) if fits(n) => (true, n as usize),
			_ => return Err(SacProcErr::ByteOrderMismatch),
		};

		let mut raw:Vec<u8> = vec![0; npts * 4];
		reader.read_exact(&mut raw).map_err(|_| SacProcErr::Io("Unable to read SAC data"))?;
		let data:Vec<f32> = if big_endian {
			swap_words(&mut header[..NUMERIC_LEN]);
			raw.chunks(4).map(BigEndian::read_f32).collect()
		} else {
			raw.chunks(4).map(LittleEndian::read_f32).collect()
		};

		Ok(Self{ header, big_endian, data })
	}

	pub fn load(path:&str) -> Result<Self, SacProcErr> {
		let file = File::open(path).map_err(|_| SacProcErr::Io("Unable to open SAC file"))?;
		let file_len = file.metadata().map_err(|_| SacProcErr::Io("Unable to read SAC file metadata"))?.len();
		Self::read_from(&mut BufReader::new(file), file_len)
	}

	/// Writes the header and samples in the byte order the trace was read with.  npts follows the data.
	pub fn write_to<W: Write>(&self, writer:&mut W) -> Result<(), SacProcErr> {
		let mut header = self.header.clone();
		LittleEndian::write_i32(&mut header[INT_START + NPTS*4..INT_START + NPTS*4 + 4], self.data.len() as i32);
		if self.big_endian { swap_words(&mut header[..NUMERIC_LEN]); }

		writer.write_all(&header).map_err(|_| SacProcErr::Io("Unable to write SAC header"))?;
		for &x in &self.data {
			let result = if self.big_endian { writer.write_f32::<BigEndian>(x) } else { writer.write_f32::<LittleEndian>(x) };
			result.map_err(|_| SacProcErr::Io("Unable to write SAC data"))?;
		}
		writer.flush().map_err(|_| SacProcErr::Io("Unable to write SAC data"))
	}

	pub fn save(&self, path:&str) -> Result<(), SacProcErr> {
		let file = File::create(path).map_err(|_| SacProcErr::Io("Unable to create SAC file"))?;
		self.write_to(&mut BufWriter::new(file))
	}

	pub fn delta(&self) -> f64 { self.float(DELTA) as f64 }
	pub fn begin(&self) -> f64 { self.float(B) as f64 }
	pub fn npts(&self) -> usize { self.data.len() }
	pub fn is_big_endian(&self) -> bool { self.big_endian }
	pub fn set_big_endian(&mut self, big_endian:bool) { self.big_endian = big_endian; }

	/// Time of the last sample relative to the reference time
	pub fn end(&self) -> f64 {
		self.begin() + (self.npts().saturating_sub(1) as f64) * self.delta()
	}

	/// Reference time in seconds since the Unix epoch.  None if any of its fields is undefined or out of range.
	pub fn reference_time(&self) -> Option<f64> {
		let fields:Vec<i32> = (NZYEAR..NZYEAR+6).map(|i| self.int(i)).collect();
		if fields.iter().any(|&x| x == SAC_UNDEF as i32) { return None; }

		let field = |i:usize| u32::try_from(fields[i]).ok();
		let t = NaiveDate::from_yo_opt(fields[0], field(1)?)?
			.and_hms_milli_opt(field(2)?, field(3)?, field(4)?, field(5)?)?;
		Some((t.and_utc().timestamp_millis() as f64) / 1000.0)
	}

	/// Station, channel, network and location codes as "STA.CHAN.NET.LOC"
	pub fn scnl(&self) -> String {
		format!("{}.{}.{}.{}", self.string(KSTNM), self.string(KCMPNM), self.string(KNETWK), self.string(KHOLE))
	}

	pub fn set_scnl(&mut self, sta:Option<&str>, chan:Option<&str>, net:Option<&str>, loc:Option<&str>) {
		for (offset, value) in [(KSTNM, sta), (KCMPNM, chan), (KNETWK, net), (KHOLE, loc)].iter() {
			if let Some(s) = value { self.set_string(*offset, s); }
		}
	}

	pub fn orientation(&self) -> (f32, f32) { (self.float(CMPAZ), self.float(CMPINC)) }

	/// Component azimuth and inclination in degrees.  Missing values default by the
	/// third letter of the channel code.
	pub fn set_orientation(&mut self, azimuth:Option<f32>, inclination:Option<f32>) {
		let (az_default, inc_default) = match self.header[KCMPNM + 2].to_ascii_uppercase() {
			b'Z' => (0.0, 0.0),
			b'N' => (0.0, 90.0),
			b'E' => (90.0, 90.0),
			_    => (SAC_UNDEF, SAC_UNDEF),
		};
		self.set_float(CMPAZ, azimuth.unwrap_or(az_default));
		self.set_float(CMPINC, inclination.unwrap_or(inc_default));
	}

	/// Appends `next` to this trace, filling any gap between them with undefined samples.
	/// Returns the joined trace and the number of samples filled.
	pub fn concat(&self, next:&SacTrace) -> Result<(SacTrace, usize), SacProcErr> {
		let delta = self.delta();
		if (delta - next.delta()).abs() > MAX_DELTA_DIFF {
			return Err(SacProcErr::Other("Sample intervals of the two traces differ"));
		}
		if !(delta > 0.0) {
			return Err(SacProcErr::InvalidHeader("Sample interval must be positive"));
		}

		let (ref0, ref1) = match (self.reference_time(), next.reference_time()) {
			(Some(r0), Some(r1)) => (r0, r1),
			_ => return Err(SacProcErr::InvalidHeader("Reference time is undefined")),
		};

		let gap_sec:f64 = (ref1 + next.begin()) - (ref0 + self.end()) + delta * 0.1;
		// Truncated toward zero, so up to one sample of early start still counts as no gap
		let gap_samples:i64 = (gap_sec / next.delta() - 1.0) as i64;
		if gap_samples < 0 {
			return Err(SacProcErr::Other("The two traces overlap"));
		}
		if gap_samples >= (MAX_GAP_SEC / next.delta()) as i64 {
			return Err(SacProcErr::Other("Gap between the two traces is a day or longer"));
		}
		let gap_samples = gap_samples as usize;

		let mut ans = self.clone();
		ans.data.extend(std::iter::repeat(SAC_UNDEF).take(gap_samples));
		ans.data.extend_from_slice(&next.data);
		let e = ans.end() as f32;
		ans.set_float(E, e);
		ans.set_int(NPTS, ans.data.len() as i32);

		Ok((ans, gap_samples))
	}

	fn float(&self, idx:usize) -> f32 { LittleEndian::read_f32(&self.header[idx*4..idx*4+4]) }
	fn set_float(&mut self, idx:usize, x:f32) { LittleEndian::write_f32(&mut self.header[idx*4..idx*4+4], x) }

	fn int(&self, idx:usize) -> i32 {
		let offset = INT_START + idx*4;
		LittleEndian::read_i32(&self.header[offset..offset+4])
	}

	fn set_int(&mut self, idx:usize, x:i32) {
		let offset = INT_START + idx*4;
		LittleEndian::write_i32(&mut self.header[offset..offset+4], x)
	}

	fn string(&self, offset:usize) -> String {
		let field = &self.header[offset..offset+K_LEN];
		let end = field.iter().position(|&c| c == 0).unwrap_or(K_LEN);
		String::from_utf8_lossy(&field[..end]).trim_end().to_string()
	}

	fn set_string(&mut self, offset:usize, s:&str) {
		let bytes = s.as_bytes();
		for i in 0..K_LEN {
			self.header[offset + i] = if i < bytes.len() { bytes[i] } else { b' ' };
		}
	}

}

fn swap_words(bytes:&mut [u8]) {
	for word in bytes.chunks_mut(4) { word.reverse(); }
}

#[cfg(test)]
mod tests {

	use std::io::Cursor;
	use super::*;

	const NVHDR:usize  = 6;
	const IFTYPE:usize = 15;
	const LEVEN:usize  = 35;

	// Evenly sampled trace starting at b = 0 with every other header field undefined
	fn synthetic(delta:f32, data:Vec<f32>) -> SacTrace {
		let mut header:Vec<u8> = vec![0; HEADER_LEN];
		for i in 0..(NUMERIC_LEN / 4) {
			if i * 4 < INT_START {
				LittleEndian::write_f32(&mut header[i*4..i*4+4], SAC_UNDEF);
			} else {
				LittleEndian::write_i32(&mut header[i*4..i*4+4], SAC_UNDEF as i32);
			}
		}
		for chunk in header[NUMERIC_LEN..].chunks_mut(K_LEN) {
			chunk.copy_from_slice(b"-12345  ");
		}

		let mut ans = SacTrace{ header, big_endian: false, data };
		ans.set_float(DELTA, delta);
		ans.set_float(B, 0.0);
		let e = (ans.data.len().saturating_sub(1) as f32) * delta;
		ans.set_float(E, e);
		ans.set_int(NVHDR, 6);
		let npts = ans.data.len() as i32;
		ans.set_int(NPTS, npts);
		ans.set_int(IFTYPE, 1);
		ans.set_int(LEVEN, 1);
		ans
	}

	fn set_reference_time(trace:&mut SacTrace, fields:[i32; 6]) {
		for (i, &x) in fields.iter().enumerate() { trace.set_int(NZYEAR + i, x); }
	}

	fn ramp(n:usize) -> Vec<f32> { (0..n).map(|i| i as f32 * 0.5 - 3.0).collect() }

	#[test]
	fn write_then_read_keeps_byte_order() {
		for &big in &[false, true] {
			let mut trace = synthetic(0.01, ramp(250));
			trace.set_scnl(Some("TWKB"), Some("HLZ"), Some("TW"), Some("01"));
			set_reference_time(&mut trace, [2024, 100, 3, 4, 5, 600]);
			trace.set_big_endian(big);

			let mut buffer:Vec<u8> = vec![];
			trace.write_to(&mut buffer).unwrap();
			assert_eq!(buffer.len(), HEADER_LEN + 4*250);

			let len = buffer.len() as u64;
			let back = SacTrace::read_from(&mut Cursor::new(buffer), len).unwrap();
			assert_eq!(back, trace);
			assert_eq!(back.is_big_endian(), big);
		}
	}

	#[test]
	fn detects_big_endian_file() {
		let mut bytes:Vec<u8> = vec![0; HEADER_LEN];
		BigEndian::write_f32(&mut bytes[0..4], 0.02);
		BigEndian::write_f32(&mut bytes[20..24], -1.5);
		BigEndian::write_i32(&mut bytes[316..320], 3);
		for &x in &[1.0f32, -2.0, 4.5] { bytes.write_f32::<BigEndian>(x).unwrap(); }

		let len = bytes.len() as u64;
		let trace = SacTrace::read_from(&mut Cursor::new(bytes), len).unwrap();
		assert!(trace.is_big_endian());
		assert_eq!(trace.delta(), 0.02f32 as f64);
		assert_eq!(trace.begin(), -1.5);
		assert_eq!(trace.data, vec![1.0, -2.0, 4.5]);
	}

	#[test]
	fn size_mismatch_is_an_error() {
		let mut buffer:Vec<u8> = vec![];
		synthetic(0.01, ramp(10)).write_to(&mut buffer).unwrap();
		buffer.extend_from_slice(&[0, 0, 0, 0]);
		let len = buffer.len() as u64;
		assert_eq!(SacTrace::read_from(&mut Cursor::new(buffer), len), Err(SacProcErr::ByteOrderMismatch));

		assert_eq!(SacTrace::read_from(&mut Cursor::new(vec![0u8; 100]), 100),
			Err(SacProcErr::InvalidHeader("SAC file is shorter than its header")));
	}

	#[test]
	fn reference_time_from_header() {
		let mut trace = synthetic(0.01, vec![]);
		assert_eq!(trace.reference_time(), None);

		set_reference_time(&mut trace, [1970, 1, 0, 0, 0, 0]);
		assert_eq!(trace.reference_time(), Some(0.0));

		set_reference_time(&mut trace, [2024, 1, 0, 0, 0, 0]);
		assert_eq!(trace.reference_time(), Some(1704067200.0));

		// Leap day
		set_reference_time(&mut trace, [2000, 60, 12, 30, 15, 250]);
		assert_eq!(trace.reference_time(), Some(951827415.25));

		// Last day of a leap year
		set_reference_time(&mut trace, [2024, 366, 23, 59, 59, 999]);
		assert_eq!(trace.reference_time(), Some(1735689599.999));
	}

	#[test]
	fn reference_time_rejects_out_of_range_fields() {
		let mut trace = synthetic(0.01, vec![]);
		for fields in &[[2023, 366, 0, 0, 0, 0], [2024, 0, 0, 0, 0, 0], [2024, 10, 24, 0, 0, 0], [2024, 10, 0, 60, 0, 0], [2024, 10, 0, 0, -1, 0]] {
			set_reference_time(&mut trace, *fields);
			assert_eq!(trace.reference_time(), None, "{:?}", fields);
		}
	}

	#[test]
	fn scnl_is_trimmed_and_truncated() {
		let mut trace = synthetic(0.01, vec![]);
		assert_eq!(trace.scnl(), "-12345.-12345.-12345.-12345");

		trace.set_scnl(Some("ABCDEFGHIJ"), Some("HHN"), Some("TW"), None);
		assert_eq!(trace.scnl(), "ABCDEFGH.HHN.TW.-12345");

		trace.set_scnl(None, None, None, Some(""));
		assert_eq!(trace.scnl(), "ABCDEFGH.HHN.TW.");
	}

	#[test]
	fn orientation_defaults_by_component() {
		let mut trace = synthetic(0.01, vec![]);
		for &(chan, expected) in &[("HLZ", (0.0, 0.0)), ("HLN", (0.0, 90.0)), ("hle", (90.0, 90.0)), ("HL1", (SAC_UNDEF, SAC_UNDEF))] {
			trace.set_scnl(None, Some(chan), None, None);
			trace.set_orientation(None, None);
			assert_eq!(trace.orientation(), expected);
		}

		trace.set_orientation(Some(45.0), Some(10.0));
		assert_eq!(trace.orientation(), (45.0, 10.0));
	}

	#[test]
	fn concat_fills_gap() {
		let mut first = synthetic(0.5, ramp(10));
		set_reference_time(&mut first, [2024, 1, 0, 0, 0, 0]);

		// Starts exactly one sample after the last one of the first trace
		let mut next = synthetic(0.5, vec![7.0; 4]);
		set_reference_time(&mut next, [2024, 1, 0, 0, 5, 0]);
		let (joined, gap) = first.concat(&next).unwrap();
		assert_eq!(gap, 0);
		assert_eq!(joined.npts(), 14);
		assert_eq!(joined.data[10], 7.0);
		assert_eq!(joined.end(), 6.5);

		// Three samples missing
		set_reference_time(&mut next, [2024, 1, 0, 0, 6, 500]);
		let (joined, gap) = first.concat(&next).unwrap();
		assert_eq!(gap, 3);
		assert_eq!(&joined.data[10..13], &[SAC_UNDEF; 3]);
		assert_eq!(joined.data[13], 7.0);
	}

	#[test]
	fn concat_tolerates_early_start() {
		let mut first = synthetic(0.5, ramp(10));
		set_reference_time(&mut first, [2024, 1, 0, 0, 0, 0]);

		// Due at 5.0 s, arrives at 4.9 s, still after the last sample at 4.5 s
		let mut next = synthetic(0.5, vec![7.0; 4]);
		set_reference_time(&mut next, [2024, 1, 0, 0, 4, 900]);
		let (joined, gap) = first.concat(&next).unwrap();
		assert_eq!(gap, 0);
		assert_eq!(joined.npts(), 14);
		assert_eq!(joined.data[10], 7.0);
	}

	#[test]
	fn concat_rejects_bad_pairs() {
		let mut first = synthetic(0.5, ramp(10));
		set_reference_time(&mut first, [2024, 1, 0, 0, 0, 0]);

		let mut next = synthetic(0.5, ramp(4));
		set_reference_time(&mut next, [2024, 1, 0, 0, 4, 0]);
		assert_eq!(first.concat(&next), Err(SacProcErr::Other("The two traces overlap")));

		set_reference_time(&mut next, [2024, 3, 0, 0, 0, 0]);
		assert!(first.concat(&next).is_err());

		let mut next = synthetic(0.25, ramp(4));
		set_reference_time(&mut next, [2024, 1, 0, 0, 5, 0]);
		assert!(first.concat(&next).is_err());

		assert!(first.concat(&synthetic(0.5, ramp(4))).is_err());
	}

}
