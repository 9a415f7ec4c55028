
pub mod filters;
pub mod io;
pub mod picker;
pub mod preproc;

/// Value SAC uses to mark an undefined sample or header field
pub const SAC_UNDEF:f32 = -12345.0;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SacProcErr {
	UnsupportedFilter(&'static str),
	InvalidHeader(&'static str),
	ByteOrderMismatch,
	Io(&'static str),
	Other(&'static str),
}

impl From<SacProcErr> for &'static str {
	fn from(e:SacProcErr) -> &'static str {
		match e {
			SacProcErr::UnsupportedFilter(s) => s,
			SacProcErr::InvalidHeader(s)     => s,
			SacProcErr::ByteOrderMismatch    => "SAC file size does not match npts in either byte order",
			SacProcErr::Io(s)                => s,
			SacProcErr::Other(s)             => s,
		}
	}
}
