
pub mod sac;
