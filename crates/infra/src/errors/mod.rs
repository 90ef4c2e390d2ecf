//! Infrastructure error conversions

pub(crate) mod conversions;

pub use conversions::InfraError;
