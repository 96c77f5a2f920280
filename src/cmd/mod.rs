pub mod batch;
pub mod convert;
