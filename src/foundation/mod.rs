pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod graded;
pub(crate) mod math;
