//! Pattern rendering: layouts, the renderer and the cache it writes through.

pub(crate) mod cache;
pub(crate) mod pattern;
