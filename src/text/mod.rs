//! Building blocks of instruction text: fragments, positioned subsections and named elements.

pub(crate) mod builder;
pub(crate) mod element;
pub(crate) mod subsection;
