//! Concrete garments built on the engine.

pub(crate) mod test_garment;
