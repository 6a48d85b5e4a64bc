//! Mathematical primitives for the flux rope core.

pub mod least_squares;
pub mod linalg;
pub mod rotation;
