//! Coordinate transform engine and magnetic field sampling for analytical
//! flux rope models.
//!
//! Rotation algebra lives in `rope-math`; this crate wires it to the
//! caller-supplied capabilities of a concrete cross-section model.

pub mod capability;
pub mod inverse;
pub mod model;
pub mod transform;

#[cfg(test)]
pub(crate) mod testing;

pub use capability::{
    Capabilities, CollisionPredicate, FieldLaw, ForwardMap, InitialGuess, InverseMap, JacobianMap,
};
pub use inverse::{AnalyticInverse, ApproximatedInverse, InverseStrategy};
pub use model::{orientation_coefficients, FluxRope, FluxRopeModel};
pub use transform::TransformEngine;
