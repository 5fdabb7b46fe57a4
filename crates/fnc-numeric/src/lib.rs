#![forbid(unsafe_code)]

//! Candidate numeric wrappers exercised by the conformance harness.
//!
//! These types carry representation, codecs, bounds, and construction
//! policy only; they define no operator arithmetic.

mod fixed;
mod integer;
mod vector;

pub use fixed::{Fix64, UFix32};
pub use integer::{
    CheckedI64, CheckedU16, ClampedI16, ClampedI32, ClampedU8, WrappingI32, WrappingU8,
};
pub use vector::{Vector2, Vector3};

/// Labels of every scalar wrapper in this crate.
pub const SCALAR_CANDIDATE_NAMES: [&str; 9] = [
    "fix64",
    "ufix32",
    "clamped_u8",
    "clamped_i16",
    "clamped_i32",
    "checked_u16",
    "checked_i64",
    "wrapping_u8",
    "wrapping_i32",
];
