//! Value objects - small immutable types shared across layers

mod patch;

pub use patch::{Patch, ProfileChanges};
