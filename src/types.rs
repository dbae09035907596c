//! Types

mod halo;
mod side;
pub use halo::HaloKind;
pub use side::{Axis, Side};

use num::Float;
use std::fmt::{Debug, Display};

/// Floating point type used for temperatures
pub trait RealScalar: Float + Debug + Display + Default + Send + Sync + 'static {
    /// Convert from an `f64` configuration value
    fn cast_from(value: f64) -> Self;
    /// Convert to `f64` for reporting
    fn cast_to(self) -> f64;
}

impl RealScalar for f64 {
    fn cast_from(value: f64) -> Self {
        value
    }
    fn cast_to(self) -> f64 {
        self
    }
}

impl RealScalar for f32 {
    fn cast_from(value: f64) -> Self {
        value as f32
    }
    fn cast_to(self) -> f64 {
        self as f64
    }
}
