//! Explicit 5-point finite-difference stencil
use crate::{
    config::GridConfig,
    error::{HeatError, Result},
    field::Field,
    types::RealScalar,
};

/// Largest value of `rx + ry` for which the explicit scheme is stable
pub const STABILITY_LIMIT: f64 = 0.5;

// Relative slack on the stability check, so that `dt = 0.25 * min(dx^2, dy^2) / alpha` is not
// rejected because of rounding.
const STABILITY_SLACK: f64 = 1e-12;

/// Explicit Euler update of the heat equation with the 5-point Laplacian
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stencil<T: RealScalar> {
    rx: T,
    ry: T,
}

impl<T: RealScalar> Stencil<T> {
    /// Create a stencil from the mesh ratios `rx = alpha*dt/dx^2` and `ry = alpha*dt/dy^2`
    pub fn new(rx: f64, ry: f64) -> Result<Self> {
        if rx + ry > STABILITY_LIMIT * (1.0 + STABILITY_SLACK) {
            return Err(HeatError::Unstable { rx, ry });
        }
        Ok(Self {
            rx: T::cast_from(rx),
            ry: T::cast_from(ry),
        })
    }

    /// Create the stencil for a grid configuration
    pub fn from_grid(grid: &GridConfig) -> Result<Self> {
        Self::new(grid.rx(), grid.ry())
    }

    /// Mesh ratio along `i`
    pub fn rx(&self) -> T {
        self.rx
    }
    /// Mesh ratio along `j`
    pub fn ry(&self) -> T {
        self.ry
    }

    /// Advance every interior cell of `current` by one step, writing into `next`.
    ///
    /// The halo of `current` must already hold exchanged or boundary values. The halo of `next`
    /// is not written.
    pub fn apply(&self, current: &Field<T>, next: &mut Field<T>) {
        debug_assert_eq!((current.nx(), current.ny()), (next.nx(), next.ny()));
        let two = T::one() + T::one();
        let stride = current.stride();
        let u = current.data();
        for i in 1..=current.nx() {
            for j in 1..=current.ny() {
                let c = i * stride + j;
                let centre = u[c];
                let value = centre
                    + self.rx * (u[c - stride] - two * centre + u[c + stride])
                    + self.ry * (u[c - 1] - two * centre + u[c + 1]);
                next.set(i, j, value);
            }
        }
    }
}

/// Largest absolute difference between two fields over the interior
pub fn max_difference<T: RealScalar>(a: &Field<T>, b: &Field<T>) -> T {
    let mut max = T::zero();
    for i in 1..=a.nx() {
        for j in 1..=a.ny() {
            max = max.max((a.get(i, j) - b.get(i, j)).abs());
        }
    }
    max
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{boundary::enforce, boundary::BoundaryValues, topology::ProcessTopology};
    use approx::assert_relative_eq;

    #[test]
    fn test_unstable_rejected() {
        assert!(Stencil::<f64>::new(0.25, 0.25).is_ok());
        assert!(matches!(
            Stencil::<f64>::new(0.3, 0.25),
            Err(HeatError::Unstable { .. })
        ));
    }

    #[test]
    fn test_single_cell_update() {
        let stencil = Stencil::<f64>::new(0.25, 0.25).unwrap();
        let mut current = Field::new(1, 1, 0.0);
        current.set(1, 1, 4.0);
        current.set(0, 1, 8.0);
        let mut next = Field::new(1, 1, 0.0);
        stencil.apply(&current, &mut next);
        // 4 + 0.25 * (8 - 8 + 0) + 0.25 * (0 - 8 + 0)
        assert_relative_eq!(next.get(1, 1), 2.0);
    }

    #[test]
    fn test_uniform_field_is_steady() {
        let stencil = Stencil::<f64>::new(0.2, 0.1).unwrap();
        let current = Field::new(5, 4, 3.5);
        let mut next = Field::new(5, 4, 0.0);
        stencil.apply(&current, &mut next);
        assert_eq!(max_difference(&current, &next), 0.0);
    }

    #[test]
    fn test_linear_profile_is_steady() {
        // A linear function has zero discrete Laplacian.
        let stencil = Stencil::<f64>::new(0.25, 0.25).unwrap();
        let mut current = Field::new(4, 4, 0.0);
        for i in 0..6 {
            for j in 0..6 {
                current.set(i, j, 2.0 * i as f64 + j as f64);
            }
        }
        let mut next = current.clone();
        stencil.apply(&current, &mut next);
        assert_relative_eq!(max_difference(&current, &next), 0.0, epsilon = 1e-12);
    }

    macro_rules! make_tests {
        ($scalar:ty) => {
            paste::item! {
                #[test]
                fn [< test_hot_top_edge_ $scalar >]() {
                    //! One step of the reference 10x10 problem on one process
                    let n = 10;
                    let dx = 1.0 / (n - 1) as f64;
                    let alpha = 0.01;
                    let dt = 0.25 * dx * dx / alpha;
                    let r = alpha * dt / (dx * dx);
                    let stencil = Stencil::<$scalar>::new(r, r).unwrap();

                    let topology = ProcessTopology::new(1, 0).unwrap();
                    let mut current = Field::<$scalar>::new(n, n, 20.0);
                    enforce(&mut current, &topology, &BoundaryValues::default());
                    let mut next = current.clone();
                    stencil.apply(&current, &mut next);

                    let near_hot = next.get(1, 1);
                    assert!(near_hot > 20.0 && near_hot < 100.0);
                    let near_cold = next.get(n - 1, 1);
                    assert!(near_cold > 0.0 && near_cold < 20.0);
                    assert_relative_eq!(near_hot, 35.0, epsilon = 1e-4);
                    assert_relative_eq!(near_cold, 15.0, epsilon = 1e-4);
                }
            }
        };
    }

    make_tests!(f32);
    make_tests!(f64);
}
