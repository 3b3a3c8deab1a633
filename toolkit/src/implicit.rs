use geo::CoordFloat;

use crate::plane::Vector3;

/// Real valued function `w = F(x, y, z)` defined over 3D space.
/// The level set `w = 0` describes a surface; the sign of `w` tells on which side of it a
/// point lies.
pub trait ImplicitFunction<T: CoordFloat> {
    /// Evaluate the function at `x`
    fn evaluate_function(&self, x: &Vector3<T>) -> T;

    /// Evaluate the function gradient at `x`
    fn evaluate_gradient(&self, x: &Vector3<T>) -> Vector3<T>;

    /// Evaluate the function at the point with coordinates `x`, `y` and `z`
    fn function_value_xyz(&self, x: T, y: T, z: T) -> T {
        self.evaluate_function(&[x, y, z])
    }
}
