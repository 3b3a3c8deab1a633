use std::fmt::{Display, Formatter};

use geo::CoordFloat;
use serde::{Deserialize, Serialize};

use crate::implicit::ImplicitFunction;

/// Point or direction in 3D space
pub type Vector3<T> = [T; 3];

/// Relative tolerance below which a line is considered parallel to a plane
pub const PLANE_TOL: f64 = 1.0e-6;

/// Dot product of `a` and `b`
pub fn dot<T: CoordFloat>(a: &Vector3<T>, b: &Vector3<T>) -> T {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Vector from `b` to `a`
fn sub<T: CoordFloat>(a: &Vector3<T>, b: &Vector3<T>) -> Vector3<T> {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// `x` moved by `t` times `dir`
fn add_scaled<T: CoordFloat>(x: &Vector3<T>, t: T, dir: &Vector3<T>) -> Vector3<T> {
    [x[0] + t * dir[0], x[1] + t * dir[1], x[2] + t * dir[2]]
}

/// Project `x` onto the plane through `origin` with unit length `normal`.
/// The normal is not normalized here.
pub fn project_point<T: CoordFloat>(x: &Vector3<T>, origin: &Vector3<T>, normal: &Vector3<T>) -> Vector3<T> {
    let t = dot(normal, &sub(x, origin));
    add_scaled(x, -t, normal)
}

/// Project `x` onto the plane through `origin` with a `normal` of any length.
/// Returns `x` unchanged if `normal` is the zero vector.
pub fn generalized_project_point<T: CoordFloat>(x: &Vector3<T>, origin: &Vector3<T>, normal: &Vector3<T>) -> Vector3<T> {
    let n2 = dot(normal, normal);
    if n2 == T::zero() {
        return *x;
    }

    let t = dot(normal, &sub(x, origin));
    add_scaled(x, -t / n2, normal)
}

/// Distance from `x` to the plane through `origin` with unit length `normal`
pub fn distance_to_plane<T: CoordFloat>(x: &Vector3<T>, origin: &Vector3<T>, normal: &Vector3<T>) -> T {
    dot(normal, &sub(x, origin)).abs()
}

/// Outcome of intersecting the segment `p1 -> p2` with a plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineIntersection<T> {
    /// The line runs parallel to the plane
    Parallel,
    /// The infinite line crosses the plane at parameter `t` outside of `[0, 1]`
    Outside { t: T, x: Vector3<T> },
    /// The segment crosses the plane at parameter `t` in `[0, 1]`
    Hit { t: T, x: Vector3<T> },
}

impl<T: Copy> LineIntersection<T> {
    /// Returns `true` if the segment itself crosses the plane
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    /// Line parameter of the crossing, if the line is not parallel
    pub fn t(&self) -> Option<T> {
        match *self {
            Self::Parallel => None,
            Self::Outside { t, .. } | Self::Hit { t, .. } => Some(t),
        }
    }

    /// Coordinates of the crossing, if the line is not parallel
    pub fn point(&self) -> Option<Vector3<T>> {
        match *self {
            Self::Parallel => None,
            Self::Outside { x, .. } | Self::Hit { x, .. } => Some(x),
        }
    }
}

/// Intersect the line through `p1` and `p2` with the plane through `plane_point` with
/// `normal`. The parallel test is relative to the distance of `p1` from the plane so it
/// does not depend on the scale of the input.
pub fn intersect_with_line<T: CoordFloat>(p1: &Vector3<T>, p2: &Vector3<T>,
                                          normal: &Vector3<T>, plane_point: &Vector3<T>) -> LineIntersection<T> {
    let p21 = sub(p2, p1);

    let num = dot(normal, plane_point) - dot(normal, p1);
    let den = dot(normal, &p21);

    let tol = T::from(PLANE_TOL).unwrap_or_else(T::epsilon);
    if den.abs() <= num.abs() * tol {
        return LineIntersection::Parallel;
    }

    let t = num / den;
    let x = add_scaled(p1, t, &p21);

    if t >= T::zero() && t <= T::one() {
        LineIntersection::Hit { t, x }
    } else {
        LineIntersection::Outside { t, x }
    }
}

/// Infinite plane through `origin` perpendicular to `normal`.
/// As an implicit function it evaluates to `normal . (x - origin)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane<T = f64> {
    origin: Vector3<T>,
    normal: Vector3<T>,
}

impl<T: CoordFloat> Default for Plane<T> {
    /// Plane through the origin, perpendicular to the z-axis
    fn default() -> Self {
        Self {
            origin: [T::zero(); 3],
            normal: [T::zero(), T::zero(), T::one()],
        }
    }
}

impl<T: CoordFloat> Plane<T> {
    pub fn new(origin: Vector3<T>, normal: Vector3<T>) -> Self {
        Self {
            origin,
            normal,
        }
    }

    pub fn origin(&self) -> &Vector3<T> {
        &self.origin
    }

    pub fn set_origin(&mut self, origin: Vector3<T>) {
        self.origin = origin;
    }

    pub fn normal(&self) -> &Vector3<T> {
        &self.normal
    }

    pub fn set_normal(&mut self, normal: Vector3<T>) {
        self.normal = normal;
    }

    /// Translate the plane by `distance` along its normal
    pub fn push(&mut self, distance: T) {
        if distance == T::zero() {
            return;
        }
        self.origin = add_scaled(&self.origin, distance, &self.normal);
    }

    /// Project `x` onto this plane. Assumes a unit length normal.
    pub fn project_point(&self, x: &Vector3<T>) -> Vector3<T> {
        project_point(x, &self.origin, &self.normal)
    }

    /// Project `x` onto this plane for a normal of any length
    pub fn generalized_project_point(&self, x: &Vector3<T>) -> Vector3<T> {
        generalized_project_point(x, &self.origin, &self.normal)
    }

    /// Distance from `x` to this plane. Assumes a unit length normal.
    pub fn distance_to_plane(&self, x: &Vector3<T>) -> T {
        distance_to_plane(x, &self.origin, &self.normal)
    }

    /// Intersect the segment `p1 -> p2` with this plane
    pub fn intersect_with_line(&self, p1: &Vector3<T>, p2: &Vector3<T>) -> LineIntersection<T> {
        intersect_with_line(p1, p2, &self.normal, &self.origin)
    }
}

impl<T: CoordFloat> ImplicitFunction<T> for Plane<T> {
    fn evaluate_function(&self, x: &Vector3<T>) -> T {
        dot(&self.normal, &sub(x, &self.origin))
    }

    fn evaluate_gradient(&self, _x: &Vector3<T>) -> Vector3<T> {
        self.normal
    }
}

impl<T: CoordFloat + Display> Display for Plane<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let [nx, ny, nz] = self.normal;
        let [ox, oy, oz] = self.origin;
        writeln!(f, "Normal: ({}, {}, {})", nx, ny, nz)?;
        writeln!(f, "Origin: ({}, {}, {})", ox, oy, oz)
    }
}

#[cfg(test)]
mod test {
    use crate::implicit::ImplicitFunction;
    use crate::plane::{generalized_project_point, intersect_with_line, project_point,
                       LineIntersection, Plane, Vector3};

    fn assert_close(a: &Vector3<f64>, b: &Vector3<f64>) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-12, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn test_project_point() {
        let origin: Vector3<f64> = [1.0, 1.0, 1.0];
        let normal = [1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0];
        let x = [4.0, -2.0, 7.5];

        let xproj = project_point(&x, &origin, &normal);
        let plane = Plane::new(origin, normal);
        assert!(plane.evaluate_function(&xproj).abs() < 1e-12, "{:?} not on plane", xproj);

        let again = project_point(&xproj, &origin, &normal);
        assert_close(&again, &xproj);
    }

    #[test]
    fn test_generalized_project_point() {
        let origin = [0.0, 0.0, 2.0];
        let x = [3.0, -1.0, 5.0];

        let xproj = generalized_project_point(&x, &origin, &[0.0, 0.0, 4.0]);
        assert_close(&xproj, &[3.0, -1.0, 2.0]);

        let unchanged = generalized_project_point(&x, &origin, &[0.0, 0.0, 0.0]);
        assert_eq!(unchanged, x);
    }

    #[test]
    fn test_intersect_hit() {
        let result = intersect_with_line(&[0.0, 0.0, -1.0], &[0.0, 0.0, 1.0],
                                         &[0.0, 0.0, 1.0], &[0.0, 0.0, 0.0]);
        assert_eq!(result, LineIntersection::Hit { t: 0.5, x: [0.0, 0.0, 0.0] });
        assert!(result.is_hit());
    }

    #[test]
    fn test_intersect_outside() {
        let result = intersect_with_line(&[0.0, 0.0, 1.0], &[0.0, 0.0, 2.0],
                                         &[0.0, 0.0, 1.0], &[0.0, 0.0, 0.0]);
        assert!(!result.is_hit());
        assert_eq!(result.t(), Some(-1.0));
        assert_eq!(result.point(), Some([0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_intersect_parallel() {
        let result = intersect_with_line(&[0.0, 0.0, 1.0], &[5.0, 3.0, 1.0],
                                         &[0.0, 0.0, 1.0], &[0.0, 0.0, 0.0]);
        assert_eq!(result, LineIntersection::Parallel);
        assert_eq!(result.t(), None);

        // Lying in the plane counts as parallel
        let result = intersect_with_line(&[0.0, 0.0, 0.0], &[1.0, 0.0, 0.0],
                                         &[0.0, 0.0, 1.0], &[0.0, 0.0, 0.0]);
        assert_eq!(result, LineIntersection::Parallel);
    }

    #[test]
    fn test_intersect_relative_tolerance() {
        // Nearly parallel far away from the plane
        let result = intersect_with_line(&[0.0, 0.0, 1.0e3], &[1.0, 0.0, 1.0e3 + 1.0e-4],
                                         &[0.0, 0.0, 1.0], &[0.0, 0.0, 0.0]);
        assert_eq!(result, LineIntersection::Parallel);

        // Starting on the plane, any slope is a crossing at t = 0
        let result = intersect_with_line(&[0.0, 0.0, 0.0], &[1.0, 0.0, 1.0e-9],
                                         &[0.0, 0.0, 1.0], &[0.0, 0.0, 0.0]);
        assert_eq!(result.t(), Some(0.0));
        assert!(result.is_hit());
    }

    #[test]
    fn test_single_precision() {
        let plane: Plane<f32> = Plane::default();
        let result = plane.intersect_with_line(&[1.0, 2.0, -3.0], &[1.0, 2.0, 1.0]);
        assert_eq!(result, LineIntersection::Hit { t: 0.75, x: [1.0, 2.0, 0.0] });
        assert_eq!(plane.project_point(&[1.5, -2.0, 8.0]), [1.5, -2.0, 0.0]);
    }

    #[test]
    fn test_implicit_function() {
        let plane = Plane::new([0.0, 0.0, 1.0], [0.0, 0.0, 1.0]);
        assert_eq!(plane.evaluate_function(&[3.0, 4.0, 3.0]), 2.0);
        assert_eq!(plane.function_value_xyz(0.0, 0.0, -1.0), -2.0);
        assert_eq!(plane.evaluate_function(&[9.0, -9.0, 1.0]), 0.0);
        assert_eq!(plane.evaluate_gradient(&[7.0, 8.0, 9.0]), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_push_and_distance() {
        let mut plane = Plane::new([1.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        plane.push(2.0);
        assert_eq!(plane.origin(), &[3.0, 0.0, 0.0]);
        assert_eq!(plane.distance_to_plane(&[-1.0, 5.0, 5.0]), 4.0);

        plane.set_normal([0.0, 1.0, 0.0]);
        plane.set_origin([0.0, 0.0, 0.0]);
        assert_eq!(plane.generalized_project_point(&[2.0, 2.0, 2.0]), [2.0, 0.0, 2.0]);
    }

    #[test]
    fn test_display_and_serde() {
        let plane: Plane = Plane::default();
        assert_eq!(plane.to_string(), "Normal: (0, 0, 1)\nOrigin: (0, 0, 0)\n");

        let json = serde_json::to_string(&plane).unwrap();
        assert_eq!(json, r#"{"origin":[0.0,0.0,0.0],"normal":[0.0,0.0,1.0]}"#);
        let parsed: Plane = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, plane);
    }
}
