use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;
use thiserror::Error;

/// Bond or normal vectors shorter than this are treated as zero length.
pub const DEGENERATE_EPSILON: f64 = 1e-8;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeometryError {
    #[error("Dihedral is undefined: {what} has near-zero length ({length:.3e})")]
    Degenerate { what: &'static str, length: f64 },
}

/// Displacement from `b` to `a`.
#[inline]
pub fn subtract(a: &Point3<f64>, b: &Point3<f64>) -> Vector3<f64> {
    a - b
}

#[inline]
pub fn cross(u: &Vector3<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    u.cross(v)
}

#[inline]
pub fn dot(u: &Vector3<f64>, v: &Vector3<f64>) -> f64 {
    u.dot(v)
}

#[inline]
pub fn norm(v: &Vector3<f64>) -> f64 {
    v.norm()
}

#[inline]
pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    norm(&subtract(a, b))
}

fn non_degenerate(v: Vector3<f64>, what: &'static str) -> Result<Vector3<f64>, GeometryError> {
    let length = norm(&v);
    if length.is_finite() && length >= DEGENERATE_EPSILON {
        Ok(v)
    } else {
        Err(GeometryError::Degenerate { what, length })
    }
}

/// Torsion angle in radians defined by four points, in the range (-π, π].
///
/// Uses the atan2 form over the plane normals `n1 = b1 × b2` and `n2 = b2 × b3`,
/// which keeps the sign (IUPAC convention: clockwise looking down b2 is positive).
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] when any bond vector has near-zero length
/// or when three consecutive points are collinear.
pub fn dihedral(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
) -> Result<f64, GeometryError> {
    let b1 = non_degenerate(subtract(p1, p0), "bond p0-p1")?;
    let b2 = non_degenerate(subtract(p2, p1), "bond p1-p2")?;
    let b3 = non_degenerate(subtract(p3, p2), "bond p2-p3")?;

    let n1 = non_degenerate(cross(&b1, &b2), "normal of p0-p1-p2")?;
    let n2 = non_degenerate(cross(&b2, &b3), "normal of p1-p2-p3")?;

    let y = dot(&cross(&n1, &n2), &(b2 / norm(&b2)));
    let x = dot(&n1, &n2);

    let angle = y.atan2(x);
    Ok(if angle <= -PI { PI } else { angle })
}
