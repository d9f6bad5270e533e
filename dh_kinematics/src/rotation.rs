//! Rotation matrix builders and Euler angle extraction.

use serde::{Deserialize, Serialize};

use crate::error::{KinematicsError, Result};
use crate::matrix::{matrix_product, Matrix};
use crate::precision::round_default;

/// Below this, `sin(b)` of a Z-X-Z decomposition is treated as zero.
const GIMBAL_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Z-X-Z Euler rotation `Rz(a) * Rx(b) * Rz(c)`, rounded.
pub fn euler_zxz(a: f64, b: f64, c: f64) -> Matrix {
    let (sa, ca) = a.sin_cos();
    let (sb, cb) = b.sin_cos();
    let (sc, cc) = c.sin_cos();

    Matrix::from([
        [ca * cc - sa * cb * sc, -ca * sc - sa * cb * cc, sa * sb],
        [sa * cc + ca * cb * sc, -sa * sc + ca * cb * cc, -ca * sb],
        [sb * sc, sb * cc, cb],
    ])
    .rounded()
}

/// X-Y-Z rotation built from yaw (about Z), pitch (about Y) and roll
/// (about X): `Rz(yaw) * Ry(pitch) * Rx(roll)`, rounded.
pub fn euler_xyz(yaw: f64, pitch: f64, roll: f64) -> Matrix {
    let (sy, cy) = yaw.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    let (sr, cr) = roll.sin_cos();

    Matrix::from([
        [cy * cp, cy * sp * sr - sy * cr, cy * sp * cr + sy * sr],
        [sy * cp, sy * sp * sr + cy * cr, sy * sp * cr - cy * sr],
        [-sp, cp * sr, cp * cr],
    ])
    .rounded()
}

/// Elementary rotation about a principal axis.
pub fn axis_rotation(angle: f64, axis: Axis) -> Matrix {
    let (s, c) = angle.sin_cos();
    match axis {
        Axis::X => Matrix::from([[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]]),
        Axis::Y => Matrix::from([[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]]),
        Axis::Z => Matrix::from([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]),
    }
}

/// Rotate `matrix` about `axis` in its own frame (right multiplication).
pub fn rotate_around_axis(matrix: &Matrix, angle: f64, axis: Axis) -> Result<Matrix> {
    matrix_product(matrix, &axis_rotation(angle, axis))
}

/// Recover `(a, b, c)` such that `euler_zxz(a, b, c)` reproduces the
/// rotation block of `rotation` (3x3 or larger). `b` lies in `[0, pi]`.
///
/// When `b` is 0 or pi the first and last rotations share an axis; the
/// whole rotation is then reported in `a` and `c` is 0.
pub fn zxz_angles(rotation: &Matrix) -> Result<(f64, f64, f64)> {
    if rotation.rows() < 3 || rotation.cols() < 3 {
        return Err(KinematicsError::DimensionMismatch(format!(
            "Euler extraction needs at least a 3x3 rotation, got {}x{}",
            rotation.rows(),
            rotation.cols()
        )));
    }

    let r = rotation;
    let sin_b = r[0][2].hypot(r[1][2]);
    let b = sin_b.atan2(r[2][2]);

    let (a, c) = if sin_b > GIMBAL_EPSILON {
        (r[0][2].atan2(-r[1][2]), r[2][0].atan2(r[2][1]))
    } else {
        (r[1][0].atan2(r[0][0]), 0.0)
    };

    Ok((round_default(a), round_default(b), round_default(c)))
}
