//! Conversions between engine types and nalgebra geometric types.
//!
//! Only compiled with the `nalgebra-support` feature:
//!
//! ```toml
//! [dependencies]
//! dh_kinematics = { version = "0.1", features = ["nalgebra-support"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use dh_kinematics::{forward_kinematics, RobotConfig};
//! use nalgebra::Isometry3;
//!
//! let config = RobotConfig::new(2.5, 3.0, 2.5, 2.5, 2.5, 2.0);
//! let transform = forward_kinematics([0.0; 6], &config)?;
//! let iso: Isometry3<f64> = transform.to_isometry()?;
//! ```
//!
//! Values crossing into nalgebra are not rounded; values coming back are.

use nalgebra::{Isometry3, Matrix3, Matrix4, Rotation3, Translation3, UnitQuaternion};

use crate::error::{KinematicsError, Result};
use crate::matrix::Matrix;
use crate::pose::TargetPose;

impl Matrix {
    /// 4x4 homogeneous transform as an nalgebra matrix.
    pub fn to_matrix4(&self) -> Result<Matrix4<f64>> {
        self.require_shape(4, 4)?;
        Ok(Matrix4::from_fn(|r, c| self[r][c]))
    }

    /// 3x3 block as an nalgebra matrix.
    pub fn to_matrix3(&self) -> Result<Matrix3<f64>> {
        self.require_shape(3, 3)?;
        Ok(Matrix3::from_fn(|r, c| self[r][c]))
    }

    /// Rigid transform from the rotation block and translation column.
    ///
    /// The rotation block is assumed orthonormal.
    pub fn to_isometry(&self) -> Result<Isometry3<f64>> {
        self.require_shape(3, 4)?;
        let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_fn(|r, c| self[r][c]));
        let translation = Translation3::new(self[0][3], self[1][3], self[2][3]);
        Ok(Isometry3::from_parts(
            translation,
            UnitQuaternion::from_rotation_matrix(&rotation),
        ))
    }

    fn require_shape(&self, rows: usize, cols: usize) -> Result<()> {
        if self.rows() < rows || self.cols() < cols {
            return Err(KinematicsError::DimensionMismatch(format!(
                "expected at least {}x{}, got {}x{}",
                rows,
                cols,
                self.rows(),
                self.cols()
            )));
        }
        Ok(())
    }
}

impl From<Matrix4<f64>> for Matrix {
    fn from(m: Matrix4<f64>) -> Self {
        Matrix::from([
            [m[(0, 0)], m[(0, 1)], m[(0, 2)], m[(0, 3)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)], m[(1, 3)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)], m[(2, 3)]],
            [m[(3, 0)], m[(3, 1)], m[(3, 2)], m[(3, 3)]],
        ])
        .rounded()
    }
}

impl From<Matrix3<f64>> for Matrix {
    fn from(m: Matrix3<f64>) -> Self {
        Matrix::from([
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ])
        .rounded()
    }
}

/// Position becomes the translation; the Z-X-Z angles become the rotation.
impl From<TargetPose> for Isometry3<f64> {
    fn from(pose: TargetPose) -> Self {
        let r = pose.rotation();
        let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_fn(|i, j| r[i][j]));
        Isometry3::from_parts(
            Translation3::new(pose.x, pose.y, pose.z),
            UnitQuaternion::from_rotation_matrix(&rotation),
        )
    }
}

impl TryFrom<Isometry3<f64>> for TargetPose {
    type Error = KinematicsError;

    fn try_from(iso: Isometry3<f64>) -> Result<Self> {
        TargetPose::from_transform(&Matrix::from(iso.to_homogeneous()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix4_round_trip() {
        let m = Matrix::from([
            [0.0, -1.0, 0.0, 1.5],
            [1.0, 0.0, 0.0, -2.0],
            [0.0, 0.0, 1.0, 3.25],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let nm = m.to_matrix4().unwrap();
        assert_eq!(nm[(1, 3)], -2.0);
        assert_eq!(Matrix::from(nm), m);
    }

    #[test]
    fn test_matrix3_requires_shape() {
        assert!(Matrix::identity(2).to_matrix3().is_err());
        assert_eq!(Matrix::from(Matrix::identity(3).to_matrix3().unwrap()), Matrix::identity(3));
    }

    #[test]
    fn test_pose_to_isometry_and_back() {
        let pose = TargetPose::new(4.0, 1.5, 8.0, 0.3, 0.6, -0.2);
        let iso: Isometry3<f64> = pose.into();
        assert!((iso.translation.vector.x - 4.0).abs() < 1e-12);
        assert!((iso.translation.vector.z - 8.0).abs() < 1e-12);

        let back = TargetPose::try_from(iso).unwrap();
        assert!((back.x - pose.x).abs() < 1e-6);
        assert!((back.r1 - pose.r1).abs() < 1e-5);
        assert!((back.r2 - pose.r2).abs() < 1e-5);
        assert!((back.r3 - pose.r3).abs() < 1e-5);
    }

    #[test]
    fn test_transform_to_isometry() {
        let m = Matrix::from([
            [1.0, 0.0, 0.0, 5.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 10.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let iso = m.to_isometry().unwrap();
        assert!((iso.rotation.angle()).abs() < 1e-12);
        assert!((iso.translation.vector.x - 5.0).abs() < 1e-12);
    }
}
