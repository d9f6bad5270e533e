use serde::{Deserialize, Serialize};

use crate::error::{KinematicsError, Result};
use crate::matrix::Matrix;
use crate::rotation::{euler_zxz, zxz_angles};

/// Joint angles θ1..θ6 in radians.
pub type JointAngles = [f64; 6];

/// Tool position and Z-X-Z Euler orientation in the base frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TargetPose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub r1: f64,
    pub r2: f64,
    pub r3: f64,
}

impl TargetPose {
    pub const fn new(x: f64, y: f64, z: f64, r1: f64, r2: f64, r3: f64) -> Self {
        Self { x, y, z, r1, r2, r3 }
    }

    #[inline]
    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// 3x3 orientation of the tool.
    pub fn rotation(&self) -> Matrix {
        euler_zxz(self.r1, self.r2, self.r3)
    }

    /// Read a pose back from a homogeneous transform (at least 3x4).
    pub fn from_transform(transform: &Matrix) -> Result<Self> {
        if transform.rows() < 3 || transform.cols() < 4 {
            return Err(KinematicsError::DimensionMismatch(format!(
                "a pose needs at least a 3x4 transform, got {}x{}",
                transform.rows(),
                transform.cols()
            )));
        }

        let (r1, r2, r3) = zxz_angles(transform)?;
        Ok(Self {
            x: transform[0][3],
            y: transform[1][3],
            z: transform[2][3],
            r1,
            r2,
            r3,
        })
    }
}
