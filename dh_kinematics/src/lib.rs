//! Forward and inverse kinematics for six-axis serial arms described by
//! Denavit-Hartenberg parameters, together with the small dense linear
//! algebra kernel the solvers are built on.
//!
//! All numeric output is rounded to six decimal places (half away from
//! zero) and never carries a negative zero; see [`precision`].
//!
//! ```rust
//! use dh_kinematics::{forward_kinematics, inverse_kinematics, RobotConfig, TargetPose};
//!
//! let config = RobotConfig::new(2.5, 3.0, 2.5, 2.5, 2.5, 2.0);
//! let transform = forward_kinematics([0.0; 6], &config).unwrap();
//! assert_eq!(transform[2][3], 15.0);
//!
//! let joints = inverse_kinematics(TargetPose::new(5.0, 0.0, 10.0, 0.0, 0.0, 0.0), &config).unwrap();
//! assert_eq!(joints[2], -1.570796);
//! ```

pub mod error;
pub use error::*;

pub mod precision;
pub mod matrix;
pub mod rotation;
pub mod dh;
pub mod robot_config;
pub mod pose;
pub mod diagnostics;
pub mod kinematics;

#[cfg(feature = "nalgebra-support")]
pub mod transforms;

pub use dh::{build_transform, compose_chain, ChainTransforms, DhParameters};
pub use diagnostics::{DiagnosticSink, RecordingSink, TracingSink};
pub use kinematics::ArmKinematics;
pub use matrix::{
    create_matrix, create_vector, determinant, invert, matrix_product, solve_linear, sub_matrix,
    transpose, LuDecomposition, Matrix,
};
pub use pose::{JointAngles, TargetPose};
pub use robot_config::{AngleAdjustments, RobotConfig, RobotLinks};
pub use rotation::{euler_xyz, euler_zxz, rotate_around_axis, zxz_angles, Axis};

/// Tool transform for `joints` on the arm described by `config`.
pub fn forward_kinematics(joints: JointAngles, config: &RobotConfig) -> Result<Matrix> {
    ArmKinematics::from_config(config.clone())?.forward_kinematics(&joints)
}

/// Joint angles placing the tool at `pose` on the arm described by `config`.
pub fn inverse_kinematics(pose: TargetPose, config: &RobotConfig) -> Result<JointAngles> {
    ArmKinematics::from_config(config.clone())?.inverse_kinematics(&pose)
}
