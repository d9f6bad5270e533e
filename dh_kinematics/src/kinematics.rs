// Forward and inverse kinematics for six-axis arms with a spherical wrist.
//
// The arm is modeled with standard DH parameters. Joints 1-3 place the wrist
// center, joints 4-6 orient the tool about it, so the inverse problem splits
// into a planar law-of-cosines solve followed by a rotation decomposition.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::sync::Arc;

use crate::dh::{compose_chain, DhParameters};
use crate::diagnostics::DiagnosticSink;
use crate::error::{KinematicsError, Result};
use crate::matrix::{invert, matrix_product, sub_matrix, Matrix};
use crate::pose::{JointAngles, TargetPose};
use crate::precision::round_default;
use crate::robot_config::{RobotConfig, RobotLinks};

/// How far a law-of-cosines argument may stray past ±1 before the target is
/// considered out of reach. Covers rounding noise at full extension.
const ACOS_TOLERANCE: f64 = 1e-9;

/// DH chain for a six-axis arm
///
/// Row | θ        | α    | r  | d
/// ----|----------|------|----|--------
/// 1   | θ1       | 90°  | x0 | a1
/// 2   | θ2 + 90° | 0    | a2 | 0
/// 3   | θ3 − 90° | −90° | 0  | 0
/// 4   | θ4       | 90°  | 0  | a3 + a4
/// 5   | θ5       | −90° | 0  | 0
/// 6   | θ6       | 0    | 0  | a5 + a6
///
/// With all joints at zero the arm points straight up the base Z axis.
#[derive(Clone)]
pub struct ArmKinematics {
    config: RobotConfig,
    links: RobotLinks,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl ArmKinematics {
    /// Create kinematics from a robot configuration
    ///
    /// Fails with [`KinematicsError::MissingConfigField`] if any segment
    /// length is absent.
    pub fn from_config(config: RobotConfig) -> Result<Self> {
        let links = config.links()?;
        Ok(Self {
            config,
            links,
            diagnostics: None,
        })
    }

    /// Report inverse solver intermediates to `sink`.
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Get the robot configuration
    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn links(&self) -> &RobotLinks {
        &self.links
    }

    fn record(&self, stage: &'static str, values: &[f64]) {
        if let Some(sink) = &self.diagnostics {
            sink.record(stage, values);
        }
    }

    // ============================================================================
    // DH Tables
    // ============================================================================

    /// Rows 1-3, shared by the forward chain and the inverse wrist solve.
    fn arm_table(&self, theta1: f64, theta2: f64, theta3: f64) -> [DhParameters; 3] {
        let links = &self.links;
        [
            DhParameters::new(theta1, FRAC_PI_2, links.x0, links.a1),
            DhParameters::new(theta2 + FRAC_PI_2, 0.0, links.a2, 0.0),
            DhParameters::new(theta3 - FRAC_PI_2, -FRAC_PI_2, 0.0, 0.0),
        ]
    }

    /// Full six-row table for the given joint angles.
    pub fn dh_table(&self, joints: &JointAngles) -> [DhParameters; 6] {
        let [t1, t2, t3, t4, t5, t6] = *joints;
        let [row1, row2, row3] = self.arm_table(t1, t2, t3);
        [
            row1,
            row2,
            row3,
            DhParameters::new(t4, FRAC_PI_2, 0.0, self.links.forearm()),
            DhParameters::new(t5, -FRAC_PI_2, 0.0, 0.0),
            DhParameters::new(t6, 0.0, 0.0, self.links.wrist_offset()),
        ]
    }

    // ============================================================================
    // Forward Kinematics
    // ============================================================================

    /// Forward kinematics: tool transform in the base frame.
    ///
    /// # Arguments
    /// * `joints` - Joint angles in radians [θ1, θ2, θ3, θ4, θ5, θ6]
    ///
    /// # Returns
    /// * 4x4 homogeneous transform, every cell rounded
    pub fn forward_kinematics(&self, joints: &JointAngles) -> Result<Matrix> {
        let chain = compose_chain(&self.dh_table(joints))?;
        Ok(chain.cumulative)
    }

    /// Forward kinematics expressed as position plus Z-X-Z angles.
    pub fn forward_pose(&self, joints: &JointAngles) -> Result<TargetPose> {
        TargetPose::from_transform(&self.forward_kinematics(joints)?)
    }

    // ============================================================================
    // Inverse Kinematics
    // ============================================================================

    /// Inverse kinematics: joint angles that place the tool at `pose`.
    ///
    /// Returns a single solution (elbow up). With `flip` set in the
    /// configuration the alternate wrist solution is returned whenever
    /// θ4 would exceed 90°.
    ///
    /// # Errors
    /// * [`KinematicsError::UnreachablePose`] when the wrist center lies
    ///   outside the annulus reachable by the upper arm and forearm
    /// * [`KinematicsError::SingularMatrix`] if the arm rotation cannot be
    ///   inverted
    pub fn inverse_kinematics(&self, pose: &TargetPose) -> Result<JointAngles> {
        // Step 1: tool orientation
        let r0_6 = pose.rotation();
        self.record("r0_6", &flatten(&r0_6));

        // Step 2: wrist center, backed off along the tool Z axis
        let reach = Matrix::from([[0.0], [0.0], [self.links.wrist_offset()]]);
        let offset = matrix_product(&r0_6, &reach)?;
        let wrist = [
            pose.x - offset[0][0],
            pose.y - offset[1][0],
            pose.z - offset[2][0],
        ];
        self.record("wrist_center", &wrist);

        // Step 3: joints 1-3 position the wrist center
        let [theta1, theta2, theta3] = self.solve_arm(wrist)?;
        self.record("joints_1_3", &[theta1, theta2, theta3]);

        // Step 4: orientation left over for the wrist, R3_6 = R0_3^-1 · R0_6
        let arm = compose_chain(&self.arm_table(theta1, theta2, theta3))?;
        let r0_3 = sub_matrix(&arm.cumulative, 3, 3)?;
        let r3_6 = matrix_product(&invert(&r0_3)?, &r0_6)?;
        self.record("r3_6", &flatten(&r3_6));

        // Step 5: joints 4-6
        let (theta4, theta5, theta6) = wrist_angles(&r3_6);
        let (theta4, theta5, theta6) = if self.config.flip {
            flip_wrist(theta4, theta5, theta6)
        } else {
            (theta4, theta5, theta6)
        };
        self.record("joints_4_6", &[theta4, theta5, theta6]);

        Ok([theta1, theta2, theta3, theta4, theta5, theta6].map(round_default))
    }

    /// Joints 1-3 for a wrist center given in the base frame.
    ///
    /// The shoulder-to-wrist distance `r3` closes a triangle with the upper
    /// arm `a2` and the forearm `a3 + a4`; θ2 and θ3 follow from its angles.
    ///
    /// The θ2 adjustment is added to the already rounded θ2, so a θ2 within
    /// 5e-7 of zero rounds to 0 and is pushed in the positive direction.
    fn solve_arm(&self, wrist: [f64; 3]) -> Result<[f64; 3]> {
        let [x, y, z] = wrist;
        let a2 = self.links.a2;
        let forearm = self.links.forearm();

        let theta1 = (y - self.links.y0).atan2(x);

        let r1 = x.hypot(y) - self.links.x0;
        let r2 = z - self.links.a1;
        let p2 = r1.atan2(r2);
        let r3 = r1.hypot(r2);

        let p1 = checked_acos(
            (forearm.powi(2) - a2.powi(2) - r3.powi(2)) / (-2.0 * a2 * r3),
            "shoulder",
        )?;
        let p3 = checked_acos(
            (r3.powi(2) - a2.powi(2) - forearm.powi(2)) / (-2.0 * a2 * forearm),
            "elbow",
        )?;

        let mut theta2 = round_default(-(p2 - p1));
        let theta3 = -(PI - p3);

        let adjustment = self.config.theta2_adjustment();
        if adjustment != 0.0 {
            theta2 += if theta2 < 0.0 { -adjustment } else { adjustment };
        }

        Ok([theta1, theta2, theta3].map(round_default))
    }
}

impl fmt::Debug for ArmKinematics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArmKinematics")
            .field("config", &self.config)
            .field("links", &self.links)
            .field("diagnostics", &self.diagnostics.is_some())
            .finish()
    }
}

/// `acos` that rejects arguments outside the domain instead of yielding NaN.
fn checked_acos(value: f64, joint: &str) -> Result<f64> {
    if value.is_nan() || value.abs() > 1.0 + ACOS_TOLERANCE {
        tracing::debug!(joint, value, "law of cosines out of domain");
        return Err(KinematicsError::UnreachablePose(format!(
            "{} angle has no solution (cosine {})",
            joint, value
        )));
    }
    Ok(value.clamp(-1.0, 1.0).acos())
}

/// θ4, θ5, θ6 from the wrist rotation R3_6, each rounded.
fn wrist_angles(r3_6: &Matrix) -> (f64, f64, f64) {
    let theta4 = r3_6[1][2].atan2(r3_6[0][2]);
    let theta5 = -r3_6[0][2].hypot(r3_6[1][2]).atan2(r3_6[2][2]);
    let theta6 = (-r3_6[2][1]).atan2(r3_6[2][0]);
    (round_default(theta4), round_default(theta5), round_default(theta6))
}

/// Switch to the alternate wrist solution when |θ4| > 90°.
fn flip_wrist(theta4: f64, theta5: f64, theta6: f64) -> (f64, f64, f64) {
    if theta4.abs() <= FRAC_PI_2 {
        return (theta4, theta5, theta6);
    }

    let diff4 = PI - theta4.abs();
    let diff6 = PI - theta6.abs();

    let theta4 = if theta4 < 0.0 { diff4 } else { -diff4 };
    let theta5 = -theta5;
    let mut theta6 = theta6;

    if diff4 < FRAC_PI_2 && diff4.abs() > f64::EPSILON {
        theta6 = if theta6 < 0.0 { diff6 } else { -diff6 };
    }

    if (theta6 - PI).abs() < f64::EPSILON || (theta6 + PI).abs() < f64::EPSILON {
        theta6 = 0.0;
    }

    (theta4, theta5, theta6)
}

fn flatten(m: &Matrix) -> Vec<f64> {
    m.row_slices().flatten().copied().collect()
}
