/// Robot configuration for six-axis arms with a spherical wrist
///
/// A configuration lists the six segment lengths `v1..v6` of the arm as
/// measured along its zero pose, plus optional mounting offsets. Every
/// field may be absent in serialized form; kinematics calls resolve the
/// configuration into [`RobotLinks`] and report the first missing segment.
///
/// Segment | Role
/// --------|-----------------------------------------------
/// v1      | base to shoulder (height of joint 2)
/// v2      | upper arm (joint 2 to joint 3)
/// v3, v4  | forearm, joint 3 to wrist center
/// v5, v6  | wrist center to tool flange

use serde::{Deserialize, Serialize};

use crate::error::{KinematicsError, Result};

/// Fixed angular corrections applied by the inverse solver, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngleAdjustments {
    /// Added to joint 2 away from zero (subtracted when joint 2 is negative).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t1: Option<f64>,
}

/// Robot configuration with segment lengths and mounting offsets
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    // Segment lengths
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v3: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v4: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v5: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v6: Option<f64>,

    /// Height of the mounting plate, added to `v1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,

    /// Horizontal offset of joint 2 from the base axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x0: Option<f64>,

    /// Lateral offset of the base along Y.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y0: Option<f64>,

    /// Prefer the alternate wrist solution when joint 4 exceeds 90°.
    pub flip: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustments: Option<AngleAdjustments>,
}

/// Resolved link lengths used by the solvers.
///
/// `a1` already includes the base offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotLinks {
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
    pub a4: f64,
    pub a5: f64,
    pub a6: f64,
    pub x0: f64,
    pub y0: f64,
}

impl RobotLinks {
    /// Joint 3 to wrist center.
    #[inline]
    pub fn forearm(&self) -> f64 {
        self.a3 + self.a4
    }

    /// Wrist center to tool flange.
    #[inline]
    pub fn wrist_offset(&self) -> f64 {
        self.a5 + self.a6
    }
}

impl RobotConfig {
    /// Configuration with all six segments set and no offsets.
    pub fn new(v1: f64, v2: f64, v3: f64, v4: f64, v5: f64, v6: f64) -> Self {
        Self {
            v1: Some(v1),
            v2: Some(v2),
            v3: Some(v3),
            v4: Some(v4),
            v5: Some(v5),
            v6: Some(v6),
            ..Self::default()
        }
    }

    pub fn with_base(mut self, base: f64) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_offsets(mut self, x0: f64, y0: f64) -> Self {
        self.x0 = Some(x0);
        self.y0 = Some(y0);
        self
    }

    pub fn with_flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    pub fn with_adjustments(mut self, adjustments: AngleAdjustments) -> Self {
        self.adjustments = Some(adjustments);
        self
    }

    /// Joint 2 correction in radians, zero when none is configured.
    pub fn theta2_adjustment(&self) -> f64 {
        self.adjustments
            .and_then(|adjustments| adjustments.t1)
            .map_or(0.0, f64::to_radians)
    }

    /// Resolve into link lengths, failing on the first missing segment.
    pub fn links(&self) -> Result<RobotLinks> {
        let base = self.base.unwrap_or(0.0);
        Ok(RobotLinks {
            a1: require(self.v1, "v1")? + base,
            a2: require(self.v2, "v2")?,
            a3: require(self.v3, "v3")?,
            a4: require(self.v4, "v4")?,
            a5: require(self.v5, "v5")?,
            a6: require(self.v6, "v6")?,
            x0: self.x0.unwrap_or(0.0),
            y0: self.y0.unwrap_or(0.0),
        })
    }
}

fn require(value: Option<f64>, field: &str) -> Result<f64> {
    value.ok_or_else(|| KinematicsError::MissingConfigField(field.to_string()))
}
