//! Denavit-Hartenberg link transforms and chain composition.
//!
//! Standard (distal) DH convention. One row per link:
//!
//! Param | Meaning
//! ------|------------------------------------
//! θ     | joint angle about the previous z
//! α     | link twist about the new x
//! r     | link length along the new x
//! d     | link offset along the previous z

use serde::{Deserialize, Serialize};

use crate::error::{KinematicsError, Result};
use crate::matrix::{matrix_product, Matrix};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DhParameters {
    pub theta: f64,
    pub alpha: f64,
    pub r: f64,
    pub d: f64,
}

impl DhParameters {
    pub const fn new(theta: f64, alpha: f64, r: f64, d: f64) -> Self {
        Self { theta, alpha, r, d }
    }
}

/// `[theta, alpha, r, d]`
impl From<[f64; 4]> for DhParameters {
    fn from([theta, alpha, r, d]: [f64; 4]) -> Self {
        Self::new(theta, alpha, r, d)
    }
}

/// Per-link transforms of a chain together with their left-to-right product.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainTransforms {
    pub individual: Vec<Matrix>,
    pub cumulative: Matrix,
}

/// 4x4 homogeneous transform for one DH row, every cell rounded.
///
/// ```text
/// [ cosθ  -sinθ·cosα   sinθ·sinα   r·cosθ ]
/// [ sinθ   cosθ·cosα  -cosθ·sinα   r·sinθ ]
/// [ 0      sinα        cosα        d      ]
/// [ 0      0           0           1      ]
/// ```
pub fn build_transform(params: &DhParameters) -> Matrix {
    let (st, ct) = params.theta.sin_cos();
    let (sa, ca) = params.alpha.sin_cos();

    Matrix::from([
        [ct, -st * ca, st * sa, params.r * ct],
        [st, ct * ca, -ct * sa, params.r * st],
        [0.0, sa, ca, params.d],
        [0.0, 0.0, 0.0, 1.0],
    ])
    .rounded()
}

/// Build every link transform and multiply them in table order.
pub fn compose_chain(table: &[DhParameters]) -> Result<ChainTransforms> {
    let (first, rest) = table.split_first().ok_or(KinematicsError::EmptyTable)?;

    let mut individual = Vec::with_capacity(table.len());
    individual.push(build_transform(first));
    let mut cumulative = individual[0].clone();

    for params in rest {
        let transform = build_transform(params);
        cumulative = matrix_product(&cumulative, &transform)?;
        individual.push(transform);
    }

    Ok(ChainTransforms { individual, cumulative })
}
