use std::error::Error;
use std::fmt;
use int_enum::IntEnum;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// The DH table handed to the chain composer had no rows.
    EmptyTable,
    /// Matrix shapes are incompatible for the requested operation.
    DimensionMismatch(String),
    /// The determinant rounded to zero during inversion.
    SingularMatrix,
    /// A law-of-cosines argument fell outside [-1, 1]; the target lies outside the workspace.
    UnreachablePose(String),
    /// A required robot configuration field is absent. Carries the field name.
    MissingConfigField(String),
    /// Division by a zero pivot during substitution. Indicates a corrupted decomposition.
    Arithmetic(String),
}

impl Error for KinematicsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            KinematicsError::EmptyTable => write!(f, "Invalid DH table: the table must contain at least one row"),
            KinematicsError::DimensionMismatch(ref msg) => write!(f, "Dimension mismatch: {}", msg),
            KinematicsError::SingularMatrix => write!(f, "Matrix is singular and cannot be inverted"),
            KinematicsError::UnreachablePose(ref msg) => write!(f, "Unreachable pose: {}", msg),
            KinematicsError::MissingConfigField(ref field) => write!(f, "Robot configuration is missing required field `{}`", field),
            KinematicsError::Arithmetic(ref msg) => write!(f, "Arithmetic error: {}", msg),
        }
    }
}

impl KinematicsError {
    /// Stable numeric code for this error kind.
    pub fn code(&self) -> ErrorCode {
        match self {
            KinematicsError::EmptyTable => ErrorCode::EmptyTable,
            KinematicsError::DimensionMismatch(_) => ErrorCode::DimensionMismatch,
            KinematicsError::SingularMatrix => ErrorCode::SingularMatrix,
            KinematicsError::UnreachablePose(_) => ErrorCode::UnreachablePose,
            KinematicsError::MissingConfigField(_) => ErrorCode::MissingConfigField,
            KinematicsError::Arithmetic(_) => ErrorCode::Arithmetic,
        }
    }
}

/// Numeric error codes, suitable for wire formats that cannot carry the
/// full error enum.
#[repr(u8)]
#[derive(Debug, Serialize, Deserialize, IntEnum, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    EmptyTable = 1,
    DimensionMismatch = 2,
    SingularMatrix = 3,
    UnreachablePose = 4,
    MissingConfigField = 5,
    Arithmetic = 6,
}

impl ErrorCode {
    pub fn message(&self) -> &str {
        match self {
            ErrorCode::EmptyTable => "Empty DH table.",
            ErrorCode::DimensionMismatch => "Incompatible matrix dimensions.",
            ErrorCode::SingularMatrix => "Singular matrix.",
            ErrorCode::UnreachablePose => "Target pose outside the reachable workspace.",
            ErrorCode::MissingConfigField => "Missing robot configuration field.",
            ErrorCode::Arithmetic => "Division by zero pivot.",
        }
    }
}

pub type Result<T> = std::result::Result<T, KinematicsError>;
