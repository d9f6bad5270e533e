//! Optional tracing of solver intermediates.
//!
//! A sink is handed to [`ArmKinematics`](crate::ArmKinematics) explicitly;
//! nothing is recorded unless one is installed.

use std::sync::Mutex;

/// Receives named intermediate values from the inverse solver.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, stage: &'static str, values: &[f64]);
}

/// Forwards every record to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, stage: &'static str, values: &[f64]) {
        tracing::debug!(target: "dh_kinematics::ik", stage, ?values);
    }
}

/// Keeps records in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<(&'static str, Vec<f64>)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<(&'static str, Vec<f64>)> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn stages(&self) -> Vec<&'static str> {
        self.records().into_iter().map(|(stage, _)| stage).collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, stage: &'static str, values: &[f64]) {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push((stage, values.to_vec()));
    }
}
