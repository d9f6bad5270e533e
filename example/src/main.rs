// Runs a kinematics job described in JSON and prints the result as JSON.
// Run with: cargo run -p example -- jobs/reference_inverse.json
// Reads the job from stdin when no path is given.
// Set RUST_LOG=debug to see the inverse solver stages.

use std::io::Read;
use std::sync::Arc;

use dh_kinematics::{ArmKinematics, JointAngles, Matrix, RobotConfig, TargetPose, TracingSink};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

#[derive(Debug, Deserialize)]
struct JobFile {
    config: RobotConfig,
    job: Job,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Job {
    Forward { joints: JointAngles },
    Inverse { pose: TargetPose },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum JobOutput {
    Forward { transform: Matrix, pose: TargetPose },
    Inverse { joints: JointAngles },
    Error { code: u8, message: String },
}

fn read_input() -> std::io::Result<String> {
    match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn run(file: JobFile) -> JobOutput {
    let result = ArmKinematics::from_config(file.config).and_then(|kin| {
        let kin = kin.with_diagnostics(Arc::new(TracingSink));
        match file.job {
            Job::Forward { joints } => {
                info!(?joints, "forward kinematics");
                let transform = kin.forward_kinematics(&joints)?;
                let pose = TargetPose::from_transform(&transform)?;
                Ok(JobOutput::Forward { transform, pose })
            }
            Job::Inverse { pose } => {
                info!(?pose, "inverse kinematics");
                let joints = kin.inverse_kinematics(&pose)?;
                Ok(JobOutput::Inverse { joints })
            }
        }
    });

    result.unwrap_or_else(|e| {
        error!("job failed: {}", e);
        JobOutput::Error {
            code: e.code().into(),
            message: e.to_string(),
        }
    })
}

fn main() {
    tracing_subscriber::fmt::init();

    let input = match read_input() {
        Ok(input) => input,
        Err(e) => {
            error!("Failed to read job: {}", e);
            std::process::exit(2);
        }
    };

    let file: JobFile = match serde_json::from_str(&input) {
        Ok(file) => file,
        Err(e) => {
            error!("Invalid job file: {}", e);
            std::process::exit(2);
        }
    };

    let output = run(file);
    let failed = matches!(output, JobOutput::Error { .. });

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Failed to encode result: {}", e);
            std::process::exit(2);
        }
    }

    if failed {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_job() {
        let file: JobFile = serde_json::from_str(include_str!("../jobs/reference_inverse.json")).unwrap();
        match run(file) {
            JobOutput::Inverse { joints } => assert_eq!(joints[2], -1.570796),
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_forward_job() {
        let file: JobFile = serde_json::from_str(include_str!("../jobs/reference_forward.json")).unwrap();
        match run(file) {
            JobOutput::Forward { transform, pose } => {
                assert_eq!(transform[2][3], 15.0);
                assert_eq!(pose.z, 15.0);
            }
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_failed_job_reports_code() {
        let file: JobFile = serde_json::from_str(
            r#"{"config": {"v1": 1}, "job": {"forward": {"joints": [0, 0, 0, 0, 0, 0]}}}"#,
        )
        .unwrap();
        match run(file) {
            JobOutput::Error { code, message } => {
                assert_eq!(code, 5);
                assert!(message.contains("v2"));
            }
            other => panic!("unexpected output {:?}", other),
        }
    }
}
