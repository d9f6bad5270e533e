use std::f64::consts::{FRAC_PI_2, PI};

use dh_kinematics::precision::round_default;
use dh_kinematics::{
    forward_kinematics, inverse_kinematics, invert, matrix_product, ArmKinematics, KinematicsError,
    Matrix, RobotConfig, TargetPose,
};

fn reference_arm() -> RobotConfig {
    RobotConfig::new(2.5, 3.0, 2.5, 2.5, 2.5, 2.0)
}

#[test]
fn test_straight_up_arm() {
    let transform = forward_kinematics([0.0; 6], &reference_arm()).unwrap();

    assert_eq!(transform[0], [1.0, 0.0, 0.0, 0.0]);
    assert_eq!(transform[1], [0.0, 1.0, 0.0, 0.0]);
    assert_eq!(transform[2], [0.0, 0.0, 1.0, 15.0]);
    assert_eq!(transform[3], [0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_inverse_of_reference_pose() {
    let pose = TargetPose::new(5.0, 0.0, 10.0, 0.0, 0.0, 0.0);

    let joints = inverse_kinematics(pose, &reference_arm()).unwrap();
    assert_eq!(
        joints,
        [0.0, 0.0, -1.570796, 3.141593, -1.570796, 0.0]
    );

    let flipped = inverse_kinematics(pose, &reference_arm().with_flip(true)).unwrap();
    assert_eq!(flipped, [0.0, 0.0, -1.570796, 0.0, 1.570796, 0.0]);
}

#[test]
fn test_flipped_solution_round_trips_through_forward() {
    let config = reference_arm().with_flip(true);
    let joints = [0.0, 0.0, -FRAC_PI_2, 0.0, FRAC_PI_2, 0.0];

    let transform = forward_kinematics(joints, &config).unwrap();
    let pose = TargetPose::from_transform(&transform).unwrap();
    assert_eq!(pose, TargetPose::new(5.0, 0.0, 10.0, 0.0, 0.0, 0.0));

    let solved = inverse_kinematics(pose, &config).unwrap();
    assert_eq!(solved, joints.map(round_default));
}

#[test]
fn test_offsets_shift_the_shoulder() {
    let config = reference_arm().with_offsets(0.5, 0.0).with_base(1.0);
    let transform = forward_kinematics([0.0; 6], &config).unwrap();

    assert_eq!(transform[0][3], 0.5);
    assert_eq!(transform[2][3], 16.0);

    let pose = TargetPose::from_transform(&transform).unwrap();
    let joints = inverse_kinematics(pose, &config).unwrap();
    let reached = forward_kinematics(joints, &config).unwrap();
    for axis in 0..3 {
        assert!((reached[axis][3] - transform[axis][3]).abs() < 1e-3);
    }
}

#[test]
fn test_unreachable_pose() {
    let err = inverse_kinematics(TargetPose::new(0.0, 40.0, 2.0, 0.0, 0.0, 0.0), &reference_arm())
        .unwrap_err();
    assert!(matches!(err, KinematicsError::UnreachablePose(_)));
    assert_eq!(u8::from(err.code()), 4);
}

#[test]
fn test_missing_segment() {
    let config: RobotConfig = serde_json::from_str(r#"{"v1": 1, "v2": 1, "v3": 1, "v4": 1}"#).unwrap();
    let err = forward_kinematics([0.0; 6], &config).unwrap_err();
    assert_eq!(err, KinematicsError::MissingConfigField("v5".to_string()));
}

#[test]
fn test_arm_rotation_inverts_to_transpose() {
    let kin = ArmKinematics::from_config(reference_arm()).unwrap();
    let transform = kin
        .forward_kinematics(&[0.4, -0.3, -1.2, 0.7, 0.5, -0.9])
        .unwrap();
    let rotation = dh_kinematics::sub_matrix(&transform, 3, 3).unwrap();

    let inverse = invert(&rotation).unwrap();
    let product = matrix_product(&inverse, &rotation).unwrap();
    let identity = Matrix::identity(3);
    for i in 0..3 {
        for j in 0..3 {
            assert!((product[i][j] - identity[i][j]).abs() < 1e-4);
            assert!((inverse[i][j] - rotation[j][i]).abs() < 1e-4);
        }
    }
}

#[test]
fn test_shared_solver_across_threads() {
    let kin = std::sync::Arc::new(ArmKinematics::from_config(reference_arm()).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let kin = kin.clone();
            std::thread::spawn(move || {
                let angle = i as f64 * PI / 8.0;
                kin.forward_kinematics(&[angle, 0.0, -FRAC_PI_2, 0.0, FRAC_PI_2, 0.0])
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let transform = handle.join().unwrap().unwrap();
        let angle = i as f64 * PI / 8.0;
        assert!((transform[0][3] - 5.0 * angle.cos()).abs() < 1e-5);
        assert!((transform[1][3] - 5.0 * angle.sin()).abs() < 1e-5);
    }
}
