//! Integration tests for the transform kernel
//!
//! These check the round-trip and identity properties that hold across
//! Mat4, Quat and OrthonormalBasis:
//! 1. Matrix -> quaternion -> matrix reproduces rotations
//! 2. Composition identities for matrices and quaternions
//! 3. Degenerate inputs are reported, not silently patched

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::PI;
use xform_math::{Mat4, OrthonormalBasis, Quat, TransformError, Vec3, Vec4};

const SEED: u64 = 0x5eed_0f_7a;
const SAMPLES: usize = 200;

fn random_quat(rng: &mut StdRng) -> Quat {
    let axis = Vec3::random(rng);
    let angle = rng.random_range(-PI..PI);
    Quat::from_axis_angle(angle, axis)
}

fn random_matrix(rng: &mut StdRng) -> Mat4 {
    Mat4::from_components(core::array::from_fn(|_| rng.random_range(-4.0..4.0)))
}

fn assert_mat_close(a: &Mat4, b: &Mat4, tolerance: f32) {
    for i in 0..16 {
        assert!(
            (a[i] - b[i]).abs() <= tolerance,
            "index {}: {} vs {}\n{:?}\n{:?}",
            i,
            a[i],
            b[i],
            a,
            b
        );
    }
}

// ==================== Rotation round trips ====================

#[test]
fn test_matrix_quat_round_trip() {
    let mut rng = StdRng::seed_from_u64(SEED);
    for _ in 0..SAMPLES {
        let m = random_quat(&mut rng).to_mat4();
        let back = Quat::from_mat4(&m).to_mat4();
        assert_mat_close(&back, &m, 1e-5);
    }
}

#[test]
fn test_matrix_quat_round_trip_half_turns() {
    // Near 180 degrees the trace is about -1 and the diagonal pivots matter
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    for _ in 0..SAMPLES {
        let axis = Vec3::random(&mut rng);
        let angle = PI - rng.random_range(0.0..0.01);
        let m = Mat4::from_rotation(angle, axis).unwrap();
        let q = Quat::from_mat4(&m);
        assert!(q.check_finite().is_ok(), "{:?} from {:?}", q, m);
        assert_mat_close(&q.to_mat4(), &m, 1e-5);
    }
}

#[test]
fn test_basis_quat_matrix_agree() {
    let mut rng = StdRng::seed_from_u64(SEED + 2);
    for _ in 0..SAMPLES {
        let m = random_quat(&mut rng).to_mat4();
        let b = m.rotation_block();
        let basis = OrthonormalBasis::new(
            Vec3::new(b[0], b[1], b[2]),
            Vec3::new(b[3], b[4], b[5]),
            Vec3::new(b[6], b[7], b[8]),
        );
        assert_mat_close(&basis.to_mat4(), &m, 1e-6);

        let mut q = Quat::IDENTITY;
        q.set_axes(basis.u, basis.v, basis.w);
        assert_mat_close(&q.to_mat4(), &m, 1e-5);
    }
}

#[test]
fn test_direction_quat_is_unit() {
    let mut rng = StdRng::seed_from_u64(SEED + 3);
    for _ in 0..SAMPLES {
        let dir = Vec3::random(&mut rng);
        if dir.cross(Vec3::Y).length() < 0.01 {
            continue;
        }
        let q = Quat::from_direction(dir, None);
        assert!((q.length() - 1.0).abs() < 1e-5, "{:?}", q);
    }
}

// ==================== Algebraic identities ====================

#[test]
fn test_quat_times_inverse_is_identity() {
    let mut rng = StdRng::seed_from_u64(SEED + 4);
    for _ in 0..SAMPLES {
        let q = random_quat(&mut rng);
        let mut inv = q.copy();
        inv.invert();

        let mut product = q.copy();
        product.multiply(&inv).normalize();

        assert!(product.x.abs() < 1e-5);
        assert!(product.y.abs() < 1e-5);
        assert!(product.z.abs() < 1e-5);
        assert!((product.w - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_identity_multiply_is_exact() {
    let mut rng = StdRng::seed_from_u64(SEED + 5);
    for _ in 0..SAMPLES {
        let x = random_matrix(&mut rng);
        let mut m = Mat4::identity();
        m.multiply(&x);
        assert_eq!(m, x);
    }
}

#[test]
fn test_double_inversion() {
    let mut rng = StdRng::seed_from_u64(SEED + 6);
    for _ in 0..SAMPLES {
        // Diagonally dominant, so well conditioned
        let mut original = random_matrix(&mut rng);
        for i in [0, 5, 10, 15] {
            original[i] += 16.0;
        }
        let mut m = original.copy();
        m.invert().unwrap();
        m.invert().unwrap();
        assert_mat_close(&m, &original, 1e-3);
    }
}

#[test]
fn test_invert_zero_matrix_is_singular() {
    let mut m = Mat4::ZERO;
    assert_eq!(m.invert().unwrap_err(), TransformError::Singular);
}

#[test]
fn test_rigid_inverse_undoes_transform() {
    let mut m = Mat4::identity();
    m.translate(Vec3::new(3.0, -1.0, 2.0))
        .rotate(0.8, Vec3::new(1.0, 1.0, 0.0))
        .unwrap()
        .scale(Vec3::new(2.0, 2.0, 2.0));

    let mut inv = m.copy();
    inv.invert().unwrap();

    let p = Vec4::new(0.5, -0.25, 4.0, 1.0);
    let back = p.transformed(&m).transformed(&inv);
    assert!((back.x - p.x).abs() < 1e-4);
    assert!((back.y - p.y).abs() < 1e-4);
    assert!((back.z - p.z).abs() < 1e-4);
    assert!((back.w - 1.0).abs() < 1e-4);
}

// ==================== Interpolation ====================

#[test]
fn test_slerp_with_itself() {
    let mut rng = StdRng::seed_from_u64(SEED + 7);
    for _ in 0..SAMPLES {
        let q = random_quat(&mut rng);
        let t = rng.random_range(0.0..=1.0);
        let r = q.slerped(&q, t);
        assert!((r.dot(&q) - 1.0).abs() < 1e-5, "t = {}: {:?} vs {:?}", t, r, q);
    }
}

#[test]
fn test_slerp_endpoints() {
    let mut rng = StdRng::seed_from_u64(SEED + 8);
    for _ in 0..SAMPLES {
        let a = random_quat(&mut rng);
        let mut b = random_quat(&mut rng);
        // Keep both in the same hemisphere so t = 1 lands on b itself
        if a.dot(&b) < 0.0 {
            b = Quat::new(-b.x, -b.y, -b.z, -b.w);
        }

        let start = a.slerped(&b, 0.0);
        let end = a.slerped(&b, 1.0);
        assert!((start.dot(&a) - 1.0).abs() < 1e-5);
        assert!((end.dot(&b) - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_slerp_stays_unit() {
    let mut rng = StdRng::seed_from_u64(SEED + 9);
    for _ in 0..SAMPLES {
        let a = random_quat(&mut rng);
        let b = random_quat(&mut rng);
        let t = rng.random_range(0.0..=1.0);
        let r = a.slerped(&b, t);
        assert!((r.length() - 1.0).abs() < 1e-4, "{:?}", r);
    }
}

// ==================== Degenerate inputs ====================

#[test]
fn test_zero_axis_rotation_is_rejected() {
    let mut rng = StdRng::seed_from_u64(SEED + 10);
    let original = random_matrix(&mut rng);
    let mut m = original.copy();
    let err = m.set_rotation(1.0, Vec3::new(0.0, 0.0, 0.0)).unwrap_err();
    assert!(matches!(err, TransformError::DegenerateAxis { .. }));
    assert_eq!(m, original);
}

#[test]
fn test_look_at_coincident_points() {
    let m = Mat4::look_at(Vec3::ZERO, Vec3::ZERO, Vec3::Y);
    assert_eq!(m, Mat4::identity());
}

#[test]
fn test_perspective_square_aspect() {
    let m = Mat4::perspective(90.0, 1.0, 0.1, 100.0);
    assert_eq!(m[0], m[5]);
    assert_eq!(m[11], -1.0);
}

#[test]
fn test_translate_origin() {
    let mut m = Mat4::identity();
    m.translate(Vec3::new(1.0, 2.0, 3.0));
    let mut p = Vec4::new(0.0, 0.0, 0.0, 1.0);
    p.multiply_by_mat4(&m);
    assert_eq!(p, Vec4::new(1.0, 2.0, 3.0, 1.0));
}

#[test]
fn test_polar_axis_extraction_is_reported() {
    let err = Quat::IDENTITY.axis().unwrap_err();
    assert!(matches!(err, TransformError::DegenerateAngleExtraction { .. }));
}
