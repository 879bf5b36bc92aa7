//! Camera rig
//!
//! Builds the model, view and projection matrices described by an
//! [`AppConfig`] and offers the usual queries on top of them: the combined
//! transform, projecting points to normalized device coordinates and
//! interpolating the model orientation.

use crate::config::{AppConfig, ProjectionKind};
use xform_math::{Mat4, OrthonormalBasis, Quat, TransformError, Vec3, Vec4};

/// Model, view and projection transforms for one camera and one model
#[derive(Clone, Debug)]
pub struct CameraRig {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    eye: Vec3,
    target: Vec3,
    up: Vec3,
    orientation: Quat,
    target_orientation: Quat,
}

fn degrees_to_quat(angles: [f32; 3]) -> Quat {
    let [yaw, pitch, roll] = angles;
    Quat::from_euler(yaw.to_radians(), pitch.to_radians(), roll.to_radians())
}

impl CameraRig {
    /// Build the rig from configuration
    ///
    /// Fails with [`TransformError::UnrecoverableNumeric`] when the
    /// configuration produces a non-finite matrix (for example `near == far`).
    pub fn from_config(config: &AppConfig) -> Result<Self, TransformError> {
        let eye = Vec3::from(config.camera.eye);
        let target = Vec3::from(config.camera.target);
        let up = Vec3::from(config.camera.up);

        let orientation = degrees_to_quat(config.model.rotation);
        let target_orientation = degrees_to_quat(config.animation.target_rotation);

        let rig = Self {
            model: Self::model_matrix(config, &orientation),
            view: Mat4::look_at(eye, target, up),
            projection: Self::projection_matrix(config),
            eye,
            target,
            up,
            orientation,
            target_orientation,
        };

        rig.model.check_finite()?;
        rig.view.check_finite()?;
        rig.projection.check_finite()?;

        log::debug!(
            "Camera rig: eye {:?} target {:?} projection {:?}",
            eye,
            target,
            config.projection.kind
        );
        Ok(rig)
    }

    /// Scale, then rotate, then translate
    fn model_matrix(config: &AppConfig, orientation: &Quat) -> Mat4 {
        let mut model = Mat4::identity();
        model
            .translate(Vec3::from(config.model.translation))
            .multiply(&orientation.to_mat4())
            .scale(Vec3::from(config.model.scale));
        model
    }

    fn projection_matrix(config: &AppConfig) -> Mat4 {
        let camera = &config.camera;
        let aspect = config.viewport.aspect();

        match config.projection.kind {
            ProjectionKind::Perspective => Mat4::perspective(camera.fov, aspect, camera.near, camera.far),
            ProjectionKind::Orthographic => {
                let top = config.projection.ortho_height * 0.5;
                let right = top * aspect;
                Mat4::ortho(-right, right, -top, top, camera.near, camera.far)
            }
            ProjectionKind::Frustum => {
                let top = camera.near * (camera.fov.to_radians() * 0.5).tan();
                let right = top * aspect;
                let [shift_x, shift_y] = config.projection.frustum_shift;
                Mat4::frustum(
                    (shift_x - 1.0) * right,
                    (shift_x + 1.0) * right,
                    (shift_y - 1.0) * top,
                    (shift_y + 1.0) * top,
                    camera.near,
                    camera.far,
                )
            }
        }
    }

    /// Combined transform applying model, then view, then projection
    pub fn model_view_projection(&self) -> Mat4 {
        let mut mvp = self.projection.copy();
        mvp.multiply(&self.view).multiply(&self.model);
        mvp
    }

    /// Transform a model-space point to normalized device coordinates
    ///
    /// Returns `None` for points on the camera plane (clip `w == 0`).
    pub fn project(&self, point: Vec3) -> Option<Vec3> {
        let clip = Vec4::from_vec3(point, 1.0).transformed(&self.model_view_projection());
        if clip.w == 0.0 {
            log::debug!("project: {:?} lies on the camera plane", point);
            return None;
        }
        Some(clip.xyz() * (1.0 / clip.w))
    }

    /// Camera position recovered by inverting the view matrix
    pub fn eye_position(&self) -> Result<Vec3, TransformError> {
        let mut inverse = self.view.copy();
        inverse.invert()?;
        Ok(inverse.translation())
    }

    /// Camera frame in world space: right, up and backward
    pub fn camera_basis(&self) -> OrthonormalBasis {
        let m = self.view.as_array();
        OrthonormalBasis::new(
            Vec3::new(m[0], m[4], m[8]),
            Vec3::new(m[1], m[5], m[9]),
            Vec3::new(m[2], m[6], m[10]),
        )
    }

    /// Rotation taking `+Z` onto the viewing direction
    pub fn look_rotation(&self) -> Quat {
        Quat::from_to(self.eye, self.target, self.up)
    }

    /// Model orientation at the start of the interpolation
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Evenly spaced slerp from the model orientation to the target
    /// orientation, both endpoints included
    pub fn orientation_path(&self, steps: u32) -> Vec<Quat> {
        if steps == 0 {
            return vec![self.orientation];
        }
        (0..=steps)
            .map(|i| {
                let t = i as f32 / steps as f32;
                self.orientation.slerped(&self.target_orientation, t)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    fn default_rig() -> CameraRig {
        CameraRig::from_config(&AppConfig::default()).unwrap()
    }

    #[test]
    fn test_target_projects_to_center() {
        let rig = default_rig();
        let ndc = rig.project(Vec3::ZERO).unwrap();
        assert!(approx_eq(ndc.x, 0.0));
        assert!(approx_eq(ndc.y, 0.0));
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_eye_position_round_trip() {
        let rig = default_rig();
        let eye = rig.eye_position().unwrap();
        assert!(vec_approx_eq(eye, Vec3::new(0.0, 2.0, 6.0)), "{:?}", eye);
    }

    #[test]
    fn test_model_applies_scale_before_translation() {
        let mut config = AppConfig::default();
        config.model.translation = [1.0, 0.0, 0.0];
        config.model.scale = [2.0, 2.0, 2.0];
        let rig = CameraRig::from_config(&config).unwrap();

        let p = Vec4::new(1.0, 0.0, 0.0, 1.0).transformed(&rig.model);
        assert!(vec_approx_eq(p.xyz(), Vec3::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn test_model_rotation_is_yaw_about_z() {
        let mut config = AppConfig::default();
        config.model.rotation = [90.0, 0.0, 0.0];
        let rig = CameraRig::from_config(&config).unwrap();

        let p = Vec4::new(1.0, 0.0, 0.0, 1.0).transformed(&rig.model);
        assert!(vec_approx_eq(p.xyz(), Vec3::Y), "{:?}", p);
    }

    #[test]
    fn test_mvp_matches_stepwise_transform() {
        let mut config = AppConfig::default();
        config.model.translation = [0.5, -0.5, 1.0];
        config.model.rotation = [30.0, 10.0, 0.0];
        let rig = CameraRig::from_config(&config).unwrap();

        let p = Vec4::new(0.25, 0.5, -0.75, 1.0);
        let stepwise = p
            .transformed(&rig.model)
            .transformed(&rig.view)
            .transformed(&rig.projection);
        let combined = p.transformed(&rig.model_view_projection());

        assert!(approx_eq(stepwise.x, combined.x));
        assert!(approx_eq(stepwise.y, combined.y));
        assert!(approx_eq(stepwise.z, combined.z));
        assert!(approx_eq(stepwise.w, combined.w));
    }

    #[test]
    fn test_point_on_camera_plane_is_not_projected() {
        let mut config = AppConfig::default();
        config.camera.eye = [0.0, 0.0, 0.0];
        config.camera.target = [0.0, 0.0, -1.0];
        let rig = CameraRig::from_config(&config).unwrap();

        assert!(rig.project(Vec3::new(1.0, 0.0, 0.0)).is_none());
        assert!(rig.project(Vec3::new(1.0, 0.0, -1.0)).is_some());
    }

    #[test]
    fn test_orthographic_projection() {
        let mut config = AppConfig::default();
        config.projection.kind = ProjectionKind::Orthographic;
        config.projection.ortho_height = 4.0;
        config.viewport.width = 100;
        config.viewport.height = 100;
        config.camera.eye = [0.0, 0.0, 5.0];
        let rig = CameraRig::from_config(&config).unwrap();

        let ndc = rig.project(Vec3::new(2.0, 2.0, 0.0)).unwrap();
        assert!(approx_eq(ndc.x, 1.0));
        assert!(approx_eq(ndc.y, 1.0));
        assert_eq!(rig.projection[15], 1.0);
    }

    #[test]
    fn test_unshifted_frustum_matches_perspective() {
        let mut config = AppConfig::default();
        let perspective = CameraRig::from_config(&config).unwrap().projection;

        config.projection.kind = ProjectionKind::Frustum;
        let frustum = CameraRig::from_config(&config).unwrap().projection;

        for i in 0..16 {
            assert!(approx_eq(perspective[i], frustum[i]), "index {}", i);
        }
    }

    #[test]
    fn test_shifted_frustum_moves_center() {
        let mut config = AppConfig::default();
        config.projection.kind = ProjectionKind::Frustum;
        config.projection.frustum_shift = [0.5, 0.0];
        let rig = CameraRig::from_config(&config).unwrap();

        let ndc = rig.project(Vec3::ZERO).unwrap();
        assert!(approx_eq(ndc.x, -0.5), "{:?}", ndc);
    }

    #[test]
    fn test_equal_clip_planes_are_rejected() {
        let mut config = AppConfig::default();
        config.camera.near = 1.0;
        config.camera.far = 1.0;
        let err = CameraRig::from_config(&config).unwrap_err();
        assert_eq!(err, TransformError::UnrecoverableNumeric);
    }

    #[test]
    fn test_coincident_eye_and_target() {
        let mut config = AppConfig::default();
        config.camera.eye = [1.0, 1.0, 1.0];
        config.camera.target = [1.0, 1.0, 1.0];
        let rig = CameraRig::from_config(&config).unwrap();
        assert_eq!(rig.view, Mat4::identity());
    }

    #[test]
    fn test_camera_basis_is_inverse_view_rotation() {
        let rig = default_rig();
        let mut inverse = rig.view.copy();
        inverse.invert().unwrap();

        let expected = inverse.rotation_block();
        let actual = rig.camera_basis().to_mat4().rotation_block();
        for i in 0..9 {
            assert!(approx_eq(expected[i], actual[i]), "index {}", i);
        }
    }

    #[test]
    fn test_look_rotation_faces_target() {
        let rig = default_rig();
        let forward = rig.look_rotation().rotate_vec3(Vec3::Z);
        let expected = (Vec3::ZERO - Vec3::new(0.0, 2.0, 6.0)).normalized();
        assert!(vec_approx_eq(forward, expected), "{:?}", forward);
    }

    #[test]
    fn test_orientation_path_endpoints() {
        let rig = default_rig();
        let path = rig.orientation_path(4);
        assert_eq!(path.len(), 5);
        assert!(approx_eq(path[0].dot(&rig.orientation()), 1.0));

        let end = degrees_to_quat([90.0, 0.0, 0.0]);
        assert!(approx_eq(path[4].dot(&end).abs(), 1.0));

        // Halfway through a quarter turn is an eighth turn
        assert!(approx_eq(path[2].angle(), std::f32::consts::FRAC_PI_4));
    }

    #[test]
    fn test_orientation_path_without_steps() {
        let rig = default_rig();
        assert_eq!(rig.orientation_path(0), vec![rig.orientation()]);
    }
}
