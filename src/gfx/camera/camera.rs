use cgmath::{perspective, Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3};

use super::camera_utils::{CameraUniform, OPENGL_TO_WGPU_MATRIX};

/// Index of a camera within the [`World`](crate::world::World)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in degrees
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        near: f32,
        far: f32,
    },
}

/// A camera with a Y-up right-handed view.
///
/// The projection matrix is cached: after changing [`Camera::projection`] or
/// [`Camera::zoom`], call [`Camera::update_projection_matrix`].
#[derive(Debug, Clone)]
pub struct Camera {
    pub name: String,
    pub projection: Projection,
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    /// Divides the orthographic extents and the perspective field of view
    pub zoom: f32,
    projection_matrix: Matrix4<f32>,
    /// Set once [`Camera::look_at`] has been called
    aimed: bool,
}

/// View direction of a camera that has not been aimed, and of one whose eye
/// sits on its target
const DEFAULT_FORWARD: Vector3<f32> = Vector3::new(0.0, 0.0, -1.0);

impl Camera {
    fn with_projection(name: impl Into<String>, projection: Projection) -> Self {
        let mut camera = Self {
            name: name.into(),
            projection,
            position: Vector3::new(0.0, 0.0, 0.0),
            target: DEFAULT_FORWARD,
            up: Vector3::unit_y(),
            zoom: 1.0,
            projection_matrix: OPENGL_TO_WGPU_MATRIX,
            aimed: false,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn perspective(
        name: impl Into<String>,
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self::with_projection(
            name,
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            },
        )
    }

    pub fn orthographic(
        name: impl Into<String>,
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self::with_projection(
            name,
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                near,
                far,
            },
        )
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.set_position(x, y, z);
        self
    }

    pub fn looking_at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.look_at(Vector3::new(x, y, z));
        self
    }

    /// Move the eye. A camera that has never been aimed keeps looking
    /// down -z; an aimed one keeps its target.
    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vector3::new(x, y, z);
        if !self.aimed {
            self.target = self.position + DEFAULT_FORWARD;
        }
    }

    pub fn look_at(&mut self, target: Vector3<f32>) {
        self.target = target;
        self.aimed = true;
    }

    pub fn is_perspective(&self) -> bool {
        matches!(self.projection, Projection::Perspective { .. })
    }

    /// Aspect ratio of a perspective camera
    pub fn aspect(&self) -> Option<f32> {
        match self.projection {
            Projection::Perspective { aspect, .. } => Some(aspect),
            Projection::Orthographic { .. } => None,
        }
    }

    /// Set the aspect ratio; orthographic cameras keep their extents.
    ///
    /// Does not touch the cached projection matrix.
    pub fn set_aspect(&mut self, value: f32) {
        if let Projection::Perspective { aspect, .. } = &mut self.projection {
            *aspect = value;
        }
    }

    /// Recompute the cached projection matrix from the projection and zoom
    pub fn update_projection_matrix(&mut self) {
        let zoom = self.zoom.max(f32::EPSILON);
        let proj = match self.projection {
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => {
                let half = (fov_y.to_radians() * 0.5).tan() / zoom;
                perspective(cgmath::Rad(2.0 * half.atan()), aspect, near, far)
            }
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                near,
                far,
            } => {
                let cx = (left + right) * 0.5;
                let cy = (top + bottom) * 0.5;
                let dx = (right - left) * 0.5 / zoom;
                let dy = (top - bottom) * 0.5 / zoom;
                cgmath::ortho(cx - dx, cx + dx, cy - dy, cy + dy, near, far)
            }
        };
        self.projection_matrix = OPENGL_TO_WGPU_MATRIX * proj;
    }

    /// Cached projection matrix, in wgpu clip space
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }

    /// World-to-view matrix.
    ///
    /// When the view direction is parallel to `up` (a top-down camera), an up
    /// vector along the z axis is used instead so the basis stays finite. An
    /// eye sitting on its target looks down -z.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let mut target = self.target;
        if (target - self.position).magnitude2() < 1e-12 {
            target = self.position + DEFAULT_FORWARD;
        }
        let forward = target - self.position;
        let up = if forward.cross(self.up).magnitude2() < 1e-10 {
            let forward = forward.normalize();
            if forward.y.abs() > 0.5 {
                Vector3::new(0.0, 0.0, forward.y.signum())
            } else {
                Vector3::unit_y()
            }
        } else {
            self.up
        };
        Matrix4::look_at_rh(
            Point3::from_vec(self.position),
            Point3::from_vec(target),
            up,
        )
    }

    pub fn view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_position: [self.position.x, self.position.y, self.position.z, 1.0],
            view_proj: self.view_projection_matrix().into(),
        }
    }

    /// Vertical field of view in degrees, for perspective cameras
    pub fn fov_y(&self) -> Option<Deg<f32>> {
        match self.projection {
            Projection::Perspective { fov_y, .. } => Some(Deg(fov_y)),
            Projection::Orthographic { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector4};

    fn is_finite(m: &Matrix4<f32>) -> bool {
        let cols: [[f32; 4]; 4] = (*m).into();
        cols.iter().flatten().all(|v| v.is_finite())
    }

    #[test]
    fn test_projection_is_cached_until_update() {
        let mut camera = Camera::perspective("main", 75.0, 1.0, 0.1, 1000.0);
        let before = camera.projection_matrix();

        camera.set_aspect(2.0);
        assert_eq!(camera.projection_matrix(), before);
        assert_eq!(camera.aspect(), Some(2.0));

        camera.update_projection_matrix();
        assert_ne!(camera.projection_matrix(), before);
        // x scale halves when the aspect doubles
        let after = camera.projection_matrix();
        assert!((after.x.x * 2.0 - before.x.x).abs() < 1e-5);
    }

    #[test]
    fn test_orthographic_zoom_divides_extents() {
        let mut camera = Camera::orthographic("ortho", -2.0, 2.0, 2.0, -2.0, 0.1, 100.0);
        let base = camera.projection_matrix();

        camera.zoom = 2.0;
        camera.update_projection_matrix();
        let zoomed = camera.projection_matrix();
        assert!((zoomed.x.x - base.x.x * 2.0).abs() < 1e-5);
        assert!((zoomed.y.y - base.y.y * 2.0).abs() < 1e-5);

        camera.set_aspect(3.0);
        assert_eq!(camera.aspect(), None);
    }

    #[test]
    fn test_top_down_look_at_stays_finite() {
        let camera = Camera::orthographic("top", -2.0, 2.0, 2.0, -2.0, 0.1, 100.0)
            .with_position(0.0, 10.0, 0.0)
            .looking_at(0.0, 0.0, 0.0);

        let view = camera.view_matrix();
        assert!(is_finite(&view));

        // The origin lands straight ahead, 10 units away
        let p = view * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        assert!((p.z + 10.0).abs() < 1e-5);

        // -z in the world points up on screen
        let up = view * Vector4::new(0.0, 0.0, -1.0, 1.0);
        assert!(up.y > 0.0);
    }

    #[test]
    fn test_eye_on_target_stays_finite() {
        let camera = Camera::perspective("main", 75.0, 1.0, 0.1, 10.0)
            .looking_at(0.0, 0.0, 0.0)
            .with_position(0.0, 0.0, 0.0);

        let view = camera.view_matrix();
        assert!(is_finite(&view));
        assert!(is_finite(&camera.view_projection_matrix()));
        assert_eq!(view, Matrix4::identity());
    }

    #[test]
    fn test_unaimed_camera_keeps_facing_negative_z() {
        for z in [-1.0, -5.0, 3.0] {
            let camera = Camera::perspective("main", 75.0, 1.0, 0.1, 100.0).with_position(0.0, 0.0, z);
            assert_eq!(camera.target, Vector3::new(0.0, 0.0, z - 1.0));

            // A point further down -z lands in front of the eye
            let p = camera.view_matrix() * Vector4::new(0.0, 0.0, z - 2.0, 1.0);
            assert!((p.z + 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_aimed_camera_keeps_target_when_moved() {
        let mut camera = Camera::perspective("main", 75.0, 1.0, 0.1, 100.0).looking_at(1.0, 2.0, 3.0);
        camera.set_position(0.0, 0.0, 9.0);
        assert_eq!(camera.target, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_default_view_looks_down_negative_z() {
        let camera = Camera::perspective("main", 75.0, 1.0, 0.1, 1000.0);
        assert_eq!(camera.view_matrix(), Matrix4::identity());
        assert!(is_finite(&camera.view_projection_matrix()));
    }

    #[test]
    fn test_uniform_carries_eye_position() {
        let camera = Camera::perspective("main", 75.0, 1.0, 0.1, 1000.0).with_position(1.0, 2.0, 5.0);
        assert_eq!(camera.uniform().view_position, [1.0, 2.0, 5.0, 1.0]);
    }
}
