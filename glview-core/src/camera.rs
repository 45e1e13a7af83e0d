/// Camera state and the look-at view matrix
use nalgebra::{Matrix4, Vector3};

/// Right-handed look-at view matrix.
///
/// The camera sits at `eye`, looks toward `center` and keeps `up` roughly
/// vertical. The result maps world space into a camera space that looks down
/// the negative Z axis. `eye == center` or `up` parallel to the viewing
/// direction yields NaN entries; callers keep their camera out of those
/// configurations.
#[rustfmt::skip]
pub fn look_at(eye: &Vector3<f32>, center: &Vector3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
    let forward = (center - eye).normalize();
    let side = forward.cross(&up.normalize()).normalize();
    let true_up = side.cross(&forward);

    let rotation = Matrix4::new(
        side.x, side.y, side.z, 0.0,
        true_up.x, true_up.y, true_up.z, 0.0,
        -forward.x, -forward.y, -forward.z, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );
    let translation = Matrix4::new(
        1.0, 0.0, 0.0, -eye.x,
        0.0, 1.0, 0.0, -eye.y,
        0.0, 0.0, 1.0, -eye.z,
        0.0, 0.0, 0.0, 1.0,
    );

    rotation * translation
}

/// Eye, look-at target and up vector of the session camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vector3<f32>,
    pub center: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new(eye: Vector3<f32>, center: Vector3<f32>, up: Vector3<f32>) -> Self {
        Self { eye, center, up }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        look_at(&self.eye, &self.center, &self.up)
    }

    /// Unit vector from the eye toward the target
    pub fn forward(&self) -> Vector3<f32> {
        (self.center - self.eye).normalize()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vector3::new(0.0, 0.0, 2.0),
            center: Vector3::zeros(),
            up: Vector3::new(0.0, 1.0, 0.0),
        }
    }
}
