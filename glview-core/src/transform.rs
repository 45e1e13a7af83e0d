/// Model transforms: translation, Euler rotation and scaling matrices
use nalgebra::{Matrix4, Vector3};

/// Position, scale and Euler rotation (in degrees) of one loaded mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    pub position: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub rotation: Vector3<f32>,
}

impl ModelTransform {
    pub fn new(position: Vector3<f32>, scale: Vector3<f32>, rotation: Vector3<f32>) -> Self {
        Self {
            position,
            scale,
            rotation,
        }
    }

    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: Vector3::zeros(),
        }
    }

    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.position += delta;
    }

    /// Rotate by delta amounts (in degrees)
    pub fn rotate(&mut self, delta: Vector3<f32>) {
        self.rotation += delta;
    }

    /// Adds `delta` to the scale factors. A factor may reach zero or go negative.
    pub fn rescale(&mut self, delta: Vector3<f32>) {
        self.scale += delta;
    }

    /// `T * R * S` for this transform
    pub fn matrix(&self) -> Matrix4<f32> {
        Transform::compose_model(self)
    }
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Identity with the translation column set to `v`
    #[rustfmt::skip]
    pub fn translation_matrix(v: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, v.x,
            0.0, 1.0, 0.0, v.y,
            0.0, 0.0, 1.0, v.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Diagonal scale matrix. A zero component collapses that axis.
    #[rustfmt::skip]
    pub fn scale_matrix(v: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            v.x, 0.0, 0.0, 0.0,
            0.0, v.y, 0.0, 0.0,
            0.0, 0.0, v.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn rotation_x(degrees: f32) -> Matrix4<f32> {
        let (s, c) = degrees.to_radians().sin_cos();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c, -s, 0.0,
            0.0, s, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn rotation_y(degrees: f32) -> Matrix4<f32> {
        let (s, c) = degrees.to_radians().sin_cos();
        Matrix4::new(
            c, 0.0, s, 0.0,
            0.0, 1.0, 0.0, 0.0,
            -s, 0.0, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn rotation_z(degrees: f32) -> Matrix4<f32> {
        let (s, c) = degrees.to_radians().sin_cos();
        Matrix4::new(
            c, -s, 0.0, 0.0,
            s, c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Create a rotation matrix from Euler angles in degrees
    pub fn rotation_matrix(euler_degrees: &Vector3<f32>) -> Matrix4<f32> {
        let rx = Self::rotation_x(euler_degrees.x);
        let ry = Self::rotation_y(euler_degrees.y);
        let rz = Self::rotation_z(euler_degrees.z);

        // Apply rotations in order: X, Y, Z
        rx * ry * rz
    }

    /// Create the model matrix `T * R * S`
    pub fn compose_model(transform: &ModelTransform) -> Matrix4<f32> {
        Self::translation_matrix(&transform.position)
            * Self::rotation_matrix(&transform.rotation)
            * Self::scale_matrix(&transform.scale)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_model_transform_edits() {
        let mut transform = ModelTransform::identity();
        transform.translate(Vector3::new(0.5, 0.0, -1.0));
        transform.rotate(Vector3::new(10.0, 20.0, 30.0));
        transform.rescale(Vector3::new(0.5, 0.0, -1.0));

        assert_eq!(transform.position, Vector3::new(0.5, 0.0, -1.0));
        assert_eq!(transform.rotation, Vector3::new(10.0, 20.0, 30.0));
        assert_eq!(transform.scale, Vector3::new(1.5, 1.0, 0.0));
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(&Vector3::zeros());
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_translation_places_origin() {
        let v = Vector3::new(1.5, -2.0, 3.25);
        let moved = Transform::translation_matrix(&v).transform_point(&Point3::origin());
        assert_eq!(moved.coords, v);
        assert_eq!(Transform::translation_matrix(&Vector3::zeros()), Matrix4::identity());
    }

    #[test]
    fn test_zero_scale_collapses_axis() {
        let s = Transform::scale_matrix(&Vector3::new(2.0, 0.0, 1.0));
        let p = s.transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert_eq!(p, Point3::new(2.0, 0.0, 1.0));
    }

    #[test]
    fn test_rotation_x_quarter_turn() {
        // +90 degrees about X takes +Y to +Z in a right-handed frame
        let r = Transform::rotation_x(90.0);
        let p = r.transform_point(&Point3::new(0.0, 1.0, 0.0));
        assert!((p - Point3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_rotation_order_is_x_then_y_then_z() {
        let euler = Vector3::new(30.0, 45.0, 60.0);
        let expected = Transform::rotation_x(30.0)
            * Transform::rotation_y(45.0)
            * Transform::rotation_z(60.0);
        let reversed = Transform::rotation_z(60.0)
            * Transform::rotation_y(45.0)
            * Transform::rotation_x(30.0);

        let r = Transform::rotation_matrix(&euler);
        assert!((r - expected).norm() < 1e-6);
        assert!((r - reversed).norm() > 1e-3);
    }

    #[test]
    fn test_compose_model_order() {
        let transform = ModelTransform::new(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(2.0, 2.0, 2.0),
            Vector3::new(0.0, 0.0, 90.0),
        );
        // Scale (1,0,0) to (2,0,0), rotate to (0,2,0), then translate to (1,2,0)
        let p = transform.matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(1.0, 2.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_mvp_multiplies_projection_first() {
        let model = Transform::translation_matrix(&Vector3::new(1.0, 0.0, 0.0));
        let view = Transform::rotation_z(90.0);
        let projection = Transform::scale_matrix(&Vector3::new(2.0, 1.0, 1.0));
        let mvp = Transform::mvp_matrix(&model, &view, &projection);
        assert!((mvp - projection * view * model).norm() < 1e-6);
    }
}
