/// Orthographic and perspective projection matrices
use nalgebra::Matrix4;
use std::fmt;
use std::str::FromStr;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionMode::Orthographic => write!(f, "orthographic"),
            ProjectionMode::Perspective => write!(f, "perspective"),
        }
    }
}

impl FromStr for ProjectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ortho" | "orthographic" => Ok(ProjectionMode::Orthographic),
            "persp" | "perspective" => Ok(ProjectionMode::Perspective),
            other => Err(format!("unknown projection mode '{other}'")),
        }
    }
}

/// Clip planes, field of view and viewport aspect for both projection modes.
///
/// `near` and `far` are positive distances in front of the camera. The
/// `left`/`right`/`top`/`bottom` bounds are only read in orthographic mode,
/// `fov_y` (degrees) only in perspective mode. Builders divide by
/// `right - left`, `top - bottom`, `far - near` and `aspect` without checking
/// them; equal bounds or a zero aspect produce infinities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionSettings {
    pub near: f32,
    pub far: f32,
    pub fov_y: f32,
    pub aspect: f32,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl ProjectionSettings {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            ..Self::default()
        }
    }

    /// Update the aspect ratio after a viewport resize
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    /// Create the projection matrix for `mode`
    pub fn matrix(&self, mode: ProjectionMode) -> Matrix4<f32> {
        match mode {
            ProjectionMode::Orthographic => self.orthographic(),
            ProjectionMode::Perspective => self.perspective(),
        }
    }

    /// Orthographic projection of the `left..right`, `bottom..top` box.
    ///
    /// The wider viewport axis is shrunk rather than the narrower one
    /// stretched: for `aspect <= 1` the Y scale is multiplied by the aspect,
    /// otherwise the X scale is divided by it.
    #[rustfmt::skip]
    pub fn orthographic(&self) -> Matrix4<f32> {
        let tx = -(self.right + self.left) / (self.right - self.left);
        let ty = -(self.top + self.bottom) / (self.top - self.bottom);
        let tz = -(self.far + self.near) / (self.far - self.near);

        let mut sx = 2.0 / (self.right - self.left);
        let mut sy = 2.0 / (self.top - self.bottom);
        if self.aspect <= 1.0 {
            sy *= self.aspect;
        } else {
            sx /= self.aspect;
        }

        Matrix4::new(
            sx, 0.0, 0.0, tx,
            0.0, sy, 0.0, ty,
            0.0, 0.0, -2.0 / (self.far - self.near), tz,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Right-handed perspective projection with a vertical field of view.
    ///
    /// On narrow viewports (`aspect <= 1`) the focal length is multiplied by
    /// the aspect so the horizontal field of view stays at `fov_y`, matching
    /// the orthographic policy.
    #[rustfmt::skip]
    pub fn perspective(&self) -> Matrix4<f32> {
        let mut f = 1.0 / (self.fov_y.to_radians() / 2.0).tan();
        if self.aspect <= 1.0 {
            f *= self.aspect;
        }

        let depth = self.near - self.far;
        Matrix4::new(
            f / self.aspect, 0.0, 0.0, 0.0,
            0.0, f, 0.0, 0.0,
            0.0, 0.0, (self.far + self.near) / depth, (2.0 * self.far * self.near) / depth,
            0.0, 0.0, -1.0, 0.0,
        )
    }
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            near: 0.001,
            far: 100.0,
            fov_y: 80.0,
            aspect: 800.0 / 600.0,
            left: -1.0,
            right: 1.0,
            top: 1.0,
            bottom: -1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn square() -> ProjectionSettings {
        ProjectionSettings {
            aspect: 1.0,
            ..ProjectionSettings::default()
        }
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("ortho".parse::<ProjectionMode>(), Ok(ProjectionMode::Orthographic));
        assert_eq!("Perspective".parse::<ProjectionMode>(), Ok(ProjectionMode::Perspective));
        assert!("isometric".parse::<ProjectionMode>().is_err());
        assert_eq!(ProjectionMode::Orthographic.to_string(), "orthographic");
    }

    #[test]
    fn test_set_viewport() {
        let mut settings = ProjectionSettings::new(800, 600);
        assert!((settings.aspect - 800.0 / 600.0).abs() < 1e-6);
        settings.set_viewport(400, 800);
        assert!((settings.aspect - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_orthographic_depth_range() {
        let ortho = square().orthographic();
        let near = ortho.transform_point(&Point3::new(0.0, 0.0, -0.001));
        let far = ortho.transform_point(&Point3::new(0.0, 0.0, -100.0));
        assert!((near.z + 1.0).abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_orthographic_wide_viewport_shrinks_x() {
        let settings = ProjectionSettings {
            aspect: 2.0,
            ..ProjectionSettings::default()
        };
        let m = settings.orthographic();
        assert!((m[(0, 0)] - 0.5).abs() < 1e-6);
        assert!((m[(1, 1)] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthographic_narrow_viewport_shrinks_y() {
        let settings = ProjectionSettings {
            aspect: 0.5,
            ..ProjectionSettings::default()
        };
        let m = settings.orthographic();
        assert!((m[(0, 0)] - 1.0).abs() < 1e-6);
        assert!((m[(1, 1)] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_orthographic_translation_column() {
        let settings = ProjectionSettings {
            left: 0.0,
            right: 4.0,
            bottom: 0.0,
            top: 2.0,
            aspect: 1.0,
            ..ProjectionSettings::default()
        };
        let m = settings.orthographic();
        assert!((m[(0, 3)] + 1.0).abs() < 1e-6);
        assert!((m[(1, 3)] + 1.0).abs() < 1e-6);
        assert_eq!(m[(3, 3)], 1.0);
    }

    #[test]
    fn test_perspective_depth_range() {
        let persp = square().perspective();
        let near = persp.transform_point(&Point3::new(0.0, 0.0, -0.001));
        let far = persp.transform_point(&Point3::new(0.0, 0.0, -100.0));
        assert!((near.z + 1.0).abs() < 1e-3);
        assert!((far.z - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_perspective_focal_length() {
        let settings = ProjectionSettings {
            fov_y: 90.0,
            aspect: 1.0,
            ..ProjectionSettings::default()
        };
        let m = settings.perspective();
        assert!((m[(0, 0)] - 1.0).abs() < 1e-6);
        assert!((m[(1, 1)] - 1.0).abs() < 1e-6);
        assert_eq!(m[(3, 2)], -1.0);
        assert_eq!(m[(3, 3)], 0.0);
    }

    #[test]
    fn test_perspective_aspect_policy() {
        let wide = ProjectionSettings {
            fov_y: 90.0,
            aspect: 2.0,
            ..ProjectionSettings::default()
        }
        .perspective();
        assert!((wide[(0, 0)] - 0.5).abs() < 1e-6);
        assert!((wide[(1, 1)] - 1.0).abs() < 1e-6);

        let narrow = ProjectionSettings {
            fov_y: 90.0,
            aspect: 0.5,
            ..ProjectionSettings::default()
        }
        .perspective();
        assert!((narrow[(0, 0)] - 1.0).abs() < 1e-6);
        assert!((narrow[(1, 1)] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_matrix_dispatch() {
        let settings = ProjectionSettings::default();
        assert_eq!(settings.matrix(ProjectionMode::Perspective), settings.perspective());
        assert_eq!(settings.matrix(ProjectionMode::Orthographic), settings.orthographic());
    }
}
