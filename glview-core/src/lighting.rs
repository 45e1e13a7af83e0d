/// Light sources and Phong shading parameters
use nalgebra::{Point3, Vector3};
use std::fmt;

/// Which light source is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Directional,
    Point,
    Spot,
}

impl LightKind {
    /// Directional -> Point -> Spot -> Directional
    pub fn next(self) -> Self {
        match self {
            LightKind::Directional => LightKind::Point,
            LightKind::Point => LightKind::Spot,
            LightKind::Spot => LightKind::Directional,
        }
    }
}

impl fmt::Display for LightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightKind::Directional => write!(f, "directional"),
            LightKind::Point => write!(f, "point"),
            LightKind::Spot => write!(f, "spot"),
        }
    }
}

/// Where the lighting equation is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingMode {
    /// Gouraud: shade at the vertices, interpolate the color
    PerVertex,
    /// Phong: interpolate position and normal, shade every fragment
    PerFragment,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Direction toward the light for a directional light, world position otherwise
    pub position: Vector3<f32>,
    pub intensity: Vector3<f32>,
}

impl Light {
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            position,
            intensity: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Ambient, diffuse and specular reflection coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflectance {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
}

impl Default for Reflectance {
    fn default() -> Self {
        Self {
            ambient: 0.15,
            diffuse: 0.75,
            specular: 0.5,
        }
    }
}

/// The three light sources, the active one, and the Phong exponent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingState {
    pub kind: LightKind,
    pub directional: Light,
    pub point: Light,
    pub spot: Light,
    pub shininess: f32,
    /// Half-angle of the spot cone, in degrees
    pub spot_cutoff: f32,
    pub reflectance: Reflectance,
}

impl Default for LightingState {
    fn default() -> Self {
        Self {
            kind: LightKind::Directional,
            directional: Light::new(Vector3::new(1.0, 1.0, 1.0)),
            point: Light::new(Vector3::new(0.0, 2.0, 1.0)),
            spot: Light::new(Vector3::new(0.0, 0.0, 2.0)),
            shininess: 64.0,
            spot_cutoff: 30.0,
            reflectance: Reflectance::default(),
        }
    }
}

impl LightingState {
    pub fn cycle(&mut self) {
        self.kind = self.kind.next();
        log::info!("active light: {}", self.kind);
    }

    pub fn active(&self) -> &Light {
        match self.kind {
            LightKind::Directional => &self.directional,
            LightKind::Point => &self.point,
            LightKind::Spot => &self.spot,
        }
    }

    pub fn active_mut(&mut self) -> &mut Light {
        match self.kind {
            LightKind::Directional => &mut self.directional,
            LightKind::Point => &mut self.point,
            LightKind::Spot => &mut self.spot,
        }
    }

    /// Shift the active light in its x/y plane
    pub fn move_active(&mut self, dx: f32, dy: f32) {
        let light = self.active_mut();
        light.position.x += dx;
        light.position.y += dy;
    }

    /// Scroll edit: brighten or dim directional and point lights on every
    /// channel by `0.5 * dy`, or widen the spot cone by `dy` degrees.
    pub fn scroll(&mut self, dy: f32) {
        match self.kind {
            LightKind::Directional | LightKind::Point => {
                self.active_mut().intensity += Vector3::repeat(0.5 * dy);
            }
            LightKind::Spot => self.spot_cutoff += dy,
        }
    }

    pub fn adjust_shininess(&mut self, dy: f32) {
        self.shininess += 1.5 * dy;
    }

    /// Phong color reaching `eye` from a surface point lit by the active light
    pub fn shade(
        &self,
        position: &Point3<f32>,
        normal: &Vector3<f32>,
        eye: &Point3<f32>,
    ) -> Vector3<f32> {
        let light = self.active();
        let k = &self.reflectance;
        let ambient = light.intensity * k.ambient;

        let to_light = match self.kind {
            LightKind::Directional => light.position.try_normalize(f32::EPSILON),
            LightKind::Point | LightKind::Spot => {
                (light.position - position.coords).try_normalize(f32::EPSILON)
            }
        };
        let (Some(l), Some(n)) = (to_light, normal.try_normalize(f32::EPSILON)) else {
            return ambient;
        };

        if self.kind == LightKind::Spot {
            // Cone aimed from the light toward the world origin
            let Some(axis) = (-light.position).try_normalize(f32::EPSILON) else {
                return ambient;
            };
            if (-l).dot(&axis) < self.spot_cutoff.to_radians().cos() {
                return ambient;
            }
        }

        let lambert = n.dot(&l);
        if lambert <= 0.0 {
            return ambient;
        }

        let reflected = n * (2.0 * lambert) - l;
        let specular = (eye - position)
            .try_normalize(f32::EPSILON)
            .map(|v| reflected.dot(&v).max(0.0).powf(self.shininess))
            .unwrap_or(0.0);

        ambient + light.intensity * (k.diffuse * lambert + k.specular * specular)
    }
}
