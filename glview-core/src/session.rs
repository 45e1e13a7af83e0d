/// Viewer session state and the commands that edit it
///
/// Input sources translate their events into [`Command`]s and feed them to
/// [`Session::apply`], which mutates the state and returns the matrices for
/// the next frame.
use nalgebra::{Matrix4, Vector3};
use std::f32::consts::PI;
use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::camera::Camera;
use crate::layout;
use crate::lighting::{LightingState, ShadingMode};
use crate::projection::{ProjectionMode, ProjectionSettings};
use crate::transform::{ModelTransform, Transform};

/// Translation, scale and camera drag step per input unit
pub const DRAG_STEP: f32 = 0.01;
/// Rotation drag step per input unit, in degrees
pub const ROTATE_STEP: f32 = 5.0 * PI / 180.0;
/// Z step per scroll notch
pub const SCROLL_STEP: f32 = 0.5;

/// What drag and scroll input edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Translate,
    Rotate,
    Scale,
    Eye,
    Center,
    Up,
    Light,
    Shininess,
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditMode::Translate => "translate",
            EditMode::Rotate => "rotate",
            EditMode::Scale => "scale",
            EditMode::Eye => "eye",
            EditMode::Center => "center",
            EditMode::Up => "up",
            EditMode::Light => "light",
            EditMode::Shininess => "shininess",
        };
        f.write_str(name)
    }
}

impl FromStr for EditMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "translate" => Ok(EditMode::Translate),
            "rotate" => Ok(EditMode::Rotate),
            "scale" => Ok(EditMode::Scale),
            "eye" => Ok(EditMode::Eye),
            "center" => Ok(EditMode::Center),
            "up" => Ok(EditMode::Up),
            "light" => Ok(EditMode::Light),
            "shininess" => Ok(EditMode::Shininess),
            other => Err(format!("unknown edit mode '{other}'")),
        }
    }
}

/// A discrete input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SelectMode(EditMode),
    NextModel,
    PrevModel,
    SetProjection(ProjectionMode),
    /// New framebuffer size in pixels
    Resize { width: u32, height: u32 },
    /// Pointer drag; `dy` is positive when moving up
    Drag { dx: f32, dy: f32 },
    /// Wheel movement; positive scrolls up
    Scroll { dy: f32 },
    CycleLight,
    ToggleWireframe,
    /// Switch between one view and per-vertex | per-fragment side by side
    ToggleSplit,
}

/// Matrices for one frame, recomputed from the session state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub model: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    /// `projection * view * model`
    pub mvp: Matrix4<f32>,
    /// `projection * view`, for the untransformed ground plane
    pub ground: Matrix4<f32>,
}

impl FrameMatrices {
    /// Column-major MVP for the uniform upload
    pub fn mvp_gl(&self) -> [f32; 16] {
        layout::gl_matrix(&self.mvp)
    }

    pub fn ground_gl(&self) -> [f32; 16] {
        layout::gl_matrix(&self.ground)
    }
}

/// Initial viewport and projection choices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub width: u32,
    pub height: u32,
    pub projection: ProjectionMode,
    pub split: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            projection: ProjectionMode::Perspective,
            split: false,
        }
    }
}

/// Everything input can change: per-model transforms, camera, projection
/// and lighting.
#[derive(Debug, Clone)]
pub struct Session {
    models: Vec<ModelTransform>,
    active: usize,
    pub camera: Camera,
    pub projection: ProjectionSettings,
    pub projection_mode: ProjectionMode,
    pub edit_mode: EditMode,
    pub lighting: LightingState,
    pub wireframe: bool,
    pub split: bool,
    width: u32,
    height: u32,
}

impl Session {
    /// Session with one identity transform per model.
    ///
    /// `model_count` is raised to at least one so there is always an active
    /// model.
    pub fn new(model_count: usize, config: SessionConfig) -> Self {
        let mut session = Self {
            models: vec![ModelTransform::identity(); model_count.max(1)],
            active: 0,
            camera: Camera::default(),
            projection: ProjectionSettings::default(),
            projection_mode: config.projection,
            edit_mode: EditMode::Translate,
            lighting: LightingState::default(),
            wireframe: false,
            split: config.split,
            width: config.width,
            height: config.height,
        };
        session.update_aspect();
        session
    }

    /// Append an identity transform for a newly loaded mesh, returning its index
    pub fn add_model(&mut self) -> usize {
        self.models.push(ModelTransform::identity());
        self.models.len() - 1
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Index of the model being displayed and edited
    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_model(&self) -> &ModelTransform {
        &self.models[self.active]
    }

    pub fn active_model_mut(&mut self) -> &mut ModelTransform {
        &mut self.models[self.active]
    }

    pub fn viewport_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Shading modes to draw side by side, left to right
    pub fn shading_passes(&self) -> &'static [ShadingMode] {
        if self.split {
            &[ShadingMode::PerVertex, ShadingMode::PerFragment]
        } else {
            &[ShadingMode::PerFragment]
        }
    }

    fn update_aspect(&mut self) {
        let width = if self.split { self.width / 2 } else { self.width };
        self.projection.set_viewport(width.max(1), self.height.max(1));
    }

    /// Apply one command, then recompute the frame matrices
    pub fn apply(&mut self, command: Command) -> FrameMatrices {
        match command {
            Command::SelectMode(mode) => {
                self.edit_mode = mode;
                log::info!("edit mode: {mode}");
            }
            Command::NextModel => {
                self.active = (self.active + 1) % self.models.len();
            }
            Command::PrevModel => {
                self.active = (self.active + self.models.len() - 1) % self.models.len();
            }
            Command::SetProjection(mode) => {
                self.projection_mode = mode;
                log::info!("projection: {mode}");
            }
            Command::Resize { width, height } => {
                self.width = width;
                self.height = height;
                self.update_aspect();
            }
            Command::Drag { dx, dy } => self.drag(dx, dy),
            Command::Scroll { dy } => self.scroll(dy),
            Command::CycleLight => self.lighting.cycle(),
            Command::ToggleWireframe => self.wireframe = !self.wireframe,
            Command::ToggleSplit => {
                self.split = !self.split;
                self.update_aspect();
            }
        }
        self.frame()
    }

    fn drag(&mut self, dx: f32, dy: f32) {
        let step = Vector3::new(dx, dy, 0.0) * DRAG_STEP;
        match self.edit_mode {
            EditMode::Translate => self.active_model_mut().translate(step),
            EditMode::Rotate => self
                .active_model_mut()
                .rotate(Vector3::new(dy, dx, 0.0) * ROTATE_STEP),
            EditMode::Scale => self.active_model_mut().rescale(step),
            EditMode::Eye => self.camera.eye += step,
            EditMode::Center => self.camera.center += step,
            EditMode::Up => self.camera.up += step,
            EditMode::Light => self.lighting.move_active(step.x, step.y),
            EditMode::Shininess => {}
        }
    }

    fn scroll(&mut self, dy: f32) {
        let step = Vector3::new(0.0, 0.0, dy * SCROLL_STEP);
        match self.edit_mode {
            EditMode::Translate => self.active_model_mut().translate(step),
            EditMode::Rotate => self.active_model_mut().rotate(step),
            EditMode::Scale => self.active_model_mut().rescale(step),
            EditMode::Eye => self.camera.eye += step,
            EditMode::Center => self.camera.center += step,
            EditMode::Up => self.camera.up += step,
            EditMode::Light => self.lighting.scroll(dy),
            EditMode::Shininess => self.lighting.adjust_shininess(dy),
        }
    }

    /// Matrices for the current state
    pub fn frame(&self) -> FrameMatrices {
        let model = Transform::compose_model(self.active_model());
        let view = self.camera.view_matrix();
        let projection = self.projection.matrix(self.projection_mode);
        FrameMatrices {
            model,
            view,
            projection,
            mvp: Transform::mvp_matrix(&model, &view, &projection),
            ground: projection * view,
        }
    }

    /// Human-readable dump of the view, projection and model matrices
    pub fn report(&self) -> String {
        let transform = self.active_model();
        let sections = [
            ("Viewing Matrix", self.camera.view_matrix()),
            ("Projection Matrix", self.projection.matrix(self.projection_mode)),
            ("Translation Matrix", Transform::translation_matrix(&transform.position)),
            ("Rotation Matrix", Transform::rotation_matrix(&transform.rotation)),
            ("Scaling Matrix", Transform::scale_matrix(&transform.scale)),
        ];

        let mut out = String::new();
        for (title, matrix) in sections {
            let _ = writeln!(out, "{title}:{matrix}");
        }
        out
    }
}
