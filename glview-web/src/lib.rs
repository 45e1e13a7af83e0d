/// glview Web - WASM bindings for a WebGL2 render loop
///
/// JavaScript owns the canvas, shaders and vertex buffers. It forwards input
/// events to a `WebSession` and uploads the column-major matrices it returns.
use glview_core::{obj, Command, EditMode, Mesh, ProjectionMode, Session, SessionConfig};
use wasm_bindgen::prelude::*;
use web_sys::{WebGl2RenderingContext, WebGlUniformLocation};

#[wasm_bindgen]
pub struct WebSession {
    session: Session,
    meshes: Vec<Mesh>,
}

#[wasm_bindgen]
impl WebSession {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> WebSession {
        let config = SessionConfig {
            width,
            height,
            ..SessionConfig::default()
        };
        WebSession {
            session: Session::new(1, config),
            meshes: Vec::new(),
        }
    }

    /// Parse and normalize OBJ source, returning the new model's index
    pub fn load_obj(&mut self, source: &str) -> Result<usize, JsValue> {
        self.add_obj(source).map_err(|e| JsValue::from_str(&e))
    }

    /// Select what drags and scrolls edit, e.g. "rotate" or "eye"
    pub fn set_mode(&mut self, name: &str) -> Result<(), JsValue> {
        let mode: EditMode = name.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.session.apply(Command::SelectMode(mode));
        Ok(())
    }

    /// "perspective" or "ortho"
    pub fn set_projection(&mut self, name: &str) -> Result<(), JsValue> {
        let mode: ProjectionMode = name.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.session.apply(Command::SetProjection(mode));
        Ok(())
    }

    /// Pointer drag in pixels, `dy` positive upward
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.session.apply(Command::Drag { dx, dy });
    }

    pub fn scroll(&mut self, dy: f32) {
        self.session.apply(Command::Scroll { dy });
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.session.apply(Command::Resize { width, height });
    }

    pub fn next_model(&mut self) {
        self.session.apply(Command::NextModel);
    }

    pub fn prev_model(&mut self) {
        self.session.apply(Command::PrevModel);
    }

    pub fn cycle_light(&mut self) {
        self.session.apply(Command::CycleLight);
    }

    pub fn toggle_split(&mut self) {
        self.session.apply(Command::ToggleSplit);
    }

    pub fn active_model(&self) -> usize {
        self.session.active_index()
    }

    /// Column-major model-view-projection matrix
    pub fn mvp(&self) -> Vec<f32> {
        self.session.frame().mvp_gl().to_vec()
    }

    /// Column-major projection * view for the ground plane
    pub fn ground_mvp(&self) -> Vec<f32> {
        self.session.frame().ground_gl().to_vec()
    }

    /// Upload the current MVP to a `mat4` uniform
    pub fn upload_mvp(&self, gl: &WebGl2RenderingContext, location: &WebGlUniformLocation) {
        let mvp = self.session.frame().mvp_gl();
        gl.uniform_matrix4fv_with_f32_array(Some(location), false, &mvp);
    }

    /// Flat xyz positions of a loaded model
    pub fn positions(&self, index: usize) -> Vec<f32> {
        self.meshes.get(index).map(Mesh::positions).unwrap_or_default()
    }

    pub fn normals(&self, index: usize) -> Vec<f32> {
        self.meshes.get(index).map(Mesh::normals).unwrap_or_default()
    }

    pub fn colors(&self, index: usize) -> Vec<f32> {
        self.meshes.get(index).map(Mesh::colors).unwrap_or_default()
    }

    /// Text dump of the current view, projection and model matrices
    pub fn report(&self) -> String {
        self.session.report()
    }
}

impl WebSession {
    fn add_obj(&mut self, source: &str) -> Result<usize, String> {
        let mut mesh = obj::parse_obj(source).map_err(|e| e.to_string())?;
        mesh.normalize();

        // The session starts with one model slot for the first mesh
        let index = if self.meshes.is_empty() {
            0
        } else {
            self.session.add_model()
        };
        self.meshes.push(mesh);
        Ok(index)
    }
}
