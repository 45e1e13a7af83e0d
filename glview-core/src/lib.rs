/// glview Core Library - Transform, camera and projection math
///
/// This library provides the stateless core of the viewer: model transform
/// composition, look-at view matrices, orthographic/perspective projection,
/// row-major to column-major repacking, plus mesh loading and the session
/// state that input events mutate.

pub mod camera;
pub mod geometry;
pub mod layout;
pub mod lighting;
pub mod obj;
pub mod projection;
pub mod session;
pub mod transform;

// Re-export commonly used types
pub use camera::Camera;
pub use geometry::{Bounds, Mesh, Triangle, Vertex};
pub use lighting::{LightKind, LightingState, ShadingMode};
pub use obj::ObjError;
pub use projection::{ProjectionMode, ProjectionSettings};
pub use session::{Command, EditMode, FrameMatrices, Session, SessionConfig};
pub use transform::{ModelTransform, Transform};
