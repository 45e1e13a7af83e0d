/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use glview_core::{LightingState, Mesh, ShadingMode, Triangle};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Columns `x..x + width` of the character grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: usize,
    pub width: usize,
}

/// How fragment colors are produced
#[derive(Debug, Clone, Copy)]
pub enum Shading<'a> {
    /// Vertex colors only
    Unlit,
    Lit {
        lighting: &'a LightingState,
        eye: Point3<f32>,
        mode: ShadingMode,
    },
}

/// Everything needed to draw one mesh into one viewport
#[derive(Debug, Clone, Copy)]
pub struct DrawParams<'a> {
    pub mvp: &'a Matrix4<f32>,
    pub model: &'a Matrix4<f32>,
    pub shading: Shading<'a>,
    pub viewport: Viewport,
    pub wireframe: bool,
}

/// A vertex after projection, carrying what the fragment stage interpolates
#[derive(Debug, Clone, Copy)]
struct Projected {
    x: f32,
    y: f32,
    depth: f32,
    world: Point3<f32>,
    normal: Vector3<f32>,
    /// Lit color for per-vertex shading, base color otherwise
    color: Vector3<f32>,
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Vector3<f32>>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Vector3::zeros(); size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Vector3::zeros());
    }

    /// Character at column `x`, row `y`
    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    /// Unclamped color at column `x`, row `y`
    pub fn color_at(&self, x: usize, y: usize) -> Vector3<f32> {
        self.color_buffer[y * self.width + x]
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, params: &DrawParams) {
        let normal_matrix = normal_matrix(params.model);
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, &normal_matrix, params);
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, normal_matrix: &Matrix3<f32>, params: &DrawParams) {
        let mut projected = [None; 3];
        for (slot, vertex) in projected.iter_mut().zip(&triangle.vertices) {
            *slot = self.project(vertex.position, vertex.normal, vertex.color, normal_matrix, params);
        }
        // Triangles crossing the near plane or behind the camera are dropped
        let [Some(a), Some(b), Some(c)] = projected else {
            return;
        };

        if params.wireframe {
            self.draw_line(&a, &b, params.viewport);
            self.draw_line(&b, &c, params.viewport);
            self.draw_line(&c, &a, params.viewport);
        } else {
            self.rasterize_triangle(&[a, b, c], params);
        }
    }

    fn project(
        &self,
        position: Point3<f32>,
        normal: Vector3<f32>,
        base: Vector3<f32>,
        normal_matrix: &Matrix3<f32>,
        params: &DrawParams,
    ) -> Option<Projected> {
        let clip: Vector4<f32> = params.mvp * position.to_homogeneous();
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }

        let world = params.model.transform_point(&position);
        let normal = normal_matrix * normal;
        let color = match params.shading {
            Shading::Lit {
                lighting,
                eye,
                mode: ShadingMode::PerVertex,
            } => base.component_mul(&lighting.shade(&world, &normal, &eye)),
            _ => base,
        };

        let viewport = params.viewport;
        Some(Projected {
            x: viewport.x as f32 + (ndc.x + 1.0) * 0.5 * viewport.width as f32,
            y: (1.0 - ndc.y) * 0.5 * self.height as f32,
            depth: ndc.z,
            world,
            normal,
            color,
        })
    }

    fn rasterize_triangle(&mut self, v: &[Projected; 3], params: &DrawParams) {
        let viewport = params.viewport;
        if viewport.width == 0 || self.height == 0 {
            return;
        }

        // Bounding box clipped to the viewport
        let min_x = v[0].x.min(v[1].x).min(v[2].x).floor().max(viewport.x as f32) as usize;
        let max_x = v[0].x.max(v[1].x).max(v[2].x).ceil()
            .min((viewport.x + viewport.width - 1) as f32);
        let min_y = v[0].y.min(v[1].y).min(v[2].y).floor().max(0.0) as usize;
        let max_y = v[0].y.max(v[1].y).max(v[2].y).ceil().min((self.height - 1) as f32);
        if max_x < 0.0 || max_y < 0.0 {
            return;
        }
        let (max_x, max_y) = (max_x as usize, max_y as usize);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let Some(w) = barycentric((v[0].x, v[0].y), (v[1].x, v[1].y), (v[2].x, v[2].y), p)
                else {
                    continue;
                };
                if w.0 < 0.0 || w.1 < 0.0 || w.2 < 0.0 {
                    continue;
                }

                let depth = w.0 * v[0].depth + w.1 * v[1].depth + w.2 * v[2].depth;
                let idx = y * self.width + x;
                if depth < self.depth_buffer[idx] {
                    let color = fragment_color(v, w, &params.shading);
                    self.plot(idx, depth, color);
                }
            }
        }
    }

    fn draw_line(&mut self, a: &Projected, b: &Projected, viewport: Viewport) {
        let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = a.x + (b.x - a.x) * t;
            let y = a.y + (b.y - a.y) * t;
            if x < viewport.x as f32 || y < 0.0 {
                continue;
            }
            let (col, row) = (x as usize, y as usize);
            if col >= viewport.x + viewport.width || row >= self.height {
                continue;
            }

            let depth = a.depth + (b.depth - a.depth) * t;
            let idx = row * self.width + col;
            if depth < self.depth_buffer[idx] {
                self.plot(idx, depth, a.color.lerp(&b.color, t));
            }
        }
    }

    fn plot(&mut self, idx: usize, depth: f32, color: Vector3<f32>) {
        let luminance = (0.299 * color.x + 0.587 * color.y + 0.114 * color.z).clamp(0.0, 1.0);
        // Anything drawn stays visible: skip the blank first ramp entry
        let last = LUMINOSITY_RAMP.len() - 1;
        let char_index = 1 + (luminance * (last - 1) as f32).round() as usize;

        self.depth_buffer[idx] = depth;
        self.char_buffer[idx] = LUMINOSITY_RAMP[char_index.min(last)];
        self.color_buffer[idx] = color;
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<Color> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = to_terminal_color(&self.color_buffer[idx]);
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Inverse-transpose of the model matrix's linear part, identity if singular
fn normal_matrix(model: &Matrix4<f32>) -> Matrix3<f32> {
    model
        .fixed_view::<3, 3>(0, 0)
        .into_owned()
        .try_inverse()
        .map(|m| m.transpose())
        .unwrap_or_else(Matrix3::identity)
}

fn fragment_color(v: &[Projected; 3], w: (f32, f32, f32), shading: &Shading) -> Vector3<f32> {
    let base = v[0].color * w.0 + v[1].color * w.1 + v[2].color * w.2;
    match shading {
        Shading::Lit {
            lighting,
            eye,
            mode: ShadingMode::PerFragment,
        } => {
            let world = Point3::from(
                v[0].world.coords * w.0 + v[1].world.coords * w.1 + v[2].world.coords * w.2,
            );
            let normal = v[0].normal * w.0 + v[1].normal * w.1 + v[2].normal * w.2;
            base.component_mul(&lighting.shade(&world, &normal, eye))
        }
        _ => base,
    }
}

fn to_terminal_color(color: &Vector3<f32>) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(color.x),
        g: channel(color.y),
        b: channel(color.z),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glview_core::{LightKind, Session, SessionConfig};

    fn full(renderer: &AsciiRenderer) -> Viewport {
        Viewport {
            x: 0,
            width: renderer.width(),
        }
    }

    fn filled(renderer: &AsciiRenderer, x: std::ops::Range<usize>) -> usize {
        (0..renderer.height())
            .flat_map(|y| x.clone().map(move |x| (x, y)))
            .filter(|&(x, y)| renderer.char_at(x, y) != ' ')
            .count()
    }

    #[test]
    fn test_barycentric_corners() {
        let w = barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (0.0, 0.0)).unwrap();
        assert!((w.0 - 1.0).abs() < 1e-6);
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }

    #[test]
    fn test_cube_covers_center() {
        let session = Session::new(1, SessionConfig { width: 40, height: 40, ..SessionConfig::default() });
        let frame = session.frame();
        let mut renderer = AsciiRenderer::new(40, 20);
        let params = DrawParams {
            mvp: &frame.mvp,
            model: &frame.model,
            shading: Shading::Lit {
                lighting: &session.lighting,
                eye: Point3::from(session.camera.eye),
                mode: ShadingMode::PerFragment,
            },
            viewport: full(&renderer),
            wireframe: false,
        };

        renderer.render_mesh(&Mesh::cube(1.0), &params);
        assert_ne!(renderer.char_at(20, 10), ' ');
        assert_eq!(renderer.char_at(0, 0), ' ');

        renderer.clear();
        assert_eq!(filled(&renderer, 0..40), 0);
    }

    #[test]
    fn test_per_vertex_and_per_fragment_differ() {
        let mut session = Session::new(1, SessionConfig { width: 40, height: 40, ..SessionConfig::default() });
        // Point light just in front of the cube face: bright at the face center,
        // much dimmer at its corners
        session.lighting.kind = LightKind::Point;
        session.lighting.point.position = Vector3::new(0.0, 0.0, 1.0);
        let frame = session.frame();
        let eye = Point3::from(session.camera.eye);

        let mut rendered = Vec::new();
        for mode in [ShadingMode::PerVertex, ShadingMode::PerFragment] {
            let mut renderer = AsciiRenderer::new(40, 20);
            let params = DrawParams {
                mvp: &frame.mvp,
                model: &frame.model,
                shading: Shading::Lit {
                    lighting: &session.lighting,
                    eye,
                    mode,
                },
                viewport: full(&renderer),
                wireframe: false,
            };
            renderer.render_mesh(&Mesh::cube(1.0), &params);
            assert!(filled(&renderer, 0..40) > 0);
            rendered.push(renderer);
        }

        let vertex = rendered[0].color_at(20, 10);
        let fragment = rendered[1].color_at(20, 10);
        assert!(fragment.x > vertex.x + 0.2);
    }

    #[test]
    fn test_viewport_confines_drawing() {
        let session = Session::new(1, SessionConfig { width: 20, height: 40, ..SessionConfig::default() });
        let frame = session.frame();
        let mut renderer = AsciiRenderer::new(40, 20);
        let params = DrawParams {
            mvp: &frame.mvp,
            model: &frame.model,
            shading: Shading::Unlit,
            viewport: Viewport { x: 20, width: 20 },
            wireframe: false,
        };

        renderer.render_mesh(&Mesh::cube(1.0), &params);
        assert_eq!(filled(&renderer, 0..20), 0);
        assert!(filled(&renderer, 20..40) > 0);
    }

    #[test]
    fn test_wireframe_draws_fewer_cells() {
        let session = Session::new(1, SessionConfig { width: 40, height: 40, ..SessionConfig::default() });
        let frame = session.frame();
        let mut solid = AsciiRenderer::new(40, 20);
        let mut wire = AsciiRenderer::new(40, 20);
        let mut params = DrawParams {
            mvp: &frame.mvp,
            model: &frame.model,
            shading: Shading::Unlit,
            viewport: full(&solid),
            wireframe: false,
        };

        solid.render_mesh(&Mesh::cube(1.5), &params);
        params.wireframe = true;
        wire.render_mesh(&Mesh::cube(1.5), &params);

        let solid_cells = filled(&solid, 0..40);
        let wire_cells = filled(&wire, 0..40);
        assert!(wire_cells > 0);
        assert!(wire_cells < solid_cells);
    }

    #[test]
    fn test_draw_emits_every_row() {
        let renderer = AsciiRenderer::new(3, 2);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("\r\n").count(), 1);
    }
}
