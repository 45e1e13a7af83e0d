/// Triangle meshes, bounding boxes and unit-cube normalization
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position, normal and color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub color: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, color: Vector3<f32>) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }

    /// White vertex at (x, y, z) with the given normal
    pub fn plain(x: f32, y: f32, z: f32, normal: Vector3<f32>) -> Self {
        Self::new(Point3::new(x, y, z), normal, Vector3::new(1.0, 1.0, 1.0))
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Length of the longest side
    pub fn greatest_extent(&self) -> f32 {
        self.extent().max()
    }
}

/// A 3D mesh composed of triangles, already expanded per face
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.triangles.iter().flat_map(|t| t.vertices.iter())
    }

    /// Bounding box of every vertex, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Bounds> {
        let mut vertices = self.vertices();
        let first = vertices.next()?.position;
        let bounds = vertices.fold(
            Bounds {
                min: first,
                max: first,
            },
            |b, v| Bounds {
                min: b.min.inf(&v.position),
                max: b.max.sup(&v.position),
            },
        );
        Some(bounds)
    }

    /// Center the mesh on the origin and rescale it uniformly so that its
    /// longest side spans 2 units.
    ///
    /// A mesh whose extent is zero along every axis is only centered.
    pub fn normalize(&mut self) {
        let Some(bounds) = self.bounds() else {
            return;
        };

        let offset = bounds.center().coords;
        let half = bounds.greatest_extent() / 2.0;
        let scale = if half > 0.0 { 1.0 / half } else { 1.0 };

        for triangle in &mut self.triangles {
            for vertex in &mut triangle.vertices {
                vertex.position = Point3::from((vertex.position.coords - offset) * scale);
            }
        }

        log::debug!(
            "normalized {} triangles: offset {:?}, scale {}",
            self.triangles.len(),
            offset.as_slice(),
            scale
        );
    }

    /// Flat xyz position buffer, three floats per vertex
    pub fn positions(&self) -> Vec<f32> {
        self.vertices()
            .flat_map(|v| [v.position.x, v.position.y, v.position.z])
            .collect()
    }

    /// Flat xyz normal buffer, three floats per vertex
    pub fn normals(&self) -> Vec<f32> {
        self.vertices()
            .flat_map(|v| [v.normal.x, v.normal.y, v.normal.z])
            .collect()
    }

    /// Flat rgb color buffer, three floats per vertex
    pub fn colors(&self) -> Vec<f32> {
        self.vertices()
            .flat_map(|v| [v.color.x, v.color.y, v.color.z])
            .collect()
    }

    /// Create a simple cube mesh for testing
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        // (normal, tangent u, tangent v) per face, with u x v == normal
        let faces = [
            (Vector3::z(), Vector3::x(), Vector3::y()),
            (-Vector3::z(), Vector3::y(), Vector3::x()),
            (Vector3::y(), Vector3::z(), Vector3::x()),
            (-Vector3::y(), Vector3::x(), Vector3::z()),
            (Vector3::x(), Vector3::y(), Vector3::z()),
            (-Vector3::x(), Vector3::z(), Vector3::y()),
        ];

        for (normal, u, v) in faces {
            let color = normal.abs() * 0.5 + Vector3::repeat(0.5);
            let corner = |su: f32, sv: f32| {
                let p = (normal + u * su + v * sv) * half;
                Vertex::new(Point3::from(p), normal, color)
            };
            let (a, b, c, d) = (
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            );
            mesh.add_triangle(Triangle::new(a, b, c));
            mesh.add_triangle(Triangle::new(a, c, d));
        }

        mesh
    }

    /// Floor quad under the normalized model, two triangles at y = -0.9
    pub fn ground_plane() -> Self {
        let green = Vector3::new(0.0, 1.0, 0.0);
        let blue = Vector3::new(0.0, 0.5, 0.8);
        let up = Vector3::y();
        let vertex = |x: f32, z: f32, color: Vector3<f32>| {
            Vertex::new(Point3::new(x, -0.9, z), up, color)
        };

        let mut mesh = Self::with_capacity(2);
        mesh.add_triangle(Triangle::new(
            vertex(1.0, -1.0, green),
            vertex(1.0, 1.0, blue),
            vertex(-1.0, -1.0, green),
        ));
        mesh.add_triangle(Triangle::new(
            vertex(1.0, 1.0, blue),
            vertex(-1.0, 1.0, blue),
            vertex(-1.0, -1.0, green),
        ));
        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
        let n = Vector3::z();
        Triangle::new(
            Vertex::plain(a[0], a[1], a[2], n),
            Vertex::plain(b[0], b[1], b[2], n),
            Vertex::plain(c[0], c[1], c[2], n),
        )
    }

    #[test]
    fn test_calculate_normal() {
        let t = triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert!((t.calculate_normal() - Vector3::z()).norm() < 1e-6);
    }

    #[test]
    fn test_bounds() {
        let mut mesh = Mesh::new();
        assert!(mesh.bounds().is_none());

        mesh.add_triangle(triangle([1.0, 2.0, 3.0], [5.0, -2.0, 3.0], [3.0, 0.0, 7.0]));
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(1.0, -2.0, 3.0));
        assert_eq!(bounds.max, Point3::new(5.0, 2.0, 7.0));
        assert_eq!(bounds.center(), Point3::new(3.0, 0.0, 5.0));
        assert_eq!(bounds.greatest_extent(), 4.0);
    }

    #[test]
    fn test_normalize_centers_and_scales() {
        let mut mesh = Mesh::new();
        mesh.add_triangle(triangle([10.0, 10.0, 10.0], [30.0, 10.0, 10.0], [10.0, 15.0, 12.0]));
        mesh.normalize();

        let bounds = mesh.bounds().unwrap();
        assert!(bounds.center().coords.norm() < 1e-5);
        assert!((bounds.greatest_extent() - 2.0).abs() < 1e-5);
        // Uniform scale keeps proportions: 5 / 20 of the longest side
        assert!((bounds.extent().y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_degenerate_mesh() {
        let mut mesh = Mesh::new();
        mesh.add_triangle(triangle([2.0, 2.0, 2.0], [2.0, 2.0, 2.0], [2.0, 2.0, 2.0]));
        mesh.normalize();
        assert_eq!(mesh.triangles[0].vertices[0].position, Point3::origin());

        let mut empty = Mesh::new();
        empty.normalize();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_flat_buffers() {
        let mesh = Mesh::ground_plane();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.positions().len(), 18);
        assert_eq!(mesh.normals().len(), 18);
        assert_eq!(&mesh.positions()[..3], &[1.0, -0.9, -1.0]);
        assert_eq!(&mesh.colors()[3..6], &[0.0, 0.5, 0.8]);
    }

    #[test]
    fn test_cube_winding_matches_normals() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.triangles.len(), 12);
        for t in &cube.triangles {
            let n = t.vertices[0].normal;
            assert!((t.calculate_normal() - n).norm() < 1e-5);
        }
        let bounds = cube.bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(-1.0, -1.0, -1.0));
        assert_eq!(bounds.max, Point3::new(1.0, 1.0, 1.0));
    }
}
