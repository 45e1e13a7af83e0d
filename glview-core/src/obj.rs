/// Wavefront OBJ reader producing per-triangle expanded meshes
use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::take_till1,
    character::complete::{char, i64 as signed, space0, space1},
    combinator::{map, opt},
    multi::many1,
    number::complete::float,
    sequence::{pair, preceded},
    IResult,
};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::geometry::{Mesh, Triangle, Vertex};

/// Failure to read or parse an OBJ file
#[derive(Debug)]
pub enum ObjError {
    Io(std::io::Error),
    /// Malformed statement; `line` is 1-based
    Parse { line: usize, message: String },
}

impl ObjError {
    fn parse(line: usize, message: impl Into<String>) -> Self {
        ObjError::Parse {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ObjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjError::Io(e) => write!(f, "failed to read obj file: {e}"),
            ObjError::Parse { line, message } => {
                write!(f, "obj parse error at line {line}: {message}")
            }
        }
    }
}

impl std::error::Error for ObjError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ObjError::Io(e) => Some(e),
            ObjError::Parse { .. } => None,
        }
    }
}

impl From<std::io::Error> for ObjError {
    fn from(e: std::io::Error) -> Self {
        ObjError::Io(e)
    }
}

/// One `v/vt/vn` reference of a face, indices as written in the file
#[derive(Debug, Clone, Copy, PartialEq)]
struct FaceRef {
    position: i64,
    normal: Option<i64>,
}

#[derive(Debug, PartialEq)]
enum Statement {
    /// xyz, optionally followed by rgb
    Position(Vec<f32>),
    Normal(Vec<f32>),
    Face(Vec<FaceRef>),
    Ignored,
}

fn floats(input: &str) -> IResult<&str, Vec<f32>> {
    many1(preceded(space1, float))(input)
}

fn face_ref(input: &str) -> IResult<&str, FaceRef> {
    let (input, position) = signed(input)?;
    // Optional "/texcoord" then optional "/normal"
    let (input, rest) = opt(preceded(
        char('/'),
        pair(opt(signed), opt(preceded(char('/'), signed))),
    ))(input)?;

    let normal = rest.and_then(|(_, normal)| normal);
    Ok((input, FaceRef { position, normal }))
}

fn statement(input: &str) -> IResult<&str, Statement> {
    let (rest, keyword) = preceded(space0, take_till1(|c: char| c.is_whitespace()))(input)?;
    match keyword {
        "v" => map(floats, Statement::Position)(rest),
        "vn" => map(floats, Statement::Normal)(rest),
        "f" => map(many1(preceded(space1, face_ref)), Statement::Face)(rest),
        _ => Ok(("", Statement::Ignored)),
    }
}

/// First three values as a vector; fewer than three or non-finite values are rejected
fn triple(values: &[f32], line: usize, what: &str) -> Result<Vector3<f32>, ObjError> {
    let [x, y, z, ..] = *values else {
        return Err(ObjError::parse(line, format!("{what} needs three coordinates")));
    };
    if !(x.is_finite() && y.is_finite() && z.is_finite()) {
        return Err(ObjError::parse(line, format!("{what} has a non-finite coordinate")));
    }
    Ok(Vector3::new(x, y, z))
}

/// Resolve a 1-based or negative (relative) OBJ index against `len` entries
fn resolve(index: i64, len: usize) -> Option<usize> {
    let resolved = if index > 0 {
        index - 1
    } else if index < 0 {
        len as i64 + index
    } else {
        return None;
    };
    (0..len as i64).contains(&resolved).then_some(resolved as usize)
}

#[derive(Default)]
struct Builder {
    positions: Vec<Point3<f32>>,
    colors: Vec<Vector3<f32>>,
    normals: Vec<Vector3<f32>>,
    mesh: Mesh,
}

impl Builder {
    fn vertex(&self, r: &FaceRef, line: usize) -> Result<(Vertex, bool), ObjError> {
        let p = resolve(r.position, self.positions.len()).ok_or_else(|| {
            ObjError::parse(line, format!("vertex index {} out of range", r.position))
        })?;
        let normal = match r.normal {
            Some(n) => {
                let i = resolve(n, self.normals.len()).ok_or_else(|| {
                    ObjError::parse(line, format!("normal index {n} out of range"))
                })?;
                Some(self.normals[i])
            }
            None => None,
        };

        let vertex = Vertex::new(
            self.positions[p],
            normal.unwrap_or_else(Vector3::zeros),
            self.colors[p],
        );
        Ok((vertex, normal.is_some()))
    }

    fn face(&mut self, refs: &[FaceRef], line: usize) -> Result<(), ObjError> {
        if refs.len() < 3 {
            return Err(ObjError::parse(line, "face needs at least three vertices"));
        }

        let corners = refs
            .iter()
            .map(|r| self.vertex(r, line))
            .collect::<Result<Vec<_>, _>>()?;

        // Fan triangulation around the first corner
        for i in 1..corners.len() - 1 {
            let mut triangle = Triangle::new(corners[0].0, corners[i].0, corners[i + 1].0);
            let face_normal = (triangle.vertices[1].position - triangle.vertices[0].position)
                .cross(&(triangle.vertices[2].position - triangle.vertices[0].position))
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(Vector3::zeros);
            for (vertex, has_normal) in triangle
                .vertices
                .iter_mut()
                .zip([corners[0].1, corners[i].1, corners[i + 1].1])
            {
                if !has_normal {
                    vertex.normal = face_normal;
                }
            }
            self.mesh.add_triangle(triangle);
        }
        Ok(())
    }
}

/// Parse OBJ source text into a mesh.
///
/// Polygons are fan-triangulated. Vertices without a color are white and
/// references without a normal get the face normal. Texture coordinates,
/// groups, smoothing and material statements are skipped.
pub fn parse_obj(input: &str) -> Result<Mesh, ObjError> {
    let mut builder = Builder::default();

    for (i, raw) in input.lines().enumerate() {
        let line = i + 1;
        let text = raw.split('#').next().unwrap_or("").trim_end();
        if text.trim_start().is_empty() {
            continue;
        }

        let (rest, stmt) =
            statement(text).map_err(|e| ObjError::parse(line, format!("{e:?}")))?;
        if !rest.trim().is_empty() {
            return Err(ObjError::parse(line, format!("unexpected trailing input '{}'", rest.trim())));
        }

        match stmt {
            Statement::Position(values) => {
                let position = triple(&values, line, "vertex")?;
                // Six values carry a per-vertex rgb color after xyz
                let color = if values.len() >= 6 {
                    triple(&values[3..], line, "vertex color")?
                } else {
                    Vector3::new(1.0, 1.0, 1.0)
                };
                builder.positions.push(Point3::from(position));
                builder.colors.push(color);
            }
            Statement::Normal(values) => builder.normals.push(triple(&values, line, "normal")?),
            Statement::Face(refs) => builder.face(&refs, line)?,
            Statement::Ignored => {}
        }
    }

    Ok(builder.mesh)
}

/// Read an OBJ file and normalize it into the unit cube around the origin
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh, ObjError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    let mut mesh = parse_obj(&source)?;
    log::debug!("loaded {} triangles from {}", mesh.triangles.len(), path.display());
    mesh.normalize();
    Ok(mesh)
}
