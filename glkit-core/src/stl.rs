//! STL loading, binary and ASCII.
use std::path::Path;

use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};
use thiserror::Error;

use crate::geometry::{Mesh, Triangle, Vertex};
use crate::vec::Vec3;
use crate::EPSILON;

const HEADER_LEN: usize = 80;
const TRIANGLE_LEN: usize = 50;

#[derive(Debug, Error)]
pub enum StlError {
    #[error("file too small to be a valid STL ({0} bytes)")]
    TooShort(usize),
    #[error("STL declares {declared} triangles but only {available} bytes of triangle data follow")]
    Truncated { declared: usize, available: usize },
    #[error("failed to parse STL: {0}")]
    Malformed(String),
    #[error("failed to read STL file: {0}")]
    Io(#[from] std::io::Error),
}

/// Uses the stored normal unless it is zero, in which case the winding
/// decides.
fn make_triangle(normal: Vec3, p: [Vec3; 3]) -> Triangle {
    match normal.try_normalize() {
        Ok(n) => Triangle::new(Vertex::new(p[0], n), Vertex::new(p[1], n), Vertex::new(p[2], n)),
        Err(_) => Triangle::flat(p[0], p[1], p[2]),
    }
}

fn binary_vec3(input: &[u8]) -> IResult<&[u8], Vec3> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Vec3::new(x, y, z)))
}

fn binary_triangle(input: &[u8]) -> IResult<&[u8], Triangle> {
    let (input, normal) = binary_vec3(input)?;
    let (input, (p0, p1, p2)) = tuple((binary_vec3, binary_vec3, binary_vec3))(input)?;
    // attribute byte count, unused
    let (input, _) = le_u16(input)?;
    Ok((input, make_triangle(normal, [p0, p1, p2])))
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooShort(data.len()));
    }

    let (body, declared) = preceded(take(HEADER_LEN), le_u32)(data)
        .map_err(|e: nom::Err<nom::error::Error<&[u8]>>| StlError::Malformed(e.to_string()))?;
    let declared = declared as usize;
    if body.len() < declared.saturating_mul(TRIANGLE_LEN) {
        return Err(StlError::Truncated {
            declared,
            available: body.len(),
        });
    }

    let (_, triangles) =
        count(binary_triangle, declared)(body).map_err(|e| StlError::Malformed(e.to_string()))?;
    Ok(Mesh { triangles })
}

fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(multispace0, tag(word))
}

fn ascii_vec3(input: &str) -> IResult<&str, Vec3> {
    let (input, (x, y, z)) = tuple((
        preceded(multispace1, float),
        preceded(multispace1, float),
        preceded(multispace1, float),
    ))(input)?;
    Ok((input, Vec3::new(x, y, z)))
}

fn ascii_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = keyword("facet")(input)?;
    let (input, normal) = preceded(keyword("normal"), ascii_vec3)(input)?;
    let (input, _) = tuple((keyword("outer"), keyword("loop")))(input)?;
    let (input, (p0, p1, p2)) = tuple((
        preceded(keyword("vertex"), ascii_vec3),
        preceded(keyword("vertex"), ascii_vec3),
        preceded(keyword("vertex"), ascii_vec3),
    ))(input)?;
    let (input, _) = tuple((keyword("endloop"), keyword("endfacet")))(input)?;
    Ok((input, make_triangle(normal, [p0, p1, p2])))
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<Triangle>> {
    let (input, _) = keyword("solid")(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, triangles) = many0(ascii_facet)(input)?;
    let (input, _) = keyword("endsolid")(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, triangles))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, StlError> {
    match ascii_solid(input) {
        Ok((_, triangles)) => Ok(Mesh { triangles }),
        Err(e) => Err(StlError::Malformed(e.to_string())),
    }
}

/// Detect and parse STL data (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, StlError> {
    // binary exporters are allowed to start their header with "solid" too
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            match parse_ascii_stl(text) {
                Ok(mesh) => return Ok(mesh),
                Err(e) => log::debug!("not an ASCII STL ({}), trying binary", e),
            }
        }
    }

    parse_binary_stl(data)
}

pub fn load_stl(path: impl AsRef<Path>) -> Result<Mesh, StlError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let mesh = parse_stl(&data)?;
    log::info!("loaded {} triangles from {}", mesh.triangles.len(), path.display());
    Ok(mesh)
}

/// Centres the mesh on the origin and scales its largest extent to `size`.
pub fn normalize_mesh(mesh: &mut Mesh, size: f32) {
    let Some((lo, hi)) = mesh.bounds() else {
        return;
    };
    let center = (lo + hi) * 0.5;
    let extent = hi - lo;
    let largest = extent.x.max(extent.y).max(extent.z);
    if largest <= EPSILON {
        return;
    }
    let scale = size / largest;
    for vertex in mesh.triangles.iter_mut().flat_map(|t| t.vertices.iter_mut()) {
        vertex.position = (vertex.position - center) * scale;
    }
}
