//! Triangle meshes for the demo scenes.

use crate::draw::{push_lit_vertex, push_vertex, POS_COLOR, POS_COLOR_NORMAL};
use crate::vec::{Vec3, Vec4};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices, counter-clockwise when seen
/// from the front.
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

    /// Builds a flat triangle whose vertex normals all equal the face normal.
    pub fn flat(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        let normal = (p1 - p0).cross(p2 - p0).normalize();
        Self::new(Vertex::new(p0, normal), Vertex::new(p1, normal), Vertex::new(p2, normal))
    }

    /// Face normal from the winding; degenerate triangles give NaN.
    pub fn face_normal(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices.map(|v| v.position);
        (v1 - v0).cross(v2 - v0).normalize()
    }

    pub fn centroid(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices.map(|v| v.position);
        (v0 + v1 + v2) / 3.0
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Adds the quad `corner, corner + u, corner + u + v, corner + v` as two
    /// triangles facing `u x v`.
    fn add_quad(&mut self, corner: Vec3, u: Vec3, v: Vec3) {
        let normal = u.cross(v).normalize();
        let p = [corner, corner + u, corner + u + v, corner + v].map(|p| Vertex::new(p, normal));
        self.add_triangle(Triangle::new(p[0], p[1], p[2]));
        self.add_triangle(Triangle::new(p[0], p[2], p[3]));
    }

    /// Axis-aligned cube of edge `size` centred on the origin, outward normals.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::with_capacity(12);
        let faces = [
            (Vec3::Z, Vec3::X, Vec3::Y),
            (-Vec3::Z, Vec3::Y, Vec3::X),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (-Vec3::Y, Vec3::X, Vec3::Z),
            (Vec3::X, Vec3::Y, Vec3::Z),
            (-Vec3::X, Vec3::Z, Vec3::Y),
        ];
        for (normal, u, v) in faces {
            let corner = (normal - u - v) * h;
            mesh.add_quad(corner, u * size, v * size);
        }
        mesh
    }

    /// Unit square in the xz-plane centred on the origin, facing +y.
    pub fn unit_plane() -> Self {
        let mut mesh = Self::with_capacity(2);
        mesh.add_quad(Vec3::new(-0.5, 0.0, 0.5), Vec3::X, -Vec3::Z);
        mesh
    }

    /// Axis-aligned bounds, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.triangles.iter().flat_map(|t| t.vertices.iter().map(|v| v.position));
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| {
            (
                Vec3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Vec3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        }))
    }

    /// Interleaved triangle-list data for the draw helpers: `POS_COLOR` or,
    /// with `lighting`, `POS_COLOR_NORMAL`.
    pub fn to_interleaved(&self, color: Vec4, lighting: bool) -> Vec<f32> {
        let stride = if lighting { POS_COLOR_NORMAL } else { POS_COLOR };
        let mut out = Vec::with_capacity(self.triangles.len() * 3 * stride);
        for vertex in self.triangles.iter().flat_map(|t| t.vertices.iter()) {
            if lighting {
                push_lit_vertex(&mut out, vertex.position, color, vertex.normal);
            } else {
                push_vertex(&mut out, vertex.position, color);
            }
        }
        out
    }
}
