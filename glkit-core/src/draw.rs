//! CPU-side vertex batching for the immediate-mode draw helpers.
//!
//! Everything here produces flat, interleaved `f32` data ready for a vertex
//! buffer upload; no GPU state is touched. Layouts:
//!
//! * [`POS_COLOR`]: `x y z r g b a`
//! * [`POS_COLOR_NORMAL`]: `x y z r g b a nx ny nz`
//! * [`POS_UV`]: `x y z u v`

use thiserror::Error;

use crate::mat4::Mat4;
use crate::projection::Viewport;
use crate::vec::{Vec2, Vec3, Vec4};
use crate::EPSILON;

pub const POS_COLOR: usize = 7;
pub const POS_COLOR_NORMAL: usize = 10;
pub const POS_UV: usize = 5;

/// Smallest miter cosine before a joint is clamped, limits spikes on very
/// sharp turns.
const MIN_MITER_COS: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineDrawType {
    /// Disconnected segments, two vertices each.
    List,
    /// Connected polyline.
    Strip,
    /// Closed polyline.
    Loop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrisDrawType {
    List,
    Strip,
    Fan,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("vertex data holds {len} floats, not a multiple of the {stride}-float stride")]
    Misaligned { len: usize, stride: usize },
    #[error("stride {0} is too small for the vertex attributes this helper reads")]
    StrideTooSmall(usize),
}

fn vertex_count(data: &[f32], stride: usize, min_stride: usize) -> Result<usize, DrawError> {
    if stride < min_stride {
        return Err(DrawError::StrideTooSmall(stride));
    }
    if data.len() % stride != 0 {
        return Err(DrawError::Misaligned {
            len: data.len(),
            stride,
        });
    }
    Ok(data.len() / stride)
}

fn vertex(data: &[f32], stride: usize, i: usize) -> &[f32] {
    &data[i * stride..(i + 1) * stride]
}

fn position(v: &[f32]) -> Vec3 {
    Vec3::new(v[0], v[1], v[2])
}

fn color(v: &[f32]) -> Vec4 {
    Vec4::new(v[3], v[4], v[5], v[6])
}

pub fn push_vertex(out: &mut Vec<f32>, position: Vec3, color: Vec4) {
    out.extend_from_slice(&position.to_array());
    out.extend_from_slice(&color.to_array());
}

pub fn push_lit_vertex(out: &mut Vec<f32>, position: Vec3, color: Vec4, normal: Vec3) {
    push_vertex(out, position, color);
    out.extend_from_slice(&normal.to_array());
}

/// Solid rectangle as a four-vertex triangle strip (bl, br, tl, tr).
pub fn rect_vertices(color: Vec4, bl: Vec3, br: Vec3, tl: Vec3, tr: Vec3) -> Vec<f32> {
    let mut out = Vec::with_capacity(4 * POS_COLOR);
    for p in [bl, br, tl, tr] {
        push_vertex(&mut out, p, color);
    }
    out
}

/// Axis-aligned rectangle in the z = 0 plane.
pub fn rect_vertices_2d(color: Vec4, bl: Vec2, tr: Vec2) -> Vec<f32> {
    rect_vertices(
        color,
        Vec3::new(bl.x, bl.y, 0.0),
        Vec3::new(tr.x, bl.y, 0.0),
        Vec3::new(bl.x, tr.y, 0.0),
        Vec3::new(tr.x, tr.y, 0.0),
    )
}

/// Textured quad strip; texture origin at the bottom-left corner.
pub fn image_quad(bl: Vec3, br: Vec3, tl: Vec3, tr: Vec3) -> Vec<f32> {
    let mut out = Vec::with_capacity(4 * POS_UV);
    for (p, uv) in [(bl, [0.0, 0.0]), (br, [1.0, 0.0]), (tl, [0.0, 1.0]), (tr, [1.0, 1.0])] {
        out.extend_from_slice(&p.to_array());
        out.extend_from_slice(&uv);
    }
    out
}

/// Vertex indices of the independent triangles described by `kind`.
///
/// Strips alternate the first two indices so every triangle keeps the
/// winding of the first one.
pub fn triangle_indices(count: usize, kind: TrisDrawType) -> Vec<[usize; 3]> {
    match kind {
        TrisDrawType::List => (0..count / 3).map(|t| [3 * t, 3 * t + 1, 3 * t + 2]).collect(),
        TrisDrawType::Strip => (0..count.saturating_sub(2))
            .map(|i| if i % 2 == 0 { [i, i + 1, i + 2] } else { [i + 1, i, i + 2] })
            .collect(),
        TrisDrawType::Fan => (1..count.saturating_sub(1)).map(|i| [0, i, i + 1]).collect(),
    }
}

/// Expands strip or fan data into an independent triangle list.
pub fn triangle_list(
    data: &[f32],
    stride: usize,
    kind: TrisDrawType,
) -> Result<Vec<f32>, DrawError> {
    let count = vertex_count(data, stride, 3)?;
    let triangles = triangle_indices(count, kind);
    let mut out = Vec::with_capacity(triangles.len() * 3 * stride);
    for tri in triangles {
        for i in tri {
            out.extend_from_slice(vertex(data, stride, i));
        }
    }
    Ok(out)
}

/// Edges of every triangle as a `POS_COLOR` line list.
///
/// Shared edges are emitted once per triangle.
pub fn wireframe_edges(
    data: &[f32],
    stride: usize,
    kind: TrisDrawType,
) -> Result<Vec<f32>, DrawError> {
    let count = vertex_count(data, stride, POS_COLOR)?;
    let triangles = triangle_indices(count, kind);
    let mut out = Vec::with_capacity(triangles.len() * 6 * POS_COLOR);
    for [a, b, c] in triangles {
        for (from, to) in [(a, b), (b, c), (c, a)] {
            out.extend_from_slice(&vertex(data, stride, from)[..POS_COLOR]);
            out.extend_from_slice(&vertex(data, stride, to)[..POS_COLOR]);
        }
    }
    Ok(out)
}

/// Vertex index pairs of the segments described by `kind`.
pub fn segment_indices(count: usize, kind: LineDrawType) -> Vec<(usize, usize)> {
    match kind {
        LineDrawType::List => (0..count / 2).map(|s| (2 * s, 2 * s + 1)).collect(),
        LineDrawType::Strip => (0..count.saturating_sub(1)).map(|i| (i, i + 1)).collect(),
        LineDrawType::Loop if count < 2 => Vec::new(),
        LineDrawType::Loop => (0..count).map(|i| (i, (i + 1) % count)).collect(),
    }
}

/// Expands strip or loop data into an independent `POS_COLOR` segment list.
pub fn line_segments(data: &[f32], kind: LineDrawType) -> Result<Vec<f32>, DrawError> {
    let count = vertex_count(data, POS_COLOR, POS_COLOR)?;
    let mut out = Vec::new();
    for (a, b) in segment_indices(count, kind) {
        out.extend_from_slice(vertex(data, POS_COLOR, a));
        out.extend_from_slice(vertex(data, POS_COLOR, b));
    }
    Ok(out)
}

/// A line vertex after projection: pixel position plus the NDC depth needed
/// to map offsets back.
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    pixel: Vec2,
    ndc_z: f32,
}

impl ScreenVertex {
    /// `None` for points behind the eye.
    fn project(mvp: &Mat4, p: Vec3, size: Vec2) -> Option<Self> {
        let clip = *mvp * Vec4::point(p);
        if clip.w <= EPSILON {
            return None;
        }
        let ndc = clip.dehomogenize();
        Some(Self {
            pixel: Vec2::new((ndc.x + 1.0) * 0.5 * size.x, (ndc.y + 1.0) * 0.5 * size.y),
            ndc_z: ndc.z,
        })
    }

    /// Object-space position of this vertex moved by `offset` pixels.
    fn unproject(self, inverse: &Mat4, offset: Vec2, size: Vec2) -> Vec3 {
        let p = self.pixel + offset;
        let ndc = Vec3::new(p.x / size.x * 2.0 - 1.0, p.y / size.y * 2.0 - 1.0, self.ndc_z);
        inverse.transform_point(ndc)
    }
}

/// Triangulates `POS_COLOR` line data into quads `thickness` pixels wide.
///
/// Widths are measured on screen: each vertex is projected with `mvp`,
/// offset perpendicular to the line (mitred at strip and loop joints) and
/// mapped back with `mvp⁻¹`, so the output is drawn with the same `mvp`.
/// Segments touching a vertex behind the eye are skipped.
pub fn thick_lines(
    data: &[f32],
    kind: LineDrawType,
    thickness: f32,
    mvp: &Mat4,
    viewport: &Viewport,
) -> Result<Vec<f32>, DrawError> {
    let count = vertex_count(data, POS_COLOR, POS_COLOR)?;
    let inverse = mvp.inverse();
    let size = Vec2::new(viewport.width as f32, viewport.height as f32);
    let half = thickness * 0.5;

    let screen: Vec<Option<ScreenVertex>> = (0..count)
        .map(|i| ScreenVertex::project(mvp, position(vertex(data, POS_COLOR, i)), size))
        .collect();
    let unproject = |v: ScreenVertex, offset: Vec2| v.unproject(&inverse, offset, size);

    let segments = segment_indices(count, kind);
    let mut out = Vec::with_capacity(segments.len() * 6 * POS_COLOR);

    for (s, &(a, b)) in segments.iter().enumerate() {
        let (Some(va), Some(vb)) = (screen[a], screen[b]) else {
            log::debug!("skipping line segment {}-{} behind the eye", a, b);
            continue;
        };
        let Ok(dir) = (vb.pixel - va.pixel).try_normalize() else {
            continue;
        };
        let normal = dir.perp();

        // neighbours only exist for connected topologies
        let (prev, next) = match kind {
            LineDrawType::List => (None, None),
            LineDrawType::Strip => (
                s.checked_sub(1).map(|p| segments[p].0),
                segments.get(s + 1).map(|n| n.1),
            ),
            LineDrawType::Loop => (
                Some(segments[(s + segments.len() - 1) % segments.len()].0),
                Some(segments[(s + 1) % segments.len()].1),
            ),
        };

        let start = prev
            .and_then(|p| screen[p])
            .map_or(normal * half, |vp| miter(va.pixel - vp.pixel, dir, half));
        let end = next
            .and_then(|n| screen[n])
            .map_or(normal * half, |vn| miter(dir, vn.pixel - vb.pixel, half));

        let ca = color(vertex(data, POS_COLOR, a));
        let cb = color(vertex(data, POS_COLOR, b));
        let a_left = unproject(va, start);
        let a_right = unproject(va, -start);
        let b_left = unproject(vb, end);
        let b_right = unproject(vb, -end);

        push_vertex(&mut out, a_left, ca);
        push_vertex(&mut out, a_right, ca);
        push_vertex(&mut out, b_left, cb);
        push_vertex(&mut out, b_left, cb);
        push_vertex(&mut out, a_right, ca);
        push_vertex(&mut out, b_right, cb);
    }

    Ok(out)
}

/// Expands `POS_COLOR` points into squares `point_size` pixels across, two
/// triangles per point, in the same object space as `data`. Points behind
/// the eye are dropped.
pub fn point_quads(
    data: &[f32],
    point_size: f32,
    mvp: &Mat4,
    viewport: &Viewport,
) -> Result<Vec<f32>, DrawError> {
    let count = vertex_count(data, POS_COLOR, POS_COLOR)?;
    let inverse = mvp.inverse();
    let size = Vec2::new(viewport.width as f32, viewport.height as f32);
    let half = point_size * 0.5;
    let mut out = Vec::with_capacity(count * 6 * POS_COLOR);

    for i in 0..count {
        let v = vertex(data, POS_COLOR, i);
        let Some(center) = ScreenVertex::project(mvp, position(v), size) else {
            continue;
        };
        let corner = |dx: f32, dy: f32| {
            center.unproject(&inverse, Vec2::new(dx * half, dy * half), size)
        };
        let bl = corner(-1.0, -1.0);
        let br = corner(1.0, -1.0);
        let tl = corner(-1.0, 1.0);
        let tr = corner(1.0, 1.0);
        let c = color(v);
        for p in [bl, br, tl, tl, br, tr] {
            push_vertex(&mut out, p, c);
        }
    }

    Ok(out)
}

/// Offset at the joint between an incoming and an outgoing direction.
fn miter(incoming: Vec2, outgoing: Vec2, half: f32) -> Vec2 {
    let n_out = outgoing.normalize().perp();
    let Ok(n_in) = incoming.try_normalize().map(Vec2::perp) else {
        return n_out * half;
    };
    match (n_in + n_out).try_normalize() {
        Ok(m) => m * (half / m.dot(n_out).max(MIN_MITER_COS)),
        // the line doubles back on itself
        Err(_) => n_out * half,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);

    fn line(points: &[(f32, f32)]) -> Vec<f32> {
        let mut out = Vec::new();
        for &(x, y) in points {
            push_vertex(&mut out, Vec3::new(x, y, 0.0), WHITE);
        }
        out
    }

    fn positions(data: &[f32], stride: usize) -> Vec<Vec3> {
        data.chunks(stride).map(position).collect()
    }

    #[test]
    fn test_rect_vertices() {
        let data = rect_vertices_2d(WHITE, Vec2::new(-1.0, -0.5), Vec2::new(1.0, 0.5));
        assert_eq!(data.len(), 4 * POS_COLOR);
        assert_eq!(
            positions(&data, POS_COLOR),
            vec![
                Vec3::new(-1.0, -0.5, 0.0),
                Vec3::new(1.0, -0.5, 0.0),
                Vec3::new(-1.0, 0.5, 0.0),
                Vec3::new(1.0, 0.5, 0.0),
            ]
        );
        assert_eq!(&data[3..7], &[1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_image_quad_uvs() {
        let quad = image_quad(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        );
        assert_eq!(quad.len(), 4 * POS_UV);
        assert_eq!(&quad[3..5], &[0.0, 0.0]);
        assert_eq!(&quad[18..20], &[1.0, 1.0]);
    }

    #[test]
    fn test_strip_keeps_winding() {
        assert_eq!(
            triangle_indices(5, TrisDrawType::Strip),
            vec![[0, 1, 2], [2, 1, 3], [2, 3, 4]]
        );
        assert_eq!(triangle_indices(5, TrisDrawType::Fan), vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]);
        assert_eq!(triangle_indices(7, TrisDrawType::List), vec![[0, 1, 2], [3, 4, 5]]);
        assert!(triangle_indices(2, TrisDrawType::Strip).is_empty());
    }

    #[test]
    fn test_triangle_list_from_rect_strip() {
        let rect = rect_vertices_2d(WHITE, Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let list = triangle_list(&rect, POS_COLOR, TrisDrawType::Strip).unwrap();
        assert_eq!(list.len(), 6 * POS_COLOR);
        let p = positions(&list, POS_COLOR);
        assert_eq!(p[3], Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(p[4], Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_wireframe_edges_drop_normals() {
        let mut lit = Vec::new();
        for p in [Vec3::ZERO, Vec3::X, Vec3::Y] {
            push_lit_vertex(&mut lit, p, WHITE, Vec3::Z);
        }
        let edges = wireframe_edges(&lit, POS_COLOR_NORMAL, TrisDrawType::List).unwrap();
        assert_eq!(edges.len(), 6 * POS_COLOR);
        let p = positions(&edges, POS_COLOR);
        assert_eq!(p, vec![Vec3::ZERO, Vec3::X, Vec3::X, Vec3::Y, Vec3::Y, Vec3::ZERO]);
    }

    #[test]
    fn test_misaligned_data() {
        let err = wireframe_edges(&[0.0; 8], POS_COLOR, TrisDrawType::List).unwrap_err();
        assert_eq!(err, DrawError::Misaligned { len: 8, stride: 7 });
        assert_eq!(
            wireframe_edges(&[0.0; 6], 3, TrisDrawType::List).unwrap_err(),
            DrawError::StrideTooSmall(3)
        );
        assert!(triangle_list(&[0.0; 15], POS_UV, TrisDrawType::List).is_ok());
    }

    #[test]
    fn test_line_segments() {
        let data = line(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let strip = line_segments(&data, LineDrawType::Strip).unwrap();
        assert_eq!(strip.len(), 4 * POS_COLOR);
        let closed = line_segments(&data, LineDrawType::Loop).unwrap();
        let p = positions(&closed, POS_COLOR);
        assert_eq!(p.len(), 6);
        assert_eq!(p[4], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(p[5], Vec3::ZERO);
    }

    #[test]
    fn test_thick_line_width_in_pixels() {
        let data = line(&[(-0.5, 0.0), (0.5, 0.0)]);
        let viewport = Viewport::new(100, 100);
        let tris =
            thick_lines(&data, LineDrawType::List, 10.0, &Mat4::identity(), &viewport).unwrap();
        let p = positions(&tris, POS_COLOR);
        assert_eq!(p.len(), 6);
        // 5 px on a 100 px viewport is 0.1 in NDC
        assert!(p[0].approx_eq(Vec3::new(-0.5, 0.1, 0.0), 1e-5));
        assert!(p[1].approx_eq(Vec3::new(-0.5, -0.1, 0.0), 1e-5));
        assert!(p[5].approx_eq(Vec3::new(0.5, -0.1, 0.0), 1e-5));
    }

    #[test]
    fn test_thick_line_miter_joint() {
        let data = line(&[(-0.5, 0.0), (0.5, 0.0), (0.5, 0.5)]);
        let viewport = Viewport::new(100, 100);
        let tris =
            thick_lines(&data, LineDrawType::Strip, 10.0, &Mat4::identity(), &viewport).unwrap();
        let p = positions(&tris, POS_COLOR);
        assert_eq!(p.len(), 12);
        // end of the first segment sits on the mitre of the right angle
        assert!(p[2].approx_eq(Vec3::new(0.4, 0.1, 0.0), 1e-5));
        assert!(p[5].approx_eq(Vec3::new(0.6, -0.1, 0.0), 1e-5));
        // start of the second segment shares the joint
        assert!(p[6].approx_eq(p[2], 1e-5));
    }

    #[test]
    fn test_point_quads() {
        let data = line(&[(0.0, 0.0), (0.5, -0.5)]);
        let viewport = Viewport::new(100, 100);
        let tris = point_quads(&data, 10.0, &Mat4::identity(), &viewport).unwrap();
        let p = positions(&tris, POS_COLOR);
        assert_eq!(p.len(), 12);
        assert!(p[0].approx_eq(Vec3::new(-0.1, -0.1, 0.0), 1e-5));
        assert!(p[5].approx_eq(Vec3::new(0.1, 0.1, 0.0), 1e-5));
        assert!(p[11].approx_eq(Vec3::new(0.6, -0.4, 0.0), 1e-5));
        assert_eq!(&tris[3..7], &[1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_point_behind_eye_is_dropped() {
        let mut data = Vec::new();
        push_vertex(&mut data, Vec3::new(0.0, 0.0, -5.0), WHITE);
        push_vertex(&mut data, Vec3::new(0.0, 0.0, 5.0), WHITE);
        let mvp = Mat4::perspective(60.0, 1.0, 0.1, 100.0);
        let tris = point_quads(&data, 4.0, &mvp, &Viewport::new(64, 64)).unwrap();
        assert_eq!(tris.len(), 6 * POS_COLOR);
        assert!(positions(&tris, POS_COLOR).iter().all(|p| (p.z + 5.0).abs() < 1e-3));
        assert_eq!(
            point_quads(&[0.0; 5], 1.0, &mvp, &Viewport::new(8, 8)).unwrap_err(),
            DrawError::Misaligned { len: 5, stride: 7 }
        );
    }

    #[test]
    fn test_thick_line_survives_transform() {
        let data = line(&[(0.0, 0.0), (2.0, 0.0)]);
        let mvp = Mat4::perspective(90.0, 1.0, 0.1, 10.0) * Mat4::translation_xyz(-1.0, 0.0, -2.0);
        let viewport = Viewport::new(200, 200);
        let tris = thick_lines(&data, LineDrawType::List, 4.0, &mvp, &viewport).unwrap();
        for v in positions(&tris, POS_COLOR) {
            let back = mvp.transform_point(v);
            // every corner lies 2 px (0.02 NDC) from the projected line
            assert!((back.y.abs() - 0.02).abs() < 1e-4, "{:?}", back);
            assert!(v.z.abs() < 1e-4);
        }
    }
}
