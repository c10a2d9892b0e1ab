//! ASCII rasterizer for terminal rendering

use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use glkit_core::draw::{point_quads, thick_lines, triangle_list, wireframe_edges, POS_COLOR};
use glkit_core::projection::project_to_viewport;
use glkit_core::{
    DrawError, LineDrawType, Mat4, Mesh, ScreenPoint, TrisDrawType, Vec3, Vec4, Viewport,
};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Glyph for a brightness in `[0, 1]`. Covered cells never come out blank.
pub fn glyph_for(brightness: f32) -> char {
    let steps = (LUMINOSITY_RAMP.len() - 2) as f32;
    let index = 1 + (brightness.clamp(0.0, 1.0) * steps).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

fn to_color(color: Vec4) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(color.x),
        g: channel(color.y),
        b: channel(color.z),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
}

const EMPTY: Cell = Cell {
    glyph: ' ',
    color: Color::Reset,
};

/// ASCII renderer that converts projected triangles to terminal characters
pub struct AsciiRenderer {
    viewport: Viewport,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(viewport: Viewport) -> Self {
        let size = viewport.width as usize * viewport.height as usize;
        Self {
            viewport,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![EMPTY; size],
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport.width = width;
        self.viewport.height = height;
        let size = width as usize * height as usize;
        self.depth_buffer.resize(size, f32::INFINITY);
        self.cells.resize(size, EMPTY);
        self.clear();
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(EMPTY);
    }

    pub fn glyph_at(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.cells[y * self.width() + x].glyph)
    }

    /// Number of cells covered by something.
    pub fn covered(&self) -> usize {
        self.cells.iter().filter(|c| c.glyph != ' ').count()
    }

    fn width(&self) -> usize {
        self.viewport.width as usize
    }

    fn height(&self) -> usize {
        self.viewport.height as usize
    }

    /// Rasterizes every triangle of `mesh`, shading each with `shade`.
    pub fn render_mesh<F>(&mut self, mesh: &Mesh, mvp: &Mat4, color: Vec4, shade: F)
    where
        F: Fn(&glkit_core::Triangle) -> f32,
    {
        let color = to_color(color);
        for triangle in &mesh.triangles {
            let positions = triangle.vertices.map(|v| v.position);
            self.fill_triangle(mvp, positions, glyph_for(shade(triangle)), color);
        }
    }

    /// Draws interleaved `x y z r g b a ..` vertex data; each triangle takes
    /// the average colour of its corners.
    pub fn draw_arrays(
        &mut self,
        data: &[f32],
        stride: usize,
        kind: TrisDrawType,
        mvp: &Mat4,
        brightness: f32,
    ) -> Result<(), DrawError> {
        if stride < POS_COLOR {
            return Err(DrawError::StrideTooSmall(stride));
        }
        let list = triangle_list(data, stride, kind)?;
        let glyph = glyph_for(brightness);
        for triangle in list.chunks_exact(3 * stride) {
            let corner = |i: usize| &triangle[i * stride..(i + 1) * stride];
            let positions = [0, 1, 2].map(|i| Vec3::new(corner(i)[0], corner(i)[1], corner(i)[2]));
            let color = [0, 1, 2]
                .map(|i| Vec4::new(corner(i)[3], corner(i)[4], corner(i)[5], corner(i)[6]))
                .into_iter()
                .fold(Vec4::ZERO, |acc, c| acc + c / 3.0);
            self.fill_triangle(mvp, positions, glyph, to_color(color));
        }
        Ok(())
    }

    /// Outlines the triangles of `POS_COLOR` data with lines `thickness`
    /// cells wide.
    pub fn draw_outline(
        &mut self,
        data: &[f32],
        kind: TrisDrawType,
        thickness: f32,
        mvp: &Mat4,
    ) -> Result<(), DrawError> {
        let edges = wireframe_edges(data, POS_COLOR, kind)?;
        let quads = thick_lines(&edges, LineDrawType::List, thickness, mvp, &self.viewport)?;
        self.draw_arrays(&quads, POS_COLOR, TrisDrawType::List, mvp, 1.0)
    }

    /// Draws `POS_COLOR` points as squares `point_size` cells across.
    pub fn draw_points(
        &mut self,
        data: &[f32],
        point_size: f32,
        mvp: &Mat4,
    ) -> Result<(), DrawError> {
        let quads = point_quads(data, point_size, mvp, &self.viewport)?;
        self.draw_arrays(&quads, POS_COLOR, TrisDrawType::List, mvp, 1.0)
    }

    /// Projects and fills one triangle. Triangles with a corner behind the
    /// eye or outside the depth range are dropped whole.
    pub fn fill_triangle(&mut self, mvp: &Mat4, positions: [Vec3; 3], glyph: char, color: Color) {
        let mut screen = [ScreenPoint {
            x: 0.0,
            y: 0.0,
            depth: 0.0,
        }; 3];
        for (out, p) in screen.iter_mut().zip(positions) {
            match project_to_viewport(mvp, p, &self.viewport) {
                Some(point) => *out = point,
                None => return,
            }
        }
        self.rasterize_triangle(&screen, Cell { glyph, color });
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenPoint; 3], cell: Cell) {
        let [v0, v1, v2] = *coords;
        if self.width() == 0 || self.height() == 0 {
            return;
        }

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0) as i64;
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i64).min(self.width() as i64 - 1);
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0) as i64;
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i64).min(self.height() as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);

                let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), p)
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let idx = y as usize * self.width() + x as usize;
                // later draws win ties so outlines sit on top of their fill
                if depth <= self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.cells[idx] = cell;
                }
            }
        }
    }

    /// Queues the frame starting at row `top`.
    pub fn draw<W: Write>(&self, writer: &mut W, top: u16) -> std::io::Result<()> {
        let mut current = None;
        for (y, row) in self.cells.chunks(self.width().max(1)).enumerate() {
            writer.queue(MoveTo(0, top + y as u16))?;
            for cell in row {
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.glyph))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
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
    use glkit_core::draw::push_vertex;

    fn renderer() -> AsciiRenderer {
        AsciiRenderer::new(Viewport::new(20, 10))
    }

    /// Quad covering the whole NDC square at depth `z`, as a triangle strip.
    fn screen_quad(z: f32, color: Vec4) -> Vec<f32> {
        let mut data = Vec::new();
        for (x, y) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
            push_vertex(&mut data, Vec3::new(x, y, z), color);
        }
        data
    }

    #[test]
    fn test_glyph_ramp() {
        assert_eq!(glyph_for(0.0), '.');
        assert_eq!(glyph_for(1.0), '@');
        assert_eq!(glyph_for(7.0), '@');
        assert_eq!(glyph_for(f32::NAN), '.');
    }

    #[test]
    fn test_fill_covers_viewport() {
        let mut r = renderer();
        let white = Vec4::splat(1.0);
        let quad = screen_quad(0.0, white);
        r.draw_arrays(&quad, POS_COLOR, TrisDrawType::Strip, &Mat4::identity(), 1.0)
            .unwrap();
        assert_eq!(r.covered(), 200);
        assert_eq!(r.glyph_at(0, 0), Some('@'));
        assert_eq!(r.glyph_at(20, 0), None);
    }

    #[test]
    fn test_depth_test_keeps_nearest() {
        let mut r = renderer();
        let near = screen_quad(-0.5, Vec4::splat(1.0));
        let far = screen_quad(0.5, Vec4::splat(1.0));
        r.draw_arrays(&near, POS_COLOR, TrisDrawType::Strip, &Mat4::identity(), 0.0).unwrap();
        r.draw_arrays(&far, POS_COLOR, TrisDrawType::Strip, &Mat4::identity(), 1.0).unwrap();
        assert_eq!(r.glyph_at(10, 5), Some('.'));
    }

    #[test]
    fn test_triangle_behind_eye_is_dropped() {
        let mut r = renderer();
        let mvp = Mat4::perspective(60.0, 2.0, 0.1, 10.0);
        r.fill_triangle(&mvp, [Vec3::new(-1.0, 0.0, 1.0), Vec3::X, Vec3::Y], '#', Color::White);
        assert_eq!(r.covered(), 0);
    }

    #[test]
    fn test_outline_leaves_interior_alone() {
        let mut r = AsciiRenderer::new(Viewport::new(40, 40));
        let quad = screen_quad(0.0, Vec4::splat(1.0));
        r.draw_arrays(&quad, POS_COLOR, TrisDrawType::Strip, &Mat4::uniform_scaling(0.8), 0.0)
            .unwrap();
        r.draw_outline(&quad, TrisDrawType::Strip, 2.0, &Mat4::uniform_scaling(0.8)).unwrap();
        // border of the scaled quad is drawn bright, the corner of the
        // interior away from the diagonal stays dim
        assert_eq!(r.glyph_at(4, 20), Some('@'));
        assert_eq!(r.glyph_at(10, 30), Some('.'));
    }

    #[test]
    fn test_points_are_square_blocks() {
        let mut r = AsciiRenderer::new(Viewport::new(20, 20));
        let mut data = Vec::new();
        push_vertex(&mut data, Vec3::ZERO, Vec4::new(0.0, 1.0, 0.0, 1.0));
        r.draw_points(&data, 4.0, &Mat4::identity()).unwrap();
        assert_eq!(r.glyph_at(9, 9), Some('@'));
        assert_eq!(r.glyph_at(10, 10), Some('@'));
        assert_eq!(r.glyph_at(12, 12), Some(' '));
        assert!(r.covered() <= 16);
    }

    #[test]
    fn test_rejects_short_stride() {
        let mut r = renderer();
        assert_eq!(
            r.draw_arrays(&[0.0; 9], 3, TrisDrawType::List, &Mat4::identity(), 1.0),
            Err(DrawError::StrideTooSmall(3))
        );
    }

    #[test]
    fn test_resize_and_draw() {
        let mut r = renderer();
        r.resize(4, 2);
        r.draw_arrays(
            &screen_quad(0.0, Vec4::new(1.0, 0.0, 0.0, 1.0)),
            POS_COLOR,
            TrisDrawType::Strip,
            &Mat4::identity(),
            1.0,
        )
        .unwrap();
        let mut out = Vec::new();
        r.draw(&mut out, 1).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches('@').count(), 8);
    }
}
