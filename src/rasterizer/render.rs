//! Scanline triangle rasterization
//!
//! Each triangle is edge-walked into per-row spans (leftmost and rightmost
//! crossing, each with its own interpolated color and texture coordinate),
//! then every span is filled left to right. Rows 0 and `height - 1`, and
//! column 0, are never written.

use super::framebuffer::Framebuffer;
use super::types::{Color, Polygon, RasterMode, TexCoord, Vertex};
use crate::model::IndexedTexture;

/// Coordinates beyond this are clamped before conversion to pixel indices
const PIXEL_LIMIT: f32 = 1.0e9;

/// A triangle corner in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub x: f32,
    pub y: f32,
    pub color: Color,
    pub uv: TexCoord,
}

impl Corner {
    pub fn new(x: f32, y: f32, color: Color, uv: TexCoord) -> Self {
        Self { x, y, color, uv }
    }
}

/// An edge crossing on one scanline
#[derive(Debug, Clone, Copy)]
struct EdgePoint {
    x: f32,
    r: f32,
    g: f32,
    b: f32,
    u: f32,
    v: f32,
}

impl EdgePoint {
    fn unset(x: f32) -> Self {
        Self { x, r: 0.0, g: 0.0, b: 0.0, u: 0.0, v: 0.0 }
    }
}

#[derive(Debug, Clone, Copy)]
struct Scanline {
    start: EdgePoint,
    end: EdgePoint,
}

impl Scanline {
    fn reset(&mut self) {
        self.start = EdgePoint::unset(f32::INFINITY);
        self.end = EdgePoint::unset(f32::NEG_INFINITY);
    }
}

fn to_pixel(v: f32) -> i64 {
    v.clamp(-PIXEL_LIMIT, PIXEL_LIMIT) as i64
}

/// Scanline rasterizer. Owns one span record per frame row.
pub struct Rasterizer {
    scanlines: Vec<Scanline>,
    pub mode: RasterMode,
}

impl Rasterizer {
    pub fn new(num_lines: usize, mode: RasterMode) -> Self {
        let mut line = Scanline {
            start: EdgePoint::unset(0.0),
            end: EdgePoint::unset(0.0),
        };
        line.reset();
        Self {
            scanlines: vec![line; num_lines],
            mode,
        }
    }

    /// Drawable row range [first, last): row 0 and the last row are skipped
    fn clip_rows(&self, top: i64, bottom: i64) -> (i64, i64) {
        let last = self.scanlines.len().saturating_sub(1) as i64;
        (top.max(1), bottom.min(last))
    }

    /// Draw faces in `order`. With `cull` set, back-facing faces are skipped;
    /// with `flat` set, each face uses its lit color at all three corners.
    /// Returns the number of triangles drawn.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_mesh(
        &mut self,
        fb: &mut Framebuffer,
        faces: &[Polygon],
        order: &[usize],
        vertices: &[Vertex],
        texcoords: &[TexCoord],
        texture: &IndexedTexture,
        cull: bool,
        flat: bool,
    ) -> usize {
        let mut drawn = 0;
        for &face_idx in order {
            let face = &faces[face_idx];
            if cull && face.backfacing {
                continue;
            }

            let corner = |k: usize| {
                let vert = &vertices[face.indices[k]];
                let color = if flat { face.lit_color } else { vert.color };
                Corner::new(
                    vert.position.x,
                    vert.position.y,
                    color,
                    texcoords[face.uv_indices[k]],
                )
            };

            self.fill_triangle(fb, [corner(0), corner(1), corner(2)], Some(texture));
            drawn += 1;
        }
        drawn
    }

    /// Scan-convert and fill one triangle. `texture` is ignored in
    /// `RasterMode::Solid`; a textured fill without a texture falls back to
    /// solid.
    pub fn fill_triangle(
        &mut self,
        fb: &mut Framebuffer,
        corners: [Corner; 3],
        texture: Option<&IndexedTexture>,
    ) {
        let mut ymin = to_pixel(corners[0].y);
        let mut ymax = to_pixel(corners[2].y);
        for c in &corners {
            ymin = ymin.min(to_pixel(c.y));
            ymax = ymax.max(to_pixel(c.y));
        }

        let (first, last) = self.clip_rows(ymin, ymax);
        for row in first..last {
            self.scanlines[row as usize].reset();
        }

        self.scan_edge(&corners[0], &corners[1]);
        self.scan_edge(&corners[1], &corners[2]);
        self.scan_edge(&corners[2], &corners[0]);

        let texture = match self.mode {
            RasterMode::Textured => texture,
            RasterMode::Solid => None,
        };
        self.draw_spans(fb, first, last, texture);
    }

    /// DDA walk from the upper to the lower endpoint, widening each row's span
    fn scan_edge(&mut self, a: &Corner, b: &Corner) {
        if a.y == b.y {
            return;
        }
        let (top, bottom) = if a.y > b.y { (b, a) } else { (a, b) };

        let dy = bottom.y - top.y;
        if !(dy > 0.0 && dy.is_finite()) {
            return;
        }

        let dx_dy = (bottom.x - top.x) / dy;
        let dr_dy = (bottom.color.r as f32 - top.color.r as f32) / dy;
        let dg_dy = (bottom.color.g as f32 - top.color.g as f32) / dy;
        let db_dy = (bottom.color.b as f32 - top.color.b as f32) / dy;
        let du_dy = (bottom.uv.u - top.uv.u) / dy;
        let dv_dy = (bottom.uv.v - top.uv.v) / dy;

        let top_row = to_pixel(top.y);
        let (first, last) = self.clip_rows(top_row, to_pixel(bottom.y));
        if first >= last {
            return;
        }

        // Pre-step from the unclamped start row
        let skip = first as f32 - top.y.trunc();
        let mut x = top.x + dx_dy * skip;
        let mut r = top.color.r as f32 + dr_dy * skip;
        let mut g = top.color.g as f32 + dg_dy * skip;
        let mut b = top.color.b as f32 + db_dy * skip;
        let mut u = top.uv.u + du_dy * skip;
        let mut v = top.uv.v + dv_dy * skip;

        for row in first..last {
            let point = EdgePoint { x, r, g, b, u, v };
            let line = &mut self.scanlines[row as usize];
            if x < line.start.x {
                line.start = point;
            }
            if x > line.end.x {
                line.end = point;
            }
            x += dx_dy;
            r += dr_dy;
            g += dg_dy;
            b += db_dy;
            u += du_dy;
            v += dv_dy;
        }
    }

    fn draw_spans(
        &self,
        fb: &mut Framebuffer,
        first: i64,
        last: i64,
        texture: Option<&IndexedTexture>,
    ) {
        let width = fb.width as i64;

        for row in first..last {
            let line = &self.scanlines[row as usize];
            // Rows no edge reached keep their reset sentinels
            if !(line.start.x <= line.end.x) {
                continue;
            }
            let (start, end) = (&line.start, &line.end);

            let xs = to_pixel(start.x);
            let xe = to_pixel(end.x);
            let dx = xe - xs;
            if dx == 0 {
                continue;
            }
            let span = dx as f32;

            let dr_dx = (end.r - start.r) / span;
            let dg_dx = (end.g - start.g) / span;
            let db_dx = (end.b - start.b) / span;
            let du_dx = (end.u - start.u) / span;
            let dv_dx = (end.v - start.v) / span;

            let x0 = xs.max(1);
            let x1 = xe.min(width);
            if x0 >= x1 {
                continue;
            }

            let skip = (x0 - xs) as f32;
            let mut r = start.r + dr_dx * skip;
            let mut g = start.g + dg_dx * skip;
            let mut b = start.b + db_dx * skip;
            let mut u = start.u + du_dx * skip;
            let mut v = start.v + dv_dx * skip;

            for x in x0..x1 {
                let color = match texture {
                    Some(tex) => modulate(r, g, b, tex.sample(u, v)),
                    None => Color::new(channel(r), channel(g), channel(b)),
                };
                fb.set_pixel(x as usize, row as usize, color);

                r += dr_dx;
                g += dg_dx;
                b += db_dx;
                u += du_dx;
                v += dv_dx;
            }
        }
    }
}

fn channel(c: f32) -> u8 {
    c.clamp(0.0, 255.0) as u8
}

/// 255 * (shade / 255) * (texel / 255), kept in an order that is exact for
/// a white texel
fn modulate(r: f32, g: f32, b: f32, texel: Color) -> Color {
    Color::new(
        channel(r * texel.r as f32 / 255.0),
        channel(g * texel.g as f32 / 255.0),
        channel(b * texel.b as f32 / 255.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Color = Color::BLACK;

    fn frame(w: usize, h: usize) -> (Framebuffer, Rasterizer) {
        (Framebuffer::with_color(w, h, BG), Rasterizer::new(h, RasterMode::Solid))
    }

    fn corner(x: f32, y: f32, color: Color) -> Corner {
        Corner::new(x, y, color, TexCoord::default())
    }

    fn solid_triangle(color: Color) -> [Corner; 3] {
        [corner(0.0, 0.0, color), corner(10.0, 0.0, color), corner(0.0, 10.0, color)]
    }

    fn assert_right_triangle(fb: &Framebuffer, color: Color) {
        for y in 0..fb.height {
            for x in 0..fb.width {
                let px = fb.get_pixel(x, y).unwrap();
                let drawable = x >= 1 && y >= 1 && y < fb.height - 1;
                if drawable && x + y < 10 {
                    assert_eq!(px, color, "pixel ({x}, {y}) should be filled");
                } else {
                    assert_eq!(px, BG, "pixel ({x}, {y}) should be untouched");
                }
            }
        }
    }

    #[test]
    fn test_solid_right_triangle_coverage() {
        let (mut fb, mut raster) = frame(16, 16);
        let color = Color::new(200, 100, 50);
        raster.fill_triangle(&mut fb, solid_triangle(color), None);
        assert_right_triangle(&fb, color);
    }

    #[test]
    fn test_textured_white_texel_preserves_color() {
        let (mut fb, mut raster) = frame(16, 16);
        raster.mode = RasterMode::Textured;
        let texture = IndexedTexture::solid(Color::WHITE);
        let color = Color::new(17, 128, 251);
        raster.fill_triangle(&mut fb, solid_triangle(color), Some(&texture));
        assert_right_triangle(&fb, color);
    }

    #[test]
    fn test_edge_order_does_not_matter() {
        let color = Color::new(9, 90, 190);
        let (mut fb_a, mut raster_a) = frame(16, 16);
        let (mut fb_b, mut raster_b) = frame(16, 16);
        let [a, b, c] = solid_triangle(color);
        raster_a.fill_triangle(&mut fb_a, [a, b, c], None);
        raster_b.fill_triangle(&mut fb_b, [c, a, b], None);
        assert_eq!(fb_a.pixels, fb_b.pixels);
    }

    #[test]
    fn test_color_interpolates_across_span() {
        let (mut fb, mut raster) = frame(32, 8);
        let left = Color::new(0, 0, 0);
        let right = Color::new(200, 0, 0);
        raster.fill_triangle(
            &mut fb,
            [corner(0.0, 1.0, left), corner(20.0, 5.0, right), corner(0.0, 5.0, left)],
            None,
        );
        let near = fb.get_pixel(1, 4).unwrap();
        let far = fb.get_pixel(14, 4).unwrap();
        assert!(far.r > near.r);
    }

    #[test]
    fn test_texture_modulation() {
        let (mut fb, mut raster) = frame(16, 16);
        raster.mode = RasterMode::Textured;
        let texture = IndexedTexture::solid(Color::new(255, 0, 128));
        raster.fill_triangle(&mut fb, solid_triangle(Color::new(255, 255, 255)), Some(&texture));
        assert_eq!(fb.get_pixel(2, 2), Some(Color::new(255, 0, 128)));
    }

    #[test]
    fn test_offscreen_triangle_is_bounded() {
        let (mut fb, mut raster) = frame(8, 8);
        let c = Color::WHITE;
        raster.fill_triangle(
            &mut fb,
            [corner(-1.0e12, -5.0e11, c), corner(1.0e12, 3.0, c), corner(4.0, 1.0e12, c)],
            None,
        );
        // Whatever lands on screen, nothing outside the drawable area changes
        for x in 0..8 {
            assert_eq!(fb.get_pixel(x, 0), Some(BG));
            assert_eq!(fb.get_pixel(x, 7), Some(BG));
        }
    }

    #[test]
    fn test_last_row_is_never_written() {
        let (mut fb, mut raster) = frame(8, 8);
        let c = Color::WHITE;
        raster.fill_triangle(
            &mut fb,
            [corner(0.0, 0.0, c), corner(40.0, 0.0, c), corner(0.0, 40.0, c)],
            None,
        );
        for y in 0..8 {
            for x in 0..8 {
                let expected = if x >= 1 && (1..7).contains(&y) { c } else { BG };
                assert_eq!(fb.get_pixel(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_far_top_vertex_keeps_edge_slope() {
        let (mut fb, mut raster) = frame(32, 16);
        let c = Color::WHITE;
        // The long edge is nearly vertical at x ~= 20 across the frame
        raster.fill_triangle(
            &mut fb,
            [corner(0.0, -2.0e9, c), corner(20.0, 8.0, c), corner(0.0, 8.0, c)],
            None,
        );
        for x in 1..=17 {
            assert_eq!(fb.get_pixel(x, 4), Some(c), "pixel ({x}, 4) should be filled");
        }
        assert_eq!(fb.get_pixel(22, 4), Some(BG));
    }

    #[test]
    fn test_texture_coordinates_interpolate() {
        let (mut fb, mut raster) = frame(16, 16);
        raster.mode = RasterMode::Textured;
        // 2x2 checker: (0,0) and (1,1) red, (1,0) and (0,1) blue
        let texture = IndexedTexture::new(2, vec![0, 1, 1, 0], vec![Color::RED, Color::BLUE]).unwrap();
        let c = Color::WHITE;
        raster.fill_triangle(
            &mut fb,
            [
                Corner::new(0.0, 0.0, c, TexCoord::new(0.0, 0.0)),
                Corner::new(16.0, 0.0, c, TexCoord::new(2.0, 0.0)),
                Corner::new(0.0, 16.0, c, TexCoord::new(0.0, 2.0)),
            ],
            Some(&texture),
        );

        // u advances along the span, v down the edge
        assert_eq!(fb.get_pixel(2, 2), Some(Color::RED));
        assert_eq!(fb.get_pixel(12, 2), Some(Color::BLUE));
        assert_eq!(fb.get_pixel(2, 12), Some(Color::BLUE));
    }

    #[test]
    fn test_degenerate_triangle_draws_nothing() {
        let (mut fb, mut raster) = frame(8, 8);
        let c = Color::WHITE;
        raster.fill_triangle(&mut fb, [corner(1.0, 3.0, c), corner(6.0, 3.0, c), corner(3.0, 3.0, c)], None);
        assert!(fb.pixels.chunks(4).all(|p| p == BG.to_bytes()));
    }

    #[test]
    fn test_draw_mesh_skips_backfacing() {
        let (mut fb, mut raster) = frame(16, 16);
        let verts = [
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(10.0, 0.0, 0.0),
            Vertex::new(0.0, 10.0, 0.0),
        ];
        let mut face = Polygon::new([0, 1, 2], [0, 0, 0]);
        face.backfacing = true;
        let texture = IndexedTexture::solid(Color::WHITE);
        let uvs = [TexCoord::default()];

        let drawn = raster.draw_mesh(&mut fb, &[face], &[0], &verts, &uvs, &texture, true, false);
        assert_eq!(drawn, 0);

        let drawn = raster.draw_mesh(&mut fb, &[face], &[0], &verts, &uvs, &texture, false, false);
        assert_eq!(drawn, 1);
        assert_eq!(fb.get_pixel(2, 2), Some(Color::WHITE));
    }

    #[test]
    fn test_draw_mesh_flat_uses_lit_color() {
        let (mut fb, mut raster) = frame(16, 16);
        let verts = [
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(10.0, 0.0, 0.0),
            Vertex::new(0.0, 10.0, 0.0),
        ];
        let mut face = Polygon::new([0, 1, 2], [0, 0, 0]);
        face.lit_color = Color::new(40, 50, 60);
        let texture = IndexedTexture::solid(Color::WHITE);
        raster.draw_mesh(&mut fb, &[face], &[0], &verts, &[TexCoord::default()], &texture, true, true);
        assert_eq!(fb.get_pixel(3, 3), Some(Color::new(40, 50, 60)));
    }
}
