use rand::Rng;

use crate::core::{Quad, SPRITE_SIZE};
use crate::error::{TargenError, TargenResult};
use crate::glyph::{GlyphSource, glyph_origin, glyph_quad};
use crate::model::{GlyphChar, ShapeKind, pick_distinct_colors, pick_glyph, pick_shape};
use crate::shapes::shape_geometry;

/// Row-major premultiplied RGBA8 pixel buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Sprite {
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn from_parts(width: u32, height: u32, data: Vec<u8>) -> TargenResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(TargenError::validation(format!(
                "sprite buffer holds {} bytes, {}x{} rgba8 needs {expected}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Pixel at `(x, y)`; callers must stay in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

/// A rasterized sprite together with the sprite-space quads of its two
/// labeled regions.
#[derive(Clone, Debug)]
pub struct RenderedSprite {
    pub sprite: Sprite,
    pub shape: ShapeKind,
    pub glyph: GlyphChar,
    pub shape_quad: Quad,
    pub glyph_quad: Quad,
}

/// Draw a random shape and glyph onto a transparent 300x300 canvas.
///
/// The glyph is centered on the shape's centroid and always uses a fill
/// color different from the shape's.
pub fn render_sprite(
    rng: &mut impl Rng,
    glyphs: &mut dyn GlyphSource,
) -> TargenResult<RenderedSprite> {
    let shape = pick_shape(rng);
    let glyph = pick_glyph(rng);
    let (shape_color, glyph_color) = pick_distinct_colors(rng);

    let geometry = shape_geometry(shape);
    let side = SPRITE_SIZE as u16;

    let mut ctx = vello_cpu::RenderContext::new(side, side);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        shape_color.rgb.r,
        shape_color.rgb.g,
        shape_color.rgb.b,
        255,
    ));
    let cpu_path = bezpath_to_cpu(&geometry.path);
    ctx.fill_path(&cpu_path);

    let metrics = glyphs.measure(glyph)?;
    let origin = glyph_origin(geometry.centroid, &metrics);
    glyphs.draw(&mut ctx, glyph, origin, glyph_color.rgb)?;

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(side, side);
    ctx.render_to_pixmap(&mut pixmap);

    let sprite = Sprite::from_parts(SPRITE_SIZE, SPRITE_SIZE, pixmap.data_as_u8_slice().to_vec())?;

    Ok(RenderedSprite {
        sprite,
        shape,
        glyph,
        shape_quad: geometry.quad,
        glyph_quad: glyph_quad(origin, &metrics),
    })
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::core::Pt2;
    use crate::glyph::GlyphMetrics;
    use crate::model::Rgb8;

    use super::*;

    /// Fixed-size stub that inks the exact region the glyph box assumes.
    struct RectGlyphs {
        width: f64,
        height: f64,
    }

    impl GlyphSource for RectGlyphs {
        fn measure(&mut self, _glyph: GlyphChar) -> TargenResult<GlyphMetrics> {
            Ok(GlyphMetrics {
                width: self.width,
                height: self.height,
            })
        }

        fn draw(
            &mut self,
            ctx: &mut vello_cpu::RenderContext,
            _glyph: GlyphChar,
            origin: Pt2,
            color: Rgb8,
        ) -> TargenResult<()> {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                color.r, color.g, color.b, 255,
            ));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                origin.x,
                origin.y,
                origin.x + self.width,
                origin.y + self.height,
            ));
            Ok(())
        }
    }

    fn stub() -> RectGlyphs {
        RectGlyphs {
            width: 34.0,
            height: 62.0,
        }
    }

    #[test]
    fn from_parts_rejects_wrong_buffer_length() {
        assert!(Sprite::from_parts(2, 2, vec![0; 15]).is_err());
        assert!(Sprite::from_parts(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn renders_a_full_size_premultiplied_buffer() {
        let mut rng = StdRng::seed_from_u64(3);
        let out = render_sprite(&mut rng, &mut stub()).unwrap();
        assert_eq!(out.sprite.width, SPRITE_SIZE);
        assert_eq!(out.sprite.height, SPRITE_SIZE);
        assert_eq!(
            out.sprite.data.len(),
            SPRITE_SIZE as usize * SPRITE_SIZE as usize * 4
        );
        for px in out.sprite.data.chunks_exact(4) {
            assert!(px[0] <= px[3] && px[1] <= px[3] && px[2] <= px[3]);
        }
    }

    #[test]
    fn shape_centroid_pixel_is_fully_covered() {
        for seed in 0..12 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = render_sprite(&mut rng, &mut stub()).unwrap();
            let c = shape_geometry(out.shape).centroid;
            let px = out.sprite.pixel(c.x as u32, c.y as u32);
            assert_eq!(px[3], 255, "seed {seed} shape {}", out.shape.name());
        }
    }

    #[test]
    fn ink_stays_inside_the_two_quads() {
        for seed in 0..12 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = render_sprite(&mut rng, &mut stub()).unwrap();
            let (s_min, s_max) = out.shape_quad.aabb();
            let (g_min, g_max) = out.glyph_quad.aabb();
            for y in 0..SPRITE_SIZE {
                for x in 0..SPRITE_SIZE {
                    if out.sprite.pixel(x, y)[3] == 0 {
                        continue;
                    }
                    let (fx, fy) = (f64::from(x), f64::from(y));
                    let in_shape = fx >= s_min.x - 1.0
                        && fx <= s_max.x + 1.0
                        && fy >= s_min.y - 1.0
                        && fy <= s_max.y + 1.0;
                    let in_glyph = fx >= g_min.x - 1.0
                        && fx <= g_max.x + 1.0
                        && fy >= g_min.y - 1.0
                        && fy <= g_max.y + 1.0;
                    assert!(
                        in_shape || in_glyph,
                        "seed {seed}: ink at ({x},{y}) outside both quads"
                    );
                }
            }
        }
    }

    #[test]
    fn same_seed_renders_identical_sprites() {
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        let out_a = render_sprite(&mut a, &mut stub()).unwrap();
        let out_b = render_sprite(&mut b, &mut stub()).unwrap();
        assert_eq!(out_a.sprite.data, out_b.sprite.data);
        assert_eq!(out_a.shape, out_b.shape);
        assert_eq!(out_a.glyph, out_b.glyph);
    }
}
