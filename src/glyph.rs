use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

use crate::core::{Pt2, Quad};
use crate::error::{TargenError, TargenResult};
use crate::model::{GlyphChar, Rgb8};

/// Font size used for every sprite glyph.
pub const GLYPH_FONT_SIZE: f32 = 60.0;

/// Padding in pixels added above and below the glyph box.
pub const BOX_PAD: f64 = 5.0;

/// Side of the scratch canvas ink extents are measured on.
const MEASURE_CANVAS: u16 = 256;

/// Layout origin on the scratch canvas; leaves room for negative bearings.
const MEASURE_ORIGIN: f64 = 64.0;

/// Tight pixel extent of a glyph's rendered ink.
#[derive(Clone, Copy, Debug)]
pub struct GlyphMetrics {
    pub width: f64,
    pub height: f64,
}

/// Measures and rasterizes single glyphs onto a render context.
///
/// `measure` reports the extent of the glyph's visible ink and `draw`
/// places that ink with its top-left corner at `origin`. The production
/// implementation shapes real font data through Parley; tests substitute
/// a fixed-size stub so no font file is required.
pub trait GlyphSource {
    fn measure(&mut self, glyph: GlyphChar) -> TargenResult<GlyphMetrics>;

    fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        glyph: GlyphChar,
        origin: Pt2,
        color: Rgb8,
    ) -> TargenResult<()>;
}

/// Top-left ink corner that centers a glyph's ink on `centroid`.
pub fn glyph_origin(centroid: Pt2, metrics: &GlyphMetrics) -> Pt2 {
    Pt2::new(
        centroid.x - metrics.width / 2.0,
        centroid.y - metrics.height / 2.0,
    )
}

/// Padded corner quad around the glyph ink drawn from `origin`.
pub fn glyph_quad(origin: Pt2, metrics: &GlyphMetrics) -> Quad {
    Quad::from_rect(
        origin.x,
        origin.y - BOX_PAD,
        origin.x + metrics.width,
        origin.y + metrics.height + BOX_PAD,
    )
}

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Ink bounds of one glyph relative to its Parley layout origin.
#[derive(Clone, Copy, Debug)]
struct InkBox {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

/// [`GlyphSource`] backed by Parley shaping of caller-provided font bytes.
pub struct ParleyGlyphSource {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<GlyphBrush>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
    ink_cache: HashMap<GlyphChar, InkBox>,
}

impl ParleyGlyphSource {
    pub fn from_bytes(font_bytes: Vec<u8>) -> TargenResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            TargenError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| TargenError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
            ink_cache: HashMap::new(),
        })
    }

    pub fn from_path(path: &Path) -> TargenResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    /// Primary family name detected in the font data.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    fn layout(&mut self, glyph: GlyphChar, brush: GlyphBrush) -> parley::Layout<GlyphBrush> {
        let text = glyph.as_char().to_string();
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(GLYPH_FONT_SIZE));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<GlyphBrush> = builder.build(&text);
        layout.break_all_lines(None);
        layout
    }

    /// Ink bounds for `glyph`, rasterized once on first use and cached.
    fn ink_box(&mut self, glyph: GlyphChar) -> TargenResult<InkBox> {
        if let Some(ink) = self.ink_cache.get(&glyph) {
            return Ok(*ink);
        }

        let layout = self.layout(
            glyph,
            GlyphBrush {
                r: 0,
                g: 0,
                b: 0,
                a: 255,
            },
        );
        let mut ctx = vello_cpu::RenderContext::new(MEASURE_CANVAS, MEASURE_CANVAS);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            MEASURE_ORIGIN,
            MEASURE_ORIGIN,
        )));
        fill_glyph_runs(&mut ctx, &self.font, &layout);
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(MEASURE_CANVAS, MEASURE_CANVAS);
        ctx.render_to_pixmap(&mut pixmap);

        let side = u32::from(MEASURE_CANVAS);
        let (min_x, min_y, max_x, max_y) = ink_bounds(pixmap.data_as_u8_slice(), side, side)
            .ok_or_else(|| {
                TargenError::validation(format!(
                    "glyph '{}' rendered no ink with the loaded font",
                    glyph.as_char()
                ))
            })?;

        let ink = InkBox {
            left: f64::from(min_x) - MEASURE_ORIGIN,
            top: f64::from(min_y) - MEASURE_ORIGIN,
            width: f64::from(max_x - min_x + 1),
            height: f64::from(max_y - min_y + 1),
        };
        self.ink_cache.insert(glyph, ink);
        Ok(ink)
    }
}

impl GlyphSource for ParleyGlyphSource {
    fn measure(&mut self, glyph: GlyphChar) -> TargenResult<GlyphMetrics> {
        let ink = self.ink_box(glyph)?;
        Ok(GlyphMetrics {
            width: ink.width,
            height: ink.height,
        })
    }

    fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        glyph: GlyphChar,
        origin: Pt2,
        color: Rgb8,
    ) -> TargenResult<()> {
        let ink = self.ink_box(glyph)?;
        let brush = GlyphBrush {
            r: color.r,
            g: color.g,
            b: color.b,
            a: 255,
        };
        let layout = self.layout(glyph, brush);

        // Shift layout coordinates so the measured ink starts at `origin`.
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            origin.x - ink.left,
            origin.y - ink.top,
        )));
        fill_glyph_runs(ctx, &self.font, &layout);

        Ok(())
    }
}

fn fill_glyph_runs(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    layout: &parley::Layout<GlyphBrush>,
) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

/// Pixel AABB of nonzero alpha in a premultiplied RGBA8 buffer.
fn ink_bounds(data: &[u8], width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..height {
        for x in 0..width {
            if data[((y * width + x) * 4 + 3) as usize] == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_centers_the_ink_on_the_centroid() {
        let m = GlyphMetrics {
            width: 30.0,
            height: 60.0,
        };
        let origin = glyph_origin(Pt2::new(150.0, 150.0), &m);
        assert_eq!(origin, Pt2::new(135.0, 120.0));
    }

    #[test]
    fn quad_is_centered_on_the_centroid() {
        let centroid = Pt2::new(150.0, 150.0);
        let m = GlyphMetrics {
            width: 30.0,
            height: 60.0,
        };
        let origin = glyph_origin(centroid, &m);
        let (min, max) = glyph_quad(origin, &m).aabb();
        assert_eq!((min.x, max.x), (135.0, 165.0));
        assert_eq!((min.y, max.y), (115.0, 185.0));
        assert!(((min.y + max.y) / 2.0 - centroid.y).abs() < 1e-12);
        assert!(((min.x + max.x) / 2.0 - centroid.x).abs() < 1e-12);
    }

    #[test]
    fn quad_height_carries_the_padding() {
        let m = GlyphMetrics {
            width: 21.0,
            height: 47.0,
        };
        let origin = glyph_origin(Pt2::new(80.0, 90.0), &m);
        let (min, max) = glyph_quad(origin, &m).aabb();
        assert!((max.y - min.y - (m.height + 2.0 * BOX_PAD)).abs() < 1e-12);
        assert!((max.x - min.x - m.width).abs() < 1e-12);
    }

    #[test]
    fn ink_bounds_tracks_the_lit_pixels() {
        let mut data = vec![0u8; 8 * 8 * 4];
        for (x, y) in [(2u32, 3u32), (5, 3), (4, 6)] {
            data[((y * 8 + x) * 4 + 3) as usize] = 255;
        }
        assert_eq!(ink_bounds(&data, 8, 8), Some((2, 3, 5, 6)));
        assert_eq!(ink_bounds(&[0u8; 8 * 8 * 4], 8, 8), None);
    }
}
