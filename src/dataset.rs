use std::path::{Path, PathBuf};

use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::backgrounds::{self, BackgroundPool};
use crate::composite_cpu;
use crate::config::GenerationConfig;
use crate::error::TargenResult;
use crate::glyph::GlyphSource;
use crate::labels::{self, Label, label_from_quad};
use crate::model::{GlyphChar, ShapeKind};
use crate::pipeline::{TransformParams, TransformPlan};
use crate::sprite;

/// Derive the independent per-sample stream for `index` from the run seed.
///
/// Sample `i` always sees the same stream for a given run seed, whether or
/// not earlier samples were skipped.
pub fn derive_seed(seed: u64, index: u32) -> u64 {
    mix64(seed.wrapping_add((u64::from(index) + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)))
}

fn mix64(mut z: u64) -> u64 {
    // SplitMix64 mixing function.
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// One finished sample, before encoding.
pub struct GeneratedSample {
    pub image: image::RgbImage,
    /// Shape label first, then the glyph label.
    pub labels: [Label; 2],
    pub shape: ShapeKind,
    pub glyph: GlyphChar,
}

/// Render, transform, composite and label one target onto one background.
pub fn generate_sample(
    rng: &mut impl Rng,
    glyphs: &mut dyn GlyphSource,
    background: &image::RgbImage,
) -> TargenResult<GeneratedSample> {
    let rendered = sprite::render_sprite(rng, glyphs)?;
    let (bg_w, bg_h) = background.dimensions();

    let params = TransformParams::draw(rng, bg_w, bg_h)?;
    let plan = TransformPlan::new(
        params,
        rendered.sprite.width,
        rendered.sprite.height,
        bg_w,
        bg_h,
    )?;

    let warped = plan.warp_sprite(&rendered.sprite)?;
    let image = composite_cpu::composite_sprite_over(background, &warped)?;

    let shape_label = label_from_quad(
        rendered.shape.class_id(),
        &plan.project_quad(&rendered.shape_quad),
        bg_w,
        bg_h,
    )?;
    let glyph_label = label_from_quad(
        rendered.glyph.class_id(),
        &plan.project_quad(&rendered.glyph_quad),
        bg_w,
        bg_h,
    )?;

    Ok(GeneratedSample {
        image,
        labels: [shape_label, glyph_label],
        shape: rendered.shape,
        glyph: rendered.glyph,
    })
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct ManifestEntry {
    pub index: u32,
    pub image: PathBuf,
    pub label_file: PathBuf,
    pub shape: ShapeKind,
    pub glyph: GlyphChar,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct SkipRecord {
    pub index: u32,
    pub reason: String,
}

#[derive(Clone, Debug)]
pub struct GenerationReport {
    pub generated: u32,
    pub skipped: Vec<SkipRecord>,
    pub entries: Vec<ManifestEntry>,
}

/// Run a full generation pass: `image_{i}.jpg` plus `image_{i}.txt` for each
/// sample that survives its transform chain.
///
/// A sample whose placement or labels fail is skipped and recorded; its index
/// is not reused, so output indices may have gaps. Anything else aborts the
/// run.
#[tracing::instrument(skip(config, glyphs))]
pub fn generate_run(
    config: &GenerationConfig,
    glyphs: &mut dyn GlyphSource,
) -> TargenResult<GenerationReport> {
    config.validate()?;
    let pool = BackgroundPool::scan(&config.backgrounds_dir)?;

    std::fs::create_dir_all(&config.images_dir)
        .with_context(|| format!("create image dir '{}'", config.images_dir.display()))?;
    std::fs::create_dir_all(&config.labels_dir)
        .with_context(|| format!("create label dir '{}'", config.labels_dir.display()))?;

    let mut report = GenerationReport {
        generated: 0,
        skipped: Vec::new(),
        entries: Vec::new(),
    };

    for index in 0..config.count {
        let mut rng = StdRng::seed_from_u64(derive_seed(config.seed, index));
        let background = backgrounds::load_background(pool.pick(&mut rng))?;

        let sample = match generate_sample(&mut rng, glyphs, &background) {
            Ok(sample) => sample,
            Err(e) if e.is_recoverable() => {
                report.skipped.push(SkipRecord {
                    index,
                    reason: e.to_string(),
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        let image_path = config.images_dir.join(format!("image_{index}.jpg"));
        save_jpeg(&image_path, &sample.image)?;

        let label_path = config.labels_dir.join(format!("image_{index}.txt"));
        labels::write_labels(&label_path, &sample.labels)?;

        report.entries.push(ManifestEntry {
            index,
            image: image_path,
            label_file: label_path,
            shape: sample.shape,
            glyph: sample.glyph,
        });
        report.generated += 1;
    }

    if let Some(path) = &config.manifest_path {
        write_manifest(path, &report.entries)?;
    }
    Ok(report)
}

fn save_jpeg(path: &Path, image: &image::RgbImage) -> TargenResult<()> {
    image::save_buffer_with_format(
        path,
        image.as_raw(),
        image.width(),
        image.height(),
        image::ColorType::Rgb8,
        image::ImageFormat::Jpeg,
    )
    .with_context(|| format!("write jpeg '{}'", path.display()))?;
    Ok(())
}

fn write_manifest(path: &Path, entries: &[ManifestEntry]) -> TargenResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create manifest dir '{}'", parent.display()))?;
        }
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("create manifest '{}'", path.display()))?;
    serde_json::to_writer_pretty(file, entries)
        .with_context(|| format!("write manifest '{}'", path.display()))?;
    Ok(())
}
