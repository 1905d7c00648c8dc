//! Targen generates labeled synthetic training images for object detection.
//!
//! Each sample is a shape-plus-glyph target rendered onto a 300x300 sprite,
//! pushed through a scale -> rotate -> perspective chain, and composited onto
//! a background photo. The composed homography that moves the pixels also
//! moves the label quads, so every `image_{i}.jpg` ships with an
//! `image_{i}.txt` of normalized YOLO boxes that match what was drawn.
//!
//! # Pipeline overview
//!
//! 1. **Render**: pick shape, glyph and colors, rasterize the sprite
//! 2. **Transform**: draw placement parameters, compose one homography
//! 3. **Composite**: warp the sprite over the background photo
//! 4. **Label**: project the quads, clamp, normalize, write YOLO lines
//!
//! Key constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: sample `i` draws from its own stream
//!   derived from the run seed, so skipped samples never shift later ones.
//! - **Premultiplied RGBA8** end-to-end until the final composite onto
//!   opaque RGB.
#![forbid(unsafe_code)]

pub mod backgrounds;
pub mod composite_cpu;
pub mod config;
pub mod core;
pub mod dataset;
pub mod error;
pub mod glyph;
pub mod homography;
pub mod labels;
pub mod model;
pub mod pipeline;
pub mod shapes;
pub mod sprite;
pub mod warp_cpu;

pub use backgrounds::{BackgroundPool, load_background};
pub use composite_cpu::{composite_sprite_over, over_rgb};
pub use config::GenerationConfig;
pub use core::{Mat3, Pt2, Quad, Real, SPRITE_SIZE};
pub use dataset::{
    GeneratedSample, GenerationReport, ManifestEntry, SkipRecord, derive_seed, generate_run,
    generate_sample,
};
pub use error::{TargenError, TargenResult};
pub use glyph::{GLYPH_FONT_SIZE, GlyphMetrics, GlyphSource, ParleyGlyphSource};
pub use homography::Homography;
pub use labels::{Label, label_from_quad, write_labels};
pub use model::{GLYPH_ALPHABET, GlyphChar, PALETTE, PaletteColor, Rgb8, ShapeKind};
pub use pipeline::{TransformParams, TransformPlan};
pub use shapes::{ShapeGeometry, shape_geometry};
pub use sprite::{RenderedSprite, Sprite, render_sprite};
pub use warp_cpu::{sample_bilinear_premul, warp_rgba_premul};
