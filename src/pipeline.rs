use rand::Rng;

use crate::core::{Pt2, Quad};
use crate::error::{TargenError, TargenResult};
use crate::homography::Homography;
use crate::sprite::Sprite;
use crate::warp_cpu;

/// Scale factors are drawn uniformly from this band and applied to each
/// background axis.
pub const SCALE_MIN: f64 = 0.2;
pub const SCALE_MAX: f64 = 0.3;

/// Rotation angles are drawn uniformly from `[0, ROTATION_MAX_DEG)`.
pub const ROTATION_MAX_DEG: f64 = 90.0;

/// Each destination corner is shifted by up to this much on each axis.
pub const CORNER_JITTER_PX: f64 = 10.0;

/// One sampled (or directly constructed) parameter set for the transform
/// chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformParams {
    pub scaled_w: u32,
    pub scaled_h: u32,
    /// Counter-clockwise rotation in radians.
    pub angle_rad: f64,
    pub anchor_x: u32,
    pub anchor_y: u32,
    /// Per-corner `(dx, dy)` perturbations in TL, TR, BR, BL order.
    pub corner_jitter: [[f64; 2]; 4],
}

impl TransformParams {
    /// Draw a parameter set for a background of the given size.
    pub fn draw(rng: &mut impl Rng, bg_w: u32, bg_h: u32) -> TargenResult<Self> {
        let factor = rng.random_range(SCALE_MIN..SCALE_MAX);
        let scaled_w = (factor * f64::from(bg_w)) as u32;
        let scaled_h = (factor * f64::from(bg_h)) as u32;
        if scaled_w > bg_w || scaled_h > bg_h {
            return Err(TargenError::Placement {
                sprite_w: scaled_w,
                sprite_h: scaled_h,
                bg_w,
                bg_h,
            });
        }

        let angle_rad = rng.random_range(0.0..ROTATION_MAX_DEG).to_radians();
        let anchor_x = rng.random_range(0..=bg_w - scaled_w);
        let anchor_y = rng.random_range(0..=bg_h - scaled_h);

        let mut corner_jitter = [[0.0; 2]; 4];
        for corner in &mut corner_jitter {
            corner[0] = rng.random_range(-CORNER_JITTER_PX..CORNER_JITTER_PX);
            corner[1] = rng.random_range(-CORNER_JITTER_PX..CORNER_JITTER_PX);
        }

        Ok(Self {
            scaled_w,
            scaled_h,
            angle_rad,
            anchor_x,
            anchor_y,
            corner_jitter,
        })
    }
}

/// The scale -> rotate -> perspective chain for one sample, composed into a
/// single homography that is applied once to pixels and once to label quads.
#[derive(Clone, Debug)]
pub struct TransformPlan {
    params: TransformParams,
    sprite_w: u32,
    sprite_h: u32,
    bg_w: u32,
    bg_h: u32,
    scale: Homography,
    rotation: Homography,
    perspective: Homography,
    total: Homography,
}

impl TransformPlan {
    pub fn new(
        params: TransformParams,
        sprite_w: u32,
        sprite_h: u32,
        bg_w: u32,
        bg_h: u32,
    ) -> TargenResult<Self> {
        if sprite_w == 0 || sprite_h == 0 {
            return Err(TargenError::validation("sprite has no pixels"));
        }
        if params.scaled_w == 0 || params.scaled_h == 0 {
            return Err(TargenError::validation(
                "scaled sprite has no pixels, background too small",
            ));
        }
        if params.scaled_w > bg_w || params.scaled_h > bg_h {
            return Err(TargenError::Placement {
                sprite_w: params.scaled_w,
                sprite_h: params.scaled_h,
                bg_w,
                bg_h,
            });
        }

        let sw = f64::from(params.scaled_w);
        let sh = f64::from(params.scaled_h);

        let scale = Homography::scale(sw / f64::from(sprite_w), sh / f64::from(sprite_h));

        // Integer pivot, matching raster convention for the sprite center.
        let pivot = Pt2::new(
            f64::from(params.scaled_w / 2),
            f64::from(params.scaled_h / 2),
        );
        // Positive angles turn counter-clockwise on screen; kurbo's positive
        // angle is clockwise in y-down coordinates, hence the sign flip.
        let rotation = Homography::rotation_about(pivot, -params.angle_rad);

        let ax = f64::from(params.anchor_x);
        let ay = f64::from(params.anchor_y);
        let base = [
            [ax, ay],
            [ax + sw, ay],
            [ax + sw, ay + sh],
            [ax, ay + sh],
        ];
        let mut dst = [Pt2::origin(); 4];
        for (d, (b, j)) in dst
            .iter_mut()
            .zip(base.iter().zip(params.corner_jitter.iter()))
        {
            *d = Pt2::new(b[0] + j[0], b[1] + j[1]);
        }
        let perspective =
            Homography::from_quad_to_quad(&Quad::from_rect(0.0, 0.0, sw, sh), &Quad::new(dst))?;

        let total = scale.then(&rotation).then(&perspective);

        Ok(Self {
            params,
            sprite_w,
            sprite_h,
            bg_w,
            bg_h,
            scale,
            rotation,
            perspective,
            total,
        })
    }

    pub fn params(&self) -> &TransformParams {
        &self.params
    }

    /// The composed transform from sprite space to background space.
    pub fn homography(&self) -> &Homography {
        &self.total
    }

    pub fn scale_stage(&self) -> &Homography {
        &self.scale
    }

    pub fn rotation_stage(&self) -> &Homography {
        &self.rotation
    }

    pub fn perspective_stage(&self) -> &Homography {
        &self.perspective
    }

    pub fn background_size(&self) -> (u32, u32) {
        (self.bg_w, self.bg_h)
    }

    /// Resample the sprite's pixels into a background-sized canvas.
    pub fn warp_sprite(&self, sprite: &Sprite) -> TargenResult<Sprite> {
        if sprite.width != self.sprite_w || sprite.height != self.sprite_h {
            return Err(TargenError::validation(format!(
                "sprite is {}x{}, plan was built for {}x{}",
                sprite.width, sprite.height, self.sprite_w, self.sprite_h
            )));
        }
        warp_cpu::warp_rgba_premul(sprite, &self.total, self.bg_w, self.bg_h)
    }

    /// Project a sprite-space quad into background space.
    pub fn project_quad(&self, quad: &Quad) -> Quad {
        self.total.apply_quad(quad)
    }
}
