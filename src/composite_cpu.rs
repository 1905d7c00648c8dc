use crate::error::{TargenError, TargenResult};
use crate::sprite::Sprite;

pub type PremulRgba8 = [u8; 4];

/// Source-over of a premultiplied RGBA pixel onto an opaque RGB pixel.
pub fn over_rgb(dst: [u8; 3], src: PremulRgba8) -> [u8; 3] {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return [src[0], src[1], src[2]];
    }

    let inv = 255u16 - u16::from(src[3]);

    let mut out = [0u8; 3];
    for i in 0..3 {
        out[i] = add_sat_u8(src[i], mul_div255(u16::from(dst[i]), inv));
    }
    out
}

pub fn over_rgb_in_place(dst: &mut [u8], src: &[u8]) -> TargenResult<()> {
    if !dst.len().is_multiple_of(3) || !src.len().is_multiple_of(4) || dst.len() / 3 != src.len() / 4
    {
        return Err(TargenError::validation(
            "over_rgb_in_place expects rgb8 and rgba8 buffers with equal pixel counts",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(3).zip(src.chunks_exact(4)) {
        let out = over_rgb([d[0], d[1], d[2]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Blend a background-sized sprite canvas over a background photo.
pub fn composite_sprite_over(bg: &image::RgbImage, sprite: &Sprite) -> TargenResult<image::RgbImage> {
    if sprite.width != bg.width() || sprite.height != bg.height() {
        return Err(TargenError::validation(format!(
            "sprite canvas is {}x{}, background is {}x{}",
            sprite.width,
            sprite.height,
            bg.width(),
            bg.height()
        )));
    }
    let mut out = bg.clone();
    over_rgb_in_place(&mut out, &sprite.data)?;
    Ok(out)
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_rgb_src_transparent_is_noop() {
        let dst = [10, 20, 30];
        let src = [255, 255, 255, 0];
        assert_eq!(over_rgb(dst, src), dst);
    }

    #[test]
    fn over_rgb_src_opaque_replaces_dst() {
        let dst = [10, 20, 30];
        let src = [255, 0, 0, 255];
        assert_eq!(over_rgb(dst, src), [255, 0, 0]);
    }

    #[test]
    fn over_rgb_half_alpha_blends() {
        let dst = [100, 100, 100];
        // Premultiplied red at alpha 128.
        let src = [128, 0, 0, 128];
        assert_eq!(over_rgb(dst, src), [178, 50, 50]);
    }

    #[test]
    fn over_rgb_in_place_rejects_mismatched_buffers() {
        let mut dst = vec![0u8; 9];
        let src = vec![0u8; 8];
        assert!(over_rgb_in_place(&mut dst, &src).is_err());
    }

    #[test]
    fn composite_rejects_mismatched_canvas() {
        let bg = image::RgbImage::new(4, 4);
        let sprite = Sprite::transparent(3, 4);
        assert!(composite_sprite_over(&bg, &sprite).is_err());
    }

    #[test]
    fn composite_places_opaque_pixels_and_keeps_the_rest() {
        let bg = image::RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
        let mut sprite = Sprite::transparent(4, 4);
        let at = ((2 * 4 + 1) * 4) as usize;
        sprite.data[at..at + 4].copy_from_slice(&[255, 0, 0, 255]);

        let out = composite_sprite_over(&bg, &sprite).unwrap();
        assert_eq!(out.get_pixel(1, 2).0, [255, 0, 0]);
        assert_eq!(out.get_pixel(0, 0).0, [10, 20, 30]);
        assert_eq!(out.get_pixel(3, 3).0, [10, 20, 30]);
    }
}
