use crate::core::{Pt2, Quad};
use crate::error::{TargenError, TargenResult};
use crate::homography::Homography;
use crate::sprite::Sprite;

/// Warp `src` through `h` into an `out_w` x `out_h` canvas.
///
/// Destination pixels are inverse-mapped into the source and sampled
/// bilinearly; samples outside the source read as transparent. Only the
/// axis-aligned footprint of the projected source rectangle is scanned.
pub fn warp_rgba_premul(
    src: &Sprite,
    h: &Homography,
    out_w: u32,
    out_h: u32,
) -> TargenResult<Sprite> {
    let inv = h
        .inverse()
        .ok_or_else(|| TargenError::validation("homography is not invertible"))?;

    let mut out = Sprite::transparent(out_w, out_h);

    let src_rect = Quad::from_rect(0.0, 0.0, f64::from(src.width), f64::from(src.height));
    let (min, max) = h.apply_quad(&src_rect).aabb();
    let x0 = (min.x.floor() as i64).max(0);
    let y0 = (min.y.floor() as i64).max(0);
    let x1 = (max.x.ceil() as i64).min(i64::from(out_w) - 1);
    let y1 = (max.y.ceil() as i64).min(i64::from(out_h) - 1);
    if x0 > x1 || y0 > y1 {
        return Ok(out);
    }

    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = inv.apply(Pt2::new(x as f64, y as f64));
            let px = sample_bilinear_premul(src, p.x, p.y);
            if px[3] == 0 && px[0] == 0 && px[1] == 0 && px[2] == 0 {
                continue;
            }
            let i = (y as usize * out_w as usize + x as usize) * 4;
            out.data[i..i + 4].copy_from_slice(&px);
        }
    }

    Ok(out)
}

/// Zero-padded bilinear sample of a premultiplied buffer at continuous
/// source coordinates.
pub fn sample_bilinear_premul(src: &Sprite, x: f64, y: f64) -> [u8; 4] {
    if !(x > -1.0) || !(y > -1.0) || x >= f64::from(src.width) || y >= f64::from(src.height) {
        return [0; 4];
    }

    let fx = x - x.floor();
    let fy = y - y.floor();
    let xi = x.floor() as i64;
    let yi = y.floor() as i64;

    let c00 = fetch(src, xi, yi);
    let c10 = fetch(src, xi + 1, yi);
    let c01 = fetch(src, xi, yi + 1);
    let c11 = fetch(src, xi + 1, yi + 1);

    let mut out = [0u8; 4];
    for ch in 0..4 {
        let top = c00[ch] * (1.0 - fx) + c10[ch] * fx;
        let bottom = c01[ch] * (1.0 - fx) + c11[ch] * fx;
        out[ch] = (top * (1.0 - fy) + bottom * fy).round() as u8;
    }
    out
}

fn fetch(src: &Sprite, x: i64, y: i64) -> [f64; 4] {
    if x < 0 || y < 0 || x >= i64::from(src.width) || y >= i64::from(src.height) {
        return [0.0; 4];
    }
    let px = src.pixel(x as u32, y as u32);
    [
        f64::from(px[0]),
        f64::from(px[1]),
        f64::from(px[2]),
        f64::from(px[3]),
    ]
}
