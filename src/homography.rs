use kurbo::Affine;
use nalgebra::DMatrix;

use crate::core::{Mat3, Pt2, Quad, from_homogeneous, to_homogeneous};
use crate::error::{TargenError, TargenResult};

/// A 3x3 projective transform of the plane, `x' ~ H x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    m: Mat3,
}

impl Homography {
    pub fn identity() -> Self {
        Self {
            m: Mat3::identity(),
        }
    }

    /// Lift an affine map into the projective form.
    pub fn from_affine(a: Affine) -> Self {
        let [xx, yx, xy, yy, tx, ty] = a.as_coeffs();
        Self {
            m: Mat3::new(xx, xy, tx, yx, yy, ty, 0.0, 0.0, 1.0),
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::from_affine(Affine::scale_non_uniform(sx, sy))
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::from_affine(Affine::translate((tx, ty)))
    }

    pub fn rotation_about(center: Pt2, angle_rad: f64) -> Self {
        Self::from_affine(Affine::rotate_about(
            angle_rad,
            kurbo::Point::new(center.x, center.y),
        ))
    }

    /// Solve for the transform taking `src`'s corners onto `dst`'s via the
    /// normalized Direct Linear Transform.
    ///
    /// Both quads use the same corner order, so the four correspondences are
    /// positional. The result is scaled so that `H[2,2] == 1` when possible.
    pub fn from_quad_to_quad(src: &Quad, dst: &Quad) -> TargenResult<Self> {
        let (src_n, t_src) = normalize_points(&src.corners).ok_or_else(|| {
            TargenError::validation("source quad is degenerate, cannot normalize")
        })?;
        let (dst_n, t_dst) = normalize_points(&dst.corners).ok_or_else(|| {
            TargenError::validation("destination quad is degenerate, cannot normalize")
        })?;

        let mut a = DMatrix::<f64>::zeros(8, 9);
        for (i, (ps, pd)) in src_n.iter().zip(dst_n.iter()).enumerate() {
            let x = ps.x;
            let y = ps.y;
            let u = pd.x;
            let v = pd.y;

            let r0 = 2 * i;
            let r1 = 2 * i + 1;

            a[(r0, 0)] = -x;
            a[(r0, 1)] = -y;
            a[(r0, 2)] = -1.0;
            a[(r0, 6)] = u * x;
            a[(r0, 7)] = u * y;
            a[(r0, 8)] = u;

            a[(r1, 3)] = -x;
            a[(r1, 4)] = -y;
            a[(r1, 5)] = -1.0;
            a[(r1, 6)] = v * x;
            a[(r1, 7)] = v * y;
            a[(r1, 8)] = v;
        }

        // Pad A to square so the SVD exposes the full right-singular basis;
        // the solution is the singular vector of the smallest singular value.
        let mut a_work = DMatrix::<f64>::zeros(9, 9);
        a_work.view_mut((0, 0), (8, 9)).copy_from(&a);

        let svd = a_work.svd(true, true);
        let v_t = svd
            .v_t
            .ok_or_else(|| TargenError::validation("homography svd failed"))?;
        let h_vec = v_t.row(v_t.nrows() - 1);

        let mut m = Mat3::zeros();
        for r in 0..3 {
            for c in 0..3 {
                m[(r, c)] = h_vec[3 * r + c];
            }
        }

        let t_dst_inv = t_dst
            .try_inverse()
            .ok_or_else(|| TargenError::validation("normalization transform is singular"))?;
        m = t_dst_inv * m * t_src;

        let scale = m[(2, 2)];
        if scale.abs() > f64::EPSILON {
            m /= scale;
        }

        Ok(Self { m })
    }

    /// Compose with a transform applied after this one.
    pub fn then(&self, next: &Homography) -> Homography {
        Homography { m: next.m * self.m }
    }

    pub fn matrix(&self) -> &Mat3 {
        &self.m
    }

    pub fn apply(&self, p: Pt2) -> Pt2 {
        from_homogeneous(&(self.m * to_homogeneous(&p)))
    }

    pub fn apply_quad(&self, q: &Quad) -> Quad {
        Quad::new(q.corners.map(|c| self.apply(c)))
    }

    pub fn inverse(&self) -> Option<Homography> {
        self.m.try_inverse().map(|m| Homography { m })
    }
}

/// Hartley normalization: center on the origin, scale the mean distance to
/// sqrt(2). Returns `None` when all points coincide.
fn normalize_points(points: &[Pt2; 4]) -> Option<(Vec<Pt2>, Mat3)> {
    let n = points.len() as f64;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for p in points {
        cx += p.x;
        cy += p.y;
    }
    cx /= n;
    cy /= n;

    let mut mean_dist = 0.0;
    for p in points {
        let dx = p.x - cx;
        let dy = p.y - cy;
        mean_dist += (dx * dx + dy * dy).sqrt();
    }
    mean_dist /= n;

    if mean_dist <= f64::EPSILON {
        return None;
    }

    let scale = 2.0_f64.sqrt() / mean_dist;
    let t = Mat3::new(scale, 0.0, -scale * cx, 0.0, scale, -scale * cy, 0.0, 0.0, 1.0);

    let norm = points
        .iter()
        .map(|p| Pt2::new((p.x - cx) * scale, (p.y - cy) * scale))
        .collect();

    Some((norm, t))
}
