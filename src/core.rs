use nalgebra::{Matrix3, Point2, Vector3};

pub type Real = f64;

pub type Pt2 = Point2<Real>;
pub type Vec3 = Vector3<Real>;
pub type Mat3 = Matrix3<Real>;

/// Side length in pixels of the square sprite canvas.
pub const SPRITE_SIZE: u32 = 300;

pub fn to_homogeneous(p: &Pt2) -> Vec3 {
    Vec3::new(p.x, p.y, 1.0)
}

pub fn from_homogeneous(v: &Vec3) -> Pt2 {
    Pt2::new(v.x / v.z, v.y / v.z)
}

/// Four corners of a (possibly non-rectangular) region, in
/// top-left, top-right, bottom-right, bottom-left order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub corners: [Pt2; 4],
}

impl Quad {
    pub fn new(corners: [Pt2; 4]) -> Self {
        Self { corners }
    }

    /// Axis-aligned rectangle with corners `(x0, y0)` and `(x1, y1)`.
    pub fn from_rect(x0: Real, y0: Real, x1: Real, y1: Real) -> Self {
        Self {
            corners: [
                Pt2::new(x0, y0),
                Pt2::new(x1, y0),
                Pt2::new(x1, y1),
                Pt2::new(x0, y1),
            ],
        }
    }

    /// Tight axis-aligned bounds as `(min, max)` corners.
    pub fn aabb(&self) -> (Pt2, Pt2) {
        let mut min = self.corners[0];
        let mut max = self.corners[0];
        for c in &self.corners[1..] {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rect_orders_corners_clockwise_from_top_left() {
        let q = Quad::from_rect(1.0, 2.0, 5.0, 9.0);
        assert_eq!(q.corners[0], Pt2::new(1.0, 2.0));
        assert_eq!(q.corners[1], Pt2::new(5.0, 2.0));
        assert_eq!(q.corners[2], Pt2::new(5.0, 9.0));
        assert_eq!(q.corners[3], Pt2::new(1.0, 9.0));
    }

    #[test]
    fn aabb_covers_rotated_corners() {
        let q = Quad::new([
            Pt2::new(0.0, -3.0),
            Pt2::new(4.0, 1.0),
            Pt2::new(0.0, 5.0),
            Pt2::new(-4.0, 1.0),
        ]);
        let (min, max) = q.aabb();
        assert_eq!(min, Pt2::new(-4.0, -3.0));
        assert_eq!(max, Pt2::new(4.0, 5.0));
    }

    #[test]
    fn homogeneous_round_trip_divides_out_w() {
        let v = Vec3::new(6.0, 9.0, 3.0);
        assert_eq!(from_homogeneous(&v), Pt2::new(2.0, 3.0));
        assert_eq!(to_homogeneous(&Pt2::new(2.0, 3.0)), Vec3::new(2.0, 3.0, 1.0));
    }
}
