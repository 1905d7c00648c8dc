use kurbo::{Arc, BezPath, Circle, Rect, Shape};

use crate::core::{Pt2, Quad};
use crate::model::ShapeKind;

// All shapes are laid out on the 300x300 sprite canvas inside (or touching)
// the 50..250 square; the star's lower points extend to y=300.
const SQUARE_MIN: f64 = 50.0;
const SQUARE_MAX: f64 = 250.0;
const CENTER: f64 = 150.0;
const RADIUS: f64 = 100.0;

const PATH_TOLERANCE: f64 = 0.1;

/// Distance from the flat edge of a half (or quarter) disc to its centroid.
const ARC_CENTROID_OFFSET: f64 = 4.0 * RADIUS / (3.0 * std::f64::consts::PI);

const TRIANGLE_PTS: [(f64, f64); 3] = [(150.0, 50.0), (50.0, 250.0), (250.0, 250.0)];

const PENTAGON_PTS: [(f64, f64); 5] = [
    (150.0, 50.0),
    (50.0, 150.0),
    (100.0, 250.0),
    (200.0, 250.0),
    (250.0, 150.0),
];

const STAR_PTS: [(f64, f64); 10] = [
    (150.0, 50.0),
    (175.0, 150.0),
    (250.0, 150.0),
    (200.0, 200.0),
    (225.0, 300.0),
    (150.0, 225.0),
    (75.0, 300.0),
    (100.0, 200.0),
    (50.0, 150.0),
    (125.0, 150.0),
];

/// Outline, label centroid, and tight corner quad for one shape class.
#[derive(Clone, Debug)]
pub struct ShapeGeometry {
    pub path: BezPath,
    pub centroid: Pt2,
    pub quad: Quad,
}

pub fn shape_geometry(kind: ShapeKind) -> ShapeGeometry {
    match kind {
        ShapeKind::Circle => ShapeGeometry {
            path: Circle::new((CENTER, CENTER), RADIUS).to_path(PATH_TOLERANCE),
            centroid: Pt2::new(CENTER, CENTER),
            quad: Quad::from_rect(SQUARE_MIN, SQUARE_MIN, SQUARE_MAX, SQUARE_MAX),
        },
        ShapeKind::Semicircle => ShapeGeometry {
            path: semicircle_path(),
            centroid: Pt2::new(CENTER, CENTER + ARC_CENTROID_OFFSET),
            quad: Quad::from_rect(SQUARE_MIN, CENTER, SQUARE_MAX, SQUARE_MAX),
        },
        ShapeKind::QuarterCircle => ShapeGeometry {
            path: quarter_circle_path(),
            centroid: Pt2::new(CENTER + ARC_CENTROID_OFFSET, CENTER + ARC_CENTROID_OFFSET),
            quad: Quad::from_rect(CENTER, CENTER, SQUARE_MAX, SQUARE_MAX),
        },
        ShapeKind::Triangle => polygon_geometry(&TRIANGLE_PTS),
        ShapeKind::Rectangle => ShapeGeometry {
            path: Rect::new(SQUARE_MIN, SQUARE_MIN, SQUARE_MAX, SQUARE_MAX)
                .to_path(PATH_TOLERANCE),
            centroid: Pt2::new(CENTER, CENTER),
            quad: Quad::from_rect(SQUARE_MIN, SQUARE_MIN, SQUARE_MAX, SQUARE_MAX),
        },
        ShapeKind::Pentagon => polygon_geometry(&PENTAGON_PTS),
        ShapeKind::Star => polygon_geometry(&STAR_PTS),
        ShapeKind::Cross => ShapeGeometry {
            path: cross_path(),
            centroid: Pt2::new(CENTER, CENTER),
            quad: Quad::from_rect(SQUARE_MIN, SQUARE_MIN, SQUARE_MAX, SQUARE_MAX),
        },
    }
}

/// Lower half-disc: arc from 3 o'clock sweeping through the bottom, closed
/// along the horizontal chord.
fn semicircle_path() -> BezPath {
    let arc = Arc::new(
        (CENTER, CENTER),
        (RADIUS, RADIUS),
        0.0,
        std::f64::consts::PI,
        0.0,
    );
    let mut path = BezPath::new();
    path.move_to((CENTER + RADIUS, CENTER));
    path.extend(arc.append_iter(PATH_TOLERANCE));
    path.close_path();
    path
}

/// Lower-right quarter disc: straight edges from the corner, closed by the arc.
fn quarter_circle_path() -> BezPath {
    let arc = Arc::new(
        (CENTER, CENTER),
        (RADIUS, RADIUS),
        0.0,
        std::f64::consts::FRAC_PI_2,
        0.0,
    );
    let mut path = BezPath::new();
    path.move_to((CENTER, CENTER));
    path.line_to((CENTER + RADIUS, CENTER));
    path.extend(arc.append_iter(PATH_TOLERANCE));
    path.close_path();
    path
}

/// Two overlapping bars; the non-zero fill rule merges them into one plus sign.
fn cross_path() -> BezPath {
    let vertical = Rect::new(100.0, 50.0, 200.0, 250.0);
    let horizontal = Rect::new(50.0, 100.0, 250.0, 200.0);
    let mut path = vertical.to_path(PATH_TOLERANCE);
    path.extend(horizontal.to_path(PATH_TOLERANCE));
    path
}

fn polygon_geometry(pts: &[(f64, f64)]) -> ShapeGeometry {
    ShapeGeometry {
        path: polygon_path(pts),
        centroid: polygon_centroid(pts),
        quad: polygon_quad(pts),
    }
}

fn polygon_path(pts: &[(f64, f64)]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((&first, rest)) = pts.split_first() {
        path.move_to(first);
        for &p in rest {
            path.line_to(p);
        }
        path.close_path();
    }
    path
}

/// Shoelace centroid of a simple polygon.
fn polygon_centroid(pts: &[(f64, f64)]) -> Pt2 {
    let n = pts.len();
    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let (x0, y0) = pts[i];
        let (x1, y1) = pts[(i + 1) % n];
        let cross = x0 * y1 - x1 * y0;
        area2 += cross;
        cx += (x0 + x1) * cross;
        cy += (y0 + y1) * cross;
    }
    let scale = 1.0 / (3.0 * area2);
    Pt2::new(cx * scale, cy * scale)
}

fn polygon_quad(pts: &[(f64, f64)]) -> Quad {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(x, y) in pts {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    Quad::from_rect(min_x, min_y, max_x, max_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_centroid_matches_vertex_mean() {
        let g = shape_geometry(ShapeKind::Triangle);
        assert!((g.centroid.x - 150.0).abs() < 1e-9);
        assert!((g.centroid.y - 550.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn semicircle_centroid_sits_below_the_chord() {
        let g = shape_geometry(ShapeKind::Semicircle);
        let expected_y = 150.0 + 400.0 / (3.0 * std::f64::consts::PI);
        assert!((g.centroid.x - 150.0).abs() < 1e-9);
        assert!((g.centroid.y - expected_y).abs() < 1e-9);
    }

    #[test]
    fn quarter_circle_centroid_is_offset_on_both_axes() {
        let g = shape_geometry(ShapeKind::QuarterCircle);
        assert!((g.centroid.x - g.centroid.y).abs() < 1e-9);
        assert!(g.centroid.x > 150.0 && g.centroid.x < 250.0);
    }

    #[test]
    fn every_centroid_lies_inside_its_quad() {
        for kind in ShapeKind::ALL {
            let g = shape_geometry(kind);
            let (min, max) = g.quad.aabb();
            assert!(
                g.centroid.x >= min.x
                    && g.centroid.x <= max.x
                    && g.centroid.y >= min.y
                    && g.centroid.y <= max.y,
                "{} centroid outside quad",
                kind.name()
            );
        }
    }

    #[test]
    fn every_outline_stays_inside_its_quad() {
        for kind in ShapeKind::ALL {
            let g = shape_geometry(kind);
            let bbox = g.path.bounding_box();
            let (min, max) = g.quad.aabb();
            // Half-pixel slack for the cubic approximation of arcs.
            assert!(bbox.x0 >= min.x - 0.5, "{} left edge", kind.name());
            assert!(bbox.y0 >= min.y - 0.5, "{} top edge", kind.name());
            assert!(bbox.x1 <= max.x + 0.5, "{} right edge", kind.name());
            assert!(bbox.y1 <= max.y + 0.5, "{} bottom edge", kind.name());
        }
    }

    #[test]
    fn star_quad_extends_to_the_lower_points() {
        let g = shape_geometry(ShapeKind::Star);
        let (min, max) = g.quad.aabb();
        assert_eq!((min.x, min.y), (50.0, 50.0));
        assert_eq!((max.x, max.y), (250.0, 300.0));
    }

    #[test]
    fn half_and_quarter_disc_quads_hug_the_filled_region() {
        let semi = shape_geometry(ShapeKind::Semicircle);
        let (min, max) = semi.quad.aabb();
        assert_eq!((min.x, min.y, max.x, max.y), (50.0, 150.0, 250.0, 250.0));

        let quarter = shape_geometry(ShapeKind::QuarterCircle);
        let (min, max) = quarter.quad.aabb();
        assert_eq!((min.x, min.y, max.x, max.y), (150.0, 150.0, 250.0, 250.0));
    }

    #[test]
    fn cross_outline_spans_both_bars() {
        let g = shape_geometry(ShapeKind::Cross);
        let bbox = g.path.bounding_box();
        assert_eq!((bbox.x0, bbox.y0, bbox.x1, bbox.y1), (50.0, 50.0, 250.0, 250.0));
    }
}
