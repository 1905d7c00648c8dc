use std::path::Path;

use anyhow::Context;

use crate::core::Quad;
use crate::error::{TargenError, TargenResult};

/// One YOLO detection label, normalized to the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Label {
    pub class_id: u32,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl Label {
    /// Render as a label-file line: class id then the four normalized fields.
    pub fn yolo_line(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

/// Reduce a projected quad to a normalized axis-aligned label.
///
/// Corners are clamped to the canvas first, so a partially visible target
/// still yields the visible part's box. A box that clamps to zero area is a
/// [`TargenError::DegenerateBox`].
pub fn label_from_quad(
    class_id: u32,
    quad: &Quad,
    canvas_w: u32,
    canvas_h: u32,
) -> TargenResult<Label> {
    if canvas_w == 0 || canvas_h == 0 {
        return Err(TargenError::validation("label canvas has no pixels"));
    }
    let w = f64::from(canvas_w);
    let h = f64::from(canvas_h);

    let (min, max) = quad.aabb();
    let x_min = min.x.clamp(0.0, w);
    let x_max = max.x.clamp(0.0, w);
    let y_min = min.y.clamp(0.0, h);
    let y_max = max.y.clamp(0.0, h);

    if !(x_max > x_min && y_max > y_min) {
        return Err(TargenError::degenerate_box(format!(
            "box [{:.1}, {:.1}] x [{:.1}, {:.1}] has no visible area",
            x_min, x_max, y_min, y_max
        )));
    }

    let label = Label {
        class_id,
        x_center: (x_min + x_max) / 2.0 / w,
        y_center: (y_min + y_max) / 2.0 / h,
        width: (x_max - x_min) / w,
        height: (y_max - y_min) / h,
    };

    for v in [label.x_center, label.y_center, label.width, label.height] {
        if !(0.0..=1.0).contains(&v) {
            return Err(TargenError::out_of_range(format!(
                "normalized field {v} is outside [0, 1]"
            )));
        }
    }
    Ok(label)
}

/// Write labels as one YOLO line per target.
pub fn write_labels(path: &Path, labels: &[Label]) -> TargenResult<()> {
    let mut text = String::new();
    for label in labels {
        text.push_str(&label.yolo_line());
        text.push('\n');
    }
    std::fs::write(path, text).with_context(|| format!("write labels '{}'", path.display()))?;
    Ok(())
}
