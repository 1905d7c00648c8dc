use std::path::{Path, PathBuf};

use anyhow::Context;
use rand::Rng;

use crate::error::{TargenError, TargenResult};

/// The background photos found in one directory.
#[derive(Clone, Debug)]
pub struct BackgroundPool {
    paths: Vec<PathBuf>,
}

impl BackgroundPool {
    /// Scan a directory for background photos.
    ///
    /// Paths are sorted so a seeded run picks the same file regardless of
    /// directory enumeration order.
    pub fn scan(dir: &Path) -> TargenResult<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("read background dir '{}'", dir.display()))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry =
                entry.with_context(|| format!("read background dir '{}'", dir.display()))?;
            let path = entry.path();
            if path.is_file() && has_image_extension(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(TargenError::validation(format!(
                "no background images (jpg, jpeg, png) in {}",
                dir.display()
            )));
        }
        Ok(Self { paths })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Pick one background path at random.
    pub fn pick(&self, rng: &mut impl Rng) -> &Path {
        &self.paths[rng.random_range(0..self.paths.len())]
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| {
        let e = e.to_ascii_lowercase();
        e == "jpg" || e == "jpeg" || e == "png"
    })
}

/// Decode a background photo as RGB.
pub fn load_background(path: &Path) -> TargenResult<image::RgbImage> {
    let img = image::open(path)
        .map_err(|e| TargenError::decode(format!("background {}: {e}", path.display())))?;
    Ok(img.to_rgb8())
}
