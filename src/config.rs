use std::path::PathBuf;

use crate::error::{TargenError, TargenResult};

/// Settings for one generation run.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GenerationConfig {
    /// Directory scanned for background photos.
    pub backgrounds_dir: PathBuf,
    /// Directory receiving `image_{i}.jpg` files.
    pub images_dir: PathBuf,
    /// Directory receiving `image_{i}.txt` files.
    pub labels_dir: PathBuf,
    /// Number of samples to attempt.
    pub count: u32,
    /// Root seed. Sample `i` derives its own stream from it.
    pub seed: u64,
    /// Optional JSON manifest describing the emitted files.
    #[serde(default)]
    pub manifest_path: Option<PathBuf>,
}

impl GenerationConfig {
    pub fn validate(&self) -> TargenResult<()> {
        if self.count == 0 {
            return Err(TargenError::validation("count must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_count_is_rejected() {
        let config = GenerationConfig {
            backgrounds_dir: PathBuf::from("bg"),
            images_dir: PathBuf::from("images"),
            labels_dir: PathBuf::from("labels"),
            count: 0,
            seed: 1,
            manifest_path: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn manifest_path_defaults_to_none() {
        let config: GenerationConfig = serde_json::from_str(
            r#"{
                "backgrounds_dir": "bg",
                "images_dir": "images",
                "labels_dir": "labels",
                "count": 10,
                "seed": 7
            }"#,
        )
        .unwrap();
        assert!(config.manifest_path.is_none());
        config.validate().unwrap();
    }
}
