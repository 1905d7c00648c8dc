pub type TargenResult<T> = Result<T, TargenError>;

#[derive(thiserror::Error, Debug)]
pub enum TargenError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("placement error: scaled sprite {sprite_w}x{sprite_h} does not fit background {bg_w}x{bg_h}")]
    Placement {
        sprite_w: u32,
        sprite_h: u32,
        bg_w: u32,
        bg_h: u32,
    },

    #[error("degenerate box error: {0}")]
    DegenerateBox(String),

    #[error("label range error: {0}")]
    OutOfRange(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TargenError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn degenerate_box(msg: impl Into<String>) -> Self {
        Self::DegenerateBox(msg.into())
    }

    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Faults that invalidate one sample rather than the whole run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Placement { .. } | Self::DegenerateBox(_) | Self::OutOfRange(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            TargenError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            TargenError::degenerate_box("x")
                .to_string()
                .contains("degenerate box error:")
        );
        assert!(
            TargenError::out_of_range("x")
                .to_string()
                .contains("label range error:")
        );
        assert!(
            TargenError::decode("x")
                .to_string()
                .contains("decode error:")
        );
    }

    #[test]
    fn placement_reports_both_sizes() {
        let err = TargenError::Placement {
            sprite_w: 600,
            sprite_h: 400,
            bg_w: 500,
            bg_h: 500,
        };
        let msg = err.to_string();
        assert!(msg.contains("600x400"));
        assert!(msg.contains("500x500"));
    }

    #[test]
    fn recoverable_faults_are_exactly_the_per_sample_ones() {
        assert!(
            TargenError::Placement {
                sprite_w: 1,
                sprite_h: 1,
                bg_w: 1,
                bg_h: 1
            }
            .is_recoverable()
        );
        assert!(TargenError::degenerate_box("x").is_recoverable());
        assert!(TargenError::out_of_range("x").is_recoverable());
        assert!(!TargenError::validation("x").is_recoverable());
        assert!(!TargenError::decode("x").is_recoverable());
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = TargenError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
