//! Column layout errors
//!
//! Raised while assembling a column. A malformed layout is a programming
//! error in the caller; the panicking constructors surface the same text.

use thiserror::Error;

/// Result type for column construction
pub type ColumnResult<T> = Result<T, ColumnError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    #[error("Layer {layer} ({transform}) expects {expected} inner rows but wraps {actual}")]
    LayerSizeMismatch {
        layer: usize,
        transform: &'static str,
        expected: u32,
        actual: u32,
    },

    #[error("Layer {layer} remaps outer row {row} to {target}, past inner size {inner_size}")]
    RemapOutOfBounds {
        layer: usize,
        row: u32,
        target: u32,
        inner_size: u32,
    },

    #[error("Group run broken at row {row}: value {value}")]
    InvalidGroupRun { row: u32, value: u32 },
}

impl ColumnError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ColumnError::LayerSizeMismatch { .. } => "SCAN_LAYER_SIZE_MISMATCH",
            ColumnError::RemapOutOfBounds { .. } => "SCAN_REMAP_OUT_OF_BOUNDS",
            ColumnError::InvalidGroupRun { .. } => "SCAN_INVALID_GROUP_RUN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let err = ColumnError::InvalidGroupRun { row: 2, value: 1 };
        assert_eq!(err.code(), "SCAN_INVALID_GROUP_RUN");
        assert_eq!(err.to_string(), "Group run broken at row 2: value 1");
    }

    #[test]
    fn test_layer_mismatch_display() {
        let err = ColumnError::LayerSizeMismatch {
            layer: 0,
            transform: "presence",
            expected: 4,
            actual: 5,
        };
        assert_eq!(err.code(), "SCAN_LAYER_SIZE_MISMATCH");
        assert!(err.to_string().contains("presence"));
    }
}
