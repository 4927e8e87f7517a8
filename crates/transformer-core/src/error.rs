//! Error taxonomy for the operator catalog, registry and execution engine.
//!
//! Input errors live next to the decoder in [`crate::decode::DecodeError`].
//! Parameter problems never surface here: they are corrected during
//! resolution (see [`crate::params`]).

use thiserror::Error;

use crate::raster::ImageError;

/// A failure inside a single operator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OpError {
    /// The input image buffer does not match its declared shape.
    #[error("malformed image: {0}")]
    InvalidImage(#[from] ImageError),

    /// The operator needs a different number of channels.
    #[error("expected a {expected}-channel image, got {actual} channel(s)")]
    UnsupportedChannels { expected: usize, actual: usize },

    /// A kernel size outside the supported set.
    #[error("invalid kernel size {size}: must be odd and in [{min}, {max}]")]
    InvalidKernel { size: i64, min: i64, max: i64 },

    /// A parameter the operator reads was not resolved.
    #[error("missing parameter '{0}'")]
    MissingParam(&'static str),
}

/// Errors raised while building a [`crate::Registry`].
///
/// These are configuration mistakes in the catalog itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two entries share an identifier.
    #[error("operator '{0}' is registered more than once")]
    DuplicateOperator(&'static str),

    /// A declared default violates its own range.
    #[error("operator '{operator}' parameter '{param}': {reason}")]
    InvalidDefault {
        operator: &'static str,
        param: &'static str,
        reason: String,
    },
}

/// Per-invocation failure reported by the engine.
///
/// One failing invocation never stops the others in the same run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// The invocation names an operator the registry doesn't know.
    #[error("{operator}: unknown operator")]
    UnknownOperator { operator: String },

    /// The operator ran and failed.
    #[error("{operator}: {source}")]
    Operator {
        operator: String,
        #[source]
        source: OpError,
    },
}

impl PipelineError {
    /// Identifier of the operator the failed invocation requested.
    pub fn operator(&self) -> &str {
        match self {
            PipelineError::UnknownOperator { operator } => operator,
            PipelineError::Operator { operator, .. } => operator,
        }
    }

    /// Human-readable message without the operator prefix.
    pub fn message(&self) -> String {
        match self {
            PipelineError::UnknownOperator { .. } => "unknown operator".to_string(),
            PipelineError::Operator { source, .. } => source.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_error_display() {
        let err = OpError::InvalidKernel {
            size: 4,
            min: 1,
            max: 31,
        };
        assert_eq!(
            err.to_string(),
            "invalid kernel size 4: must be odd and in [1, 31]"
        );

        let err = OpError::UnsupportedChannels {
            expected: 3,
            actual: 1,
        };
        assert_eq!(err.to_string(), "expected a 3-channel image, got 1 channel(s)");
    }

    #[test]
    fn test_pipeline_error_carries_operator() {
        let err = PipelineError::Operator {
            operator: "sepia".to_string(),
            source: OpError::MissingParam("x"),
        };
        assert_eq!(err.operator(), "sepia");
        assert_eq!(err.message(), "missing parameter 'x'");
        assert_eq!(err.to_string(), "sepia: missing parameter 'x'");

        let err = PipelineError::UnknownOperator {
            operator: "emboss".to_string(),
        };
        assert_eq!(err.operator(), "emboss");
        assert_eq!(err.to_string(), "emboss: unknown operator");
    }

    #[test]
    fn test_image_error_converts() {
        let err: OpError = ImageError::EmptyDimensions {
            width: 0,
            height: 1,
        }
        .into();
        assert!(matches!(err, OpError::InvalidImage(_)));
    }
}
