use thiserror::Error;

/// Reasons a relation tree cannot be laid out.
///
/// All of these are detected before any coordinate is computed; a failed
/// layout never returns partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("invalid relation shape at {path}: {reason}")]
    InvalidRelationShape { path: String, reason: String },

    #[error("cyclic ancestry at {path}: person `{id}` is their own ancestor")]
    CyclicAncestry { path: String, id: String },

    #[error("depth must be at least 1, got {depth}")]
    NegativeDepth { depth: i32 },

    #[error("inconsistent twin pair at {path}: no adjacent twin in the same row")]
    InconsistentTwinPair { path: String },
}
