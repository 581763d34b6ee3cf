use thiserror::Error;

/// Errors raised while serializing a statement AST to SQL text. These are
/// coverage or shape violations in the tree being formatted, not user
/// input errors.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("empty compound identifier")]
    EmptyCompoundIdentifier,

    #[error("unable to format non-finite float value: {0}")]
    NonFiniteFloat(f64),

    #[error("merge insert action declares {shape} column(s) but provides {values} value(s)")]
    MergeActionShapeMismatch { shape: usize, values: usize },

    #[error("select statement has no projection")]
    EmptyProjection,
}
