use std::fmt;

use thiserror::Error;

use crate::open_cypher_model::Direction;
use crate::pg_query_generator::DataType;

/// Kind-mapping collaborator failures. Unknown kinds carry the label names
/// so callers can report exactly what was missing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KindMapError {
    #[error("unknown kinds: {}", .0.join(", "))]
    UnknownKinds(Vec<String>),

    #[error("kind mapping service failure: {0}")]
    Service(String),
}

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("unpacked too many nodes for node pattern")]
    TooManyNodesForNodePattern,

    #[error("unpacked too many nodes for traversal step")]
    TooManyNodesForTraversalStep,

    #[error("relationship pattern encountered before its left node pattern")]
    MisplacedRelationshipPattern,

    #[error("unsupported traversal direction: {0}")]
    UnsupportedDirection(Direction),

    #[error("unknown variable reference: {0} (no pattern binding declares this alias)")]
    UnknownAlias(String),

    #[error("variable {alias} is bound as {bound} but referenced as {requested}")]
    ConflictingAliasUse {
        alias: String,
        bound: DataType,
        requested: DataType,
    },

    #[error("identifier {0} was never tracked")]
    UntrackedIdentifier(String),

    #[error("expected at least one operand for constraint extraction")]
    EmptyOperandStack,

    #[error("no identifier generation prefix for data type {0}")]
    NoPrefixForDataType(DataType),

    #[error("unsupported function: {0}")]
    UnsupportedFunction(String),

    #[error("multi-part queries are not supported")]
    UnsupportedMultiPartQuery,

    #[error("query has no return clause")]
    MissingReturnClause,

    #[error("kind mapping failed: {0}")]
    KindMapping(#[from] KindMapError),

    #[error("unsupported feature: {0}")]
    Unsupported(String),

    #[error("{0}")]
    Multiple(MultipleErrors),
}

impl TranslateError {
    pub fn unsupported(feature: impl Into<String>) -> Self {
        TranslateError::Unsupported(feature.into())
    }
}

/// Independent problems accumulated over one walk, reported together.
#[derive(Debug)]
pub struct MultipleErrors(pub Vec<TranslateError>);

impl fmt::Display for MultipleErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} translation error(s): ", self.0.len())?;

        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }

        Ok(())
    }
}
