use crate::open_cypher_model::Direction;
use crate::pg_query_generator::{Identifier, IdentifierSet};

use super::errors::TranslateError;

/// One edge plus its two endpoint nodes within a traversal. Steps chain:
/// a step's right node is the next step's left node.
#[derive(Debug, Clone, PartialEq)]
pub struct TraversalStep {
    pub direction: Direction,
    pub left_node: Option<Identifier>,
    pub edge: Option<Identifier>,
    pub right_node: Option<Identifier>,
}

impl TraversalStep {
    fn is_complete(&self) -> bool {
        self.left_node.is_some() && self.edge.is_some() && self.right_node.is_some()
    }
}

/// The node-only half of the pattern IR: a single bound node select.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSelect {
    pub identifier: Option<Identifier>,
}

/// In-progress representation of one pattern part. Either a single node
/// select or an ordered chain of traversal steps, optionally bound to a
/// path identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub is_traversal: bool,
    /// Path binding identifier (`p = (...)`), if the part is bound.
    pub binding: Option<Identifier>,
    /// Every identifier this pattern declares, in no particular order.
    pub declared_identifiers: IdentifierSet,
    pub node_select: NodeSelect,
    pub traversal_steps: Vec<TraversalStep>,
}

impl Pattern {
    pub fn new(is_traversal: bool, binding: Option<Identifier>) -> Self {
        Pattern {
            is_traversal,
            binding,
            declared_identifiers: IdentifierSet::new(),
            node_select: NodeSelect::default(),
            traversal_steps: Vec::new(),
        }
    }

    /// Binds the next node identifier into the pattern shape: the single
    /// node-select slot, or the open endpoint of the current traversal
    /// step.
    pub fn bind_node(&mut self, identifier: Identifier) -> Result<(), TranslateError> {
        self.declared_identifiers.add(identifier.clone());

        if !self.is_traversal {
            if self.node_select.identifier.is_some() {
                return Err(TranslateError::TooManyNodesForNodePattern);
            }

            self.node_select.identifier = Some(identifier);
            return Ok(());
        }

        match self.traversal_steps.last_mut() {
            None => {
                self.traversal_steps.push(TraversalStep {
                    direction: Direction::Bidirectional,
                    left_node: Some(identifier),
                    edge: None,
                    right_node: None,
                });
                Ok(())
            }

            Some(step) if step.edge.is_some() && step.right_node.is_none() => {
                step.right_node = Some(identifier);
                Ok(())
            }

            Some(_) => Err(TranslateError::TooManyNodesForTraversalStep),
        }
    }

    /// Binds the next edge identifier, opening a new step once the previous
    /// one is complete; the new step's left node is the previous step's
    /// right node.
    pub fn bind_edge(
        &mut self,
        identifier: Identifier,
        direction: Direction,
    ) -> Result<(), TranslateError> {
        self.declared_identifiers.add(identifier.clone());

        match self.traversal_steps.last_mut() {
            None => Err(TranslateError::MisplacedRelationshipPattern),

            Some(step) if step.left_node.is_some() && step.edge.is_none() => {
                step.edge = Some(identifier);
                step.direction = direction;
                Ok(())
            }

            Some(step) if step.is_complete() => {
                let carried = step.right_node.clone();

                self.traversal_steps.push(TraversalStep {
                    direction,
                    left_node: carried,
                    edge: Some(identifier),
                    right_node: None,
                });
                Ok(())
            }

            Some(_) => Err(TranslateError::MisplacedRelationshipPattern),
        }
    }
}
