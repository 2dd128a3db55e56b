//! Arena view of a spread's nested columns.

use std::sync::Arc;

use super::Spread;
use crate::column::{Column, ColumnType};
use crate::error::Result;

/// Index of a node in a [`ColumnTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    name: String,
    column: Arc<Column>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Every column of a spread, nested ones included, in one arena.
///
/// Children own nothing of their parents: the back-reference is a plain
/// [`NodeId`], so walking up the tree never creates a reference cycle.
#[derive(Debug, Default)]
pub struct ColumnTree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl ColumnTree {
    /// Builds the arena, depth first, in column order.
    ///
    /// # Errors
    ///
    /// Propagates deferred decode failures of lazy composite columns.
    pub fn build(spread: &Spread) -> Result<Self> {
        let mut tree = Self::default();
        for (name, column) in spread.columns() {
            let id = tree.push(name, Arc::clone(column), None)?;
            tree.roots.push(id);
        }
        Ok(tree)
    }

    fn push(&mut self, name: &str, column: Arc<Column>, parent: Option<NodeId>) -> Result<NodeId> {
        let id = NodeId(self.nodes.len());
        let children = if column.column_type() == ColumnType::Spread {
            column.children()?
        } else {
            Vec::new()
        };
        self.nodes.push(Node {
            name: name.to_string(),
            column,
            parent,
            children: Vec::with_capacity(children.len()),
        });
        for (child_name, child) in children {
            let child_id = self.push(&child_name, child, Some(id))?;
            self.nodes[id.0].children.push(child_id);
        }
        Ok(id)
    }

    /// Top-level nodes in column order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Name of a node within its parent.
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    /// Column of a node.
    #[must_use]
    pub fn column(&self, id: NodeId) -> &Arc<Column> {
        &self.nodes[id.0].column
    }

    /// Parent of a node, `None` for roots.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children of a node in column order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Names from the root down to `id`.
    #[must_use]
    pub fn path(&self, id: NodeId) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            path.push(self.name(node));
            current = self.parent(node);
        }
        path.reverse();
        path
    }

    /// Node reached by following `path` from the roots.
    #[must_use]
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        let (first, rest) = path.split_first()?;
        let mut current = *self.roots.iter().find(|&&id| self.name(id) == first.as_ref())?;
        for segment in rest {
            current = *self
                .children(current)
                .iter()
                .find(|&&id| self.name(id) == segment.as_ref())?;
        }
        Some(current)
    }

    /// Non-composite nodes, depth first.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            while let Some(id) = stack.pop() {
                if self.column(id).column_type() != ColumnType::Spread {
                    return Some(id);
                }
                stack.extend(self.children(id).iter().rev().copied());
            }
            None
        })
    }
}
