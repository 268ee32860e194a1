//! Ancestor paths
//!
//! The DOM tree is owned elsewhere; dispatch only needs the ordered chain of
//! nodes from the root down to the target.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::EventError;
use crate::NodeId;

/// Supplies propagation paths to the dispatch engine
pub trait AncestorPathProvider {
    /// Nodes from the root to `node`, ending with `node` itself
    fn path_to_root(&self, node: NodeId) -> Result<Vec<NodeId>, EventError>;
}

impl<F> AncestorPathProvider for F
where
    F: Fn(NodeId) -> Result<Vec<NodeId>, EventError>,
{
    fn path_to_root(&self, node: NodeId) -> Result<Vec<NodeId>, EventError> {
        self(node)
    }
}

/// Parent links for hosts that do not keep a full tree
#[derive(Debug, Default)]
pub struct ParentMap {
    parents: RefCell<HashMap<NodeId, NodeId>>,
}

impl ParentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `parent` the parent of `child`
    pub fn set_parent(&self, child: NodeId, parent: NodeId) {
        self.parents.borrow_mut().insert(child, parent);
    }

    /// Turn `child` into a root
    pub fn detach(&self, child: NodeId) {
        self.parents.borrow_mut().remove(&child);
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parents.borrow().get(&node).copied()
    }
}

impl AncestorPathProvider for ParentMap {
    fn path_to_root(&self, node: NodeId) -> Result<Vec<NodeId>, EventError> {
        let parents = self.parents.borrow();
        let mut path = vec![node];
        let mut cursor = node;
        while let Some(&parent) = parents.get(&cursor) {
            if path.len() > parents.len() {
                return Err(EventError::PathResolution {
                    node,
                    reason: format!("cycle through {}", parent),
                });
            }
            path.push(parent);
            cursor = parent;
        }
        path.reverse();
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_is_root_first() {
        let tree = ParentMap::new();
        tree.set_parent(NodeId(1), NodeId::ROOT);
        tree.set_parent(NodeId(2), NodeId(1));

        assert_eq!(
            tree.path_to_root(NodeId(2)).unwrap(),
            vec![NodeId::ROOT, NodeId(1), NodeId(2)]
        );
        assert_eq!(tree.path_to_root(NodeId::ROOT).unwrap(), vec![NodeId::ROOT]);
    }

    #[test]
    fn test_detach() {
        let tree = ParentMap::new();
        tree.set_parent(NodeId(1), NodeId::ROOT);
        tree.detach(NodeId(1));
        assert_eq!(tree.parent(NodeId(1)), None);
        assert_eq!(tree.path_to_root(NodeId(1)).unwrap(), vec![NodeId(1)]);
    }

    #[test]
    fn test_cycle_is_reported() {
        let tree = ParentMap::new();
        tree.set_parent(NodeId(1), NodeId(2));
        tree.set_parent(NodeId(2), NodeId(1));
        assert!(matches!(
            tree.path_to_root(NodeId(1)),
            Err(EventError::PathResolution { node: NodeId(1), .. })
        ));
    }

    #[test]
    fn test_closure_provider() {
        let provider = |node: NodeId| Ok::<_, EventError>(vec![NodeId::ROOT, node]);
        assert_eq!(provider.path_to_root(NodeId(9)).unwrap(), vec![NodeId::ROOT, NodeId(9)]);
    }
}
