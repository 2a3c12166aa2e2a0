//! Arena-based DOM tree storage
//!
//! All nodes of one document live in a single `Vec<DomNode>` and refer to
//! each other by `NodeId` (the index). This eliminates:
//! - Rc/RefCell overhead and borrow juggling
//! - Recursive function calls (stack overflow risk on deep trees)
//! - Cache misses (nodes stored sequentially)
//!
//! ## Memory Layout
//!
//! ```text
//! Arena: Vec<DomNode>
//!        [Node0][Node1][Node2]...
//!         ↑ 4-byte index, not 8-byte pointer
//! ```

use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::warn;

/// Arena allocator for DOM nodes
///
/// Design:
/// - Single Vec<DomNode> for sequential allocation
/// - HashMap for backend_node_id → NodeId lookup (CDP uses backend IDs)
/// - No Rc/Arc: use indices everywhere
///
/// Deserialization checks every parent/child link and rejects cycles, so a
/// restored arena is always a finite forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ArenaSnapshot")]
pub struct DomArena {
    nodes: Vec<DomNode>,

    /// Backend node ID → NodeId lookup (for CDP integration)
    backend_id_map: AHashMap<u32, NodeId>,

    root_id: Option<NodeId>,
}

impl DomArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self::with_capacity(1024) // Pre-allocate for typical page
    }

    /// Create arena with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            backend_id_map: AHashMap::with_capacity(capacity),
            root_id: None,
        }
    }

    /// Add a node to the arena, returns its ID
    ///
    /// The node is stored as given; linking it into the tree is up to the
    /// caller. See [`append_child`](Self::append_child) for the linked form.
    pub fn add_node(&mut self, node: DomNode) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        if let Some(backend_id) = node.backend_node_id {
            if let Some(previous) = self.backend_id_map.insert(backend_id, node_id) {
                warn!(
                    backend_id,
                    previous,
                    node_id,
                    "duplicate backend node id, lookup now points at the newer node"
                );
            }
        }
        self.nodes.push(node);
        node_id
    }

    /// Add `node` as the last child of `parent_id`
    pub fn append_child(&mut self, parent_id: NodeId, mut node: DomNode) -> Result<NodeId> {
        self.get(parent_id)?;
        node.parent_id = Some(parent_id);
        let child_id = self.add_node(node);
        self.get_mut(parent_id)?.children_ids.push(child_id);
        Ok(child_id)
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by backend node ID (from CDP)
    pub fn get_by_backend_id(&self, backend_id: u32) -> Result<&DomNode> {
        let node_id = self
            .backend_id_map
            .get(&backend_id)
            .ok_or(DomError::NodeNotFound(backend_id))?;
        self.get(*node_id)
    }

    /// Get node ID by backend node ID
    pub fn get_node_id_by_backend(&self, backend_id: u32) -> Option<NodeId> {
        self.backend_id_map.get(&backend_id).copied()
    }

    /// Mark an existing node as the document root
    pub fn set_root(&mut self, node_id: NodeId) -> Result<()> {
        self.get(node_id)?;
        self.root_id = Some(node_id);
        Ok(())
    }

    /// Root node ID, if one was set
    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    /// Get root node
    pub fn root(&self) -> Result<&DomNode> {
        let root_id = self.root_id.ok_or(DomError::NoRoot)?;
        self.get(root_id)
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterator over all nodes in allocation order
    pub fn iter(&self) -> impl Iterator<Item = &DomNode> {
        self.nodes.iter()
    }

    /// Iterator over all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| i as NodeId)
    }

    /// Get children of a node
    pub fn children(&self, node_id: NodeId) -> Result<Vec<&DomNode>> {
        let node = self.get(node_id)?;
        node.children_ids
            .iter()
            .map(|&child_id| self.get(child_id))
            .collect()
    }

    /// Get parent of a node
    pub fn parent(&self, node_id: NodeId) -> Result<Option<&DomNode>> {
        let node = self.get(node_id)?;
        match node.parent_id {
            Some(parent_id) => Ok(Some(self.get(parent_id)?)),
            None => Ok(None),
        }
    }

    /// Subtree rooted at `start_id` in document order, `start_id` first
    ///
    /// An unknown `start_id` yields nothing.
    pub fn descendants(&self, start_id: NodeId) -> Descendants<'_> {
        Descendants {
            arena: self,
            stack: vec![start_id],
        }
    }

    /// Traverse tree depth-first (iterative, no recursion)
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// Traverse tree breadth-first
    pub fn traverse_bf<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut queue = VecDeque::new();
        queue.push_back(start_id);

        while let Some(node_id) = queue.pop_front() {
            let node = self.get(node_id)?;
            visit(node)?;

            for &child_id in node.children_ids.iter() {
                queue.push_back(child_id);
            }
        }

        Ok(())
    }

    /// Clear arena (reuse allocation)
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.backend_id_map.clear();
        self.root_id = None;
    }
}

impl Default for DomArena {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire form of [`DomArena`], validated before it becomes one
///
/// The backend-id index is rebuilt from the nodes rather than trusted.
#[derive(Deserialize)]
struct ArenaSnapshot {
    nodes: Vec<DomNode>,
    root_id: Option<NodeId>,
}

impl TryFrom<ArenaSnapshot> for DomArena {
    type Error = DomError;

    fn try_from(snapshot: ArenaSnapshot) -> Result<Self> {
        let nodes = snapshot.nodes;
        let invalid = DomError::InvalidSnapshot;

        if let Some(root_id) = snapshot.root_id {
            if root_id as usize >= nodes.len() {
                return Err(invalid(format!("root {root_id} out of range")));
            }
        }

        // Every child link is in range, points back, and is used once
        let mut listed = vec![false; nodes.len()];
        for (parent_id, node) in nodes.iter().enumerate() {
            for &child_id in &node.children_ids {
                let child = nodes.get(child_id as usize).ok_or_else(|| {
                    invalid(format!("node {parent_id} has unknown child {child_id}"))
                })?;
                if child.parent_id != Some(parent_id as NodeId) {
                    return Err(invalid(format!(
                        "node {child_id} is listed under {parent_id} but its parent is {:?}",
                        child.parent_id
                    )));
                }
                if std::mem::replace(&mut listed[child_id as usize], true) {
                    return Err(invalid(format!("node {child_id} is listed as a child twice")));
                }
            }
        }

        // A node not reachable from a parentless node sits on a cycle
        let mut reached = vec![false; nodes.len()];
        let mut stack: Vec<usize> = (0..nodes.len())
            .filter(|&i| nodes[i].parent_id.is_none())
            .collect();
        while let Some(i) = stack.pop() {
            reached[i] = true;
            stack.extend(nodes[i].children_ids.iter().map(|&c| c as usize));
        }
        if let Some(i) = reached.iter().position(|r| !r) {
            return Err(invalid(format!("node {i} is not reachable from any root")));
        }

        let mut arena = DomArena::with_capacity(nodes.len());
        for node in nodes {
            arena.add_node(node);
        }
        arena.root_id = snapshot.root_id;
        Ok(arena)
    }
}

/// Pre-order iterator returned by [`DomArena::descendants`]
pub struct Descendants<'a> {
    arena: &'a DomArena,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodeId, &'a DomNode);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node_id = self.stack.pop()?;
            // Dangling ids are skipped, not reported
            let Some(node) = self.arena.nodes.get(node_id as usize) else {
                continue;
            };
            self.stack.extend(node.children_ids.iter().rev().copied());
            return Some((node_id, node));
        }
    }
}
