//! Prefix tree construction and pre-order serialization
//!
//! Nodes live in a flat arena and refer to their children by index. The tree
//! is built with Huffman's greedy merge: the two lightest nodes are combined
//! until one root remains.
//!
//! # Tie-break
//! Every node entering the priority queue takes the next sequence number:
//! leaves first, in ascending byte order, then merged nodes as they are
//! created. Among nodes of equal weight the lowest sequence number (the node
//! inserted first) is extracted first. The first node extracted becomes the
//! left child, the second the right child.
//!
//! # Serialized form
//! Pre-order, one marker byte per node: `0x00` for an internal node, `0x01`
//! followed by the symbol byte for a leaf. An empty tree serializes to
//! nothing.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use crate::error::FormatError;
use crate::frequency::FrequencyTable;

pub const INTERNAL_MARKER: u8 = 0x00;
pub const LEAF_MARKER: u8 = 0x01;

/// Index of a node inside a [`PrefixTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf { symbol: u8, weight: u64 },
    Internal { left: NodeId, right: NodeId, weight: u64 },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match *self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// A binary prefix tree. `root` is `None` only for empty input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl PrefixTree {
    /// Build the canonical tree for a frequency table.
    pub fn build(freq: &FrequencyTable) -> Self {
        let mut tree = Self::default();
        // (weight, sequence, node); Reverse turns the max-heap into a min-heap
        let mut heap: BinaryHeap<Reverse<(u64, usize, NodeId)>> = BinaryHeap::new();
        let mut seq = 0usize;

        for (symbol, weight) in freq.iter() {
            let id = tree.push(Node::Leaf { symbol, weight });
            heap.push(Reverse((weight, seq, id)));
            seq += 1;
        }

        while let Some(Reverse((left_weight, _, left))) = heap.pop() {
            let Some(Reverse((right_weight, _, right))) = heap.pop() else {
                tree.root = Some(left);
                break;
            };
            let weight = left_weight + right_weight;
            let id = tree.push(Node::Internal { left, right, weight });
            heap.push(Reverse((weight, seq, id)));
            seq += 1;
        }

        tracing::trace!(
            leaves = tree.leaf_count(),
            nodes = tree.len(),
            "built prefix tree"
        );
        tree
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut max = 0;
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match *self.node(id) {
                Node::Leaf { .. } => max = max.max(depth),
                Node::Internal { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        max
    }

    /// Serialize the tree shape in pre-order.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let Some(root) = self.root else {
            return out;
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            match *self.node(id) {
                Node::Leaf { symbol, .. } => {
                    out.push(LEAF_MARKER);
                    out.push(symbol);
                }
                Node::Internal { left, right, .. } => {
                    out.push(INTERNAL_MARKER);
                    // right first so the left subtree is emitted next
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        out
    }

    /// Rebuild a tree from its pre-order serialization.
    ///
    /// The whole slice must describe exactly one tree. Weights of the rebuilt
    /// nodes are not stored in the format and are reported as zero.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }

        // First pass: tokenize and check the shape. `open` counts subtrees
        // still owed; the tree is complete when it reaches zero.
        let mut tokens: Vec<Option<u8>> = Vec::new();
        let mut seen = HashSet::new();
        let mut open = 1usize;
        let mut pos = 0;
        while open > 0 {
            let Some(&marker) = bytes.get(pos) else {
                return Err(FormatError::IncompleteTree);
            };
            match marker {
                INTERNAL_MARKER => {
                    tokens.push(None);
                    open += 1;
                    pos += 1;
                }
                LEAF_MARKER => {
                    let symbol = *bytes
                        .get(pos + 1)
                        .ok_or(FormatError::MissingSymbol { offset: pos })?;
                    if !seen.insert(symbol) {
                        return Err(FormatError::DuplicateSymbol { symbol });
                    }
                    tokens.push(Some(symbol));
                    open -= 1;
                    pos += 2;
                }
                other => {
                    return Err(FormatError::InvalidMarker {
                        marker: other,
                        offset: pos,
                    })
                }
            }
        }
        if pos < bytes.len() {
            return Err(FormatError::TrailingTreeBytes {
                extra: bytes.len() - pos,
            });
        }

        // Second pass: walking the pre-order sequence backwards, each internal
        // node finds its left subtree on top of the stack and its right below.
        let mut tree = Self::default();
        let mut stack: Vec<NodeId> = Vec::new();
        for token in tokens.into_iter().rev() {
            let id = match token {
                Some(symbol) => tree.push(Node::Leaf { symbol, weight: 0 }),
                None => {
                    let (Some(left), Some(right)) = (stack.pop(), stack.pop()) else {
                        return Err(FormatError::IncompleteTree);
                    };
                    tree.push(Node::Internal {
                        left,
                        right,
                        weight: 0,
                    })
                }
            };
            stack.push(id);
        }
        tree.root = stack.pop();
        if !stack.is_empty() {
            return Err(FormatError::IncompleteTree);
        }
        Ok(tree)
    }
}
