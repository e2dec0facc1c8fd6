//! Node arena for one compilation unit.

use crate::base::NodeIndex;
use crate::node::{
    CompilationUnitData, ImportData, MethodData, Node, NodeData, SyntaxKind, TypeDeclData,
};
use jsym_common::limits::MAX_TREE_WALK_ITERATIONS;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Arena-based storage for the nodes of one compilation unit.
/// Nodes are stored contiguously and referenced by index.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NodeArena {
    nodes: Vec<Node>,
    root: NodeIndex,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena {
            nodes: Vec::new(),
            root: NodeIndex::NONE,
        }
    }

    /// Add a node to the arena and return its index.
    /// The parent link is filled in by [`set_root`](Self::set_root).
    pub fn add(&mut self, data: NodeData) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(Node {
            parent: NodeIndex::NONE,
            data,
        });
        NodeIndex(index)
    }

    /// Mark `root` as the compilation-unit node and link every reachable
    /// node to its parent.
    ///
    /// Nodes must form a tree; a node listed as a child twice keeps the
    /// last parent seen.
    pub fn set_root(&mut self, root: NodeIndex) {
        self.root = root;
        let mut stack = vec![root];
        let mut steps = 0u32;
        while let Some(idx) = stack.pop() {
            steps += 1;
            if steps > MAX_TREE_WALK_ITERATIONS.saturating_mul(100) {
                warn!(nodes = self.nodes.len(), "set_root: child links do not form a tree");
                break;
            }
            let Some(node) = self.get(idx) else {
                continue;
            };
            let children = node.data.children();
            for child in children {
                if let Some(child_node) = self.nodes.get_mut(child.0 as usize) {
                    child_node.parent = idx;
                    stack.push(child);
                }
            }
        }
    }

    /// Get a node by index.
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    pub fn data(&self, index: NodeIndex) -> Option<&NodeData> {
        self.get(index).map(|node| &node.data)
    }

    pub fn kind(&self, index: NodeIndex) -> Option<SyntaxKind> {
        self.get(index).map(Node::kind)
    }

    /// Parent of a node, [`NodeIndex::NONE`] for the root or unknown nodes.
    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.get(index).map_or(NodeIndex::NONE, |node| node.parent)
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Identifier text carried by a node (declaration name, referenced name).
    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        self.data(index).and_then(NodeData::name)
    }

    /// Iterate the strict ancestors of a node, nearest first.
    pub fn ancestors(&self, index: NodeIndex) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            current: self.parent(index),
            steps: 0,
        }
    }

    /// Nearest strict ancestor with the given kind.
    pub fn enclosing(&self, index: NodeIndex, kind: SyntaxKind) -> Option<NodeIndex> {
        self.ancestors(index)
            .find(|&ancestor| self.kind(ancestor) == Some(kind))
    }

    pub fn compilation_unit(&self) -> Option<&CompilationUnitData> {
        match self.data(self.root)? {
            NodeData::CompilationUnit(unit) => Some(unit),
            _ => None,
        }
    }

    pub fn package(&self) -> Option<&str> {
        self.compilation_unit()
            .and_then(|unit| unit.package.as_deref())
    }

    pub fn imports(&self) -> impl Iterator<Item = &ImportData> + '_ {
        self.compilation_unit()
            .into_iter()
            .flat_map(|unit| unit.imports.iter())
            .filter_map(|&idx| match self.data(idx) {
                Some(NodeData::Import(import)) => Some(import),
                _ => None,
            })
    }

    /// Top-level type declarations, in source order.
    pub fn top_level_types(&self) -> &[NodeIndex] {
        match self.compilation_unit() {
            Some(unit) => &unit.types,
            None => &[],
        }
    }

    pub fn get_type_decl(&self, index: NodeIndex) -> Option<&TypeDeclData> {
        match self.data(index)? {
            NodeData::TypeDecl(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn get_method(&self, index: NodeIndex) -> Option<&MethodData> {
        match self.data(index)? {
            NodeData::Method(method) => Some(method),
            _ => None,
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Iterator over a node's ancestors. Bounded by
/// [`MAX_TREE_WALK_ITERATIONS`] in case of corrupted parent links.
pub struct Ancestors<'a> {
    arena: &'a NodeArena,
    current: NodeIndex,
    steps: u32,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        if self.current.is_none() || self.steps >= MAX_TREE_WALK_ITERATIONS {
            return None;
        }
        self.steps += 1;
        let out = self.current;
        self.current = self.arena.parent(out);
        Some(out)
    }
}
